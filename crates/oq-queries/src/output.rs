//! Query Output
//!
//! Projects parsed results onto the selected properties and renders them
//! as a text grid, an HTML table or JSON.

use std::fmt;

use oq_core::config::OutputConfig;
use oq_core::{OutputFormat, PropEnum, PropValue, QueryError, QueryResult};
use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};

use crate::parser::ParsedResults;
use crate::props::PropHandler;

/// One record projected onto the selected properties, in selection order
#[derive(Debug, Clone, PartialEq)]
pub struct PropRow {
    values: Vec<(&'static str, PropValue)>,
}

impl PropRow {
    pub fn get(&self, name: &str) -> Option<&PropValue> {
        self.values
            .iter()
            .find(|(prop, _)| *prop == name)
            .map(|(_, value)| value)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &PropValue)> {
        self.values.iter().map(|(prop, value)| (*prop, value))
    }
}

impl Serialize for PropRow {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.values.len()))?;
        for (prop, value) in &self.values {
            map.serialize_entry(prop, value)?;
        }
        map.end()
    }
}

/// Projected results, flat or grouped like the parsed results they came from
#[derive(Debug, Clone, PartialEq)]
pub enum PropsOutput {
    Flat(Vec<PropRow>),
    Grouped(Vec<(String, Vec<PropRow>)>),
}

impl Serialize for PropsOutput {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Flat(rows) => {
                let mut seq = serializer.serialize_seq(Some(rows.len()))?;
                for row in rows {
                    seq.serialize_element(row)?;
                }
                seq.end()
            }
            Self::Grouped(groups) => {
                let mut map = serializer.serialize_map(Some(groups.len()))?;
                for (name, rows) in groups {
                    map.serialize_entry(name, rows)?;
                }
                map.end()
            }
        }
    }
}

pub struct QueryOutput<P: PropEnum, R> {
    prop_handler: PropHandler<P, R>,
    props: Vec<P>,
    config: OutputConfig,
}

impl<P: PropEnum, R> QueryOutput<P, R> {
    pub fn new(prop_handler: PropHandler<P, R>, config: OutputConfig) -> Self {
        Self {
            prop_handler,
            props: Vec::new(),
            config,
        }
    }

    /// Choose the properties to output, replacing any earlier selection.
    ///
    /// `select_all` picks every property in declaration order and ignores
    /// `props`. Repeated properties are kept once, at their first position.
    pub fn parse_select(&mut self, props: &[P], select_all: bool) -> QueryResult<()> {
        if select_all {
            self.props = self.prop_handler.all_props().to_vec();
            return Ok(());
        }

        if props.is_empty() {
            return Err(QueryError::parse_query(
                "Error: no properties given to select - use select_all to output every property",
            ));
        }

        let mut selected = Vec::with_capacity(props.len());
        for prop in props {
            if !self.prop_handler.check_supported(*prop) {
                return Err(QueryError::property_mapping(format!(
                    "Error: cannot select property '{}', it is not supported for this resource",
                    prop.name()
                )));
            }
            if !selected.contains(prop) {
                selected.push(*prop);
            }
        }
        self.props = selected;
        Ok(())
    }

    /// Selected properties; every property when nothing was selected
    pub fn selected_props(&self) -> &[P] {
        if self.props.is_empty() {
            self.prop_handler.all_props()
        } else {
            &self.props
        }
    }

    pub fn config(&self) -> &OutputConfig {
        &self.config
    }

    fn project(&self, record: &R) -> PropRow {
        let values = self
            .selected_props()
            .iter()
            .map(|prop| {
                let value = self
                    .prop_handler
                    .get_prop(record, *prop)
                    .unwrap_or_else(|| PropValue::String(self.config.missing_value.clone()));
                (prop.name(), value)
            })
            .collect();
        PropRow { values }
    }

    fn project_all(&self, records: &[R]) -> Vec<PropRow> {
        records.iter().map(|record| self.project(record)).collect()
    }

    pub fn to_props(&self, results: &ParsedResults<R>) -> PropsOutput {
        match results {
            ParsedResults::Flat(records) => PropsOutput::Flat(self.project_all(records)),
            ParsedResults::Grouped(groups) => PropsOutput::Grouped(
                groups
                    .iter()
                    .map(|(name, records)| (name.to_string(), self.project_all(records)))
                    .collect(),
            ),
        }
    }

    fn headers(&self) -> Vec<&'static str> {
        self.selected_props().iter().map(|p| p.name()).collect()
    }

    /// Plain text grid, one per group with the group name above it
    pub fn to_table(&self, results: &ParsedResults<R>) -> String {
        let headers = self.headers();
        match self.to_props(results) {
            PropsOutput::Flat(rows) => render_grid(&headers, &rows),
            PropsOutput::Grouped(groups) => groups
                .iter()
                .map(|(name, rows)| format!("{}:\n{}", name, render_grid(&headers, rows)))
                .collect::<Vec<_>>()
                .join("\n"),
        }
    }

    pub fn to_html(&self, results: &ParsedResults<R>) -> String {
        let headers = self.headers();
        match self.to_props(results) {
            PropsOutput::Flat(rows) => render_html_table(&headers, &rows),
            PropsOutput::Grouped(groups) => groups
                .iter()
                .map(|(name, rows)| {
                    format!(
                        "<b>{}:</b>\n{}",
                        escape_html(name),
                        render_html_table(&headers, rows)
                    )
                })
                .collect::<Vec<_>>()
                .join("<br/>\n"),
        }
    }

    pub fn to_json(&self, results: &ParsedResults<R>) -> QueryResult<String> {
        Ok(serde_json::to_string_pretty(&self.to_props(results))?)
    }

    pub fn render(&self, results: &ParsedResults<R>, format: OutputFormat) -> QueryResult<String> {
        match format {
            OutputFormat::Table => Ok(self.to_table(results)),
            OutputFormat::Html => Ok(self.to_html(results)),
            OutputFormat::Json => self.to_json(results),
        }
    }
}

impl<P: PropEnum, R> fmt::Debug for QueryOutput<P, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueryOutput")
            .field("props", &self.props)
            .field("config", &self.config)
            .finish()
    }
}

fn render_grid(headers: &[&str], rows: &[PropRow]) -> String {
    let cells: Vec<Vec<String>> = rows
        .iter()
        .map(|row| row.iter().map(|(_, value)| value.to_string()).collect())
        .collect();

    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in &cells {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let border = |fill: char| {
        let parts: Vec<String> = widths
            .iter()
            .map(|w| fill.to_string().repeat(w + 2))
            .collect();
        format!("+{}+", parts.join("+"))
    };
    let line = |values: Vec<&str>| {
        let parts: Vec<String> = values
            .iter()
            .zip(&widths)
            .map(|(value, w)| format!(" {}{} ", value, " ".repeat(w - value.chars().count())))
            .collect();
        format!("|{}|", parts.join("|"))
    };

    let mut out = vec![border('-'), line(headers.to_vec()), border('=')];
    for row in &cells {
        out.push(line(row.iter().map(String::as_str).collect()));
        out.push(border('-'));
    }
    out.join("\n")
}

fn render_html_table(headers: &[&str], rows: &[PropRow]) -> String {
    let mut out = String::from("<table>\n<thead>\n<tr>");
    for header in headers {
        out.push_str(&format!("<th>{}</th>", escape_html(header)));
    }
    out.push_str("</tr>\n</thead>\n<tbody>\n");
    for row in rows {
        out.push_str("<tr>");
        for (_, value) in row.iter() {
            out.push_str(&format!("<td>{}</td>", escape_html(&value.to_string())));
        }
        out.push_str("</tr>\n");
    }
    out.push_str("</tbody>\n</table>");
    out
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
