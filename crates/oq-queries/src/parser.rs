//! Query Parser
//!
//! Sorts and groups the records that made it through the filter.

use std::cmp::Ordering;
use std::fmt;

use oq_core::{PropEnum, PropValue, QueryError, QueryResult};
use tracing::debug;

use crate::props::PropHandler;
use crate::sorts::{SortOrder, SortSpec};

/// Name of the group collecting records outside every explicit range
pub const UNGROUPED: &str = "ungrouped results";

/// Named groups of records, in group declaration order
#[derive(Debug, Clone, PartialEq)]
pub struct GroupedResults<R> {
    groups: Vec<(String, Vec<R>)>,
}

impl<R> GroupedResults<R> {
    pub fn get(&self, name: &str) -> Option<&[R]> {
        self.groups
            .iter()
            .find(|(group, _)| group == name)
            .map(|(_, records)| records.as_slice())
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.groups.iter().map(|(name, _)| name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[R])> {
        self.groups
            .iter()
            .map(|(name, records)| (name.as_str(), records.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn into_inner(self) -> Vec<(String, Vec<R>)> {
        self.groups
    }
}

/// Output of [`QueryParser::run_parser`]
#[derive(Debug, Clone, PartialEq)]
pub enum ParsedResults<R> {
    Flat(Vec<R>),
    Grouped(GroupedResults<R>),
}

impl<R> ParsedResults<R> {
    pub fn is_grouped(&self) -> bool {
        matches!(self, Self::Grouped(_))
    }

    /// Total records, counting a record once per group it landed in
    pub fn record_count(&self) -> usize {
        match self {
            Self::Flat(records) => records.len(),
            Self::Grouped(groups) => groups.iter().map(|(_, records)| records.len()).sum(),
        }
    }

    pub fn as_flat(&self) -> Option<&[R]> {
        match self {
            Self::Flat(records) => Some(records),
            Self::Grouped(_) => None,
        }
    }

    pub fn as_grouped(&self) -> Option<&GroupedResults<R>> {
        match self {
            Self::Flat(_) => None,
            Self::Grouped(groups) => Some(groups),
        }
    }
}

impl<R> Default for ParsedResults<R> {
    fn default() -> Self {
        Self::Flat(Vec::new())
    }
}

/// How a group decides membership
#[derive(Debug, Clone, PartialEq)]
enum GroupRule {
    AnyOf(Vec<PropValue>),
    NoneOf(Vec<PropValue>),
}

impl GroupRule {
    fn matches(&self, value: &PropValue) -> bool {
        match self {
            Self::AnyOf(values) => values.contains(value),
            Self::NoneOf(values) => !values.contains(value),
        }
    }
}

#[derive(Debug, Clone)]
struct GroupBy<P> {
    prop: P,
    ranges: Option<Vec<(String, Vec<PropValue>)>>,
    include_missing: bool,
}

pub struct QueryParser<P: PropEnum, R> {
    prop_handler: PropHandler<P, R>,
    sort_spec: SortSpec<P>,
    group_by: Option<GroupBy<P>>,
}

impl<P: PropEnum, R: Clone> QueryParser<P, R> {
    pub fn new(prop_handler: PropHandler<P, R>) -> Self {
        Self {
            prop_handler,
            sort_spec: SortSpec::new(),
            group_by: None,
        }
    }

    /// Replace the sort spec. The first entry is the primary key.
    pub fn parse_sort_by(&mut self, sort_by: &[(P, SortOrder)]) -> QueryResult<()> {
        for (prop, _) in sort_by {
            self.ensure_supported(*prop)?;
        }
        self.sort_spec = sort_by.iter().copied().collect();
        Ok(())
    }

    /// Group results by `prop`.
    ///
    /// With `ranges`, each (name, values) pair becomes one group holding the
    /// records whose value is among `values`; `include_missing` adds an
    /// extra group for everything else. Without ranges there is one group
    /// per distinct value.
    pub fn parse_group_by(
        &mut self,
        prop: P,
        ranges: Option<Vec<(String, Vec<PropValue>)>>,
        include_missing: bool,
    ) -> QueryResult<()> {
        self.ensure_supported(prop)?;

        // no ranges at all means one group per distinct value
        let ranges = ranges.filter(|ranges| !ranges.is_empty());

        if let Some(ranges) = &ranges {
            let mut seen: Vec<&str> = Vec::with_capacity(ranges.len());
            for (name, _) in ranges {
                if name == UNGROUPED {
                    return Err(QueryError::parse_query(format!(
                        "Error: group name '{}' is reserved for records outside every group",
                        name
                    )));
                }
                if seen.contains(&name.as_str()) {
                    return Err(QueryError::parse_query(format!(
                        "Error: group name '{}' is used more than once",
                        name
                    )));
                }
                seen.push(name);
            }
        }

        self.group_by = Some(GroupBy {
            prop,
            ranges,
            include_missing,
        });
        Ok(())
    }

    fn ensure_supported(&self, prop: P) -> QueryResult<()> {
        if self.prop_handler.check_supported(prop) {
            Ok(())
        } else {
            Err(QueryError::property_mapping(format!(
                "Error: property '{}' is not supported for this resource",
                prop.name()
            )))
        }
    }

    pub fn sort_spec(&self) -> &SortSpec<P> {
        &self.sort_spec
    }

    pub fn is_grouped(&self) -> bool {
        self.group_by.is_some()
    }

    fn value_of(&self, record: &R, prop: P) -> PropValue {
        self.prop_handler.get_prop(record, prop).unwrap_or(PropValue::Null)
    }

    /// Sort, then group, the given records
    pub fn run_parser(&self, records: Vec<R>) -> ParsedResults<R> {
        if records.is_empty() {
            return ParsedResults::Flat(records);
        }

        let records = self.run_sort(records);
        match &self.group_by {
            Some(group_by) => ParsedResults::Grouped(self.run_group_by(records, group_by)),
            None => ParsedResults::Flat(records),
        }
    }

    fn run_sort(&self, records: Vec<R>) -> Vec<R> {
        if self.sort_spec.is_empty() {
            return records;
        }

        let props: Vec<P> = self.sort_spec.criteria().iter().map(|c| c.prop).collect();
        let mut keyed: Vec<(Vec<PropValue>, R)> = records
            .into_iter()
            .map(|record| {
                let keys = props.iter().map(|prop| self.value_of(&record, *prop)).collect();
                (keys, record)
            })
            .collect();

        // stable sorts, least significant key first
        for (index, criterion) in self.sort_spec.criteria().iter().enumerate().rev() {
            debug!(
                prop = criterion.prop.name(),
                order = criterion.order.as_str(),
                "Sorting results"
            );
            keyed.sort_by(|(a, _), (b, _)| {
                let ordering: Ordering = a[index].cmp(&b[index]);
                if criterion.order.is_descending() {
                    ordering.reverse()
                } else {
                    ordering
                }
            });
        }

        keyed.into_iter().map(|(_, record)| record).collect()
    }

    fn group_rules(&self, records: &[R], group_by: &GroupBy<P>) -> Vec<(String, GroupRule)> {
        match &group_by.ranges {
            Some(ranges) => {
                let mut rules: Vec<(String, GroupRule)> = ranges
                    .iter()
                    .map(|(name, values)| (name.clone(), GroupRule::AnyOf(values.clone())))
                    .collect();
                if group_by.include_missing {
                    let grouped: Vec<PropValue> =
                        ranges.iter().flat_map(|(_, values)| values.clone()).collect();
                    rules.push((UNGROUPED.to_string(), GroupRule::NoneOf(grouped)));
                }
                rules
            }
            None => {
                // values that display alike share a group so names stay unique
                let mut groups: Vec<(String, Vec<PropValue>)> = Vec::new();
                for record in records {
                    let value = self.value_of(record, group_by.prop);
                    let name = format!("{} with value {}", group_by.prop.name(), value);
                    match groups.iter_mut().find(|(existing, _)| *existing == name) {
                        Some((_, values)) => {
                            if !values.contains(&value) {
                                values.push(value);
                            }
                        }
                        None => groups.push((name, vec![value])),
                    }
                }
                groups
                    .into_iter()
                    .map(|(name, values)| (name, GroupRule::AnyOf(values)))
                    .collect()
            }
        }
    }

    fn run_group_by(&self, records: Vec<R>, group_by: &GroupBy<P>) -> GroupedResults<R> {
        let values: Vec<PropValue> = records
            .iter()
            .map(|record| self.value_of(record, group_by.prop))
            .collect();

        let groups = self
            .group_rules(&records, group_by)
            .into_iter()
            .map(|(name, rule)| {
                let members = records
                    .iter()
                    .zip(&values)
                    .filter(|(_, value)| rule.matches(value))
                    .map(|(record, _)| record.clone())
                    .collect();
                (name, members)
            })
            .collect();

        GroupedResults { groups }
    }
}

impl<P: PropEnum, R> fmt::Debug for QueryParser<P, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueryParser")
            .field("sort_spec", &self.sort_spec)
            .field("group_by", &self.group_by)
            .finish()
    }
}
