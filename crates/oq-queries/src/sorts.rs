//! Query Sort Orders
//!
//! Sort orders define how query results should be ordered.

use oq_core::{PropEnum, QueryError, QueryResult};

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SortOrder {
    /// Ascending order (A-Z, 1-9, oldest first)
    #[default]
    Asc,
    /// Descending order (Z-A, 9-1, newest first)
    Desc,
}

impl SortOrder {
    pub const ALL: &'static [SortOrder] = &[Self::Asc, Self::Desc];

    /// Parse from string, ignoring case
    pub fn from_string(value: &str) -> QueryResult<Self> {
        match value.trim().to_lowercase().as_str() {
            "asc" | "ascending" => Ok(Self::Asc),
            "desc" | "descending" => Ok(Self::Desc),
            _ => Err(QueryError::parse_query(format!(
                "Could not find sort order '{}'. Available sort orders are {}",
                value,
                Self::ALL
                    .iter()
                    .map(|o| o.name())
                    .collect::<Vec<_>>()
                    .join(",")
            ))),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }

    /// Get the opposite direction
    pub fn reverse(&self) -> Self {
        match self {
            Self::Asc => Self::Desc,
            Self::Desc => Self::Asc,
        }
    }

    pub fn is_descending(&self) -> bool {
        matches!(self, Self::Desc)
    }
}

/// A single sort criterion
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortCriterion<P> {
    /// The property to sort by
    pub prop: P,
    /// The sort direction
    pub order: SortOrder,
}

impl<P: PropEnum> SortCriterion<P> {
    pub fn new(prop: P, order: SortOrder) -> Self {
        Self { prop, order }
    }

    pub fn asc(prop: P) -> Self {
        Self::new(prop, SortOrder::Asc)
    }

    pub fn desc(prop: P) -> Self {
        Self::new(prop, SortOrder::Desc)
    }

    pub fn reversed(mut self) -> Self {
        self.order = self.order.reverse();
        self
    }
}

/// Ordered collection of sort criteria, first criterion takes precedence.
///
/// A property appears at most once; setting it again changes its direction
/// but keeps its position.
#[derive(Debug, Clone)]
pub struct SortSpec<P> {
    criteria: Vec<SortCriterion<P>>,
}

impl<P: PropEnum> SortSpec<P> {
    pub fn new() -> Self {
        Self { criteria: vec![] }
    }

    /// Add a criterion or update the direction of an existing one
    pub fn set(&mut self, prop: P, order: SortOrder) -> &mut Self {
        match self.criteria.iter_mut().find(|c| c.prop == prop) {
            Some(existing) => existing.order = order,
            None => self.criteria.push(SortCriterion::new(prop, order)),
        }
        self
    }

    /// Builder form of [`SortSpec::set`]
    pub fn then(mut self, prop: P, order: SortOrder) -> Self {
        self.set(prop, order);
        self
    }

    pub fn criteria(&self) -> &[SortCriterion<P>] {
        &self.criteria
    }

    pub fn is_empty(&self) -> bool {
        self.criteria.is_empty()
    }

    pub fn len(&self) -> usize {
        self.criteria.len()
    }

    /// Get the primary (first) sort criterion
    pub fn primary(&self) -> Option<&SortCriterion<P>> {
        self.criteria.first()
    }

    pub fn sorts_by(&self, prop: P) -> bool {
        self.criteria.iter().any(|c| c.prop == prop)
    }

    pub fn clear(&mut self) {
        self.criteria.clear();
    }
}

impl<P: PropEnum> Default for SortSpec<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: PropEnum> FromIterator<(P, SortOrder)> for SortSpec<P> {
    fn from_iter<I: IntoIterator<Item = (P, SortOrder)>>(iter: I) -> Self {
        let mut spec = Self::new();
        for (prop, order) in iter {
            spec.set(prop, order);
        }
        spec
    }
}
