use std::{collections::BTreeMap, fmt};

use crate::table::{FilterPredicate, PredicateError};

pub(crate) type PredicateFn = Box<dyn Fn(&str) -> Result<bool, PredicateError>>;

/// Per-column predicates combined with logical AND.
///
/// An empty set accepts every row. Adding a second predicate for a column
/// replaces the first.
///
/// ```rust
/// # use csv_table::{FilterPredicate, FilterSet, Value};
/// let filter = FilterSet::new()
///     .with("E", |v| v == "n")
///     .matching("B", FilterPredicate::LessThan(Value::Int(6)));
/// assert_eq!(filter.len(), 2);
/// ```
#[derive(Default)]
pub struct FilterSet {
    predicates: BTreeMap<String, PredicateFn>,
}

impl FilterSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an infallible predicate on `column`
    pub fn with<F>(self, column: impl Into<String>, predicate: F) -> Self
    where
        F: Fn(&str) -> bool + 'static,
    {
        self.insert(
            column.into(),
            Box::new(move |cell: &str| -> Result<bool, PredicateError> {
                Ok(predicate(cell))
            }),
        )
    }

    /// Adds a predicate that may fail; its error aborts the query that runs it
    pub fn try_with<F, E>(self, column: impl Into<String>, predicate: F) -> Self
    where
        F: Fn(&str) -> Result<bool, E> + 'static,
        E: Into<PredicateError>,
    {
        self.insert(
            column.into(),
            Box::new(move |cell: &str| -> Result<bool, PredicateError> {
                predicate(cell).map_err(Into::into)
            }),
        )
    }

    /// Adds a built-in comparison on `column`
    pub fn matching(self, column: impl Into<String>, predicate: FilterPredicate) -> Self {
        self.try_with(column, move |cell| predicate.evaluate(cell))
    }

    pub fn len(&self) -> usize {
        self.predicates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.predicates.is_empty()
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.predicates.keys().map(String::as_str)
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = (&str, &PredicateFn)> {
        self.predicates
            .iter()
            .map(|(column, predicate)| (column.as_str(), predicate))
    }

    fn insert(mut self, column: String, predicate: PredicateFn) -> Self {
        self.predicates.insert(column, predicate);
        self
    }
}

impl fmt::Debug for FilterSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FilterSet")
            .field("columns", &self.predicates.keys().collect::<Vec<_>>())
            .finish()
    }
}
