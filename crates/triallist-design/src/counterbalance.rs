use indexmap::IndexMap;
use itertools::Itertools;
use serde::{Deserialize, Serialize};

use triallist_core::errors::{ErrorInfo, TrialError};
use triallist_core::{Cell, Table};

/// Ordered mapping from independent-variable names to their possible values.
///
/// Insertion order is significant: it fixes both the column order of the
/// generated table and the nesting order of the Cartesian product (first
/// inserted variable outermost, last varies fastest). A bare scalar is a
/// one-element value set; use [`ConditionSet::insert_one`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConditionSet {
    factors: IndexMap<String, Vec<Cell>>,
}

impl ConditionSet {
    /// Creates an empty condition set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a variable with its full value set, replacing any previous entry.
    pub fn insert(&mut self, name: impl Into<String>, values: Vec<Cell>) -> &mut Self {
        self.factors.insert(name.into(), values);
        self
    }

    /// Adds a variable with a single possible value.
    pub fn insert_one(&mut self, name: impl Into<String>, value: impl Into<Cell>) -> &mut Self {
        self.factors.insert(name.into(), vec![value.into()]);
        self
    }

    /// Number of variables.
    pub fn len(&self) -> usize {
        self.factors.len()
    }

    /// True when no variables were added.
    pub fn is_empty(&self) -> bool {
        self.factors.is_empty()
    }

    /// Variable names in insertion order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.factors.keys().map(String::as_str)
    }

    pub(crate) fn factors(&self) -> &IndexMap<String, Vec<Cell>> {
        &self.factors
    }
}

/// Generates all independent-variable combinations as a trial table.
///
/// One row per element of the Cartesian product of the value sets, in
/// product order. Column order follows `order` when given (which must name
/// every variable exactly once), else insertion order. No randomness is
/// involved; identical inputs always produce the identical table.
pub fn counterbalance(
    conditions: &ConditionSet,
    order: Option<&[&str]>,
) -> Result<Table, TrialError> {
    if conditions.is_empty() {
        return Err(TrialError::InvalidInput(ErrorInfo::new(
            "empty-conditions",
            "counterbalancing requires at least one variable",
        )));
    }
    for (name, values) in conditions.factors() {
        if values.is_empty() {
            return Err(TrialError::InvalidInput(
                ErrorInfo::new("empty-values", "variable has an empty value set")
                    .with_context("variable", name.clone()),
            ));
        }
    }

    let columns: Vec<String> = conditions.factors().keys().cloned().collect();
    let rows: Vec<Vec<Cell>> = conditions
        .factors()
        .values()
        .map(|values| values.iter().cloned())
        .multi_cartesian_product()
        .collect();
    let frame = Table::from_rows(columns, rows)?;

    match order {
        None => Ok(frame),
        Some(order) => {
            if order.len() != frame.columns().len() {
                return Err(TrialError::InvalidInput(
                    ErrorInfo::new("order-mismatch", "order must name every variable exactly once")
                        .with_context("variables", frame.columns().len().to_string())
                        .with_context("order", order.len().to_string()),
                ));
            }
            frame.select(order)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn singleton_values_produce_constant_columns() {
        let mut conditions = ConditionSet::new();
        conditions.insert("cue", vec![Cell::from("left"), Cell::from("right")]);
        conditions.insert_one("soa", 200);
        let frame = counterbalance(&conditions, None).unwrap();
        assert_eq!(frame.len(), 2);
        assert_eq!(frame.value(0, "soa").unwrap(), &Cell::from(200));
        assert_eq!(frame.value(1, "soa").unwrap(), &Cell::from(200));
    }

    #[test]
    fn last_variable_varies_fastest() {
        let mut conditions = ConditionSet::new();
        conditions.insert("outer", vec![Cell::from("a"), Cell::from("b")]);
        conditions.insert("inner", vec![Cell::from(0), Cell::from(1)]);
        let frame = counterbalance(&conditions, None).unwrap();
        let outer: Vec<_> = frame.column_values("outer").unwrap();
        let inner: Vec<_> = frame.column_values("inner").unwrap();
        assert_eq!(
            outer,
            vec![Cell::from("a"), Cell::from("a"), Cell::from("b"), Cell::from("b")]
        );
        assert_eq!(
            inner,
            vec![Cell::from(0), Cell::from(1), Cell::from(0), Cell::from(1)]
        );
    }
}
