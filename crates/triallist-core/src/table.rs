//! In-memory trial table: ordered named columns over row-major cells.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::cell::Cell;
use crate::errors::{ErrorInfo, TrialError};

/// An ordered, column-named 2D table of [`Cell`] values.
///
/// Row order is significant (it encodes presentation order). Every row
/// carries an identity label so the pre-transformation position of a row can
/// be recovered after replication or reordering; fresh tables are labeled
/// `0..n` and labels travel with their rows unless an operation documents
/// otherwise.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<Cell>>,
    labels: Vec<i64>,
}

impl Table {
    /// Creates an empty table with the given column names.
    pub fn new(columns: Vec<String>) -> Result<Self, TrialError> {
        validate_columns(&columns)?;
        Ok(Self {
            columns,
            rows: Vec::new(),
            labels: Vec::new(),
        })
    }

    /// Creates a table from column names and row-major cell data.
    pub fn from_rows(columns: Vec<String>, rows: Vec<Vec<Cell>>) -> Result<Self, TrialError> {
        validate_columns(&columns)?;
        for (ix, row) in rows.iter().enumerate() {
            if row.len() != columns.len() {
                return Err(TrialError::InvalidInput(
                    ErrorInfo::new("row-width", "row width does not match column count")
                        .with_context("row", ix.to_string())
                        .with_context("expected", columns.len().to_string())
                        .with_context("actual", row.len().to_string()),
                ));
            }
        }
        let labels = (0..rows.len() as i64).collect();
        Ok(Self {
            columns,
            rows,
            labels,
        })
    }

    /// Appends a row, labeling it with the next sequential position.
    pub fn push_row(&mut self, row: Vec<Cell>) -> Result<(), TrialError> {
        if row.len() != self.columns.len() {
            return Err(TrialError::InvalidInput(
                ErrorInfo::new("row-width", "row width does not match column count")
                    .with_context("expected", self.columns.len().to_string())
                    .with_context("actual", row.len().to_string()),
            ));
        }
        self.labels.push(self.rows.len() as i64);
        self.rows.push(row);
        Ok(())
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// True when the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Ordered column names.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Per-row identity labels, aligned with row order.
    pub fn labels(&self) -> &[i64] {
        &self.labels
    }

    /// Replaces the identity labels wholesale.
    pub fn set_labels(&mut self, labels: Vec<i64>) -> Result<(), TrialError> {
        if labels.len() != self.rows.len() {
            return Err(TrialError::InvalidInput(
                ErrorInfo::new("label-length", "label count does not match row count")
                    .with_context("rows", self.rows.len().to_string())
                    .with_context("labels", labels.len().to_string()),
            ));
        }
        self.labels = labels;
        Ok(())
    }

    /// Resets labels to the current sequential row positions.
    pub fn reset_labels(&mut self) {
        self.labels = (0..self.rows.len() as i64).collect();
    }

    /// True when a column with this name exists.
    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c == name)
    }

    /// Resolves a column name to its position.
    pub fn column_index(&self, name: &str) -> Result<usize, TrialError> {
        self.columns.iter().position(|c| c == name).ok_or_else(|| {
            TrialError::InvalidInput(
                ErrorInfo::new("unknown-column", "no column with this name")
                    .with_context("column", name.to_string()),
            )
        })
    }

    /// Borrows the cells of one row. Panics when `ix` is out of bounds.
    pub fn row(&self, ix: usize) -> &[Cell] {
        &self.rows[ix]
    }

    /// Borrows one cell by row position and column name.
    pub fn value(&self, row: usize, column: &str) -> Result<&Cell, TrialError> {
        let col = self.column_index(column)?;
        self.rows
            .get(row)
            .map(|cells| &cells[col])
            .ok_or_else(|| {
                TrialError::InvalidInput(
                    ErrorInfo::new("row-bounds", "row position out of bounds")
                        .with_context("row", row.to_string())
                        .with_context("len", self.rows.len().to_string()),
                )
            })
    }

    /// Clones the full value sequence of one column.
    pub fn column_values(&self, name: &str) -> Result<Vec<Cell>, TrialError> {
        let col = self.column_index(name)?;
        Ok(self.rows.iter().map(|row| row[col].clone()).collect())
    }

    /// Overwrites an existing column or appends a new one at the back.
    pub fn set_column(&mut self, name: &str, values: Vec<Cell>) -> Result<(), TrialError> {
        if values.len() != self.rows.len() {
            return Err(TrialError::InvalidInput(
                ErrorInfo::new("column-length", "column length does not match row count")
                    .with_context("column", name.to_string())
                    .with_context("rows", self.rows.len().to_string())
                    .with_context("values", values.len().to_string()),
            ));
        }
        match self.columns.iter().position(|c| c == name) {
            Some(col) => {
                for (row, value) in self.rows.iter_mut().zip(values) {
                    row[col] = value;
                }
            }
            None => {
                self.columns.push(name.to_string());
                for (row, value) in self.rows.iter_mut().zip(values) {
                    row.push(value);
                }
            }
        }
        Ok(())
    }

    /// Inserts a new column at the front of the column order.
    pub fn insert_column_front(&mut self, name: &str, values: Vec<Cell>) -> Result<(), TrialError> {
        if self.has_column(name) {
            return Err(TrialError::InvalidInput(
                ErrorInfo::new("duplicate-column", "column already exists")
                    .with_context("column", name.to_string()),
            ));
        }
        if values.len() != self.rows.len() {
            return Err(TrialError::InvalidInput(
                ErrorInfo::new("column-length", "column length does not match row count")
                    .with_context("column", name.to_string())
                    .with_context("rows", self.rows.len().to_string())
                    .with_context("values", values.len().to_string()),
            ));
        }
        self.columns.insert(0, name.to_string());
        for (row, value) in self.rows.iter_mut().zip(values) {
            row.insert(0, value);
        }
        Ok(())
    }

    /// Returns a new table with only the named columns, in the given order.
    pub fn select(&self, names: &[&str]) -> Result<Table, TrialError> {
        let indices = names
            .iter()
            .map(|name| self.column_index(name))
            .collect::<Result<Vec<_>, _>>()?;
        let columns: Vec<String> = names.iter().map(|name| name.to_string()).collect();
        validate_columns(&columns)?;
        let rows = self
            .rows
            .iter()
            .map(|row| indices.iter().map(|&ix| row[ix].clone()).collect())
            .collect();
        Ok(Table {
            columns,
            rows,
            labels: self.labels.clone(),
        })
    }

    /// Returns a new table with columns renamed per `(old, new)` pairs.
    pub fn renamed(&self, pairs: &[(&str, &str)]) -> Result<Table, TrialError> {
        let mut columns = self.columns.clone();
        for (old, new) in pairs {
            let ix = self.column_index(old)?;
            columns[ix] = new.to_string();
        }
        validate_columns(&columns)?;
        Ok(Table {
            columns,
            rows: self.rows.clone(),
            labels: self.labels.clone(),
        })
    }

    /// Concatenates tables with identical column lists, preserving labels.
    pub fn concat(parts: &[&Table]) -> Result<Table, TrialError> {
        let Some(first) = parts.first() else {
            return Err(TrialError::InvalidInput(ErrorInfo::new(
                "concat-empty",
                "concat requires at least one table",
            )));
        };
        let mut out = (*first).clone();
        for part in &parts[1..] {
            if part.columns != out.columns {
                return Err(TrialError::InvalidInput(
                    ErrorInfo::new("column-mismatch", "concat requires identical column lists")
                        .with_context("expected", out.columns.join(","))
                        .with_context("actual", part.columns.join(",")),
                ));
            }
            out.rows.extend(part.rows.iter().cloned());
            out.labels.extend(part.labels.iter().copied());
        }
        Ok(out)
    }

    /// Returns a new table whose rows are `positions` of this one, in order.
    /// Positions may repeat; labels travel with their rows.
    pub fn take(&self, positions: &[usize]) -> Result<Table, TrialError> {
        for &pos in positions {
            if pos >= self.rows.len() {
                return Err(TrialError::InvalidInput(
                    ErrorInfo::new("row-bounds", "row position out of bounds")
                        .with_context("row", pos.to_string())
                        .with_context("len", self.rows.len().to_string()),
                ));
            }
        }
        let rows = positions.iter().map(|&pos| self.rows[pos].clone()).collect();
        let labels = positions.iter().map(|&pos| self.labels[pos]).collect();
        Ok(Table {
            columns: self.columns.clone(),
            rows,
            labels,
        })
    }

    /// Groups row positions by the values of one column, in the order each
    /// distinct value first appears.
    pub fn group_rows(&self, column: &str) -> Result<Vec<(Cell, Vec<usize>)>, TrialError> {
        let col = self.column_index(column)?;
        let mut order: Vec<(Cell, Vec<usize>)> = Vec::new();
        let mut lookup: BTreeMap<Cell, usize> = BTreeMap::new();
        for (ix, row) in self.rows.iter().enumerate() {
            let key = row[col].clone();
            match lookup.get(&key) {
                Some(&slot) => order[slot].1.push(ix),
                None => {
                    lookup.insert(key.clone(), order.len());
                    order.push((key, vec![ix]));
                }
            }
        }
        Ok(order)
    }

    /// Distinct values of one column, in first-appearance order.
    pub fn distinct(&self, column: &str) -> Result<Vec<Cell>, TrialError> {
        Ok(self
            .group_rows(column)?
            .into_iter()
            .map(|(key, _)| key)
            .collect())
    }

    /// Rows whose `column` value equals `value`.
    pub fn filter_eq(&self, column: &str, value: &Cell) -> Result<Table, TrialError> {
        self.filter_by(column, |cell| cell == value)
    }

    /// Rows whose `column` value differs from `value`.
    pub fn filter_ne(&self, column: &str, value: &Cell) -> Result<Table, TrialError> {
        self.filter_by(column, |cell| cell != value)
    }

    fn filter_by(
        &self,
        column: &str,
        keep: impl Fn(&Cell) -> bool,
    ) -> Result<Table, TrialError> {
        let col = self.column_index(column)?;
        let positions: Vec<usize> = self
            .rows
            .iter()
            .enumerate()
            .filter(|(_, row)| keep(&row[col]))
            .map(|(ix, _)| ix)
            .collect();
        self.take(&positions)
    }

    /// Returns a new table stably sorted by one column.
    pub fn sort_by_column(&self, column: &str) -> Result<Table, TrialError> {
        let col = self.column_index(column)?;
        let mut positions: Vec<usize> = (0..self.rows.len()).collect();
        positions.sort_by(|&a, &b| self.rows[a][col].cmp(&self.rows[b][col]));
        self.take(&positions)
    }
}

fn validate_columns(columns: &[String]) -> Result<(), TrialError> {
    if columns.is_empty() {
        return Err(TrialError::InvalidInput(ErrorInfo::new(
            "no-columns",
            "a table requires at least one column",
        )));
    }
    for (ix, name) in columns.iter().enumerate() {
        if name.is_empty() {
            return Err(TrialError::InvalidInput(ErrorInfo::new(
                "empty-column-name",
                "column names must be non-empty",
            )));
        }
        if columns[..ix].contains(name) {
            return Err(TrialError::InvalidInput(
                ErrorInfo::new("duplicate-column", "column names must be unique")
                    .with_context("column", name.to_string()),
            ));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Table {
        Table::from_rows(
            vec!["k".into(), "v".into()],
            vec![
                vec![Cell::from("a"), Cell::from(1)],
                vec![Cell::from("b"), Cell::from(2)],
                vec![Cell::from("a"), Cell::from(3)],
            ],
        )
        .unwrap()
    }

    #[test]
    fn take_repeats_rows_and_labels() {
        let taken = sample().take(&[2, 0, 2]).unwrap();
        assert_eq!(taken.len(), 3);
        assert_eq!(taken.labels(), &[2, 0, 2]);
        assert_eq!(taken.value(0, "v").unwrap(), &Cell::from(3));
    }

    #[test]
    fn group_rows_first_appearance_order() {
        let groups = sample().group_rows("k").unwrap();
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].0, Cell::from("a"));
        assert_eq!(groups[0].1, vec![0, 2]);
        assert_eq!(groups[1].1, vec![1]);
    }

    #[test]
    fn set_column_overwrites_or_appends() {
        let mut table = sample();
        table
            .set_column("v", vec![Cell::from(9), Cell::from(9), Cell::from(9)])
            .unwrap();
        assert_eq!(table.columns().len(), 2);
        table
            .set_column("w", vec![Cell::from(0), Cell::from(0), Cell::from(0)])
            .unwrap();
        assert_eq!(table.columns(), &["k", "v", "w"]);
    }

    #[test]
    fn concat_rejects_column_mismatch() {
        let other = Table::from_rows(vec!["x".into()], vec![vec![Cell::from(1)]]).unwrap();
        let err = Table::concat(&[&sample(), &other]).unwrap_err();
        assert_eq!(err.info().code, "column-mismatch");
    }
}
