use serde::{Deserialize, Serialize};

use triallist_core::errors::{ErrorInfo, TrialError};
use triallist_core::rng::RngHandle;
use triallist_core::{Cell, ShuffledCycle, Table};

/// Selection of companion columns to pull from a source table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub enum ColumnSpec {
    /// Every source column, under its own name.
    #[default]
    All,
    /// The named source columns, under their own names.
    Names(Vec<String>),
    /// `(source, output)` pairs renaming companion columns on the way in.
    Rename(Vec<(String, String)>),
}

impl ColumnSpec {
    pub(crate) fn resolve(&self, source: &Table) -> Result<Vec<(String, String)>, TrialError> {
        match self {
            ColumnSpec::All => Ok(source
                .columns()
                .iter()
                .map(|name| (name.clone(), name.clone()))
                .collect()),
            ColumnSpec::Names(names) => {
                for name in names {
                    source.column_index(name)?;
                }
                Ok(names.iter().map(|name| (name.clone(), name.clone())).collect())
            }
            ColumnSpec::Rename(pairs) => {
                for (src, _) in pairs {
                    source.column_index(src)?;
                }
                Ok(pairs.clone())
            }
        }
    }
}

impl From<&str> for ColumnSpec {
    fn from(name: &str) -> Self {
        ColumnSpec::Names(vec![name.to_string()])
    }
}

impl From<Vec<&str>> for ColumnSpec {
    fn from(names: Vec<&str>) -> Self {
        ColumnSpec::Names(names.into_iter().map(str::to_string).collect())
    }
}

impl From<Vec<(&str, &str)>> for ColumnSpec {
    fn from(pairs: Vec<(&str, &str)>) -> Self {
        ColumnSpec::Rename(
            pairs
                .into_iter()
                .map(|(src, dst)| (src.to_string(), dst.to_string()))
                .collect(),
        )
    }
}

/// Options for [`generate`] and the grouped generation entry points.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GenerateOpts {
    /// Companion columns to pull from the source.
    pub cols: ColumnSpec,
    /// Seed for pass shuffling; `None` cycles the source in row order.
    pub seed: Option<u64>,
}

/// Unbounded generator over a source table's rows.
///
/// Backed by a [`ShuffledCycle`] over the source row positions: every source
/// row is emitted exactly once per full pass, and passes after the first are
/// independently reordered when seeded. Unseeded generators cycle the source
/// sequentially. Generator state is call-scoped — never reuse an instance
/// across different tables, since its cursor and RNG state belong to the
/// call that created it.
#[derive(Debug)]
pub struct RowGenerator<'a> {
    source: &'a Table,
    cycle: ShuffledCycle,
}

impl<'a> RowGenerator<'a> {
    /// Builds a generator over `source`, shuffling passes when seeded.
    pub fn new(source: &'a Table, seed: Option<u64>) -> Result<Self, TrialError> {
        Self::with_rng(source, seed.map(RngHandle::from_seed))
    }

    /// Builds a generator with an explicit RNG handle (or none).
    pub fn with_rng(source: &'a Table, rng: Option<RngHandle>) -> Result<Self, TrialError> {
        if source.is_empty() {
            return Err(TrialError::InvalidInput(ErrorInfo::new(
                "empty-source",
                "cannot generate rows from an empty source",
            )));
        }
        Ok(Self {
            source,
            cycle: ShuffledCycle::new(source.len(), rng)?,
        })
    }

    /// The table this generator draws from.
    pub fn source(&self) -> &'a Table {
        self.source
    }

    /// Next source row position in the cycle.
    pub fn next_position(&mut self) -> usize {
        self.cycle.next_index()
    }

    /// Next source row's cells.
    pub fn next_row(&mut self) -> &'a [Cell] {
        let position = self.next_position();
        self.source.row(position)
    }

    /// Cycle state, for inspection.
    pub fn cycle(&self) -> &ShuffledCycle {
        &self.cycle
    }
}

/// Enriches `frame` with companion columns drawn circularly from `source`.
///
/// Exactly `frame.len()` rows are pulled from the cycle and written in,
/// aligned row-for-row: existing columns with a matching output name are
/// overwritten, new names are appended. Frame labels are preserved.
pub fn generate(frame: &Table, source: &Table, opts: &GenerateOpts) -> Result<Table, TrialError> {
    let mut generator = RowGenerator::new(source, opts.seed)?;
    let mapping = opts.cols.resolve(source)?;
    let positions: Vec<usize> = (0..frame.len())
        .map(|_| generator.next_position())
        .collect();

    let mut out = frame.clone();
    for (src, dst) in &mapping {
        let col = source.column_index(src)?;
        let values: Vec<Cell> = positions
            .iter()
            .map(|&position| source.row(position)[col].clone())
            .collect();
        out.set_column(dst, values)?;
    }
    Ok(out)
}
