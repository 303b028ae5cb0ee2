use serde::{Deserialize, Serialize};

use triallist_core::errors::{ErrorInfo, TrialError};
use triallist_core::{Cell, Table};

/// Options for [`extend`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtendOpts {
    /// Number of copies of the frame; wins over `max_length` when both are set.
    pub reps: Option<usize>,
    /// Length budget; the result holds `max(1, floor(max_length/len))` full
    /// copies and is never longer than the budget when at least one copy fits.
    pub max_length: Option<usize>,
    /// Name for the repetition-index column; dropped when `None`.
    pub rep_ix: Option<String>,
    /// Name for the original-row-label column; dropped when `None`.
    pub row_ix: Option<String>,
}

/// Replicates a trial list a controlled number of times.
///
/// Each copy is tagged with its repetition index and each row with the label
/// it carried in the input, surfaced as columns when `rep_ix`/`row_ix` name
/// them (prepended in that order). Output labels are reset to sequential
/// positions.
pub fn extend(frame: &Table, opts: &ExtendOpts) -> Result<Table, TrialError> {
    if frame.is_empty() {
        return Err(TrialError::InvalidInput(ErrorInfo::new(
            "empty-frame",
            "extend requires a non-empty trial list",
        )));
    }
    let reps = match (opts.reps, opts.max_length) {
        (Some(reps), _) => reps,
        (None, Some(max_length)) => (max_length / frame.len()).max(1),
        (None, None) => {
            return Err(TrialError::InvalidInput(ErrorInfo::new(
                "missing-length",
                "one of reps or max_length is required",
            )));
        }
    };
    if reps == 0 {
        return Err(TrialError::InvalidInput(ErrorInfo::new(
            "zero-reps",
            "reps must be at least 1",
        )));
    }
    for tag in [opts.rep_ix.as_deref(), opts.row_ix.as_deref()].into_iter().flatten() {
        if frame.has_column(tag) {
            return Err(TrialError::InvalidInput(
                ErrorInfo::new("duplicate-column", "tag column already exists")
                    .with_context("column", tag.to_string()),
            ));
        }
    }

    let parts: Vec<&Table> = std::iter::repeat(frame).take(reps).collect();
    let mut out = Table::concat(&parts)?;

    if let Some(row_ix) = opts.row_ix.as_deref() {
        let originals: Vec<Cell> = out.labels().iter().map(|&label| Cell::Int(label)).collect();
        out.insert_column_front(row_ix, originals)?;
    }
    if let Some(rep_ix) = opts.rep_ix.as_deref() {
        let reps_col: Vec<Cell> = (0..reps)
            .flat_map(|rep| std::iter::repeat(Cell::Int(rep as i64)).take(frame.len()))
            .collect();
        out.insert_column_front(rep_ix, reps_col)?;
    }
    out.reset_labels();
    Ok(out)
}
