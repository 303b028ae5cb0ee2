use serde::{Deserialize, Serialize};

use triallist_core::errors::{ErrorInfo, TrialError};
use triallist_core::rng::RngHandle;
use triallist_core::{Cell, Table};

/// Options for [`expand`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpandOpts {
    /// Tag values for valid and invalid trials, in that order.
    pub values: (Cell, Cell),
    /// Target fraction of valid trials in the output, strictly in (0,1).
    pub ratio: f64,
    /// Draw invalid trials as a strict subset of the valid trials instead of
    /// duplicating the whole set.
    pub sample: bool,
    /// Seed for the sampling RNG; `None` means non-reproducible.
    pub seed: Option<u64>,
}

impl Default for ExpandOpts {
    fn default() -> Self {
        Self {
            values: (Cell::Int(1), Cell::Int(0)),
            ratio: 0.5,
            sample: false,
            seed: None,
        }
    }
}

/// Copies or samples rows to satisfy the valid:invalid ratio.
///
/// A new column `name` tags originally-valid rows with `values.0` and the
/// invalid set with `values.1`; it is inserted as the first column and row
/// labels are reset to sequential positions. Valid rows come first, then
/// invalid — presentation order must be re-shuffled by the caller.
///
/// In duplicate mode the replication factor is
/// `floor(ratio / (1 - ratio))`: integer truncation, so the achieved ratio
/// can sit below the requested target for small inputs. The approximation is
/// intentional; callers needing exact ratios must choose input sizes
/// accordingly. Ratios below 0.5 leave no full copy to duplicate and are
/// rejected — use sample mode for those.
pub fn expand(valid: &Table, name: &str, opts: &ExpandOpts) -> Result<Table, TrialError> {
    if valid.is_empty() {
        return Err(TrialError::InvalidInput(ErrorInfo::new(
            "empty-frame",
            "expand requires a non-empty trial list",
        )));
    }
    if !(opts.ratio > 0.0 && opts.ratio < 1.0) {
        return Err(TrialError::InvalidInput(
            ErrorInfo::new("ratio-range", "ratio must lie strictly between 0 and 1")
                .with_context("ratio", opts.ratio.to_string()),
        ));
    }
    if valid.has_column(name) {
        return Err(TrialError::InvalidInput(
            ErrorInfo::new("duplicate-column", "tag column already exists")
                .with_context("column", name.to_string()),
        ));
    }

    let num_trials = valid.len();
    let (valid_part, invalid_part) = if !opts.sample {
        let num_valid = (num_trials as f64 * opts.ratio) / (1.0 - opts.ratio);
        let copies = (num_valid / num_trials as f64) as usize;
        if copies == 0 {
            return Err(TrialError::InvalidInput(
                ErrorInfo::new("ratio-too-low", "duplicate mode needs a ratio of at least 0.5")
                    .with_context("ratio", opts.ratio.to_string())
                    .with_hint("use sample mode for ratios below 0.5"),
            ));
        }
        let parts: Vec<&Table> = std::iter::repeat(valid).take(copies).collect();
        (Table::concat(&parts)?, valid.clone())
    } else {
        let num_invalid =
            ((num_trials as f64 * (1.0 - opts.ratio)) / opts.ratio) as usize;
        if num_invalid > num_trials {
            return Err(TrialError::InsufficientData(
                ErrorInfo::new("sample-size", "requested sample exceeds the valid pool")
                    .with_context("requested", num_invalid.to_string())
                    .with_context("available", num_trials.to_string()),
            ));
        }
        let mut rng = RngHandle::from_optional_seed(opts.seed);
        let picked = rand::seq::index::sample(&mut rng, num_trials, num_invalid).into_vec();
        (valid.clone(), valid.take(&picked)?)
    };

    let mut tagged_valid = valid_part;
    tagged_valid.insert_column_front(name, vec![opts.values.0.clone(); tagged_valid.len()])?;
    let mut tagged_invalid = invalid_part;
    tagged_invalid.insert_column_front(name, vec![opts.values.1.clone(); tagged_invalid.len()])?;

    let mut frame = Table::concat(&[&tagged_valid, &tagged_invalid])?;
    frame.reset_labels();
    Ok(frame)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn trials(n: usize) -> Table {
        let rows = (0..n).map(|i| vec![Cell::from(i as i64)]).collect();
        Table::from_rows(vec!["stim".into()], rows).unwrap()
    }

    #[test]
    fn duplicate_mode_row_arithmetic() {
        // ratio 0.75 -> copies = 3, output = 3n valid + n invalid.
        let frame = expand(
            &trials(4),
            "valid",
            &ExpandOpts {
                ratio: 0.75,
                ..ExpandOpts::default()
            },
        )
        .unwrap();
        assert_eq!(frame.len(), 16);
        let tags = frame.column_values("valid").unwrap();
        assert_eq!(tags.iter().filter(|t| **t == Cell::Int(1)).count(), 12);
        assert_eq!(tags.iter().filter(|t| **t == Cell::Int(0)).count(), 4);
    }

    #[test]
    fn low_ratio_duplicate_mode_is_rejected() {
        let err = expand(
            &trials(4),
            "valid",
            &ExpandOpts {
                ratio: 0.25,
                ..ExpandOpts::default()
            },
        )
        .unwrap_err();
        assert_eq!(err.info().code, "ratio-too-low");
    }
}
