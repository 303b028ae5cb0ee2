use rand::RngCore;
use serde::{Deserialize, Serialize};

use triallist_core::errors::{ErrorInfo, TrialError};
use triallist_core::rng::RngHandle;
use triallist_core::{Cell, ShuffledCycle, Table};

/// Options for [`add_block`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockOpts {
    /// Name of the new block column.
    pub name: String,
    /// Offset added to every block id after assignment.
    pub start_at: i64,
    /// Optional grouping column; block ids are then balanced within each
    /// group rather than globally.
    pub id_col: Option<String>,
    /// Seed for the id-shuffling RNG; `None` means non-reproducible.
    pub seed: Option<u64>,
}

impl Default for BlockOpts {
    fn default() -> Self {
        Self {
            name: "block".to_string(),
            start_at: 0,
            id_col: None,
            seed: None,
        }
    }
}

/// Assigns a block id to every trial and sorts the list into block order.
///
/// `num_blocks = floor(len/size)` ids are dispensed round-robin from a
/// [`ShuffledCycle`]: each full pass hands out every id exactly once before
/// any id repeats, and the pass order reshuffles only at wraparound, so
/// block occupancy stays near-uniform. Trailing rows beyond
/// `num_blocks * size` still draw ids from the cycle; no row is dropped.
/// With `id_col`, each group gets its own cycle (fresh cursor, sub-seeded
/// from the parent RNG stream) so ids are balanced within each group rather
/// than across the whole list.
pub fn add_block(frame: &Table, size: usize, opts: &BlockOpts) -> Result<Table, TrialError> {
    if size == 0 {
        return Err(TrialError::InvalidInput(ErrorInfo::new(
            "block-size",
            "block size must be at least 1",
        )));
    }
    let num_blocks = frame.len() / size;
    if num_blocks < 1 {
        return Err(TrialError::InvalidInput(
            ErrorInfo::new("block-count", "frame is shorter than a single block")
                .with_context("rows", frame.len().to_string())
                .with_context("size", size.to_string()),
        ));
    }
    if frame.has_column(&opts.name) {
        return Err(TrialError::InvalidInput(
            ErrorInfo::new("duplicate-column", "block column already exists")
                .with_context("column", opts.name.clone()),
        ));
    }

    let mut parent = RngHandle::from_optional_seed(opts.seed);
    let mut ids = vec![0i64; frame.len()];
    match opts.id_col.as_deref() {
        None => {
            let mut cycle = ShuffledCycle::new(num_blocks, Some(parent))?;
            for id in ids.iter_mut() {
                *id = cycle.next_index() as i64;
            }
        }
        Some(id_col) => {
            for (_, positions) in frame.group_rows(id_col)? {
                let sub = RngHandle::from_seed(parent.next_u64());
                let mut cycle = ShuffledCycle::new(num_blocks, Some(sub))?;
                for pos in positions {
                    ids[pos] = cycle.next_index() as i64;
                }
            }
        }
    }

    let mut out = frame.clone();
    let cells: Vec<Cell> = ids
        .into_iter()
        .map(|id| Cell::Int(id + opts.start_at))
        .collect();
    out.set_column(&opts.name, cells)?;
    out.sort_by_column(&opts.name)
}
