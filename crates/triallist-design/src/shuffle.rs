use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use triallist_core::errors::{ErrorInfo, TrialError};
use triallist_core::rng::RngHandle;
use triallist_core::{Cell, Table};

/// Options for [`simple_shuffle`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimpleShuffleOpts {
    /// Optional grouping column; rows then shuffle only within their group's
    /// positions and never move across groups.
    pub block: Option<String>,
    /// Number of sequential permutations to apply.
    pub times: usize,
    /// Seed for the permutation RNG; `None` means non-reproducible.
    pub seed: Option<u64>,
}

impl Default for SimpleShuffleOpts {
    fn default() -> Self {
        Self {
            block: None,
            times: 10,
            seed: None,
        }
    }
}

/// Options for [`smart_shuffle`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SmartShuffleOpts {
    /// Optional grouping column; the search runs independently per group.
    pub block: Option<String>,
    /// Seed for the permutation RNG; `None` means non-reproducible.
    pub seed: Option<u64>,
    /// Maximum permutations drawn per group before settling for the best.
    pub lim: usize,
}

impl Default for SmartShuffleOpts {
    fn default() -> Self {
        Self {
            block: None,
            seed: None,
            lim: 10_000,
        }
    }
}

/// Search outcome for one shuffled group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupShuffleReport {
    /// Group key, or `None` for a whole-table search.
    pub key: Option<Cell>,
    /// Permutations drawn before the search stopped.
    pub attempts: usize,
    /// Adjacent-equal pairs remaining in the winning order.
    pub repeats: usize,
    /// True when the attempt cap ran out before reaching zero repeats.
    pub exhausted: bool,
}

/// Diagnostic report accompanying every [`smart_shuffle`] result.
///
/// Cap exhaustion is graceful degradation, not a failure: the table returned
/// alongside this report is always usable, and the report quantifies how far
/// each group's best-found order sits from the zero-repeat goal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShuffleReport {
    /// One entry per searched group, in group first-appearance order.
    pub groups: Vec<GroupShuffleReport>,
}

impl ShuffleReport {
    /// True when every group reached zero adjacent repeats.
    pub fn is_clean(&self) -> bool {
        self.groups.iter().all(|group| group.repeats == 0)
    }

    /// Total adjacent-equal pairs remaining across all groups.
    pub fn total_repeats(&self) -> usize {
        self.groups.iter().map(|group| group.repeats).sum()
    }
}

/// Shuffles trial order, a few times over for mixing.
///
/// The net effect is a single random permutation per group; repeated
/// application mirrors how presentation lists are conventionally mixed.
/// Labels travel with their rows.
pub fn simple_shuffle(frame: &Table, opts: &SimpleShuffleOpts) -> Result<Table, TrialError> {
    let groups = grouping(frame, opts.block.as_deref())?;
    let mut rng = RngHandle::from_optional_seed(opts.seed);
    let mut positions: Vec<usize> = (0..frame.len()).collect();
    for (_, group) in groups {
        let mut perm = group.clone();
        for _ in 0..opts.times {
            perm.shuffle(&mut rng);
        }
        for (slot, source) in group.iter().zip(perm) {
            positions[*slot] = source;
        }
    }
    frame.take(&positions)
}

/// Shuffles trial order while minimizing back-to-back repeats in `col`.
///
/// Per group, up to `lim` fresh permutations are drawn; the best seen by
/// adjacent-equal count on `col` wins (strict improvement only, starting
/// from the incoming order), stopping early at zero. This is a stochastic
/// search with no optimality guarantee beyond a non-increasing best-so-far.
/// The winning order keeps the incoming label sequence positionally, so
/// label-based joins made before the shuffle stay valid.
pub fn smart_shuffle(
    frame: &Table,
    col: &str,
    opts: &SmartShuffleOpts,
) -> Result<(Table, ShuffleReport), TrialError> {
    if opts.lim == 0 {
        return Err(TrialError::InvalidInput(ErrorInfo::new(
            "attempt-cap",
            "lim must allow at least one attempt",
        )));
    }
    let values = frame.column_values(col)?;
    let groups = grouping(frame, opts.block.as_deref())?;
    let mut rng = RngHandle::from_optional_seed(opts.seed);
    let mut positions: Vec<usize> = (0..frame.len()).collect();
    let mut reports = Vec::with_capacity(groups.len());

    for (key, group) in groups {
        let mut best = group.clone();
        let mut best_repeats = adjacent_repeats(&best, &values);
        let mut attempts = 0;
        while best_repeats > 0 && attempts < opts.lim {
            attempts += 1;
            let mut candidate = group.clone();
            candidate.shuffle(&mut rng);
            let repeats = adjacent_repeats(&candidate, &values);
            if repeats < best_repeats {
                best = candidate;
                best_repeats = repeats;
            }
        }
        reports.push(GroupShuffleReport {
            key,
            attempts,
            repeats: best_repeats,
            exhausted: best_repeats > 0 && attempts == opts.lim,
        });
        for (slot, source) in group.iter().zip(best) {
            positions[*slot] = source;
        }
    }

    let mut out = frame.take(&positions)?;
    out.set_labels(frame.labels().to_vec())?;
    Ok((out, ShuffleReport { groups: reports }))
}

fn adjacent_repeats(order: &[usize], values: &[Cell]) -> usize {
    order
        .windows(2)
        .filter(|pair| values[pair[0]] == values[pair[1]])
        .count()
}

fn grouping(
    frame: &Table,
    block: Option<&str>,
) -> Result<Vec<(Option<Cell>, Vec<usize>)>, TrialError> {
    match block {
        None => Ok(vec![(None, (0..frame.len()).collect())]),
        Some(block) => Ok(frame
            .group_rows(block)?
            .into_iter()
            .map(|(key, positions)| (Some(key), positions))
            .collect()),
    }
}
