use std::collections::btree_map::Entry;
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use triallist_core::errors::{ErrorInfo, TrialError};
use triallist_core::rng::{derive_substream_seed, RngHandle};
use triallist_core::{Cell, Table};

use crate::generator::{GenerateOpts, RowGenerator};

/// Column pairing between a trial frame and a companion source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum MatchKey {
    /// The same column name on both sides.
    Same(String),
    /// `(frame column, source column)` when the sides name the key
    /// differently.
    Pair(String, String),
}

impl MatchKey {
    fn frame_col(&self) -> &str {
        match self {
            MatchKey::Same(name) => name,
            MatchKey::Pair(frame, _) => frame,
        }
    }

    fn source_col(&self) -> &str {
        match self {
            MatchKey::Same(name) => name,
            MatchKey::Pair(_, source) => source,
        }
    }
}

impl From<&str> for MatchKey {
    fn from(name: &str) -> Self {
        MatchKey::Same(name.to_string())
    }
}

/// Lazily populated per-group row generators over a source map.
///
/// One [`RowGenerator`] is created per distinct group key on first use and
/// never re-created or evicted for the lifetime of the value. With a master
/// seed, each group's generator is seeded with
/// `derive_substream_seed(master, key.stable_id())` — a pure function of the
/// seed and the key identity, so grouped results never depend on the order
/// groups are visited. Instances are call-scoped; never reuse one across
/// different tables.
#[derive(Debug)]
pub struct GroupedGenerator<'a> {
    sources: &'a BTreeMap<Cell, Table>,
    master_seed: Option<u64>,
    generators: BTreeMap<Cell, RowGenerator<'a>>,
}

impl<'a> GroupedGenerator<'a> {
    /// Builds a grouped generator over per-key companion sources.
    pub fn new(sources: &'a BTreeMap<Cell, Table>, seed: Option<u64>) -> Self {
        Self {
            sources,
            master_seed: seed,
            generators: BTreeMap::new(),
        }
    }

    /// Draws the next companion row position for the given group key,
    /// returning it with the group's source table.
    pub fn next_position(&mut self, key: &Cell) -> Result<(usize, &'a Table), TrialError> {
        let generator = match self.generators.entry(key.clone()) {
            Entry::Occupied(occupied) => occupied.into_mut(),
            Entry::Vacant(vacant) => {
                let source = self.sources.get(key).ok_or_else(|| {
                    TrialError::InsufficientData(
                        ErrorInfo::new("missing-group-source", "no companion source for group")
                            .with_context("key", key.to_string()),
                    )
                })?;
                if source.is_empty() {
                    return Err(TrialError::InsufficientData(
                        ErrorInfo::new("empty-group-source", "companion source for group is empty")
                            .with_context("key", key.to_string()),
                    ));
                }
                let rng = self
                    .master_seed
                    .map(|master| RngHandle::from_seed(derive_substream_seed(master, key.stable_id())));
                vacant.insert(RowGenerator::with_rng(source, rng)?)
            }
        };
        let position = generator.next_position();
        Ok((position, generator.source()))
    }
}

/// Splits `frame` on the values of `by` and pulls companion rows per group
/// from the matching `sources` entry.
///
/// Each group cycles its own source independently (every source row once per
/// pass). With a fixed seed the result depends only on the seed and the
/// group key identities. `InsufficientData` is raised eagerly for a group
/// with no source entry or an empty one.
pub fn generate_by_group(
    frame: &Table,
    by: &str,
    sources: &BTreeMap<Cell, Table>,
    opts: &GenerateOpts,
) -> Result<Table, TrialError> {
    let keys = frame.column_values(by)?;
    let mut out = frame.clone();
    if keys.is_empty() {
        return Ok(out);
    }

    let mut grouped = GroupedGenerator::new(sources, opts.seed);
    let mut mapping: Option<Vec<(String, String)>> = None;
    let mut drawn: Vec<(usize, &Table)> = Vec::with_capacity(keys.len());
    for key in &keys {
        let (position, source) = grouped.next_position(key)?;
        if mapping.is_none() {
            mapping = Some(opts.cols.resolve(source)?);
        }
        drawn.push((position, source));
    }
    let Some(mapping) = mapping else {
        return Ok(out);
    };

    for (src, dst) in &mapping {
        let values: Vec<Cell> = drawn
            .iter()
            .map(|(position, source)| source.value(*position, src).map(Cell::clone))
            .collect::<Result<_, _>>()?;
        out.set_column(dst, values)?;
    }
    Ok(out)
}

/// Pulls companion rows whose key EQUALS each trial's key.
///
/// The source map is built by selecting, per distinct value of the frame's
/// key column, the source rows with the same value in the source's key
/// column; generation then proceeds as [`generate_by_group`].
pub fn generate_matches(
    frame: &Table,
    source: &Table,
    on: &MatchKey,
    opts: &GenerateOpts,
) -> Result<Table, TrialError> {
    let sources = build_source_map(frame, source, on, false)?;
    generate_by_group(frame, on.frame_col(), &sources, opts)
}

/// Pulls companion rows whose key DIFFERS from each trial's key — foil and
/// distractor values guaranteed never to collide with the trial's own.
pub fn generate_but_not(
    frame: &Table,
    source: &Table,
    on: &MatchKey,
    opts: &GenerateOpts,
) -> Result<Table, TrialError> {
    let sources = build_source_map(frame, source, on, true)?;
    generate_by_group(frame, on.frame_col(), &sources, opts)
}

fn build_source_map(
    frame: &Table,
    source: &Table,
    on: &MatchKey,
    mismatch: bool,
) -> Result<BTreeMap<Cell, Table>, TrialError> {
    let mut sources = BTreeMap::new();
    for key in frame.distinct(on.frame_col())? {
        let subset = if mismatch {
            source.filter_ne(on.source_col(), &key)?
        } else {
            source.filter_eq(on.source_col(), &key)?
        };
        if subset.is_empty() {
            return Err(TrialError::InsufficientData(
                ErrorInfo::new("empty-group-source", "no source rows satisfy the group key")
                    .with_context("key", key.to_string())
                    .with_context(
                        "relation",
                        if mismatch { "mismatching" } else { "matching" },
                    ),
            ));
        }
        sources.insert(key, subset);
    }
    Ok(sources)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words() -> Table {
        Table::from_rows(
            vec!["category".into(), "word".into()],
            vec![
                vec![Cell::from("animal"), Cell::from("fox")],
                vec![Cell::from("animal"), Cell::from("owl")],
                vec![Cell::from("tool"), Cell::from("saw")],
                vec![Cell::from("tool"), Cell::from("axe")],
            ],
        )
        .unwrap()
    }

    fn trials() -> Table {
        let rows = (0..8)
            .map(|i| {
                vec![
                    Cell::from(if i % 2 == 0 { "animal" } else { "tool" }),
                    Cell::from(i as i64),
                ]
            })
            .collect();
        Table::from_rows(vec!["category".into(), "trial".into()], rows).unwrap()
    }

    #[test]
    fn missing_group_source_is_insufficient_data() {
        let sources = BTreeMap::new();
        let err = generate_by_group(&trials(), "category", &sources, &GenerateOpts::default())
            .unwrap_err();
        assert_eq!(err.info().code, "missing-group-source");
    }

    #[test]
    fn but_not_with_a_single_key_pool_is_insufficient_data() {
        let source = words().filter_eq("category", &Cell::from("animal")).unwrap();
        let frame = trials().filter_eq("category", &Cell::from("animal")).unwrap();
        let err = generate_but_not(
            &frame,
            &source,
            &MatchKey::from("category"),
            &GenerateOpts::default(),
        )
        .unwrap_err();
        assert_eq!(err.info().code, "empty-group-source");
    }
}
