//! Circular and matched companion-row generation for trial lists.
//!
//! A [`RowGenerator`] cycles a source table's rows — every row exactly once
//! per pass, passes independently reshuffled when seeded — and the grouped
//! entry points pull companion values per trial under matching, mismatching,
//! or explicit per-group source constraints.

mod generator;
mod grouped;

pub use generator::{generate, ColumnSpec, GenerateOpts, RowGenerator};
pub use grouped::{
    generate_but_not, generate_by_group, generate_matches, GroupedGenerator, MatchKey,
};
