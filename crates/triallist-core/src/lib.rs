#![deny(missing_docs)]
#![doc = "Core cell, table, error, and deterministic randomness types for the triallist pipeline."]

pub mod cell;
pub mod cycle;
pub mod errors;
pub mod hash;
pub mod rng;
pub mod table;

pub use cell::Cell;
pub use cycle::ShuffledCycle;
pub use errors::{ErrorInfo, TrialError};
pub use hash::{stable_hash_string, stable_table_hash, to_canonical_json_bytes};
pub use rng::{derive_substream_seed, RngHandle};
pub use table::Table;
