//! Trial-list construction and transformation utilities: full factorial
//! counterbalancing, ratio expansion, repetition, block assignment, and
//! order randomization.

mod block;
mod counterbalance;
mod expand;
mod extend;
mod shuffle;

pub use block::{add_block, BlockOpts};
pub use counterbalance::{counterbalance, ConditionSet};
pub use expand::{expand, ExpandOpts};
pub use extend::{extend, ExtendOpts};
pub use shuffle::{
    simple_shuffle, smart_shuffle, GroupShuffleReport, ShuffleReport, SimpleShuffleOpts,
    SmartShuffleOpts,
};
