//! Scalar cell values stored in trial tables.

use std::cmp::Ordering;
use std::fmt::{self, Display};
use std::hash::Hasher;

use serde::{Deserialize, Serialize};
use siphasher::sip::SipHasher13;

/// A single scalar value held by one table cell.
///
/// Columns hold a consistent variant down their length; equality is strict
/// per variant (an `Int(2)` never equals a `Float(2.0)`). The total order
/// ranks `Bool < Int < Float < Str` and uses `f64::total_cmp` for floats so
/// cells can key `BTreeMap`s and drive stable sorts.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Cell {
    /// Boolean flag value.
    Bool(bool),
    /// Signed integer value.
    Int(i64),
    /// Floating point value.
    Float(f64),
    /// Text value.
    Str(String),
}

impl Cell {
    /// Returns a stable 64-bit identity for the value, suitable for
    /// substream-seed derivation. Hashing uses SipHash-1-3 with fixed zero
    /// keys, the same policy as [`crate::rng::derive_substream_seed`].
    pub fn stable_id(&self) -> u64 {
        let mut hasher = SipHasher13::new_with_keys(0, 0);
        match self {
            Cell::Bool(value) => {
                hasher.write_u8(0);
                hasher.write_u8(u8::from(*value));
            }
            Cell::Int(value) => {
                hasher.write_u8(1);
                hasher.write_i64(*value);
            }
            Cell::Float(value) => {
                hasher.write_u8(2);
                hasher.write_u64(value.to_bits());
            }
            Cell::Str(value) => {
                hasher.write_u8(3);
                hasher.write(value.as_bytes());
            }
        }
        hasher.finish()
    }

    fn rank(&self) -> u8 {
        match self {
            Cell::Bool(_) => 0,
            Cell::Int(_) => 1,
            Cell::Float(_) => 2,
            Cell::Str(_) => 3,
        }
    }
}

impl PartialEq for Cell {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Cell {}

impl PartialOrd for Cell {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Cell {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Cell::Bool(a), Cell::Bool(b)) => a.cmp(b),
            (Cell::Int(a), Cell::Int(b)) => a.cmp(b),
            (Cell::Float(a), Cell::Float(b)) => a.total_cmp(b),
            (Cell::Str(a), Cell::Str(b)) => a.cmp(b),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

impl Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Bool(value) => write!(f, "{value}"),
            Cell::Int(value) => write!(f, "{value}"),
            Cell::Float(value) => write!(f, "{value}"),
            Cell::Str(value) => write!(f, "{value}"),
        }
    }
}

impl From<bool> for Cell {
    fn from(value: bool) -> Self {
        Cell::Bool(value)
    }
}

impl From<i64> for Cell {
    fn from(value: i64) -> Self {
        Cell::Int(value)
    }
}

impl From<i32> for Cell {
    fn from(value: i32) -> Self {
        Cell::Int(i64::from(value))
    }
}

impl From<f64> for Cell {
    fn from(value: f64) -> Self {
        Cell::Float(value)
    }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Cell::Str(value.to_string())
    }
}

impl From<String> for Cell {
    fn from(value: String) -> Self {
        Cell::Str(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strict_variant_equality() {
        assert_ne!(Cell::Int(2), Cell::Float(2.0));
        assert_eq!(Cell::Int(2), Cell::Int(2));
        assert_eq!(Cell::Str("a".into()), Cell::from("a"));
    }

    #[test]
    fn stable_id_distinguishes_variants() {
        assert_ne!(Cell::Int(1).stable_id(), Cell::Bool(true).stable_id());
        assert_eq!(Cell::Int(7).stable_id(), Cell::Int(7).stable_id());
    }
}
