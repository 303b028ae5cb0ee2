//! Canonical encoding and stable hashing for reproducibility checks.

use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::errors::{ErrorInfo, TrialError};
use crate::table::Table;

/// Encodes a serializable payload as canonical JSON bytes. Struct fields
/// serialize in declaration order and maps in key order, so equal values
/// always produce equal bytes.
pub fn to_canonical_json_bytes<T: Serialize>(value: &T) -> Result<Vec<u8>, TrialError> {
    serde_json::to_vec(value).map_err(|err| {
        TrialError::Serde(
            ErrorInfo::new("json-encode", "failed to encode canonical json")
                .with_hint(err.to_string()),
        )
    })
}

/// Computes a stable hexadecimal hash for the provided serializable payload.
pub fn stable_hash_string<T: Serialize>(value: &T) -> Result<String, TrialError> {
    let bytes = to_canonical_json_bytes(value)?;
    let digest = Sha256::digest(bytes);
    Ok(format!("{:x}", digest))
}

/// Computes a stable hash of a table's columns, rows, and labels. Two tables
/// hash equal exactly when their contents and row order are identical.
pub fn stable_table_hash(table: &Table) -> Result<String, TrialError> {
    stable_hash_string(table)
}
