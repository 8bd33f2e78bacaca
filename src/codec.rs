use serde::{Serialize, de::DeserializeOwned};
use sha2::{Digest, Sha256};

use crate::error::{LedgerError, Result};

/// Serialize a value into its stored byte form (bincode).
pub fn encode<T: Serialize>(value: &T) -> Result<Vec<u8>> {
    bincode::serialize(value).map_err(|e| LedgerError::Encode(e.to_string()))
}

/// Inverse of [`encode`]. Malformed bytes surface as `Decode`.
pub fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T> {
    bincode::deserialize(bytes).map_err(|e| LedgerError::Decode(e.to_string()))
}

/// Lowercase hex SHA-256 of the given preimage.
pub fn hash_hex(preimage: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(preimage.as_bytes());
    hex::encode(hasher.finalize())
}
