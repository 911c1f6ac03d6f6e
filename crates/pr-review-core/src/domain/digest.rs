//! Content digest of the reviewed diff, used to correlate log lines.

use std::fmt;

use sha2::{Digest, Sha256};

/// SHA-256 hex digest of a diff's text.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DiffDigest(String);

impl DiffDigest {
    pub fn of(diff: &str) -> Self {
        DiffDigest(hex::encode(Sha256::digest(diff.as_bytes())))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Short form (first 12 hex chars).
    pub fn short(&self) -> &str {
        &self.0[..12.min(self.0.len())]
    }
}

impl fmt::Display for DiffDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
