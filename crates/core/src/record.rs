//! Provenance records returned by storage operations

use serde::{Deserialize, Serialize};

use crate::checksum::Checksums;
use crate::value::Value;

/// Outcome of one operation on one object
///
/// `old_file` holds the checksums of what was there before (an overwrite,
/// a delete, a verified digest) and `new_file` those of what is there now.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultRecord {
    /// Name of the variable or path the operation acted on
    pub subject: String,
    /// Checksums before the operation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub old_file: Option<Checksums>,
    /// Checksums after the operation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_file: Option<Checksums>,
}

impl ResultRecord {
    /// A record with no checksums
    pub fn new(subject: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            old_file: None,
            new_file: None,
        }
    }

    /// Set the checksums before the operation
    pub fn with_old(mut self, sums: Checksums) -> Self {
        self.old_file = Some(sums);
        self
    }

    /// Set the checksums after the operation
    pub fn with_new(mut self, sums: Checksums) -> Self {
        self.new_file = Some(sums);
        self
    }
}

/// A value read back from storage with the checksums of its bytes
#[derive(Debug, Clone, PartialEq)]
pub struct Loaded {
    /// Decoded value
    pub value: Value,
    /// Checksums of the stored bytes
    pub checksums: Checksums,
}
