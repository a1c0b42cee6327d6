use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::sharing::{EncodedShare, ReconstructionRequest};

/// Structured record holding a threshold and numbered shares, e.g.
/// ```json
/// {
///     "keys": { "n": 4, "k": 3 },
///     "1": { "base": "10", "value": "4" },
///     "2": { "base": "2", "value": "111" }
/// }
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ShareRecord {
    pub keys: RecordKeys,
    #[serde(flatten)]
    pub shares: BTreeMap<String, EncodedShare>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RecordKeys {
    /// Number of shares handed out, informative only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub n: Option<u32>,
    pub k: u32,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RecordError {
    #[error("share key {0:?} is not a positive integer")]
    InvalidIndex(String),
    #[error("record declares {n} shares but a threshold of {k}")]
    InsufficientShareCount { n: u32, k: u32 },
}

impl TryFrom<ShareRecord> for ReconstructionRequest {
    type Error = RecordError;

    fn try_from(record: ShareRecord) -> Result<Self, Self::Error> {
        if let Some(n) = record.keys.n
            && n < record.keys.k
        {
            return Err(RecordError::InsufficientShareCount {
                n,
                k: record.keys.k,
            });
        }

        let entries = record
            .shares
            .into_iter()
            .map(|(key, share)| parse_index(&key).map(|index| (index, share)))
            .collect::<Result<BTreeMap<u32, EncodedShare>, RecordError>>()?;

        Ok(ReconstructionRequest::new(record.keys.k, entries))
    }
}

// Only canonical decimal keys are accepted so that "1" and "01" can not both map to the same ordinal
fn parse_index(key: &str) -> Result<u32, RecordError> {
    match key.parse::<u32>() {
        Ok(index) if index > 0 && index.to_string() == key => Ok(index),
        _ => Err(RecordError::InvalidIndex(key.to_string())),
    }
}
