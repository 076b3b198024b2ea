//! Content fingerprinting for idempotent transcript intake.

use super::TaskGraphDomainError;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

/// Length of the rendered SHA-256 digest in hex digits.
const FINGERPRINT_LEN: usize = 64;

/// Deterministic digest of normalized transcript text.
///
/// The fingerprint is the idempotency key for job intake: transcripts that
/// differ only in surrounding whitespace or letter case produce the same
/// fingerprint, so re-submitting them resolves to the existing job instead
/// of triggering extraction again.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String")]
pub struct TranscriptFingerprint(String);

impl TranscriptFingerprint {
    /// Computes the fingerprint of a transcript.
    ///
    /// Normalizes by trimming surrounding whitespace and lower-casing, then
    /// applies SHA-256 and renders the digest as 64 lowercase hex digits.
    #[must_use]
    pub fn of(transcript: &str) -> Self {
        let normalized = transcript.trim().to_lowercase();
        let digest = Sha256::digest(normalized.as_bytes());
        let hex = digest
            .iter()
            .map(|byte| format!("{byte:02x}"))
            .collect::<String>();
        Self(hex)
    }

    /// Reconstructs a fingerprint from its persisted hex form.
    ///
    /// # Errors
    ///
    /// Returns [`TaskGraphDomainError::InvalidFingerprint`] when the value
    /// is not exactly 64 lowercase hex digits.
    pub fn from_hex(value: impl Into<String>) -> Result<Self, TaskGraphDomainError> {
        let raw = value.into();
        let is_valid = raw.len() == FINGERPRINT_LEN
            && raw.chars().all(|c| matches!(c, '0'..='9' | 'a'..='f'));
        if !is_valid {
            return Err(TaskGraphDomainError::InvalidFingerprint(raw));
        }
        Ok(Self(raw))
    }

    /// Returns the fingerprint as a hex string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for TranscriptFingerprint {
    type Error = TaskGraphDomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_hex(value)
    }
}

impl AsRef<str> for TranscriptFingerprint {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for TranscriptFingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
