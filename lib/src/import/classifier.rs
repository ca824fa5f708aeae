use crate::crypto::ENCRYPTED_MARKER;
use crate::error::{ProfileError, Result};
use serde_json::Value;

/// What an artifact's text turned out to be
#[derive(Debug, Clone, PartialEq)]
pub enum ArtifactKind {
    /// Parsed JSON, ready for validation
    Plain(Value),
    /// Needs a password before it can be validated
    Encrypted,
    Unsupported,
}

impl ArtifactKind {
    pub fn name(&self) -> &'static str {
        match self {
            ArtifactKind::Plain(_) => "plain",
            ArtifactKind::Encrypted => "encrypted",
            ArtifactKind::Unsupported => "unsupported",
        }
    }
}

/// Sniff the artifact format
///
/// Artifacts carry no format header: anything that parses as JSON is plain,
/// otherwise a leading `U` (the base64 `Salted__` prefix) means encrypted. A
/// plain artifact that happens to start with `U` and fails to parse is
/// misreported as encrypted; decryption then fails cleanly.
pub fn classify(raw: &str) -> Result<ArtifactKind> {
    if raw.trim().is_empty() {
        return Err(ProfileError::EmptyFile);
    }

    if let Ok(value) = serde_json::from_str::<Value>(raw) {
        return Ok(ArtifactKind::Plain(value));
    }

    if raw.trim_start().starts_with(ENCRYPTED_MARKER) {
        Ok(ArtifactKind::Encrypted)
    } else {
        Ok(ArtifactKind::Unsupported)
    }
}
