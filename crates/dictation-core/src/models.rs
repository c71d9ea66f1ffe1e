//! Domain types shared by the catalog, the favorites store and the API.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::file_safety::validate_path_segment;

/// File extension (without the dot) that marks a target file.
pub const TARGET_EXTENSION: &str = "md";

/// Separator used by the legacy comma-joined favorites encoding.
pub const LEGACY_DELIMITER: char = ',';

// =============================================================================
// TARGETS
// =============================================================================

/// Identifier of a practice text: the file name stem of `<id>.md`.
///
/// A valid id is a plain path segment (see [`validate_path_segment`]) that
/// also contains no [`LEGACY_DELIMITER`], so stored favorites written in the
/// comma-joined format stay decodable.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TargetId(String);

impl TargetId {
    /// Validate and wrap a target id.
    pub fn new(id: impl Into<String>) -> Result<Self> {
        let id = id.into();
        validate_path_segment(&id, "target id")?;
        if id.contains(LEGACY_DELIMITER) {
            return Err(Error::InvalidInput(
                "target id cannot contain ','".to_string(),
            ));
        }
        Ok(Self(id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// File name of the target inside the targets directory.
    pub fn file_name(&self) -> String {
        format!("{}.{}", self.0, TARGET_EXTENSION)
    }
}

impl fmt::Display for TargetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for TargetId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for TargetId {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for TargetId {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

impl TryFrom<String> for TargetId {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        Self::new(value)
    }
}

impl From<TargetId> for String {
    fn from(id: TargetId) -> Self {
        id.0
    }
}

// =============================================================================
// FAVORITES
// =============================================================================

/// Persisted favorites of one account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FavoriteRecord {
    pub account: String,
    /// Insertion-ordered; may contain ids whose target no longer exists.
    pub targets: Vec<TargetId>,
}

/// Body of `POST /favorites`: add or remove one target for an account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SetFavoriteRequest {
    pub account: String,
    pub target: String,
    /// `true` to favorite, `false` to unfavorite.
    pub value: bool,
}
