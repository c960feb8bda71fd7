//! Output formatter trait for CLI results.

use anyhow::Result;
use armember_core::MemberInfo;
use serde::Serialize;
use std::path::Path;

/// How a single name passed to `check` was classified.
#[derive(Debug, Serialize)]
pub struct CheckOutcome {
    pub name: String,
    pub is_reference: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub archive: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub member: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Effective modification time of one reference.
#[derive(Debug, Serialize)]
pub struct MtimeOutcome {
    pub reference: String,
    /// Seconds since the epoch, `None` when unknown.
    pub mtime: Option<i64>,
}

/// Result of touching one reference.
#[derive(Debug, Serialize)]
pub struct TouchOutcome {
    pub reference: String,
    pub touched: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Common output formatter trait
pub trait OutputFormatter {
    /// Format the classification of names
    fn format_check_results(&self, results: &[CheckOutcome]) -> Result<()>;

    /// Format member modification times
    fn format_mtimes(&self, results: &[MtimeOutcome]) -> Result<()>;

    /// Format touch results, failures included
    fn format_touch_results(&self, results: &[TouchOutcome]) -> Result<()>;

    /// Format the expansion of a member pattern
    fn format_glob(&self, archive: &str, pattern: &str, references: &[String]) -> Result<()>;

    /// Format member listing (names only)
    fn format_members_short(&self, archive: &Path, members: &[MemberInfo]) -> Result<()>;

    /// Format member listing with metadata
    fn format_members_long(&self, archive: &Path, members: &[MemberInfo]) -> Result<()>;
}

/// Generic JSON output structure
#[derive(Debug, Serialize)]
pub struct JsonOutput<T> {
    pub operation: String,
    pub status: Status,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Success,
    /// At least one item of the operation failed.
    Partial,
}

impl<T: Serialize> JsonOutput<T> {
    pub fn success(operation: impl Into<String>, data: T) -> Self {
        Self {
            operation: operation.into(),
            status: Status::Success,
            data: Some(data),
            error: None,
        }
    }

    pub fn partial(operation: impl Into<String>, data: T, error: impl Into<String>) -> Self {
        Self {
            operation: operation.into(),
            status: Status::Partial,
            data: Some(data),
            error: Some(error.into()),
        }
    }
}
