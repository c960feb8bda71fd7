//! Error conversion utilities for CLI.
//!
//! Converts armember-core's typed errors (thiserror) into user-facing
//! contextual errors (anyhow) with actionable guidance.

use anyhow::anyhow;
use armember_core::ArError;

/// Converts `ArError` to a user-friendly anyhow error.
///
/// Touch failures keep their message unchanged, since build logs and
/// scripts match on it.
pub fn convert_ar_error(err: ArError) -> anyhow::Error {
    match err {
        ArError::UnsupportedFeature { .. } => anyhow!(
            "{err}\n\
             HINT: Name the member directly, e.g. 'lib.a(member.o)'."
        ),
        ArError::NotAReference { .. } => anyhow!(
            "{err}\n\
             HINT: Member references have the form ARCHIVE(MEMBER)."
        ),
        ArError::ArchiveNotFound { path } => {
            anyhow!("Archive not found: {}", path.display())
        }
        ArError::InvalidArchive { path, reason } => anyhow!(
            "Invalid archive '{}': {reason}\n\
             HINT: The file may be corrupted, or exceed --max-members / --max-name-table-size.",
            path.display()
        ),
        ArError::Touch(touch) => anyhow::Error::from(touch),
        ArError::Io(_) => anyhow::Error::from(err).context("I/O error while reading archive"),
    }
}

/// Converts a library result, attaching context on failure
pub fn add_archive_context<T>(result: armember_core::Result<T>) -> anyhow::Result<T> {
    result.map_err(convert_ar_error)
}
