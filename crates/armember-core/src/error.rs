//! Error types for archive member operations.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using `ArError`.
pub type Result<T> = std::result::Result<T, ArError>;

/// Errors that can occur while resolving, touching or scanning archive
/// members.
#[derive(Error, Debug)]
pub enum ArError {
    /// The `archive((entry))` form was used.
    #[error("attempt to use unsupported feature: '{name}'")]
    UnsupportedFeature {
        /// The full reference as written.
        name: String,
    },

    /// The name is not of the form `archive(member)`.
    #[error("'{name}' is not an archive member reference")]
    NotAReference {
        /// The rejected name.
        name: String,
    },

    /// The archive file does not exist.
    #[error("archive '{}' does not exist", path.display())]
    ArchiveNotFound {
        /// Path of the missing archive.
        path: PathBuf,
    },

    /// The file exists but is not a well-formed archive.
    #[error("'{}' is not a valid archive: {reason}", path.display())]
    InvalidArchive {
        /// Path of the archive.
        path: PathBuf,
        /// What was wrong with it.
        reason: String,
    },

    /// I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Touching a member failed.
    #[error(transparent)]
    Touch(#[from] TouchError),
}

impl ArError {
    /// Returns `true` if this error is a usage error in the build
    /// description that must abort the whole run.
    ///
    /// # Examples
    ///
    /// ```
    /// use armember_core::ArError;
    ///
    /// let err = ArError::UnsupportedFeature {
    ///     name: "lib.a((entry))".to_string(),
    /// };
    /// assert!(err.is_fatal());
    /// ```
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::UnsupportedFeature { .. } | Self::NotAReference { .. }
        )
    }

    /// Returns `true` if the archive scanner broke its own contract.
    #[must_use]
    pub const fn is_contract_violation(&self) -> bool {
        matches!(self, Self::Touch(TouchError::BadStatus { .. }))
    }

    /// Returns the touch failure, if this error is one.
    #[must_use]
    pub const fn touch_error(&self) -> Option<&TouchError> {
        match self {
            Self::Touch(err) => Some(err),
            _ => None,
        }
    }
}

/// Reasons a member touch can fail.
///
/// The display strings are the messages shown to the user.
#[derive(Error, Debug)]
pub enum TouchError {
    /// The archive file does not exist.
    #[error("touch: Archive '{archive}' does not exist")]
    ArchiveNotFound {
        /// Archive path as written in the reference.
        archive: String,
    },

    /// The archive file is not in a recognized format.
    #[error("touch: '{archive}' is not a valid archive")]
    NotAnArchive {
        /// Archive path as written in the reference.
        archive: String,
    },

    /// Reading or rewriting the archive failed.
    #[error("touch: {archive}: {source}")]
    Io {
        /// Archive path as written in the reference.
        archive: String,
        /// Underlying OS error.
        #[source]
        source: io::Error,
    },

    /// The archive has no member with that name.
    #[error("touch: Member '{member}' does not exist in '{archive}'")]
    MemberNotFound {
        /// Member name as written in the reference.
        member: String,
        /// Archive path as written in the reference.
        archive: String,
    },

    /// The scanner returned a status outside its contract.
    #[error("touch: Bad return code from ar_member_touch on '{name}'")]
    BadStatus {
        /// The full reference that was being touched.
        name: String,
        /// The raw status code.
        code: i32,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsupported_feature_display() {
        let err = ArError::UnsupportedFeature {
            name: "lib.a((entry))".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "attempt to use unsupported feature: 'lib.a((entry))'"
        );
        assert!(err.is_fatal());
        assert!(!err.is_contract_violation());
    }

    #[test]
    fn test_touch_messages() {
        let err = TouchError::ArchiveNotFound {
            archive: "lib.a".to_string(),
        };
        assert_eq!(err.to_string(), "touch: Archive 'lib.a' does not exist");

        let err = TouchError::NotAnArchive {
            archive: "lib.a".to_string(),
        };
        assert_eq!(err.to_string(), "touch: 'lib.a' is not a valid archive");

        let err = TouchError::MemberNotFound {
            member: "foo.o".to_string(),
            archive: "lib.a".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "touch: Member 'foo.o' does not exist in 'lib.a'"
        );

        let err = TouchError::BadStatus {
            name: "lib.a(foo.o)".to_string(),
            code: 7,
        };
        assert_eq!(
            err.to_string(),
            "touch: Bad return code from ar_member_touch on 'lib.a(foo.o)'"
        );
    }

    #[test]
    fn test_touch_io_message_is_perror_style() {
        let err = TouchError::Io {
            archive: "lib.a".to_string(),
            source: io::Error::new(io::ErrorKind::PermissionDenied, "Permission denied"),
        };
        assert_eq!(err.to_string(), "touch: lib.a: Permission denied");
    }

    #[test]
    fn test_contract_violation_classification() {
        let err = ArError::from(TouchError::BadStatus {
            name: "lib.a(foo.o)".to_string(),
            code: 42,
        });
        assert!(err.is_contract_violation());
        assert!(!err.is_fatal());
        assert!(err.touch_error().is_some());
    }

    #[test]
    fn test_transparent_touch_display() {
        let err = ArError::from(TouchError::ArchiveNotFound {
            archive: "missing.a".to_string(),
        });
        assert_eq!(err.to_string(), "touch: Archive 'missing.a' does not exist");
    }
}
