//! The contract between member operations and an archive format backend.

use std::io;
use std::path::Path;

use crate::Result;
use crate::types::ArchiveEntry;

/// Visitor invoked once per archive member.
///
/// Returning a non-zero value stops the scan and makes it the scan result.
pub type EntryVisitor<'v> = dyn FnMut(&ArchiveEntry<'_>) -> i64 + 'v;

/// Outcome of touching a single member.
#[derive(Debug)]
pub enum TouchStatus {
    /// The member's timestamp was updated.
    Touched,
    /// The archive file does not exist.
    ArchiveMissing,
    /// The file is not a valid archive.
    NotAnArchive,
    /// Reading or writing the archive failed.
    Io(io::Error),
    /// No member with that name exists.
    MemberMissing,
    /// A status code outside this enumeration. Well-behaved scanners never
    /// produce it.
    Unrecognized(i32),
}

impl TouchStatus {
    /// The classic integer code for this status.
    ///
    /// # Examples
    ///
    /// ```
    /// use armember_core::formats::TouchStatus;
    ///
    /// assert_eq!(TouchStatus::Touched.code(), 0);
    /// assert_eq!(TouchStatus::ArchiveMissing.code(), -1);
    /// assert_eq!(TouchStatus::MemberMissing.code(), 1);
    /// ```
    #[must_use]
    pub const fn code(&self) -> i32 {
        match self {
            Self::Touched => 0,
            Self::ArchiveMissing => -1,
            Self::NotAnArchive => -2,
            Self::Io(_) => -3,
            Self::MemberMissing => 1,
            Self::Unrecognized(code) => *code,
        }
    }
}

/// A backend able to walk an archive's members and touch one of them.
pub trait ArchiveScanner {
    /// Calls `visitor` for each member of `archive` in on-disk order.
    ///
    /// Stops at the first non-zero visitor result and returns it. Returns
    /// `Ok(0)` when every call returned zero.
    ///
    /// # Errors
    ///
    /// Returns an error if the archive cannot be opened or is malformed.
    fn scan(&self, archive: &Path, visitor: &mut EntryVisitor<'_>) -> Result<i64>;

    /// Sets the timestamp of `member` in `archive` to the current time.
    fn touch_member(&self, archive: &Path, member: &str) -> TouchStatus;

    /// Returns the format name.
    fn format_name(&self) -> &str;
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    struct FixedScanner {
        names: Vec<&'static str>,
    }

    impl ArchiveScanner for FixedScanner {
        fn scan(&self, _archive: &Path, visitor: &mut EntryVisitor<'_>) -> Result<i64> {
            for (index, &name) in self.names.iter().enumerate() {
                let entry = ArchiveEntry {
                    index,
                    name,
                    truncated: false,
                    header_offset: 0,
                    data_offset: 0,
                    size: 0,
                    date: 0,
                    uid: 0,
                    gid: 0,
                    mode: 0,
                };
                let result = visitor(&entry);
                if result != 0 {
                    return Ok(result);
                }
            }
            Ok(0)
        }

        fn touch_member(&self, _archive: &Path, _member: &str) -> TouchStatus {
            TouchStatus::Touched
        }

        fn format_name(&self) -> &str {
            "fixed"
        }
    }

    #[test]
    fn test_trait_short_circuits() {
        let scanner = FixedScanner {
            names: vec!["a", "b", "c"],
        };
        let mut seen = Vec::new();
        let result = scanner
            .scan(Path::new("x.a"), &mut |entry| {
                seen.push(entry.name.to_string());
                if entry.name == "b" { 7 } else { 0 }
            })
            .unwrap();
        assert_eq!(result, 7);
        assert_eq!(seen, vec!["a", "b"]);
        assert_eq!(scanner.format_name(), "fixed");
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(TouchStatus::NotAnArchive.code(), -2);
        assert_eq!(TouchStatus::Io(io::Error::other("x")).code(), -3);
        assert_eq!(TouchStatus::Unrecognized(9).code(), 9);
    }
}
