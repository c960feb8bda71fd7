//! High-level operations on archive member references.

use std::path::Path;

use tracing::debug;
use tracing::error;
use tracing::warn;

use crate::ArError;
use crate::MemberReference;
use crate::Result;
use crate::TouchError;
use crate::cache::FileStateCache;
use crate::formats::ArchiveScanner;
use crate::formats::TouchStatus;
use crate::glob::GlobOptions;
use crate::glob::fnmatch;
use crate::glob::has_glob_metacharacters;
use crate::types::MemberInfo;
use crate::types::ModTime;

/// Returns the modification time of the member named by `name`.
///
/// Before scanning, the archive's own mtime is captured in `cache`: the
/// archive is usually about to be rewritten by the rebuild of this very
/// member, and the dependency engine needs the time it had before. The
/// archive is only entered into the cache if it exists on disk.
///
/// A missing member, a missing archive or an unreadable archive all resolve
/// to [`ModTime::Unknown`].
///
/// # Errors
///
/// Returns an error only when `name` is not a usable member reference (see
/// [`MemberReference::parse`]).
///
/// # Examples
///
/// ```no_run
/// use armember_core::FileCache;
/// use armember_core::formats::ArScanner;
/// use armember_core::member_mtime;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let mut cache = FileCache::new();
/// let mtime = member_mtime("libfoo.a(foo.o)", &ArScanner::default(), &mut cache)?;
/// println!("foo.o last changed at {mtime}");
/// # Ok(())
/// # }
/// ```
pub fn member_mtime<S, C>(name: &str, scanner: &S, cache: &mut C) -> Result<ModTime>
where
    S: ArchiveScanner + ?Sized,
    C: FileStateCache + ?Sized,
{
    let reference = MemberReference::parse(name)?;
    let archive = reference.archive_path();

    if cache.lookup(archive).is_none() && cache.exists(archive) {
        cache.lookup_or_create(archive.to_path_buf());
    }
    if cache.lookup(archive).is_some() {
        cache.refresh_mtime(archive, false);
    }

    let member = reference.member();
    let found = scanner.scan(archive, &mut |entry| {
        if entry.is_named(member) { entry.date } else { 0 }
    });

    Ok(match found {
        Ok(date) if date > 0 => ModTime::Known(date),
        Ok(_) => ModTime::Unknown,
        Err(err) => {
            debug!(reference = name, error = %err, "archive scan failed");
            ModTime::Unknown
        }
    })
}

/// Sets the modification time of the member named by `name` to now.
///
/// The archive always gets a cache node and its pre-touch mtime is captured
/// before the member header is rewritten.
///
/// # Errors
///
/// Returns a fatal error for unusable references, and [`ArError::Touch`]
/// describing why the touch failed otherwise.
pub fn touch_member<S, C>(name: &str, scanner: &S, cache: &mut C) -> Result<()>
where
    S: ArchiveScanner + ?Sized,
    C: FileStateCache + ?Sized,
{
    let reference = MemberReference::parse(name)?;
    let archive = reference.archive_path();

    cache.lookup_or_create(archive.to_path_buf());
    cache.refresh_mtime(archive, false);

    let status = scanner.touch_member(archive, reference.member());
    let code = status.code();
    let (archive, member) = reference.into_parts();

    let err = match status {
        TouchStatus::Touched => {
            debug!(reference = name, "touched archive member");
            return Ok(());
        }
        TouchStatus::ArchiveMissing => TouchError::ArchiveNotFound { archive },
        TouchStatus::NotAnArchive => TouchError::NotAnArchive { archive },
        TouchStatus::Io(source) => TouchError::Io { archive, source },
        TouchStatus::MemberMissing => TouchError::MemberNotFound { member, archive },
        TouchStatus::Unrecognized(_) => {
            error!(
                reference = name,
                code,
                scanner = scanner.format_name(),
                "archive scanner returned an unrecognized touch status"
            );
            return Err(TouchError::BadStatus {
                name: name.to_string(),
                code,
            }
            .into());
        }
    };

    warn!(reference = name, code, error = %err, "touch failed");
    Err(ArError::Touch(err))
}

/// Expands a member glob into sorted `archive(member)` references.
///
/// Returns an empty list when `pattern` has no metacharacters: literal
/// member names are looked up directly, not globbed. Scan failures also
/// yield an empty list. Uses [`GlobOptions::default`].
///
/// # Examples
///
/// ```no_run
/// use armember_core::formats::ArScanner;
/// use armember_core::glob_members;
///
/// for reference in glob_members("libfoo.a", "*.o", &ArScanner::default()) {
///     println!("{reference}");
/// }
/// ```
#[must_use]
pub fn glob_members<S>(archive: &str, pattern: &str, scanner: &S) -> Vec<String>
where
    S: ArchiveScanner + ?Sized,
{
    glob_members_with(archive, pattern, scanner, GlobOptions::default())
}

/// State accumulated while globbing one archive.
struct GlobState<'p> {
    prefix: String,
    pattern: &'p str,
    matches: Vec<String>,
}

/// [`glob_members`] with explicit options.
#[must_use]
pub fn glob_members_with<S>(
    archive: &str,
    pattern: &str,
    scanner: &S,
    options: GlobOptions,
) -> Vec<String>
where
    S: ArchiveScanner + ?Sized,
{
    if !has_glob_metacharacters(pattern, options.honor_escapes) {
        return Vec::new();
    }

    let mut state = GlobState {
        prefix: format!("{archive}("),
        pattern,
        matches: Vec::new(),
    };

    let scanned = scanner.scan(Path::new(archive), &mut |entry| {
        if fnmatch(state.pattern, entry.name, options.matching) {
            state
                .matches
                .push(format!("{}{})", state.prefix, entry.name));
        }
        0
    });
    if let Err(err) = scanned {
        debug!(archive, pattern, error = %err, "archive scan failed during glob");
    }

    let mut matches = state.matches;
    matches.sort_unstable();
    debug!(archive, pattern, count = matches.len(), "expanded member glob");
    matches
}

/// Lists every member of `archive` in on-disk order.
///
/// # Errors
///
/// Returns an error if the archive is missing, malformed or unreadable.
pub fn list_members<S>(archive: &Path, scanner: &S) -> Result<Vec<MemberInfo>>
where
    S: ArchiveScanner + ?Sized,
{
    let mut members = Vec::new();
    scanner.scan(archive, &mut |entry| {
        members.push(entry.to_info());
        0
    })?;
    Ok(members)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::FileCache;
    use crate::formats::EntryVisitor;
    use crate::types::ArchiveEntry;
    use std::cell::RefCell;
    use std::io;
    use std::path::PathBuf;

    /// Scanner over a fixed member list that records what it was asked.
    #[derive(Default)]
    struct MockScanner {
        members: Vec<(&'static str, i64)>,
        missing: bool,
        touch: RefCell<Option<TouchStatus>>,
        touched: RefCell<Vec<(PathBuf, String)>>,
    }

    impl MockScanner {
        fn with(members: Vec<(&'static str, i64)>) -> Self {
            Self {
                members,
                ..Self::default()
            }
        }

        fn touch_returns(self, status: TouchStatus) -> Self {
            *self.touch.borrow_mut() = Some(status);
            self
        }
    }

    impl ArchiveScanner for MockScanner {
        fn scan(&self, archive: &Path, visitor: &mut EntryVisitor<'_>) -> Result<i64> {
            if self.missing {
                return Err(ArError::ArchiveNotFound {
                    path: archive.to_path_buf(),
                });
            }
            for (index, &(name, date)) in self.members.iter().enumerate() {
                let entry = ArchiveEntry {
                    index,
                    name,
                    truncated: false,
                    header_offset: 8,
                    data_offset: 68,
                    size: 0,
                    date,
                    uid: 0,
                    gid: 0,
                    mode: 0o644,
                };
                let result = visitor(&entry);
                if result != 0 {
                    return Ok(result);
                }
            }
            Ok(0)
        }

        fn touch_member(&self, archive: &Path, member: &str) -> TouchStatus {
            self.touched
                .borrow_mut()
                .push((archive.to_path_buf(), member.to_string()));
            self.touch.borrow_mut().take().unwrap_or(TouchStatus::Touched)
        }

        fn format_name(&self) -> &str {
            "mock"
        }
    }

    #[test]
    fn test_member_mtime_found() {
        let scanner = MockScanner::with(vec![("a.o", 100), ("b.o", 200)]);
        let mut cache = FileCache::new();
        let mtime = member_mtime("lib.a(b.o)", &scanner, &mut cache).unwrap();
        assert_eq!(mtime, ModTime::Known(200));
    }

    #[test]
    fn test_member_mtime_missing_member() {
        let scanner = MockScanner::with(vec![("a.o", 100)]);
        let mut cache = FileCache::new();
        let mtime = member_mtime("lib.a(zz.o)", &scanner, &mut cache).unwrap();
        assert_eq!(mtime, ModTime::Unknown);
    }

    #[test]
    fn test_member_mtime_zero_date_is_unknown() {
        let scanner = MockScanner::with(vec![("a.o", 0)]);
        let mut cache = FileCache::new();
        let mtime = member_mtime("lib.a(a.o)", &scanner, &mut cache).unwrap();
        assert_eq!(mtime, ModTime::Unknown);
    }

    #[test]
    fn test_member_mtime_scan_failure_is_unknown() {
        let scanner = MockScanner {
            missing: true,
            ..MockScanner::default()
        };
        let mut cache = FileCache::new();
        let mtime = member_mtime("nope.a(a.o)", &scanner, &mut cache).unwrap();
        assert_eq!(mtime, ModTime::Unknown);
        // Archives that do not exist are not entered.
        assert!(cache.is_empty());
    }

    #[test]
    fn test_member_mtime_rejects_nested_form() {
        let scanner = MockScanner::with(vec![("a.o", 100)]);
        let mut cache = FileCache::new();
        let err = member_mtime("lib.a((a.o))", &scanner, &mut cache).unwrap_err();
        assert!(err.is_fatal());
    }

    #[test]
    fn test_member_mtime_matches_final_path_component() {
        let scanner = MockScanner::with(vec![("a.o", 100)]);
        let mut cache = FileCache::new();
        let mtime = member_mtime("lib.a(obj/a.o)", &scanner, &mut cache).unwrap();
        assert_eq!(mtime, ModTime::Known(100));
    }

    #[test]
    fn test_touch_success_creates_cache_node() {
        let scanner = MockScanner::with(vec![("a.o", 100)]);
        let mut cache = FileCache::new();
        touch_member("lib.a(a.o)", &scanner, &mut cache).unwrap();
        assert!(cache.lookup(Path::new("lib.a")).is_some());
        assert_eq!(
            scanner.touched.borrow().as_slice(),
            &[(PathBuf::from("lib.a"), "a.o".to_string())]
        );
    }

    #[test]
    fn test_touch_status_mapping() {
        let cases = [
            (TouchStatus::ArchiveMissing, "touch: Archive 'lib.a' does not exist"),
            (TouchStatus::NotAnArchive, "touch: 'lib.a' is not a valid archive"),
            (
                TouchStatus::MemberMissing,
                "touch: Member 'a.o' does not exist in 'lib.a'",
            ),
            (
                TouchStatus::Unrecognized(42),
                "touch: Bad return code from ar_member_touch on 'lib.a(a.o)'",
            ),
        ];

        for (status, expected) in cases {
            let scanner = MockScanner::default().touch_returns(status);
            let mut cache = FileCache::new();
            let err = touch_member("lib.a(a.o)", &scanner, &mut cache).unwrap_err();
            assert_eq!(err.to_string(), expected);
            assert!(!err.is_fatal());
        }
    }

    #[test]
    fn test_touch_io_error_keeps_os_message() {
        let scanner = MockScanner::default().touch_returns(TouchStatus::Io(io::Error::new(
            io::ErrorKind::PermissionDenied,
            "Permission denied",
        )));
        let mut cache = FileCache::new();
        let err = touch_member("lib.a(a.o)", &scanner, &mut cache).unwrap_err();
        assert_eq!(err.to_string(), "touch: lib.a: Permission denied");
    }

    #[test]
    fn test_touch_unrecognized_is_contract_violation() {
        let scanner = MockScanner::default().touch_returns(TouchStatus::Unrecognized(-9));
        let mut cache = FileCache::new();
        let err = touch_member("lib.a(a.o)", &scanner, &mut cache).unwrap_err();
        assert!(err.is_contract_violation());
    }

    #[test]
    fn test_touch_nested_form_never_reaches_scanner() {
        let scanner = MockScanner::default();
        let mut cache = FileCache::new();
        let err = touch_member("lib.a((a.o))", &scanner, &mut cache).unwrap_err();
        assert!(err.is_fatal());
        assert!(scanner.touched.borrow().is_empty());
        assert!(cache.is_empty());
    }

    #[test]
    fn test_glob_sorted_regardless_of_scan_order() {
        let scanner = MockScanner::with(vec![("b.o", 1), ("a.o", 1), ("c.txt", 1)]);
        let refs = glob_members("lib.a", "*.o", &scanner);
        assert_eq!(refs, vec!["lib.a(a.o)", "lib.a(b.o)"]);
    }

    #[test]
    fn test_glob_sorts_full_reference() {
        // ')' sorts after '!', so "a!b" comes before "a".
        let scanner = MockScanner::with(vec![("a", 1), ("a!b", 1)]);
        let refs = glob_members("lib.a", "a*", &scanner);
        assert_eq!(refs, vec!["lib.a(a!b)", "lib.a(a)"]);
    }

    #[test]
    fn test_glob_without_metacharacters_is_empty() {
        let scanner = MockScanner::with(vec![("a.o", 1)]);
        assert!(glob_members("lib.a", "a.o", &scanner).is_empty());
        assert!(glob_members("lib.a", "a\\*.o", &scanner).is_empty());
    }

    #[test]
    fn test_glob_skips_hidden_members() {
        let scanner = MockScanner::with(vec![(".hidden.o", 1), ("shown.o", 1)]);
        assert_eq!(glob_members("lib.a", "*.o", &scanner), vec!["lib.a(shown.o)"]);
        assert_eq!(
            glob_members("lib.a", ".*.o", &scanner),
            vec!["lib.a(.hidden.o)"]
        );
    }

    #[test]
    fn test_glob_no_matches_and_scan_failure() {
        let scanner = MockScanner::with(vec![("a.c", 1)]);
        assert!(glob_members("lib.a", "*.o", &scanner).is_empty());

        let scanner = MockScanner {
            missing: true,
            ..MockScanner::default()
        };
        assert!(glob_members("lib.a", "*.o", &scanner).is_empty());
    }

    #[test]
    fn test_glob_without_escapes() {
        let scanner = MockScanner::with(vec![("a\\x.o", 1)]);
        let options = GlobOptions {
            honor_escapes: false,
            matching: crate::MatchOptions {
                noescape: true,
                ..crate::MatchOptions::member()
            },
        };
        let refs = glob_members_with("lib.a", "a\\*", &scanner, options);
        assert_eq!(refs, vec!["lib.a(a\\x.o)"]);
    }

    #[test]
    fn test_list_members() {
        let scanner = MockScanner::with(vec![("b.o", 2), ("a.o", 1)]);
        let members = list_members(Path::new("lib.a"), &scanner).unwrap();
        let names: Vec<_> = members.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["b.o", "a.o"]);
    }
}
