//! Parsing of `archive(member)` references.
//!
//! Build rules can name a target as `lib.a(foo.o)`, meaning the member
//! `foo.o` stored inside the archive `lib.a`. This module recognizes that
//! syntax and splits it into its two halves.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use crate::ArError;
use crate::Result;

/// Returns `true` if `name` is an archive member reference.
///
/// A reference contains a `(` somewhere after the first character and ends
/// with `)`. A `(` at position 0 never starts a reference, so `"(member)"`
/// is not one.
///
/// # Examples
///
/// ```
/// use armember_core::is_member_reference;
///
/// assert!(is_member_reference("lib.a(foo.o)"));
/// assert!(!is_member_reference("foo.o"));
/// assert!(!is_member_reference("(foo.o)"));
/// assert!(!is_member_reference("lib.a(foo.o"));
/// ```
#[must_use]
pub fn is_member_reference(name: &str) -> bool {
    match name.find('(') {
        None | Some(0) => false,
        Some(_) => name.ends_with(')'),
    }
}

/// An archive path and a member name, split from `archive(member)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MemberReference {
    archive: String,
    member: String,
}

impl MemberReference {
    /// Creates a reference from its two halves.
    #[must_use]
    pub fn new(archive: impl Into<String>, member: impl Into<String>) -> Self {
        Self {
            archive: archive.into(),
            member: member.into(),
        }
    }

    /// Splits `name` at its first `(` and its final `)`.
    ///
    /// # Errors
    ///
    /// Returns [`ArError::UnsupportedFeature`] for the `archive((entry))`
    /// form, and [`ArError::NotAReference`] if `name` does not satisfy
    /// [`is_member_reference`].
    ///
    /// # Examples
    ///
    /// ```
    /// use armember_core::MemberReference;
    ///
    /// let reference = MemberReference::parse("lib.a(foo.o)").unwrap();
    /// assert_eq!(reference.archive(), "lib.a");
    /// assert_eq!(reference.member(), "foo.o");
    ///
    /// assert!(MemberReference::parse("lib.a((entry))").is_err());
    /// ```
    pub fn parse(name: &str) -> Result<Self> {
        if !is_member_reference(name) {
            return Err(ArError::NotAReference {
                name: name.to_string(),
            });
        }

        // Both indices are on ASCII bytes, so slicing stays on char boundaries.
        let open = name.find('(').unwrap_or_default();
        let close = name.len() - 1;
        let inner = &name.as_bytes()[open + 1..close];

        if inner.first() == Some(&b'(') && inner.last() == Some(&b')') {
            return Err(ArError::UnsupportedFeature {
                name: name.to_string(),
            });
        }

        Ok(Self::new(&name[..open], &name[open + 1..close]))
    }

    /// The archive path, as written.
    #[must_use]
    pub fn archive(&self) -> &str {
        &self.archive
    }

    /// The archive path as a filesystem path.
    #[must_use]
    pub fn archive_path(&self) -> &Path {
        Path::new(&self.archive)
    }

    /// The member name, as written.
    #[must_use]
    pub fn member(&self) -> &str {
        &self.member
    }

    /// Consumes the reference, returning `(archive, member)`.
    #[must_use]
    pub fn into_parts(self) -> (String, String) {
        (self.archive, self.member)
    }
}

impl fmt::Display for MemberReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.archive, self.member)
    }
}

impl FromStr for MemberReference {
    type Err = ArError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_is_member_reference() {
        assert!(is_member_reference("lib.a(foo.o)"));
        assert!(is_member_reference("dir/lib.a(foo.o)"));
        assert!(is_member_reference("a()"));
        assert!(!is_member_reference("foo.o"));
        assert!(!is_member_reference(""));
        assert!(!is_member_reference("lib.a(foo.o"));
        assert!(!is_member_reference("lib.a)"));
    }

    #[test]
    fn test_leading_paren_is_not_reference() {
        assert!(!is_member_reference("(member)"));
        assert!(!is_member_reference("()"));
    }

    #[test]
    fn test_predicate_accepts_nested_form() {
        // Rejection happens in parse, not in the predicate.
        assert!(is_member_reference("lib.a((entry))"));
    }

    #[test]
    fn test_parse_simple() {
        let reference = MemberReference::parse("lib.a(foo.o)").unwrap();
        assert_eq!(reference.archive(), "lib.a");
        assert_eq!(reference.member(), "foo.o");
        assert_eq!(reference.archive_path(), Path::new("lib.a"));
    }

    #[test]
    fn test_parse_splits_at_first_open_paren() {
        let reference = MemberReference::parse("lib.a(foo(1).o)").unwrap();
        assert_eq!(reference.archive(), "lib.a");
        assert_eq!(reference.member(), "foo(1).o");
    }

    #[test]
    fn test_parse_empty_member() {
        let reference = MemberReference::parse("lib.a()").unwrap();
        assert_eq!(reference.archive(), "lib.a");
        assert_eq!(reference.member(), "");
    }

    #[test]
    fn test_parse_unsupported_nested_form() {
        let err = MemberReference::parse("lib.a((entry))").unwrap_err();
        assert!(matches!(err, ArError::UnsupportedFeature { .. }));
        assert!(err.to_string().contains("lib.a((entry))"));
    }

    #[test]
    fn test_parse_half_nested_is_accepted() {
        let reference = MemberReference::parse("lib.a((entry)").unwrap();
        assert_eq!(reference.member(), "(entry");

        let reference = MemberReference::parse("lib.a(entry))").unwrap();
        assert_eq!(reference.member(), "entry)");
    }

    #[test]
    fn test_parse_not_a_reference() {
        let err = MemberReference::parse("foo.o").unwrap_err();
        assert!(matches!(err, ArError::NotAReference { .. }));
        assert!(err.is_fatal());

        let err = MemberReference::parse("(foo.o)").unwrap_err();
        assert!(matches!(err, ArError::NotAReference { .. }));
    }

    #[test]
    fn test_display_round_trip() {
        let reference = MemberReference::new("lib.a", "foo.o");
        assert_eq!(reference.to_string(), "lib.a(foo.o)");
        let parsed: MemberReference = "lib.a(foo.o)".parse().unwrap();
        assert_eq!(parsed, reference);
    }

    #[test]
    fn test_into_parts() {
        let (archive, member) = MemberReference::new("x.a", "y.o").into_parts();
        assert_eq!(archive, "x.a");
        assert_eq!(member, "y.o");
    }
}
