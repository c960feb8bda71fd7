//! Per-member records produced while scanning an archive.

/// Number of name bytes compared when the stored name was truncated.
///
/// The fixed name field is 16 bytes and formats that terminate short names
/// with `/` leave room for 15 characters.
pub const TRUNCATED_NAME_LEN: usize = 15;

/// A borrowed view of one archive member, valid for a single visitor call.
///
/// Use [`ArchiveEntry::to_info`] to keep the data past the callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArchiveEntry<'a> {
    /// Position of the member in the archive, counting from zero and
    /// skipping symbol and name tables.
    pub index: usize,

    /// Member name, with format-specific terminators removed.
    pub name: &'a str,

    /// The stored name filled its fixed-width field and may be cut short.
    pub truncated: bool,

    /// Byte offset of the member header.
    pub header_offset: u64,

    /// Byte offset of the member data.
    pub data_offset: u64,

    /// Size of the member data in bytes.
    pub size: u64,

    /// Modification time, seconds since the Unix epoch.
    pub date: i64,

    /// Owner user ID.
    pub uid: u32,

    /// Owner group ID.
    pub gid: u32,

    /// Permission bits.
    pub mode: u32,
}

impl ArchiveEntry<'_> {
    /// Returns `true` if this member is the one `target` names.
    #[must_use]
    pub fn is_named(&self, target: &str) -> bool {
        names_equal(target, self.name, self.truncated)
    }

    /// Copies the entry into an owned record.
    #[must_use]
    pub fn to_info(&self) -> MemberInfo {
        MemberInfo {
            name: self.name.to_string(),
            truncated: self.truncated,
            header_offset: self.header_offset,
            data_offset: self.data_offset,
            size: self.size,
            date: self.date,
            uid: self.uid,
            gid: self.gid,
            mode: self.mode,
        }
    }
}

/// An owned copy of an [`ArchiveEntry`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberInfo {
    /// Member name.
    pub name: String,
    /// Whether the stored name may be truncated.
    pub truncated: bool,
    /// Byte offset of the member header.
    pub header_offset: u64,
    /// Byte offset of the member data.
    pub data_offset: u64,
    /// Size of the member data in bytes.
    pub size: u64,
    /// Modification time, seconds since the Unix epoch.
    pub date: i64,
    /// Owner user ID.
    pub uid: u32,
    /// Owner group ID.
    pub gid: u32,
    /// Permission bits.
    pub mode: u32,
}

/// Compares a wanted member name against a name stored in an archive.
///
/// Only the final path component of `target` takes part, since archives
/// store bare file names. When `truncated` is set the comparison stops after
/// [`TRUNCATED_NAME_LEN`] bytes.
///
/// # Examples
///
/// ```
/// use armember_core::names_equal;
///
/// assert!(names_equal("obj/foo.o", "foo.o", false));
/// assert!(names_equal("a_very_long_member_name.o", "a_very_long_mem", true));
/// assert!(!names_equal("foo.o", "bar.o", false));
/// ```
#[must_use]
pub fn names_equal(target: &str, stored: &str, truncated: bool) -> bool {
    let target = target.rsplit('/').next().unwrap_or(target);

    if truncated {
        let a = target.as_bytes();
        let b = stored.as_bytes();
        a[..a.len().min(TRUNCATED_NAME_LEN)] == b[..b.len().min(TRUNCATED_NAME_LEN)]
    } else {
        target == stored
    }
}
