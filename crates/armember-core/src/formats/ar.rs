//! Unix `ar` archive backend.
//!
//! Member headers, GNU and BSD long names and symbol tables are decoded by
//! the `object` crate. This module maps its members onto [`ArchiveEntry`]
//! records and rewrites member headers in place for touch.

use std::cell::Cell;
use std::fs::File;
use std::fs::OpenOptions;
use std::io;
use std::io::Read;
use std::io::Seek;
use std::io::SeekFrom;
use std::io::Write;
use std::mem;
use std::ops::Range;
use std::path::Path;

use object::ReadCache;
use object::ReadRef;
use object::archive;
use object::read::archive::ArchiveFile;
use tracing::debug;

use crate::ArError;
use crate::Result;
use crate::ScanConfig;
use crate::formats::traits::ArchiveScanner;
use crate::formats::traits::EntryVisitor;
use crate::formats::traits::TouchStatus;
use crate::types::ArchiveEntry;
use crate::types::ModTime;

/// Size of a member header in bytes.
pub const HEADER_SIZE: usize = mem::size_of::<archive::Header>();

const BSD_NAME_PREFIX: &[u8] = b"#1/";
const BSD_SYMDEF: &str = "__.SYMDEF";

/// Random-access view of an archive that refuses oversized reads.
///
/// `object` reads the long-name table and BSD names in one piece, sized by
/// the member header. Reads larger than `max_read` or past the end of the
/// archive fail before anything is allocated.
struct LimitedRead<R: Read + Seek> {
    cache: ReadCache<R>,
    len: u64,
    max_read: u64,
    exceeded: Cell<Option<u64>>,
}

impl<R: Read + Seek> LimitedRead<R> {
    fn new(reader: R, len: u64, max_read: u64) -> Self {
        Self {
            cache: ReadCache::new(reader),
            len,
            max_read: max_read.max(HEADER_SIZE as u64),
            exceeded: Cell::new(None),
        }
    }
}

impl<'a, R: Read + Seek> ReadRef<'a> for &'a LimitedRead<R> {
    fn len(self) -> std::result::Result<u64, ()> {
        Ok(self.len)
    }

    fn read_bytes_at(self, offset: u64, size: u64) -> std::result::Result<&'a [u8], ()> {
        if size > self.max_read {
            self.exceeded.set(Some(size));
            return Err(());
        }
        if offset.checked_add(size).is_none_or(|end| end > self.len) {
            return Err(());
        }
        (&self.cache).read_bytes_at(offset, size)
    }

    fn read_bytes_at_until(
        self,
        range: Range<u64>,
        delimiter: u8,
    ) -> std::result::Result<&'a [u8], ()> {
        (&self.cache).read_bytes_at_until(range, delimiter)
    }
}

/// Reads a numeric header field already decoded by `object`, where a blank
/// field stands for zero.
fn numeric_field(raw: &[u8], parsed: Option<u64>) -> Option<u64> {
    parsed.or_else(|| raw.iter().all(|&b| b == b' ').then_some(0))
}

/// Length of a BSD `#1/<len>` name stored in front of the member data.
fn bsd_name_len(field: &[u8; 16]) -> u64 {
    field
        .strip_prefix(BSD_NAME_PREFIX)
        .and_then(|rest| std::str::from_utf8(rest).ok())
        .and_then(|digits| digits.trim_end_matches(' ').parse().ok())
        .unwrap_or(0)
}

/// A short name that fills the whole field without a `/` terminator or
/// padding may have been cut off.
fn is_truncated(field: &[u8; 16]) -> bool {
    field[0] != b'/'
        && !field.starts_with(BSD_NAME_PREFIX)
        && !field.contains(&b'/')
        && !field.contains(&b' ')
}

/// Stores `secs` left-aligned and space-padded in the date field.
fn set_date(header: &mut archive::Header, secs: i64) -> io::Result<()> {
    let text = secs.to_string();
    if text.len() > header.date.len() {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!("timestamp {secs} does not fit in a member header"),
        ));
    }
    header.date = [b' '; 12];
    header.date[..text.len()].copy_from_slice(text.as_bytes());
    Ok(())
}

/// Scanner for Unix `ar` archives.
///
/// # Examples
///
/// ```no_run
/// use armember_core::formats::ArScanner;
/// use armember_core::formats::ArchiveScanner;
/// use std::path::Path;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let scanner = ArScanner::default();
/// let mut names = Vec::new();
/// scanner.scan(Path::new("libfoo.a"), &mut |entry| {
///     names.push(entry.name.to_string());
///     0
/// })?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct ArScanner {
    config: ScanConfig,
}

impl ArScanner {
    /// Creates a scanner with the given limits.
    #[must_use]
    pub const fn new(config: ScanConfig) -> Self {
        Self { config }
    }

    /// Scans an already opened archive.
    ///
    /// `path` is only used in error messages.
    ///
    /// # Errors
    ///
    /// Returns [`ArError::InvalidArchive`] for malformed input and
    /// [`ArError::Io`] if reading fails.
    pub fn scan_reader<R: Read + Seek>(
        &self,
        reader: &mut R,
        path: &Path,
        visitor: &mut EntryVisitor<'_>,
    ) -> Result<i64> {
        let invalid = |reason: String| ArError::InvalidArchive {
            path: path.to_path_buf(),
            reason,
        };

        let archive_len = reader.seek(SeekFrom::End(0))?;
        let data = LimitedRead::new(reader, archive_len, self.config.max_name_table_size);
        let decode_error = |err: object::Error| match data.exceeded.get() {
            Some(size) => invalid(format!(
                "name data of {size} bytes exceeds limit of {}",
                self.config.max_name_table_size
            )),
            None => invalid(err.to_string()),
        };

        let file = ArchiveFile::parse(&data).map_err(decode_error)?;
        if file.is_thin() {
            return Err(invalid("thin archives are not supported".to_string()));
        }

        let mut index = 0usize;
        for member in file.members() {
            let member = member.map_err(decode_error)?;
            let header = member
                .header()
                .ok_or_else(|| invalid("unsupported member header layout".to_string()))?;

            let name = String::from_utf8_lossy(member.name());
            if name.starts_with(BSD_SYMDEF) {
                continue;
            }

            if index >= self.config.max_members {
                return Err(invalid(format!(
                    "more than {} members",
                    self.config.max_members
                )));
            }

            let (data_offset, size) = member.file_range();
            if data_offset
                .checked_add(size)
                .is_none_or(|end| end > archive_len)
            {
                return Err(invalid(format!(
                    "member '{name}' extends past end of archive"
                )));
            }
            let header_offset = data_offset
                .checked_sub(HEADER_SIZE as u64 + bsd_name_len(&header.name))
                .ok_or_else(|| invalid(format!("bad data offset for '{name}'")))?;

            let bad_field = |field: &str| invalid(format!("bad {field} field for '{name}'"));
            let date = numeric_field(&header.date, member.date())
                .and_then(|v| i64::try_from(v).ok())
                .ok_or_else(|| bad_field("date"))?;
            let uid = numeric_field(&header.uid, member.uid())
                .and_then(|v| u32::try_from(v).ok())
                .ok_or_else(|| bad_field("uid"))?;
            let gid = numeric_field(&header.gid, member.gid())
                .and_then(|v| u32::try_from(v).ok())
                .ok_or_else(|| bad_field("gid"))?;
            let mode = numeric_field(&header.mode, member.mode())
                .and_then(|v| u32::try_from(v).ok())
                .ok_or_else(|| bad_field("mode"))?;

            let entry = ArchiveEntry {
                index,
                name: &name,
                truncated: is_truncated(&header.name),
                header_offset,
                data_offset,
                size,
                date,
                uid,
                gid,
                mode,
            };

            let result = visitor(&entry);
            if result != 0 {
                return Ok(result);
            }
            index += 1;
        }

        debug!(archive = %path.display(), members = index, "scanned archive");
        Ok(0)
    }

    /// Rewrites the header at `header_offset` so the archive's mtime moves
    /// forward, then stores that mtime as the member's date.
    fn stamp_member(archive: &Path, header_offset: u64) -> io::Result<i64> {
        let mut file = OpenOptions::new().read(true).write(true).open(archive)?;

        let mut buf = [0u8; HEADER_SIZE];
        file.seek(SeekFrom::Start(header_offset))?;
        file.read_exact(&mut buf)?;

        file.seek(SeekFrom::Start(header_offset))?;
        file.write_all(&buf)?;
        file.flush()?;

        let now = match ModTime::from_system_time(file.metadata()?.modified()?) {
            ModTime::Known(secs) => secs,
            ModTime::Unknown => 0,
        };

        let (header, _) = object::pod::from_bytes_mut::<archive::Header>(&mut buf)
            .map_err(|()| io::Error::new(io::ErrorKind::InvalidData, "short member header"))?;
        if header.terminator != archive::TERMINATOR {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("no member header at offset {header_offset}"),
            ));
        }
        set_date(header, now)?;

        file.seek(SeekFrom::Start(header_offset))?;
        file.write_all(&buf)?;
        file.flush()?;

        Ok(now)
    }
}

impl ArchiveScanner for ArScanner {
    fn scan(&self, archive: &Path, visitor: &mut EntryVisitor<'_>) -> Result<i64> {
        let mut file = File::open(archive).map_err(|e| {
            if e.kind() == io::ErrorKind::NotFound {
                ArError::ArchiveNotFound {
                    path: archive.to_path_buf(),
                }
            } else {
                ArError::Io(e)
            }
        })?;
        self.scan_reader(&mut file, archive, visitor)
    }

    fn touch_member(&self, archive: &Path, member: &str) -> TouchStatus {
        let found = self.scan(archive, &mut |entry| {
            if entry.is_named(member) {
                entry.header_offset as i64
            } else {
                0
            }
        });

        let header_offset = match found {
            Ok(0) => return TouchStatus::MemberMissing,
            Ok(offset) => offset as u64,
            Err(ArError::ArchiveNotFound { .. }) => return TouchStatus::ArchiveMissing,
            Err(ArError::InvalidArchive { reason, .. }) => {
                debug!(archive = %archive.display(), %reason, "refusing to touch invalid archive");
                return TouchStatus::NotAnArchive;
            }
            Err(ArError::Io(e)) => return TouchStatus::Io(e),
            Err(other) => return TouchStatus::Io(io::Error::other(other.to_string())),
        };

        match Self::stamp_member(archive, header_offset) {
            Ok(date) => {
                debug!(archive = %archive.display(), member, date, "touched member");
                TouchStatus::Touched
            }
            Err(e) => TouchStatus::Io(e),
        }
    }

    fn format_name(&self) -> &str {
        "ar"
    }
}
