//! Test utilities for building `ar` archives in memory.
//!
//! # Panics
//!
//! Functions in this module may panic on I/O errors since they are designed
//! for test use only where panics are acceptable.

#![allow(clippy::unwrap_used, clippy::missing_panics_doc)]

use std::fs;
use std::path::Path;
use std::path::PathBuf;

/// Name-encoding dialect used by [`ArTestBuilder`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    /// GNU: `name/` terminators and a `//` long-name table.
    Gnu,
    /// BSD: `#1/<len>` names stored before the data.
    Bsd,
    /// Old System V: names cut to 16 bytes without a terminator.
    Truncating,
}

struct TestMember {
    name: String,
    data: Vec<u8>,
    date: i64,
    uid: u32,
    gid: u32,
    mode: u32,
}

/// Builder for `ar` test archives.
///
/// # Examples
///
/// ```
/// use armember_core::test_utils::ArTestBuilder;
///
/// let data = ArTestBuilder::gnu()
///     .add_member("b.o", b"bbb", 1_700_000_000)
///     .add_member("a_long_member_name.o", b"aa", 1_700_000_100)
///     .build();
/// assert!(data.starts_with(b"!<arch>\n"));
/// ```
pub struct ArTestBuilder {
    dialect: Dialect,
    symbol_table: bool,
    members: Vec<TestMember>,
}

impl ArTestBuilder {
    /// Creates a builder for the given dialect.
    #[must_use]
    pub const fn new(dialect: Dialect) -> Self {
        Self {
            dialect,
            symbol_table: false,
            members: Vec::new(),
        }
    }

    /// GNU archive builder.
    #[must_use]
    pub const fn gnu() -> Self {
        Self::new(Dialect::Gnu)
    }

    /// BSD archive builder.
    #[must_use]
    pub const fn bsd() -> Self {
        Self::new(Dialect::Bsd)
    }

    /// Truncating System V archive builder.
    #[must_use]
    pub const fn truncating() -> Self {
        Self::new(Dialect::Truncating)
    }

    /// Adds an (empty) symbol table as the first member.
    #[must_use]
    pub const fn with_symbol_table(mut self) -> Self {
        self.symbol_table = true;
        self
    }

    /// Adds a member owned by root with mode 0o644.
    #[must_use]
    pub fn add_member(self, name: &str, data: &[u8], date: i64) -> Self {
        self.add_member_with_owner(name, data, date, 0, 0, 0o644)
    }

    /// Adds a member with explicit ownership and mode.
    #[must_use]
    pub fn add_member_with_owner(
        mut self,
        name: &str,
        data: &[u8],
        date: i64,
        uid: u32,
        gid: u32,
        mode: u32,
    ) -> Self {
        self.members.push(TestMember {
            name: name.to_string(),
            data: data.to_vec(),
            date,
            uid,
            gid,
            mode,
        });
        self
    }

    /// Serializes the archive.
    #[must_use]
    pub fn build(&self) -> Vec<u8> {
        let mut out = b"!<arch>\n".to_vec();

        if self.symbol_table {
            match self.dialect {
                Dialect::Bsd => {
                    let mut data = pad_name(b"__.SYMDEF SORTED");
                    data.extend_from_slice(&[0u8; 8]);
                    write_member(&mut out, "#1/20", &data, 0, 0, 0, 0o644);
                }
                Dialect::Gnu | Dialect::Truncating => {
                    write_member(&mut out, "/", &[0u8; 4], 0, 0, 0, 0);
                }
            }
        }

        let mut long_names = Vec::new();
        let mut name_fields = Vec::new();
        for member in &self.members {
            let field = match self.dialect {
                Dialect::Gnu if member.name.len() > 15 => {
                    let field = format!("/{}", long_names.len());
                    long_names.extend_from_slice(member.name.as_bytes());
                    long_names.extend_from_slice(b"/\n");
                    field
                }
                Dialect::Gnu => format!("{}/", member.name),
                Dialect::Bsd if member.name.len() > 16 || member.name.contains(' ') => {
                    format!("#1/{}", pad_name(member.name.as_bytes()).len())
                }
                Dialect::Bsd => member.name.clone(),
                Dialect::Truncating => member.name.chars().take(16).collect(),
            };
            name_fields.push(field);
        }

        if !long_names.is_empty() {
            write_member(&mut out, "//", &long_names, 0, 0, 0, 0);
        }

        for (member, field) in self.members.iter().zip(&name_fields) {
            let data = if field.starts_with("#1/") {
                let mut data = pad_name(member.name.as_bytes());
                data.extend_from_slice(&member.data);
                data
            } else {
                member.data.clone()
            };
            write_member(
                &mut out,
                field,
                &data,
                member.date,
                member.uid,
                member.gid,
                member.mode,
            );
        }

        out
    }

    /// Writes the archive to `dir/name` and returns its path.
    pub fn write_to(&self, dir: &Path, name: &str) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, self.build()).unwrap();
        path
    }
}

/// BSD names are NUL-padded to a multiple of four bytes.
fn pad_name(name: &[u8]) -> Vec<u8> {
    let mut padded = name.to_vec();
    while padded.len() % 4 != 0 {
        padded.push(0);
    }
    padded
}

fn write_member(
    out: &mut Vec<u8>,
    name: &str,
    data: &[u8],
    date: i64,
    uid: u32,
    gid: u32,
    mode: u32,
) {
    let header = format!(
        "{name:<16}{date:<12}{uid:<6}{gid:<6}{mode:<8o}{size:<10}`\n",
        size = data.len()
    );
    assert_eq!(header.len(), 60, "test member header must be 60 bytes");
    out.extend_from_slice(header.as_bytes());
    out.extend_from_slice(data);
    if data.len() % 2 == 1 {
        out.push(b'\n');
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gnu_layout() {
        let data = ArTestBuilder::gnu().add_member("a.o", b"x", 5).build();
        assert_eq!(&data[..8], b"!<arch>\n");
        assert_eq!(&data[8..24], b"a.o/            ");
        assert_eq!(data.len(), 8 + 60 + 2);
    }

    #[test]
    fn test_gnu_long_name_table_comes_first() {
        let data = ArTestBuilder::gnu()
            .add_member("a_rather_long_member_name.o", b"", 5)
            .build();
        assert_eq!(&data[8..24], b"//              ");
    }

    #[test]
    fn test_bsd_long_name_field() {
        let data = ArTestBuilder::bsd()
            .add_member("a_rather_long_member_name.o", b"", 5)
            .build();
        assert_eq!(&data[8..24], b"#1/28           ");
    }
}
