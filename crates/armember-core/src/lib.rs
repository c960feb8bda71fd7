//! Archive member references for build tools.
//!
//! Build rules may name a target as `archive(member)`: the member `member`
//! stored inside the static archive `archive`. `armember-core` recognizes
//! that syntax, resolves a member's modification time for staleness checks,
//! touches members, and expands member globs such as `libfoo.a(*.o)` into a
//! sorted list of references.
//!
//! Archive access goes through the [`formats::ArchiveScanner`] trait and file
//! timestamps through the [`FileStateCache`] trait, both passed in
//! explicitly. [`formats::ArScanner`] and [`FileCache`] are the default
//! implementations.
//!
//! # Examples
//!
//! ```no_run
//! use armember_core::FileCache;
//! use armember_core::formats::ArScanner;
//! use armember_core::{glob_members, is_member_reference, member_mtime, touch_member};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let scanner = ArScanner::default();
//! let mut cache = FileCache::new();
//!
//! assert!(is_member_reference("libfoo.a(foo.o)"));
//! let before = member_mtime("libfoo.a(foo.o)", &scanner, &mut cache)?;
//! touch_member("libfoo.a(foo.o)", &scanner, &mut cache)?;
//!
//! for reference in glob_members("libfoo.a", "*.o", &scanner) {
//!     println!("{reference}");
//! }
//! # let _ = before;
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod formats;
pub mod glob;
pub mod reference;
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
pub mod types;

// Re-export main API types
pub use api::glob_members;
pub use api::glob_members_with;
pub use api::list_members;
pub use api::member_mtime;
pub use api::touch_member;
pub use cache::FileCache;
pub use cache::FileNode;
pub use cache::FileStateCache;
pub use config::ScanConfig;
pub use error::ArError;
pub use error::Result;
pub use error::TouchError;
pub use glob::GlobOptions;
pub use glob::MatchOptions;
pub use glob::fnmatch;
pub use glob::has_glob_metacharacters;
pub use reference::MemberReference;
pub use reference::is_member_reference;

// Re-export types module for easier access
pub use types::ArchiveEntry;
pub use types::MemberInfo;
pub use types::ModTime;
pub use types::entry::names_equal;
