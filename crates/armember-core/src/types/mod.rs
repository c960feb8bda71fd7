//! Value types shared by the scanner, the file cache and the member
//! operations.

pub mod entry;
pub mod mod_time;

pub use entry::ArchiveEntry;
pub use entry::MemberInfo;
pub use mod_time::ModTime;
