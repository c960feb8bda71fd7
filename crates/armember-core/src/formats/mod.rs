//! Archive format backends.

pub mod ar;
pub mod traits;

// Re-export main types for convenience
pub use ar::ArScanner;
pub use traits::ArchiveScanner;
pub use traits::EntryVisitor;
pub use traits::TouchStatus;
