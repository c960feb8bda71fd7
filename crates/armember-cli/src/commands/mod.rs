//! Subcommand implementations.

pub mod check;
pub mod completion;
pub mod glob;
pub mod list;
pub mod mtime;
pub mod touch;
