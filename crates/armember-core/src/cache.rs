//! File state cache shared with the surrounding build engine.
//!
//! Member operations record the archive's own modification time here before
//! they read or rewrite the archive, so the dependency engine keeps the
//! timestamp the archive had before a member was rebuilt or touched.

use std::collections::HashMap;
use std::path::Path;
use std::path::PathBuf;

use tracing::debug;
use tracing::warn;

use crate::types::ModTime;

/// One file known to the cache.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileNode {
    path: PathBuf,
    mtime: Option<ModTime>,
}

impl FileNode {
    /// Creates a node whose mtime has not been looked at yet.
    #[must_use]
    pub const fn new(path: PathBuf) -> Self {
        Self { path, mtime: None }
    }

    /// The file's path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The captured modification time, if it has been requested.
    #[must_use]
    pub const fn mtime(&self) -> Option<ModTime> {
        self.mtime
    }
}

/// Lookup-or-create registry of files and their modification times.
pub trait FileStateCache {
    /// Looks up `path` without creating a node.
    fn lookup(&self, path: &Path) -> Option<&FileNode>;

    /// Looks up `path`, creating a node if there is none.
    ///
    /// Takes the path by value: when a node is created the cache becomes the
    /// owner of the path.
    fn lookup_or_create(&mut self, path: PathBuf) -> &mut FileNode;

    /// Returns the modification time of the node for `path`, reading it from
    /// disk the first time. Returns `ModTime::Unknown` if there is no node
    /// or the file does not exist.
    ///
    /// `must_exist` marks a missing file as unexpected.
    fn refresh_mtime(&mut self, path: &Path, must_exist: bool) -> ModTime;

    /// Returns `true` if `path` exists on disk.
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }
}

/// In-memory [`FileStateCache`].
///
/// # Examples
///
/// ```
/// use armember_core::FileCache;
/// use armember_core::FileStateCache;
/// use std::path::{Path, PathBuf};
///
/// let mut cache = FileCache::new();
/// cache.lookup_or_create(PathBuf::from("libfoo.a"));
/// assert!(cache.lookup(Path::new("libfoo.a")).is_some());
/// assert_eq!(cache.len(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct FileCache {
    nodes: HashMap<PathBuf, FileNode>,
}

impl FileCache {
    /// Creates an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of files in the cache.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns `true` if the cache holds no files.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    fn stat(path: &Path, must_exist: bool) -> ModTime {
        match path.metadata().and_then(|meta| meta.modified()) {
            Ok(time) => ModTime::from_system_time(time),
            Err(e) => {
                if must_exist {
                    warn!(path = %path.display(), error = %e, "file expected to exist");
                }
                ModTime::Unknown
            }
        }
    }
}

impl FileStateCache for FileCache {
    fn lookup(&self, path: &Path) -> Option<&FileNode> {
        self.nodes.get(path)
    }

    fn lookup_or_create(&mut self, path: PathBuf) -> &mut FileNode {
        self.nodes.entry(path).or_insert_with_key(|path| {
            debug!(path = %path.display(), "entered file into cache");
            FileNode::new(path.clone())
        })
    }

    fn refresh_mtime(&mut self, path: &Path, must_exist: bool) -> ModTime {
        let Some(node) = self.nodes.get_mut(path) else {
            return ModTime::Unknown;
        };
        if let Some(mtime) = node.mtime {
            return mtime;
        }
        let mtime = Self::stat(path, must_exist);
        node.mtime = Some(mtime);
        mtime
    }
}
