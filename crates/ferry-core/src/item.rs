//! Filesystem item references.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Prefix of extended-length paths, which the privileged worker cannot
/// address.
pub const EXTENDED_LENGTH_PREFIX: &str = r"\\?\";

/// The kind of entry an [`FsItem`] refers to.
///
/// Storage-backend specific behaviour (trash, archive, remote) is delegated
/// to the fallback engine; the orchestrator only consults these variants for
/// capability checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ItemKind {
    /// A regular file.
    File,
    /// A directory.
    Directory,
    /// A shortcut or symbolic link.
    Link,
    /// An item stored inside the trash.
    Trash,
    /// An entry inside an archive (zip) backend.
    Archive,
    /// An entry on a remote (network) backend.
    Remote,
}

impl ItemKind {
    /// Whether items of this kind can be named in a privileged worker
    /// request. Archive and remote backends only exist in-process.
    pub fn is_broker_backed(&self) -> bool {
        !matches!(self, Self::Archive | Self::Remote)
    }

    /// Whether this kind can contain other items.
    pub fn is_container(&self) -> bool {
        matches!(self, Self::Directory)
    }
}

/// An addressable filesystem entry: a path plus a declared kind,
/// independent of any live handle.
///
/// Identity is path based and case-insensitive. Values are immutable; a
/// rename or move produces a new `FsItem` rather than mutating the old one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FsItem {
    /// Absolute path of the entry.
    pub path: PathBuf,
    /// Declared kind of the entry.
    pub kind: ItemKind,
}

impl FsItem {
    /// Create a new item reference.
    pub fn new(path: impl Into<PathBuf>, kind: ItemKind) -> Self {
        Self {
            path: path.into(),
            kind,
        }
    }

    /// Create a file reference.
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self::new(path, ItemKind::File)
    }

    /// Create a directory reference.
    pub fn directory(path: impl Into<PathBuf>) -> Self {
        Self::new(path, ItemKind::Directory)
    }

    /// The file name component, lossily converted.
    pub fn name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default()
    }

    /// Whether this item refers to the same logical entry as `path`
    /// (case-insensitive comparison).
    pub fn same_path(&self, path: &Path) -> bool {
        paths_equal(&self.path, path)
    }

    /// A new reference to the same kind of entry at a different path, as
    /// produced by a rename or move.
    pub fn relocated(&self, path: impl Into<PathBuf>) -> Self {
        Self::new(path, self.kind)
    }

    /// Whether the privileged worker can address this item: the kind must
    /// be broker backed and the path must be non-empty and not use the
    /// extended-length prefix.
    pub fn is_broker_addressable(&self) -> bool {
        self.kind.is_broker_backed() && path_is_broker_addressable(&self.path)
    }
}

/// Case-insensitive path equality, the identity rule for item references.
pub fn paths_equal(a: &Path, b: &Path) -> bool {
    a.as_os_str()
        .to_string_lossy()
        .eq_ignore_ascii_case(&b.as_os_str().to_string_lossy())
}

pub(crate) fn path_is_broker_addressable(path: &Path) -> bool {
    let raw = path.to_string_lossy();
    !raw.trim().is_empty() && !raw.starts_with(EXTENDED_LENGTH_PREFIX)
}
