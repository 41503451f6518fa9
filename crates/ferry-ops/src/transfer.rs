//! Blocking filesystem primitives, run under `spawn_blocking` by the engine.

use std::fs;
use std::io;
use std::path::Path;

/// Copy a file or directory tree. Returns bytes copied.
pub(crate) fn copy_path(source: &Path, dest: &Path) -> io::Result<u64> {
    ensure_parent(dest)?;
    if source.is_dir() {
        copy_dir_recursive(source, dest)
    } else {
        copy_file(source, dest)
    }
}

/// Move a file or directory tree. Returns bytes moved.
pub(crate) fn move_path(source: &Path, dest: &Path) -> io::Result<u64> {
    let size = entry_size(source);
    ensure_parent(dest)?;

    // Fast path for same-filesystem moves.
    if fs::rename(source, dest).is_ok() {
        return Ok(size);
    }

    // Cross-filesystem: copy then remove the source.
    if source.is_dir() {
        copy_dir_recursive(source, dest)?;
        fs::remove_dir_all(source)?;
    } else {
        copy_file(source, dest)?;
        fs::remove_file(source)?;
    }
    Ok(size)
}

/// Remove a file or directory tree.
pub(crate) fn remove_path(path: &Path) -> io::Result<()> {
    if path.is_dir() {
        fs::remove_dir_all(path)
    } else {
        fs::remove_file(path)
    }
}

fn ensure_parent(path: &Path) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}

fn copy_file(source: &Path, dest: &Path) -> io::Result<u64> {
    fs::copy(source, dest)
}

fn copy_dir_recursive(source: &Path, dest: &Path) -> io::Result<u64> {
    fs::create_dir_all(dest)?;

    let mut total = 0u64;
    for entry in fs::read_dir(source)? {
        let entry = entry?;
        let path = entry.path();
        let dest_path = dest.join(entry.file_name());
        if path.is_dir() {
            total += copy_dir_recursive(&path, &dest_path)?;
        } else {
            total += copy_file(&path, &dest_path)?;
        }
    }
    Ok(total)
}

fn entry_size(path: &Path) -> u64 {
    if path.is_dir() {
        dir_size(path)
    } else {
        fs::metadata(path).map(|m| m.len()).unwrap_or(0)
    }
}

fn dir_size(dir: &Path) -> u64 {
    let mut size = 0u64;
    if let Ok(entries) = fs::read_dir(dir) {
        for entry in entries.flatten() {
            let path = entry.path();
            if path.is_dir() {
                size += dir_size(&path);
            } else if let Ok(metadata) = fs::metadata(&path) {
                size += metadata.len();
            }
        }
    }
    size
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_copy_path_file() {
        let dir = TempDir::new().unwrap();
        let src = dir.path().join("a.txt");
        fs::write(&src, b"hello").unwrap();
        let dst = dir.path().join("nested/b.txt");

        let bytes = copy_path(&src, &dst).unwrap();
        assert_eq!(bytes, 5);
        assert_eq!(fs::read(&dst).unwrap(), b"hello");
        assert!(src.exists());
    }

    #[test]
    fn test_move_path_directory() {
        let dir = TempDir::new().unwrap();
        let src = dir.path().join("tree");
        fs::create_dir_all(src.join("inner")).unwrap();
        fs::write(src.join("inner/file.txt"), b"data").unwrap();
        let dst = dir.path().join("moved");

        move_path(&src, &dst).unwrap();
        assert!(!src.exists());
        assert_eq!(fs::read(dst.join("inner/file.txt")).unwrap(), b"data");
    }

    #[test]
    fn test_remove_path() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("a.txt");
        fs::write(&file, b"x").unwrap();
        remove_path(&file).unwrap();
        assert!(!file.exists());

        let tree = dir.path().join("tree/leaf");
        fs::create_dir_all(&tree).unwrap();
        remove_path(tree.parent().unwrap()).unwrap();
        assert!(!dir.path().join("tree").exists());
    }
}
