use log::debug;
use std::fs;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

use crate::error::{FeatureError, Result};

/// File operations the feature manager relies on
///
/// Kept behind a trait so front ends (or tests) can route file access
/// elsewhere. All paths are used as given.
pub trait FileStore {
    /// Reads the whole file
    fn read_file(&self, path: &Path) -> Result<Vec<u8>>;

    /// Replaces the file contents; the target is never left half written
    fn write_file(&self, path: &Path, bytes: &[u8]) -> Result<()>;

    /// File names in `folder` matching a `*`/`?` wildcard pattern, sorted
    fn list_files(&self, folder: &Path, pattern: &str) -> Result<Vec<String>>;

    /// Renames a file, refusing to replace an existing destination
    fn move_file(&self, from: &Path, to: &Path) -> Result<()>;

    /// Copies a file; without `overwrite` an existing destination is an error
    fn copy_file(&self, src: &Path, dst: &Path, overwrite: bool) -> Result<()>;

    fn exists(&self, path: &Path) -> bool;
}

/// [`FileStore`] backed by the local file system
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFileStore;

impl LocalFileStore {
    pub fn new() -> Self {
        Self
    }
}

impl FileStore for LocalFileStore {
    fn read_file(&self, path: &Path) -> Result<Vec<u8>> {
        fs::read(path).map_err(|e| FeatureError::io(path, e))
    }

    fn write_file(&self, path: &Path, bytes: &[u8]) -> Result<()> {
        // Create parent directories if they don't exist
        let parent = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        fs::create_dir_all(parent).map_err(|e| FeatureError::io(parent, e))?;

        // Write next to the target and rename over it
        let mut temp = NamedTempFile::new_in(parent).map_err(|e| FeatureError::io(parent, e))?;
        temp.write_all(bytes).map_err(|e| FeatureError::io(temp.path(), e))?;
        temp.as_file().sync_all().map_err(|e| FeatureError::io(temp.path(), e))?;
        temp.persist(path).map_err(|e| FeatureError::io(path, e.error))?;

        debug!("Wrote {} byte(s) to {}", bytes.len(), path.display());
        Ok(())
    }

    fn list_files(&self, folder: &Path, pattern: &str) -> Result<Vec<String>> {
        let entries = fs::read_dir(folder).map_err(|e| FeatureError::io(folder, e))?;

        let mut names = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| FeatureError::io(folder, e))?;
            if !entry.path().is_file() {
                continue;
            }
            if let Some(name) = entry.file_name().to_str() {
                if matches_pattern(name, pattern) {
                    names.push(name.to_string());
                }
            }
        }

        names.sort();
        Ok(names)
    }

    fn move_file(&self, from: &Path, to: &Path) -> Result<()> {
        if to.exists() {
            return Err(FeatureError::DestinationExists(to.to_path_buf()));
        }
        if !from.exists() {
            return Err(FeatureError::NotFound(from.to_path_buf()));
        }
        fs::rename(from, to).map_err(|e| FeatureError::io(from, e))
    }

    fn copy_file(&self, src: &Path, dst: &Path, overwrite: bool) -> Result<()> {
        if !overwrite && dst.exists() {
            return Err(FeatureError::DestinationExists(dst.to_path_buf()));
        }
        let bytes = self.read_file(src)?;
        self.write_file(dst, &bytes)
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }
}

/// Case-insensitive wildcard match supporting `*` and `?`
pub fn matches_pattern(name: &str, pattern: &str) -> bool {
    let name: Vec<char> = name.to_lowercase().chars().collect();
    let pattern: Vec<char> = pattern.to_lowercase().chars().collect();

    let (mut n, mut p) = (0, 0);
    // Position after the last `*` and the name index it was matched against
    let mut backtrack: Option<(usize, usize)> = None;

    while n < name.len() {
        match pattern.get(p) {
            Some('*') => {
                backtrack = Some((p + 1, n));
                p += 1;
            }
            Some(c) if *c == '?' || *c == name[n] => {
                n += 1;
                p += 1;
            }
            _ => match backtrack {
                Some((star_p, star_n)) => {
                    p = star_p;
                    n = star_n + 1;
                    backtrack = Some((star_p, star_n + 1));
                }
                None => return false,
            },
        }
    }

    pattern[p..].iter().all(|c| *c == '*')
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_matches_pattern() {
        assert!(matches_pattern("features.json", "*.json"));
        assert!(matches_pattern("FEATURES.JSON", "*.json"));
        assert!(!matches_pattern("features.json.bak", "*.json"));
        assert!(matches_pattern("a.txt", "?.txt"));
        assert!(!matches_pattern("ab.txt", "?.txt"));
        assert!(matches_pattern("anything", "*"));
        assert!(matches_pattern("NeueDatei_3.json", "Neue*_*.json"));
        assert!(!matches_pattern("", "?"));
        assert!(matches_pattern("", "*"));
    }

    #[test]
    fn test_write_and_read() -> anyhow::Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("nested").join("list.json");
        let store = LocalFileStore::new();

        store.write_file(&path, b"[]")?;
        assert_eq!(store.read_file(&path)?, b"[]");

        store.write_file(&path, b"[1]")?;
        assert_eq!(store.read_file(&path)?, b"[1]");
        Ok(())
    }

    #[test]
    fn test_read_missing_file() {
        let dir = tempdir().unwrap();
        let result = LocalFileStore::new().read_file(&dir.path().join("nope.json"));
        assert!(matches!(result, Err(FeatureError::NotFound(_))));
    }

    #[test]
    fn test_list_files() -> anyhow::Result<()> {
        let dir = tempdir()?;
        let store = LocalFileStore::new();
        fs::write(dir.path().join("b.json"), "[]")?;
        fs::write(dir.path().join("a.json"), "[]")?;
        fs::write(dir.path().join("notes.txt"), "")?;
        fs::create_dir(dir.path().join("sub.json"))?;

        assert_eq!(store.list_files(dir.path(), "*.json")?, vec!["a.json", "b.json"]);
        Ok(())
    }

    #[test]
    fn test_move_refuses_existing_destination() -> anyhow::Result<()> {
        let dir = tempdir()?;
        let store = LocalFileStore::new();
        let a = dir.path().join("a.json");
        let b = dir.path().join("b.json");
        fs::write(&a, "a")?;
        fs::write(&b, "b")?;

        let result = store.move_file(&a, &b);
        assert!(matches!(result, Err(FeatureError::DestinationExists(_))));
        assert_eq!(fs::read_to_string(&b)?, "b");

        let c = dir.path().join("c.json");
        store.move_file(&a, &c)?;
        assert!(!a.exists());
        assert_eq!(fs::read_to_string(&c)?, "a");
        Ok(())
    }

    #[test]
    fn test_copy_overwrite_flag() -> anyhow::Result<()> {
        let dir = tempdir()?;
        let store = LocalFileStore::new();
        let src = dir.path().join("src.json");
        let dst = dir.path().join("dst.json");
        fs::write(&src, "new")?;
        fs::write(&dst, "old")?;

        assert!(matches!(
            store.copy_file(&src, &dst, false),
            Err(FeatureError::DestinationExists(_))
        ));
        assert_eq!(fs::read_to_string(&dst)?, "old");

        store.copy_file(&src, &dst, true)?;
        assert_eq!(fs::read_to_string(&dst)?, "new");
        Ok(())
    }
}
