//! Host-filesystem storage backend.
//!
//! Stands in for the boot medium: medium-relative names resolve against a
//! root directory, typically the directory containing the program image.

use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use lantern_core::device::Storage;
use lantern_core::error::{CoreError, Result};

pub struct DirStorage {
    root: PathBuf,
}

impl DirStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn resolve(&self, path: &str) -> PathBuf {
        self.root.join(path)
    }
}

impl Storage for DirStorage {
    fn is_ready(&self) -> bool {
        self.root.is_dir()
    }

    fn exists(&self, path: &str) -> bool {
        self.resolve(path).is_file()
    }

    fn file_size(&self, path: &str) -> Result<u64> {
        let meta = fs::metadata(self.resolve(path)).map_err(|e| CoreError::Io(e.to_string()))?;
        Ok(meta.len())
    }

    fn read_into(&self, path: &str, buf: &mut [u8]) -> Result<usize> {
        let mut file = fs::File::open(self.resolve(path)).map_err(|e| CoreError::Io(e.to_string()))?;
        let mut total = 0;
        // Loop until the buffer is full or the file ends; a single read may
        // return short without either being true.
        while total < buf.len() {
            let n = file
                .read(&mut buf[total..])
                .map_err(|e| CoreError::Io(e.to_string()))?;
            if n == 0 {
                break;
            }
            total += n;
        }
        Ok(total)
    }

    fn read_text(&self, path: &str) -> Result<String> {
        fs::read_to_string(self.resolve(path)).map_err(|e| CoreError::Io(e.to_string()))
    }
}

/// Split an image path into the storage root and the medium-relative name.
pub fn split_image_path(image: &Path) -> (PathBuf, String) {
    let root = match image.parent() {
        Some(parent) if parent != Path::new("") => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    let name = image
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    (root, name)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    fn storage_with_file(name: &str, contents: &[u8]) -> (tempfile::TempDir, DirStorage) {
        let dir = tempfile::tempdir().unwrap();
        let mut file = fs::File::create(dir.path().join(name)).unwrap();
        file.write_all(contents).unwrap();
        let storage = DirStorage::new(dir.path());
        (dir, storage)
    }

    #[test]
    fn reads_files_under_the_root() {
        let (_dir, storage) = storage_with_file("boot.lua", b"return 1");
        assert!(storage.is_ready());
        assert!(storage.exists("boot.lua"));
        assert!(!storage.exists("other.lua"));
        assert_eq!(storage.file_size("boot.lua").unwrap(), 8);
        assert_eq!(storage.read_text("boot.lua").unwrap(), "return 1");
    }

    #[test]
    fn read_into_fills_an_exact_buffer() {
        let (_dir, storage) = storage_with_file("image.bin", &[7u8; 100]);
        let mut buf = vec![0u8; 100];
        assert_eq!(storage.read_into("image.bin", &mut buf).unwrap(), 100);
        assert!(buf.iter().all(|&b| b == 7));
    }

    #[test]
    fn missing_root_is_not_ready() {
        let storage = DirStorage::new("/no/such/directory");
        assert!(!storage.is_ready());
        assert!(!storage.exists("anything"));
    }

    #[test]
    fn split_separates_root_and_name() {
        let (root, name) = split_image_path(Path::new("games/blocks.img"));
        assert_eq!(root, Path::new("games"));
        assert_eq!(name, "blocks.img");

        let (root, name) = split_image_path(Path::new("blocks.img"));
        assert_eq!(root, Path::new("."));
        assert_eq!(name, "blocks.img");
    }
}
