//! Storage collaborator interface.
//!
//! The coordination layer reads program images and script modules through
//! this trait and never touches the storage medium directly. Paths are
//! medium-relative names (e.g., "games/blocks.img"); interpretation is the
//! implementation's business.

use crate::error::Result;

/// Read-only file access on the boot medium.
pub trait Storage {
    /// Whether the storage subsystem initialized successfully at boot.
    /// Every other operation is meaningless while this is `false`.
    fn is_ready(&self) -> bool;

    /// Whether `path` names an existing file.
    fn exists(&self, path: &str) -> bool;

    /// Size of the file at `path` in bytes.
    fn file_size(&self, path: &str) -> Result<u64>;

    /// Read the file at `path` into `buf`, returning the number of bytes
    /// actually read. A short count means the file was truncated between
    /// sizing and reading.
    fn read_into(&self, path: &str, buf: &mut [u8]) -> Result<usize>;

    /// Read the file at `path` as UTF-8 text.
    fn read_text(&self, path: &str) -> Result<String>;
}
