// src/fs/mod.rs

//! Filesystem seam for the status log, notification draft and pid file.
//!
//! The supervision loop only ever needs "truncate and stream", "write whole
//! file", "read whole file" and "remove". Keeping those behind a trait lets
//! the loop be exercised against [`mock::MockFileSystem`] without touching disk.

use std::fmt::Debug;
use std::fs;
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};

pub mod mock;

/// Abstract filesystem interface.
pub trait FileSystem: Send + Sync + Debug {
    /// Open `path` for writing, truncating any previous content.
    ///
    /// The parent directory must already exist.
    fn create_truncate(&self, path: &Path) -> Result<Box<dyn Write + Send>>;
    fn write(&self, path: &Path, contents: &[u8]) -> Result<()>;
    fn read_to_string(&self, path: &Path) -> Result<String>;
    fn remove_file(&self, path: &Path) -> Result<()>;
    fn exists(&self, path: &Path) -> bool;
}

/// Implementation that uses `std::fs`.
#[derive(Debug, Clone, Default)]
pub struct RealFileSystem;

impl FileSystem for RealFileSystem {
    fn create_truncate(&self, path: &Path) -> Result<Box<dyn Write + Send>> {
        let file = fs::File::create(path).with_context(|| format!("creating file {:?}", path))?;
        Ok(Box::new(file))
    }

    fn write(&self, path: &Path, contents: &[u8]) -> Result<()> {
        let mut file = self.create_truncate(path)?;
        file.write_all(contents)
            .with_context(|| format!("writing to file {:?}", path))?;
        file.flush()
            .with_context(|| format!("flushing file {:?}", path))?;
        Ok(())
    }

    fn read_to_string(&self, path: &Path) -> Result<String> {
        fs::read_to_string(path).with_context(|| format!("reading file {:?}", path))
    }

    fn remove_file(&self, path: &Path) -> Result<()> {
        fs::remove_file(path).with_context(|| format!("removing file {:?}", path))
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }
}
