// src/fs/mock.rs

use super::FileSystem;
use anyhow::{anyhow, Result};
use std::collections::{HashMap, HashSet};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Debug, Default)]
struct MockState {
    files: HashMap<PathBuf, Vec<u8>>,
    failing: HashSet<PathBuf>,
    /// Every path opened for writing, in order.
    opened: Vec<PathBuf>,
}

/// In-memory filesystem. Clones share the same state.
#[derive(Debug, Clone, Default)]
pub struct MockFileSystem {
    state: Arc<Mutex<MockState>>,
}

impl MockFileSystem {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_file(&self, path: impl AsRef<Path>, content: impl Into<Vec<u8>>) {
        self.lock()
            .files
            .insert(path.as_ref().to_path_buf(), content.into());
    }

    /// Contents of `path` as bytes, if it exists.
    pub fn contents(&self, path: impl AsRef<Path>) -> Option<Vec<u8>> {
        self.lock().files.get(path.as_ref()).cloned()
    }

    /// Make every open/write of `path` fail, as a missing directory or a
    /// read-only mount would.
    pub fn fail_writes_to(&self, path: impl AsRef<Path>) {
        self.lock().failing.insert(path.as_ref().to_path_buf());
    }

    /// Paths opened for writing so far, in order.
    pub fn opened_for_write(&self) -> Vec<PathBuf> {
        self.lock().opened.clone()
    }

    fn lock(&self) -> MutexGuard<'_, MockState> {
        // A panic in another test thread must not cascade here.
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// Writer returned by [`MockFileSystem::create_truncate`]; appends straight
/// into the shared map so readers see partial output immediately.
struct MockWriter {
    state: Arc<Mutex<MockState>>,
    path: PathBuf,
}

impl Write for MockWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        if state.failing.contains(&self.path) {
            return Err(io::Error::other(format!("injected failure for {:?}", self.path)));
        }
        state
            .files
            .entry(self.path.clone())
            .or_default()
            .extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl FileSystem for MockFileSystem {
    fn create_truncate(&self, path: &Path) -> Result<Box<dyn Write + Send>> {
        let mut state = self.lock();
        if state.failing.contains(path) {
            return Err(anyhow!("injected failure opening {:?}", path));
        }
        state.opened.push(path.to_path_buf());
        state.files.insert(path.to_path_buf(), Vec::new());
        Ok(Box::new(MockWriter {
            state: Arc::clone(&self.state),
            path: path.to_path_buf(),
        }))
    }

    fn write(&self, path: &Path, contents: &[u8]) -> Result<()> {
        let mut w = self.create_truncate(path)?;
        w.write_all(contents)?;
        Ok(())
    }

    fn read_to_string(&self, path: &Path) -> Result<String> {
        match self.lock().files.get(path) {
            Some(content) => {
                String::from_utf8(content.clone()).map_err(|e| anyhow!("Invalid UTF-8: {}", e))
            }
            None => Err(anyhow!("File not found: {:?}", path)),
        }
    }

    fn remove_file(&self, path: &Path) -> Result<()> {
        match self.lock().files.remove(path) {
            Some(_) => Ok(()),
            None => Err(anyhow!("File not found: {:?}", path)),
        }
    }

    fn exists(&self, path: &Path) -> bool {
        self.lock().files.contains_key(path)
    }
}
