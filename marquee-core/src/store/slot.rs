//! Where a record store keeps its bytes.

use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// A single named slot holding one JSON document. Each library store owns
/// exactly one slot and rewrites it whole on every mutation.
pub trait StorageSlot: Send {
    /// Slot name, used in log messages.
    fn name(&self) -> &str;

    /// The current document, or `None` when the slot has never been
    /// written.
    fn read(&self) -> io::Result<Option<String>>;

    fn write(&self, contents: &str) -> io::Result<()>;
}

/// A slot backed by `<data_dir>/<name>.json`.
#[derive(Debug)]
pub struct FileSlot {
    name: String,
    path: PathBuf,
}

impl FileSlot {
    pub fn new(data_dir: &Path, name: &str) -> Self {
        Self {
            name: name.to_string(),
            path: data_dir.join(format!("{name}.json")),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl StorageSlot for FileSlot {
    fn name(&self) -> &str {
        &self.name
    }

    fn read(&self) -> io::Result<Option<String>> {
        match std::fs::read_to_string(&self.path) {
            Ok(contents) => Ok(Some(contents)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err),
        }
    }

    fn write(&self, contents: &str) -> io::Result<()> {
        std::fs::write(&self.path, contents)
    }
}

/// An in-memory slot. Clones share the same cell, so a store can be
/// dropped and re-opened over the same contents in tests.
#[derive(Debug, Clone, Default)]
pub struct MemorySlot {
    name: &'static str,
    cell: Arc<Mutex<Option<String>>>,
}

impl MemorySlot {
    pub fn new(name: &'static str) -> Self {
        Self { name, cell: Arc::default() }
    }

    /// A slot pre-seeded with a document, for corrupt-input tests.
    pub fn seeded(name: &'static str, contents: &str) -> Self {
        Self {
            name,
            cell: Arc::new(Mutex::new(Some(contents.to_string()))),
        }
    }
}

impl StorageSlot for MemorySlot {
    fn name(&self) -> &str {
        self.name
    }

    fn read(&self) -> io::Result<Option<String>> {
        Ok(self.cell.lock().unwrap().clone())
    }

    fn write(&self, contents: &str) -> io::Result<()> {
        *self.cell.lock().unwrap() = Some(contents.to_string());
        Ok(())
    }
}
