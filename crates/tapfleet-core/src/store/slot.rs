// ── Storage slots ──
//
// A slot is one key in some durable key-value medium holding the
// serialized device collection. The store reads it once on load and
// overwrites it wholesale on every save.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::CoreError;

/// Slot key used when none is configured.
pub const DEFAULT_SLOT_KEY: &str = "switchData";

/// Backing medium for the device collection.
pub trait StorageSlot {
    /// Current contents, or `None` if nothing was ever written.
    fn read(&self) -> Result<Option<String>, CoreError>;

    /// Replace the contents.
    fn write(&mut self, contents: &str) -> Result<(), CoreError>;

    /// Short human-readable location, for logs and diagnostics.
    fn describe(&self) -> String;
}

// ── MemorySlot ──────────────────────────────────────────────────────

/// In-process slot. Useful for tests and embedding.
#[derive(Debug, Clone, Default)]
pub struct MemorySlot {
    contents: Option<String>,
    writes: usize,
}

impl MemorySlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// A slot that already holds `contents`.
    pub fn with_contents(contents: impl Into<String>) -> Self {
        Self {
            contents: Some(contents.into()),
            writes: 0,
        }
    }

    pub fn contents(&self) -> Option<&str> {
        self.contents.as_deref()
    }

    /// How many times the slot has been written.
    pub fn write_count(&self) -> usize {
        self.writes
    }
}

impl StorageSlot for MemorySlot {
    fn read(&self) -> Result<Option<String>, CoreError> {
        Ok(self.contents.clone())
    }

    fn write(&mut self, contents: &str) -> Result<(), CoreError> {
        self.contents = Some(contents.to_owned());
        self.writes += 1;
        Ok(())
    }

    fn describe(&self) -> String {
        "memory".into()
    }
}

// ── FileSlot ────────────────────────────────────────────────────────

/// A JSON file at `<dir>/<key>.json`.
///
/// Writes go to a sibling temp file that is then renamed over the target,
/// so a crash mid-write leaves the previous contents intact.
#[derive(Debug, Clone)]
pub struct FileSlot {
    path: PathBuf,
}

impl FileSlot {
    pub fn new(dir: impl AsRef<Path>, key: &str) -> Self {
        Self {
            path: dir.as_ref().join(format!("{key}.json")),
        }
    }

    /// Use an explicit file path instead of `<dir>/<key>.json`.
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(std::ffi::OsStr::to_os_string)
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl StorageSlot for FileSlot {
    fn read(&self) -> Result<Option<String>, CoreError> {
        match fs::read_to_string(&self.path) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn write(&mut self, contents: &str) -> Result<(), CoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let tmp = self.temp_path();
        let written = write_synced(&tmp, contents).and_then(|()| fs::rename(&tmp, &self.path));
        if let Err(e) = written {
            let _ = fs::remove_file(&tmp);
            return Err(e.into());
        }
        debug!(path = %self.path.display(), bytes = contents.len(), "slot written");
        Ok(())
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

fn write_synced(path: &Path, contents: &str) -> std::io::Result<()> {
    let mut file = fs::File::create(path)?;
    file.write_all(contents.as_bytes())?;
    file.sync_all()
}
