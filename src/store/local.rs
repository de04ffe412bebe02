use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::errors::AuthResult;

/// Client-local key-value surface, backed by a single JSON file.
///
/// Values are read and written per operation rather than cached; the file is
/// a handful of small entries and going to disk every time keeps concurrent
/// readers (tests, the CLI) from seeing a stale cache.
#[derive(Debug, Clone)]
pub struct LocalStore {
    path: PathBuf,
}

impl LocalStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn get(&self, key: &str) -> AuthResult<Option<String>> {
        Ok(self.load()?.remove(key))
    }

    pub fn set(&self, key: &str, value: &str) -> AuthResult<()> {
        let mut entries = self.load()?;
        entries.insert(key.to_string(), value.to_string());
        self.save(&entries)
    }

    pub fn remove(&self, key: &str) -> AuthResult<()> {
        let mut entries = self.load()?;
        if entries.remove(key).is_some() {
            self.save(&entries)?;
        }
        Ok(())
    }

    fn load(&self) -> AuthResult<BTreeMap<String, String>> {
        match std::fs::read_to_string(&self.path) {
            Ok(raw) => Ok(serde_json::from_str(&raw)?),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(err) => Err(err.into()),
        }
    }

    fn save(&self, entries: &BTreeMap<String, String>) -> AuthResult<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let raw = serde_json::to_string_pretty(entries)?;
        std::fs::write(&self.path, raw)?;
        Ok(())
    }
}
