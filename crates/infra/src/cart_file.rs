//! File-backed cart storage.
//!
//! Persists the serialized cart blob as one JSON file so the cart survives
//! process restarts. Writes land in a sibling temp file first and are
//! renamed into place; a crash mid-write leaves the previous blob intact.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use houndwear_cart::{CartStorage, CartStorageError};

#[derive(Debug, Clone)]
pub struct JsonFileCartStorage {
    path: PathBuf,
}

impl JsonFileCartStorage {
    /// Store the cart under the platform data directory
    /// (`~/.local/share/houndwear/cart.json` on Linux).
    pub fn in_app_data_dir() -> Result<Self, CartStorageError> {
        let base = dirs::data_dir()
            .or_else(|| dirs::home_dir().map(|home| home.join(".local").join("share")))
            .ok_or_else(|| CartStorageError::Io("no data directory available".to_string()))?;

        let dir = base.join("houndwear");
        fs::create_dir_all(&dir).map_err(|e| CartStorageError::Io(e.to_string()))?;

        Ok(Self {
            path: dir.join("cart.json"),
        })
    }

    pub fn at_path(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut os = self.path.as_os_str().to_os_string();
        os.push(".tmp");
        PathBuf::from(os)
    }
}

impl CartStorage for JsonFileCartStorage {
    fn load(&self) -> Result<Option<String>, CartStorageError> {
        match fs::read_to_string(&self.path) {
            Ok(blob) => Ok(Some(blob)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(CartStorageError::Io(e.to_string())),
        }
    }

    fn save(&self, blob: &str) -> Result<(), CartStorageError> {
        let temp = self.temp_path();
        fs::write(&temp, blob).map_err(|e| CartStorageError::Io(e.to_string()))?;
        fs::rename(&temp, &self.path).map_err(|e| CartStorageError::Io(e.to_string()))?;
        Ok(())
    }
}
