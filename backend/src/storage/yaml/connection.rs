use anyhow::Result;
use log::info;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// YamlConnection manages the data directory and hands out per-entity file
/// paths for the YAML repositories.
#[derive(Clone)]
pub struct YamlConnection {
    base_directory: Arc<Mutex<PathBuf>>,
}

impl YamlConnection {
    /// Create a new connection rooted at `base_directory`, creating the
    /// entity subdirectories if they don't exist yet.
    pub fn new<P: AsRef<Path>>(base_directory: P) -> Result<Self> {
        let base_path = base_directory.as_ref().to_path_buf();

        fs::create_dir_all(base_path.join("children"))?;
        fs::create_dir_all(base_path.join("guardians"))?;

        Ok(Self {
            base_directory: Arc::new(Mutex::new(base_path)),
        })
    }

    /// Create a connection in the default per-user data directory
    /// (`~/Documents/Nursery Registry`).
    pub fn new_default() -> Result<Self> {
        let home_dir = std::env::var("HOME")
            .or_else(|_| std::env::var("USERPROFILE"))
            .map_err(|_| anyhow::anyhow!("Could not determine home directory"))?;

        let data_dir = PathBuf::from(home_dir)
            .join("Documents")
            .join("Nursery Registry");

        info!("Using default data directory: {}", data_dir.display());
        Self::new(data_dir)
    }

    pub fn base_directory(&self) -> PathBuf {
        self.base_directory.lock().unwrap().clone()
    }

    /// Directory holding one YAML file per child.
    pub fn children_directory(&self) -> PathBuf {
        self.base_directory().join("children")
    }

    /// Directory holding one YAML file per guardian.
    pub fn guardians_directory(&self) -> PathBuf {
        self.base_directory().join("guardians")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn creates_entity_directories() {
        let temp_dir = TempDir::new().unwrap();
        let conn = YamlConnection::new(temp_dir.path()).unwrap();

        assert!(conn.children_directory().is_dir());
        assert!(conn.guardians_directory().is_dir());
    }
}
