use anyhow::{Context, Result};
use chrono::Utc;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::connection::YamlConnection;
use crate::domain::models::guardian::Guardian;
use crate::storage::traits::GuardianStorage;

/// Intermediate struct for YAML serialization with string date fields
#[derive(Debug, Clone, Serialize, Deserialize)]
struct YamlGuardian {
    id: i64,
    created_at: String,
    updated_at: String,
}

/// YAML-based guardian repository, one `guardians/guardian_<id>.yaml` file
/// per record. Guardians only persist identity; their children are the
/// inverse side of the relation and live in the child store.
#[derive(Clone)]
pub struct GuardianRepository {
    connection: Arc<YamlConnection>,
}

impl GuardianRepository {
    /// Create a new YAML guardian repository
    pub fn new(connection: Arc<YamlConnection>) -> Self {
        Self { connection }
    }

    fn guardian_yaml_path(&self, id: i64) -> PathBuf {
        self.connection
            .guardians_directory()
            .join(format!("guardian_{}.yaml", id))
    }

    fn id_from_file_name(name: &str) -> Option<i64> {
        name.strip_prefix("guardian_")?
            .strip_suffix(".yaml")?
            .parse()
            .ok()
    }

    fn load_guardian_file(path: &Path) -> Result<Guardian> {
        let yaml_content = fs::read_to_string(path)?;
        let yaml_guardian: YamlGuardian = serde_yaml::from_str(&yaml_content)?;

        Ok(Guardian {
            id: yaml_guardian.id,
            created_at: chrono::DateTime::parse_from_rfc3339(&yaml_guardian.created_at)
                .context("Failed to parse created_at")?
                .with_timezone(&Utc),
            updated_at: chrono::DateTime::parse_from_rfc3339(&yaml_guardian.updated_at)
                .context("Failed to parse updated_at")?
                .with_timezone(&Utc),
        })
    }

    fn save_guardian_file(&self, guardian: &Guardian) -> Result<()> {
        let yaml_guardian = YamlGuardian {
            id: guardian.id,
            created_at: guardian.created_at.to_rfc3339(),
            updated_at: guardian.updated_at.to_rfc3339(),
        };

        let yaml_path = self.guardian_yaml_path(guardian.id);
        let yaml_content = serde_yaml::to_string(&yaml_guardian)?;

        // Atomic write using temp file
        let temp_path = yaml_path.with_extension("tmp");
        fs::write(&temp_path, yaml_content)?;
        fs::rename(&temp_path, &yaml_path)?;

        debug!("Saved guardian {} to {:?}", guardian.id, yaml_path);
        Ok(())
    }

    fn next_guardian_id(&self) -> Result<i64> {
        let dir = self.connection.guardians_directory();
        let mut max_id = 0;

        for entry in fs::read_dir(&dir)? {
            let entry = entry?;
            if let Some(name) = entry.path().file_name().and_then(|n| n.to_str()) {
                if let Some(id) = Self::id_from_file_name(name) {
                    max_id = max_id.max(id);
                }
            }
        }

        Ok(max_id + 1)
    }
}

impl GuardianStorage for GuardianRepository {
    /// Store a fresh guardian record with the next free id
    fn store_guardian(&self) -> Result<Guardian> {
        let now = Utc::now();
        let guardian = Guardian {
            id: self.next_guardian_id()?,
            created_at: now,
            updated_at: now,
        };

        self.save_guardian_file(&guardian)?;
        info!("Stored guardian with id {}", guardian.id);

        Ok(guardian)
    }

    fn get_guardian(&self, id: i64) -> Result<Option<Guardian>> {
        let path = self.guardian_yaml_path(id);
        if !path.exists() {
            return Ok(None);
        }
        Self::load_guardian_file(&path).map(Some)
    }

    /// Retrieve the subset of `ids` that exists, without duplicates
    fn get_guardians_by_ids(&self, ids: &[i64]) -> Result<Vec<Guardian>> {
        let mut seen = BTreeSet::new();
        let mut guardians = Vec::new();

        for &id in ids {
            if !seen.insert(id) {
                continue;
            }
            if let Some(guardian) = self.get_guardian(id)? {
                guardians.push(guardian);
            }
        }

        Ok(guardians)
    }

    /// List all guardians ordered by id
    fn list_guardians(&self) -> Result<Vec<Guardian>> {
        let dir = self.connection.guardians_directory();

        if !dir.exists() {
            debug!("Guardians directory doesn't exist, returning empty list");
            return Ok(Vec::new());
        }

        let mut guardians = Vec::new();

        for entry in fs::read_dir(&dir)? {
            let entry = entry?;
            let path = entry.path();

            let file_name = match path.file_name().and_then(|n| n.to_str()) {
                Some(name) => name,
                None => continue,
            };

            if !path.is_file() || Self::id_from_file_name(file_name).is_none() {
                continue;
            }

            match Self::load_guardian_file(&path) {
                Ok(guardian) => guardians.push(guardian),
                Err(e) => warn!("Error loading guardian from {}: {}", file_name, e),
            }
        }

        guardians.sort_by_key(|g| g.id);
        Ok(guardians)
    }

    fn delete_guardian(&self, id: i64) -> Result<()> {
        let path = self.guardian_yaml_path(id);
        if path.exists() {
            fs::remove_file(&path)?;
            info!("Deleted guardian file {:?}", path);
        } else {
            warn!("Attempted to delete a non-existent guardian: {}", id);
        }
        Ok(())
    }

    fn guardian_exists(&self, id: i64) -> Result<bool> {
        Ok(self.guardian_yaml_path(id).exists())
    }
}
