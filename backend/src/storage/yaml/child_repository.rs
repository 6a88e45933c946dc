use anyhow::{Context, Result};
use chrono::Utc;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::connection::YamlConnection;
use crate::domain::models::child::{Child, NewChild};
use crate::storage::traits::ChildStorage;

/// Intermediate struct for YAML serialization with string date fields
#[derive(Debug, Clone, Serialize, Deserialize)]
struct YamlChild {
    id: i64,
    first_name: String,
    date_of_birth: String, // String representation for YAML
    allergies: Vec<String>,
    toilet_trained: bool,
    guardian_ids: Vec<i64>,
    created_at: String, // String representation for YAML
    updated_at: String, // String representation for YAML
}

/// YAML-based child repository using filesystem discovery.
///
/// Each child lives in its own `children/child_<id>.yaml` file; writes go
/// through a temp file and a rename so a record is either fully written or
/// not written at all.
#[derive(Clone)]
pub struct ChildRepository {
    connection: Arc<YamlConnection>,
}

impl ChildRepository {
    /// Create a new YAML child repository
    pub fn new(connection: Arc<YamlConnection>) -> Self {
        Self { connection }
    }

    /// Get the path to a child's YAML file
    fn child_yaml_path(&self, id: i64) -> PathBuf {
        self.connection
            .children_directory()
            .join(format!("child_{}.yaml", id))
    }

    /// Parse the id out of a `child_<id>.yaml` file name
    fn id_from_file_name(name: &str) -> Option<i64> {
        name.strip_prefix("child_")?
            .strip_suffix(".yaml")?
            .parse()
            .ok()
    }

    /// Discover all children by scanning the children directory
    fn discover_children(&self) -> Result<Vec<Child>> {
        let dir = self.connection.children_directory();

        if !dir.exists() {
            debug!("Children directory doesn't exist, returning empty list");
            return Ok(Vec::new());
        }

        let mut children = Vec::new();

        for entry in fs::read_dir(&dir)? {
            let entry = entry?;
            let path = entry.path();

            let file_name = match path.file_name().and_then(|n| n.to_str()) {
                Some(name) => name,
                None => {
                    warn!("Skipping entry with invalid name: {:?}", path);
                    continue;
                }
            };

            if !path.is_file() || Self::id_from_file_name(file_name).is_none() {
                continue;
            }

            match Self::load_child_file(&path) {
                Ok(child) => {
                    debug!("Discovered child {} from {}", child.id, file_name);
                    children.push(child);
                }
                Err(e) => {
                    warn!("Error loading child from {}: {}", file_name, e);
                }
            }
        }

        // Sort by id for consistent ordering
        children.sort_by_key(|c| c.id);

        debug!("Discovered {} children", children.len());
        Ok(children)
    }

    /// Load a single child from its YAML file
    fn load_child_file(path: &Path) -> Result<Child> {
        let yaml_content = fs::read_to_string(path)?;
        let yaml_child: YamlChild = serde_yaml::from_str(&yaml_content)?;

        // Map YAML child to domain child with proper type conversions
        let child = Child {
            id: yaml_child.id,
            first_name: yaml_child.first_name,
            date_of_birth: chrono::NaiveDate::parse_from_str(&yaml_child.date_of_birth, "%Y-%m-%d")
                .context("Failed to parse date_of_birth")?,
            allergies: yaml_child.allergies,
            toilet_trained: yaml_child.toilet_trained,
            guardian_ids: yaml_child.guardian_ids.into_iter().collect(),
            created_at: chrono::DateTime::parse_from_rfc3339(&yaml_child.created_at)
                .context("Failed to parse created_at")?
                .with_timezone(&Utc),
            updated_at: chrono::DateTime::parse_from_rfc3339(&yaml_child.updated_at)
                .context("Failed to parse updated_at")?
                .with_timezone(&Utc),
        };

        Ok(child)
    }

    /// Save a child to its YAML file
    fn save_child_file(&self, child: &Child) -> Result<()> {
        let yaml_child = YamlChild {
            id: child.id,
            first_name: child.first_name.clone(),
            date_of_birth: child.date_of_birth.format("%Y-%m-%d").to_string(),
            allergies: child.allergies.clone(),
            toilet_trained: child.toilet_trained,
            guardian_ids: child.guardian_ids.iter().copied().collect(),
            created_at: child.created_at.to_rfc3339(),
            updated_at: child.updated_at.to_rfc3339(),
        };

        let yaml_path = self.child_yaml_path(child.id);
        let yaml_content = serde_yaml::to_string(&yaml_child)?;

        // Atomic write using temp file
        let temp_path = yaml_path.with_extension("tmp");
        fs::write(&temp_path, yaml_content)?;
        fs::rename(&temp_path, &yaml_path)?;

        debug!("Saved child {} to {:?}", child.id, yaml_path);
        Ok(())
    }

    /// Next free id: one past the highest id currently on disk
    fn next_child_id(&self) -> Result<i64> {
        let dir = self.connection.children_directory();
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

impl ChildStorage for ChildRepository {
    /// Store a new child; assigns the next free id and the timestamps
    fn store_child(&self, child: &NewChild) -> Result<Child> {
        let id = self.next_child_id()?;
        let now = Utc::now();

        let stored = Child {
            id,
            first_name: child.first_name.clone(),
            date_of_birth: child.date_of_birth,
            allergies: child.allergies.clone(),
            toilet_trained: child.toilet_trained,
            guardian_ids: child.guardian_ids.clone(),
            created_at: now,
            updated_at: now,
        };

        self.save_child_file(&stored)?;
        info!("Stored child {} with id {}", stored.first_name, stored.id);

        Ok(stored)
    }

    /// Overwrite an existing child record
    fn update_child(&self, child: &Child) -> Result<()> {
        if !self.child_yaml_path(child.id).exists() {
            warn!("Attempted to update a non-existent child: {}", child.id);
            return Err(anyhow::anyhow!("Child not found for update"));
        }
        self.save_child_file(child)
    }

    /// Retrieve a specific child by id
    fn get_child(&self, id: i64) -> Result<Option<Child>> {
        let path = self.child_yaml_path(id);
        if !path.exists() {
            return Ok(None);
        }
        Self::load_child_file(&path).map(Some)
    }

    /// Retrieve the subset of `ids` that exists, without duplicates
    fn get_children_by_ids(&self, ids: &[i64]) -> Result<Vec<Child>> {
        let mut seen = BTreeSet::new();
        let mut children = Vec::new();

        for &id in ids {
            if !seen.insert(id) {
                continue;
            }
            if let Some(child) = self.get_child(id)? {
                children.push(child);
            }
        }

        Ok(children)
    }

    /// List all children ordered by id
    fn list_children(&self) -> Result<Vec<Child>> {
        self.discover_children()
    }

    /// Delete a child by id
    fn delete_child(&self, id: i64) -> Result<()> {
        let path = self.child_yaml_path(id);
        if path.exists() {
            fs::remove_file(&path)?;
            info!("Deleted child file {:?}", path);
        } else {
            warn!("Attempted to delete a non-existent child: {}", id);
        }
        Ok(())
    }

    /// Check whether a child with this id exists
    fn child_exists(&self, id: i64) -> Result<bool> {
        Ok(self.child_yaml_path(id).exists())
    }

    /// Children with at least one allergy entry containing `substring`
    fn find_children_with_allergy(&self, substring: &str) -> Result<Vec<Child>> {
        let children = self.discover_children()?;
        Ok(children
            .into_iter()
            .filter(|c| c.allergies.iter().any(|a| a.contains(substring)))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn setup_test_repo() -> (ChildRepository, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let connection = YamlConnection::new(temp_dir.path()).unwrap();
        let repo = ChildRepository::new(Arc::new(connection));
        (repo, temp_dir)
    }

    fn sample_child(first_name: &str) -> NewChild {
        NewChild {
            first_name: first_name.to_string(),
            date_of_birth: chrono::NaiveDate::from_ymd_opt(2019, 5, 15).unwrap(),
            allergies: vec!["peanut".to_string()],
            toilet_trained: false,
            guardian_ids: BTreeSet::new(),
        }
    }

    #[test]
    fn test_store_assigns_sequential_ids() {
        let (repo, _temp_dir) = setup_test_repo();

        let first = repo.store_child(&sample_child("Emma")).unwrap();
        let second = repo.store_child(&sample_child("Noah")).unwrap();

        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);
    }

    #[test]
    fn test_store_and_get_child() {
        let (repo, _temp_dir) = setup_test_repo();

        let stored = repo.store_child(&sample_child("Emma")).unwrap();

        let retrieved = repo.get_child(stored.id).unwrap().unwrap();
        assert_eq!(retrieved, stored);

        assert!(repo.get_child(999).unwrap().is_none());
        assert!(repo.child_exists(stored.id).unwrap());
        assert!(!repo.child_exists(999).unwrap());
    }

    #[test]
    fn test_list_children_ordered_by_id() {
        let (repo, _temp_dir) = setup_test_repo();

        repo.store_child(&sample_child("Emma")).unwrap();
        repo.store_child(&sample_child("Noah")).unwrap();
        repo.store_child(&sample_child("Olivia")).unwrap();

        let children = repo.list_children().unwrap();
        assert_eq!(children.len(), 3);
        assert_eq!(
            children.iter().map(|c| c.id).collect::<Vec<_>>(),
            vec![1, 2, 3]
        );
    }

    #[test]
    fn test_get_children_by_ids_drops_unknown_and_duplicates() {
        let (repo, _temp_dir) = setup_test_repo();

        let a = repo.store_child(&sample_child("Emma")).unwrap();
        let b = repo.store_child(&sample_child("Noah")).unwrap();

        let found = repo.get_children_by_ids(&[a.id, b.id, b.id, 99]).unwrap();
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].id, a.id);
        assert_eq!(found[1].id, b.id);
    }

    #[test]
    fn test_update_child_overwrites_record() {
        let (repo, _temp_dir) = setup_test_repo();

        let mut child = repo.store_child(&sample_child("Emma")).unwrap();
        child.first_name = "Emma Rose".to_string();
        child.toilet_trained = true;

        repo.update_child(&child).unwrap();

        let reloaded = repo.get_child(child.id).unwrap().unwrap();
        assert_eq!(reloaded.first_name, "Emma Rose");
        assert!(reloaded.toilet_trained);
    }

    #[test]
    fn test_update_nonexistent_child_fails() {
        let (repo, _temp_dir) = setup_test_repo();

        let mut child = repo.store_child(&sample_child("Emma")).unwrap();
        child.id = 42;

        assert!(repo.update_child(&child).is_err());
    }

    #[test]
    fn test_delete_child_removes_file() {
        let (repo, _temp_dir) = setup_test_repo();

        let child = repo.store_child(&sample_child("Emma")).unwrap();
        repo.delete_child(child.id).unwrap();

        assert!(repo.get_child(child.id).unwrap().is_none());
        // Deleting an unknown id is not an error at the storage level
        repo.delete_child(child.id).unwrap();
    }

    #[test]
    fn test_find_children_with_allergy_substring() {
        let (repo, _temp_dir) = setup_test_repo();

        let mut with_peanut = sample_child("Emma");
        with_peanut.allergies = vec!["peanut butter".to_string(), "dust".to_string()];
        let mut without = sample_child("Noah");
        without.allergies = vec!["lactose".to_string()];

        let stored = repo.store_child(&with_peanut).unwrap();
        repo.store_child(&without).unwrap();

        let found = repo.find_children_with_allergy("peanut").unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, stored.id);

        assert!(repo.find_children_with_allergy("gluten").unwrap().is_empty());
    }

    #[test]
    fn test_discovery_skips_malformed_files() {
        let (repo, temp_dir) = setup_test_repo();

        repo.store_child(&sample_child("Emma")).unwrap();
        fs::write(
            temp_dir.path().join("children").join("child_9.yaml"),
            "not: [valid, child",
        )
        .unwrap();

        let children = repo.list_children().unwrap();
        assert_eq!(children.len(), 1);
    }
}
