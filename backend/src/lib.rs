//! # Nursery Registry Backend
//!
//! CRUD backend for managing children and their guardians, layered as
//! domain services over storage traits with a YAML-file storage backend.
//! The routing layer sits elsewhere; this crate's surface is the service
//! layer plus the [`Registry`] facade that wires it together.

use anyhow::Result;
use std::path::Path;
use std::sync::Arc;

pub mod domain;
pub mod mappers;
pub mod storage;

pub use domain::{ChildService, GuardianService, ServiceError, ValidationErrors};
pub use storage::yaml::YamlConnection;

/// Facade wiring the services over a shared storage connection.
pub struct Registry {
    pub child_service: ChildService,
    pub guardian_service: GuardianService,
}

impl Registry {
    /// Open (or create) a registry rooted at `base_dir`.
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let connection = Arc::new(YamlConnection::new(base_dir)?);

        Ok(Self {
            child_service: ChildService::new(connection.clone()),
            guardian_service: GuardianService::new(connection),
        })
    }

    /// Open a registry in the default per-user data directory.
    pub fn new_default() -> Result<Self> {
        let connection = Arc::new(YamlConnection::new_default()?);

        Ok(Self {
            child_service: ChildService::new(connection.clone()),
            guardian_service: GuardianService::new(connection),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn registry_wires_services_over_one_store() {
        let temp_dir = TempDir::new().unwrap();
        let registry = Registry::new(temp_dir.path()).unwrap();

        let guardian = registry.guardian_service.create().unwrap();
        let child = registry
            .child_service
            .create(Some(shared::ChildInsertForm {
                first_name: "Emma".to_string(),
                date_of_birth: chrono::NaiveDate::from_ymd_opt(2019, 5, 15).unwrap(),
                allergies: vec![],
                toilet_trained: false,
                guardian_ids: vec![guardian.id.unwrap()],
            }))
            .unwrap();

        let fetched = registry.guardian_service.get_one(guardian.id).unwrap();
        assert_eq!(fetched.children.len(), 1);
        assert_eq!(fetched.children[0].id, child.id);
    }
}
