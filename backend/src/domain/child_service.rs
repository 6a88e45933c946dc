use chrono::Utc;
use log::{info, warn};
use std::collections::BTreeSet;
use std::sync::Arc;

use crate::domain::errors::{ServiceError, ValidationErrors};
use crate::domain::models::child::Child;
use crate::mappers::ChildMapper;
use crate::storage::traits::{ChildStorage, GuardianStorage};
use crate::storage::yaml::{ChildRepository, GuardianRepository, YamlConnection};
use shared::{ChildDto, ChildInsertForm, ChildUpdateForm};

/// Service for managing children in the registry.
///
/// Every operation is synchronous and runs to completion within the calling
/// thread; validation failures never leave partial state behind.
#[derive(Clone)]
pub struct ChildService {
    child_repository: ChildRepository,
    guardian_repository: GuardianRepository,
}

impl ChildService {
    /// Create a new ChildService over a shared storage connection
    pub fn new(connection: Arc<YamlConnection>) -> Self {
        Self {
            child_repository: ChildRepository::new(connection.clone()),
            guardian_repository: GuardianRepository::new(connection),
        }
    }

    /// Create a child from an insert form.
    ///
    /// Guardian ids that do not resolve are dropped without error; guardian
    /// resolution is only enforced on `update` and `patch_guardians`.
    pub fn create(&self, form: Option<ChildInsertForm>) -> Result<ChildDto, ServiceError> {
        let form = form.ok_or_else(|| {
            ServiceError::InvalidArgument("inserted child cannot be absent".to_string())
        })?;

        info!("Creating child: first_name={}", form.first_name);

        let mut child = ChildMapper::to_entity(&form);
        let guardians = self
            .guardian_repository
            .get_guardians_by_ids(&form.guardian_ids)?;
        child.guardian_ids = guardians.iter().map(|g| g.id).collect();

        let stored = self.child_repository.store_child(&child)?;
        info!("Created child {} with id {}", stored.first_name, stored.id);

        Ok(ChildMapper::to_dto(&stored))
    }

    /// Replace an existing child with the form's contents.
    ///
    /// Both validation passes run before anything is written: blank allergy
    /// entries and unresolved guardian ids are reported together in one
    /// accumulated error, never one at a time. The guardian set is replaced
    /// wholesale with the resolved set.
    pub fn update(
        &self,
        id: Option<i64>,
        form: Option<ChildUpdateForm>,
    ) -> Result<ChildDto, ServiceError> {
        let (Some(id), Some(form)) = (id, form) else {
            return Err(ServiceError::InvalidArgument(
                "id and form are both required".to_string(),
            ));
        };

        info!("Updating child: {}", id);

        let existing = self
            .child_repository
            .get_child(id)?
            .ok_or(ServiceError::NotFound { entity: "child", id })?;

        let mut errors = ValidationErrors::new();

        if form.allergies.iter().any(|a| a.trim().is_empty()) {
            errors.add("allergies", "some allergy entries are blank");
        }

        let requested: BTreeSet<i64> = form.guardian_ids.iter().copied().collect();
        let guardians = self
            .guardian_repository
            .get_guardians_by_ids(&form.guardian_ids)?;
        if guardians.len() < requested.len() {
            errors.add("guardians", "some ids do not lead to a guardian");
        }

        if !errors.is_empty() {
            warn!("Validation failed for child {}: {}", id, errors);
            return Err(ServiceError::ValidationFailed(errors));
        }

        let draft = ChildMapper::to_entity_for_update(&form);
        let updated = Child {
            id,
            first_name: draft.first_name,
            date_of_birth: draft.date_of_birth,
            allergies: draft.allergies,
            toilet_trained: draft.toilet_trained,
            guardian_ids: guardians.iter().map(|g| g.id).collect(),
            created_at: existing.created_at,
            updated_at: Utc::now(),
        };

        self.child_repository.update_child(&updated)?;
        info!("Updated child {} with id {}", updated.first_name, updated.id);

        Ok(ChildMapper::to_dto(&updated))
    }

    /// Get a child by id
    pub fn get_one(&self, id: Option<i64>) -> Result<ChildDto, ServiceError> {
        let id = id.ok_or_else(|| {
            ServiceError::InvalidArgument("id cannot be absent".to_string())
        })?;

        let child = self
            .child_repository
            .get_child(id)?
            .ok_or(ServiceError::NotFound { entity: "child", id })?;

        Ok(ChildMapper::to_dto(&child))
    }

    /// List all children in store order
    pub fn get_all(&self) -> Result<Vec<ChildDto>, ServiceError> {
        let children = self.child_repository.list_children()?;
        Ok(children.iter().map(ChildMapper::to_dto).collect())
    }

    /// Delete a child and return a snapshot of it with identity stripped.
    pub fn delete(&self, id: i64) -> Result<ChildDto, ServiceError> {
        let child = self
            .child_repository
            .get_child(id)?
            .ok_or(ServiceError::NotFound { entity: "child", id })?;

        self.child_repository.delete_child(id)?;
        info!("Deleted child {} with id {}", child.first_name, id);

        let mut dto = ChildMapper::to_dto(&child);
        dto.id = None;
        Ok(dto)
    }

    /// DTOs for the ids that resolve; unknown ids are dropped, never an
    /// error.
    pub fn get_all_by_id(&self, ids: &[i64]) -> Result<Vec<ChildDto>, ServiceError> {
        let children = self.child_repository.get_children_by_ids(ids)?;
        Ok(children.iter().map(ChildMapper::to_dto).collect())
    }

    /// Replace a child's guardian set wholesale.
    ///
    /// All ids must resolve or nothing is persisted; the error carries the
    /// ids that didn't.
    pub fn patch_guardians(
        &self,
        id: i64,
        guardian_ids: &[i64],
    ) -> Result<ChildDto, ServiceError> {
        let mut child = self
            .child_repository
            .get_child(id)?
            .ok_or(ServiceError::NotFound { entity: "child", id })?;

        let requested: BTreeSet<i64> = guardian_ids.iter().copied().collect();
        let guardians = self
            .guardian_repository
            .get_guardians_by_ids(guardian_ids)?;

        if guardians.len() < requested.len() {
            let found: BTreeSet<i64> = guardians.iter().map(|g| g.id).collect();
            let missing: Vec<i64> = requested.difference(&found).copied().collect();
            warn!("Guardians not found for child {}: {:?}", id, missing);
            return Err(ServiceError::GuardianNotExisting { missing });
        }

        child.guardian_ids = guardians.iter().map(|g| g.id).collect();
        child.updated_at = Utc::now();
        self.child_repository.update_child(&child)?;
        info!("Replaced guardians of child {}: {:?}", id, child.guardian_ids);

        Ok(ChildMapper::to_dto(&child))
    }

    /// Children with at least one allergy entry containing `allergy`
    pub fn get_all_with_allergy(&self, allergy: &str) -> Result<Vec<ChildDto>, ServiceError> {
        let children = self.child_repository.find_children_with_allergy(allergy)?;
        Ok(children.iter().map(ChildMapper::to_dto).collect())
    }
}
