use log::info;
use std::sync::Arc;

use crate::domain::errors::ServiceError;
use crate::domain::models::child::Child;
use crate::mappers::GuardianMapper;
use crate::storage::traits::{ChildStorage, GuardianStorage};
use crate::storage::yaml::{ChildRepository, GuardianRepository, YamlConnection};
use shared::GuardianDto;

/// Service for managing guardians.
///
/// A guardian's children are the inverse side of the child↔guardian
/// relation; they are resolved on demand by scanning the child store.
#[derive(Clone)]
pub struct GuardianService {
    guardian_repository: GuardianRepository,
    child_repository: ChildRepository,
}

impl GuardianService {
    /// Create a new GuardianService over a shared storage connection
    pub fn new(connection: Arc<YamlConnection>) -> Self {
        Self {
            guardian_repository: GuardianRepository::new(connection.clone()),
            child_repository: ChildRepository::new(connection),
        }
    }

    /// Register a new guardian
    pub fn create(&self) -> Result<GuardianDto, ServiceError> {
        let guardian = self.guardian_repository.store_guardian()?;
        info!("Created guardian with id {}", guardian.id);
        Ok(GuardianMapper::to_dto(&guardian, &[]))
    }

    /// Get a guardian by id, with its children resolved
    pub fn get_one(&self, id: Option<i64>) -> Result<GuardianDto, ServiceError> {
        let id = id.ok_or_else(|| {
            ServiceError::InvalidArgument("id cannot be absent".to_string())
        })?;

        let guardian = self
            .guardian_repository
            .get_guardian(id)?
            .ok_or(ServiceError::NotFound { entity: "guardian", id })?;

        let children = self.children_of(id)?;
        Ok(GuardianMapper::to_dto(&guardian, &children))
    }

    /// List all guardians with their children resolved
    pub fn get_all(&self) -> Result<Vec<GuardianDto>, ServiceError> {
        let guardians = self.guardian_repository.list_guardians()?;

        let mut dtos = Vec::with_capacity(guardians.len());
        for guardian in &guardians {
            let children = self.children_of(guardian.id)?;
            dtos.push(GuardianMapper::to_dto(guardian, &children));
        }
        Ok(dtos)
    }

    /// Delete a guardian and return a snapshot with identity stripped.
    ///
    /// No cascade: children keep whatever guardian ids they hold.
    pub fn delete(&self, id: i64) -> Result<GuardianDto, ServiceError> {
        let guardian = self
            .guardian_repository
            .get_guardian(id)?
            .ok_or(ServiceError::NotFound { entity: "guardian", id })?;

        let children = self.children_of(id)?;
        self.guardian_repository.delete_guardian(id)?;
        info!("Deleted guardian with id {}", id);

        let mut dto = GuardianMapper::to_dto(&guardian, &children);
        dto.id = None;
        Ok(dto)
    }

    /// Inverse side of the relation, resolved by scanning the child store
    fn children_of(&self, guardian_id: i64) -> Result<Vec<Child>, ServiceError> {
        let children = self.child_repository.list_children()?;
        Ok(children
            .into_iter()
            .filter(|c| c.guardian_ids.contains(&guardian_id))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::child_service::ChildService;
    use chrono::NaiveDate;
    use shared::ChildInsertForm;
    use tempfile::TempDir;

    fn setup_test() -> (GuardianService, ChildService, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let conn = Arc::new(YamlConnection::new(temp_dir.path()).unwrap());
        (
            GuardianService::new(conn.clone()),
            ChildService::new(conn),
            temp_dir,
        )
    }

    fn insert_form(first_name: &str, guardian_ids: Vec<i64>) -> ChildInsertForm {
        ChildInsertForm {
            first_name: first_name.to_string(),
            date_of_birth: NaiveDate::from_ymd_opt(2019, 5, 15).unwrap(),
            allergies: vec![],
            toilet_trained: false,
            guardian_ids,
        }
    }

    #[test]
    fn test_create_and_get_guardian() {
        let (service, _children, _temp_dir) = setup_test();

        let created = service.create().unwrap();
        assert_eq!(created.id, Some(1));
        assert!(created.children.is_empty());

        let fetched = service.get_one(created.id).unwrap();
        assert_eq!(fetched, created);
    }

    #[test]
    fn test_get_one_argument_and_not_found_contracts() {
        let (service, _children, _temp_dir) = setup_test();

        assert!(matches!(
            service.get_one(None),
            Err(ServiceError::InvalidArgument(_))
        ));
        assert!(matches!(
            service.get_one(Some(42)),
            Err(ServiceError::NotFound { entity: "guardian", id: 42 })
        ));
    }

    #[test]
    fn test_children_are_resolved_on_demand() {
        let (service, children, _temp_dir) = setup_test();

        let guardian = service.create().unwrap();
        let gid = guardian.id.unwrap();
        children.create(Some(insert_form("Emma", vec![gid]))).unwrap();
        children.create(Some(insert_form("Noah", vec![]))).unwrap();

        let fetched = service.get_one(Some(gid)).unwrap();
        assert_eq!(fetched.children.len(), 1);
        assert_eq!(fetched.children[0].first_name, "Emma");
    }

    #[test]
    fn test_delete_does_not_cascade_to_children() {
        let (service, children, _temp_dir) = setup_test();

        let guardian = service.create().unwrap();
        let gid = guardian.id.unwrap();
        let child = children.create(Some(insert_form("Emma", vec![gid]))).unwrap();

        let snapshot = service.delete(gid).unwrap();
        assert_eq!(snapshot.id, None);
        assert_eq!(snapshot.children.len(), 1);

        // The child record is untouched
        assert!(children.get_one(child.id).is_ok());
        assert!(matches!(
            service.get_one(Some(gid)),
            Err(ServiceError::NotFound { .. })
        ));
    }
}
