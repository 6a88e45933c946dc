//! backend/src/mappers/guardian_mapper.rs

use super::child_mapper::ChildMapper;
use crate::domain::models::child::Child;
use crate::domain::models::guardian::Guardian;
use shared::GuardianDto;

/// Mapper to convert a domain guardian to its DTO. The guardian model does
/// not hold its children; the caller supplies whatever it resolved.
pub struct GuardianMapper;

impl GuardianMapper {
    pub fn to_dto(guardian: &Guardian, children: &[Child]) -> GuardianDto {
        GuardianDto {
            id: Some(guardian.id),
            children: children.iter().map(ChildMapper::to_dto).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Utc};
    use std::collections::BTreeSet;

    #[test]
    fn to_dto_maps_resolved_children() {
        let now = Utc::now();
        let guardian = Guardian {
            id: 3,
            created_at: now,
            updated_at: now,
        };
        let child = Child {
            id: 1,
            first_name: "Emma".to_string(),
            date_of_birth: NaiveDate::from_ymd_opt(2019, 5, 15).unwrap(),
            allergies: vec![],
            toilet_trained: true,
            guardian_ids: BTreeSet::from([3]),
            created_at: now,
            updated_at: now,
        };

        let dto = GuardianMapper::to_dto(&guardian, &[child]);
        assert_eq!(dto.id, Some(3));
        assert_eq!(dto.children.len(), 1);
        assert_eq!(dto.children[0].id, Some(1));
    }
}
