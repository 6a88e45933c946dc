//! backend/src/mappers/child_mapper.rs

use crate::domain::models::child::{Child, NewChild};
use shared::{ChildDto, ChildInsertForm, ChildUpdateForm};

/// Label rendered for a toilet-trained child.
pub const TOILET_TRAINED_LABEL: &str = "trained";
/// Label rendered for a child that is not toilet trained yet.
pub const NOT_TOILET_TRAINED_LABEL: &str = "not-trained";

/// Mapper to convert between the shared child DTO/forms and the domain
/// child model.
pub struct ChildMapper;

impl ChildMapper {
    /// Converts a domain child to its read-facing DTO.
    pub fn to_dto(child: &Child) -> ChildDto {
        ChildDto {
            id: Some(child.id),
            first_name: child.first_name.clone(),
            date_of_birth: child.date_of_birth,
            allergies: child.allergies.clone(),
            toilet_trained_label: if child.toilet_trained {
                TOILET_TRAINED_LABEL.to_string()
            } else {
                NOT_TOILET_TRAINED_LABEL.to_string()
            },
        }
    }

    /// Total variant of [`ChildMapper::to_dto`]: an absent child maps to an
    /// absent DTO, never an error.
    pub fn to_dto_opt(child: Option<&Child>) -> Option<ChildDto> {
        child.map(Self::to_dto)
    }

    /// Converts an insert form to a not-yet-persisted domain child.
    ///
    /// Guardian ids are copied verbatim; resolving them against the guardian
    /// store is the service's responsibility.
    pub fn to_entity(form: &ChildInsertForm) -> NewChild {
        NewChild {
            first_name: form.first_name.clone(),
            date_of_birth: form.date_of_birth,
            allergies: form.allergies.clone(),
            toilet_trained: form.toilet_trained,
            guardian_ids: form.guardian_ids.iter().copied().collect(),
        }
    }

    /// Same contract as [`ChildMapper::to_entity`], for the update form.
    pub fn to_entity_for_update(form: &ChildUpdateForm) -> NewChild {
        NewChild {
            first_name: form.first_name.clone(),
            date_of_birth: form.date_of_birth,
            allergies: form.allergies.clone(),
            toilet_trained: form.toilet_trained,
            guardian_ids: form.guardian_ids.iter().copied().collect(),
        }
    }
}
