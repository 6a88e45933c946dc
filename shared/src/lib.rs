use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Read-facing projection of a child record.
///
/// `id` is `None` when the record no longer has persistent identity; this is
/// how `delete` hands back a snapshot of what was just removed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChildDto {
    pub id: Option<i64>,
    pub first_name: String,
    pub date_of_birth: NaiveDate,
    /// Allergy entries in the order they were recorded.
    pub allergies: Vec<String>,
    /// Either `"trained"` or `"not-trained"`.
    pub toilet_trained_label: String,
}

/// Read-facing projection of a guardian record with its children resolved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GuardianDto {
    pub id: Option<i64>,
    pub children: Vec<ChildDto>,
}

/// Input shape for creating a child. Carries guardian ids, not guardians;
/// resolving them is the service layer's job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChildInsertForm {
    pub first_name: String,
    pub date_of_birth: NaiveDate,
    pub allergies: Vec<String>,
    pub toilet_trained: bool,
    pub guardian_ids: Vec<i64>,
}

/// Input shape for a full update of an existing child. The target id travels
/// next to the form, never inside it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChildUpdateForm {
    pub first_name: String,
    pub date_of_birth: NaiveDate,
    pub allergies: Vec<String>,
    pub toilet_trained: bool,
    pub guardian_ids: Vec<i64>,
}
