//! backend/src/domain/models/child.rs

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Domain model representing a child enrolled in the registry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Child {
    pub id: i64,
    pub first_name: String,
    pub date_of_birth: NaiveDate,
    /// Allergy entries in the order they were recorded.
    pub allergies: Vec<String>,
    pub toilet_trained: bool,
    /// Ids of the guardians responsible for this child. The guardian side
    /// of the relation is never stored; it is resolved on demand.
    pub guardian_ids: BTreeSet<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A child that has not been persisted yet; the store assigns the id.
#[derive(Debug, Clone, PartialEq)]
pub struct NewChild {
    pub first_name: String,
    pub date_of_birth: NaiveDate,
    pub allergies: Vec<String>,
    pub toilet_trained: bool,
    pub guardian_ids: BTreeSet<i64>,
}
