//! backend/src/domain/models/guardian.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Domain model representing a legal guardian.
///
/// Only identity and bookkeeping live here. A guardian's children are the
/// inverse side of the child↔guardian relation and are computed on demand
/// by scanning the child store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Guardian {
    pub id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
