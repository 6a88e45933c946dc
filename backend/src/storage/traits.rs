//! # Storage Traits
//!
//! Storage abstraction traits consumed by the domain layer. They allow
//! different storage backends to be used interchangeably without the
//! services knowing any implementation details.

use anyhow::Result;

use crate::domain::models::child::{Child, NewChild};
use crate::domain::models::guardian::Guardian;

/// Trait defining the interface for child storage operations.
///
/// All operations are synchronous; each service call performs at most a few
/// sequential store calls on the request path.
pub trait ChildStorage: Send + Sync {
    /// Store a new child; the store assigns the id and timestamps.
    fn store_child(&self, child: &NewChild) -> Result<Child>;

    /// Overwrite an existing child record.
    fn update_child(&self, child: &Child) -> Result<()>;

    /// Retrieve a specific child by id.
    fn get_child(&self, id: i64) -> Result<Option<Child>>;

    /// Retrieve the children whose ids appear in `ids`. Unknown ids are
    /// skipped, so the result may be shorter than the input.
    fn get_children_by_ids(&self, ids: &[i64]) -> Result<Vec<Child>>;

    /// List all children in store order (ascending id).
    fn list_children(&self) -> Result<Vec<Child>>;

    /// Delete a child by id.
    fn delete_child(&self, id: i64) -> Result<()>;

    /// Check whether a child with this id exists.
    fn child_exists(&self, id: i64) -> Result<bool>;

    /// Children with at least one allergy entry containing `substring`.
    fn find_children_with_allergy(&self, substring: &str) -> Result<Vec<Child>>;
}

/// Trait defining the interface for guardian storage operations.
pub trait GuardianStorage: Send + Sync {
    /// Store a fresh guardian record; the store assigns the id.
    fn store_guardian(&self) -> Result<Guardian>;

    /// Retrieve a specific guardian by id.
    fn get_guardian(&self, id: i64) -> Result<Option<Guardian>>;

    /// Retrieve the guardians whose ids appear in `ids`. Unknown ids are
    /// skipped, so the result may be shorter than the input.
    fn get_guardians_by_ids(&self, ids: &[i64]) -> Result<Vec<Guardian>>;

    /// List all guardians in store order (ascending id).
    fn list_guardians(&self) -> Result<Vec<Guardian>>;

    /// Delete a guardian by id.
    fn delete_guardian(&self, id: i64) -> Result<()>;

    /// Check whether a guardian with this id exists.
    fn guardian_exists(&self, id: i64) -> Result<bool>;
}
