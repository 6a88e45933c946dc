//! # YAML Storage Module
//!
//! File-based storage backend: one YAML file per entity, discovered by
//! scanning the data directory. This keeps the domain layer completely
//! storage-agnostic behind the traits in [`crate::storage::traits`].
//!
//! ## File layout
//!
//! ```text
//! <base>/children/child_<id>.yaml
//! <base>/guardians/guardian_<id>.yaml
//! ```
//!
//! Writes are atomic (temp file + rename). Ids are assigned by scanning for
//! the highest id on disk and adding one.

pub mod child_repository;
pub mod connection;
pub mod guardian_repository;

pub use child_repository::ChildRepository;
pub use connection::YamlConnection;
pub use guardian_repository::GuardianRepository;
