//! DTO ↔ domain mappers. Stateless; all conversions are associated
//! functions so services never hold mapper instances.

pub mod child_mapper;
pub mod guardian_mapper;

pub use child_mapper::ChildMapper;
pub use guardian_mapper::GuardianMapper;
