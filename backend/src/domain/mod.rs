pub mod child_service;
pub mod errors;
pub mod guardian_service;
pub mod models;

pub use child_service::ChildService;
pub use errors::{ServiceError, ValidationErrors};
pub use guardian_service::GuardianService;
