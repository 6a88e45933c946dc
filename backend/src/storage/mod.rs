pub mod traits;
pub mod yaml;

pub use traits::{ChildStorage, GuardianStorage};
pub use yaml::YamlConnection;
