pub mod child;
pub mod guardian;
