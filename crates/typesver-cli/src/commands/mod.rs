pub mod build;
pub mod versions;
