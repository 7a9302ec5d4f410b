pub mod repo;

pub use repo::{source_name, GitRepo};
