//! Configuration — typed schema plus the JSON/env loader.
//!
//! JSON on disk uses **camelCase** keys; Rust uses snake_case.

pub mod loader;
pub mod schema;

pub use loader::{get_config_path, load_config, save_config};
pub use schema::Config;
