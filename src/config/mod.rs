//! Configuration management for the Humble client
//!
//! This module handles loading and managing configuration settings
//! for both the library and the command-line front end.

pub mod loader;
pub mod settings;

pub use loader::{ConfigLoader, default_config_path};
pub use settings::Settings;
