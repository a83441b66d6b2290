//! Error handling for the Humble client
//!
//! This module defines the error taxonomy shared by every request the client issues.

pub mod types;

pub use types::{Error, Result};
