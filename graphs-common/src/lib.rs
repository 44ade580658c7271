//! Shared error types for the graphs toolkit.

pub mod error;

pub use error::{Error, Result};
