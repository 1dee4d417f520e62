//! Flat-file record storage for LabGate
//!
//! This crate provides a small JSON-file record store: typed records with
//! generated ids, predicate queries, and whole-file atomic persistence.
//! It backs the instrument image-association table.
//!
//! # Modules
//!
//! - [`error`] - Storage error types
//! - [`json_file`] - The `JsonFileStore` engine

pub mod error;
pub mod json_file;

pub use error::StorageError;
pub use json_file::{JsonFileStore, RecordId, Stored};

/// Result type for storage operations
pub type Result<T> = std::result::Result<T, StorageError>;
