//! Error types for attribute-store operations.

use thiserror::Error;

/// Errors that can occur while reading or writing an attribute store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Path is empty, relative or contains an empty segment.
    #[error("invalid store path: {path:?}")]
    InvalidPath { path: String },

    /// No node exists at the path.
    #[error("no node at {path}")]
    Missing { path: String },

    /// The node at the path is not a group.
    #[error("not a group: {path}")]
    NotAGroup { path: String },

    /// The path is already taken by a node of another kind.
    #[error("path already taken by {kind}: {path}")]
    Occupied { path: String, kind: &'static str },
}

/// Result type alias for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;

impl StoreError {
    /// Create an InvalidPath error.
    pub fn invalid_path(path: impl Into<String>) -> Self {
        Self::InvalidPath { path: path.into() }
    }

    /// Create a Missing error.
    pub fn missing(path: impl Into<String>) -> Self {
        Self::Missing { path: path.into() }
    }

    /// Create a NotAGroup error.
    pub fn not_a_group(path: impl Into<String>) -> Self {
        Self::NotAGroup { path: path.into() }
    }

    /// Create an Occupied error.
    pub fn occupied(path: impl Into<String>, kind: &'static str) -> Self {
        Self::Occupied {
            path: path.into(),
            kind,
        }
    }
}
