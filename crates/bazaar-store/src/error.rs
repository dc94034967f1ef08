//! # Store Error Types
//!
//! Errors raised by persistence adapters and the catalog collaborator.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                    │
//! │                                                                         │
//! │  Adapter failure (io / serde / backend)                                │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  StoreError (this module)                                              │
//! │       │                                                                 │
//! │       ├── hydration / persistence path → logged, swallowed             │
//! │       │   (the UI path never sees storage failures)                    │
//! │       │                                                                 │
//! │       └── direct adapter callers (tests, tooling) → propagated         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

/// Persistence and collaborator errors.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Underlying file I/O failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Payload could not be serialized or parsed.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A storage or catalog backend reported a failure.
    #[error("Backend error: {0}")]
    Backend(String),
}

impl StoreError {
    /// Creates a backend error from any displayable source.
    pub fn backend(err: impl std::fmt::Display) -> Self {
        StoreError::Backend(err.to_string())
    }
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
