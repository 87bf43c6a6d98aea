//! Error hierarchy for the HALCYON decision core.
//!
//! Built on [`thiserror`]:
//!
//! - [`HalcyonError`]: top-level enum covering all error domains
//! - [`StorageError`]: session-store failures — fatal to the current
//!   request, surfaced to the caller, never silently absorbed
//! - [`IdentityError`]: identity map persistence failures
//! - [`SignalError`]: malformed context-signal updates — logged and
//!   discarded at the update boundary, never fatal to a request
//!
//! Unresolved identity and denied sensitive intents are deliberately NOT
//! errors; both are normal, expected outcomes with well-defined handling.

use std::fmt;

use thiserror::Error;

/// Top-level error type for the HALCYON decision core.
#[derive(Debug, Error)]
pub enum HalcyonError {
    /// Session-store failure.
    #[error("{0}")]
    Storage(#[from] StorageError),

    /// Identity map persistence failure.
    #[error("{0}")]
    Identity(#[from] IdentityError),

    /// Malformed context-signal update.
    #[error("{0}")]
    Signal(#[from] SignalError),
}

impl HalcyonError {
    /// Machine-readable error code.
    #[must_use]
    pub fn code(&self) -> &str {
        match self {
            Self::Storage(e) => e.code(),
            Self::Identity(_) => "IDENTITY_STORE_ERROR",
            Self::Signal(_) => "INVALID_CONTEXT_SIGNAL",
        }
    }

    /// Generic spoken line for a caller-facing failure.
    ///
    /// Internal detail is never exposed to the speaker.
    #[must_use]
    pub fn spoken_fallback(&self) -> &'static str {
        "I'm sorry, I can't help with that right now."
    }
}

/// Session-store operation kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StorageOperation {
    /// Reading a session record.
    Read,
    /// Writing a session record.
    Write,
    /// Evicting session records.
    Evict,
}

impl fmt::Display for StorageOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Read => write!(f, "read"),
            Self::Write => write!(f, "write"),
            Self::Evict => write!(f, "evict"),
        }
    }
}

/// Session-store failure.
///
/// Fatal to the current request: the orchestrator aborts rather than
/// proceed on a reseeded default record, which would silently erase
/// trust history.
#[derive(Debug, Error)]
#[error("Session store {operation} failed for {speaker_id}: {message}")]
pub struct StorageError {
    /// Speaker whose record was being accessed.
    pub speaker_id: String,
    /// Operation that failed.
    pub operation: StorageOperation,
    /// Human-readable message.
    pub message: String,
    /// Original cause.
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl StorageError {
    /// Create a new storage error.
    #[must_use]
    pub fn new(
        speaker_id: impl Into<String>,
        operation: StorageOperation,
        message: impl Into<String>,
    ) -> Self {
        Self {
            speaker_id: speaker_id.into(),
            operation,
            message: message.into(),
            source: None,
        }
    }

    /// Attach the original cause.
    #[must_use]
    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Machine-readable error code.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self.operation {
            StorageOperation::Read => "STORAGE_READ_ERROR",
            StorageOperation::Write => "STORAGE_WRITE_ERROR",
            StorageOperation::Evict => "STORAGE_EVICT_ERROR",
        }
    }
}

/// Identity map persistence failure.
#[derive(Debug, Error)]
pub enum IdentityError {
    /// The identity map file could not be read or written.
    #[error("identity map io: {0}")]
    Io(#[from] std::io::Error),

    /// The identity map file held invalid JSON.
    #[error("identity map parse: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Malformed context-signal update.
///
/// Handled at the update boundary: the event is logged and discarded and
/// the last known good reading is retained. Never aborts a request.
#[derive(Debug, Error, PartialEq)]
pub enum SignalError {
    /// A level field was non-finite or outside `[0, 1]`.
    #[error("context signal field {field} out of range: {value}")]
    OutOfRange {
        /// The offending field.
        field: &'static str,
        /// The rejected value.
        value: f32,
    },
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
