//! # halcyon-session
//!
//! Per-speaker session state for the HALCYON decision core.
//!
//! The [`SessionStore`] owns one [`SessionRecord`] per speaker: trust
//! history, persona state, and a short conversation trace, all bounded
//! FIFO. Requests for the *same* speaker serialize through a per-speaker
//! lock so trust read-modify-write and persona transitions are
//! linearizable; requests for different speakers proceed in parallel
//! without coordination.
//!
//! Storage failures abort the current request with a typed error — the
//! store never falls back to a freshly seeded default record, which
//! would silently erase trust history.

#![deny(unsafe_code)]

pub mod record;
pub mod store;

pub use record::{SessionKey, SessionRecord, TraceEntry};
pub use store::{MemoryBackend, SessionBackend, SessionStore};
