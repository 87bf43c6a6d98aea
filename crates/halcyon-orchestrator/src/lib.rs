//! # halcyon-orchestrator
//!
//! The top-level decision pipeline of the HALCYON core.
//!
//! One inbound utterance flows strictly downward: resolve identity →
//! score trust → persist trust state → step the persona FSM → persist
//! persona state → route the intent → publish diagnostics → dispatch.
//! State durability strictly precedes external effect: the session
//! record is persisted before the routed call leaves the process, so a
//! crash between the two never leaves state older than what was acted
//! upon.
//!
//! Collaborators (service dispatch, alerting, diagnostics) sit behind
//! traits and are fire-and-forget from the orchestrator's perspective;
//! retry and backoff belong to the collaborator, not this core.

#![deny(unsafe_code)]

pub mod collaborators;
pub mod orchestrator;
pub mod types;

pub use collaborators::{
    AlertSink, Collaborators, DiagnosticsSink, LoggingDispatcher, ServiceDispatcher,
    TracingAlertSink, TracingDiagnostics,
};
pub use orchestrator::Orchestrator;
pub use types::{DecisionOutcome, UtteranceEvent};
