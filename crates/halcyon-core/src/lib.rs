//! # halcyon-core
//!
//! Foundation types, errors, branded IDs, and utilities for the HALCYON
//! trust & persona decision core.
//!
//! This crate provides the shared vocabulary that all other HALCYON crates
//! depend on:
//!
//! - **Branded IDs**: [`SpeakerId`], [`RequestId`] as newtypes for type safety
//! - **Speakers**: [`SpeakerIdentity`], [`RoleHint`], [`Resolution`], [`VoiceMatch`]
//! - **Context**: [`ContextSignal`] with [`ContextMode`] and bounded threat /
//!   reassurance levels
//! - **Trust**: [`TrustState`] (hysteretic per-speaker score with bounded
//!   history) and [`TrustDecision`] (per-request scoring outcome)
//! - **Personas**: the closed [`Persona`] variant and per-session
//!   [`PersonaState`]
//! - **Intents**: [`IntentRequest`], [`ServiceCall`], [`RoutedCall`]
//! - **Diagnostics**: [`DecisionDiagnostics`] and [`SecurityAlert`] events
//! - **Errors**: [`HalcyonError`] hierarchy via `thiserror`

#![deny(unsafe_code)]

pub mod errors;
pub mod events;
pub mod ids;
pub mod intent;
pub mod logging;
pub mod persona;
pub mod signal;
pub mod speaker;
pub mod trust;

pub use errors::{HalcyonError, IdentityError, SignalError, StorageError};
pub use events::{DecisionDiagnostics, SecurityAlert};
pub use ids::{RequestId, SpeakerId};
pub use intent::{IntentRequest, RoutedCall, ServiceCall};
pub use persona::{Persona, PersonaState};
pub use signal::{ContextMode, ContextSignal};
pub use speaker::{Resolution, RoleHint, SpeakerIdentity, VoiceMatch};
pub use trust::{PersonaBias, Role, TrustDecision, TrustState};
