//! # halcyon-persona
//!
//! Persona selection for the HALCYON decision core.
//!
//! Two personas exist: HALSTON, the calm everyday voice, and SCARLET,
//! the security posture. The [`PersonaSelector`] runs a per-session
//! finite-state machine over trust decisions with asymmetric hysteresis:
//! escalation can fire on a single SCARLET-biased decision, while
//! recovery demands sustained evidence across consecutive decisions.
//! A neutral bias never moves the machine.
//!
//! [`PersonaVoice`] is the closed phrasing interface — tone, refusals,
//! and acknowledgement prefixes keyed by persona. Phrasing never
//! influences gating.

#![deny(unsafe_code)]

pub mod selector;
pub mod voice;

pub use selector::{PersonaSelector, Transition};
pub use voice::{PersonaVoice, RefusalReason};
