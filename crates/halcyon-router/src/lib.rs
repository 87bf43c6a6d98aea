//! # halcyon-router
//!
//! Trust-gated intent routing for the HALCYON decision core.
//!
//! Turns a pre-extracted [`IntentRequest`](halcyon_core::IntentRequest)
//! into a [`RoutedCall`](halcyon_core::RoutedCall): either an executable
//! Home-Assistant-shaped service call, or a refusal with no call payload
//! at all. Sensitive intents are a hard deny when the trust decision
//! withholds `allow_sensitive` — never a soft warning, and never
//! persona-dependent. The persona only phrases what gets spoken.

#![deny(unsafe_code)]

pub mod router;

pub use router::IntentRouter;
