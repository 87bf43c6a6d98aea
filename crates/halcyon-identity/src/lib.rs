//! # halcyon-identity
//!
//! Speaker identity resolution for the HALCYON decision core.
//!
//! Maps transient speaker tokens (assigned upstream by diarization) to
//! stable enrolled identities. Resolution never fails a request: a
//! speaker that cannot be resolved proceeds through the pipeline as
//! [`Resolution::Unresolved`](halcyon_core::Resolution) on the default
//! low-trust profile.
//!
//! - [`IdentityResolver`]: resolution policy (alias lookup, voice-match
//!   binding, degrade-to-guest band)
//! - [`IdentityStore`]: write-through persistence seam, with
//!   [`JsonFileIdentityStore`] (durable) and [`MemoryIdentityStore`]
//!   (tests, ephemeral deployments) implementations

#![deny(unsafe_code)]

pub mod resolver;
pub mod store;

pub use resolver::IdentityResolver;
pub use store::{IdentityStore, JsonFileIdentityStore, MemoryIdentityStore};
