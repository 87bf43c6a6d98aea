//! # halcyon-trust
//!
//! Trust computation for the HALCYON decision core.
//!
//! - [`TrustScorer`]: a pure function from identity, voice confidence,
//!   environmental context, and the prior score to a
//!   [`TrustDecision`](halcyon_core::TrustDecision). Hysteretic: each
//!   decision applies a bounded delta to the prior score, so one noisy
//!   observation can never swing trust between extremes. Asymmetric:
//!   threat outweighs reassurance and the per-turn gain cap sits below
//!   the loss cap — trust is harder to gain back than to lose.
//! - [`ContextSignalHolder`]: the process-wide most-recent-wins
//!   environmental reading, updated asynchronously by external
//!   collaborators and validated at the boundary.

#![deny(unsafe_code)]

pub mod scorer;
pub mod signal;

pub use scorer::{ScoreInputs, TrustScorer};
pub use signal::ContextSignalHolder;
