//! Speaker identity vocabulary.
//!
//! A transient speaker token arrives with each utterance. The identity
//! resolver maps it to a [`SpeakerIdentity`] when it can; when it cannot,
//! the pipeline proceeds on [`Resolution::Unresolved`] with a default
//! low-trust profile. Unresolved is a normal case (a first-time guest),
//! never an error.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::ids::SpeakerId;

/// Enrollment-time role hint attached to a stored identity.
///
/// This is what the household *claims* a speaker is. The trust scorer
/// folds it into the score delta but derives the effective privilege
/// [`Role`](crate::trust::Role) purely from score bands.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoleHint {
    /// Enrolled homeowner.
    Owner,
    /// Enrolled household member.
    Household,
    /// Known but low-privilege visitor.
    Guest,
    /// No enrollment information.
    #[default]
    Unknown,
}

impl fmt::Display for RoleHint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Owner => write!(f, "owner"),
            Self::Household => write!(f, "household"),
            Self::Guest => write!(f, "guest"),
            Self::Unknown => write!(f, "unknown"),
        }
    }
}

/// A stable, enrolled speaker identity.
///
/// Created on first successful resolution; immutable once stored. Later
/// resolutions of the same transient token or voice fingerprint look this
/// record up, never duplicate it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpeakerIdentity {
    /// The stable speaker ID.
    pub stable_id: SpeakerId,
    /// Enrollment-time role hint.
    pub role_hint: RoleHint,
}

/// Best-match report from the upstream voice verifier.
///
/// The verifier compares the utterance against enrolled fingerprints and
/// reports its strongest candidate with a match probability. The
/// comparison itself is out of scope; this core only consumes the report.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoiceMatch {
    /// The enrolled identity the verifier matched against.
    pub candidate: SpeakerId,
    /// Match probability in `[0, 1]`.
    pub probability: f32,
}

/// Outcome of identity resolution.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Resolution {
    /// Resolved to a stable identity.
    Known(SpeakerIdentity),
    /// No stable identity could be established. The pipeline continues
    /// on the default low-trust profile.
    Unresolved,
}

impl Resolution {
    /// The stable speaker ID, if resolved.
    #[must_use]
    pub fn speaker_id(&self) -> Option<&SpeakerId> {
        match self {
            Self::Known(identity) => Some(&identity.stable_id),
            Self::Unresolved => None,
        }
    }

    /// The effective role hint: the stored hint when resolved,
    /// [`RoleHint::Unknown`] otherwise.
    #[must_use]
    pub fn role_hint(&self) -> RoleHint {
        match self {
            Self::Known(identity) => identity.role_hint,
            Self::Unresolved => RoleHint::Unknown,
        }
    }

    /// Whether this resolution carries a stable identity.
    #[must_use]
    pub fn is_known(&self) -> bool {
        matches!(self, Self::Known(_))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
