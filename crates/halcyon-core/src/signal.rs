//! Environmental context signal.
//!
//! A single process-wide [`ContextSignal`] feeds trust computation:
//! the ambient mode of the house plus threat and reassurance levels
//! reported by external event collaborators. Updates are most-recent-wins
//! and read-only to this core; validation happens at the update boundary
//! so a malformed event can never displace the last known good value.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::errors::SignalError;

/// Ambient mode of the house.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContextMode {
    /// Occupants present, normal verification ambient.
    #[default]
    Home,
    /// House believed empty.
    Away,
    /// Night hours, reduced ambient verification.
    Night,
}

impl fmt::Display for ContextMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Home => write!(f, "home"),
            Self::Away => write!(f, "away"),
            Self::Night => write!(f, "night"),
        }
    }
}

/// Most-recent environmental reading consumed by the trust scorer.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContextSignal {
    /// Ambient mode.
    pub context_mode: ContextMode,
    /// Threat level in `[0, 1]`.
    pub threat_level: f32,
    /// Reassurance level in `[0, 1]`.
    pub reassurance_level: f32,
    /// When the reading was produced.
    pub timestamp: DateTime<Utc>,
}

impl ContextSignal {
    /// A quiet-house baseline: home mode, no threat, no reassurance.
    #[must_use]
    pub fn baseline(now: DateTime<Utc>) -> Self {
        Self {
            context_mode: ContextMode::Home,
            threat_level: 0.0,
            reassurance_level: 0.0,
            timestamp: now,
        }
    }

    /// Validate level bounds.
    ///
    /// Threat and reassurance must be finite and within `[0, 1]`.
    /// Malformed updates are rejected so the holder retains the last
    /// known good reading.
    pub fn validate(&self) -> Result<(), SignalError> {
        check_level("threatLevel", self.threat_level)?;
        check_level("reassuranceLevel", self.reassurance_level)?;
        Ok(())
    }
}

fn check_level(field: &'static str, value: f32) -> Result<(), SignalError> {
    if !value.is_finite() || !(0.0..=1.0).contains(&value) {
        return Err(SignalError::OutOfRange { field, value });
    }
    Ok(())
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn signal(threat: f32, reassurance: f32) -> ContextSignal {
        ContextSignal {
            context_mode: ContextMode::Home,
            threat_level: threat,
            reassurance_level: reassurance,
            timestamp: Utc::now(),
        }
    }

    #[test]
    fn baseline_is_valid() {
        assert!(ContextSignal::baseline(Utc::now()).validate().is_ok());
    }

    #[test]
    fn bounds_are_inclusive() {
        assert!(signal(0.0, 1.0).validate().is_ok());
        assert!(signal(1.0, 0.0).validate().is_ok());
    }

    #[test]
    fn negative_threat_rejected() {
        assert_matches!(
            signal(-0.1, 0.0).validate(),
            Err(SignalError::OutOfRange { field: "threatLevel", .. })
        );
    }

    #[test]
    fn oversized_reassurance_rejected() {
        assert_matches!(
            signal(0.0, 1.5).validate(),
            Err(SignalError::OutOfRange { field: "reassuranceLevel", .. })
        );
    }

    #[test]
    fn nan_rejected() {
        assert!(signal(f32::NAN, 0.0).validate().is_err());
    }

    #[test]
    fn context_mode_display() {
        assert_eq!(ContextMode::Home.to_string(), "home");
        assert_eq!(ContextMode::Away.to_string(), "away");
        assert_eq!(ContextMode::Night.to_string(), "night");
    }
}
