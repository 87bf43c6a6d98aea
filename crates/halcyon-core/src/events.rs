//! Outbound diagnostic and alert events.
//!
//! One [`DecisionDiagnostics`] is published per decision cycle for
//! observability consumers (dashboards, monitors). It never feeds back
//! into control flow. A [`SecurityAlert`] is emitted only on SCARLET
//! entry, for the alerting collaborator.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::{RequestId, SpeakerId};
use crate::persona::Persona;
use crate::trust::TrustDecision;

/// Per-decision observability event.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DecisionDiagnostics {
    /// The request this decision belongs to.
    pub request_id: RequestId,
    /// Stable speaker ID when resolved.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub speaker_id: Option<SpeakerId>,
    /// Persona active after FSM evaluation.
    pub persona: Persona,
    /// The intent that was routed.
    pub intent_name: String,
    /// Whether the routed call was accepted.
    pub intent_ok: bool,
    /// The full trust decision for this cycle.
    pub decision: TrustDecision,
    /// Conversation turn number within the session.
    pub turn: u64,
    /// When the decision completed.
    pub timestamp: DateTime<Utc>,
}

/// Emitted when a session's persona enters SCARLET.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecurityAlert {
    /// The request that triggered the escalation.
    pub request_id: RequestId,
    /// Stable speaker ID when resolved.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub speaker_id: Option<SpeakerId>,
    /// Trust score at escalation time.
    pub score: f32,
    /// Threat level at escalation time.
    pub threat_level: f32,
    /// When the escalation happened.
    pub timestamp: DateTime<Utc>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
