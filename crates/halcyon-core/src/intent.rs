//! Intent request and routed call types.
//!
//! An [`IntentRequest`] arrives pre-extracted from the out-of-scope NLU
//! collaborator. The router turns it into a [`RoutedCall`]: either an
//! executable [`ServiceCall`] with a spoken acknowledgement, or a refusal
//! with no call payload at all. A denial never carries parameters — the
//! call is simply absent.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// A normalized automation intent with extracted slots.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntentRequest {
    /// Normalized intent name (e.g. `turn_on_light`, `unlock_door`).
    pub intent_name: String,
    /// Extracted slot values keyed by slot name.
    #[serde(default)]
    pub slots: HashMap<String, Value>,
}

impl IntentRequest {
    /// Convenience constructor for an intent without slots.
    #[must_use]
    pub fn named(intent_name: impl Into<String>) -> Self {
        Self {
            intent_name: intent_name.into(),
            slots: HashMap::new(),
        }
    }

    /// Add a slot value (builder style).
    #[must_use]
    pub fn with_slot(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        let _ = self.slots.insert(key.into(), value.into());
        self
    }

    /// Fetch a slot as a string slice, if present and a string.
    #[must_use]
    pub fn slot_str(&self, key: &str) -> Option<&str> {
        self.slots.get(key).and_then(Value::as_str)
    }
}

/// A Home-Assistant-shaped service invocation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceCall {
    /// Service domain (e.g. `light`, `lock`, `climate`).
    pub domain: String,
    /// Service name within the domain (e.g. `turn_on`, `unlock`).
    pub service: String,
    /// Service data payload (entity IDs and parameters).
    pub data: Value,
}

/// The router's output for one intent.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoutedCall {
    /// Whether the intent will be executed.
    pub ok: bool,
    /// Spoken acknowledgement or refusal, phrased by the active persona.
    pub spoken: String,
    /// The service call to dispatch. `None` on any refusal — a denied
    /// intent never constructs a call payload.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub call: Option<ServiceCall>,
}

impl RoutedCall {
    /// An executable call.
    #[must_use]
    pub fn accepted(call: ServiceCall, spoken: impl Into<String>) -> Self {
        Self {
            ok: true,
            spoken: spoken.into(),
            call: Some(call),
        }
    }

    /// A refusal with no call payload.
    #[must_use]
    pub fn refused(spoken: impl Into<String>) -> Self {
        Self {
            ok: false,
            spoken: spoken.into(),
            call: None,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_sets_slots() {
        let request = IntentRequest::named("turn_on_light").with_slot("entity_id", "light.kitchen");
        assert_eq!(request.slot_str("entity_id"), Some("light.kitchen"));
        assert_eq!(request.slot_str("missing"), None);
    }

    #[test]
    fn refusal_has_no_call() {
        let routed = RoutedCall::refused("That function is not available right now.");
        assert!(!routed.ok);
        assert!(routed.call.is_none());
    }

    #[test]
    fn refusal_serializes_without_call_field() {
        let routed = RoutedCall::refused("No.");
        let json = serde_json::to_value(&routed).unwrap();
        assert!(json.get("call").is_none());
    }

    #[test]
    fn accepted_carries_call() {
        let call = ServiceCall {
            domain: "lock".to_owned(),
            service: "unlock".to_owned(),
            data: serde_json::json!({"entity_id": "lock.front_door"}),
        };
        let routed = RoutedCall::accepted(call, "Unlocked.");
        assert!(routed.ok);
        assert_eq!(routed.call.unwrap().domain, "lock");
    }
}
