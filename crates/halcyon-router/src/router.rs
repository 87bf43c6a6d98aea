//! Intent table and gating.
//!
//! Gate first, construct second: a denied sensitive intent returns
//! before any service-call payload exists. Entity IDs come from slots
//! with configurable per-domain fallbacks.

use std::collections::HashSet;

use serde_json::json;
use tracing::{debug, info};

use halcyon_core::{IntentRequest, Persona, RoutedCall, ServiceCall, TrustDecision};
use halcyon_persona::{PersonaVoice, RefusalReason};
use halcyon_settings::RouterSettings;

/// Maps normalized intents to automation service calls.
#[derive(Clone, Debug)]
pub struct IntentRouter {
    settings: RouterSettings,
    sensitive: HashSet<String>,
}

impl IntentRouter {
    /// Create a router from configured gating and entity defaults.
    #[must_use]
    pub fn new(settings: RouterSettings) -> Self {
        let sensitive = settings.sensitive_intents.iter().cloned().collect();
        Self {
            settings,
            sensitive,
        }
    }

    /// Whether an intent name is in the sensitive set.
    #[must_use]
    pub fn is_sensitive(&self, intent: &str) -> bool {
        self.sensitive.contains(intent)
    }

    /// Route one intent under the given trust decision.
    ///
    /// The persona keys refusal and acknowledgement phrasing only; the
    /// gating outcome is identical under either persona.
    #[must_use]
    pub fn route(
        &self,
        persona: Persona,
        request: &IntentRequest,
        decision: &TrustDecision,
    ) -> RoutedCall {
        let intent = request.intent_name.trim().to_lowercase();
        if intent.is_empty() {
            return RoutedCall::refused(persona.refusal(&RefusalReason::UnknownIntent));
        }

        if self.is_sensitive(&intent) && !decision.allow_sensitive {
            info!(
                intent,
                score = decision.score,
                "sensitive intent denied by trust gate"
            );
            return RoutedCall::refused(persona.refusal(&RefusalReason::SensitiveDenied));
        }

        debug!(intent, "routing intent");
        match intent.as_str() {
            "turn_on_light" => self.light_call(persona, request, "turn_on"),
            "turn_off_light" => self.light_call(persona, request, "turn_off"),
            "set_temperature" => self.climate_call(persona, request),
            "media_play_pause" => {
                let entity = entity(request, &self.settings.default_media_player);
                accepted(
                    persona,
                    "media_player",
                    "media_play_pause",
                    json!({ "entity_id": entity }),
                    "Okay.",
                )
            }
            "lock_door" => {
                let entity = entity(request, &self.settings.default_lock);
                accepted(persona, "lock", "lock", json!({ "entity_id": entity }), "Locked.")
            }
            "unlock_door" => {
                let entity = entity(request, &self.settings.default_lock);
                accepted(
                    persona,
                    "lock",
                    "unlock",
                    json!({ "entity_id": entity }),
                    "Unlocked.",
                )
            }
            "open_garage" => {
                let entity = entity(request, &self.settings.garage_entity);
                accepted(
                    persona,
                    "cover",
                    "open_cover",
                    json!({ "entity_id": entity }),
                    "Opening the garage.",
                )
            }
            "disarm_alarm" => self.alarm_call(persona, request),
            _ => RoutedCall::refused(persona.refusal(&RefusalReason::UnknownIntent)),
        }
    }

    fn light_call(&self, persona: Persona, request: &IntentRequest, service: &str) -> RoutedCall {
        let Some(entity) = entity_or(request, &self.settings.default_light) else {
            return RoutedCall::refused(persona.refusal(&RefusalReason::MissingSlot("light")));
        };
        accepted(
            persona,
            "light",
            service,
            json!({ "entity_id": entity }),
            "Done.",
        )
    }

    fn climate_call(&self, persona: Persona, request: &IntentRequest) -> RoutedCall {
        let Some(temperature) = request.slots.get("temperature") else {
            return RoutedCall::refused(
                persona.refusal(&RefusalReason::MissingSlot("temperature")),
            );
        };
        let entity = entity(request, &self.settings.default_climate);
        accepted(
            persona,
            "climate",
            "set_temperature",
            json!({ "entity_id": entity, "temperature": temperature }),
            "Temperature set.",
        )
    }

    fn alarm_call(&self, persona: Persona, request: &IntentRequest) -> RoutedCall {
        let Some(code) = request.slot_str("code") else {
            return RoutedCall::refused(persona.refusal(&RefusalReason::MissingSlot("code")));
        };
        let entity = entity(request, &self.settings.alarm_entity);
        accepted(
            persona,
            "alarm_control_panel",
            "alarm_disarm",
            json!({ "entity_id": entity, "code": code }),
            "Alarm disarmed.",
        )
    }
}

/// Entity from the slot, falling back to the configured default.
fn entity(request: &IntentRequest, default: &str) -> String {
    request.slot_str("entity_id").unwrap_or(default).to_owned()
}

/// Entity from the slot or a non-empty default; `None` when neither
/// names a target.
fn entity_or(request: &IntentRequest, default: &str) -> Option<String> {
    if let Some(entity) = request.slot_str("entity_id") {
        return Some(entity.to_owned());
    }
    (!default.is_empty()).then(|| default.to_owned())
}

fn accepted(
    persona: Persona,
    domain: &str,
    service: &str,
    data: serde_json::Value,
    base_ack: &str,
) -> RoutedCall {
    RoutedCall::accepted(
        ServiceCall {
            domain: domain.to_owned(),
            service: service.to_owned(),
            data,
        },
        persona.acknowledge(base_ack),
    )
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use halcyon_core::{PersonaBias, Role};

    fn router() -> IntentRouter {
        IntentRouter::new(RouterSettings::default())
    }

    fn decision(allow_sensitive: bool) -> TrustDecision {
        TrustDecision {
            score: if allow_sensitive { 85.0 } else { 30.0 },
            role: if allow_sensitive { Role::Owner } else { Role::Guest },
            allow_sensitive,
            persona_bias: PersonaBias::Neutral,
        }
    }

    // ── Gating ──────────────────────────────────────────────────────

    #[test]
    fn sensitive_intent_denied_without_allowance() {
        let routed = router().route(
            Persona::Halston,
            &IntentRequest::named("unlock_door"),
            &decision(false),
        );
        assert!(!routed.ok);
        // Hard deny: no call payload is ever constructed.
        assert!(routed.call.is_none());
        assert!(!routed.spoken.is_empty());
    }

    #[test]
    fn sensitive_intent_allowed_with_allowance() {
        let routed = router().route(
            Persona::Halston,
            &IntentRequest::named("unlock_door"),
            &decision(true),
        );
        assert!(routed.ok);
        let call = routed.call.unwrap();
        assert_eq!(call.domain, "lock");
        assert_eq!(call.service, "unlock");
        assert_eq!(call.data["entity_id"], "lock.front_door");
    }

    #[test]
    fn gating_is_identical_under_both_personas() {
        let router = router();
        let request = IntentRequest::named("disarm_alarm").with_slot("code", "1234");
        for persona in [Persona::Halston, Persona::Scarlet] {
            let denied = router.route(persona, &request, &decision(false));
            assert!(!denied.ok, "persona must never bypass the gate");
            let allowed = router.route(persona, &request, &decision(true));
            assert!(allowed.ok);
        }
    }

    #[test]
    fn persona_changes_phrasing_not_outcome() {
        let router = router();
        let request = IntentRequest::named("unlock_door");
        let halston = router.route(Persona::Halston, &request, &decision(false));
        let scarlet = router.route(Persona::Scarlet, &request, &decision(false));
        assert_eq!(halston.ok, scarlet.ok);
        assert_ne!(halston.spoken, scarlet.spoken);
    }

    #[test]
    fn all_default_sensitive_intents_are_gated() {
        let router = router();
        for intent in ["unlock_door", "open_garage", "disarm_alarm"] {
            assert!(router.is_sensitive(intent));
        }
        assert!(!router.is_sensitive("turn_on_light"));
    }

    #[test]
    fn custom_sensitive_set_is_honored() {
        let settings = RouterSettings {
            sensitive_intents: vec!["turn_on_light".to_owned()],
            ..RouterSettings::default()
        };
        let router = IntentRouter::new(settings);
        let routed = router.route(
            Persona::Halston,
            &IntentRequest::named("turn_on_light"),
            &decision(false),
        );
        assert!(!routed.ok);
        // And unlock_door is no longer gated under this configuration.
        let routed = router.route(
            Persona::Halston,
            &IntentRequest::named("unlock_door"),
            &decision(false),
        );
        assert!(routed.ok);
    }

    // ── Intent table ────────────────────────────────────────────────

    #[test]
    fn light_uses_slot_entity() {
        let request = IntentRequest::named("turn_on_light").with_slot("entity_id", "light.kitchen");
        let routed = router().route(Persona::Halston, &request, &decision(false));
        assert!(routed.ok);
        assert_eq!(routed.call.unwrap().data["entity_id"], "light.kitchen");
    }

    #[test]
    fn light_falls_back_to_default_entity() {
        let routed = router().route(
            Persona::Halston,
            &IntentRequest::named("turn_off_light"),
            &decision(false),
        );
        assert!(routed.ok);
        let call = routed.call.unwrap();
        assert_eq!(call.service, "turn_off");
        assert_eq!(call.data["entity_id"], "light.living_room");
    }

    #[test]
    fn set_temperature_requires_slot() {
        let routed = router().route(
            Persona::Halston,
            &IntentRequest::named("set_temperature"),
            &decision(true),
        );
        assert!(!routed.ok);
        assert!(routed.call.is_none());
        assert_eq!(routed.spoken, "Which temperature?");
    }

    #[test]
    fn set_temperature_builds_climate_call() {
        let request = IntentRequest::named("set_temperature").with_slot("temperature", 21);
        let routed = router().route(Persona::Halston, &request, &decision(false));
        assert!(routed.ok);
        let call = routed.call.unwrap();
        assert_eq!(call.domain, "climate");
        assert_eq!(call.data["temperature"], 21);
    }

    #[test]
    fn disarm_alarm_requires_code() {
        let routed = router().route(
            Persona::Scarlet,
            &IntentRequest::named("disarm_alarm"),
            &decision(true),
        );
        assert!(!routed.ok);
        assert_eq!(routed.spoken, "Specify the code.");
    }

    #[test]
    fn open_garage_targets_cover() {
        let routed = router().route(
            Persona::Halston,
            &IntentRequest::named("open_garage"),
            &decision(true),
        );
        let call = routed.call.unwrap();
        assert_eq!(call.domain, "cover");
        assert_eq!(call.service, "open_cover");
        assert_eq!(call.data["entity_id"], "cover.garage");
    }

    #[test]
    fn unknown_intent_refused_politely() {
        let routed = router().route(
            Persona::Halston,
            &IntentRequest::named("launch_rocket"),
            &decision(true),
        );
        assert!(!routed.ok);
        assert!(routed.call.is_none());
    }

    #[test]
    fn intent_name_is_normalized() {
        let routed = router().route(
            Persona::Halston,
            &IntentRequest::named("  Lock_Door  "),
            &decision(false),
        );
        assert!(routed.ok);
        assert_eq!(routed.call.unwrap().service, "lock");
    }

    #[test]
    fn empty_intent_refused() {
        let routed = router().route(Persona::Halston, &IntentRequest::named(""), &decision(true));
        assert!(!routed.ok);
    }

    #[test]
    fn acknowledgements_carry_persona_register() {
        let request = IntentRequest::named("lock_door");
        let halston = router().route(Persona::Halston, &request, &decision(true));
        assert_eq!(halston.spoken, "Certainly. Locked.");
        let scarlet = router().route(Persona::Scarlet, &request, &decision(true));
        assert_eq!(scarlet.spoken, "Understood. Locked.");
    }
}
