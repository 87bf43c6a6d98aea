//! Persona phrasing.
//!
//! The closed phrasing interface over the two personas. Phrasing is the
//! *only* thing a persona controls at the routing boundary — gating is
//! trust-derived and identical under either voice.

use halcyon_core::Persona;

/// Why an intent was refused.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RefusalReason {
    /// A sensitive intent was denied by the trust gate.
    SensitiveDenied,
    /// The intent is not in the routing table.
    UnknownIntent,
    /// A required slot was missing; the field names what to ask for.
    MissingSlot(&'static str),
    /// The system could not complete the request (storage failure path).
    Unavailable,
}

/// Tone selection and refusal/acknowledgement phrasing per persona.
pub trait PersonaVoice {
    /// Short tone descriptor for downstream TTS prosody selection.
    fn tone(&self) -> &'static str;

    /// Spoken refusal for the given reason.
    fn refusal(&self, reason: &RefusalReason) -> String;

    /// Wrap a base acknowledgement in the persona's register.
    fn acknowledge(&self, base: &str) -> String;
}

impl PersonaVoice for Persona {
    fn tone(&self) -> &'static str {
        match self {
            Self::Halston => "calm, reassuring",
            Self::Scarlet => "quiet, direct",
        }
    }

    fn refusal(&self, reason: &RefusalReason) -> String {
        match (self, reason) {
            (Self::Halston, RefusalReason::SensitiveDenied) => {
                "I'm sorry, that function is not available right now.".to_owned()
            }
            (Self::Scarlet, RefusalReason::SensitiveDenied) => {
                "Denied. That action is restricted while the house is secured.".to_owned()
            }
            (Self::Halston, RefusalReason::UnknownIntent) => {
                "I can't do that yet, I'm afraid.".to_owned()
            }
            (Self::Scarlet, RefusalReason::UnknownIntent) => {
                "That request is not recognized.".to_owned()
            }
            (Self::Halston, RefusalReason::MissingSlot(slot)) => {
                format!("Which {slot}?")
            }
            (Self::Scarlet, RefusalReason::MissingSlot(slot)) => {
                format!("Specify the {slot}.")
            }
            (Self::Halston, RefusalReason::Unavailable) => {
                "I'm sorry, I can't help with that right now.".to_owned()
            }
            (Self::Scarlet, RefusalReason::Unavailable) => {
                "Unavailable. Try again shortly.".to_owned()
            }
        }
    }

    fn acknowledge(&self, base: &str) -> String {
        match self {
            Self::Halston => format!("Certainly. {base}"),
            Self::Scarlet => format!("Understood. {base}"),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
