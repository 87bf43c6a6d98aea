//! Resolution policy.
//!
//! Order of preference:
//!
//! 1. A transient token with a known alias binding resolves directly.
//!    If the utterance also carries a voice-match report, the report can
//!    degrade the outcome: confidence at or below the degrade floor
//!    suppresses the binding entirely (possible impersonation of a known
//!    token), confidence between the floor and the bind threshold keeps
//!    the identity for auditability but degrades the role hint to guest.
//! 2. An unknown token with a voice match at or above the bind threshold
//!    binds to the matched identity, write-through, and resolves to it.
//! 3. Anything else is [`Resolution::Unresolved`] — a normal outcome,
//!    the pipeline continues on the default low-trust profile.

use tracing::{debug, info};

use halcyon_core::{IdentityError, Resolution, RoleHint, SpeakerIdentity, VoiceMatch};
use halcyon_settings::IdentitySettings;

use crate::store::IdentityStore;

/// Maps transient speaker tokens to stable identities.
pub struct IdentityResolver<S> {
    store: S,
    min_voice_confidence: f32,
    degrade_confidence: f32,
}

impl<S: IdentityStore> IdentityResolver<S> {
    /// Create a resolver over `store` with thresholds from settings.
    pub fn new(store: S, settings: &IdentitySettings) -> Self {
        Self {
            store,
            min_voice_confidence: settings.min_voice_confidence,
            degrade_confidence: settings.degrade_confidence,
        }
    }

    /// Resolve a transient token, optionally informed by a voice-match
    /// report.
    ///
    /// Returns the resolution together with the *effective* role hint —
    /// which may be degraded below the stored hint when voice confidence
    /// is marginal. Only write-through persistence can fail; an unknown
    /// speaker is not an error.
    pub fn resolve(
        &self,
        token: &str,
        voice_match: Option<&VoiceMatch>,
    ) -> Result<(Resolution, RoleHint), IdentityError> {
        if let Some(identity) = self.store.alias(token) {
            return Ok(self.resolve_known(token, identity, voice_match));
        }

        if let Some(vm) = voice_match {
            if vm.probability >= self.min_voice_confidence {
                if let Some(identity) = self.store.identity(&vm.candidate) {
                    // New token for an enrolled voice: bind it durably
                    // before reporting the identity upstream.
                    self.store.bind_alias(token, &identity.stable_id)?;
                    info!(
                        speaker_id = %identity.stable_id,
                        probability = vm.probability,
                        "bound new alias from voice match"
                    );
                    let hint = identity.role_hint;
                    return Ok((Resolution::Known(identity), hint));
                }
                debug!(candidate = %vm.candidate, "voice match names unknown identity");
            }
        }

        Ok((Resolution::Unresolved, RoleHint::Unknown))
    }

    fn resolve_known(
        &self,
        token: &str,
        identity: SpeakerIdentity,
        voice_match: Option<&VoiceMatch>,
    ) -> (Resolution, RoleHint) {
        let Some(vm) = voice_match else {
            let hint = identity.role_hint;
            return (Resolution::Known(identity), hint);
        };

        if vm.probability <= self.degrade_confidence {
            debug!(
                token,
                probability = vm.probability,
                "known alias with very low confidence, treating as unresolved"
            );
            return (Resolution::Unresolved, RoleHint::Unknown);
        }
        if vm.probability < self.min_voice_confidence {
            debug!(
                speaker_id = %identity.stable_id,
                probability = vm.probability,
                "marginal confidence, degrading role hint to guest"
            );
            return (Resolution::Known(identity), RoleHint::Guest);
        }
        let hint = identity.role_hint;
        (Resolution::Known(identity), hint)
    }

    /// Enroll: associate a transient token with a stable identity,
    /// write-through.
    pub fn register(
        &self,
        token: &str,
        identity: SpeakerIdentity,
    ) -> Result<(), IdentityError> {
        let id = identity.stable_id.clone();
        self.store.insert(identity)?;
        self.store.bind_alias(token, &id)
    }

    /// Forget a stable identity entirely. Returns the number of alias
    /// bindings removed.
    pub fn forget(&self, id: &halcyon_core::SpeakerId) -> Result<usize, IdentityError> {
        self.store.remove(id)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryIdentityStore;
    use halcyon_core::SpeakerId;

    fn owner() -> SpeakerIdentity {
        SpeakerIdentity {
            stable_id: SpeakerId::from("spk-owner"),
            role_hint: RoleHint::Owner,
        }
    }

    fn resolver_with_owner(alias: &str) -> IdentityResolver<MemoryIdentityStore> {
        IdentityResolver::new(
            MemoryIdentityStore::with_identity(owner(), alias),
            &IdentitySettings::default(),
        )
    }

    fn vm(candidate: &str, probability: f32) -> VoiceMatch {
        VoiceMatch {
            candidate: SpeakerId::from(candidate),
            probability,
        }
    }

    #[test]
    fn known_token_resolves_directly() {
        let resolver = resolver_with_owner("temp-1");
        let (resolution, hint) = resolver.resolve("temp-1", None).unwrap();
        assert!(resolution.is_known());
        assert_eq!(hint, RoleHint::Owner);
    }

    #[test]
    fn unknown_token_without_voice_is_unresolved() {
        let resolver = resolver_with_owner("temp-1");
        let (resolution, hint) = resolver.resolve("stranger", None).unwrap();
        assert_eq!(resolution, Resolution::Unresolved);
        assert_eq!(hint, RoleHint::Unknown);
    }

    #[test]
    fn confident_voice_match_binds_new_alias() {
        let resolver = resolver_with_owner("temp-1");
        let (resolution, hint) = resolver
            .resolve("temp-2", Some(&vm("spk-owner", 0.92)))
            .unwrap();
        assert!(resolution.is_known());
        assert_eq!(hint, RoleHint::Owner);

        // The binding is durable: the token now resolves without voice.
        let (again, _) = resolver.resolve("temp-2", None).unwrap();
        assert!(again.is_known());
    }

    #[test]
    fn weak_voice_match_does_not_bind() {
        let resolver = resolver_with_owner("temp-1");
        let (resolution, _) = resolver
            .resolve("temp-2", Some(&vm("spk-owner", 0.4)))
            .unwrap();
        assert_eq!(resolution, Resolution::Unresolved);
        let (again, _) = resolver.resolve("temp-2", None).unwrap();
        assert_eq!(again, Resolution::Unresolved);
    }

    #[test]
    fn voice_match_for_unenrolled_identity_is_unresolved() {
        let resolver = resolver_with_owner("temp-1");
        let (resolution, _) = resolver
            .resolve("temp-2", Some(&vm("spk-ghost", 0.99)))
            .unwrap();
        assert_eq!(resolution, Resolution::Unresolved);
    }

    #[test]
    fn marginal_confidence_degrades_known_alias_to_guest() {
        let resolver = resolver_with_owner("temp-1");
        // Between degrade (0.35) and min (0.55): identity kept, hint degraded.
        let (resolution, hint) = resolver
            .resolve("temp-1", Some(&vm("spk-owner", 0.45)))
            .unwrap();
        assert!(resolution.is_known());
        assert_eq!(hint, RoleHint::Guest);
    }

    #[test]
    fn floor_confidence_suppresses_known_alias() {
        let resolver = resolver_with_owner("temp-1");
        let (resolution, hint) = resolver
            .resolve("temp-1", Some(&vm("spk-owner", 0.2)))
            .unwrap();
        assert_eq!(resolution, Resolution::Unresolved);
        assert_eq!(hint, RoleHint::Unknown);
    }

    #[test]
    fn register_then_resolve() {
        let resolver =
            IdentityResolver::new(MemoryIdentityStore::new(), &IdentitySettings::default());
        resolver.register("temp-9", owner()).unwrap();
        let (resolution, hint) = resolver.resolve("temp-9", None).unwrap();
        assert!(resolution.is_known());
        assert_eq!(hint, RoleHint::Owner);
    }

    #[test]
    fn forget_removes_aliases() {
        let resolver = resolver_with_owner("temp-1");
        assert_eq!(resolver.forget(&SpeakerId::from("spk-owner")).unwrap(), 1);
        let (resolution, _) = resolver.resolve("temp-1", None).unwrap();
        assert_eq!(resolution, Resolution::Unresolved);
    }
}
