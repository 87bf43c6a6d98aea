//! Identity persistence.
//!
//! The store holds enrolled identities and the alias index mapping
//! transient tokens to stable IDs. Writes are write-through: a new alias
//! binding is durable before the resolver returns it.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tracing::debug;

use halcyon_core::{IdentityError, RoleHint, SpeakerId, SpeakerIdentity};

/// Persistence seam for enrolled identities and alias bindings.
pub trait IdentityStore: Send + Sync {
    /// Look up an enrolled identity by stable ID.
    fn identity(&self, id: &SpeakerId) -> Option<SpeakerIdentity>;

    /// Look up the identity bound to a transient token.
    fn alias(&self, token: &str) -> Option<SpeakerIdentity>;

    /// Bind a transient token to an enrolled identity (write-through).
    fn bind_alias(&self, token: &str, id: &SpeakerId) -> Result<(), IdentityError>;

    /// Insert or replace an enrolled identity.
    fn insert(&self, identity: SpeakerIdentity) -> Result<(), IdentityError>;

    /// Remove an identity and all its aliases. Returns the number of
    /// aliases removed.
    fn remove(&self, id: &SpeakerId) -> Result<usize, IdentityError>;
}

// ─────────────────────────────────────────────────────────────────────────────
// In-memory map shared by both implementations
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Default)]
struct MapState {
    identities: HashMap<SpeakerId, RoleHint>,
    aliases: HashMap<String, SpeakerId>,
}

impl MapState {
    fn identity(&self, id: &SpeakerId) -> Option<SpeakerIdentity> {
        self.identities.get(id).map(|hint| SpeakerIdentity {
            stable_id: id.clone(),
            role_hint: *hint,
        })
    }

    fn alias(&self, token: &str) -> Option<SpeakerIdentity> {
        self.aliases.get(token).and_then(|id| self.identity(id))
    }

    fn remove(&mut self, id: &SpeakerId) -> usize {
        if self.identities.remove(id).is_none() {
            return 0;
        }
        let before = self.aliases.len();
        self.aliases.retain(|_, bound| bound != id);
        before - self.aliases.len()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// MemoryIdentityStore
// ─────────────────────────────────────────────────────────────────────────────

/// Ephemeral in-memory identity store.
#[derive(Debug, Default)]
pub struct MemoryIdentityStore {
    state: RwLock<MapState>,
}

impl MemoryIdentityStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-seeded with an identity and one alias for it.
    /// Convenience for tests and fixtures.
    #[must_use]
    pub fn with_identity(identity: SpeakerIdentity, alias: &str) -> Self {
        let store = Self::new();
        {
            let mut state = store.state.write();
            let _ = state
                .aliases
                .insert(alias.to_owned(), identity.stable_id.clone());
            let _ = state
                .identities
                .insert(identity.stable_id.clone(), identity.role_hint);
        }
        store
    }
}

impl IdentityStore for MemoryIdentityStore {
    fn identity(&self, id: &SpeakerId) -> Option<SpeakerIdentity> {
        self.state.read().identity(id)
    }

    fn alias(&self, token: &str) -> Option<SpeakerIdentity> {
        self.state.read().alias(token)
    }

    fn bind_alias(&self, token: &str, id: &SpeakerId) -> Result<(), IdentityError> {
        let _ = self
            .state
            .write()
            .aliases
            .insert(token.to_owned(), id.clone());
        Ok(())
    }

    fn insert(&self, identity: SpeakerIdentity) -> Result<(), IdentityError> {
        let _ = self
            .state
            .write()
            .identities
            .insert(identity.stable_id, identity.role_hint);
        Ok(())
    }

    fn remove(&self, id: &SpeakerId) -> Result<usize, IdentityError> {
        Ok(self.state.write().remove(id))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// JsonFileIdentityStore
// ─────────────────────────────────────────────────────────────────────────────

/// On-disk JSON wire format for the identity map.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct IdentityMapFile {
    #[serde(default)]
    identities: HashMap<String, IdentityEntry>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct IdentityEntry {
    role_hint: RoleHint,
    #[serde(default)]
    aliases: Vec<String>,
}

/// Durable identity store backed by a single JSON document.
///
/// Every mutation rewrites the file through a temp-file rename so a
/// crash mid-write never leaves a truncated map behind.
#[derive(Debug)]
pub struct JsonFileIdentityStore {
    path: PathBuf,
    state: RwLock<MapState>,
}

impl JsonFileIdentityStore {
    /// Open (or create) the identity map at `path`.
    ///
    /// A missing file yields an empty map; a corrupt file is an error —
    /// silently resetting it would orphan every enrolled identity.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, IdentityError> {
        let path = path.into();
        let state = if path.exists() {
            let content = std::fs::read_to_string(&path)?;
            let file: IdentityMapFile = serde_json::from_str(&content)?;
            let mut state = MapState::default();
            for (id, entry) in file.identities {
                let id = SpeakerId::from(id);
                for alias in entry.aliases {
                    let _ = state.aliases.insert(alias, id.clone());
                }
                let _ = state.identities.insert(id, entry.role_hint);
            }
            state
        } else {
            debug!(?path, "identity map not found, starting empty");
            MapState::default()
        };
        Ok(Self {
            path,
            state: RwLock::new(state),
        })
    }

    /// The backing file path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self, state: &MapState) -> Result<(), IdentityError> {
        let mut file = IdentityMapFile::default();
        for (id, hint) in &state.identities {
            let _ = file.identities.insert(
                id.as_str().to_owned(),
                IdentityEntry {
                    role_hint: *hint,
                    aliases: Vec::new(),
                },
            );
        }
        for (alias, id) in &state.aliases {
            if let Some(entry) = file.identities.get_mut(id.as_str()) {
                entry.aliases.push(alias.clone());
            }
        }
        // Deterministic output keeps the map diffable.
        for entry in file.identities.values_mut() {
            entry.aliases.sort_unstable();
        }

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, serde_json::to_string_pretty(&file)?)?;
        std::fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl IdentityStore for JsonFileIdentityStore {
    fn identity(&self, id: &SpeakerId) -> Option<SpeakerIdentity> {
        self.state.read().identity(id)
    }

    fn alias(&self, token: &str) -> Option<SpeakerIdentity> {
        self.state.read().alias(token)
    }

    fn bind_alias(&self, token: &str, id: &SpeakerId) -> Result<(), IdentityError> {
        let mut state = self.state.write();
        let _ = state.aliases.insert(token.to_owned(), id.clone());
        self.persist(&state)
    }

    fn insert(&self, identity: SpeakerIdentity) -> Result<(), IdentityError> {
        let mut state = self.state.write();
        let _ = state
            .identities
            .insert(identity.stable_id, identity.role_hint);
        self.persist(&state)
    }

    fn remove(&self, id: &SpeakerId) -> Result<usize, IdentityError> {
        let mut state = self.state.write();
        let removed = state.remove(id);
        self.persist(&state)?;
        Ok(removed)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
