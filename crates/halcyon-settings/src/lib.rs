//! # halcyon-settings
//!
//! Configuration management for the HALCYON decision core.
//!
//! Every numeric weight, threshold, and retention window the decision
//! pipeline consumes lives here — nothing is hard-coded at the point of
//! use. Loading is layered:
//!
//! 1. Compiled [`HalcyonSettings::default()`] production values
//! 2. Deep-merged JSON from `~/.halcyon/settings.json` (if present)
//! 3. `HALCYON_*` environment variable overrides (highest priority)
//!
//! Cross-field constraints are validated after loading; an inconsistent
//! file is an error, not a silent fallback.

#![deny(unsafe_code)]

pub mod errors;
pub mod loader;
pub mod types;

pub use errors::{Result, SettingsError};
pub use loader::{load_settings, load_settings_from_path, settings_path};
pub use types::{
    HalcyonSettings, IdentitySettings, PersonaSettings, RouterSettings, SessionSettings,
    TrustSettings,
};
