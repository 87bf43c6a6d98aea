//! Process-wide context signal holder.
//!
//! External collaborators (presence sensors, alarm integrations,
//! operator acknowledgements) push [`ContextSignal`] updates
//! asynchronously. The holder keeps the most recent *valid* reading
//! under its own lock, independent of any per-speaker lock; scorer
//! invocations read whatever snapshot is current at call time.
//! Staleness up to the collaborator's update interval is expected.

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use tracing::{debug, warn};

use halcyon_core::{ContextSignal, SignalError};

/// Most-recent-wins holder for the environmental context signal.
#[derive(Debug)]
pub struct ContextSignalHolder {
    current: RwLock<ContextSignal>,
}

impl ContextSignalHolder {
    /// Start from the quiet-house baseline.
    #[must_use]
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            current: RwLock::new(ContextSignal::baseline(now)),
        }
    }

    /// Start from a known reading.
    #[must_use]
    pub fn with_signal(signal: ContextSignal) -> Self {
        Self {
            current: RwLock::new(signal),
        }
    }

    /// The latest valid reading.
    #[must_use]
    pub fn snapshot(&self) -> ContextSignal {
        self.current.read().clone()
    }

    /// Apply an asynchronous update.
    ///
    /// A malformed signal is logged and discarded — the last known good
    /// reading is retained and the error is returned only for the
    /// caller's own telemetry. Never fatal to any request.
    pub fn update(&self, signal: ContextSignal) -> Result<(), SignalError> {
        if let Err(err) = signal.validate() {
            warn!(error = %err, "discarding malformed context signal");
            return Err(err);
        }
        debug!(
            mode = %signal.context_mode,
            threat = signal.threat_level,
            reassurance = signal.reassurance_level,
            "context signal updated"
        );
        *self.current.write() = signal;
        Ok(())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
