//! Collaborator seams.
//!
//! The orchestrator never performs network I/O itself. The automation
//! platform, the alerting channel, and observability consumers sit
//! behind these traits. Dispatch is fire-and-forget once session state
//! is persisted; retry and backoff are the collaborator's problem.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use halcyon_core::{DecisionDiagnostics, SecurityAlert, ServiceCall};

/// Hands accepted service calls to the automation platform.
#[async_trait]
pub trait ServiceDispatcher: Send + Sync {
    /// Dispatch one service call. Infallible from the orchestrator's
    /// perspective — delivery guarantees live in the implementation.
    async fn dispatch(&self, call: ServiceCall);
}

/// Receives security alerts on SCARLET entry.
pub trait AlertSink: Send + Sync {
    /// Deliver one alert.
    fn security_alert(&self, alert: SecurityAlert);
}

/// Receives one diagnostic event per decision.
///
/// For observability consumers only — nothing downstream of this trait
/// may feed back into control flow.
pub trait DiagnosticsSink: Send + Sync {
    /// Publish one decision's diagnostics.
    fn publish(&self, event: DecisionDiagnostics);
}

/// The orchestrator's collaborator bundle.
#[derive(Clone)]
pub struct Collaborators {
    /// Automation dispatch.
    pub dispatcher: Arc<dyn ServiceDispatcher>,
    /// Security alerting.
    pub alerts: Arc<dyn AlertSink>,
    /// Observability.
    pub diagnostics: Arc<dyn DiagnosticsSink>,
}

impl Default for Collaborators {
    fn default() -> Self {
        Self {
            dispatcher: Arc::new(LoggingDispatcher),
            alerts: Arc::new(TracingAlertSink),
            diagnostics: Arc::new(TracingDiagnostics),
        }
    }
}

/// Dispatcher that only logs — for development and tests without a
/// connected automation platform.
#[derive(Clone, Copy, Debug, Default)]
pub struct LoggingDispatcher;

#[async_trait]
impl ServiceDispatcher for LoggingDispatcher {
    async fn dispatch(&self, call: ServiceCall) {
        info!(domain = %call.domain, service = %call.service, "dispatching service call");
    }
}

/// Alert sink that logs at warn level.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingAlertSink;

impl AlertSink for TracingAlertSink {
    fn security_alert(&self, alert: SecurityAlert) {
        tracing::warn!(
            request_id = %alert.request_id,
            score = alert.score,
            threat = alert.threat_level,
            "SCARLET engaged"
        );
    }
}

/// Diagnostics sink that logs structured decision summaries.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingDiagnostics;

impl DiagnosticsSink for TracingDiagnostics {
    fn publish(&self, event: DecisionDiagnostics) {
        info!(
            request_id = %event.request_id,
            persona = %event.persona,
            intent = %event.intent_name,
            ok = event.intent_ok,
            score = event.decision.score,
            role = %event.decision.role,
            allow_sensitive = event.decision.allow_sensitive,
            "decision"
        );
    }
}
