use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::time::Instant;
use tracing::Instrument;
use uuid::Uuid;

use crate::backend::{Backend, StepOutput};

pub const SEED_LABEL: &str = "Bulk Insert";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhaseReport {
    pub label: String,
    pub elapsed_ms: f64,
    pub output: Option<StepOutput>,
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    pub run_id: Uuid,
    pub backend: String,
    pub started_at: DateTime<Utc>,
    pub phases: Vec<PhaseReport>,
    pub error: Option<String>,
    pub cleanup_error: Option<String>,
    pub cleaned: bool,
}

impl RunReport {
    fn new(backend: &str) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            backend: backend.to_string(),
            started_at: Utc::now(),
            phases: Vec::new(),
            error: None,
            cleanup_error: None,
            cleaned: false,
        }
    }

    pub fn is_success(&self) -> bool {
        self.error.is_none() && self.cleanup_error.is_none()
    }

    pub fn phase(&self, label: &str) -> Option<&PhaseReport> {
        self.phases.iter().find(|p| p.label == label)
    }
}

/// Drive one backend through connect, seed, its scenario, cleanup and disconnect.
///
/// The first failing phase stops the scenario. Cleanup and disconnect still run
/// whenever the connection was established; a backend whose cleanup opens its
/// own connection is cleaned up even when `connect` failed. Cleanup and
/// disconnect failures are only logged and recorded. Nothing here returns an error: failures end up in the report.
pub async fn run(backend: &mut dyn Backend) -> RunReport {
    let report = RunReport::new(backend.name());
    let span = tracing::info_span!("run", backend = backend.name(), run_id = %report.run_id);
    drive(backend, report).instrument(span).await
}

async fn drive(backend: &mut dyn Backend, mut report: RunReport) -> RunReport {
    let name = backend.name();

    if let Err(e) = backend.connect().await {
        let message = error_chain(&e);
        tracing::error!("{} connection failed: {}", name, message);
        report.error = Some(message);
        if backend.cleanup_is_independent() {
            clean(backend, &mut report).await;
        }
        return report;
    }
    tracing::debug!("{} connected", name);

    if let Err(message) = run_scenario(backend, &mut report).await {
        tracing::error!("Error executing query: {}", message);
        report.error = Some(message);
    }

    clean(backend, &mut report).await;

    if let Err(e) = backend.disconnect().await {
        tracing::warn!("{} disconnect failed: {}", name, error_chain(&e));
    }

    report
}

async fn clean(backend: &mut dyn Backend, report: &mut RunReport) {
    let name = backend.name();

    match backend.cleanup().await {
        Ok(()) => {
            report.cleaned = true;
            tracing::info!("{} database cleared successfully", name);
        }
        Err(e) => {
            let message = error_chain(&e);
            tracing::error!("Error clearing {} database: {}", name, message);
            report.cleanup_error = Some(message);
        }
    }
}

async fn run_scenario(
    backend: &mut dyn Backend,
    report: &mut RunReport,
) -> std::result::Result<(), String> {
    let name = backend.name();

    let label = format!("{} {}", name, SEED_LABEL);
    tracing::info!("{} started", label);
    let started = Instant::now();
    let seeded = backend.seed().await;
    record(report, label, started, seeded.map(|_| None))?;

    for &step in backend.scenario() {
        let label = format!("{} {}", name, step);
        tracing::info!("{} started", label);
        let started = Instant::now();
        let output = backend.run_step(step).await;
        record(report, label, started, output.map(Some))?;
    }

    Ok(())
}

fn record(
    report: &mut RunReport,
    label: String,
    started: Instant,
    outcome: crate::Result<Option<StepOutput>>,
) -> std::result::Result<(), String> {
    let elapsed_ms = started.elapsed().as_secs_f64() * 1000.0;

    match outcome {
        Ok(output) => {
            tracing::info!("{}: {:.3}ms", label, elapsed_ms);
            report.phases.push(PhaseReport {
                label,
                elapsed_ms,
                output,
                error: None,
            });
            Ok(())
        }
        Err(e) => {
            let message = error_chain(&e);
            tracing::debug!("{} failed after {:.3}ms", label, elapsed_ms);
            report.phases.push(PhaseReport {
                label: label.clone(),
                elapsed_ms,
                output: None,
                error: Some(message.clone()),
            });
            Err(format!("{}: {}", label, message))
        }
    }
}

/// Render an error and all of its sources on one line.
pub fn error_chain(err: &(dyn std::error::Error + 'static)) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let cause_message = cause.to_string();
        if !message.ends_with(&cause_message) {
            message.push_str(": ");
            message.push_str(&cause_message);
        }
        source = cause.source();
    }
    message
}
