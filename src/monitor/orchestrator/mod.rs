//! Asynchronous Drift Check Orchestration
//!
//! [`DriftMonitor`] sits on the serving path. Every prediction is recorded in
//! the model's [`DriftState`]; when the window fills, a drift check is handed
//! to a dedicated background worker and the serving call returns at once.
//!
//! # Single-flight
//!
//! At most one check runs per monitor. A trigger that arrives while a check
//! is in flight is skipped: the window keeps sliding (oldest samples evicted)
//! and is reset when the running check finishes. The in-flight flag is owned
//! by a guard that releases it on every exit path.
//!
//! A timed-out engine call cannot be cancelled. Its helper thread keeps an
//! engine lease until the call returns, and triggers are skipped while the
//! lease is held, so at most one engine call is ever outstanding.
//!
//! # Check sequence
//!
//! 1. snapshot both buffers
//! 2. evaluate inputs and scores against the reference, each under a timeout
//! 3. if both evaluations succeeded, save both reports (bounded retries)
//! 4. reset the buffers, whatever happened before

mod worker;


use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use tracing::{debug, error, info, warn};

use crate::error::{Error, Result};
use crate::eval::drift::{DriftEvaluationEngine, DriftVerdict, EvaluationError, EvaluationResult};
use crate::monitor::reference::ReferenceData;
use crate::monitor::report::{DriftReport, DriftReportStore, ReportResult, ReportStream};
use crate::monitor::sample::{Dataset, FeatureRow, Score};
use crate::monitor::state::{DriftState, Window};
use worker::Worker;

/// Tuning knobs for the background check.
#[derive(Debug, Clone, PartialEq)]
pub struct MonitorSettings {
    /// Upper bound on one engine call
    pub evaluation_timeout: Duration,
    /// Extra attempts after a failed report save
    pub save_retries: u32,
    /// Pause between save attempts
    pub save_backoff: Duration,
}

impl Default for MonitorSettings {
    fn default() -> Self {
        Self {
            evaluation_timeout: Duration::from_secs(60),
            save_retries: 2,
            save_backoff: Duration::from_millis(200),
        }
    }
}

/// Counters since the monitor was created.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MonitorStats {
    /// Full windows observed on the serving path
    pub triggers: u64,
    /// Triggers dropped because a check was already running
    pub skipped: u64,
    /// Checks that produced verdicts for both streams
    pub evaluations: u64,
    /// Checks that failed or timed out
    pub failures: u64,
    /// Reports written to the store
    pub reports_saved: u64,
}

#[derive(Debug, Default)]
struct Counters {
    triggers: AtomicU64,
    skipped: AtomicU64,
    evaluations: AtomicU64,
    failures: AtomicU64,
    reports_saved: AtomicU64,
}

impl Counters {
    fn bump(counter: &AtomicU64) {
        counter.fetch_add(1, Ordering::Relaxed);
    }

    fn snapshot(&self) -> MonitorStats {
        MonitorStats {
            triggers: self.triggers.load(Ordering::Relaxed),
            skipped: self.skipped.load(Ordering::Relaxed),
            evaluations: self.evaluations.load(Ordering::Relaxed),
            failures: self.failures.load(Ordering::Relaxed),
            reports_saved: self.reports_saved.load(Ordering::Relaxed),
        }
    }
}

/// Result of one drift check.
#[derive(Debug, Clone, PartialEq)]
pub enum CheckOutcome {
    /// Both streams were evaluated
    Completed { data_drift: bool, prediction_drift: bool, reports_saved: usize },
    /// Evaluation failed; no report was saved
    Failed(EvaluationError),
    /// Another check was already running
    Skipped,
}

struct Shared {
    model: String,
    state: Arc<DriftState>,
    reference: Arc<ReferenceData>,
    engine: Arc<dyn DriftEvaluationEngine>,
    store: Arc<dyn DriftReportStore>,
    settings: MonitorSettings,
    in_flight: AtomicBool,
    engine_busy: Arc<AtomicBool>,
    counters: Counters,
}

/// Holds the single-flight flag; dropping it releases the flag.
struct FlightGuard {
    shared: Arc<Shared>,
}

impl FlightGuard {
    fn acquire(shared: &Arc<Shared>) -> Option<Self> {
        shared
            .in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self { shared: Arc::clone(shared) })
    }
}

impl Drop for FlightGuard {
    fn drop(&mut self) {
        self.shared.in_flight.store(false, Ordering::Release);
    }
}

/// Held by the thread running the engine, including after its caller
/// stopped waiting.
struct EngineLease {
    busy: Arc<AtomicBool>,
}

impl EngineLease {
    fn acquire(busy: &Arc<AtomicBool>) -> Option<Self> {
        busy.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self { busy: Arc::clone(busy) })
    }
}

impl Drop for EngineLease {
    fn drop(&mut self) {
        self.busy.store(false, Ordering::Release);
    }
}

/// Drift monitor for one served model.
pub struct DriftMonitor {
    shared: Arc<Shared>,
    worker: Worker<FlightGuard>,
}

impl DriftMonitor {
    /// Create a monitor and start its background worker.
    pub fn new(
        model: impl Into<String>,
        state: Arc<DriftState>,
        reference: Arc<ReferenceData>,
        engine: Arc<dyn DriftEvaluationEngine>,
        store: Arc<dyn DriftReportStore>,
        settings: MonitorSettings,
    ) -> Result<Self> {
        let model = model.into();
        let shared = Arc::new(Shared {
            model: model.clone(),
            state,
            reference,
            engine,
            store,
            settings,
            in_flight: AtomicBool::new(false),
            engine_busy: Arc::new(AtomicBool::new(false)),
            counters: Counters::default(),
        });

        let worker = Worker::spawn(format!("drift-{model}"), 1, |guard: FlightGuard| {
            let shared = Arc::clone(&guard.shared);
            run_check(&shared);
            drop(guard);
        })
        .map_err(|e| Error::io(format!("spawning drift worker for '{model}'"), e))?;

        Ok(Self { shared, worker })
    }

    /// Record one served prediction. Never fails and never blocks on a
    /// drift check.
    pub fn on_prediction(&self, input: FeatureRow, score: Score) {
        match self.shared.state.record(input, score) {
            Ok(false) => {}
            Ok(true) => self.trigger(),
            Err(e) => warn!(
                model = %self.shared.model,
                error = %e,
                "failed to buffer prediction for drift monitoring"
            ),
        }
    }

    /// Run a drift check on the calling thread, unless one is already running.
    pub fn check_now(&self) -> CheckOutcome {
        if self.is_engine_busy() {
            return CheckOutcome::Skipped;
        }
        match FlightGuard::acquire(&self.shared) {
            Some(_guard) => run_check(&self.shared),
            None => CheckOutcome::Skipped,
        }
    }

    /// Whether a drift check is currently running.
    pub fn is_checking(&self) -> bool {
        self.shared.in_flight.load(Ordering::Acquire)
    }

    /// Whether an engine call is still running, possibly one whose check
    /// already gave up on it.
    pub fn is_engine_busy(&self) -> bool {
        self.shared.engine_busy.load(Ordering::Acquire)
    }

    /// Poll until no check is running. Returns `false` on timeout.
    pub fn wait_idle(&self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        while self.is_checking() {
            if Instant::now() >= deadline {
                return false;
            }
            thread::sleep(Duration::from_millis(5));
        }
        true
    }

    pub fn stats(&self) -> MonitorStats {
        self.shared.counters.snapshot()
    }

    pub fn model(&self) -> &str {
        &self.shared.model
    }

    pub fn state(&self) -> &Arc<DriftState> {
        &self.shared.state
    }

    /// Stop accepting checks and wait for a running one to finish.
    pub fn shutdown(&self) {
        self.worker.shutdown();
    }

    fn trigger(&self) {
        let shared = &self.shared;
        Counters::bump(&shared.counters.triggers);

        if self.is_engine_busy() {
            Counters::bump(&shared.counters.skipped);
            warn!(model = %shared.model, "timed-out drift engine call still running; trigger skipped");
            return;
        }

        let Some(guard) = FlightGuard::acquire(shared) else {
            Counters::bump(&shared.counters.skipped);
            debug!(model = %shared.model, "drift check already running; trigger skipped");
            return;
        };

        match self.worker.submit(guard) {
            Ok(()) => info!(model = %shared.model, "drift buffer full; drift check scheduled"),
            Err((reason, guard)) => {
                drop(guard);
                Counters::bump(&shared.counters.skipped);
                warn!(model = %shared.model, ?reason, "could not schedule drift check");
            }
        }
    }
}

impl Drop for DriftMonitor {
    fn drop(&mut self) {
        self.shutdown();
    }
}

impl std::fmt::Debug for DriftMonitor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DriftMonitor")
            .field("model", &self.shared.model)
            .field("settings", &self.shared.settings)
            .field("stats", &self.stats())
            .finish()
    }
}

/// Snapshot, evaluate, save, reset. The caller holds the flight guard.
fn run_check(shared: &Arc<Shared>) -> CheckOutcome {
    let window = shared.state.snapshot_all();
    let started = Instant::now();

    let outcome = match panic::catch_unwind(AssertUnwindSafe(|| evaluate_and_save(shared, &window))) {
        Ok(Ok(outcome)) => outcome,
        Ok(Err(e)) => CheckOutcome::Failed(e),
        Err(_) => CheckOutcome::Failed(EvaluationError::Aborted("drift check panicked".into())),
    };

    match &outcome {
        CheckOutcome::Completed { data_drift, prediction_drift, reports_saved } => {
            Counters::bump(&shared.counters.evaluations);
            info!(
                model = %shared.model,
                inputs = window.inputs.len(),
                predictions = window.predictions.len(),
                data_drift,
                prediction_drift,
                reports_saved,
                elapsed_ms = started.elapsed().as_millis() as u64,
                "drift check completed"
            );
        }
        CheckOutcome::Failed(e) => {
            Counters::bump(&shared.counters.failures);
            error!(
                model = %shared.model,
                inputs = window.inputs.len(),
                predictions = window.predictions.len(),
                error = %e,
                "drift check failed"
            );
        }
        CheckOutcome::Skipped => {}
    }

    if let Err(e) = shared.state.reset() {
        error!(model = %shared.model, error = %e, "failed to reset drift buffers");
    }
    outcome
}

fn evaluate_and_save(shared: &Arc<Shared>, window: &Window) -> EvaluationResult<CheckOutcome> {
    let current_inputs = Dataset::from_records(&window.inputs);
    let current_predictions = Dataset::from_records(&window.predictions);

    let data = evaluate_with_timeout(shared, ReportStream::Inputs, current_inputs)?;
    let predictions = evaluate_with_timeout(shared, ReportStream::Predictions, current_predictions)?;

    let data_drift = data.drift_detected;
    let prediction_drift = predictions.drift_detected;
    let mut reports_saved = 0;
    for (stream, verdict, rows) in [
        (ReportStream::Inputs, data, window.inputs.len()),
        (ReportStream::Predictions, predictions, window.predictions.len()),
    ] {
        let reference_rows = reference_for(&shared.reference, stream).len();
        let report = DriftReport::from_verdict(&shared.model, stream, verdict, rows, reference_rows);
        match save_with_retry(shared, stream, &report) {
            Ok(()) => {
                reports_saved += 1;
                Counters::bump(&shared.counters.reports_saved);
            }
            Err(e) => error!(model = %shared.model, %stream, error = %e, "failed to save drift report"),
        }
    }

    Ok(CheckOutcome::Completed { data_drift, prediction_drift, reports_saved })
}

fn reference_for(reference: &ReferenceData, stream: ReportStream) -> &Dataset {
    match stream {
        ReportStream::Inputs => reference.inputs(),
        ReportStream::Predictions => reference.predictions(),
    }
}

/// Run the engine on a helper thread and stop waiting after the configured
/// timeout. A timed-out call is abandoned and its result discarded; the
/// thread keeps the engine lease until the call returns.
fn evaluate_with_timeout(
    shared: &Arc<Shared>,
    stream: ReportStream,
    current: Dataset,
) -> EvaluationResult<DriftVerdict> {
    let timeout = shared.settings.evaluation_timeout;
    let lease = EngineLease::acquire(&shared.engine_busy)
        .ok_or_else(|| EvaluationError::Aborted("previous drift engine call still running".into()))?;
    let engine = Arc::clone(&shared.engine);
    let reference = Arc::clone(&shared.reference);
    let (tx, rx) = mpsc::channel();

    thread::Builder::new()
        .name(format!("drift-eval-{stream}"))
        .spawn(move || {
            let result = engine.evaluate(&current, reference_for(&reference, stream));
            drop(lease);
            let _ = tx.send(result);
        })
        .map_err(|e| EvaluationError::Aborted(format!("cannot spawn evaluation thread: {e}")))?;

    match rx.recv_timeout(timeout) {
        Ok(result) => result,
        Err(RecvTimeoutError::Timeout) => Err(EvaluationError::Timeout(timeout)),
        Err(RecvTimeoutError::Disconnected) => {
            Err(EvaluationError::Aborted(format!("drift engine panicked on {stream}")))
        }
    }
}

fn save_with_retry(shared: &Shared, stream: ReportStream, report: &DriftReport) -> ReportResult<()> {
    let mut attempt = 0;
    loop {
        match shared.store.save(stream, report) {
            Ok(()) => return Ok(()),
            Err(e) if attempt < shared.settings.save_retries => {
                attempt += 1;
                warn!(model = %shared.model, %stream, attempt, error = %e, "retrying drift report save");
                thread::sleep(shared.settings.save_backoff);
            }
            Err(e) => return Err(e),
        }
    }
}
