//! Submission state machine: form input → in-flight request → result or failure.

use std::sync::Arc;

use shared::{
    domain::{SimulationResult, ViewMode},
    error::{ClientError, ValidationError},
};
use thiserror::Error;
use tokio::{sync::watch, task::JoinHandle};
use tracing::{debug, info, warn};

use crate::{
    export::{CsvExport, ExportError},
    format::{to_chart_series, to_table_rows, ChartSeries, TableRow},
    request::RawSimulationInput,
    store::ResultStore,
    SimulationService,
};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SubmissionState {
    #[default]
    Idle,
    Validating,
    InFlight,
    Succeeded(Arc<SimulationResult>),
    Failed(ClientError),
}

impl SubmissionState {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Validating => "validating",
            Self::InFlight => "in_flight",
            Self::Succeeded(_) => "succeeded",
            Self::Failed(_) => "failed",
        }
    }

    pub fn is_in_flight(&self) -> bool {
        matches!(self, Self::InFlight)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Succeeded(_) | Self::Failed(_))
    }

    pub fn result(&self) -> Option<&Arc<SimulationResult>> {
        match self {
            Self::Succeeded(result) => Some(result),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&ClientError> {
        match self {
            Self::Failed(err) => Some(err),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmitError {
    #[error("a simulation is already in progress")]
    AlreadyInFlight,
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

/// What the results panel shows for the active [`ViewMode`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResultView {
    Table(Vec<TableRow>),
    Graph(ChartSeries),
}

type PendingSimulation = JoinHandle<Result<SimulationResult, ClientError>>;

/// Owns the session's [`SubmissionState`] and is the only writer of the
/// [`ResultStore`].
///
/// The network call runs on a spawned task, so `submit` must be called from
/// within a Tokio runtime. Dropping the controller aborts any pending call.
pub struct SubmissionController {
    service: Arc<dyn SimulationService>,
    store: Arc<ResultStore>,
    state_tx: watch::Sender<SubmissionState>,
    view_mode: ViewMode,
    pending: Option<PendingSimulation>,
}

impl SubmissionController {
    pub fn new(service: Arc<dyn SimulationService>, store: Arc<ResultStore>) -> Self {
        let (state_tx, _) = watch::channel(SubmissionState::Idle);
        Self {
            service,
            store,
            state_tx,
            view_mode: ViewMode::Table,
            pending: None,
        }
    }

    pub fn state(&self) -> SubmissionState {
        self.state_tx.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<SubmissionState> {
        self.state_tx.subscribe()
    }

    pub fn store(&self) -> Arc<ResultStore> {
        Arc::clone(&self.store)
    }

    pub fn view_mode(&self) -> ViewMode {
        self.view_mode
    }

    pub fn is_in_flight(&self) -> bool {
        self.pending.is_some()
    }

    /// Validates the form and dispatches the request.
    ///
    /// Allowed from any resting state; a submission from `Succeeded` or
    /// `Failed` goes straight back to `InFlight`. Invalid input restores the
    /// state held before the attempt.
    pub fn submit(&mut self, input: &RawSimulationInput) -> Result<(), SubmitError> {
        if self.pending.is_some() {
            warn!("ignoring submit while a simulation is in flight");
            return Err(SubmitError::AlreadyInFlight);
        }

        let previous = self.state();
        self.transition(SubmissionState::Validating);
        let request = match input.build() {
            Ok(request) => request,
            Err(err) => {
                info!(error = %err, "simulation input rejected");
                self.transition(previous);
                return Err(err.into());
            }
        };

        let service = Arc::clone(&self.service);
        self.pending = Some(tokio::spawn(async move {
            service.simulate(request).await
        }));
        self.transition(SubmissionState::InFlight);
        Ok(())
    }

    /// Waits for the in-flight call and applies its outcome. Returns the
    /// current state immediately when nothing is pending.
    ///
    /// Cancel safe: dropping this future leaves the request pending.
    pub async fn complete(&mut self) -> SubmissionState {
        let Some(handle) = self.pending.as_mut() else {
            return self.state();
        };

        let joined = handle.await;
        self.pending = None;

        let outcome = joined.unwrap_or_else(|err| {
            Err(ClientError::transport(format!(
                "simulation task ended unexpectedly: {err}"
            )))
        });
        self.apply_outcome(outcome);
        self.state()
    }

    pub async fn submit_and_wait(
        &mut self,
        input: &RawSimulationInput,
    ) -> Result<SubmissionState, SubmitError> {
        self.submit(input)?;
        Ok(self.complete().await)
    }

    /// Abandons the in-flight call. The service is not notified.
    pub fn cancel(&mut self) -> bool {
        let Some(handle) = self.pending.take() else {
            return false;
        };
        handle.abort();
        info!("simulation request cancelled");
        self.transition(SubmissionState::Idle);
        true
    }

    /// Returns a finished submission to `Idle` so the form can be shown again.
    /// The stored result is kept.
    pub fn reset(&mut self) -> bool {
        if !self.state_tx.borrow().is_terminal() {
            return false;
        }
        self.view_mode = ViewMode::Table;
        self.transition(SubmissionState::Idle);
        true
    }

    pub fn toggle_view(&mut self) -> Option<ViewMode> {
        if self.state_tx.borrow().result().is_none() {
            return None;
        }
        self.view_mode = self.view_mode.toggled();
        debug!(view_mode = ?self.view_mode, "view mode toggled");
        Some(self.view_mode)
    }

    pub fn current_view(&self) -> Option<ResultView> {
        let state = self.state_tx.borrow();
        let result = state.result()?;
        Some(match self.view_mode {
            ViewMode::Table => ResultView::Table(to_table_rows(result)),
            ViewMode::Graph => ResultView::Graph(to_chart_series(result)),
        })
    }

    /// Builds the download for the result currently on screen.
    pub fn export_csv(&self) -> Result<CsvExport, ExportError> {
        let state = self.state_tx.borrow();
        let result = state.result().ok_or(ExportError::NoResult)?;
        CsvExport::from_result(result)
    }

    fn apply_outcome(&mut self, outcome: Result<SimulationResult, ClientError>) {
        match outcome {
            Ok(result) => {
                info!(
                    periods = result.period_count(),
                    categories = result.investment_breakdown.len(),
                    "simulation succeeded"
                );
                let result = Arc::new(result);
                self.store.set(Arc::clone(&result));
                self.view_mode = ViewMode::Table;
                self.transition(SubmissionState::Succeeded(result));
            }
            Err(err) => {
                warn!(kind = ?err.kind(), error = %err, "simulation failed");
                self.transition(SubmissionState::Failed(err));
            }
        }
    }

    fn transition(&self, next: SubmissionState) {
        let to = next.label();
        let previous = self.state_tx.send_replace(next);
        debug!(from = previous.label(), to, "submission state changed");
    }
}

impl Drop for SubmissionController {
    fn drop(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }
}

#[cfg(test)]
#[path = "tests/controller_tests.rs"]
mod tests;
