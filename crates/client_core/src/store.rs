use std::sync::{Arc, PoisonError, RwLock};

use shared::domain::SimulationResult;

/// Latest successful simulation result, shared by every view of a session.
///
/// Readers hold an `Arc<ResultStore>`; only [`crate::SubmissionController`]
/// can write to it.
#[derive(Debug, Default)]
pub struct ResultStore {
    current: RwLock<Option<Arc<SimulationResult>>>,
}

impl ResultStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn get(&self) -> Option<Arc<SimulationResult>> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn is_empty(&self) -> bool {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_none()
    }

    pub(crate) fn set(&self, result: Arc<SimulationResult>) {
        *self.current.write().unwrap_or_else(PoisonError::into_inner) = Some(result);
    }
}
