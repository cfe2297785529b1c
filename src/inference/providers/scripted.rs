//! Scripted backend — canned outcome plus an atomic call counter.
//! Used to exercise routing and session flow without a network; the
//! counter backs call-count assertions in router tests.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use crate::inference::{InferenceResult, ProviderError};
use crate::profile::ProfileState;

#[derive(Debug, Clone)]
enum Outcome {
    Succeed(InferenceResult),
    Fail(ProviderError),
    /// Play results front-to-back, one per call; shape-fails once drained.
    Sequence(Arc<Mutex<VecDeque<InferenceResult>>>),
    /// Echo the message back with an empty update, for offline smoke runs.
    Echo,
}

#[derive(Debug, Clone)]
pub struct ScriptedProvider {
    outcome: Outcome,
    calls: Arc<AtomicUsize>,
}

impl ScriptedProvider {
    pub fn succeeding(result: InferenceResult) -> Self {
        Self::with_outcome(Outcome::Succeed(result))
    }

    pub fn failing(error: ProviderError) -> Self {
        Self::with_outcome(Outcome::Fail(error))
    }

    pub fn sequence(results: Vec<InferenceResult>) -> Self {
        Self::with_outcome(Outcome::Sequence(Arc::new(Mutex::new(results.into()))))
    }

    pub fn echo() -> Self {
        Self::with_outcome(Outcome::Echo)
    }

    fn with_outcome(outcome: Outcome) -> Self {
        Self {
            outcome,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// How many times `infer` has run, across all clones of this provider.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub async fn infer(
        &self,
        message: &str,
        _snapshot: &ProfileState,
    ) -> Result<InferenceResult, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.outcome {
            Outcome::Succeed(result) => Ok(result.clone()),
            Outcome::Fail(error) => Err(error.clone()),
            Outcome::Sequence(queue) => queue
                .lock()
                .unwrap_or_else(|e| e.into_inner())
                .pop_front()
                .ok_or_else(|| ProviderError::Shape("script exhausted".to_string())),
            Outcome::Echo => Ok(InferenceResult::reply_only(format!("[echo] {message}"))),
        }
    }
}
