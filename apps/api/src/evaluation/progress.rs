//! Optional progress notifications. The engine emits events; nothing it computes
//! depends on whether anyone listens.

use tracing::info;

#[derive(Debug, Clone, PartialEq)]
pub enum ProgressEvent {
    GroupStarted { index: usize, name: &'static str },
    GroupCompleted {
        index: usize,
        name: &'static str,
        attempts: u32,
    },
    GroupFailed { index: usize, name: &'static str },
    Scoring,
    OverviewStarted,
    Finished { final_score: f64 },
}

pub trait EvaluationProgress: Send + Sync {
    fn on_event(&self, event: ProgressEvent);
}

/// Discards every event.
pub struct NoProgress;

impl EvaluationProgress for NoProgress {
    fn on_event(&self, _event: ProgressEvent) {}
}

/// Logs every event. Runs inside the request's `evaluation` span, which carries the id.
pub struct TracingProgress;

impl EvaluationProgress for TracingProgress {
    fn on_event(&self, event: ProgressEvent) {
        match event {
            ProgressEvent::GroupStarted { name, .. } => info!("Analyzing: {name}"),
            ProgressEvent::GroupCompleted { name, attempts, .. } => {
                info!("{name} graded ({attempts} attempt(s))")
            }
            ProgressEvent::GroupFailed { name, .. } => info!("{name} could not be graded"),
            ProgressEvent::Scoring => info!("Scoring"),
            ProgressEvent::OverviewStarted => info!("Finalize"),
            ProgressEvent::Finished { final_score } => info!("Finished: {final_score}/100"),
        }
    }
}

#[cfg(test)]
pub(crate) mod recording {
    use std::sync::Mutex;

    use super::{EvaluationProgress, ProgressEvent};

    #[derive(Default)]
    pub struct RecordingProgress {
        pub events: Mutex<Vec<ProgressEvent>>,
    }

    impl EvaluationProgress for RecordingProgress {
        fn on_event(&self, event: ProgressEvent) {
            self.events.lock().unwrap().push(event);
        }
    }
}
