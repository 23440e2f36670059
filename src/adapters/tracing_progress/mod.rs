// Tracing progress adapter - Milestone reporting through the tracing crate

use std::sync::Mutex;
use std::time::Instant;

use tracing::{error, info};

use crate::ports::*;

/// Reports conversion milestones as log events
pub struct TracingProgressAdapter {
    started: Mutex<Option<Instant>>,
}

impl TracingProgressAdapter {
    pub fn new() -> Self {
        Self {
            started: Mutex::new(None),
        }
    }

    fn elapsed_seconds(&self, phase: ProgressPhase) -> f64 {
        let mut started = match self.started.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        if phase == ProgressPhase::Validating {
            *started = Some(Instant::now());
        }
        started
            .map(|instant| instant.elapsed().as_secs_f64())
            .unwrap_or(0.0)
    }
}

impl Default for TracingProgressAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressPort for TracingProgressAdapter {
    fn report(&self, phase: ProgressPhase, message: &str) {
        let elapsed = self.elapsed_seconds(phase);
        match phase {
            ProgressPhase::Failed => {
                error!(phase = ?phase, elapsed = elapsed, "{}", message);
            }
            _ => {
                info!(
                    phase = ?phase,
                    percent = phase.percent(),
                    elapsed = elapsed,
                    "[{:>3}%] {}",
                    phase.percent(),
                    message
                );
            }
        }
    }
}
