// ============================================================================
// Step Observer Interface
// Defines the contract for watching an adaptive integration walk
// ============================================================================

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Events emitted by the adaptive integrator, in SI magnitudes
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum QuadratureEvent {
    /// Integration started
    Started { from: f64, to: f64, step: f64, tolerance: f64 },

    /// Trial step rejected; the next trial uses `next_step`
    StepRejected { position: f64, step: f64, error: f64, next_step: f64 },

    /// Trial step accepted
    StepAccepted {
        position: f64,
        step: f64,
        error: f64,
        integral: f64,
    },

    /// Upper bound reached
    Finished {
        integral: f64,
        accepted: usize,
        rejected: usize,
    },
}

/// Observer trait for integration progress
/// Implementations can handle logging, tracing, plotting of step sizes, etc.
pub trait StepObserver: Send + Sync {
    /// Handle one event
    fn on_event(&self, event: QuadratureEvent);

    /// Batch handler
    fn on_events(&self, events: Vec<QuadratureEvent>) {
        for event in events {
            self.on_event(event);
        }
    }
}

/// No-op observer, the default
pub struct NoOpObserver;

impl StepObserver for NoOpObserver {
    fn on_event(&self, _event: QuadratureEvent) {}
}

/// Logging observer
pub struct LoggingObserver;

impl StepObserver for LoggingObserver {
    fn on_event(&self, event: QuadratureEvent) {
        match event {
            QuadratureEvent::Started { .. } | QuadratureEvent::Finished { .. } => {
                tracing::debug!("Quadrature event: {:?}", event);
            },
            _ => tracing::trace!("Quadrature event: {:?}", event),
        }
    }
}
