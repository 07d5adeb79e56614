// ============================================================================
// Interfaces Module
// Contains all trait definitions and contracts
// ============================================================================

mod step_observer;
mod table;

pub use step_observer::{LoggingObserver, NoOpObserver, QuadratureEvent, StepObserver};
pub use table::Table;
