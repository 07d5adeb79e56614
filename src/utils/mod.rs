// ============================================================================
// Utilities Module
// Helpers that sit outside the numeric engines
// ============================================================================

#[cfg(feature = "logging")]
mod logging;

#[cfg(feature = "logging")]
pub use logging::{init_logging, init_logging_with_level};
