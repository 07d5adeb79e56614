// ============================================================================
// Logging Setup
// fmt subscriber for the tracing events emitted by the engines
// ============================================================================

use tracing::Level;

/// Install a global fmt subscriber at `DEBUG`, which shows integration start
/// and finish lines. Step-level events need `TRACE`.
///
/// Returns `false` if a global subscriber was already installed.
pub fn init_logging() -> bool {
    init_logging_with_level(Level::DEBUG)
}

/// Install a global fmt subscriber that keeps events up to `level`.
pub fn init_logging_with_level(level: Level) -> bool {
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .try_init()
        .is_ok()
}
