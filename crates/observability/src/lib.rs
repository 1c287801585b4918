//! Tracing, logging, metrics (shared setup).
//!
//! The domain crates never log; embedding processes and test harnesses call
//! [`init`] once and observe the engine from the outside.

/// Tracing configuration (filters, layers).
pub mod tracing;

/// Initialize process-wide observability (tracing/logging).
///
/// This is safe to call multiple times; subsequent calls become no-ops.
pub fn init() {
    tracing::init();
}
