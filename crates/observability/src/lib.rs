//! Tracing/logging setup shared by every binary.

/// Tracing configuration (filters, output format).
pub mod tracing;

pub use crate::tracing::{LogFormat, UnknownLogFormat};

/// Initialize process-wide tracing with the given output format.
///
/// This is safe to call multiple times; subsequent calls become no-ops.
pub fn init_with(format: LogFormat) {
    crate::tracing::init(format);
}
