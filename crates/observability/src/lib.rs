//! Tracing/logging setup shared by every entry point.

/// Initialize process-wide logging with the `RUST_LOG` filter (default
/// `info`).
///
/// This is safe to call multiple times; subsequent calls become no-ops.
pub fn init() {
    tracing::init(None);
}

/// Initialize logging with an explicit filter directive, e.g. from
/// configuration. `RUST_LOG` is ignored when a filter is given.
pub fn init_with_filter(filter: &str) {
    tracing::init(Some(filter));
}

/// Subscriber construction (filters, JSON layer).
pub mod tracing;
