//! Audit trail for completed mutations
//!
//! Events go to the `sheetops::audit` tracing target so a subscriber can
//! route them separately from diagnostics, e.g. `RUST_LOG=sheetops::audit=info`.

use serde_json::Value;

/// Tracing target carrying audit events
pub const AUDIT_TARGET: &str = "sheetops::audit";

/// Record a successful mutation of `file`
pub fn record(action: &str, file: &str, details: Value) {
    tracing::info!(target: AUDIT_TARGET, action, file, %details, "audit");
}
