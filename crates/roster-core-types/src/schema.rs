//! Canonical schema constants for structured logging and events
//!
//! These constants ensure consistency across all logging and error reporting.
//! `tracing` macros take field names as identifiers, so emitters spell the
//! keys out; readers such as the test capture layer look them up here.

// Canonical field keys for structured logging
pub const FIELD_COMPONENT: &str = "component";
pub const FIELD_OP: &str = "op";
pub const FIELD_EVENT: &str = "event";
pub const FIELD_DURATION_MS: &str = "duration_ms";
pub const FIELD_RUN_ID: &str = "run_id";

// Pipeline context
pub const FIELD_STAGE: &str = "stage";
pub const FIELD_ROW_COUNT: &str = "row_count";
pub const FIELD_SNAPSHOT_PATH: &str = "snapshot_path";

// Error fields
pub const FIELD_ERR_KIND: &str = "err.kind";
pub const FIELD_ERR_CODE: &str = "err.code";
pub const FIELD_ERR_REASON: &str = "err.reason";

// Canonical event names
pub const EVENT_START: &str = "start";
pub const EVENT_END: &str = "end";
pub const EVENT_WARN: &str = "warn";
pub const EVENT_END_ERROR: &str = "end_error";
