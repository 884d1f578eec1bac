//! Canonical logging macros
//!
//! Every lifecycle event carries `component`, `op` and `event`; end events add
//! `duration_ms`, error and warning events add the error code and kind.

/// Log the start of an operation
///
/// # Example
///
/// ```
/// # use roster_core::log_op_start;
/// log_op_start!("roster_sync");
/// log_op_start!("roster_sync", run_id = "r1");
/// ```
#[macro_export]
macro_rules! log_op_start {
    ($op:expr) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = roster_core_types::schema::EVENT_START,
        );
    };
    ($op:expr, $($field:tt)*) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = roster_core_types::schema::EVENT_START,
            $($field)*
        );
    };
}

/// Log the successful end of an operation
///
/// # Example
///
/// ```
/// # use roster_core::log_op_end;
/// log_op_end!("roster_sync", duration_ms = 42);
/// ```
#[macro_export]
macro_rules! log_op_end {
    ($op:expr, duration_ms = $duration:expr) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = roster_core_types::schema::EVENT_END,
            duration_ms = $duration,
        );
    };
    ($op:expr, duration_ms = $duration:expr, $($field:tt)*) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = roster_core_types::schema::EVENT_END,
            duration_ms = $duration,
            $($field)*
        );
    };
}

/// Log a non-fatal failure inside an operation
///
/// # Example
///
/// ```
/// # use roster_core::log_op_warn;
/// # use roster_core::errors::{RosterError, RosterErrorKind};
/// let err = RosterError::new(RosterErrorKind::WriteFailure).with_reason("empty");
/// log_op_warn!("roster_sync", err);
/// ```
#[macro_export]
macro_rules! log_op_warn {
    ($op:expr, $err:expr) => {{
        let roster_err: &$crate::errors::RosterError = &$err;
        tracing::warn!(
            component = module_path!(),
            op = $op,
            event = roster_core_types::schema::EVENT_WARN,
            err.kind = ?roster_err.kind(),
            err.code = roster_err.code(),
            err.reason = roster_err.reason().unwrap_or(""),
            "{}",
            roster_err
        );
    }};
    ($op:expr, $err:expr, $($field:tt)*) => {{
        let roster_err: &$crate::errors::RosterError = &$err;
        tracing::warn!(
            component = module_path!(),
            op = $op,
            event = roster_core_types::schema::EVENT_WARN,
            err.kind = ?roster_err.kind(),
            err.code = roster_err.code(),
            err.reason = roster_err.reason().unwrap_or(""),
            $($field)*
        );
    }};
}

/// Log an operation error
///
/// # Example
///
/// ```
/// # use roster_core::log_op_error;
/// # use roster_core::errors::{RosterError, RosterErrorKind};
/// let err = RosterError::new(RosterErrorKind::FetchFailure);
/// log_op_error!("roster_sync", err, duration_ms = 10);
/// ```
#[macro_export]
macro_rules! log_op_error {
    ($op:expr, $err:expr, duration_ms = $duration:expr) => {{
        let roster_err: &$crate::errors::RosterError = &$err;
        tracing::error!(
            component = module_path!(),
            op = $op,
            event = roster_core_types::schema::EVENT_END_ERROR,
            duration_ms = $duration,
            err.kind = ?roster_err.kind(),
            err.code = roster_err.code(),
            err.reason = roster_err.reason().unwrap_or(""),
            "{}",
            roster_err
        );
    }};
    ($op:expr, $err:expr, duration_ms = $duration:expr, $($field:tt)*) => {{
        let roster_err: &$crate::errors::RosterError = &$err;
        tracing::error!(
            component = module_path!(),
            op = $op,
            event = roster_core_types::schema::EVENT_END_ERROR,
            duration_ms = $duration,
            err.kind = ?roster_err.kind(),
            err.code = roster_err.code(),
            err.reason = roster_err.reason().unwrap_or(""),
            $($field)*
        );
    }};
}
