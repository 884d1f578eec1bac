//! Error handling for roster-store
//!
//! Wraps roster-core RosterError with store-specific constructors

use roster_core::errors::{reason, RosterError, RosterErrorKind};

/// Result type alias using RosterError
pub type Result<T> = std::result::Result<T, RosterError>;

/// Create an IO error of the given kind
pub fn io_error(kind: RosterErrorKind, op: &str, err: std::io::Error) -> RosterError {
    RosterError::new(kind)
        .with_reason(reason::IO)
        .with_op(op)
        .with_message(err.to_string())
}

/// Create a database error from rusqlite::Error
///
/// Constraint violations get reason `constraint`, everything else `engine`.
pub fn from_rusqlite(kind: RosterErrorKind, op: &str, err: rusqlite::Error) -> RosterError {
    let why = match &err {
        rusqlite::Error::SqliteFailure(e, _) if e.code == rusqlite::ErrorCode::ConstraintViolation => {
            reason::CONSTRAINT
        }
        _ => reason::ENGINE,
    };
    RosterError::new(kind)
        .with_reason(why)
        .with_op(op)
        .with_message(err.to_string())
}

/// Create a snapshot read error from csv::Error
///
/// Column-count mismatches become `malformed_row` with the offending line.
pub fn from_csv_read(op: &str, err: csv::Error) -> RosterError {
    let line = err.position().map(|p| p.line());
    let why = match err.kind() {
        csv::ErrorKind::Io(_) => reason::IO,
        _ => reason::MALFORMED_ROW,
    };
    let mut out = RosterError::new(RosterErrorKind::ReadFailure)
        .with_reason(why)
        .with_op(op)
        .with_message(err.to_string());
    if let Some(line) = line {
        out = out.with_line(line);
    }
    out
}

/// Create a snapshot encode error from csv::Error
pub fn from_csv_write(op: &str, err: csv::Error) -> RosterError {
    RosterError::new(RosterErrorKind::WriteFailure)
        .with_reason(reason::IO)
        .with_op(op)
        .with_message(err.to_string())
}
