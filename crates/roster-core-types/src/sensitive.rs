//! Sensitive data marker for automatic redaction
//!
//! `Sensitive<T>` keeps the bearer token out of logs, `Debug` dumps of
//! configuration structs, and error messages.

use std::fmt;

/// Placeholder printed instead of a secret
pub const REDACTED: &str = "***REDACTED***";

/// A value that never prints itself
///
/// # Example
///
/// ```
/// use roster_core_types::Sensitive;
///
/// let token = Sensitive::new("bearer-secret");
/// assert_eq!(format!("{:?} {}", token, token), "***REDACTED*** ***REDACTED***");
/// assert_eq!(*token.expose(), "bearer-secret");
/// ```
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Sensitive<T>(T);

impl<T> Sensitive<T> {
    pub fn new(value: T) -> Self {
        Self(value)
    }

    /// Borrow the secret; call only where it is handed to the transport
    pub fn expose(&self) -> &T {
        &self.0
    }

    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> From<T> for Sensitive<T> {
    fn from(value: T) -> Self {
        Self(value)
    }
}

impl<T> fmt::Debug for Sensitive<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(REDACTED)
    }
}

impl<T> fmt::Display for Sensitive<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(REDACTED)
    }
}
