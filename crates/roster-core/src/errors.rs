use std::fmt;

/// Result type alias using RosterError
pub type Result<T> = std::result::Result<T, RosterError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// One kind per failure class a pipeline component can return. Each kind maps
/// to a stable error code used by tests, logs and the CLI exit message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RosterErrorKind {
    /// Configuration is missing or unusable
    InvalidConfig,
    /// A roster record violates a model invariant
    InvalidRecord,

    // Fetch
    /// Transport or remote-side failure, including undecodable payloads
    FetchFailure,

    // Snapshot
    /// Snapshot could not be written (or was refused)
    WriteFailure,
    /// Snapshot could not be read back
    ReadFailure,

    // Storage
    /// Storage connection could not be opened
    ConnectionFailure,
    /// Target table could not be ensured
    SchemaFailure,
    /// Upsert batch failed and was rolled back
    UpsertFailure,

    // Internal
    Internal,
}

impl RosterErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            RosterErrorKind::InvalidConfig => "ERR_INVALID_CONFIG",
            RosterErrorKind::InvalidRecord => "ERR_INVALID_RECORD",
            RosterErrorKind::FetchFailure => "ERR_FETCH_FAILURE",
            RosterErrorKind::WriteFailure => "ERR_SNAPSHOT_WRITE",
            RosterErrorKind::ReadFailure => "ERR_SNAPSHOT_READ",
            RosterErrorKind::ConnectionFailure => "ERR_CONNECTION_FAILURE",
            RosterErrorKind::SchemaFailure => "ERR_SCHEMA_FAILURE",
            RosterErrorKind::UpsertFailure => "ERR_UPSERT_FAILURE",
            RosterErrorKind::Internal => "ERR_INTERNAL",
        }
    }
}

/// Machine-readable failure reasons carried by `RosterError::reason`
pub mod reason {
    pub const EMPTY: &str = "empty";
    pub const IO: &str = "io";
    pub const INVALID_PATH: &str = "invalid_path";
    pub const MISSING_HEADER: &str = "missing_header";
    pub const MALFORMED_ROW: &str = "malformed_row";
    pub const MISSING_FIELD: &str = "missing_field";
    pub const TRANSPORT: &str = "transport";
    pub const TIMEOUT: &str = "timeout";
    pub const STATUS: &str = "status";
    pub const DECODE: &str = "decode";
    pub const CONSTRAINT: &str = "constraint";
    pub const COERCION: &str = "coercion";
    pub const ENGINE: &str = "engine";
    pub const READ: &str = "read";
}

/// Canonical structured error type
///
/// Carries a classification (`kind`, `reason`) for programmatic handling and
/// context (`op`, `emp_no`, `line`, `message`, `source`) for diagnostics.
#[derive(Debug, Clone)]
pub struct RosterError {
    kind: RosterErrorKind,
    reason: Option<&'static str>,
    op: Option<String>,
    emp_no: Option<String>,
    line: Option<u64>,
    message: String,
    source: Option<Box<RosterError>>,
}

impl RosterError {
    /// Create a new error with the specified kind
    pub fn new(kind: RosterErrorKind) -> Self {
        Self {
            kind,
            reason: None,
            op: None,
            emp_no: None,
            line: None,
            message: String::new(),
            source: None,
        }
    }

    /// Add a machine-readable reason (see [`reason`])
    pub fn with_reason(mut self, reason: &'static str) -> Self {
        self.reason = Some(reason);
        self
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add the employee number of the offending record
    pub fn with_emp_no(mut self, emp_no: impl Into<String>) -> Self {
        self.emp_no = Some(emp_no.into());
        self
    }

    /// Add the snapshot line number of the offending row
    pub fn with_line(mut self, line: u64) -> Self {
        self.line = Some(line);
        self
    }

    /// Add custom message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Add source error
    pub fn with_source(mut self, source: RosterError) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Get the error kind
    pub fn kind(&self) -> RosterErrorKind {
        self.kind
    }

    /// Get the stable error code
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    /// Get the failure reason, if any
    pub fn reason(&self) -> Option<&'static str> {
        self.reason
    }

    /// Get the operation context, if any
    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    /// Get the employee number context, if any
    pub fn emp_no(&self) -> Option<&str> {
        self.emp_no.as_deref()
    }

    /// Get the snapshot line context, if any
    pub fn line(&self) -> Option<u64> {
        self.line
    }

    /// Get the error message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Get the source error, if any
    pub fn source_error(&self) -> Option<&RosterError> {
        self.source.as_deref()
    }
}

impl fmt::Display for RosterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.code())?;
        if let Some(op) = &self.op {
            write!(f, " in operation '{}'", op)?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        if let Some(reason) = self.reason {
            write!(f, " (reason: {})", reason)?;
        }
        if let Some(emp_no) = &self.emp_no {
            write!(f, " (emp_no: {})", emp_no)?;
        }
        if let Some(line) = self.line {
            write!(f, " (line: {})", line)?;
        }
        if let Some(source) = &self.source {
            write!(f, "; caused by {}", source)?;
        }
        Ok(())
    }
}

impl std::error::Error for RosterError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_deref()
            .map(|s| s as &(dyn std::error::Error + 'static))
    }
}

// ========== End Error Facility ==========
