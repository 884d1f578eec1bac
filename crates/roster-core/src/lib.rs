//! Roster Core - domain model and shared facilities
//!
//! This crate provides:
//! - The roster model (`EmployeeRecord`, `FetchResult`, `RosterQuery`)
//! - The canonical error facility (`RosterError`, `RosterErrorKind`)
//! - The structured logging facility and its lifecycle macros
//! - Runtime configuration (`RosterConfig`)

pub mod config;
pub mod errors;
pub mod logging_facility;
pub mod model;

// Re-export commonly used types
pub use config::{FetchEndpoint, RosterConfig};
pub use errors::{Result, RosterError, RosterErrorKind};
pub use model::{EmployeeRecord, FetchResult, FieldRef, RosterQuery, EMPLOYEE_FIELDS};
