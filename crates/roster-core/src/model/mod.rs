//! Roster domain model

pub mod employee;
pub mod fetch;
pub mod query;

pub use employee::{is_blank_key, EmployeeRecord, FieldRef, EMPLOYEE_FIELDS};
pub use fetch::FetchResult;
pub use query::RosterQuery;
