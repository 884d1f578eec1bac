//! Roster query descriptor
//!
//! Serialized verbatim as the JSON body of the remote request. Defaults
//! reproduce the fixed first-page request of active employees.

use serde::Serialize;
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RosterQuery {
    pub skip: u32,
    pub take: u32,
    pub emp_no_reference: String,
    pub search: String,
    pub total: bool,
    pub active: i32,
    pub sort_order: i32,
    pub sort_direction: i32,
    pub take_option: i32,
    pub locations: Vec<Value>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub excluded_locations: Vec<Value>,
    pub employment_status: Vec<Value>,
    pub positions: Vec<Value>,
    pub sort_definitions: Vec<Value>,
}

impl Default for RosterQuery {
    fn default() -> Self {
        Self {
            skip: 0,
            take: 100,
            emp_no_reference: String::new(),
            search: String::new(),
            total: true,
            active: 1,
            sort_order: 0,
            sort_direction: 0,
            take_option: 0,
            locations: Vec::new(),
            excluded_locations: Vec::new(),
            employment_status: Vec::new(),
            positions: Vec::new(),
            sort_definitions: Vec::new(),
        }
    }
}

impl RosterQuery {
    pub fn with_skip(mut self, skip: u32) -> Self {
        self.skip = skip;
        self
    }

    pub fn with_take(mut self, take: u32) -> Self {
        self.take = take;
        self
    }

    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = search.into();
        self
    }
}
