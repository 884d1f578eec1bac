//! Result of one roster query

use crate::model::employee::EmployeeRecord;

/// One page of roster records plus the remote's total count, if reported
///
/// An empty page is a valid result. A failed fetch never produces a
/// `FetchResult`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FetchResult {
    pub records: Vec<EmployeeRecord>,
    pub total: Option<u64>,
}

impl FetchResult {
    pub fn new(records: Vec<EmployeeRecord>, total: Option<u64>) -> Self {
        Self { records, total }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
