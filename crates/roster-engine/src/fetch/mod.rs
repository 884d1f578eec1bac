//! Roster fetching
//!
//! `RosterSource` is the seam between the pipeline and wherever the roster
//! comes from. `HttpRosterFetcher` is the remote implementation.

#![allow(clippy::result_large_err)]

mod http;

pub use http::HttpRosterFetcher;

use roster_core::errors::Result;
use roster_core::model::{FetchResult, RosterQuery};

/// A source of roster pages
pub trait RosterSource {
    /// Fetch one page for `query`
    ///
    /// # Errors
    ///
    /// `FetchFailure` with a reason describing what went wrong.
    fn fetch(&self, query: &RosterQuery) -> Result<FetchResult>;
}

impl<T: RosterSource + ?Sized> RosterSource for &T {
    fn fetch(&self, query: &RosterQuery) -> Result<FetchResult> {
        (**self).fetch(query)
    }
}
