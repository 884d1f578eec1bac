//! HTTP roster fetcher

#![allow(clippy::result_large_err)]

use super::RosterSource;
use roster_core::config::FetchEndpoint;
use roster_core::errors::{reason, Result, RosterError, RosterErrorKind};
use roster_core::model::{EmployeeRecord, FetchResult, RosterQuery};
use serde::Deserialize;

/// Response body of the roster endpoint
#[derive(Debug, Deserialize)]
struct RosterPage {
    employees: Vec<EmployeeRecord>,
    #[serde(default, alias = "totalCount")]
    total: Option<u64>,
}

/// Fetches roster pages with one authenticated POST per call
#[derive(Debug)]
pub struct HttpRosterFetcher {
    client: reqwest::blocking::Client,
    endpoint: FetchEndpoint,
}

impl HttpRosterFetcher {
    /// Build a fetcher for `endpoint`
    ///
    /// # Errors
    ///
    /// `InvalidConfig` if the HTTP client cannot be built.
    pub fn new(endpoint: FetchEndpoint) -> Result<Self> {
        let mut builder = reqwest::blocking::Client::builder();
        if let Some(timeout) = endpoint.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(|e| {
            RosterError::new(RosterErrorKind::InvalidConfig)
                .with_op("fetcher_new")
                .with_message(e.to_string())
        })?;

        Ok(Self { client, endpoint })
    }

    pub fn endpoint(&self) -> &FetchEndpoint {
        &self.endpoint
    }
}

impl RosterSource for HttpRosterFetcher {
    fn fetch(&self, query: &RosterQuery) -> Result<FetchResult> {
        tracing::debug!(
            url = %self.endpoint.url,
            skip = query.skip,
            take = query.take,
            "posting roster query"
        );

        let response = self
            .client
            .post(&self.endpoint.url)
            .bearer_auth(self.endpoint.token.expose())
            .json(query)
            .send()
            .map_err(fetch_error)?
            .error_for_status()
            .map_err(fetch_error)?;

        let page: RosterPage = response.json().map_err(fetch_error)?;

        for record in &page.employees {
            record.validate().map_err(|e| {
                RosterError::new(RosterErrorKind::FetchFailure)
                    .with_reason(reason::DECODE)
                    .with_op("fetch")
                    .with_message("page contains an invalid record")
                    .with_source(e)
            })?;
        }

        tracing::debug!(
            records = page.employees.len(),
            total = ?page.total,
            "roster page decoded"
        );
        Ok(FetchResult::new(page.employees, page.total))
    }
}

fn fetch_error(err: reqwest::Error) -> RosterError {
    let why = if err.is_timeout() {
        reason::TIMEOUT
    } else if err.is_status() {
        reason::STATUS
    } else if err.is_decode() {
        reason::DECODE
    } else {
        reason::TRANSPORT
    };
    // reqwest errors embed the URL, never the auth header
    RosterError::new(RosterErrorKind::FetchFailure)
        .with_reason(why)
        .with_op("fetch")
        .with_message(err.to_string())
}
