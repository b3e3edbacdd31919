// src/fetch/mod.rs

pub mod client;

pub use client::HazeClient;

use async_trait::async_trait;
use chrono::NaiveDate;

/// Ways a single day-page fetch can fail. All variants are per-date and
/// recoverable: the drive loop logs them and moves on to the next date.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// Transport-level failure (DNS, connect, TLS, body read).
    #[error("network error: {0}")]
    Network(String),

    /// The server answered with a non-success status.
    #[error("HTTP status {0}")]
    HttpStatus(u16),

    /// The request exceeded the client's configured timeout.
    #[error("request timed out")]
    Timeout,
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            FetchError::Timeout
        } else if let Some(status) = err.status() {
            FetchError::HttpStatus(status.as_u16())
        } else {
            FetchError::Network(err.to_string())
        }
    }
}

/// Source of one day's readings page.
///
/// The drive loop only depends on this seam, so tests can script responses
/// without a network and [`HazeClient`] stays a thin HTTP wrapper.
#[async_trait]
pub trait DayFetcher: Send + Sync {
    /// Raw markup of the readings page for `date`.
    async fn fetch_day(&self, date: NaiveDate) -> Result<String, FetchError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fetch_error_messages_name_the_cause() {
        assert_eq!(FetchError::HttpStatus(503).to_string(), "HTTP status 503");
        assert_eq!(FetchError::Timeout.to_string(), "request timed out");
    }
}
