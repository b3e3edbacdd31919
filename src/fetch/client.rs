// src/fetch/client.rs

use std::time::Duration;

use async_trait::async_trait;
use chrono::{Datelike, NaiveDate};
use reqwest::Client;
use tracing::debug;
use url::Url;

use super::{DayFetcher, FetchError};

/// Historical PSI readings, one page per calendar day.
static DAY_PAGE_URL: &str =
    "https://www.haze.gov.sg/haze-updates/historical-psi-readings/year/{year}/month/{month}/day/{day}";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Thin HTTP wrapper around the NEA historical readings pages.
pub struct HazeClient {
    client: Client,
}

impl HazeClient {
    /// Build a client with a per-request timeout, so one hanging page
    /// surfaces as [`FetchError::Timeout`] instead of stalling the range.
    pub fn new() -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .gzip(true)
            .build()?;
        Ok(HazeClient { client })
    }

    /// Address of the readings page for `date`.
    pub fn day_url(date: NaiveDate) -> Result<Url, FetchError> {
        let raw = DAY_PAGE_URL
            .replace("{year}", &date.year().to_string())
            .replace("{month}", &date.month().to_string())
            .replace("{day}", &date.day().to_string());
        Url::parse(&raw).map_err(|e| FetchError::Network(e.to_string()))
    }
}

#[async_trait]
impl DayFetcher for HazeClient {
    async fn fetch_day(&self, date: NaiveDate) -> Result<String, FetchError> {
        let url = Self::day_url(date)?;
        debug!(%url, "fetching day page");
        let resp = self
            .client
            .get(url.as_str())
            .send()
            .await?
            .error_for_status()?;
        Ok(resp.text().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn day_url_substitutes_calendar_fields() {
        let date = NaiveDate::from_ymd_opt(2013, 6, 5).unwrap();
        let url = HazeClient::day_url(date).unwrap();
        assert_eq!(
            url.as_str(),
            "https://www.haze.gov.sg/haze-updates/historical-psi-readings/year/2013/month/6/day/5"
        );
    }
}
