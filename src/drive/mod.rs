// src/drive/mod.rs

use std::time::Duration;

use chrono::NaiveDate;
use serde::Serialize;
use tokio::time::sleep;
use tracing::{info, warn};

use crate::fetch::DayFetcher;
use crate::process::parse::{self, ParseOutcome};
use crate::schema::{Pollutant, Reading, Region};

/// Inclusive calendar range, iterated daily, ascending, no gaps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, RunError> {
        if start > end {
            return Err(RunError::InvalidRange { start, end });
        }
        Ok(DateRange { start, end })
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    pub fn days(&self) -> impl Iterator<Item = NaiveDate> {
        let end = self.end;
        self.start.iter_days().take_while(move |d| *d <= end)
    }

    pub fn len(&self) -> u64 {
        (self.end - self.start).num_days() as u64 + 1
    }

    pub fn is_empty(&self) -> bool {
        false
    }
}

/// Run-level failures. Everything per-date is absorbed into [`DateIssue`]s
/// instead.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RunError {
    #[error("invalid date range: start {start} is after end {end}")]
    InvalidRange { start: NaiveDate, end: NaiveDate },
}

/// Why a date contributed fewer cells than expected.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum IssueKind {
    /// The page could not be fetched at all.
    Fetch { error: String },
    /// The page arrived but carried no recognizable readings table.
    NoTable,
    /// One cell could not be read as a number and became missing.
    MalformedCell {
        hour: String,
        region: Region,
        column: Pollutant,
        raw: String,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DateIssue {
    pub date: NaiveDate,
    #[serde(flatten)]
    pub kind: IssueKind,
}

/// Everything a run produced: readings in date order plus the issue ledger.
/// An empty ledger marks a fully clean run.
#[derive(Debug, Default)]
pub struct RunReport {
    pub readings: Vec<Reading>,
    pub issues: Vec<DateIssue>,
}

impl RunReport {
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }
}

/// Walk the range one day at a time: fetch, parse, accumulate.
///
/// A failed fetch or an unparseable page skips that date and the run keeps
/// going; only an invalid range fails the run, and it does so before any
/// fetch happens. `delay` spaces successive fetches to stay polite to the
/// source site. Readings accumulate in date order, so an interrupted run
/// still holds a valid prefix of the range.
pub async fn run<F>(
    start: NaiveDate,
    end: NaiveDate,
    delay: Duration,
    fetcher: &F,
) -> Result<RunReport, RunError>
where
    F: DayFetcher + ?Sized,
{
    let range = DateRange::new(start, end)?;
    info!(%start, %end, days = range.len(), "starting run");

    let mut report = RunReport::default();
    let mut first = true;
    for date in range.days() {
        if !first && !delay.is_zero() {
            sleep(delay).await;
        }
        first = false;

        let markup = match fetcher.fetch_day(date).await {
            Ok(markup) => markup,
            Err(err) => {
                warn!(%date, %err, "fetch failed, skipping date");
                report.issues.push(DateIssue {
                    date,
                    kind: IssueKind::Fetch {
                        error: err.to_string(),
                    },
                });
                continue;
            }
        };

        let day = parse::parse_day(&markup, date);
        if day.outcome == ParseOutcome::NoTableFound {
            warn!(%date, "no readings table on page");
            report.issues.push(DateIssue {
                date,
                kind: IssueKind::NoTable,
            });
            continue;
        }
        for note in day.notes {
            report.issues.push(DateIssue {
                date,
                kind: IssueKind::MalformedCell {
                    hour: note.hour,
                    region: note.region,
                    column: note.column,
                    raw: note.raw,
                },
            });
        }
        report.readings.extend(day.readings);
    }

    info!(
        rows = report.readings.len(),
        issues = report.issues.len(),
        "run complete"
    );
    Ok(report)
}
