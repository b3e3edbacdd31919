// src/process/parse.rs

use std::collections::BTreeMap;

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, warn};

use crate::schema::{self, HourLabel, Pollutant, Reading, Region};

static TABLE: Lazy<Selector> =
    Lazy::new(|| Selector::parse("table").expect("CSS selector for tables should be valid"));
static TR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("tr").expect("CSS selector for rows should be valid"));
static TD: Lazy<Selector> =
    Lazy::new(|| Selector::parse("td").expect("CSS selector for cells should be valid"));
static WHITESPACE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s+").expect("whitespace regex should be valid"));

// The published table leads with a column-group banner row and a zone name
// row before any data.
const HEADER_ROWS: usize = 2;

/// Whether the page carried a recognizable readings table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseOutcome {
    TableFound,
    NoTableFound,
}

/// A cell that could not be read as a number; its value became missing.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct CellNote {
    pub hour: String,
    pub region: Region,
    pub column: Pollutant,
    pub raw: String,
}

/// Result of parsing one day's page.
#[derive(Debug)]
pub struct DayParse {
    pub readings: Vec<Reading>,
    pub outcome: ParseOutcome,
    pub notes: Vec<CellNote>,
}

impl DayParse {
    fn no_table() -> Self {
        DayParse {
            readings: Vec::new(),
            outcome: ParseOutcome::NoTableFound,
            notes: Vec::new(),
        }
    }
}

/// Extract readings for `date` from raw page markup.
///
/// The page itself does not reliably encode its date, so the caller supplies
/// it; `date` also selects the column layout via [`schema::layout_for`].
/// Pure transformation, no I/O.
///
/// Cells are laid out hour-major: `td[0]` is the hour bucket, followed by
/// one block of six zone cells per pollutant column in force.
pub fn parse_day(markup: &str, date: NaiveDate) -> DayParse {
    let doc = Html::parse_document(markup);
    let table = match doc.select(&TABLE).next() {
        Some(table) => table,
        None => {
            debug!(%date, "no table element in page");
            return DayParse::no_table();
        }
    };

    let rows: Vec<ElementRef> = table.select(&TR).collect();
    if rows.len() <= HEADER_ROWS {
        debug!(%date, rows = rows.len(), "table too short to hold data rows");
        return DayParse::no_table();
    }

    let layout = schema::layout_for(date);
    let mut readings = Vec::new();
    let mut notes: Vec<CellNote> = Vec::new();

    for (ordinal, row) in rows[HEADER_ROWS..].iter().enumerate() {
        let cells: Vec<String> = row.select(&TD).map(cell_text).collect();

        // hour bucket plus at least one full zone block
        if cells.len() < 1 + Region::ALL.len() {
            continue;
        }
        let hour = &cells[0];
        if hour.is_empty() {
            continue;
        }

        for (zone_idx, &region) in Region::ALL.iter().enumerate() {
            let mut values = BTreeMap::new();
            for (block_idx, &column) in layout.iter().enumerate() {
                let cell_idx = 1 + block_idx * Region::ALL.len() + zone_idx;
                let value = match cells.get(cell_idx) {
                    Some(raw) => match parse_cell(raw) {
                        Ok(value) => value,
                        Err(()) => {
                            warn!(%date, %hour, %region, %column, %raw, "unreadable cell, recording as missing");
                            notes.push(CellNote {
                                hour: hour.clone(),
                                region,
                                column,
                                raw: raw.clone(),
                            });
                            None
                        }
                    },
                    // the block this date's layout expects is short or absent
                    None => {
                        notes.push(CellNote {
                            hour: hour.clone(),
                            region,
                            column,
                            raw: String::new(),
                        });
                        None
                    }
                };
                values.insert(column, value);
            }
            readings.push(Reading {
                date,
                hour: HourLabel::new(ordinal as u8, hour.clone()),
                region,
                values,
            });
        }
    }

    if readings.is_empty() {
        debug!(%date, "table had no parseable data rows");
        return DayParse::no_table();
    }

    DayParse {
        readings,
        outcome: ParseOutcome::TableFound,
        notes,
    }
}

fn cell_text(cell: ElementRef) -> String {
    let joined: String = cell.text().collect();
    WHITESPACE
        .replace_all(joined.replace('\u{a0}', " ").as_str(), " ")
        .trim()
        .to_string()
}

/// "-" and "n.a." style placeholders mark hours with no published reading;
/// they map to an explicit missing value, never to zero.
fn parse_cell(raw: &str) -> Result<Option<f64>, ()> {
    if raw.is_empty() {
        return Ok(None);
    }
    let lowered = raw.to_ascii_lowercase();
    if matches!(
        lowered.as_str(),
        "-" | "\u{2013}" | "\u{2014}" | "na" | "n.a." | "n/a" | "nil"
    ) {
        return Ok(None);
    }
    raw.parse::<f64>().map(Some).map_err(|_| ())
}
