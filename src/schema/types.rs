// src/schema/types.rs

use std::collections::BTreeMap;
use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A reporting zone, one per column group in the published table.
/// Declaration order matches the published column order; `Ord` follows it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Region {
    North,
    South,
    East,
    West,
    Central,
    Overall,
}

impl Region {
    /// All zones, in published column order.
    pub const ALL: [Region; 6] = [
        Region::North,
        Region::South,
        Region::East,
        Region::West,
        Region::Central,
        Region::Overall,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Region::North => "North",
            Region::South => "South",
            Region::East => "East",
            Region::West => "West",
            Region::Central => "Central",
            Region::Overall => "Overall",
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A pollutant/index column of the consolidated dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Pollutant {
    Psi,
    Pm25,
}

impl Pollutant {
    pub fn as_str(&self) -> &'static str {
        match self {
            Pollutant::Psi => "PSI",
            Pollutant::Pm25 => "PM2.5",
        }
    }
}

impl fmt::Display for Pollutant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An hour bucket exactly as published ("1am", "12pm-1pm", ...), plus the
/// row position it occupied in the source table.
///
/// The labels are opaque: ordering is (ordinal, text), never an inferred
/// clock time.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct HourLabel {
    pub ordinal: u8,
    pub text: String,
}

impl HourLabel {
    pub fn new(ordinal: u8, text: impl Into<String>) -> Self {
        HourLabel {
            ordinal,
            text: text.into(),
        }
    }
}

impl fmt::Display for HourLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// One (date, hour, region) observation row of the consolidated dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    pub date: NaiveDate,
    pub hour: HourLabel,
    pub region: Region,
    /// One entry per pollutant column in force; `None` is an explicit
    /// missing value, never a silently dropped cell.
    pub values: BTreeMap<Pollutant, Option<f64>>,
}

impl Reading {
    /// Cell value for `column`, if present and populated.
    pub fn value(&self, column: Pollutant) -> Option<f64> {
        self.values.get(&column).copied().flatten()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn regions_sort_in_published_order() {
        let mut shuffled = vec![Region::Overall, Region::East, Region::North];
        shuffled.sort();
        assert_eq!(shuffled, vec![Region::North, Region::East, Region::Overall]);
    }

    #[test]
    fn hour_labels_order_by_position_not_text() {
        // "10pm" appeared later in the table than "9pm" even though it
        // compares lower lexicographically.
        let nine = HourLabel::new(20, "9pm");
        let ten = HourLabel::new(21, "10pm");
        assert!(nine < ten);
    }
}
