// src/process/assemble.rs

use std::collections::HashMap;

use chrono::NaiveDate;

use crate::schema::{self, Pollutant, Reading, Region};

/// What export writers put in a cell whose value is missing. Writers must
/// use this representation, it is the contract with the assembler.
pub const MISSING_CELL: &str = "";

/// The consolidated dataset: every surviving reading, deduplicated, sorted,
/// and widened to the union column schema. Immutable once assembled; the
/// export projections are read-only views over the same rows.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    columns: Vec<Pollutant>,
    rows: Vec<Reading>,
}

/// Merge accumulated readings into the final dataset.
///
/// Duplicate (date, hour, region) keys collapse, last seen wins, so a rerun
/// that refetched a date never duplicates rows. Every row is backfilled to
/// the union column set with explicit missing cells, and rows sort by
/// (date, hour, region) for deterministic export.
pub fn assemble(readings: Vec<Reading>) -> Dataset {
    let mut keyed: HashMap<(NaiveDate, String, Region), Reading> =
        HashMap::with_capacity(readings.len());
    for mut reading in readings {
        for &column in schema::union_columns() {
            reading.values.entry(column).or_insert(None);
        }
        keyed.insert(
            (reading.date, reading.hour.text.clone(), reading.region),
            reading,
        );
    }

    let mut rows: Vec<Reading> = keyed.into_values().collect();
    rows.sort_by(|a, b| (a.date, &a.hour, a.region).cmp(&(b.date, &b.hour, b.region)));

    Dataset {
        columns: schema::union_columns().to_vec(),
        rows,
    }
}

impl Dataset {
    /// Unified column schema spanning both layout eras.
    pub fn columns(&self) -> &[Pollutant] {
        &self.columns
    }

    pub fn rows(&self) -> &[Reading] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Distinct dates present, ascending.
    pub fn dates(&self) -> Vec<NaiveDate> {
        let mut dates: Vec<NaiveDate> = self.rows.iter().map(|r| r.date).collect();
        dates.dedup();
        dates
    }

    /// The single combined table over every row.
    pub fn combined_table(&self) -> TableView<'_> {
        TableView {
            columns: &self.columns,
            rows: &self.rows,
        }
    }

    /// One table per date, in date order; each partition is the subsequence
    /// of rows for that date, suitable for one-file-per-day output.
    pub fn date_partitions(&self) -> Vec<DatePartition<'_>> {
        let mut parts = Vec::new();
        let mut start = 0;
        for end in 1..=self.rows.len() {
            if end == self.rows.len() || self.rows[end].date != self.rows[start].date {
                parts.push(DatePartition {
                    date: self.rows[start].date,
                    table: TableView {
                        columns: &self.columns,
                        rows: &self.rows[start..end],
                    },
                });
                start = end;
            }
        }
        parts
    }
}

/// Read-only tabular projection: a header plus one record per row, missing
/// cells rendered as [`MISSING_CELL`].
#[derive(Debug, Clone, Copy)]
pub struct TableView<'a> {
    columns: &'a [Pollutant],
    rows: &'a [Reading],
}

impl TableView<'_> {
    pub fn header(&self) -> Vec<String> {
        let mut header = vec!["date".to_string(), "hour".to_string(), "region".to_string()];
        header.extend(self.columns.iter().map(|c| c.to_string()));
        header
    }

    pub fn records(&self) -> impl Iterator<Item = Vec<String>> + '_ {
        self.rows.iter().map(move |reading| {
            let mut record = vec![
                reading.date.to_string(),
                reading.hour.text.clone(),
                reading.region.to_string(),
            ];
            record.extend(self.columns.iter().map(|c| render_cell(reading.value(*c))));
            record
        })
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
}

/// The rows of one date, as a table of their own.
#[derive(Debug, Clone, Copy)]
pub struct DatePartition<'a> {
    pub date: NaiveDate,
    pub table: TableView<'a>,
}

fn render_cell(value: Option<f64>) -> String {
    match value {
        None => MISSING_CELL.to_string(),
        // published readings are whole numbers; keep them that way
        Some(v) if v.fract() == 0.0 => format!("{}", v as i64),
        Some(v) => v.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::HourLabel;
    use std::collections::BTreeMap;

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    /// `pm25 = None` models a post-cutoff reading where the column did not
    /// exist at parse time at all.
    fn reading(
        day: &str,
        ordinal: u8,
        hour: &str,
        region: Region,
        psi: Option<f64>,
        pm25: Option<Option<f64>>,
    ) -> Reading {
        let mut values = BTreeMap::new();
        values.insert(Pollutant::Psi, psi);
        if let Some(cell) = pm25 {
            values.insert(Pollutant::Pm25, cell);
        }
        Reading {
            date: date(day),
            hour: HourLabel::new(ordinal, hour),
            region,
            values,
        }
    }

    fn sample() -> Vec<Reading> {
        vec![
            reading("2014-04-01", 0, "1am", Region::South, Some(60.0), None),
            reading("2014-04-01", 0, "1am", Region::North, Some(58.0), None),
            reading(
                "2013-06-15",
                12,
                "12pm-1pm",
                Region::North,
                Some(155.0),
                Some(Some(40.0)),
            ),
            reading(
                "2013-06-15",
                13,
                "1pm-2pm",
                Region::North,
                Some(158.0),
                Some(Some(41.0)),
            ),
        ]
    }

    #[test]
    fn rows_sort_by_date_then_hour_then_region() {
        let dataset = assemble(sample());
        let order: Vec<(NaiveDate, String, Region)> = dataset
            .rows()
            .iter()
            .map(|r| (r.date, r.hour.text.clone(), r.region))
            .collect();
        assert_eq!(
            order,
            vec![
                (date("2013-06-15"), "12pm-1pm".to_string(), Region::North),
                (date("2013-06-15"), "1pm-2pm".to_string(), Region::North),
                (date("2014-04-01"), "1am".to_string(), Region::North),
                (date("2014-04-01"), "1am".to_string(), Region::South),
            ]
        );
    }

    #[test]
    fn assemble_is_idempotent_including_row_order() {
        let first = assemble(sample());
        let second = assemble(sample());
        assert_eq!(first, second);
    }

    #[test]
    fn duplicated_input_collapses_to_the_same_dataset() {
        let mut doubled = sample();
        doubled.extend(sample());
        assert_eq!(assemble(doubled), assemble(sample()));
    }

    #[test]
    fn duplicate_keys_keep_the_last_seen_reading() {
        let mut input = sample();
        input.push(reading(
            "2014-04-01",
            0,
            "1am",
            Region::North,
            Some(61.0),
            None,
        ));
        let dataset = assemble(input);
        assert_eq!(dataset.len(), 4);
        let row = dataset
            .rows()
            .iter()
            .find(|r| r.date == date("2014-04-01") && r.region == Region::North)
            .unwrap();
        assert_eq!(row.value(Pollutant::Psi), Some(61.0));
    }

    #[test]
    fn union_schema_backfills_inapplicable_cells_as_missing() {
        let dataset = assemble(sample());
        assert_eq!(dataset.columns(), &[Pollutant::Psi, Pollutant::Pm25]);

        let pre = &dataset.rows()[0];
        assert_eq!(pre.value(Pollutant::Pm25), Some(40.0));

        let post = dataset
            .rows()
            .iter()
            .find(|r| r.date == date("2014-04-01"))
            .unwrap();
        // the column exists on every row; the cell is explicitly missing
        assert!(post.values.contains_key(&Pollutant::Pm25));
        assert_eq!(post.value(Pollutant::Pm25), None);
    }

    #[test]
    fn combined_and_partitioned_views_agree() {
        let dataset = assemble(sample());
        let combined = dataset.combined_table();
        let parts = dataset.date_partitions();

        let partition_rows: usize = parts.iter().map(|p| p.table.row_count()).sum();
        assert_eq!(combined.row_count(), partition_rows);

        let combined_records: Vec<Vec<String>> = combined.records().collect();
        let partition_records: Vec<Vec<String>> = parts
            .iter()
            .flat_map(|p| p.table.records().collect::<Vec<_>>())
            .collect();
        assert_eq!(combined_records, partition_records);
    }

    #[test]
    fn partitions_split_on_date_boundaries() {
        let dataset = assemble(sample());
        let parts = dataset.date_partitions();
        assert_eq!(parts.len(), 2);
        assert_eq!(parts[0].date, date("2013-06-15"));
        assert_eq!(parts[1].date, date("2014-04-01"));
        assert_eq!(parts[0].table.row_count(), 2);
        assert_eq!(parts[1].table.row_count(), 2);
        assert_eq!(dataset.dates(), vec![date("2013-06-15"), date("2014-04-01")]);
    }

    #[test]
    fn records_render_whole_numbers_and_missing_cells() {
        let dataset = assemble(vec![reading(
            "2014-04-01",
            0,
            "1am",
            Region::North,
            Some(58.0),
            None,
        )]);
        let records: Vec<Vec<String>> = dataset.combined_table().records().collect();
        assert_eq!(
            records,
            vec![vec![
                "2014-04-01".to_string(),
                "1am".to_string(),
                "North".to_string(),
                "58".to_string(),
                MISSING_CELL.to_string(),
            ]]
        );
        assert_eq!(
            dataset.combined_table().header(),
            vec!["date", "hour", "region", "PSI", "PM2.5"]
        );
    }
}
