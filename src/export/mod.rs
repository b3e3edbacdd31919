// src/export/mod.rs
//
// Writers for the assembler's two projections: one combined CSV, one CSV per
// date, an optional ZIP bundle of the per-date files, and a JSON run report
// of the issue ledger. Column order and the missing-cell representation come
// from `process::assemble`.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use csv::WriterBuilder;
use tracing::info;
use zip::write::FileOptions;
use zip::CompressionMethod;

use crate::drive::DateIssue;
use crate::process::assemble::{Dataset, TableView};

/// Write the combined table as a single CSV file.
pub fn write_combined_csv(dataset: &Dataset, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    write_table_csv(&dataset.combined_table(), path)?;
    info!(rows = dataset.len(), path = %path.display(), "wrote combined table");
    Ok(())
}

/// Write one `YYYY-MM-DD.csv` per date under `dir`.
/// Returns the written paths in date order.
pub fn write_partition_csvs(dataset: &Dataset, dir: impl AsRef<Path>) -> Result<Vec<PathBuf>> {
    let dir = dir.as_ref();
    fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;

    let mut paths = Vec::with_capacity(dataset.dates().len());
    for part in dataset.date_partitions() {
        let path = dir.join(format!("{}.csv", part.date));
        write_table_csv(&part.table, &path)?;
        paths.push(path);
    }
    info!(files = paths.len(), dir = %dir.display(), "wrote per-date tables");
    Ok(paths)
}

/// Bundle every per-date table into one ZIP archive.
pub fn bundle_partitions(dataset: &Dataset, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    let mut archive = zip::ZipWriter::new(file);
    let options: FileOptions<'_, ()> =
        FileOptions::default().compression_method(CompressionMethod::Deflated);

    for part in dataset.date_partitions() {
        archive
            .start_file(format!("{}.csv", part.date), options.clone())
            .with_context(|| format!("starting bundle entry for {}", part.date))?;
        archive.write_all(&table_csv_bytes(&part.table)?)?;
    }
    archive.finish().context("finalizing bundle")?;
    info!(path = %path.display(), "wrote per-date bundle");
    Ok(())
}

/// Persist the issue ledger as pretty JSON. An empty array marks a clean run.
pub fn write_run_report(issues: &[DateIssue], path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let json = serde_json::to_string_pretty(issues).context("serializing run report")?;
    fs::write(path, json).with_context(|| format!("writing {}", path.display()))?;
    info!(issues = issues.len(), path = %path.display(), "wrote run report");
    Ok(())
}

fn write_table_csv(table: &TableView<'_>, path: &Path) -> Result<()> {
    let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    let mut writer = WriterBuilder::new().from_writer(file);
    writer.write_record(table.header())?;
    for record in table.records() {
        writer.write_record(&record)?;
    }
    writer.flush()?;
    Ok(())
}

fn table_csv_bytes(table: &TableView<'_>) -> Result<Vec<u8>> {
    let mut writer = WriterBuilder::new().from_writer(Vec::new());
    writer.write_record(table.header())?;
    for record in table.records() {
        writer.write_record(&record)?;
    }
    writer
        .into_inner()
        .map_err(|e| anyhow::Error::from(e.into_error()))
}
