use anyhow::{Context, Result};
use hazescraper::{
    config::{OutputTarget, ScrapeConfig},
    drive, export,
    fetch::HazeClient,
    process::assemble,
};
use std::fs;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    // ─── 1) init logging ─────────────────────────────────────────────
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder().with_env_filter(env).init();
    info!("startup");

    // ─── 2) load config ──────────────────────────────────────────────
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "config.yaml".to_string());
    let cfg = ScrapeConfig::load(&config_path)?;
    info!(start = %cfg.start_date, end = %cfg.end_date, "configured range");
    fs::create_dir_all(&cfg.out_dir)
        .with_context(|| format!("creating {}", cfg.out_dir.display()))?;

    // ─── 3) scrape the range ─────────────────────────────────────────
    let client = HazeClient::new().context("building HTTP client")?;
    let report = drive::run(cfg.start_date, cfg.end_date, cfg.request_delay(), &client).await?;
    info!(
        rows = report.readings.len(),
        issues = report.issues.len(),
        "scrape finished"
    );

    // ─── 4) assemble ─────────────────────────────────────────────────
    let issues = report.issues;
    let dataset = assemble::assemble(report.readings);
    info!(
        rows = dataset.len(),
        dates = dataset.dates().len(),
        "assembled dataset"
    );

    // ─── 5) export ───────────────────────────────────────────────────
    if cfg.wants(OutputTarget::CombinedTable) {
        export::write_combined_csv(&dataset, cfg.out_dir.join("combined.csv"))?;
    }
    if cfg.wants(OutputTarget::PerDatePartitions) {
        export::write_partition_csvs(&dataset, cfg.out_dir.join("daily"))?;
        if cfg.bundle_daily {
            export::bundle_partitions(&dataset, cfg.out_dir.join("daily.zip"))?;
        }
    }
    export::write_run_report(&issues, cfg.out_dir.join("run_report.json"))?;

    info!("all done");
    Ok(())
}
