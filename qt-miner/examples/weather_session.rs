//! Clusters a small weather table, saves the result and loads it back.
//!
//! Run with `RUST_LOG=qt_miner=debug` to watch the engine's run states.

use qt_miner::data::{ColumnSpec, Dataset};
use qt_miner::formatters::JsonFormatter;
use qt_miner::logging::setup::{init_logging, LoggingConfig};
use qt_miner::repository::FileSystemStorage;
use qt_miner::session::Session;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging(LoggingConfig::development())?;

    let data = Dataset::builder(vec![
        ColumnSpec::categorical("outlook"),
        ColumnSpec::numeric("temperature"),
        ColumnSpec::categorical("humidity"),
    ])
    .row(vec!["sunny".into(), 30.0.into(), "high".into()])
    .row(vec!["sunny".into(), 27.0.into(), "high".into()])
    .row(vec!["overcast".into(), 28.0.into(), "high".into()])
    .row(vec!["rain".into(), 12.0.into(), "normal".into()])
    .row(vec!["rain".into(), 11.0.into(), "normal".into()])
    .row(vec!["overcast".into(), 10.0.into(), "normal".into()])
    .distinct_rows(true)
    .build()?;
    println!("{data}");

    let dir = tempfile::tempdir()?;
    let mut session = Session::new(FileSystemStorage::new(dir.path())?);
    session.store_table("weather", data);

    let report = session.learn(0.5)?;
    println!("{} clusters\n{}", report.cluster_count, report.rendering);
    println!("{}", session.report_with(&JsonFormatter::new())?);

    session.save_last("weather_r05").await?;
    println!("Reloaded:\n{}", session.load("weather_r05").await?);
    Ok(())
}
