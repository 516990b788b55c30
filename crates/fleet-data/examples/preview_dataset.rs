//! Example: Generate the small smoke-test dataset and print it as JSON.
//!
//! No database needed. Useful for eyeballing the generated rows:
//! - 4 vehicles (one per class), 2 drivers, 2 routes
//! - 10 trips with 40 deliveries between them
//! - 2 maintenance records
//!
//! Run with:
//! ```
//! cargo run -p fleet-data --example preview_dataset [seed]
//! ```

use fleet_data::builders::ScenarioBuilder;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let seed = match std::env::args().nth(1) {
        Some(arg) => arg.parse()?,
        None => 42,
    };

    let result = ScenarioBuilder::smoke_test()
        .with_seed(seed)
        .with_metrics(true)
        .build_data()?;

    if let Some(metrics) = &result.metrics {
        tracing::info!(
            "Generated {} rows in {} ms",
            metrics.total_rows,
            metrics.generation_time_ms
        );
    }

    println!("{}", serde_json::to_string_pretty(&result.dataset)?);

    Ok(())
}
