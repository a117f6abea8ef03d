/// Demo CLI: synthesize a burst of error logs for a scenario and print the
/// incident report as JSON.
///
/// Usage:
///   incident-report [scenario] [seed]
///
/// A seed that does not parse falls back to the configured default so the
/// demo keeps producing stable output.
use anyhow::Result;
use tracing::info;

use incident_analyzer::config::Config;
use incident_analyzer::log_source::make_logs;
use incident_analyzer::report::{analyze, default_clusterer};

fn main() -> Result<()> {
    // JSON goes to stdout; keep diagnostics on stderr.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .init();

    let config = Config::from_env();
    config.log_config();

    let mut args = std::env::args().skip(1);
    let scenario = args.next().unwrap_or_else(|| config.default_scenario.clone());
    let seed = args
        .next()
        .and_then(|s| s.parse().ok())
        .unwrap_or(config.default_seed);

    info!("generating logs: scenario={}, seed={}", scenario, seed);
    let records = make_logs(&scenario, seed, &config.service);

    let clusterer = default_clusterer();
    let report = analyze(&config.service, &scenario, seed, &records, &clusterer)?;

    println!("{}", serde_json::to_string(&report)?);
    Ok(())
}
