use std::env;

#[derive(Debug, Clone)]
pub struct Config {
    /// Service name stamped on generated records and the report.
    pub service: String,

    /// Scenario used when none is given on the command line.
    pub default_scenario: String,

    /// Seed used when none is given (or when the given one is not a number).
    pub default_seed: u64,
}

impl Config {
    pub fn from_env() -> Self {
        Config {
            service: env::var("SERVICE_NAME").unwrap_or_else(|_| "payments-api".to_string()),

            default_scenario: env::var("SCENARIO").unwrap_or_else(|_| "mixed".to_string()),

            default_seed: env::var("SEED")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(42),
        }
    }

    pub fn log_config(&self) {
        tracing::info!("Configuration:");
        tracing::info!("   Service: {}", self.service);
        tracing::info!("   Default scenario: {}", self.default_scenario);
        tracing::info!("   Default seed: {}", self.default_seed);
    }
}
