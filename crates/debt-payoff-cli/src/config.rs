//! CLI configuration

use serde::Deserialize;

use debt_payoff_core::calendar::{FixedClock, MonthClock, SystemClock, YearMonth};

/// Settings read from `DPC_*` environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct CliConfig {
    /// Fallback log filter when `RUST_LOG` is unset
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Pins "this month" as `YYYY-MM`
    #[serde(default)]
    pub this_month: Option<String>,
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            this_month: None,
        }
    }
}

impl CliConfig {
    /// Loads configuration from environment
    pub fn from_env() -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(config::Environment::with_prefix("DPC"))
            .build()?
            .try_deserialize()
    }

    /// Clock pinned to `DPC_THIS_MONTH` when set, else the system clock.
    pub fn clock(&self) -> Result<Box<dyn MonthClock>, Box<dyn std::error::Error>> {
        match self.this_month.as_deref() {
            Some(raw) => {
                let month: YearMonth = raw
                    .parse()
                    .map_err(|e| format!("DPC_THIS_MONTH: {e}"))?;
                Ok(Box::new(FixedClock(month)))
            }
            None => Ok(Box::new(SystemClock)),
        }
    }
}
