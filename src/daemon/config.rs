use std::time::Duration;

use anyhow::{bail, Result};

pub const DEFAULT_UNIT_SECONDS: u64 = 10 * 60;
pub const DEFAULT_TICK_SECONDS: u64 = 20;

/// Settings of the accumulation loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccumulatorConfig {
    /// Amount of elapsed time that counts as one activity unit.
    pub unit: Duration,
    /// How often elapsed time is converted and persisted.
    pub tick_interval: Duration,
}

impl AccumulatorConfig {
    pub fn from_seconds(unit_seconds: u64, tick_seconds: u64) -> Result<Self> {
        if unit_seconds == 0 {
            bail!("Activity unit must be at least 1 second long");
        }
        if tick_seconds == 0 {
            bail!("Tick interval must be at least 1 second long");
        }
        Ok(Self {
            unit: Duration::from_secs(unit_seconds),
            tick_interval: Duration::from_secs(tick_seconds),
        })
    }
}

impl Default for AccumulatorConfig {
    fn default() -> Self {
        Self {
            unit: Duration::from_secs(DEFAULT_UNIT_SECONDS),
            tick_interval: Duration::from_secs(DEFAULT_TICK_SECONDS),
        }
    }
}
