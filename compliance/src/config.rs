//! IPS limit configuration.

use serde::{Deserialize, Serialize};

/// Investment Policy Statement limits.
///
/// Weights, exposures, drawdown and cash are percentages (0–100).
/// Volatility bounds are fractions, matching
/// [`vertex::metrics::volatility`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IpsLimits {
    /// Max weight of any single security.
    pub max_single_security: f64,
    /// Max summed weight of any sector.
    pub max_sector: f64,
    /// Max summed weight of any region.
    pub max_region: f64,
    /// Max weighted fixed-income duration (years).
    pub max_duration: f64,
    /// Lower bound of the volatility target band.
    pub min_volatility: f64,
    /// Upper bound of the volatility target band.
    pub max_volatility: f64,
    /// Max drawdown.
    pub max_drawdown: f64,
    /// Cash buffer floor.
    pub min_cash: f64,
    /// Cash buffer ceiling.
    pub max_cash: f64,
    /// Max days to liquidate 80% of the portfolio.
    pub max_days_to_liquidate: f64,
    /// Max sum of absolute tactical deviations.
    pub max_tactical_deviation: f64,
}

impl IpsLimits {
    /// Validate the limits. Returns `Err` with a description if any field is nonsensical.
    pub fn validate(&self) -> Result<(), String> {
        let percents = [
            ("max_single_security", self.max_single_security),
            ("max_sector", self.max_sector),
            ("max_region", self.max_region),
            ("max_drawdown", self.max_drawdown),
            ("min_cash", self.min_cash),
            ("max_cash", self.max_cash),
            ("max_tactical_deviation", self.max_tactical_deviation),
        ];
        for (name, value) in percents {
            if !value.is_finite() || !(0.0..=100.0).contains(&value) {
                return Err(format!("{name} must be in [0, 100], got {value}"));
            }
        }
        if !self.max_duration.is_finite() || self.max_duration < 0.0 {
            return Err(format!(
                "max_duration must be >= 0 and finite, got {}",
                self.max_duration
            ));
        }
        if !self.max_days_to_liquidate.is_finite() || self.max_days_to_liquidate < 0.0 {
            return Err(format!(
                "max_days_to_liquidate must be >= 0 and finite, got {}",
                self.max_days_to_liquidate
            ));
        }
        if !self.min_volatility.is_finite()
            || !self.max_volatility.is_finite()
            || self.min_volatility < 0.0
            || self.min_volatility > self.max_volatility
        {
            return Err(format!(
                "volatility band must satisfy 0 <= min <= max, got [{}, {}]",
                self.min_volatility, self.max_volatility
            ));
        }
        if self.min_cash > self.max_cash {
            return Err(format!(
                "cash band must satisfy min <= max, got [{}, {}]",
                self.min_cash, self.max_cash
            ));
        }
        Ok(())
    }
}

impl Default for IpsLimits {
    fn default() -> Self {
        Self {
            max_single_security: 10.0,
            max_sector: 25.0,
            max_region: 10.0,
            max_duration: 2.0,
            min_volatility: 0.05,
            max_volatility: 0.07,
            max_drawdown: 5.0,
            min_cash: 10.0,
            max_cash: 15.0,
            max_days_to_liquidate: 30.0,
            max_tactical_deviation: 5.0,
        }
    }
}

/// Where the "Single Sector Exposure" risk metric takes its value from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectorMetricSource {
    /// The largest sector bucket.
    #[default]
    LargestSector,
    /// The largest single security, as older reports computed it.
    LargestSecurity,
}
