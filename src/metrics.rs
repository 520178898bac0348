//! Risk statistics over a return series and the security list.
//!
//! Return-based metrics take an ordered slice of period returns expressed
//! as fractions (e.g., `[0.01, -0.005, 0.02]`). Nothing is annualized.
//!
//! Two formulas intentionally depart from textbook definitions and are kept
//! for output compatibility with existing reports:
//!
//! - [`sortino_ratio`] divides the downside sum of squares by the *full*
//!   series length, not by the number of downside observations.
//! - [`max_drawdown`] reads its input as a cumulative value series (running
//!   peak, drawdown relative to peak level). Feeding it raw period returns
//!   gives a number, but not a meaningful drawdown.

use rustc_hash::FxHashMap;

use crate::exposure;
use crate::security::Security;
use crate::types::{AssetClass, RiskLevel};

/// Risk-free rate per period used when none is given.
pub const DEFAULT_RISK_FREE_RATE: f64 = 0.05;

/// Duration (years) for fixed-income instruments without a table entry.
pub const DEFAULT_DURATION_YEARS: f64 = 1.5;

/// Duration estimates (years) by instrument label.
const DURATION_TABLE: &[(&str, f64)] = &[
    ("T-Bill", 0.25),
    ("Bond", 2.5),
    ("Government Bond", 3.0),
    ("Corporate Bond", 2.5),
];

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

/// Population standard deviation of returns. Zero with fewer than 2 observations.
pub fn volatility(returns: &[f64]) -> f64 {
    if returns.len() < 2 {
        return 0.0;
    }
    let m = mean(returns);
    let variance = returns.iter().map(|&r| (r - m).powi(2)).sum::<f64>() / returns.len() as f64;
    variance.sqrt()
}

/// Sharpe ratio: `(mean - risk_free) / volatility`.
///
/// Zero for an empty series or zero volatility.
pub fn sharpe_ratio(returns: &[f64], risk_free: f64) -> f64 {
    if returns.is_empty() {
        return 0.0;
    }
    let vol = volatility(returns);
    if vol == 0.0 {
        return 0.0;
    }
    (mean(returns) - risk_free) / vol
}

/// Sortino ratio: `(mean - risk_free) / downside_deviation`.
///
/// Downside deviation is `sqrt(Σ (r - rf)² / n)` over returns below
/// `risk_free`, with `n` the full series length. Zero with fewer than 2
/// observations or no downside.
pub fn sortino_ratio(returns: &[f64], risk_free: f64) -> f64 {
    if returns.len() < 2 {
        return 0.0;
    }

    let downside_sum: f64 = returns
        .iter()
        .filter(|&&r| r < risk_free)
        .map(|&r| (r - risk_free).powi(2))
        .sum();
    let downside_dev = (downside_sum / returns.len() as f64).sqrt();

    if downside_dev == 0.0 {
        return 0.0;
    }
    (mean(returns) - risk_free) / downside_dev
}

/// Maximum drawdown of a value series, in percent of the running peak.
///
/// The peak starts at the first value. Points where the ratio is not finite
/// (a zero peak) are skipped. Zero for an empty series.
pub fn max_drawdown(series: &[f64]) -> f64 {
    let Some(&first) = series.first() else {
        return 0.0;
    };

    let mut peak = first;
    let mut max_dd = 0.0_f64;

    for &value in series {
        if value > peak {
            peak = value;
        }
        let dd = (peak - value) / peak;
        if dd.is_finite() && dd > max_dd {
            max_dd = dd;
        }
    }

    max_dd * 100.0
}

/// Duration estimate for an instrument label (exact, case-insensitive match).
pub fn instrument_duration(label: &str) -> f64 {
    let label = label.trim();
    DURATION_TABLE
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(label))
        .map(|&(_, years)| years)
        .unwrap_or(DEFAULT_DURATION_YEARS)
}

/// Weight-normalized duration of the fixed-income holdings (years).
///
/// Each holding's duration comes from its instrument label, or its ticker
/// when the label is empty. Zero without fixed-income weight.
pub fn weighted_duration(securities: &[Security]) -> f64 {
    let (weighted, total) = securities
        .iter()
        .filter(|s| s.asset_class == AssetClass::FixedIncome)
        .fold((0.0_f64, 0.0_f64), |(weighted, total), s| {
            let label = if s.instrument.is_empty() {
                &s.ticker
            } else {
                &s.instrument
            };
            let w = s.current_weight() / 100.0;
            (weighted + w * instrument_duration(label), total + w)
        });

    if total > 0.0 { weighted / total } else { 0.0 }
}

/// Weight-normalized portfolio beta.
///
/// `betas` maps tickers to betas; unknown tickers count as 1.0. Returns 1.0
/// for an empty list or zero total weight.
pub fn portfolio_beta(securities: &[Security], betas: &[(&str, f64)]) -> f64 {
    let beta_map: FxHashMap<&str, f64> = betas.iter().copied().collect();

    let (weighted, total) = securities
        .iter()
        .fold((0.0_f64, 0.0_f64), |(weighted, total), s| {
            let beta = beta_map.get(s.ticker.as_str()).copied().unwrap_or(1.0);
            let w = s.current_weight();
            (weighted + w * beta, total + w)
        });

    if total > 0.0 { weighted / total } else { 1.0 }
}

/// Heuristic risk score behind [`risk_assessment`].
///
/// `(0.4·volatility + 0.3·drawdown + 0.2·concentration + 0.1·(beta − 1)·100) / 100`.
/// Policy weights, not a calibrated model.
pub fn risk_score(volatility: f64, drawdown: f64, concentration: f64, beta: f64) -> f64 {
    (volatility * 0.4 + drawdown * 0.3 + concentration * 0.2 + (beta - 1.0) * 100.0 * 0.1) / 100.0
}

/// Classify the portfolio as Low (< 0.05), Medium (< 0.08) or High risk.
pub fn risk_assessment(volatility: f64, drawdown: f64, concentration: f64, beta: f64) -> RiskLevel {
    let score = risk_score(volatility, drawdown, concentration, beta);
    if score < 0.05 {
        RiskLevel::Low
    } else if score < 0.08 {
        RiskLevel::Medium
    } else {
        RiskLevel::High
    }
}

/// `Σ weight·value / Σ weight` over `(weight, value)` pairs. Zero when weights sum to 0.
pub fn weighted_average(items: &[(f64, f64)]) -> f64 {
    let total: f64 = items.iter().map(|(w, _)| w).sum();
    if total == 0.0 {
        return 0.0;
    }
    items.iter().map(|(w, v)| w * v).sum::<f64>() / total
}

/// All risk statistics for one snapshot.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize),
    serde(rename_all = "camelCase")
)]
pub struct RiskStatistics {
    /// Population std-dev of returns (fraction).
    pub volatility: f64,
    pub sharpe: f64,
    pub sortino: f64,
    /// Maximum drawdown (percent).
    pub max_drawdown: f64,
    /// Fixed-income duration (years).
    pub weighted_duration: f64,
    pub beta: f64,
    /// Largest single weight (percent).
    pub max_single_security: f64,
    pub risk_level: RiskLevel,
    /// Number of return observations.
    pub num_periods: usize,
}

impl RiskStatistics {
    /// Compute every statistic from securities and a return series.
    pub fn compute(
        securities: &[Security],
        returns: &[f64],
        betas: &[(&str, f64)],
        risk_free: f64,
    ) -> Self {
        let volatility = volatility(returns);
        let max_drawdown = max_drawdown(returns);
        let beta = portfolio_beta(securities, betas);
        let max_single_security = exposure::concentration(securities).max_single_security;

        Self {
            volatility,
            sharpe: sharpe_ratio(returns, risk_free),
            sortino: sortino_ratio(returns, risk_free),
            max_drawdown,
            weighted_duration: weighted_duration(securities),
            beta,
            max_single_security,
            risk_level: risk_assessment(volatility, max_drawdown, max_single_security, beta),
            num_periods: returns.len(),
        }
    }
}

impl std::fmt::Display for RiskStatistics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Risk Statistics")?;
        writeln!(f, "  Volatility:      {:>8.2}%", self.volatility * 100.0)?;
        writeln!(f, "  Sharpe:          {:>8.2}", self.sharpe)?;
        writeln!(f, "  Sortino:         {:>8.2}", self.sortino)?;
        writeln!(f, "  Max drawdown:    {:>8.2}%", self.max_drawdown)?;
        writeln!(f, "  Duration:        {:>8.2} yrs", self.weighted_duration)?;
        writeln!(f, "  Beta:            {:>8.2}", self.beta)?;
        writeln!(f, "  Largest holding: {:>8.2}%", self.max_single_security)?;
        writeln!(
            f,
            "  Risk level:      {:>8}  ({} periods)",
            self.risk_level, self.num_periods
        )
    }
}
