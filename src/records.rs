//! Table rows held by the snapshot: risk metrics, liquidity, performance,
//! and compliance checks.
//!
//! These are display records. Their status fields are produced by the
//! compliance evaluator and stored as-is.

use crate::types::{LiquidityStatus, MetricStatus};

/// A row of the risk-metric table.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "camelCase")
)]
pub struct RiskMetric {
    pub metric: String,
    pub ips_limit: String,
    pub current_value: String,
    pub status: MetricStatus,
    pub action_required: String,
}

impl RiskMetric {
    /// A compliant row with a placeholder value.
    pub fn placeholder(metric: &str, ips_limit: &str) -> Self {
        Self {
            metric: metric.into(),
            ips_limit: ips_limit.into(),
            current_value: "—".into(),
            status: MetricStatus::Compliant,
            action_required: "None".into(),
        }
    }
}

/// A liquidity line item (cash buffer, time to liquidate, spreads).
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "camelCase")
)]
pub struct LiquidityItem {
    pub item: String,
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub minimum: Option<f64>,
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub maximum: Option<f64>,
    pub current: f64,
    pub status: LiquidityStatus,
    pub action_needed: String,
}

impl LiquidityItem {
    /// Item name for the cash buffer.
    pub const CASH: &'static str = "Cash & Cash Equivalents";
    /// Item name for the liquidation horizon (days).
    pub const TIME_TO_LIQUIDATE: &'static str = "Time to Liquidate 80% Portfolio";
    /// Item name for the spread/volume indicator.
    pub const BID_ASK_SPREAD: &'static str = "Bid-Ask Spread / Daily Volume";

    /// Default liquidity table: cash band 10–15%, 30-day horizon, spreads.
    pub fn defaults() -> Vec<LiquidityItem> {
        vec![
            LiquidityItem {
                item: Self::CASH.into(),
                minimum: Some(10.0),
                maximum: Some(15.0),
                current: 0.0,
                status: LiquidityStatus::Adequate,
                action_needed: "Monitor".into(),
            },
            LiquidityItem {
                item: Self::TIME_TO_LIQUIDATE.into(),
                minimum: None,
                maximum: Some(30.0),
                current: 0.0,
                status: LiquidityStatus::Adequate,
                action_needed: "Track daily volume".into(),
            },
            LiquidityItem {
                item: Self::BID_ASK_SPREAD.into(),
                minimum: None,
                maximum: None,
                current: 0.0,
                status: LiquidityStatus::Adequate,
                action_needed: "Monitor spreads".into(),
            },
        ]
    }
}

/// A row of the performance table. All fields are display strings.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "camelCase")
)]
pub struct PerformanceMetric {
    pub metric: String,
    pub target: String,
    pub current: String,
    pub deviation: String,
    pub notes: String,
}

impl PerformanceMetric {
    fn pending(metric: &str, target: &str, notes: &str) -> Self {
        Self {
            metric: metric.into(),
            target: target.into(),
            current: "—".into(),
            deviation: "—".into(),
            notes: notes.into(),
        }
    }

    /// Default performance table.
    pub fn defaults() -> Vec<PerformanceMetric> {
        vec![
            Self::pending("Total Portfolio Return", "2–3%", "Quarterly target"),
            Self::pending("Asset Class Returns", "TBD", "Track individually"),
            Self::pending("Benchmark-relative Return", "Positive", "vs composite index"),
            Self::pending(
                "Risk-adjusted Metrics (Sharpe, Sortino, etc.)",
                "Positive",
                "Monitor post-period",
            ),
        ]
    }
}

/// A row of the compliance-check table.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "camelCase")
)]
pub struct ComplianceCheck {
    pub area: String,
    pub ips_limit: String,
    pub current_status: MetricStatus,
    pub breach: bool,
    pub action_required: String,
}

impl ComplianceCheck {
    /// A passing check.
    pub fn passing(area: &str, ips_limit: &str) -> Self {
        Self {
            area: area.into(),
            ips_limit: ips_limit.into(),
            current_status: MetricStatus::Compliant,
            breach: false,
            action_required: "None".into(),
        }
    }
}
