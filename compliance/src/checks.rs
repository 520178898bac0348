//! Individual IPS check implementations.

use rustc_hash::FxHashMap;
use vertex::exposure::{self, Exposures};
use vertex::{
    ComplianceCheck, LiquidityItem, LiquidityStatus, MetricStatus, RiskMetric, RiskStatistics,
    Security, TacticalAdjustment,
};

use crate::config::{IpsLimits, SectorMetricSource};
use crate::report::{ComplianceReport, TacticalLimit};

/// Format a limit for display: at most two decimals, no trailing zeros.
fn num(value: f64) -> String {
    let rounded = (value * 100.0).round() / 100.0;
    format!("{rounded}")
}

/// `"None"` when compliant, otherwise `action`.
fn action_if(breached: bool, action: impl Into<String>) -> String {
    if breached {
        action.into()
    } else {
        "None".into()
    }
}

fn single_security_breach(securities: &[Security], limit: f64) -> Option<String> {
    let oversized: Vec<String> = securities
        .iter()
        .filter(|s| s.current_weight() > limit)
        .map(|s| format!("{} ({:.2}%)", s.ticker, s.current_weight()))
        .collect();

    if oversized.is_empty() {
        None
    } else {
        Some(format!(
            "Single security limit breached: {}",
            oversized.join(", ")
        ))
    }
}

fn bucket_breach(rule: &str, exposures: &Exposures, limit: f64) -> Option<String> {
    let oversized: Vec<String> = exposures
        .above(limit)
        .map(|(label, weight)| format!("{label} ({weight:.2}%)"))
        .collect();

    if oversized.is_empty() {
        None
    } else {
        Some(format!("{rule} limit breached: {}", oversized.join(", ")))
    }
}

/// Check securities against the single-security, sector and regional limits.
///
/// Every rule runs; a breach in one never hides another.
pub fn evaluate_security_compliance(securities: &[Security], limits: &IpsLimits) -> ComplianceReport {
    let mut breaches = Vec::new();

    breaches.extend(single_security_breach(
        securities,
        limits.max_single_security,
    ));
    breaches.extend(bucket_breach(
        "Sector",
        &exposure::sector_exposures(securities),
        limits.max_sector,
    ));
    breaches.extend(bucket_breach(
        "Regional",
        &exposure::geographic_exposures(securities),
        limits.max_region,
    ));

    ComplianceReport::from_breaches(breaches)
}

/// [`evaluate_security_compliance`] with the default IPS limits (10 / 25 / 10).
pub fn check_security_compliance(securities: &[Security]) -> ComplianceReport {
    evaluate_security_compliance(securities, &IpsLimits::default())
}

/// Build the seven-row risk-metric table.
pub fn evaluate_risk_metrics(
    securities: &[Security],
    stats: &RiskStatistics,
    limits: &IpsLimits,
    sector_source: SectorMetricSource,
) -> Vec<RiskMetric> {
    let max_security = stats.max_single_security;
    let max_sector = match sector_source {
        SectorMetricSource::LargestSector => exposure::sector_exposures(securities)
            .largest()
            .map_or(0.0, |(_, w)| w),
        SectorMetricSource::LargestSecurity => max_security,
    };
    let largest_region = exposure::geographic_exposures(securities)
        .largest()
        .map(|(label, w)| (label.to_string(), w));
    let max_region = largest_region.as_ref().map_or(0.0, |(_, w)| *w);

    let security_breach = max_security > limits.max_single_security;
    let sector_breach = max_sector > limits.max_sector;
    let region_breach = max_region > limits.max_region;
    let duration_high = stats.weighted_duration > limits.max_duration;
    let vol_in_band =
        stats.volatility >= limits.min_volatility && stats.volatility <= limits.max_volatility;
    let drawdown_breach = stats.max_drawdown > limits.max_drawdown;

    let breach_status = |breached: bool| {
        if breached {
            MetricStatus::Breach
        } else {
            MetricStatus::Compliant
        }
    };
    let warning_status = |warned: bool| {
        if warned {
            MetricStatus::Warning
        } else {
            MetricStatus::Compliant
        }
    };

    vec![
        RiskMetric {
            metric: "Single Security Exposure".into(),
            ips_limit: format!("≤{}%", num(limits.max_single_security)),
            current_value: format!("{max_security:.2}%"),
            status: breach_status(security_breach),
            action_required: action_if(
                security_breach,
                format!(
                    "Reduce largest position to below {}% (currently {max_security:.2}%)",
                    num(limits.max_single_security)
                ),
            ),
        },
        RiskMetric {
            metric: "Single Sector Exposure".into(),
            ips_limit: format!("≤{}%", num(limits.max_sector)),
            current_value: format!("{max_sector:.2}%"),
            status: breach_status(sector_breach),
            action_required: action_if(sector_breach, "Review sector concentrations"),
        },
        RiskMetric {
            metric: "Regional Allocation".into(),
            ips_limit: format!("≤{}%", num(limits.max_region)),
            current_value: format!("{max_region:.2}%"),
            status: breach_status(region_breach),
            action_required: action_if(
                region_breach,
                format!(
                    "Reduce {} exposure below {}%",
                    largest_region.as_ref().map_or("", |(l, _)| l.as_str()),
                    num(limits.max_region)
                ),
            ),
        },
        RiskMetric {
            metric: "Weighted Portfolio Duration".into(),
            ips_limit: format!("≤{} yrs", num(limits.max_duration)),
            current_value: format!("{:.2} yrs", stats.weighted_duration),
            status: warning_status(duration_high),
            action_required: action_if(duration_high, "Reduce fixed income duration"),
        },
        RiskMetric {
            metric: "Portfolio Volatility".into(),
            ips_limit: format!(
                "{}–{}% ann.",
                num(limits.min_volatility * 100.0),
                num(limits.max_volatility * 100.0)
            ),
            current_value: format!("{:.2}%", stats.volatility * 100.0),
            status: warning_status(!vol_in_band),
            action_required: action_if(
                stats.volatility > limits.max_volatility,
                "Review portfolio risk allocation",
            ),
        },
        RiskMetric {
            metric: "Drawdown Limit".into(),
            ips_limit: format!("≤{}%", num(limits.max_drawdown)),
            current_value: format!("{:.2}%", stats.max_drawdown),
            status: breach_status(drawdown_breach),
            action_required: action_if(drawdown_breach, "Rebalance to reduce downside risk"),
        },
        RiskMetric {
            metric: "Credit Rating Compliance".into(),
            ips_limit: "≥Investment Grade".into(),
            current_value: "Check credit ratings".into(),
            status: MetricStatus::Compliant,
            action_required: "None".into(),
        },
    ]
}

/// Re-derive status and action of a known liquidity item from its current value.
///
/// Returns `false` for items without a rule; those are left untouched.
pub fn classify_liquidity(item: &mut LiquidityItem, limits: &IpsLimits) -> bool {
    let (status, action) = match item.item.as_str() {
        LiquidityItem::CASH => {
            if item.current < limits.min_cash {
                (
                    LiquidityStatus::Critical,
                    format!(
                        "Raise cash immediately - Below {}% minimum",
                        num(limits.min_cash)
                    ),
                )
            } else if item.current > limits.max_cash {
                (
                    LiquidityStatus::Warning,
                    "Excess cash - Consider deploying".to_string(),
                )
            } else {
                (LiquidityStatus::Adequate, "None - Within range".to_string())
            }
        }
        LiquidityItem::TIME_TO_LIQUIDATE => {
            if item.current <= limits.max_days_to_liquidate {
                (
                    LiquidityStatus::Adequate,
                    format!("None - Within {} days", num(limits.max_days_to_liquidate)),
                )
            } else {
                (
                    LiquidityStatus::Warning,
                    "Liquidity concern - Portfolio too concentrated".to_string(),
                )
            }
        }
        _ => return false,
    };

    item.status = status;
    item.action_needed = action;
    true
}

/// Apply [`classify_liquidity`] to every item.
pub fn refresh_liquidity(items: &mut [LiquidityItem], limits: &IpsLimits) {
    for item in items.iter_mut() {
        classify_liquidity(item, limits);
    }
}

/// Sum of absolute tactical deviations against the limit (inclusive).
pub fn check_tactical_limit(adjustments: &[TacticalAdjustment], limit: f64) -> TacticalLimit {
    let total_deviation = vertex::tactical::total_tactical_deviation(adjustments);
    TacticalLimit {
        total_deviation,
        limit,
        within_limit: total_deviation <= limit,
    }
}

/// Compliance-check areas fed by a risk-metric row.
const CHECK_SOURCES: &[(&str, &str)] = &[
    ("Single Security Limit", "Single Security Exposure"),
    ("Single Sector Limit", "Single Sector Exposure"),
    ("Regional Allocation Limit", "Regional Allocation"),
    ("Drawdown Limit", "Drawdown Limit"),
    ("Prohibited Instruments", ""),
    ("Credit Rating Compliance", "Credit Rating Compliance"),
];

/// Build the compliance-check table from the risk-metric table.
///
/// Areas backed by a metric take its limit, status and action. Manually
/// maintained rows in `existing` (prohibited instruments, or any area not
/// listed here) are carried over unchanged.
pub fn compliance_checks(metrics: &[RiskMetric], existing: &[ComplianceCheck]) -> Vec<ComplianceCheck> {
    let by_metric: FxHashMap<&str, &RiskMetric> =
        metrics.iter().map(|m| (m.metric.as_str(), m)).collect();
    let by_area: FxHashMap<&str, &ComplianceCheck> =
        existing.iter().map(|c| (c.area.as_str(), c)).collect();

    let mut checks: Vec<ComplianceCheck> = CHECK_SOURCES
        .iter()
        .map(|&(area, metric)| match by_metric.get(metric) {
            Some(m) => ComplianceCheck {
                area: area.into(),
                ips_limit: m.ips_limit.clone(),
                current_status: m.status,
                breach: m.status == MetricStatus::Breach,
                action_required: m.action_required.clone(),
            },
            None => by_area
                .get(area)
                .map(|&c| c.clone())
                .unwrap_or_else(|| ComplianceCheck::passing(area, "None")),
        })
        .collect();

    checks.extend(
        existing
            .iter()
            .filter(|c| !CHECK_SOURCES.iter().any(|&(area, _)| area == c.area))
            .cloned(),
    );
    checks
}
