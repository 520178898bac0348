//! IPS compliance engine for vertex portfolios.
//!
//! Applies Investment Policy Statement limits to a [`PortfolioSnapshot`]:
//! security, sector and regional concentration, duration, volatility,
//! drawdown, liquidity bands and the tactical deviation budget.

pub mod checks;
pub mod config;
pub mod report;

pub use checks::{
    check_security_compliance, check_tactical_limit, classify_liquidity, compliance_checks,
    evaluate_risk_metrics, evaluate_security_compliance, refresh_liquidity,
};
pub use config::{IpsLimits, SectorMetricSource};
pub use report::{ComplianceReport, TacticalLimit};

use serde::Serialize;
use vertex::metrics::DEFAULT_RISK_FREE_RATE;
use vertex::{
    ComplianceCheck, ExposureSummary, LiquidityItem, LiquidityStatus, MetricStatus,
    PortfolioSnapshot, ReconcileReport, RiskMetric, RiskStatistics,
};

/// Everything derived from one snapshot.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Evaluation {
    pub report: ComplianceReport,
    pub exposures: ExposureSummary,
    pub statistics: RiskStatistics,
    pub risk_metrics: Vec<RiskMetric>,
    pub liquidity: Vec<LiquidityItem>,
    pub compliance_checks: Vec<ComplianceCheck>,
    pub tactical: TacticalLimit,
    pub allocations: ReconcileReport,
}

impl Evaluation {
    /// Number of risk-metric rows in breach.
    pub fn breach_count(&self) -> usize {
        self.risk_metrics
            .iter()
            .filter(|m| m.status == MetricStatus::Breach)
            .count()
    }

    /// Number of risk-metric rows with a warning.
    pub fn warning_count(&self) -> usize {
        self.risk_metrics
            .iter()
            .filter(|m| m.status == MetricStatus::Warning)
            .count()
    }

    /// True if any hard limit is breached: a security-level rule, a
    /// risk-metric row, or critical liquidity.
    pub fn has_breaches(&self) -> bool {
        !self.report.is_compliant
            || self.breach_count() > 0
            || self
                .liquidity
                .iter()
                .any(|l| l.status == LiquidityStatus::Critical)
    }
}

impl std::fmt::Display for Evaluation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.allocations)?;
        writeln!(f)?;
        write!(f, "{}", self.exposures)?;
        writeln!(f)?;
        write!(f, "{}", self.statistics)?;
        writeln!(f)?;

        writeln!(f, "RISK METRICS:")?;
        for m in &self.risk_metrics {
            writeln!(
                f,
                "  [{:9}] {:28} {:>12}  limit {:18} {}",
                m.status, m.metric, m.current_value, m.ips_limit, m.action_required
            )?;
        }
        writeln!(
            f,
            "  {} compliant, {} warnings, {} breaches",
            self.risk_metrics.len() - self.breach_count() - self.warning_count(),
            self.warning_count(),
            self.breach_count()
        )?;
        writeln!(f)?;

        writeln!(f, "LIQUIDITY:")?;
        for l in &self.liquidity {
            writeln!(
                f,
                "  [{:9}] {:34} {:>8.2}  {}",
                l.status, l.item, l.current, l.action_needed
            )?;
        }
        writeln!(f)?;

        writeln!(f, "TACTICAL: {}", self.tactical)?;
        writeln!(f)?;
        write!(f, "{}", self.report)
    }
}

/// IPS compliance engine.
#[derive(Debug, Clone)]
pub struct ComplianceEngine {
    limits: IpsLimits,
    sector_source: SectorMetricSource,
    risk_free_rate: f64,
    betas: Vec<(String, f64)>,
}

impl ComplianceEngine {
    /// Create a new engine with the given limits.
    ///
    /// # Panics
    ///
    /// Panics if `limits` fails validation (e.g., NaN fields, inverted bands).
    #[track_caller]
    pub fn new(limits: IpsLimits) -> Self {
        if let Err(msg) = limits.validate() {
            panic!("invalid IpsLimits: {msg}");
        }
        Self {
            limits,
            sector_source: SectorMetricSource::default(),
            risk_free_rate: DEFAULT_RISK_FREE_RATE,
            betas: Vec::new(),
        }
    }

    /// Select the value behind the "Single Sector Exposure" row.
    pub fn with_sector_source(mut self, source: SectorMetricSource) -> Self {
        self.sector_source = source;
        self
    }

    /// Risk-free rate per period for Sharpe and Sortino.
    ///
    /// # Panics
    ///
    /// Panics if `rate` is not finite.
    #[track_caller]
    pub fn with_risk_free_rate(mut self, rate: f64) -> Self {
        assert!(rate.is_finite(), "risk-free rate must be finite, got {rate}");
        self.risk_free_rate = rate;
        self
    }

    /// Per-ticker betas for the portfolio beta. Unknown tickers count as 1.0.
    pub fn with_betas(mut self, betas: impl IntoIterator<Item = (String, f64)>) -> Self {
        self.betas = betas.into_iter().collect();
        self
    }

    /// Access the current limits.
    pub fn limits(&self) -> &IpsLimits {
        &self.limits
    }

    /// Evaluate a snapshot against the IPS. `returns` is the period return series.
    pub fn evaluate(&self, snapshot: &PortfolioSnapshot, returns: &[f64]) -> Evaluation {
        let securities = &snapshot.securities;
        let betas: Vec<(&str, f64)> = self.betas.iter().map(|(t, b)| (t.as_str(), *b)).collect();

        let statistics = RiskStatistics::compute(securities, returns, &betas, self.risk_free_rate);
        let report = evaluate_security_compliance(securities, &self.limits);
        let risk_metrics =
            evaluate_risk_metrics(securities, &statistics, &self.limits, self.sector_source);

        let mut liquidity = snapshot.liquidity.clone();
        refresh_liquidity(&mut liquidity, &self.limits);

        let checks = compliance_checks(&risk_metrics, &snapshot.compliance_checks);
        let tactical =
            check_tactical_limit(&snapshot.tactical_adjustments, self.limits.max_tactical_deviation);

        let evaluation = Evaluation {
            report,
            exposures: ExposureSummary::from_securities(securities),
            statistics,
            risk_metrics,
            liquidity,
            compliance_checks: checks,
            tactical,
            allocations: ReconcileReport::from_allocations(&snapshot.allocations),
        };

        log::info!(
            "evaluated {} securities over {} periods: {} breaches, {} warnings, risk {}",
            securities.len(),
            returns.len(),
            evaluation.breach_count(),
            evaluation.warning_count(),
            evaluation.statistics.risk_level,
        );
        for breach in &evaluation.report.breaches {
            log::warn!("{breach}");
        }
        if !evaluation.tactical.within_limit {
            log::warn!("tactical deviation {}", evaluation.tactical);
        }

        evaluation
    }

    /// Evaluate and write the derived tables (risk metrics, liquidity,
    /// compliance checks) back into the snapshot.
    pub fn apply(&self, snapshot: &mut PortfolioSnapshot, returns: &[f64]) -> Evaluation {
        let evaluation = self.evaluate(snapshot, returns);
        snapshot.risk_metrics = evaluation.risk_metrics.clone();
        snapshot.liquidity = evaluation.liquidity.clone();
        snapshot.compliance_checks = evaluation.compliance_checks.clone();
        log::debug!("applied evaluation to snapshot dated {}", snapshot.date);
        evaluation
    }
}

impl Default for ComplianceEngine {
    fn default() -> Self {
        Self::new(IpsLimits::default())
    }
}
