//! Compliance report types.

use serde::Serialize;

/// Outcome of the security-level IPS checks.
///
/// One message per breached rule, in rule order: single security, sector,
/// region.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComplianceReport {
    pub is_compliant: bool,
    pub breaches: Vec<String>,
}

impl ComplianceReport {
    pub fn from_breaches(breaches: Vec<String>) -> Self {
        Self {
            is_compliant: breaches.is_empty(),
            breaches,
        }
    }
}

impl std::fmt::Display for ComplianceReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "COMPLIANCE:")?;
        if self.is_compliant {
            return writeln!(f, "  [PASS] all security limits respected");
        }
        for breach in &self.breaches {
            writeln!(f, "  [FAIL] {breach}")?;
        }
        Ok(())
    }
}

/// Outcome of the tactical deviation limit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TacticalLimit {
    /// Sum of absolute tactical deviations.
    pub total_deviation: f64,
    pub limit: f64,
    pub within_limit: bool,
}

impl std::fmt::Display for TacticalLimit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.within_limit {
            write!(
                f,
                "Within Limit ({:.2}% of ±{}%)",
                self.total_deviation, self.limit
            )
        } else {
            write!(
                f,
                "Exceeds Limit ({:.2}% exceeds ±{}%)",
                self.total_deviation, self.limit
            )
        }
    }
}
