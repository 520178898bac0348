//! # vertex
//!
//! Portfolio analytics for a multi-asset fund managed under an Investment
//! Policy Statement (IPS).
//!
//! ## Features
//!
//! - **Domain model**: securities, strategic allocations, tactical
//!   adjustments and the IPS display tables, gathered in a
//!   [`PortfolioSnapshot`]
//! - **Exposure rollups**: weight by asset class, sector and region, plus
//!   concentration statistics (largest holding, HHI, top-ten share)
//! - **Risk statistics**: volatility, Sharpe, Sortino, drawdown, duration,
//!   beta and a heuristic risk level
//! - **Allocation reconciliation**: deviation against strategic targets with
//!   a ±3 point rebalancing tolerance
//! - **Persistence**: the whole snapshot as one JSON document (feature
//!   `persistence`, enabled by default)
//!
//! IPS limit evaluation lives in the `vertex-compliance` crate.
//!
//! ## Quick Start
//!
//! ```
//! use vertex::{AssetClass, PortfolioSnapshot, Region, Sector, Security};
//!
//! let mut snap = PortfolioSnapshot::initial(vertex::today());
//!
//! let crdb = Security::new("CRDB", AssetClass::DomesticEquities, Sector::Banking, Region::Tanzania)
//!     .with_weights(12.0, 10.0)
//!     .unwrap();
//! let id = snap.add_security(crdb);
//!
//! assert_eq!(snap.security(&id).unwrap().deviation(), 2.0);
//! ```
//!
//! ## Exposures
//!
//! ```
//! use vertex::{exposure, AssetClass, Region, Sector, Security};
//!
//! let secs = vec![
//!     Security::new("CRDB", AssetClass::DomesticEquities, Sector::Banking, Region::Tanzania)
//!         .with_weights(15.0, 10.0)
//!         .unwrap(),
//!     Security::new("NMB", AssetClass::DomesticEquities, Sector::Banking, Region::Tanzania)
//!         .with_weights(3.0, 5.0)
//!         .unwrap(),
//! ];
//!
//! let sectors = exposure::sector_exposures(&secs);
//! assert_eq!(sectors.get("Banking"), Some(18.0));
//!
//! let c = exposure::concentration(&secs);
//! assert_eq!(c.max_single_security, 15.0);
//! ```
//!
//! ## Rebalancing
//!
//! Deviation and the rebalancing flag are derived inside the setters:
//!
//! ```
//! use vertex::{Allocation, AssetClass};
//!
//! let mut alloc = Allocation::new(AssetClass::FixedIncome, 50.0).unwrap();
//! alloc.set_current(53.0).unwrap();
//! assert!(!alloc.rebalancing_required()); // boundary is exclusive
//!
//! alloc.set_current(53.5).unwrap();
//! assert!(alloc.rebalancing_required());
//! ```
//!
//! ## Risk Statistics
//!
//! ```
//! use vertex::metrics;
//!
//! let returns = [0.04, 0.08];
//! assert!((metrics::volatility(&returns) - 0.02).abs() < 1e-12);
//! assert!((metrics::sharpe_ratio(&returns, metrics::DEFAULT_RISK_FREE_RATE) - 0.5).abs() < 1e-9);
//! ```

pub mod allocation;
mod error;
pub mod exposure;
pub mod metrics;
#[cfg(feature = "persistence")]
pub mod persistence;
pub mod records;
mod security;
mod snapshot;
pub mod tactical;
mod types;

// Re-export public API
pub use allocation::{Allocation, ReconcileEntry, ReconcileReport, REBALANCING_TOLERANCE};
#[cfg(feature = "persistence")]
pub use error::StoreError;
pub use error::ValidationError;
pub use exposure::{Concentration, ExposureSummary, Exposures};
pub use metrics::RiskStatistics;
pub use records::{ComplianceCheck, LiquidityItem, PerformanceMetric, RiskMetric};
pub use security::Security;
pub use snapshot::{today, PortfolioSnapshot, DEFAULT_TOTAL_VALUE};
pub use tactical::{AdjustmentStage, TacticalAdjustment};
pub use types::{AssetClass, LiquidityStatus, MetricStatus, Region, RiskLevel, Sector};
