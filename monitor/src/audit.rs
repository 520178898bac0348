//! JSONL audit trail.
//!
//! One JSON object per line, appended to `logging.dir/logging.audit_file`.
//! A log opened with [`AuditLog::for_command`] stamps every line with the
//! command name, so interleaved runs stay attributable.

use std::fs::{self, File, OpenOptions};
use std::io::{LineWriter, Write};
use std::path::Path;

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use serde_json::{Value, json};
use vertex::{Allocation, TacticalAdjustment};
use vertex_compliance::Evaluation;

use crate::error::Result;

/// One line of the audit trail.
#[derive(Debug, Clone, Serialize)]
pub struct AuditEvent<'a> {
    pub ts: DateTime<Utc>,
    pub event: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub command: Option<&'a str>,
    /// Event payload; must be a JSON object.
    #[serde(flatten)]
    pub data: Value,
}

/// Append-only audit writer. Each line is flushed as it is written.
pub struct AuditLog {
    out: LineWriter<File>,
    command: Option<String>,
}

impl AuditLog {
    /// Open the trail for appending, creating parent directories.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir)?;
        }
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            out: LineWriter::new(file),
            command: None,
        })
    }

    /// Open the trail for one command and record `command_started`.
    pub fn for_command(path: &Path, command: &str) -> Result<Self> {
        let mut log = Self::open(path)?;
        log.command = Some(command.to_string());
        log.log_simple("command_started")?;
        Ok(log)
    }

    pub fn log(&mut self, event: &'static str, data: Value) -> Result<()> {
        let line = serde_json::to_string(&AuditEvent {
            ts: Utc::now(),
            event,
            command: self.command.as_deref(),
            data,
        })?;
        writeln!(self.out, "{line}")?;
        Ok(())
    }

    pub fn log_simple(&mut self, event: &'static str) -> Result<()> {
        self.log(event, json!({}))
    }

    // === Domain events ===

    pub fn snapshot_saved(&mut self, date: NaiveDate, securities: usize) -> Result<()> {
        self.log(
            "snapshot_saved",
            json!({ "date": date.to_string(), "securities": securities }),
        )
    }

    /// Summary only; the full tables live in the snapshot.
    pub fn evaluation(&mut self, evaluation: &Evaluation) -> Result<()> {
        self.log(
            "evaluation",
            json!({
                "compliant": evaluation.report.is_compliant,
                "breaches": evaluation.report.breaches,
                "metric_breaches": evaluation.breach_count(),
                "metric_warnings": evaluation.warning_count(),
                "risk_level": evaluation.statistics.risk_level.to_string(),
                "tactical_within_limit": evaluation.tactical.within_limit,
            }),
        )
    }

    pub fn allocation_set(&mut self, previous: f64, allocation: &Allocation) -> Result<()> {
        self.log(
            "allocation_set",
            json!({
                "asset_class": allocation.asset_class.label(),
                "previous": previous,
                "current": allocation.current(),
                "target": allocation.target(),
                "deviation": allocation.deviation(),
                "rebalancing_required": allocation.rebalancing_required(),
            }),
        )
    }

    pub fn adjustment_added(&mut self, adjustment: &TacticalAdjustment) -> Result<()> {
        self.log(
            "adjustment_added",
            json!({
                "id": adjustment.id,
                "date": adjustment.date.to_string(),
                "move": adjustment.tactical_move,
                "deviation_percent": adjustment.deviation_percent(),
                "approved_by": adjustment.approved_by,
            }),
        )
    }

    pub fn adjustment_removed(&mut self, adjustment: &TacticalAdjustment) -> Result<()> {
        self.log(
            "adjustment_removed",
            json!({ "id": adjustment.id, "move": adjustment.tactical_move }),
        )
    }
}
