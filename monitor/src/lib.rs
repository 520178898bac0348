//! vertex-monitor: command-line IPS monitor for vertex portfolios.
//!
//! Keeps the portfolio snapshot in a file store, applies edits, evaluates
//! the snapshot against the Investment Policy Statement, and records every
//! command in a JSONL audit trail.

pub mod audit;
pub mod commands;
pub mod config;
pub mod error;
pub mod returns;
