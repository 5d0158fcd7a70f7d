//! argus-audit - offline inspector for trading-system event exports
//!
//! Loads an export's JSONL event log, audits whether every decision can be
//! traced back to a recorded data snapshot, and summarizes the result.

pub mod audit;
pub mod cli;
pub mod loader;
pub mod observability;
pub mod report;
