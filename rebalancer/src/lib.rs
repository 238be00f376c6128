//! cryptodex-rebalancer: operator tool around the cryptodex engine.
//!
//! Reads a TOML strategy, builds the ledger from a paper exchange snapshot,
//! shows the proposed orders and submits them after confirmation.

pub mod config;
pub mod display;
pub mod error;
pub mod execution;
