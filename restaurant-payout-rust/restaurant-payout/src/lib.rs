//! Restaurant payout service: withdrawal requests, admin approval and the
//! wallet ledger behind them, served over HTTP.

pub mod api;
pub mod app;
pub mod domain;
pub mod infrastructure;
pub mod middleware;
pub mod utils;
