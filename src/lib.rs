//! Tickerwise: technical indicators and BUY/SELL/HOLD signals computed by an
//! asynchronous, queue-driven pipeline.

pub mod cache;
pub mod common;
pub mod config;
pub mod core;
pub mod db;
pub mod decision;
pub mod error;
pub mod indicators;
pub mod jobs;
pub mod logging;
pub mod metrics;
pub mod models;
