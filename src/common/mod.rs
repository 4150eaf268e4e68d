//! Shared numeric helpers used by the indicator engine.

pub mod math;
