//! Cross-crate scenarios.

pub mod concurrency;
pub mod hooks;
pub mod investor_limits;
pub mod persistence;
