//! Ports layer for the Range Ledger subsystem.
//!
//! - Inbound (Driving) ports: the ledger API exposed to callers
//! - Outbound (Driven) ports: clock and snapshot storage

pub mod inbound;
pub mod outbound;

pub use inbound::*;
pub use outbound::*;
