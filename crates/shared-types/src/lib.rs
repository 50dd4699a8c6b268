//! # Shared Types Crate
//!
//! Types shared by every Range-Ledger crate.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: identities, tags and the compliance port are
//!   defined once here.
//! - **Port ownership**: the compliance oracle trait lives here so that the
//!   ledger and oracle implementations depend on one definition without
//!   depending on each other.

pub mod compliance;
pub mod entities;

pub use compliance::*;
pub use entities::*;
