//! # Compliance Subsystem
//!
//! **Subsystem ID:** 2
//!
//! ## Purpose
//!
//! Reference implementation of the ledger's `ComplianceOracle` port: an
//! investor registry plus holder-count limits.
//!
//! ## Investor Limits
//!
//! | Slot | Bucket | Denial reason |
//! |------|--------|---------------|
//! | 0 | all holders | `Total Investor Limit` |
//! | 1..=7 | holders of that rating | `Total Investor Limit: Rating` |
//! | per country | holders in that country | `Total Investor Limit: Country` |
//!
//! A limit of 0 means unlimited. The issuer never counts as a holder.
//!
//! A transfer to someone holding nothing adds a holder; a transfer of the
//! sender's whole balance removes one. When both happen within a bucket the
//! count is unchanged and the transfer is allowed even at the limit.

pub mod oracle;
pub mod registry;

pub use oracle::{InMemoryComplianceOracle, InvestorLimits, RATING_SLOTS};
pub use registry::{Investor, InvestorRegistry, RegistryError, MAX_RATING};
