//! # Mutation Hooks
//!
//! Ordered interceptors invoked around every mint and transfer.
//!
//! ```text
//! validate ──→ [compliance] ──→ before_mutation* ──→ apply ──→ after_mutation*
//!                                    │                              │
//!                                    └── veto: nothing changed      └── veto: state restored
//! ```
//!
//! Handlers run synchronously in registration order while the ledger's
//! write lock is held. A handler must not call back into the ledger.
//!
//! A dry-run transfer check reaches `before_mutation` only, as
//! `MutationEvent::Checked`; a veto fails the check.

use shared_types::{HolderProfile, Identity};
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

use crate::error::{LedgerError, LedgerResult};

/// A party to a mutation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Party {
    pub identity: Identity,
    /// Rating and country, when the compliance oracle knows them.
    pub profile: Option<HolderProfile>,
}

impl Party {
    pub fn new(identity: Identity) -> Self {
        Self {
            identity,
            profile: None,
        }
    }
}

/// A mutation about to happen (or that just happened).
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MutationEvent {
    /// New tokens issued to `owner`.
    Minted {
        owner: Party,
        amount: u64,
        old_supply: u64,
        new_supply: u64,
    },
    /// Tokens moved between holders.
    Transferred { from: Party, to: Party, amount: u64 },
    /// A transfer evaluated without being applied.
    Checked { from: Party, to: Party, amount: u64 },
}

impl MutationEvent {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Minted { .. } => "mint",
            Self::Transferred { .. } => "transfer",
            Self::Checked { .. } => "check",
        }
    }

    /// Fill in every party's profile from `lookup`.
    pub fn with_profiles(mut self, lookup: impl Fn(&Identity) -> Option<HolderProfile>) -> Self {
        match &mut self {
            Self::Minted { owner, .. } => owner.profile = lookup(&owner.identity),
            Self::Transferred { from, to, .. } | Self::Checked { from, to, .. } => {
                from.profile = lookup(&from.identity);
                to.profile = lookup(&to.identity);
            }
        }
        self
    }
}

/// A hook's veto.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("{reason}")]
pub struct HookRejection {
    pub reason: String,
}

impl HookRejection {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

/// An interceptor. Both callbacks default to approval.
pub trait LedgerHook: Send + Sync {
    fn before_mutation(&self, event: &MutationEvent) -> Result<(), HookRejection> {
        let _ = event;
        Ok(())
    }

    fn after_mutation(&self, event: &MutationEvent) -> Result<(), HookRejection> {
        let _ = event;
        Ok(())
    }
}

/// Registered hooks, keyed by name, in registration order.
#[derive(Clone, Default)]
pub struct HookPipeline {
    hooks: Vec<(String, Arc<dyn LedgerHook>)>,
}

impl fmt::Debug for HookPipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}

impl HookPipeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `hook` under `name`. Re-attaching a name replaces the
    /// previous handler in place.
    pub fn attach(&mut self, name: impl Into<String>, hook: Arc<dyn LedgerHook>) {
        let name = name.into();
        match self.hooks.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = hook,
            None => self.hooks.push((name, hook)),
        }
    }

    /// Remove the hook registered under `name`.
    pub fn detach(&mut self, name: &str) -> bool {
        let before = self.hooks.len();
        self.hooks.retain(|(n, _)| n != name);
        self.hooks.len() != before
    }

    pub fn is_empty(&self) -> bool {
        self.hooks.is_empty()
    }

    pub fn len(&self) -> usize {
        self.hooks.len()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.hooks.iter().map(|(n, _)| n.as_str())
    }

    pub fn run_before(&self, event: &MutationEvent) -> LedgerResult<()> {
        for (name, hook) in &self.hooks {
            hook.before_mutation(event)
                .map_err(|rejection| rejected(name, rejection))?;
        }
        Ok(())
    }

    pub fn run_after(&self, event: &MutationEvent) -> LedgerResult<()> {
        for (name, hook) in &self.hooks {
            hook.after_mutation(event)
                .map_err(|rejection| rejected(name, rejection))?;
        }
        Ok(())
    }
}

fn rejected(name: &str, rejection: HookRejection) -> LedgerError {
    tracing::warn!("[rl-01] Hook '{}' vetoed: {}", name, rejection.reason);
    LedgerError::HookRejected {
        hook: name.to_string(),
        reason: rejection.reason,
    }
}
