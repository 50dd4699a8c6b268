//! In-memory investor-limit oracle.

use crate::registry::{Investor, InvestorRegistry, RegistryError};
use parking_lot::RwLock;
use shared_types::{ComplianceError, ComplianceOracle, HolderProfile, Identity, TransferCheck};
use std::collections::HashMap;
use tracing::{debug, warn};

/// Slot 0 is the total limit, slots 1..=7 the per-rating limits.
pub const RATING_SLOTS: usize = 8;

const TOTAL_LIMIT: &str = "Total Investor Limit";
const RATING_LIMIT: &str = "Total Investor Limit: Rating";
const COUNTRY_LIMIT: &str = "Total Investor Limit: Country";
const NOT_REGISTERED: &str = "Address not registered";
const RESTRICTED: &str = "Address restricted";

/// Holder-count limits. 0 = unlimited.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct InvestorLimits {
    pub slots: [u64; RATING_SLOTS],
    pub countries: HashMap<u16, u64>,
}

impl InvestorLimits {
    fn country(&self, country: u16) -> u64 {
        self.countries.get(&country).copied().unwrap_or(0)
    }
}

#[derive(Debug, Default)]
struct HolderCounts {
    total: u64,
    ratings: [u64; RATING_SLOTS],
    countries: HashMap<u16, u64>,
}

impl HolderCounts {
    fn add(&mut self, investor: &Investor) {
        self.total += 1;
        self.ratings[usize::from(investor.rating)] += 1;
        *self.countries.entry(investor.country).or_default() += 1;
    }

    fn remove(&mut self, investor: &Investor) {
        self.total = self.total.saturating_sub(1);
        let rating = &mut self.ratings[usize::from(investor.rating)];
        *rating = rating.saturating_sub(1);
        if let Some(count) = self.countries.get_mut(&investor.country) {
            *count = count.saturating_sub(1);
        }
    }
}

/// Holder-count changes a transfer causes, with the records they were
/// counted under.
#[derive(Clone, Debug)]
struct Effect {
    retiring: Option<(Identity, Investor)>,
    joining: Option<(Identity, Investor)>,
}

#[derive(Debug, Default)]
struct OracleState {
    registry: InvestorRegistry,
    limits: InvestorLimits,
    counts: HolderCounts,
    /// Every counted holder and the record it is bucketed under.
    holders: HashMap<Identity, Investor>,
    /// Recorded transfers not yet committed or reverted.
    pending: Vec<(TransferCheck, Effect)>,
}

impl OracleState {
    fn apply(&mut self, effect: &Effect) {
        if let Some((identity, counted)) = &effect.retiring {
            self.holders.remove(identity);
            self.counts.remove(counted);
        }
        if let Some((identity, investor)) = &effect.joining {
            self.holders.insert(*identity, *investor);
            self.counts.add(investor);
        }
    }

    fn undo(&mut self, effect: &Effect) {
        if let Some((identity, _)) = &effect.joining {
            if let Some(counted) = self.holders.remove(identity) {
                self.counts.remove(&counted);
            }
        }
        if let Some((identity, retired)) = &effect.retiring {
            // Re-registration since the transfer decides the bucket.
            let investor = self.registry.get(identity).copied().unwrap_or(*retired);
            self.holders.insert(*identity, investor);
            self.counts.add(&investor);
        }
    }
}

fn exceeds(limit: u64, count: u64) -> bool {
    limit != 0 && count > limit
}

/// Reference `ComplianceOracle`: registry lookups plus investor limits.
///
/// Only transfers reach the oracle, so holders are counted from the first
/// transfer they receive. Issuance should go to the issuer.
#[derive(Debug)]
pub struct InMemoryComplianceOracle {
    issuer: Identity,
    state: RwLock<OracleState>,
}

impl InMemoryComplianceOracle {
    pub fn new(issuer: Identity) -> Self {
        Self {
            issuer,
            state: RwLock::new(OracleState::default()),
        }
    }

    /// Register or update an investor. A counted holder moves to the
    /// rating and country buckets of its new record.
    pub fn register(&self, identity: Identity, rating: u8, country: u16) -> Result<(), RegistryError> {
        let mut state = self.state.write();
        state.registry.register(identity, rating, country)?;

        let updated = state.registry.get(&identity).copied();
        if let (Some(previous), Some(updated)) = (state.holders.get(&identity).copied(), updated) {
            state.holders.insert(identity, updated);
            state.counts.remove(&previous);
            state.counts.add(&updated);
            debug!(
                "[rl-02] Holder {} moved to rating {} country {}",
                identity, updated.rating, updated.country
            );
        }
        Ok(())
    }

    pub fn set_restricted(&self, identity: &Identity, restricted: bool) -> Result<(), RegistryError> {
        self.state.write().registry.set_restricted(identity, restricted)
    }

    /// `[total, rating 1, ..., rating 7]`
    pub fn set_investor_limits(&self, slots: [u64; RATING_SLOTS]) {
        debug!("[rl-02] Investor limits set to {:?}", slots);
        self.state.write().limits.slots = slots;
    }

    pub fn set_country_limit(&self, country: u16, limit: u64) {
        debug!("[rl-02] Country {} limit set to {}", country, limit);
        self.state.write().limits.countries.insert(country, limit);
    }

    pub fn limits(&self) -> InvestorLimits {
        self.state.read().limits.clone()
    }

    pub fn holder_count(&self) -> u64 {
        self.state.read().counts.total
    }

    pub fn rating_count(&self, rating: u8) -> u64 {
        self.state
            .read()
            .counts
            .ratings
            .get(usize::from(rating))
            .copied()
            .unwrap_or(0)
    }

    pub fn country_count(&self, country: u16) -> u64 {
        self.state
            .read()
            .counts
            .countries
            .get(&country)
            .copied()
            .unwrap_or(0)
    }

    /// The investor record for a non-issuer party.
    fn party(&self, state: &OracleState, identity: &Identity) -> Result<Option<Investor>, ComplianceError> {
        if *identity == self.issuer {
            return Ok(None);
        }
        let investor = state
            .registry
            .get(identity)
            .copied()
            .ok_or_else(|| ComplianceError::denied(NOT_REGISTERED))?;
        if investor.restricted {
            return Err(ComplianceError::denied(RESTRICTED));
        }
        Ok(Some(investor))
    }

    /// Decide `check` against the current counts and limits.
    fn evaluate(&self, state: &OracleState, check: &TransferCheck) -> Result<Effect, ComplianceError> {
        let from = self.party(state, &check.from)?;
        let to = self.party(state, &check.to)?;

        let retiring = from
            .filter(|_| check.retires_sender())
            .and_then(|_| state.holders.get(&check.from))
            .map(|counted| (check.from, *counted));
        let joining = to
            .filter(|_| check.adds_receiver() && !state.holders.contains_key(&check.to))
            .map(|investor| (check.to, investor));

        if let Some((_, joining)) = &joining {
            let retiring = retiring.as_ref().map(|(_, counted)| counted);
            let offset = |same_bucket: bool| u64::from(same_bucket);
            let counts = &state.counts;
            let limits = &state.limits;

            let total = (counts.total + 1).saturating_sub(offset(retiring.is_some()));
            if exceeds(limits.slots[0], total) {
                return Err(ComplianceError::denied(TOTAL_LIMIT));
            }

            let rating = usize::from(joining.rating);
            let rating_count = (counts.ratings[rating] + 1)
                .saturating_sub(offset(retiring.is_some_and(|r| r.rating == joining.rating)));
            if exceeds(limits.slots[rating], rating_count) {
                return Err(ComplianceError::denied(RATING_LIMIT));
            }

            let country_count = (counts.countries.get(&joining.country).copied().unwrap_or(0) + 1)
                .saturating_sub(offset(retiring.is_some_and(|r| r.country == joining.country)));
            if exceeds(limits.country(joining.country), country_count) {
                return Err(ComplianceError::denied(COUNTRY_LIMIT));
            }
        }

        Ok(Effect { retiring, joining })
    }
}

impl ComplianceOracle for InMemoryComplianceOracle {
    fn check(&self, check: &TransferCheck) -> Result<(), ComplianceError> {
        let state = self.state.read();
        self.evaluate(&state, check).map(|_| ())
    }

    fn check_and_record(&self, check: &TransferCheck) -> Result<(), ComplianceError> {
        let mut state = self.state.write();
        let effect = self.evaluate(&state, check)?;
        state.apply(&effect);
        state.pending.push((check.clone(), effect));
        debug!(
            "[rl-02] Recorded {} -> {}: {} holders",
            check.from, check.to, state.counts.total
        );
        Ok(())
    }

    fn commit(&self, check: &TransferCheck) {
        let mut state = self.state.write();
        if let Some(pos) = state.pending.iter().position(|(c, _)| c == check) {
            state.pending.remove(pos);
        }
    }

    fn revert(&self, check: &TransferCheck) {
        let mut state = self.state.write();
        let Some(pos) = state.pending.iter().rposition(|(c, _)| c == check) else {
            warn!(
                "[rl-02] No recorded transfer {} -> {} to revert",
                check.from, check.to
            );
            return;
        };
        let (_, effect) = state.pending.remove(pos);
        state.undo(&effect);
        debug!("[rl-02] Reverted {} -> {}", check.from, check.to);
    }

    fn profile(&self, identity: &Identity) -> Option<HolderProfile> {
        self.state
            .read()
            .registry
            .get(identity)
            .map(|investor| HolderProfile {
                rating: investor.rating,
                country: investor.country,
            })
    }
}
