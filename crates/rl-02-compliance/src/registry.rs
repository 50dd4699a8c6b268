//! Investor registry: identity to rating and country.

use shared_types::Identity;
use std::collections::HashMap;
use thiserror::Error;

/// Highest investor rating.
pub const MAX_RATING: u8 = 7;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Investor {
    /// `1..=MAX_RATING`
    pub rating: u8,
    pub country: u16,
    /// Restricted investors may neither send nor receive.
    pub restricted: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("Invalid rating {0}: must be 1..=7")]
    InvalidRating(u8),

    #[error("Unknown identity {0}")]
    Unknown(Identity),
}

#[derive(Debug, Default, Clone)]
pub struct InvestorRegistry {
    investors: HashMap<Identity, Investor>,
}

impl InvestorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register or update an investor. Updating keeps the restriction flag.
    pub fn register(
        &mut self,
        identity: Identity,
        rating: u8,
        country: u16,
    ) -> Result<(), RegistryError> {
        if rating == 0 || rating > MAX_RATING {
            return Err(RegistryError::InvalidRating(rating));
        }
        let restricted = self
            .investors
            .get(&identity)
            .is_some_and(|investor| investor.restricted);
        self.investors.insert(
            identity,
            Investor {
                rating,
                country,
                restricted,
            },
        );
        Ok(())
    }

    pub fn set_restricted(
        &mut self,
        identity: &Identity,
        restricted: bool,
    ) -> Result<(), RegistryError> {
        let investor = self
            .investors
            .get_mut(identity)
            .ok_or(RegistryError::Unknown(*identity))?;
        investor.restricted = restricted;
        Ok(())
    }

    pub fn get(&self, identity: &Identity) -> Option<&Investor> {
        self.investors.get(identity)
    }

    pub fn len(&self) -> usize {
        self.investors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.investors.is_empty()
    }
}
