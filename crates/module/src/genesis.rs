//! Genesis configuration for the auction engine.

use serde::{Deserialize, Serialize};

use nameauction_registry::RegistryConfig;
use nameauction_types::{Address, ZERO_ADDRESS};

const DAY: u64 = 24 * 60 * 60;

/// Phase durations for new auctions, in seconds.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AuctionParams {
    /// Commit phase length.
    pub bid_period: u64,
    /// Reveal phase length.
    pub reveal_period: u64,
    /// Claim window length.
    pub claim_period: u64,
}

impl Default for AuctionParams {
    fn default() -> Self {
        Self {
            bid_period: DAY,
            reveal_period: DAY,
            claim_period: DAY,
        }
    }
}

/// Genesis configuration for the auction system.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GenesisConfig {
    /// Identity under which the engine holds temporary registrations.
    pub custodian: Address,

    /// Phase durations for new auctions.
    pub params: AuctionParams,

    /// Registry term and renewal parameters.
    pub registry: RegistryConfig,
}

impl Default for GenesisConfig {
    fn default() -> Self {
        Self {
            custodian: [0xEE; 32],
            params: AuctionParams::default(),
            registry: RegistryConfig::default(),
        }
    }
}

impl GenesisConfig {
    /// Validate the genesis configuration.
    pub fn validate(&self) -> Result<(), GenesisValidationError> {
        if self.custodian == ZERO_ADDRESS {
            return Err(GenesisValidationError::ZeroCustodian);
        }
        if self.params.bid_period == 0
            || self.params.reveal_period == 0
            || self.params.claim_period == 0
        {
            return Err(GenesisValidationError::ZeroPeriod);
        }
        if self.registry.default_term == 0 || self.registry.renewal_term == 0 {
            return Err(GenesisValidationError::ZeroRegistryTerm);
        }
        Ok(())
    }
}

/// Errors that can occur during genesis validation.
#[derive(Debug, Clone, thiserror::Error)]
pub enum GenesisValidationError {
    #[error("Custodian address cannot be zero")]
    ZeroCustodian,

    #[error("Auction phase periods cannot be zero")]
    ZeroPeriod,

    #[error("Registry terms cannot be zero")]
    ZeroRegistryTerm,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        assert!(GenesisConfig::default().validate().is_ok());
    }

    #[test]
    fn test_zero_custodian() {
        let mut config = GenesisConfig::default();
        config.custodian = ZERO_ADDRESS;
        assert!(matches!(
            config.validate(),
            Err(GenesisValidationError::ZeroCustodian)
        ));
    }

    #[test]
    fn test_zero_period() {
        let mut config = GenesisConfig::default();
        config.params.reveal_period = 0;
        assert!(matches!(
            config.validate(),
            Err(GenesisValidationError::ZeroPeriod)
        ));
    }

    #[test]
    fn test_zero_registry_term() {
        let mut config = GenesisConfig::default();
        config.registry.default_term = 0;
        assert!(matches!(
            config.validate(),
            Err(GenesisValidationError::ZeroRegistryTerm)
        ));
    }
}
