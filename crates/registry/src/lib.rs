//! Name ownership registry.
//!
//! Owns the mapping from name to [`NameRecord`] (owner, expiry, opaque
//! metadata records) and enforces the ownership invariants:
//!
//! - a name can be registered only if unowned or expired
//! - only the current owner may transfer, renew, update records or adjust
//!   expiry
//! - renewal is only permitted inside a window near expiry
//!
//! All operations take the current time explicitly; the registry never
//! samples a clock itself. Side effects are limited to the single record
//! touched.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use nameauction_types::{Address, NameRecord, Timestamp, ZERO_ADDRESS};

pub mod error;
pub mod name;

pub use error::RegistryError;
pub use name::{validate_name, NameError, MIN_NAME_LEN};

const DAY: u64 = 24 * 60 * 60;

/// Term and renewal parameters for the registry.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RegistryConfig {
    /// Ownership term granted on registration, in seconds.
    pub default_term: u64,
    /// How long before expiry renewal opens, in seconds.
    pub renewal_window: u64,
    /// Extension granted by each renewal, in seconds.
    pub renewal_term: u64,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            default_term: 365 * DAY,
            renewal_window: 30 * DAY,
            renewal_term: 365 * DAY,
        }
    }
}

/// The name registry.
#[derive(Debug, Default)]
pub struct NameRegistry {
    config: RegistryConfig,
    names: HashMap<String, NameRecord>,
}

impl NameRegistry {
    /// Create a registry with the given configuration.
    pub fn new(config: RegistryConfig) -> Self {
        Self {
            config,
            names: HashMap::new(),
        }
    }

    /// Register `name` to `owner` for the default term.
    ///
    /// Fails with `AlreadyRegistered` while the existing record's owner is
    /// non-zero and the record has not been expired for at least
    /// `min_gap_since_expiry` seconds. Re-registration overwrites the
    /// lapsed record (records metadata included).
    pub fn register(
        &mut self,
        name: &str,
        owner: Address,
        min_gap_since_expiry: u64,
        now: Timestamp,
    ) -> Result<(), RegistryError> {
        if let Some(record) = self.names.get(name) {
            let reusable_at = record
                .expires_at
                .checked_add(min_gap_since_expiry)
                .ok_or(RegistryError::Overflow)?;
            if record.owner != ZERO_ADDRESS && now < reusable_at {
                return Err(RegistryError::AlreadyRegistered);
            }
        }

        let expires_at = now
            .checked_add(self.config.default_term)
            .ok_or(RegistryError::Overflow)?;

        self.names.insert(
            name.to_string(),
            NameRecord {
                owner,
                expires_at,
                records: String::new(),
            },
        );
        Ok(())
    }

    /// Transfer ownership. Expiry is unchanged.
    pub fn transfer(
        &mut self,
        name: &str,
        caller: Address,
        new_owner: Address,
    ) -> Result<(), RegistryError> {
        let record = self.owned_record_mut(name, caller)?;
        record.owner = new_owner;
        Ok(())
    }

    /// Extend ownership by the renewal term.
    ///
    /// Fails with `TooEarly` strictly before `expires_at - renewal_window`.
    /// Renewal after expiry is permitted as long as nobody has
    /// re-registered the name.
    pub fn renew(&mut self, name: &str, caller: Address, now: Timestamp) -> Result<(), RegistryError> {
        let window = self.config.renewal_window;
        let term = self.config.renewal_term;
        let record = self.owned_record_mut(name, caller)?;

        let renewable_at = record.expires_at.saturating_sub(window);
        if now < renewable_at {
            return Err(RegistryError::TooEarly);
        }

        record.expires_at = record
            .expires_at
            .checked_add(term)
            .ok_or(RegistryError::Overflow)?;
        Ok(())
    }

    /// Replace the opaque metadata records attached to a name.
    pub fn update_records(
        &mut self,
        name: &str,
        caller: Address,
        records: String,
    ) -> Result<(), RegistryError> {
        let record = self.owned_record_mut(name, caller)?;
        record.records = records;
        Ok(())
    }

    /// Read the metadata records for a name.
    pub fn get_records(&self, name: &str) -> Option<&str> {
        self.names.get(name).map(|r| r.records.as_str())
    }

    /// Set an explicit expiry on an owned record.
    ///
    /// Used by the auction engine to align its temporary custody with the
    /// claim deadline, so an unclaimed auction's registration lapses on
    /// its own.
    pub fn set_expiry(
        &mut self,
        name: &str,
        caller: Address,
        expires_at: Timestamp,
    ) -> Result<(), RegistryError> {
        let record = self.owned_record_mut(name, caller)?;
        record.expires_at = expires_at;
        Ok(())
    }

    /// True iff the name is unregistered, zero-owned, or expired.
    pub fn is_available(&self, name: &str, now: Timestamp) -> bool {
        match self.names.get(name) {
            None => true,
            Some(record) => record.owner == ZERO_ADDRESS || record.is_expired(now),
        }
    }

    /// Look up the record for a name.
    pub fn record(&self, name: &str) -> Option<&NameRecord> {
        self.names.get(name)
    }

    fn owned_record_mut(
        &mut self,
        name: &str,
        caller: Address,
    ) -> Result<&mut NameRecord, RegistryError> {
        let record = self.names.get_mut(name).ok_or(RegistryError::NotFound)?;
        if record.owner != caller {
            return Err(RegistryError::NotOwner);
        }
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NAME: &str = "hello-world";
    const OWNER: Address = [1u8; 32];
    const OTHER: Address = [2u8; 32];

    fn registry() -> NameRegistry {
        NameRegistry::new(RegistryConfig {
            default_term: 1000,
            renewal_window: 100,
            renewal_term: 1000,
        })
    }

    #[test]
    fn test_register() {
        let mut reg = registry();
        reg.register(NAME, OWNER, 0, 0).unwrap();

        let record = reg.record(NAME).unwrap();
        assert_eq!(record.owner, OWNER);
        assert_eq!(record.expires_at, 1000);
    }

    #[test]
    fn test_no_re_register_while_live() {
        let mut reg = registry();
        reg.register(NAME, OWNER, 0, 0).unwrap();

        assert_eq!(
            reg.register(NAME, OTHER, 0, 500),
            Err(RegistryError::AlreadyRegistered)
        );
        assert_eq!(reg.record(NAME).unwrap().owner, OWNER);
    }

    #[test]
    fn test_re_register_after_expiry() {
        let mut reg = registry();
        reg.register(NAME, OWNER, 0, 0).unwrap();

        reg.register(NAME, OTHER, 0, 1000).unwrap();
        assert_eq!(reg.record(NAME).unwrap().owner, OTHER);
    }

    #[test]
    fn test_min_gap_since_expiry() {
        let mut reg = registry();
        reg.register(NAME, OWNER, 0, 0).unwrap();

        // Expired at 1000 but a 50s gap is demanded.
        assert_eq!(
            reg.register(NAME, OTHER, 50, 1020),
            Err(RegistryError::AlreadyRegistered)
        );
        reg.register(NAME, OTHER, 50, 1050).unwrap();
    }

    #[test]
    fn test_transfer() {
        let mut reg = registry();
        reg.register(NAME, OWNER, 0, 0).unwrap();

        reg.transfer(NAME, OWNER, OTHER).unwrap();
        let record = reg.record(NAME).unwrap();
        assert_eq!(record.owner, OTHER);
        assert_eq!(record.expires_at, 1000);
    }

    #[test]
    fn test_transfer_gating() {
        let mut reg = registry();
        assert_eq!(
            reg.transfer(NAME, OWNER, OTHER),
            Err(RegistryError::NotFound)
        );

        reg.register(NAME, OWNER, 0, 0).unwrap();
        assert_eq!(
            reg.transfer(NAME, OTHER, OTHER),
            Err(RegistryError::NotOwner)
        );
    }

    #[test]
    fn test_renew_window() {
        let mut reg = registry();
        reg.register(NAME, OWNER, 0, 0).unwrap();

        // Window opens at expires_at - renewal_window = 900.
        assert_eq!(reg.renew(NAME, OWNER, 899), Err(RegistryError::TooEarly));

        reg.renew(NAME, OWNER, 900).unwrap();
        assert_eq!(reg.record(NAME).unwrap().expires_at, 2000);
    }

    #[test]
    fn test_renew_not_owner() {
        let mut reg = registry();
        reg.register(NAME, OWNER, 0, 0).unwrap();
        assert_eq!(reg.renew(NAME, OTHER, 950), Err(RegistryError::NotOwner));
    }

    #[test]
    fn test_renew_after_expiry_grace() {
        let mut reg = registry();
        reg.register(NAME, OWNER, 0, 0).unwrap();

        // Lapsed but not re-registered: renewal still goes through.
        reg.renew(NAME, OWNER, 1500).unwrap();
        assert_eq!(reg.record(NAME).unwrap().expires_at, 2000);
    }

    #[test]
    fn test_renew_overflow() {
        let mut reg = registry();
        // Registration itself overflows near u64::MAX.
        assert_eq!(
            reg.register(NAME, OWNER, 0, u64::MAX - 500),
            Err(RegistryError::Overflow)
        );
        reg.register(NAME, OWNER, 0, 0).unwrap();
        reg.set_expiry(NAME, OWNER, u64::MAX).unwrap();
        assert_eq!(
            reg.renew(NAME, OWNER, u64::MAX - 1),
            Err(RegistryError::Overflow)
        );
    }

    #[test]
    fn test_update_records() {
        let records = r#"[{"t":"TXT","d":"HELLO WORLD"}]"#;
        let mut reg = registry();
        reg.register(NAME, OWNER, 0, 0).unwrap();

        reg.update_records(NAME, OWNER, records.to_string()).unwrap();
        assert_eq!(reg.get_records(NAME), Some(records));

        assert_eq!(
            reg.update_records(NAME, OTHER, String::new()),
            Err(RegistryError::NotOwner)
        );
        assert_eq!(reg.get_records(NAME), Some(records));
    }

    #[test]
    fn test_availability() {
        let mut reg = registry();
        assert!(reg.is_available(NAME, 0));

        reg.register(NAME, OWNER, 0, 0).unwrap();
        assert!(!reg.is_available(NAME, 999));
        assert!(reg.is_available(NAME, 1000));
    }

    #[test]
    fn test_set_expiry_owner_gated() {
        let mut reg = registry();
        reg.register(NAME, OWNER, 0, 0).unwrap();

        assert_eq!(
            reg.set_expiry(NAME, OTHER, 50),
            Err(RegistryError::NotOwner)
        );
        reg.set_expiry(NAME, OWNER, 50).unwrap();
        assert!(reg.is_available(NAME, 50));
    }
}
