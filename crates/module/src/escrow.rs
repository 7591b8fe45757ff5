//! Per-identity escrow ledger.
//!
//! Settlement always credits internal balances; actual withdrawal is a
//! separate, caller-initiated step. This removes any dependency on
//! external transfer ordering during settlement.

use std::collections::HashMap;

use crate::error::AuctionError;
use nameauction_types::{Address, Amount};

/// Withdrawable balances, credited by refunds and settlement.
///
/// Balances are unsigned and never go negative. Credits to different
/// identities are independent; credits to the same identity are
/// additive and checked, never saturating: overflow is a hard
/// [`AuctionError::Overflow`].
#[derive(Debug, Default)]
pub struct EscrowLedger {
    balances: HashMap<Address, Amount>,
}

impl EscrowLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `amount` to an identity's balance.
    pub fn credit(&mut self, identity: Address, amount: Amount) -> Result<(), AuctionError> {
        let balance = self.balances.entry(identity).or_insert(0);
        *balance = balance.checked_add(amount).ok_or(AuctionError::Overflow)?;
        Ok(())
    }

    /// Apply a batch of credits all-or-nothing.
    ///
    /// The same identity may appear multiple times. Every checked add is
    /// validated before any balance is touched, so a failing batch leaves
    /// the ledger unchanged.
    pub fn credit_many(&mut self, credits: &[(Address, Amount)]) -> Result<(), AuctionError> {
        let mut totals: HashMap<Address, Amount> = HashMap::new();
        for (identity, amount) in credits {
            let total = totals.entry(*identity).or_insert(0);
            *total = total.checked_add(*amount).ok_or(AuctionError::Overflow)?;
        }
        for (identity, total) in &totals {
            self.balance_of(identity)
                .checked_add(*total)
                .ok_or(AuctionError::Overflow)?;
        }
        for (identity, total) in totals {
            // Validated above; plain add cannot wrap here.
            *self.balances.entry(identity).or_insert(0) += total;
        }
        Ok(())
    }

    /// Zero the caller's balance and return the prior value.
    ///
    /// `NothingToWithdraw` when the balance is zero; non-fatal, the
    /// caller may retry later.
    pub fn withdraw(&mut self, identity: &Address) -> Result<Amount, AuctionError> {
        match self.balances.get_mut(identity) {
            Some(balance) if *balance > 0 => {
                let prior = *balance;
                *balance = 0;
                Ok(prior)
            }
            _ => Err(AuctionError::NothingToWithdraw),
        }
    }

    /// Read-only balance lookup.
    pub fn balance_of(&self, identity: &Address) -> Amount {
        self.balances.get(identity).copied().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALICE: Address = [1u8; 32];
    const BOB: Address = [2u8; 32];

    #[test]
    fn test_credit_and_withdraw() {
        let mut ledger = EscrowLedger::new();

        ledger.credit(ALICE, 100).unwrap();
        ledger.credit(ALICE, 50).unwrap();
        assert_eq!(ledger.balance_of(&ALICE), 150);

        assert_eq!(ledger.withdraw(&ALICE).unwrap(), 150);
        assert_eq!(ledger.balance_of(&ALICE), 0);
    }

    #[test]
    fn test_withdraw_empty() {
        let mut ledger = EscrowLedger::new();
        assert_eq!(ledger.withdraw(&ALICE), Err(AuctionError::NothingToWithdraw));

        ledger.credit(ALICE, 10).unwrap();
        ledger.withdraw(&ALICE).unwrap();
        assert_eq!(ledger.withdraw(&ALICE), Err(AuctionError::NothingToWithdraw));
    }

    #[test]
    fn test_credit_overflow_is_hard_failure() {
        let mut ledger = EscrowLedger::new();
        ledger.credit(ALICE, u64::MAX).unwrap();

        assert_eq!(ledger.credit(ALICE, 1), Err(AuctionError::Overflow));
        // Balance untouched by the failed credit.
        assert_eq!(ledger.balance_of(&ALICE), u64::MAX);
    }

    #[test]
    fn test_identities_are_independent() {
        let mut ledger = EscrowLedger::new();
        ledger.credit(ALICE, u64::MAX).unwrap();

        ledger.credit(BOB, 25).unwrap();
        assert_eq!(ledger.balance_of(&BOB), 25);
    }

    #[test]
    fn test_credit_many_merges_duplicates() {
        let mut ledger = EscrowLedger::new();
        ledger
            .credit_many(&[(ALICE, 10), (BOB, 5), (ALICE, 20)])
            .unwrap();
        assert_eq!(ledger.balance_of(&ALICE), 30);
        assert_eq!(ledger.balance_of(&BOB), 5);
    }

    #[test]
    fn test_credit_many_all_or_nothing() {
        let mut ledger = EscrowLedger::new();
        ledger.credit(ALICE, u64::MAX - 5).unwrap();

        let result = ledger.credit_many(&[(BOB, 1), (ALICE, 10)]);
        assert_eq!(result, Err(AuctionError::Overflow));
        assert_eq!(ledger.balance_of(&BOB), 0);
        assert_eq!(ledger.balance_of(&ALICE), u64::MAX - 5);
    }
}
