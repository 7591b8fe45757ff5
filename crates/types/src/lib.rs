//! Core type definitions for the sealed-bid name auction system.
//!
//! This crate provides the shared data structures used across the system:
//! name ownership records, auction and bid state, and the commit-reveal
//! commitment scheme.

use borsh::{BorshDeserialize, BorshSerialize};
use serde::{Deserialize, Serialize};

pub mod commitment;

pub use commitment::{commit_bid, verify_bid, BidCommitment, Nonce};

// =========================
// PRIMITIVES
// =========================

/// Opaque caller identity (32 bytes, e.g. a public-key-derived address).
pub type Address = [u8; 32];

/// The all-zero address, used for "never owned / ownership lapsed".
pub const ZERO_ADDRESS: Address = [0u8; 32];

/// Value in the chain's native unit.
pub type Amount = u64;

/// Seconds since epoch, read from an externally supplied clock.
pub type Timestamp = u64;

// =========================
// REGISTRY TYPES
// =========================

/// Ownership record for a single name.
///
/// At most one live record exists per name. Records are never deleted,
/// only superseded by re-registration after expiry.
#[derive(Clone, Debug, PartialEq, Eq, BorshSerialize, BorshDeserialize, Serialize, Deserialize)]
pub struct NameRecord {
    pub owner: Address,
    pub expires_at: Timestamp,
    /// Opaque, owner-gated metadata (free-text record sets).
    pub records: String,
}

impl NameRecord {
    /// Whether ownership has lapsed at `now`.
    pub fn is_expired(&self, now: Timestamp) -> bool {
        now >= self.expires_at
    }
}

// =========================
// AUCTION TYPES
// =========================

/// Lifecycle phase of an auction, derived from its deadlines and flags.
#[derive(Clone, Debug, PartialEq, Eq, BorshSerialize, BorshDeserialize, Serialize, Deserialize)]
pub enum AuctionPhase {
    /// Accepting sealed bids.
    Bidding,
    /// Accepting reveals of committed bids.
    Revealing,
    /// Reveal window closed, awaiting claim.
    Claimable,
    /// Claimed and settled (terminal).
    Settled,
    /// Claim window closed without a claim (terminal).
    Lapsed,
}

/// One auction instance for a name.
///
/// Identified by a monotonically increasing id; one instance per
/// (name, start attempt). Bids are stored separately, keyed by
/// (auction id, bidder).
#[derive(Clone, Debug, PartialEq, Eq, BorshSerialize, BorshDeserialize, Serialize, Deserialize)]
pub struct Auction {
    pub id: u64,
    pub name: String,
    pub starter: Address,
    /// Held as the starter's floor bid of last resort.
    pub start_deposit: Amount,
    pub bidding_ends_at: Timestamp,
    pub reveal_ends_at: Timestamp,
    pub claim_ends_at: Timestamp,
    /// Once true, never reverts.
    pub claimed: bool,
    /// Set when a lapsed auction's deposits have been recovered.
    pub reclaimed: bool,
}

impl Auction {
    /// Current phase at `now`.
    pub fn phase(&self, now: Timestamp) -> AuctionPhase {
        if self.claimed {
            AuctionPhase::Settled
        } else if now >= self.claim_ends_at {
            AuctionPhase::Lapsed
        } else if now >= self.reveal_ends_at {
            AuctionPhase::Claimable
        } else if now >= self.bidding_ends_at {
            AuctionPhase::Revealing
        } else {
            AuctionPhase::Bidding
        }
    }

    /// A live auction blocks a fresh `start` for the same name.
    pub fn is_live(&self, now: Timestamp) -> bool {
        !self.claimed && now < self.claim_ends_at
    }
}

/// A sealed bid on an auction. Exactly one per (auction, bidder).
///
/// Created during the commit phase; mutated once, at reveal; immutable
/// afterward.
#[derive(Clone, Debug, PartialEq, Eq, BorshSerialize, BorshDeserialize, Serialize, Deserialize)]
pub struct Bid {
    pub bidder: Address,
    pub commitment: BidCommitment,
    /// Held in full; the maximum the bidder can be charged.
    pub deposit: Amount,
    pub revealed_amount: Option<Amount>,
    pub revealed: bool,
    /// Position in the auction's reveal sequence, for deterministic
    /// tie-breaking.
    pub reveal_index: Option<u32>,
}

/// Result of a successful claim.
#[derive(Clone, Debug, PartialEq, Eq, BorshSerialize, BorshDeserialize, Serialize, Deserialize)]
pub struct SettlementOutcome {
    pub auction_id: u64,
    pub winner: Address,
    /// Second price actually charged to the winner.
    pub price: Amount,
    /// Excess deposit returned to the winner.
    pub winner_refund: Amount,
    /// Total deposits forfeited by bidders who never revealed.
    pub forfeited: Amount,
    /// price + forfeited + start deposit, credited to the starter.
    pub starter_credit: Amount,
    pub settled_at: Timestamp,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn auction(bidding: u64, reveal: u64, claim: u64) -> Auction {
        Auction {
            id: 1,
            name: "hello-world".to_string(),
            starter: [1u8; 32],
            start_deposit: 100,
            bidding_ends_at: bidding,
            reveal_ends_at: reveal,
            claim_ends_at: claim,
            claimed: false,
            reclaimed: false,
        }
    }

    #[test]
    fn test_phase_progression() {
        let a = auction(100, 200, 300);
        assert_eq!(a.phase(0), AuctionPhase::Bidding);
        assert_eq!(a.phase(99), AuctionPhase::Bidding);
        assert_eq!(a.phase(100), AuctionPhase::Revealing);
        assert_eq!(a.phase(199), AuctionPhase::Revealing);
        assert_eq!(a.phase(200), AuctionPhase::Claimable);
        assert_eq!(a.phase(299), AuctionPhase::Claimable);
        assert_eq!(a.phase(300), AuctionPhase::Lapsed);
    }

    #[test]
    fn test_claimed_is_terminal() {
        let mut a = auction(100, 200, 300);
        a.claimed = true;
        assert_eq!(a.phase(250), AuctionPhase::Settled);
        assert_eq!(a.phase(1000), AuctionPhase::Settled);
        assert!(!a.is_live(250));
    }

    #[test]
    fn test_liveness_window() {
        let a = auction(100, 200, 300);
        assert!(a.is_live(0));
        assert!(a.is_live(299));
        assert!(!a.is_live(300));
    }

    #[test]
    fn test_record_expiry() {
        let record = NameRecord {
            owner: [2u8; 32],
            expires_at: 500,
            records: String::new(),
        };
        assert!(!record.is_expired(499));
        assert!(record.is_expired(500));
    }

    #[test]
    fn test_auction_borsh_round_trip() {
        let a = auction(100, 200, 300);
        let encoded = borsh::to_vec(&a).unwrap();
        let decoded: Auction = borsh::from_slice(&encoded).unwrap();
        assert_eq!(a, decoded);
    }
}
