//! RPC-compatible types for the mock chain.
//!
//! These types are JSON-serializable versions of the core auction and
//! registry types, with addresses and digests hex-encoded.

use serde::{Deserialize, Serialize};

use nameauction_types::{Auction, AuctionPhase, Bid, NameRecord, SettlementOutcome, Timestamp};

/// Current simulated time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimeInfo {
    pub timestamp: Timestamp,
}

/// Name record for RPC.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NameRecordRpc {
    /// Hex-encoded owner address.
    pub owner: String,
    pub expires_at: Timestamp,
    pub records: String,
}

impl From<&NameRecord> for NameRecordRpc {
    fn from(record: &NameRecord) -> Self {
        Self {
            owner: hex::encode(record.owner),
            expires_at: record.expires_at,
            records: record.records.clone(),
        }
    }
}

/// Auction for RPC, with its phase at the current chain time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuctionRpc {
    pub id: u64,
    pub name: String,
    /// Hex-encoded starter address.
    pub starter: String,
    pub start_deposit: u64,
    pub bidding_ends_at: Timestamp,
    pub reveal_ends_at: Timestamp,
    pub claim_ends_at: Timestamp,
    pub claimed: bool,
    pub reclaimed: bool,
    pub phase: AuctionPhase,
}

impl AuctionRpc {
    pub fn from_auction(auction: &Auction, now: Timestamp) -> Self {
        Self {
            id: auction.id,
            name: auction.name.clone(),
            starter: hex::encode(auction.starter),
            start_deposit: auction.start_deposit,
            bidding_ends_at: auction.bidding_ends_at,
            reveal_ends_at: auction.reveal_ends_at,
            claim_ends_at: auction.claim_ends_at,
            claimed: auction.claimed,
            reclaimed: auction.reclaimed,
            phase: auction.phase(now),
        }
    }
}

/// Bid for RPC.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BidRpc {
    /// Hex-encoded bidder address.
    pub bidder: String,
    /// Hex-encoded commitment digest.
    pub commitment: String,
    pub deposit: u64,
    pub revealed_amount: Option<u64>,
    pub revealed: bool,
}

impl From<&Bid> for BidRpc {
    fn from(bid: &Bid) -> Self {
        Self {
            bidder: hex::encode(bid.bidder),
            commitment: hex::encode(bid.commitment.0),
            deposit: bid.deposit,
            revealed_amount: bid.revealed_amount,
            revealed: bid.revealed,
        }
    }
}

/// Settlement result for RPC.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SettlementRpc {
    pub auction_id: u64,
    /// Hex-encoded winner address.
    pub winner: String,
    pub price: u64,
    pub winner_refund: u64,
    pub forfeited: u64,
    pub starter_credit: u64,
    pub settled_at: Timestamp,
}

impl From<&SettlementOutcome> for SettlementRpc {
    fn from(outcome: &SettlementOutcome) -> Self {
        Self {
            auction_id: outcome.auction_id,
            winner: hex::encode(outcome.winner),
            price: outcome.price,
            winner_refund: outcome.winner_refund,
            forfeited: outcome.forfeited,
            starter_credit: outcome.starter_credit,
            settled_at: outcome.settled_at,
        }
    }
}
