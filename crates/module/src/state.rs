//! In-memory state for the auction engine.

use std::collections::HashMap;

use crate::escrow::EscrowLedger;
use nameauction_types::{Address, Auction, Bid, SettlementOutcome, Timestamp};

/// Auction engine state.
///
/// One latest auction id per name; bids keyed by (auction id, bidder).
/// The whole structure is single-writer: every mutating operation takes
/// `&mut self`, and callers serialize access per the registry's
/// single-record ownership model.
#[derive(Debug)]
pub struct EngineState {
    /// Next auction ID to assign.
    pub next_auction_id: u64,

    /// All auctions by ID.
    pub auctions: HashMap<u64, Auction>,

    /// Latest auction ID per name. Created lazily on first start and
    /// only superseded by a newer auction id, never reclaimed.
    pub auctions_by_name: HashMap<String, u64>,

    /// Bids: (auction_id, bidder) -> bid.
    pub bids: HashMap<(u64, Address), Bid>,

    /// Bidders per auction, in commit order.
    pub auction_bidders: HashMap<u64, Vec<Address>>,

    /// Bidders per auction in reveal order, for deterministic tie-breaks.
    pub reveal_order: HashMap<u64, Vec<Address>>,

    /// Settlement results by auction ID.
    pub results: HashMap<u64, SettlementOutcome>,

    /// Withdrawable balances.
    pub escrow: EscrowLedger,

    /// Identity under which the engine holds temporary registrations.
    pub custodian: Address,
}

impl EngineState {
    /// Create a fresh engine state with the given custodian identity.
    pub fn new(custodian: Address) -> Self {
        Self {
            next_auction_id: 1,
            auctions: HashMap::new(),
            auctions_by_name: HashMap::new(),
            bids: HashMap::new(),
            auction_bidders: HashMap::new(),
            reveal_order: HashMap::new(),
            results: HashMap::new(),
            escrow: EscrowLedger::new(),
            custodian,
        }
    }

    /// Get the next auction ID and increment.
    pub fn allocate_auction_id(&mut self) -> u64 {
        let id = self.next_auction_id;
        self.next_auction_id += 1;
        id
    }

    /// Latest auction for a name, if any.
    pub fn auction_for_name(&self, name: &str) -> Option<&Auction> {
        self.auctions_by_name
            .get(name)
            .and_then(|id| self.auctions.get(id))
    }

    /// Whether a live (unsettled, unlapsed) auction exists for `name`.
    pub fn has_live_auction(&self, name: &str, now: Timestamp) -> bool {
        self.auction_for_name(name)
            .is_some_and(|auction| auction.is_live(now))
    }

    /// All bids for an auction, in commit order.
    pub fn bids_for_auction(&self, auction_id: u64) -> Vec<&Bid> {
        self.auction_bidders
            .get(&auction_id)
            .map(|bidders| {
                bidders
                    .iter()
                    .filter_map(|bidder| self.bids.get(&(auction_id, *bidder)))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Revealed bids for an auction, in reveal order.
    pub fn revealed_bids(&self, auction_id: u64) -> Vec<&Bid> {
        self.reveal_order
            .get(&auction_id)
            .map(|bidders| {
                bidders
                    .iter()
                    .filter_map(|bidder| self.bids.get(&(auction_id, *bidder)))
                    .collect()
            })
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nameauction_types::commit_bid;

    #[test]
    fn test_allocate_auction_id() {
        let mut state = EngineState::new([9u8; 32]);
        assert_eq!(state.allocate_auction_id(), 1);
        assert_eq!(state.allocate_auction_id(), 2);
        assert_eq!(state.allocate_auction_id(), 3);
    }

    #[test]
    fn test_auction_for_name_tracks_latest() {
        let mut state = EngineState::new([9u8; 32]);
        let auction = Auction {
            id: 1,
            name: "hello-world".to_string(),
            starter: [1u8; 32],
            start_deposit: 10,
            bidding_ends_at: 100,
            reveal_ends_at: 200,
            claim_ends_at: 300,
            claimed: false,
            reclaimed: false,
        };
        state.auctions.insert(1, auction.clone());
        state.auctions_by_name.insert("hello-world".to_string(), 1);

        assert_eq!(state.auction_for_name("hello-world").unwrap().id, 1);
        assert!(state.has_live_auction("hello-world", 0));
        assert!(!state.has_live_auction("hello-world", 300));
        assert!(state.auction_for_name("other").is_none());
    }

    #[test]
    fn test_bid_ordering_views() {
        let mut state = EngineState::new([9u8; 32]);
        let a = [1u8; 32];
        let b = [2u8; 32];
        for (i, bidder) in [a, b].into_iter().enumerate() {
            state.bids.insert(
                (1, bidder),
                Bid {
                    bidder,
                    commitment: commit_bid(10, &[0u8; 32], &bidder),
                    deposit: 10,
                    revealed_amount: None,
                    revealed: false,
                    reveal_index: Some(i as u32),
                },
            );
        }
        state.auction_bidders.insert(1, vec![a, b]);
        state.reveal_order.insert(1, vec![b, a]);

        let commit_order: Vec<_> = state.bids_for_auction(1).iter().map(|b| b.bidder).collect();
        let reveal_order: Vec<_> = state.revealed_bids(1).iter().map(|b| b.bidder).collect();
        assert_eq!(commit_order, vec![a, b]);
        assert_eq!(reveal_order, vec![b, a]);
    }
}
