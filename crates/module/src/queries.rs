//! Query handlers for the auction engine.
//!
//! These functions provide read-only access to engine state.

use serde::{Deserialize, Serialize};

use crate::state::EngineState;
use nameauction_types::{Address, Amount, Auction, AuctionPhase, Bid, SettlementOutcome, Timestamp};

/// Query request types.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum AuctionQuery {
    /// Latest auction for a name.
    GetAuction { name: String },

    /// Auction by ID.
    GetAuctionById { auction_id: u64 },

    /// A specific bid.
    GetBid { auction_id: u64, bidder: Address },

    /// All bids for an auction, in commit order.
    GetAuctionBids { auction_id: u64 },

    /// Settlement result for an auction.
    GetResult { auction_id: u64 },

    /// A caller's withdrawable balance.
    GetEscrow { address: Address },

    /// All auctions (paginated).
    ListAuctions { offset: u64, limit: u64 },
}

/// Query response types.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum AuctionQueryResponse {
    Auction(Option<Auction>),
    Bid(Option<Bid>),
    Bids(Vec<Bid>),
    Result(Option<SettlementOutcome>),
    Escrow(Amount),
    AuctionList(Vec<Auction>),
}

/// Handle a query.
pub fn handle_query(state: &EngineState, query: AuctionQuery) -> AuctionQueryResponse {
    match query {
        AuctionQuery::GetAuction { name } => {
            AuctionQueryResponse::Auction(state.auction_for_name(&name).cloned())
        }

        AuctionQuery::GetAuctionById { auction_id } => {
            AuctionQueryResponse::Auction(state.auctions.get(&auction_id).cloned())
        }

        AuctionQuery::GetBid { auction_id, bidder } => {
            AuctionQueryResponse::Bid(state.bids.get(&(auction_id, bidder)).cloned())
        }

        AuctionQuery::GetAuctionBids { auction_id } => {
            let bids = state
                .bids_for_auction(auction_id)
                .into_iter()
                .cloned()
                .collect();
            AuctionQueryResponse::Bids(bids)
        }

        AuctionQuery::GetResult { auction_id } => {
            AuctionQueryResponse::Result(state.results.get(&auction_id).cloned())
        }

        AuctionQuery::GetEscrow { address } => {
            AuctionQueryResponse::Escrow(state.escrow.balance_of(&address))
        }

        AuctionQuery::ListAuctions { offset, limit } => {
            let mut auctions: Vec<Auction> = state.auctions.values().cloned().collect();
            auctions.sort_by_key(|a| a.id);
            let auctions = auctions
                .into_iter()
                .skip(offset as usize)
                .take(limit as usize)
                .collect();
            AuctionQueryResponse::AuctionList(auctions)
        }
    }
}

/// Summary of an auction for listing.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AuctionSummary {
    pub auction_id: u64,
    pub name: String,
    pub starter: Address,
    pub phase: AuctionPhase,
    pub num_bids: usize,
    pub bidding_ends_at: Timestamp,
    pub claim_ends_at: Timestamp,
}

impl AuctionSummary {
    /// Build a summary from an auction and its bid count.
    pub fn from_auction(auction: &Auction, num_bids: usize, now: Timestamp) -> Self {
        Self {
            auction_id: auction.id,
            name: auction.name.clone(),
            starter: auction.starter,
            phase: auction.phase(now),
            num_bids,
            bidding_ends_at: auction.bidding_ends_at,
            claim_ends_at: auction.claim_ends_at,
        }
    }
}

/// Auctions currently in their bidding or reveal phase.
pub fn get_active_auctions(state: &EngineState, now: Timestamp) -> Vec<AuctionSummary> {
    let mut summaries: Vec<AuctionSummary> = state
        .auctions
        .values()
        .filter(|auction| {
            matches!(
                auction.phase(now),
                AuctionPhase::Bidding | AuctionPhase::Revealing
            )
        })
        .map(|auction| {
            let num_bids = state
                .auction_bidders
                .get(&auction.id)
                .map(|v| v.len())
                .unwrap_or(0);
            AuctionSummary::from_auction(auction, num_bids, now)
        })
        .collect();
    summaries.sort_by_key(|s| s.auction_id);
    summaries
}

/// Lapsed, never-claimed auctions whose deposits are still recoverable.
pub fn get_reclaimable_auctions(state: &EngineState, now: Timestamp) -> Vec<u64> {
    let mut ids: Vec<u64> = state
        .auctions
        .values()
        .filter(|a| a.phase(now) == AuctionPhase::Lapsed && !a.reclaimed)
        .map(|a| a.id)
        .collect();
    ids.sort_unstable();
    ids
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::genesis::AuctionParams;
    use crate::handlers::{handle_start, CallContext};
    use nameauction_registry::{NameRegistry, RegistryConfig};

    fn started_state() -> EngineState {
        let mut state = EngineState::new([0xEE; 32]);
        let mut registry = NameRegistry::new(RegistryConfig::default());
        let params = AuctionParams {
            bid_period: 100,
            reveal_period: 100,
            claim_period: 100,
        };
        let ctx = CallContext {
            sender: [1u8; 32],
            timestamp: 0,
            value: 50,
        };
        handle_start(&mut state, &mut registry, &params, &ctx, "hello-world").unwrap();
        state
    }

    #[test]
    fn test_get_auction_by_name() {
        let state = started_state();
        let response = handle_query(
            &state,
            AuctionQuery::GetAuction {
                name: "hello-world".to_string(),
            },
        );
        match response {
            AuctionQueryResponse::Auction(Some(auction)) => assert_eq!(auction.id, 1),
            other => panic!("unexpected response: {other:?}"),
        }
    }

    #[test]
    fn test_get_escrow_empty() {
        let state = started_state();
        let response = handle_query(
            &state,
            AuctionQuery::GetEscrow {
                address: [1u8; 32],
            },
        );
        assert!(matches!(response, AuctionQueryResponse::Escrow(0)));
    }

    #[test]
    fn test_active_and_reclaimable() {
        let state = started_state();

        let active = get_active_auctions(&state, 50);
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].phase, AuctionPhase::Bidding);

        assert!(get_reclaimable_auctions(&state, 50).is_empty());
        assert_eq!(get_reclaimable_auctions(&state, 300), vec![1]);
    }
}
