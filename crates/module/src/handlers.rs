//! Call handlers for the auction engine.
//!
//! These functions implement the business logic for each call type.
//! Every handler validates fully before mutating, so a failed call
//! leaves engine and registry untouched. The one deliberate exception
//! is documented on [`handle_reveal`].

use crate::call::{AuctionCall, CallResponse};
use crate::error::{
    AuctionError, BIDDING_ENDED, CLAIM_ENDED, REVEAL_ENDED, REVEAL_NOT_OPEN,
};
use crate::genesis::AuctionParams;
use crate::state::EngineState;
use nameauction_registry::{validate_name, NameRegistry};
use nameauction_types::{
    verify_bid, Address, Amount, Auction, Bid, BidCommitment, Nonce, SettlementOutcome, Timestamp,
};

/// Context provided by the runtime for each call.
pub struct CallContext {
    /// Sender of the call.
    pub sender: Address,
    /// Current time from the runtime's clock.
    pub timestamp: Timestamp,
    /// Value attached to the call (deposits).
    pub value: Amount,
}

/// Result type for handlers.
pub type HandlerResult<T> = Result<T, AuctionError>;

/// Dispatch a call to its handler.
pub fn apply(
    state: &mut EngineState,
    registry: &mut NameRegistry,
    params: &AuctionParams,
    ctx: &CallContext,
    call: AuctionCall,
) -> HandlerResult<CallResponse> {
    match call {
        AuctionCall::Start { name } => {
            let auction_id = handle_start(state, registry, params, ctx, &name)?;
            Ok(CallResponse::Started { auction_id })
        }
        AuctionCall::Bid { name, commitment } => {
            handle_bid(state, ctx, &name, commitment)?;
            Ok(CallResponse::Accepted)
        }
        AuctionCall::Reveal {
            name,
            amount,
            nonce,
        } => {
            handle_reveal(state, ctx, &name, amount, nonce)?;
            Ok(CallResponse::Accepted)
        }
        AuctionCall::Claim { name } => {
            let outcome = handle_claim(state, registry, ctx, &name)?;
            Ok(CallResponse::Claimed {
                auction_id: outcome.auction_id,
                winner: outcome.winner,
                price: outcome.price,
            })
        }
        AuctionCall::Reclaim { name } => {
            handle_reclaim(state, ctx, &name)?;
            Ok(CallResponse::Accepted)
        }
        AuctionCall::Withdraw => {
            let amount = handle_withdraw(state, ctx)?;
            Ok(CallResponse::Withdrawn { amount })
        }
    }
}

/// Handle `Start`: open a new auction for a name.
///
/// The attached value is the start deposit, held as the starter's floor
/// bid of last resort. The name is registered to the engine's custodian
/// identity with its expiry aligned to the claim deadline, so unclaimed
/// custody lapses exactly when the claim window closes. Superseding a
/// lapsed auction nobody reclaimed refunds its deposits first.
pub fn handle_start(
    state: &mut EngineState,
    registry: &mut NameRegistry,
    params: &AuctionParams,
    ctx: &CallContext,
    name: &str,
) -> HandlerResult<u64> {
    validate_name(name)?;

    if ctx.value == 0 {
        return Err(AuctionError::InsufficientDeposit);
    }
    if state.has_live_auction(name, ctx.timestamp) {
        return Err(AuctionError::AlreadyActive);
    }
    if !registry.is_available(name, ctx.timestamp) {
        return Err(AuctionError::NotAvailable);
    }

    let bidding_ends_at = ctx
        .timestamp
        .checked_add(params.bid_period)
        .ok_or(AuctionError::Overflow)?;
    let reveal_ends_at = bidding_ends_at
        .checked_add(params.reveal_period)
        .ok_or(AuctionError::Overflow)?;
    let claim_ends_at = reveal_ends_at
        .checked_add(params.claim_period)
        .ok_or(AuctionError::Overflow)?;

    // A lapsed predecessor still holding deposits is refunded before it
    // is superseded; otherwise its funds would be stranded behind the
    // new auction id.
    let lapsed_prev = state
        .auction_for_name(name)
        .filter(|prev| !prev.claimed && !prev.reclaimed)
        .map(|prev| prev.id);
    if let Some(prev_id) = lapsed_prev {
        release_lapsed_deposits(state, prev_id)?;
    }

    // Take custody of the name for the duration of the auction.
    let custodian = state.custodian;
    registry.register(name, custodian, 0, ctx.timestamp)?;
    registry.set_expiry(name, custodian, claim_ends_at)?;

    let auction_id = state.allocate_auction_id();
    state.auctions.insert(
        auction_id,
        Auction {
            id: auction_id,
            name: name.to_string(),
            starter: ctx.sender,
            start_deposit: ctx.value,
            bidding_ends_at,
            reveal_ends_at,
            claim_ends_at,
            claimed: false,
            reclaimed: false,
        },
    );
    state.auctions_by_name.insert(name.to_string(), auction_id);
    state.auction_bidders.insert(auction_id, Vec::new());
    state.reveal_order.insert(auction_id, Vec::new());

    Ok(auction_id)
}

/// Handle `Bid`: record a sealed commitment with its deposit.
///
/// The deposit is held in full and is the maximum the bidder can be
/// charged at settlement.
pub fn handle_bid(
    state: &mut EngineState,
    ctx: &CallContext,
    name: &str,
    commitment: BidCommitment,
) -> HandlerResult<()> {
    let auction = state.auction_for_name(name).ok_or(AuctionError::NotFound)?;

    if ctx.timestamp >= auction.bidding_ends_at {
        return Err(AuctionError::PhaseClosed(BIDDING_ENDED));
    }
    if ctx.value == 0 {
        return Err(AuctionError::InsufficientDeposit);
    }

    let auction_id = auction.id;
    if state.bids.contains_key(&(auction_id, ctx.sender)) {
        return Err(AuctionError::DuplicateBid);
    }

    state.bids.insert(
        (auction_id, ctx.sender),
        Bid {
            bidder: ctx.sender,
            commitment,
            deposit: ctx.value,
            revealed_amount: None,
            revealed: false,
            reveal_index: None,
        },
    );
    state
        .auction_bidders
        .entry(auction_id)
        .or_default()
        .push(ctx.sender);

    Ok(())
}

/// Handle `Reveal`: open a sealed bid inside the reveal window.
///
/// A reveal whose amount exceeds its own deposit cannot be honored: it is
/// still recorded as revealed (so the full deposit is refunded at claim
/// instead of forfeited) but the call reports `InsufficientDeposit` and
/// the bid is excluded from winner and price computation.
pub fn handle_reveal(
    state: &mut EngineState,
    ctx: &CallContext,
    name: &str,
    amount: Amount,
    nonce: Nonce,
) -> HandlerResult<()> {
    let auction = state.auction_for_name(name).ok_or(AuctionError::NotFound)?;

    if ctx.timestamp < auction.bidding_ends_at {
        return Err(AuctionError::PhaseClosed(REVEAL_NOT_OPEN));
    }
    if ctx.timestamp >= auction.reveal_ends_at {
        return Err(AuctionError::PhaseClosed(REVEAL_ENDED));
    }

    let auction_id = auction.id;
    let reveal_index = state
        .reveal_order
        .get(&auction_id)
        .map(|order| order.len())
        .unwrap_or(0) as u32;

    let bid = state
        .bids
        .get_mut(&(auction_id, ctx.sender))
        .ok_or(AuctionError::NoSuchBid)?;

    if bid.revealed {
        return Err(AuctionError::DuplicateBid);
    }
    if !verify_bid(&bid.commitment, amount, &nonce, &ctx.sender) {
        return Err(AuctionError::BadCommitment);
    }

    bid.revealed = true;
    bid.revealed_amount = Some(amount);
    bid.reveal_index = Some(reveal_index);
    let over_deposit = amount > bid.deposit;

    state
        .reveal_order
        .entry(auction_id)
        .or_default()
        .push(ctx.sender);

    if over_deposit {
        return Err(AuctionError::InsufficientDeposit);
    }
    Ok(())
}

/// Handle `Claim`: settle the auction and transfer the name.
///
/// Permissionless; the winner is determined by the bids, not the caller.
/// Effects are atomic: name transfer, winner refund, non-winner refunds
/// and the starter's settlement all land, or none do.
pub fn handle_claim(
    state: &mut EngineState,
    registry: &mut NameRegistry,
    ctx: &CallContext,
    name: &str,
) -> HandlerResult<SettlementOutcome> {
    let auction = state
        .auction_for_name(name)
        .ok_or(AuctionError::NotFound)?
        .clone();

    if auction.claimed {
        return Err(AuctionError::AlreadyClaimed);
    }
    if ctx.timestamp < auction.reveal_ends_at {
        return Err(AuctionError::PhaseNotOpen);
    }
    if ctx.timestamp >= auction.claim_ends_at {
        return Err(AuctionError::PhaseClosed(CLAIM_ENDED));
    }

    let settlement = compute_settlement(state, &auction)?;

    // Custody must still be intact before any effect is applied.
    let custodian = state.custodian;
    match registry.record(name) {
        Some(record) if record.owner == custodian => {}
        _ => return Err(AuctionError::NotAvailable),
    }

    state.escrow.credit_many(&settlement.credits)?;
    registry.transfer(name, custodian, settlement.outcome.winner)?;

    let auction = state
        .auctions
        .get_mut(&auction.id)
        .ok_or(AuctionError::NotFound)?;
    auction.claimed = true;

    let outcome = SettlementOutcome {
        settled_at: ctx.timestamp,
        ..settlement.outcome
    };
    state.results.insert(outcome.auction_id, outcome.clone());

    Ok(outcome)
}

struct Settlement {
    outcome: SettlementOutcome,
    credits: Vec<(Address, Amount)>,
}

/// Compute winner, second price and the full credit plan for an auction.
///
/// Qualifying bids are revealed, deposit-covered and at or above the
/// starter's floor. The winner is the strictly highest qualifying amount,
/// ties broken by earliest reveal. The price is the second-highest
/// qualifying amount, the start deposit when only one bid qualifies, or
/// zero (starter wins the name back for free) when none do.
fn compute_settlement(state: &EngineState, auction: &Auction) -> HandlerResult<Settlement> {
    let floor = auction.start_deposit;

    let qualifying: Vec<&Bid> = state
        .revealed_bids(auction.id)
        .into_iter()
        .filter(|bid| {
            bid.revealed_amount
                .is_some_and(|amount| amount <= bid.deposit && amount >= floor)
        })
        .collect();

    // Reveal order makes the strictly-greater comparison deterministic
    // under ties: the earlier reveal keeps the lead.
    let mut winner_bid: Option<&Bid> = None;
    for bid in &qualifying {
        let amount = bid.revealed_amount.unwrap_or(0);
        let leading = winner_bid.and_then(|b| b.revealed_amount).unwrap_or(0);
        if winner_bid.is_none() || amount > leading {
            winner_bid = Some(bid);
        }
    }

    let (winner, price, winner_refund) = match winner_bid {
        Some(bid) => {
            let mut amounts: Vec<Amount> = qualifying
                .iter()
                .filter_map(|b| b.revealed_amount)
                .collect();
            amounts.sort_unstable_by(|a, b| b.cmp(a));
            let price = if amounts.len() >= 2 { amounts[1] } else { floor };
            let refund = bid
                .deposit
                .checked_sub(price)
                .ok_or(AuctionError::Overflow)?;
            (bid.bidder, price, refund)
        }
        // No qualifying bids: the starter takes the name for free.
        None => (auction.starter, 0, 0),
    };

    // The price-adjusted refund applies only to an actual winning bid.
    // On a defaulted win the starter is the winner without a bid, and any
    // bid they revealed themselves is refunded in full like everyone
    // else's.
    let winning_bidder = winner_bid.map(|bid| bid.bidder);

    let mut credits: Vec<(Address, Amount)> = Vec::new();
    let mut forfeited: Amount = 0;
    for bid in state.bids_for_auction(auction.id) {
        if !bid.revealed {
            forfeited = forfeited
                .checked_add(bid.deposit)
                .ok_or(AuctionError::Overflow)?;
        } else if Some(bid.bidder) == winning_bidder {
            credits.push((bid.bidder, winner_refund));
        } else {
            // Full refund for every other revealed bidder, competitive
            // or not.
            credits.push((bid.bidder, bid.deposit));
        }
    }

    // The starter collects the price, all forfeits, and the start
    // deposit back.
    let starter_credit = price
        .checked_add(forfeited)
        .and_then(|sum| sum.checked_add(auction.start_deposit))
        .ok_or(AuctionError::Overflow)?;
    credits.push((auction.starter, starter_credit));

    Ok(Settlement {
        outcome: SettlementOutcome {
            auction_id: auction.id,
            winner,
            price,
            winner_refund,
            forfeited,
            starter_credit,
            settled_at: 0,
        },
        credits,
    })
}

/// Handle `Reclaim`: recover deposits from a lapsed, never-claimed
/// auction.
///
/// Permissionless. Every bidder's deposit and the starter's start deposit
/// are credited back in full; with no claim there is no winner, no price
/// and no forfeiture. The registry record has already expired on its own
/// (its expiry was the claim deadline), so the name is free to re-start
/// whether or not anyone reclaims — a superseding start releases the
/// deposits itself.
pub fn handle_reclaim(
    state: &mut EngineState,
    ctx: &CallContext,
    name: &str,
) -> HandlerResult<()> {
    let auction = state.auction_for_name(name).ok_or(AuctionError::NotFound)?;

    if auction.claimed || auction.reclaimed {
        return Err(AuctionError::AlreadyClaimed);
    }
    if ctx.timestamp < auction.claim_ends_at {
        return Err(AuctionError::PhaseNotOpen);
    }

    let auction_id = auction.id;
    release_lapsed_deposits(state, auction_id)
}

/// Refund every deposit held by a lapsed auction and mark it reclaimed.
///
/// The caller has already established that the auction is neither
/// claimed nor reclaimed.
fn release_lapsed_deposits(state: &mut EngineState, auction_id: u64) -> HandlerResult<()> {
    let auction = state
        .auctions
        .get(&auction_id)
        .ok_or(AuctionError::NotFound)?
        .clone();

    let mut credits: Vec<(Address, Amount)> = state
        .bids_for_auction(auction.id)
        .into_iter()
        .map(|bid| (bid.bidder, bid.deposit))
        .collect();
    credits.push((auction.starter, auction.start_deposit));

    state.escrow.credit_many(&credits)?;

    let auction = state
        .auctions
        .get_mut(&auction_id)
        .ok_or(AuctionError::NotFound)?;
    auction.reclaimed = true;

    Ok(())
}

/// Handle `Withdraw`: pay out the caller's escrow balance.
pub fn handle_withdraw(state: &mut EngineState, ctx: &CallContext) -> HandlerResult<Amount> {
    state.escrow.withdraw(&ctx.sender)
}
