//! End-to-end integration tests for the sealed-bid name auction system.
//!
//! These tests exercise the full auction lifecycle against a controlled
//! clock:
//! 1. Auction start with custody registration
//! 2. Sealed bid submission
//! 3. Reveal validation
//! 4. Second-price settlement through the escrow ledger
//! 5. Registry ownership, renewal and metadata afterward

use nameauction_module::{
    handlers, AuctionError, AuctionParams, CallContext, EngineState, GenesisConfig,
};
use nameauction_registry::{NameRegistry, RegistryConfig, RegistryError};
use nameauction_types::{commit_bid, Address, Amount, Nonce, SettlementOutcome, Timestamp};
use rand::rngs::OsRng;
use rand::RngCore;

const NAME: &str = "hello-world";
const CUSTODIAN: Address = [0xEE; 32];
const STARTER: Address = [0x01; 32];
const ALICE: Address = [0x02; 32];
const BOB: Address = [0x03; 32];
const CAROL: Address = [0x04; 32];

const DAY: u64 = 24 * 60 * 60;

/// A minimal chain harness: engine + registry + a clock the test owns.
struct TestChain {
    state: EngineState,
    registry: NameRegistry,
    params: AuctionParams,
    now: Timestamp,
}

impl TestChain {
    fn new() -> Self {
        let config = GenesisConfig::default();
        config.validate().expect("default genesis must validate");
        Self {
            state: EngineState::new(CUSTODIAN),
            registry: NameRegistry::new(RegistryConfig::default()),
            params: config.params,
            now: 1_700_000_000,
        }
    }

    fn advance(&mut self, seconds: u64) {
        self.now += seconds;
    }

    fn ctx(&self, sender: Address, value: Amount) -> CallContext {
        CallContext {
            sender,
            timestamp: self.now,
            value,
        }
    }

    fn start(&mut self, sender: Address, deposit: Amount) -> u64 {
        let ctx = self.ctx(sender, deposit);
        handlers::handle_start(&mut self.state, &mut self.registry, &self.params, &ctx, NAME)
            .expect("start failed")
    }

    /// Commit a bid with a fresh random nonce, returning it for reveal.
    fn bid(&mut self, bidder: Address, amount: Amount, deposit: Amount) -> Nonce {
        let mut nonce: Nonce = [0u8; 32];
        OsRng.fill_bytes(&mut nonce);
        let commitment = commit_bid(amount, &nonce, &bidder);
        let ctx = self.ctx(bidder, deposit);
        handlers::handle_bid(&mut self.state, &ctx, NAME, commitment).expect("bid failed");
        nonce
    }

    fn reveal(&mut self, bidder: Address, amount: Amount, nonce: Nonce) {
        let ctx = self.ctx(bidder, 0);
        handlers::handle_reveal(&mut self.state, &ctx, NAME, amount, nonce).expect("reveal failed");
    }

    fn claim(&mut self, sender: Address) -> SettlementOutcome {
        let ctx = self.ctx(sender, 0);
        handlers::handle_claim(&mut self.state, &mut self.registry, &ctx, NAME)
            .expect("claim failed")
    }

    fn balance(&self, who: &Address) -> Amount {
        self.state.escrow.balance_of(who)
    }

    fn owner(&self) -> Address {
        self.registry.record(NAME).expect("record missing").owner
    }
}

/// Start with a deposit, no bids at all, claim after the reveal window:
/// the starter becomes owner and gets the start deposit back.
#[test]
fn test_zero_bid_auction() {
    let mut chain = TestChain::new();
    chain.start(STARTER, 100);

    assert_eq!(chain.owner(), CUSTODIAN);

    chain.advance(2 * DAY + 1);
    let outcome = chain.claim(STARTER);

    assert_eq!(outcome.winner, STARTER);
    assert_eq!(outcome.price, 0);
    assert_eq!(chain.owner(), STARTER);
    assert_eq!(chain.balance(&STARTER), 100);

    let ctx = chain.ctx(STARTER, 0);
    let paid = handlers::handle_withdraw(&mut chain.state, &ctx).unwrap();
    assert_eq!(paid, 100);
    assert_eq!(chain.balance(&STARTER), 0);
}

/// One bidder reveals above the floor: wins paying the start deposit and
/// is refunded the rest of their deposit.
#[test]
fn test_single_bidder_pays_floor() {
    let mut chain = TestChain::new();
    chain.start(STARTER, 1);

    let nonce = chain.bid(ALICE, 5, 10);
    chain.advance(DAY + 1);
    chain.reveal(ALICE, 5, nonce);
    chain.advance(DAY);

    let outcome = chain.claim(ALICE);

    assert_eq!(outcome.winner, ALICE);
    assert_eq!(outcome.price, 1);
    assert_eq!(chain.owner(), ALICE);
    assert_eq!(chain.balance(&ALICE), 9);
    // Price plus the start deposit back.
    assert_eq!(chain.balance(&STARTER), 2);
}

/// Two bidders: the higher amount wins paying the lower amount, the loser
/// is refunded in full, the starter collects price + start deposit.
#[test]
fn test_two_bidders_second_price() {
    let mut chain = TestChain::new();
    chain.start(STARTER, 1);

    let nonce_a = chain.bid(ALICE, 2, 20);
    let nonce_b = chain.bid(BOB, 7, 10);

    chain.advance(DAY + 1);
    chain.reveal(BOB, 7, nonce_b);
    chain.reveal(ALICE, 2, nonce_a);
    chain.advance(DAY);

    assert_eq!(chain.owner(), CUSTODIAN);
    let outcome = chain.claim(BOB);

    assert_eq!(outcome.winner, BOB);
    assert_eq!(outcome.price, 2);
    assert_eq!(chain.owner(), BOB);
    assert_eq!(chain.balance(&ALICE), 20);
    assert_eq!(chain.balance(&BOB), 8);
    assert_eq!(chain.balance(&STARTER), 3);
}

/// A bidder who never reveals forfeits the whole deposit to the starter
/// at claim.
#[test]
fn test_unrevealed_bid_forfeits() {
    let mut chain = TestChain::new();
    chain.start(STARTER, 1);

    let nonce_a = chain.bid(ALICE, 5, 10);
    chain.bid(BOB, 8, 40); // committed, never revealed

    chain.advance(DAY + 1);
    chain.reveal(ALICE, 5, nonce_a);
    chain.advance(DAY);

    let outcome = chain.claim(ALICE);

    assert_eq!(outcome.winner, ALICE);
    assert_eq!(outcome.forfeited, 40);
    assert_eq!(chain.balance(&BOB), 0);
    // price 1 + forfeit 40 + start deposit 1.
    assert_eq!(chain.balance(&STARTER), 42);
}

/// Claim after the claim window fails, custody lapses on its own, and a
/// fresh start for the same name then succeeds.
#[test]
fn test_lapse_then_restart() {
    let mut chain = TestChain::new();
    chain.start(STARTER, 1);

    chain.advance(3 * DAY + 1);
    let ctx = chain.ctx(STARTER, 0);
    let late = handlers::handle_claim(&mut chain.state, &mut chain.registry, &ctx, NAME);
    assert!(
        matches!(late, Err(AuctionError::PhaseClosed(msg)) if msg == "Claim period already ended")
    );

    let id = chain.start(ALICE, 5);
    assert_eq!(id, 2);

    chain.advance(2 * DAY + 1);
    let outcome = chain.claim(ALICE);
    assert_eq!(outcome.winner, ALICE);
    assert_eq!(chain.owner(), ALICE);
}

/// Deposits stranded in a lapsed auction are recoverable through the
/// explicit reclaim path.
#[test]
fn test_reclaim_lapsed_auction() {
    let mut chain = TestChain::new();
    chain.start(STARTER, 3);
    chain.bid(ALICE, 5, 10);
    chain.bid(BOB, 9, 20);

    chain.advance(3 * DAY + 1);
    let ctx = chain.ctx(CAROL, 0);
    handlers::handle_reclaim(&mut chain.state, &ctx, NAME).unwrap();

    assert_eq!(chain.balance(&ALICE), 10);
    assert_eq!(chain.balance(&BOB), 20);
    assert_eq!(chain.balance(&STARTER), 3);

    // Recovery does not block a fresh auction for the name.
    let id = chain.start(CAROL, 1);
    assert_eq!(id, 2);
}

/// The starter may bid in their own auction. When nothing qualifies the
/// defaulted win must still refund their bid deposit in full, on top of
/// the start deposit.
#[test]
fn test_starter_self_bid_conservation() {
    let mut chain = TestChain::new();
    chain.start(STARTER, 100);

    let nonce = chain.bid(STARTER, 50, 50); // below the floor
    chain.advance(DAY + 1);
    chain.reveal(STARTER, 50, nonce);
    chain.advance(DAY);

    let outcome = chain.claim(STARTER);

    assert_eq!(outcome.winner, STARTER);
    assert_eq!(outcome.price, 0);
    assert_eq!(chain.owner(), STARTER);
    // All 150 collected units come back: 100 start deposit + 50 bid.
    assert_eq!(chain.balance(&STARTER), 150);
}

/// Deposits held by a lapsed auction are released even when a fresh
/// start supersedes it before anyone reclaims.
#[test]
fn test_superseding_start_releases_lapsed_deposits() {
    let mut chain = TestChain::new();
    chain.start(STARTER, 1);
    chain.bid(ALICE, 5, 500);

    chain.advance(3 * DAY + 1);
    let id = chain.start(BOB, 2);

    assert_eq!(id, 2);
    assert_eq!(chain.balance(&ALICE), 500);
    assert_eq!(chain.balance(&STARTER), 1);
}

/// Conservation of value: across any mix of revealed, unrevealed and
/// non-competitive bids, settlement credits sum exactly to the deposits
/// collected.
#[test]
fn test_conservation_across_mixed_bids() {
    let mut chain = TestChain::new();
    chain.start(STARTER, 2);

    let nonce_a = chain.bid(ALICE, 6, 30); // qualifying, loses
    let nonce_b = chain.bid(BOB, 11, 25); // qualifying, wins
    let nonce_c = chain.bid(CAROL, 50, 7); // over-deposit, non-competitive
    chain.bid([0x05; 32], 4, 13); // never revealed

    chain.advance(DAY + 1);
    chain.reveal(ALICE, 6, nonce_a);
    chain.reveal(BOB, 11, nonce_b);
    let ctx = chain.ctx(CAROL, 0);
    let over = handlers::handle_reveal(&mut chain.state, &ctx, NAME, 50, nonce_c);
    assert_eq!(over, Err(AuctionError::InsufficientDeposit));

    chain.advance(DAY);
    let outcome = chain.claim(BOB);

    assert_eq!(outcome.winner, BOB);
    assert_eq!(outcome.price, 6);
    assert_eq!(chain.balance(&CAROL), 7);

    let collected = 2 + 30 + 25 + 7 + 13;
    let distributed = chain.balance(&STARTER)
        + chain.balance(&ALICE)
        + chain.balance(&BOB)
        + chain.balance(&CAROL)
        + chain.balance(&[0x05; 32]);
    assert_eq!(distributed, collected);
}

/// Equal qualifying amounts: the earlier reveal wins.
#[test]
fn test_tie_break_by_reveal_order() {
    let mut chain = TestChain::new();
    chain.start(STARTER, 1);

    let nonce_a = chain.bid(ALICE, 5, 10);
    let nonce_b = chain.bid(BOB, 5, 10);

    chain.advance(DAY + 1);
    chain.reveal(BOB, 5, nonce_b);
    chain.reveal(ALICE, 5, nonce_a);
    chain.advance(DAY);

    let outcome = chain.claim(STARTER);
    assert_eq!(outcome.winner, BOB);
    assert_eq!(outcome.price, 5);
}

/// The winner's registry record behaves like any other ownership
/// afterward: metadata updates are owner-gated, renewal extends the
/// expiry it inherited from the auction, and transfer keeps it.
#[test]
fn test_registry_lifecycle_after_win() {
    let mut chain = TestChain::new();
    chain.start(STARTER, 1);
    let nonce = chain.bid(ALICE, 5, 10);
    chain.advance(DAY + 1);
    chain.reveal(ALICE, 5, nonce);
    chain.advance(DAY);
    chain.claim(ALICE);

    let records = r#"[{"t":"TXT","d":"HELLO WORLD"}]"#;
    chain
        .registry
        .update_records(NAME, ALICE, records.to_string())
        .unwrap();
    assert_eq!(chain.registry.get_records(NAME), Some(records));
    assert_eq!(
        chain.registry.update_records(NAME, BOB, String::new()),
        Err(RegistryError::NotOwner)
    );

    // Expiry carried over from custody is close, so renewal is open.
    let expires_at = chain.registry.record(NAME).unwrap().expires_at;
    chain.registry.renew(NAME, ALICE, chain.now).unwrap();
    assert_eq!(
        chain.registry.record(NAME).unwrap().expires_at,
        expires_at + 365 * DAY
    );

    // Transfer keeps the renewed expiry.
    chain.registry.transfer(NAME, ALICE, BOB).unwrap();
    assert_eq!(chain.owner(), BOB);
    assert_eq!(
        chain.registry.record(NAME).unwrap().expires_at,
        expires_at + 365 * DAY
    );
}

/// A settled auction frees the auction slot, but the name itself stays
/// unavailable while the winner's record is unexpired.
#[test]
fn test_restart_blocked_by_winner_ownership() {
    let mut chain = TestChain::new();
    chain.start(STARTER, 1);
    chain.advance(2 * DAY + 1);
    chain.claim(STARTER);

    let ctx = chain.ctx(ALICE, 10);
    let blocked = handlers::handle_start(
        &mut chain.state,
        &mut chain.registry,
        &chain.params,
        &ctx,
        NAME,
    );
    assert_eq!(blocked, Err(AuctionError::NotAvailable));
}
