//! Auction engine error types.

use thiserror::Error;

use nameauction_registry::{NameError, RegistryError};

/// Errors that can occur in the auction engine.
///
/// Every variant is a caller-recoverable validation failure. A failed
/// operation retains no partial state mutation, with one documented
/// exception: a reveal whose amount exceeds its deposit is recorded as a
/// non-competitive reveal while still reporting `InsufficientDeposit`
/// (the bidder's deposit becomes refundable at claim).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuctionError {
    #[error("Auction already started for this name")]
    AlreadyActive,

    #[error("Name is not available")]
    NotAvailable,

    #[error("{0}")]
    PhaseClosed(&'static str),

    #[error("Phase not open yet")]
    PhaseNotOpen,

    #[error("Bidder already has a bid on this auction")]
    DuplicateBid,

    #[error("No bid from this caller")]
    NoSuchBid,

    #[error("Revealed bid does not match commitment")]
    BadCommitment,

    #[error("Insufficient deposit")]
    InsufficientDeposit,

    #[error("Already claimed")]
    AlreadyClaimed,

    #[error("No auction for this name")]
    NotFound,

    #[error("Amount arithmetic overflow")]
    Overflow,

    #[error("Nothing to withdraw")]
    NothingToWithdraw,

    #[error(transparent)]
    InvalidName(#[from] NameError),

    #[error(transparent)]
    Registry(#[from] RegistryError),
}

/// `PhaseClosed` message when bidding has ended.
pub const BIDDING_ENDED: &str = "Bidding period already ended";

/// `PhaseClosed` message when reveal is attempted outside its window.
pub const REVEAL_NOT_OPEN: &str = "Reveal period not open yet";
pub const REVEAL_ENDED: &str = "Reveal period already ended";

/// `PhaseClosed` message when the claim window has lapsed.
pub const CLAIM_ENDED: &str = "Claim period already ended";
