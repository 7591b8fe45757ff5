//! Call message types for the auction engine.

use borsh::{BorshDeserialize, BorshSerialize};

use nameauction_types::{Address, Amount, BidCommitment, Nonce};

/// State-changing calls accepted by the engine.
///
/// Deposits ride on the call context's attached value, not on the
/// message itself.
#[derive(Clone, Debug, BorshSerialize, BorshDeserialize)]
pub enum AuctionCall {
    /// Start an auction for a name. Attached value is the start deposit.
    Start { name: String },

    /// Submit a sealed bid. Attached value is the deposit.
    Bid {
        name: String,
        commitment: BidCommitment,
    },

    /// Reveal a previously committed bid.
    Reveal {
        name: String,
        amount: Amount,
        nonce: Nonce,
    },

    /// Settle the auction and transfer the name to the winner
    /// (permissionless).
    Claim { name: String },

    /// Recover deposits from a lapsed, never-claimed auction
    /// (permissionless).
    Reclaim { name: String },

    /// Withdraw the caller's escrow balance.
    Withdraw,
}

/// Responses from applying a call.
#[derive(Clone, Debug, BorshSerialize, BorshDeserialize)]
pub enum CallResponse {
    /// New auction id from `Start`.
    Started { auction_id: u64 },

    /// Acknowledgement for `Bid`, `Reveal` and `Reclaim`.
    Accepted,

    /// Settlement summary from `Claim`.
    Claimed {
        auction_id: u64,
        winner: Address,
        price: Amount,
    },

    /// Amount paid out by `Withdraw`.
    Withdrawn { amount: Amount },
}
