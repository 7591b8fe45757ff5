//! Commit-reveal commitment scheme for sealed bids.
//!
//! A commitment binds (bid amount, secret nonce, bidder identity) into a
//! single SHA-256 digest. Binding the bidder's address into the preimage
//! means a commitment observed on the wire cannot be replayed by a
//! different bidder.

use borsh::{BorshDeserialize, BorshSerialize};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::{Address, Amount};

/// Secret salt chosen by the bidder at commit time.
pub type Nonce = [u8; 32];

/// Salted hash of a sealed bid.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, BorshSerialize, BorshDeserialize, Serialize,
    Deserialize,
)]
pub struct BidCommitment(pub [u8; 32]);

const COMMITMENT_DOMAIN: &[u8] = b"NAME_AUCTION_BID_V1:";

/// Compute the commitment for a bid.
pub fn commit_bid(amount: Amount, nonce: &Nonce, bidder: &Address) -> BidCommitment {
    let mut hasher = Sha256::new();
    hasher.update(COMMITMENT_DOMAIN);
    hasher.update(amount.to_le_bytes());
    hasher.update(nonce);
    hasher.update(bidder);
    BidCommitment(hasher.finalize().into())
}

/// Verify a revealed (amount, nonce) pair against a stored commitment.
pub fn verify_bid(
    commitment: &BidCommitment,
    amount: Amount,
    nonce: &Nonce,
    bidder: &Address,
) -> bool {
    commit_bid(amount, nonce, bidder) == *commitment
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_commit_and_verify() {
        let bidder = [7u8; 32];
        let nonce = [42u8; 32];
        let commitment = commit_bid(500, &nonce, &bidder);

        assert!(verify_bid(&commitment, 500, &nonce, &bidder));
    }

    #[test]
    fn test_wrong_amount_fails() {
        let bidder = [7u8; 32];
        let nonce = [42u8; 32];
        let commitment = commit_bid(500, &nonce, &bidder);

        assert!(!verify_bid(&commitment, 501, &nonce, &bidder));
    }

    #[test]
    fn test_wrong_nonce_fails() {
        let bidder = [7u8; 32];
        let commitment = commit_bid(500, &[42u8; 32], &bidder);

        assert!(!verify_bid(&commitment, 500, &[43u8; 32], &bidder));
    }

    #[test]
    fn test_bound_to_bidder() {
        // The same (amount, nonce) committed by another bidder must not
        // verify: commitments are not replayable across identities.
        let nonce = [42u8; 32];
        let commitment = commit_bid(500, &nonce, &[7u8; 32]);

        assert!(!verify_bid(&commitment, 500, &nonce, &[8u8; 32]));
    }

    #[test]
    fn test_deterministic() {
        let bidder = [1u8; 32];
        let nonce = [2u8; 32];
        assert_eq!(commit_bid(9, &nonce, &bidder), commit_bid(9, &nonce, &bidder));
    }
}
