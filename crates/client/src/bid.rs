//! Sealed-bid preparation.

use rand::{CryptoRng, RngCore};

use nameauction_types::{commit_bid, Address, Amount, BidCommitment, Nonce};

/// A prepared sealed bid ready for submission.
///
/// The nonce and amount must be kept secret until the reveal phase;
/// losing the nonce makes the bid unrevealable and forfeits the deposit.
#[derive(Debug, Clone)]
pub struct PreparedBid {
    /// Commitment digest to submit with the bid.
    pub commitment: BidCommitment,
    /// Secret nonce needed at reveal time.
    pub nonce: Nonce,
    /// The committed bid amount.
    pub amount: Amount,
}

/// Prepare a sealed bid: draw a random nonce and compute the commitment
/// binding (amount, nonce, bidder).
pub fn prepare_bid<R: RngCore + CryptoRng>(
    bidder: &Address,
    amount: Amount,
    rng: &mut R,
) -> PreparedBid {
    let mut nonce: Nonce = [0u8; 32];
    rng.fill_bytes(&mut nonce);

    PreparedBid {
        commitment: commit_bid(amount, &nonce, bidder),
        nonce,
        amount,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nameauction_types::verify_bid;
    use rand::rngs::OsRng;

    #[test]
    fn test_prepared_bid_verifies() {
        let bidder = [5u8; 32];
        let prepared = prepare_bid(&bidder, 1234, &mut OsRng);

        assert!(verify_bid(
            &prepared.commitment,
            prepared.amount,
            &prepared.nonce,
            &bidder
        ));
    }

    #[test]
    fn test_nonces_are_fresh() {
        let bidder = [5u8; 32];
        let a = prepare_bid(&bidder, 1234, &mut OsRng);
        let b = prepare_bid(&bidder, 1234, &mut OsRng);

        assert_ne!(a.nonce, b.nonce);
        assert_ne!(a.commitment, b.commitment);
    }
}
