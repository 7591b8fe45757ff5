//! Client-side helpers for the name auction system.
//!
//! The library side covers sealed-bid preparation (nonce generation and
//! commitment computation); the binary wires it to the mock chain's
//! JSON-RPC interface.

pub mod bid;

pub use bid::{prepare_bid, PreparedBid};
