//! Vickrey auction engine for time-limited name ownership.
//!
//! This module implements the commit-reveal, second-price auction that
//! assigns exclusive ownership of names in the registry:
//!
//! - Auction start with custody registration and phase deadlines
//! - Sealed bid submission with deposits
//! - Reveal validation against commitments
//! - Second-price settlement through an escrow ledger
//! - Deposit recovery for lapsed, never-claimed auctions
//!
//! # Architecture
//!
//! - `call`: message types for state-changing operations
//! - `handlers`: business logic for processing calls
//! - `queries`: read-only state access
//! - `state`: engine state structures
//! - `escrow`: per-identity withdrawable balances
//! - `genesis`: initial configuration
//! - `error`: error types
//!
//! # Example
//!
//! ```
//! use nameauction_module::{handlers, AuctionParams, CallContext, EngineState};
//! use nameauction_registry::{NameRegistry, RegistryConfig};
//!
//! let mut state = EngineState::new([0xEE; 32]);
//! let mut registry = NameRegistry::new(RegistryConfig::default());
//! let params = AuctionParams::default();
//!
//! let ctx = CallContext { sender: [1u8; 32], timestamp: 0, value: 100 };
//! let auction_id =
//!     handlers::handle_start(&mut state, &mut registry, &params, &ctx, "hello-world").unwrap();
//! assert_eq!(auction_id, 1);
//! ```

pub mod call;
pub mod error;
pub mod escrow;
pub mod genesis;
pub mod handlers;
pub mod queries;
pub mod state;

pub use call::{AuctionCall, CallResponse};
pub use error::AuctionError;
pub use escrow::EscrowLedger;
pub use genesis::{AuctionParams, GenesisConfig, GenesisValidationError};
pub use handlers::{apply, CallContext, HandlerResult};
pub use queries::{handle_query, AuctionQuery, AuctionQueryResponse, AuctionSummary};
pub use state::EngineState;
