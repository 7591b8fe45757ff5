//! Mock chain server for local testing of the name auction system.
//!
//! This provides a JSON-RPC server that simulates a chain runtime around
//! the auction engine and name registry: an adjustable clock, identified
//! callers with attached value, and query access — without requiring a
//! real blockchain.

use anyhow::Result;
use jsonrpsee::core::async_trait;
use jsonrpsee::proc_macros::rpc;
use jsonrpsee::server::Server;
use jsonrpsee::types::ErrorObjectOwned;
use parking_lot::RwLock;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::info;

use nameauction_module::{
    apply, AuctionCall, CallContext, CallResponse, EngineState, GenesisConfig,
};
use nameauction_registry::NameRegistry;
use nameauction_types::{Address, BidCommitment, Nonce, Timestamp};

mod types;
use types::*;

/// Shared chain state.
///
/// The lock serializes every mutating call, which is exactly the
/// single-writer discipline the engine expects.
struct ChainState {
    registry: NameRegistry,
    engine: EngineState,
    config: GenesisConfig,
    /// Current timestamp (simulated, can be advanced).
    timestamp: Timestamp,
}

impl ChainState {
    fn new(config: GenesisConfig) -> Self {
        Self {
            registry: NameRegistry::new(config.registry.clone()),
            engine: EngineState::new(config.custodian),
            config,
            timestamp: 0,
        }
    }
}

/// RPC API definition for the mock chain.
#[rpc(server)]
pub trait NameChainApi {
    // ============ Admin Methods ============

    /// Set the current timestamp (for testing time-dependent logic).
    #[method(name = "admin_setTimestamp")]
    async fn admin_set_timestamp(&self, timestamp: u64) -> Result<TimeInfo, ErrorObjectOwned>;

    /// Advance the clock by `delta` seconds.
    #[method(name = "admin_advanceTime")]
    async fn admin_advance_time(&self, delta: u64) -> Result<TimeInfo, ErrorObjectOwned>;

    /// Get the current chain time.
    #[method(name = "chain_getTime")]
    async fn chain_get_time(&self) -> Result<TimeInfo, ErrorObjectOwned>;

    // ============ Auction Methods ============

    /// Start an auction for a name, attaching the start deposit.
    #[method(name = "auction_start")]
    async fn auction_start(
        &self,
        sender: String,
        name: String,
        deposit: u64,
    ) -> Result<u64, ErrorObjectOwned>;

    /// Submit a sealed bid (hex commitment), attaching the deposit.
    #[method(name = "auction_bid")]
    async fn auction_bid(
        &self,
        sender: String,
        name: String,
        commitment: String,
        deposit: u64,
    ) -> Result<bool, ErrorObjectOwned>;

    /// Reveal a committed bid.
    #[method(name = "auction_reveal")]
    async fn auction_reveal(
        &self,
        sender: String,
        name: String,
        amount: u64,
        nonce: String,
    ) -> Result<bool, ErrorObjectOwned>;

    /// Claim a claimable auction (permissionless).
    #[method(name = "auction_claim")]
    async fn auction_claim(
        &self,
        sender: String,
        name: String,
    ) -> Result<SettlementRpc, ErrorObjectOwned>;

    /// Recover deposits from a lapsed auction (permissionless).
    #[method(name = "auction_reclaim")]
    async fn auction_reclaim(&self, sender: String, name: String)
        -> Result<bool, ErrorObjectOwned>;

    // ============ Escrow Methods ============

    /// Withdraw the sender's escrow balance.
    #[method(name = "escrow_withdraw")]
    async fn escrow_withdraw(&self, sender: String) -> Result<u64, ErrorObjectOwned>;

    /// Read an escrow balance.
    #[method(name = "escrow_balance")]
    async fn escrow_balance(&self, address: String) -> Result<u64, ErrorObjectOwned>;

    // ============ Registry Methods ============

    /// Transfer an owned name.
    #[method(name = "registry_transfer")]
    async fn registry_transfer(
        &self,
        sender: String,
        name: String,
        new_owner: String,
    ) -> Result<bool, ErrorObjectOwned>;

    /// Renew an owned name inside its renewal window.
    #[method(name = "registry_renew")]
    async fn registry_renew(&self, sender: String, name: String) -> Result<bool, ErrorObjectOwned>;

    /// Replace the metadata records of an owned name.
    #[method(name = "registry_updateRecords")]
    async fn registry_update_records(
        &self,
        sender: String,
        name: String,
        records: String,
    ) -> Result<bool, ErrorObjectOwned>;

    /// Read the metadata records of a name.
    #[method(name = "registry_getRecords")]
    async fn registry_get_records(&self, name: String)
        -> Result<Option<String>, ErrorObjectOwned>;

    // ============ Query Methods ============

    /// Get the ownership record for a name.
    #[method(name = "query_getName")]
    async fn query_get_name(&self, name: String)
        -> Result<Option<NameRecordRpc>, ErrorObjectOwned>;

    /// Get the latest auction for a name.
    #[method(name = "query_getAuction")]
    async fn query_get_auction(&self, name: String)
        -> Result<Option<AuctionRpc>, ErrorObjectOwned>;

    /// Get the bids on the latest auction for a name, in commit order.
    #[method(name = "query_getBids")]
    async fn query_get_bids(&self, name: String) -> Result<Vec<BidRpc>, ErrorObjectOwned>;

    /// Get the settlement result for an auction.
    #[method(name = "query_getResult")]
    async fn query_get_result(
        &self,
        auction_id: u64,
    ) -> Result<Option<SettlementRpc>, ErrorObjectOwned>;

    /// List all auctions.
    #[method(name = "query_listAuctions")]
    async fn query_list_auctions(&self) -> Result<Vec<AuctionRpc>, ErrorObjectOwned>;
}

/// Implementation of the mock chain RPC server.
struct NameChainServer {
    state: Arc<RwLock<ChainState>>,
}

impl NameChainServer {
    fn new(config: GenesisConfig) -> Self {
        Self {
            state: Arc::new(RwLock::new(ChainState::new(config))),
        }
    }

    fn rpc_error(msg: impl ToString) -> ErrorObjectOwned {
        ErrorObjectOwned::owned(-32000, msg.to_string(), None::<()>)
    }

    /// Run an engine call under the lock with the sender's context.
    fn dispatch(
        &self,
        sender: &str,
        value: u64,
        call: AuctionCall,
    ) -> Result<CallResponse, ErrorObjectOwned> {
        let mut state = self.state.write();
        let ctx = CallContext {
            sender: parse_address(sender),
            timestamp: state.timestamp,
            value,
        };
        let ChainState {
            registry,
            engine,
            config,
            ..
        } = &mut *state;
        apply(engine, registry, &config.params, &ctx, call).map_err(Self::rpc_error)
    }
}

#[async_trait]
impl NameChainApiServer for NameChainServer {
    async fn admin_set_timestamp(&self, timestamp: u64) -> Result<TimeInfo, ErrorObjectOwned> {
        let mut state = self.state.write();
        state.timestamp = timestamp;
        Ok(TimeInfo { timestamp })
    }

    async fn admin_advance_time(&self, delta: u64) -> Result<TimeInfo, ErrorObjectOwned> {
        let mut state = self.state.write();
        state.timestamp = state.timestamp.saturating_add(delta);
        Ok(TimeInfo {
            timestamp: state.timestamp,
        })
    }

    async fn chain_get_time(&self) -> Result<TimeInfo, ErrorObjectOwned> {
        let state = self.state.read();
        Ok(TimeInfo {
            timestamp: state.timestamp,
        })
    }

    async fn auction_start(
        &self,
        sender: String,
        name: String,
        deposit: u64,
    ) -> Result<u64, ErrorObjectOwned> {
        let response = self.dispatch(&sender, deposit, AuctionCall::Start { name: name.clone() })?;
        match response {
            CallResponse::Started { auction_id } => {
                info!(name = %name, auction_id, "auction started");
                Ok(auction_id)
            }
            _ => Err(Self::rpc_error("unexpected response")),
        }
    }

    async fn auction_bid(
        &self,
        sender: String,
        name: String,
        commitment: String,
        deposit: u64,
    ) -> Result<bool, ErrorObjectOwned> {
        let commitment = BidCommitment(parse_digest(&commitment)?);
        self.dispatch(&sender, deposit, AuctionCall::Bid { name, commitment })?;
        Ok(true)
    }

    async fn auction_reveal(
        &self,
        sender: String,
        name: String,
        amount: u64,
        nonce: String,
    ) -> Result<bool, ErrorObjectOwned> {
        let nonce: Nonce = parse_digest(&nonce)?;
        self.dispatch(
            &sender,
            0,
            AuctionCall::Reveal {
                name,
                amount,
                nonce,
            },
        )?;
        Ok(true)
    }

    async fn auction_claim(
        &self,
        sender: String,
        name: String,
    ) -> Result<SettlementRpc, ErrorObjectOwned> {
        let response = self.dispatch(&sender, 0, AuctionCall::Claim { name: name.clone() })?;
        let auction_id = match response {
            CallResponse::Claimed { auction_id, .. } => auction_id,
            _ => return Err(Self::rpc_error("unexpected response")),
        };
        let state = self.state.read();
        let outcome = state
            .engine
            .results
            .get(&auction_id)
            .ok_or_else(|| Self::rpc_error("settlement result missing"))?;
        info!(name = %name, auction_id, price = outcome.price, "auction claimed");
        Ok(SettlementRpc::from(outcome))
    }

    async fn auction_reclaim(
        &self,
        sender: String,
        name: String,
    ) -> Result<bool, ErrorObjectOwned> {
        self.dispatch(&sender, 0, AuctionCall::Reclaim { name: name.clone() })?;
        info!(name = %name, "lapsed auction reclaimed");
        Ok(true)
    }

    async fn escrow_withdraw(&self, sender: String) -> Result<u64, ErrorObjectOwned> {
        let response = self.dispatch(&sender, 0, AuctionCall::Withdraw)?;
        match response {
            CallResponse::Withdrawn { amount } => Ok(amount),
            _ => Err(Self::rpc_error("unexpected response")),
        }
    }

    async fn escrow_balance(&self, address: String) -> Result<u64, ErrorObjectOwned> {
        let state = self.state.read();
        Ok(state.engine.escrow.balance_of(&parse_address(&address)))
    }

    async fn registry_transfer(
        &self,
        sender: String,
        name: String,
        new_owner: String,
    ) -> Result<bool, ErrorObjectOwned> {
        let mut state = self.state.write();
        state
            .registry
            .transfer(&name, parse_address(&sender), parse_address(&new_owner))
            .map_err(Self::rpc_error)?;
        Ok(true)
    }

    async fn registry_renew(&self, sender: String, name: String) -> Result<bool, ErrorObjectOwned> {
        let mut state = self.state.write();
        let now = state.timestamp;
        state
            .registry
            .renew(&name, parse_address(&sender), now)
            .map_err(Self::rpc_error)?;
        Ok(true)
    }

    async fn registry_update_records(
        &self,
        sender: String,
        name: String,
        records: String,
    ) -> Result<bool, ErrorObjectOwned> {
        let mut state = self.state.write();
        state
            .registry
            .update_records(&name, parse_address(&sender), records)
            .map_err(Self::rpc_error)?;
        Ok(true)
    }

    async fn registry_get_records(
        &self,
        name: String,
    ) -> Result<Option<String>, ErrorObjectOwned> {
        let state = self.state.read();
        Ok(state.registry.get_records(&name).map(String::from))
    }

    async fn query_get_name(
        &self,
        name: String,
    ) -> Result<Option<NameRecordRpc>, ErrorObjectOwned> {
        let state = self.state.read();
        Ok(state.registry.record(&name).map(NameRecordRpc::from))
    }

    async fn query_get_auction(
        &self,
        name: String,
    ) -> Result<Option<AuctionRpc>, ErrorObjectOwned> {
        let state = self.state.read();
        Ok(state
            .engine
            .auction_for_name(&name)
            .map(|auction| AuctionRpc::from_auction(auction, state.timestamp)))
    }

    async fn query_get_bids(&self, name: String) -> Result<Vec<BidRpc>, ErrorObjectOwned> {
        let state = self.state.read();
        let bids = state
            .engine
            .auction_for_name(&name)
            .map(|auction| {
                state
                    .engine
                    .bids_for_auction(auction.id)
                    .into_iter()
                    .map(BidRpc::from)
                    .collect()
            })
            .unwrap_or_default();
        Ok(bids)
    }

    async fn query_get_result(
        &self,
        auction_id: u64,
    ) -> Result<Option<SettlementRpc>, ErrorObjectOwned> {
        let state = self.state.read();
        Ok(state.engine.results.get(&auction_id).map(SettlementRpc::from))
    }

    async fn query_list_auctions(&self) -> Result<Vec<AuctionRpc>, ErrorObjectOwned> {
        let state = self.state.read();
        let mut auctions: Vec<AuctionRpc> = state
            .engine
            .auctions
            .values()
            .map(|auction| AuctionRpc::from_auction(auction, state.timestamp))
            .collect();
        auctions.sort_by_key(|a| a.id);
        Ok(auctions)
    }
}

fn parse_address(s: &str) -> Address {
    let mut addr = [0u8; 32];
    if let Ok(bytes) = hex::decode(s.trim_start_matches("0x")) {
        let len = bytes.len().min(32);
        addr[..len].copy_from_slice(&bytes[..len]);
    }
    addr
}

fn parse_digest(s: &str) -> Result<[u8; 32], ErrorObjectOwned> {
    let bytes = hex::decode(s.trim_start_matches("0x"))
        .map_err(|_| NameChainServer::rpc_error("invalid hex digest"))?;
    bytes
        .try_into()
        .map_err(|_| NameChainServer::rpc_error("digest must be 32 bytes"))
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("mock_chain=info".parse()?)
                .add_directive("jsonrpsee=warn".parse()?),
        )
        .init();

    let config = GenesisConfig::default();
    config.validate()?;

    let addr: SocketAddr = "127.0.0.1:9944".parse()?;

    info!("Starting mock chain server on {}", addr);

    let server = Server::builder().build(addr).await?;
    let handle = server.start(NameChainServer::new(config).into_rpc());

    info!("Mock chain server running. Press Ctrl+C to stop.");

    tokio::signal::ctrl_c().await?;

    info!("Shutting down...");
    handle.stop()?;
    handle.stopped().await;

    Ok(())
}
