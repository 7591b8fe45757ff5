//! CLI for the sealed-bid name auction system.
//!
//! This binary provides commands for:
//! - Starting auctions
//! - Submitting sealed bids (the commitment nonce is generated locally)
//! - Revealing bids
//! - Claiming, reclaiming and withdrawing
//! - Querying names, auctions and balances

use anyhow::Result;
use clap::{Parser, Subcommand};
use jsonrpsee::core::client::ClientT;
use jsonrpsee::http_client::{HttpClient, HttpClientBuilder};
use jsonrpsee::rpc_params;
use rand::rngs::OsRng;
use serde_json::Value;
use tracing::info;

use nameauction_client::prepare_bid;
use nameauction_types::Address;

#[derive(Parser)]
#[command(name = "nameauction-cli")]
#[command(about = "CLI for sealed-bid name auctions")]
struct Cli {
    /// Mock chain RPC endpoint
    #[arg(long, default_value = "http://127.0.0.1:9944")]
    rpc: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start an auction for a name
    Start {
        /// Sender address (hex)
        #[arg(long)]
        sender: String,

        /// Name to auction
        name: String,

        /// Start deposit, the floor price of the auction
        #[arg(long)]
        deposit: u64,
    },

    /// Submit a sealed bid; prints the nonce needed at reveal time
    Bid {
        /// Sender address (hex)
        #[arg(long)]
        sender: String,

        /// Name being auctioned
        name: String,

        /// Bid amount (kept secret until reveal)
        #[arg(long)]
        amount: u64,

        /// Deposit to attach; the most the bid can be charged
        #[arg(long)]
        deposit: u64,
    },

    /// Reveal a previously committed bid
    Reveal {
        /// Sender address (hex)
        #[arg(long)]
        sender: String,

        /// Name being auctioned
        name: String,

        /// The committed amount
        #[arg(long)]
        amount: u64,

        /// Nonce printed at bid time (hex)
        #[arg(long)]
        nonce: String,
    },

    /// Claim a claimable auction
    Claim {
        #[arg(long)]
        sender: String,
        name: String,
    },

    /// Recover deposits from a lapsed auction
    Reclaim {
        #[arg(long)]
        sender: String,
        name: String,
    },

    /// Withdraw the sender's escrow balance
    Withdraw {
        #[arg(long)]
        sender: String,
    },

    /// Show an escrow balance
    Balance {
        /// Address (hex)
        address: String,
    },

    /// Show the ownership record for a name
    ShowName { name: String },

    /// Show the latest auction for a name
    ShowAuction { name: String },

    /// Show the bids on the latest auction for a name
    ShowBids { name: String },

    /// Advance the mock chain clock (testing)
    AdvanceTime {
        /// Seconds to advance
        seconds: u64,
    },

    /// Show the current chain time
    Time,
}

fn parse_address(s: &str) -> Address {
    let mut addr = [0u8; 32];
    if let Ok(bytes) = hex::decode(s.trim_start_matches("0x")) {
        let len = bytes.len().min(32);
        addr[..len].copy_from_slice(&bytes[..len]);
    }
    addr
}

async fn run(client: HttpClient, command: Commands) -> Result<()> {
    match command {
        Commands::Start {
            sender,
            name,
            deposit,
        } => {
            let auction_id: u64 = client
                .request("auction_start", rpc_params![sender, name, deposit])
                .await?;
            println!("Auction started: id {auction_id}");
        }

        Commands::Bid {
            sender,
            name,
            amount,
            deposit,
        } => {
            let bidder = parse_address(&sender);
            let prepared = prepare_bid(&bidder, amount, &mut OsRng);
            let commitment = hex::encode(prepared.commitment.0);

            let _: bool = client
                .request(
                    "auction_bid",
                    rpc_params![sender, name, commitment, deposit],
                )
                .await?;

            println!("Bid submitted.");
            println!("Keep this nonce secret until reveal time:");
            println!("  nonce:  {}", hex::encode(prepared.nonce));
            println!("  amount: {}", prepared.amount);
        }

        Commands::Reveal {
            sender,
            name,
            amount,
            nonce,
        } => {
            let _: bool = client
                .request("auction_reveal", rpc_params![sender, name, amount, nonce])
                .await?;
            println!("Bid revealed.");
        }

        Commands::Claim { sender, name } => {
            let outcome: Value = client
                .request("auction_claim", rpc_params![sender, name])
                .await?;
            println!("{}", serde_json::to_string_pretty(&outcome)?);
        }

        Commands::Reclaim { sender, name } => {
            let _: bool = client
                .request("auction_reclaim", rpc_params![sender, name])
                .await?;
            println!("Deposits recovered to escrow.");
        }

        Commands::Withdraw { sender } => {
            let amount: u64 = client.request("escrow_withdraw", rpc_params![sender]).await?;
            println!("Withdrew {amount}");
        }

        Commands::Balance { address } => {
            let balance: u64 = client
                .request("escrow_balance", rpc_params![address])
                .await?;
            println!("{balance}");
        }

        Commands::ShowName { name } => {
            let record: Value = client.request("query_getName", rpc_params![name]).await?;
            println!("{}", serde_json::to_string_pretty(&record)?);
        }

        Commands::ShowAuction { name } => {
            let auction: Value = client
                .request("query_getAuction", rpc_params![name])
                .await?;
            println!("{}", serde_json::to_string_pretty(&auction)?);
        }

        Commands::ShowBids { name } => {
            let bids: Value = client.request("query_getBids", rpc_params![name]).await?;
            println!("{}", serde_json::to_string_pretty(&bids)?);
        }

        Commands::AdvanceTime { seconds } => {
            let time: Value = client
                .request("admin_advanceTime", rpc_params![seconds])
                .await?;
            println!("{time}");
        }

        Commands::Time => {
            let time: Value = client.request("chain_getTime", rpc_params![]).await?;
            println!("{time}");
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    info!("Connecting to {}", cli.rpc);
    let client = HttpClientBuilder::default().build(&cli.rpc)?;

    run(client, cli.command).await
}
