//! Terminal client for the NFT marketplace.
//!
//! ```text
//! nft-market [--config market.toml] [--simulate] [--json-logs]
//! ```
//!
//! The wallet key is read from the variable named by `wallet_key_env`
//! (`MARKET_PRIVATE_KEY` by default). `--simulate` runs against an in-memory
//! marketplace seeded with a few listings instead of a node.

use anyhow::{Context, Result};
use clap::Parser;
use ethers::types::{Address, U256};
use nft_market_client::api::{Choice, TerminalInteraction, parse_choice};
use nft_market_client::application::services::ConnectionManager;
use nft_market_client::application::{Event, MarketApp};
use nft_market_client::config::MarketConfig;
use nft_market_client::domain::EtherAmount;
use nft_market_client::infrastructure::blockchain::{
    InMemoryMarketplace, KeyWallet, ListingRecord, WalletProvider,
};
use nft_market_client::infrastructure::logging::init_tracing;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Debug, Parser)]
#[command(name = "nft-market", version, about = "NFT marketplace terminal client")]
struct Args {
    /// TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Use a simulated marketplace instead of the configured network.
    #[arg(long)]
    simulate: bool,

    /// Emit logs as JSON.
    #[arg(long)]
    json_logs: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();
    init_tracing(args.json_logs).map_err(|e| anyhow::anyhow!("failed to initialise logging: {e}"))?;

    let config = MarketConfig::load(args.config.as_deref()).context("failed to load configuration")?;
    tracing::info!(
        network = %config.network(),
        marketplace = ?config.marketplace_address(),
        simulate = args.simulate,
        "starting"
    );

    let wallet = if args.simulate {
        Some(simulated_wallet(&config).await?)
    } else {
        KeyWallet::detect(&config).map(|w| Arc::new(w) as Arc<dyn WalletProvider>)
    };

    let terminal = Arc::new(TerminalInteraction::stdio());
    let mut app = MarketApp::new(&config, ConnectionManager::new(wallet), terminal.clone())
        .context("failed to start client")?;

    loop {
        terminal.say(&app.view().to_string()).await?;
        if let Ok(Some(approved)) = app.approval_status().await {
            terminal
                .say(&format!("Marketplace approved: {}", if approved { "yes" } else { "no" }))
                .await?;
        }

        let Some(answer) = terminal.read_line("Choose [number, r, q]").await? else {
            break;
        };
        let event = match parse_choice(&app.view(), &answer) {
            Some(Choice::Quit) => break,
            Some(Choice::Refresh) => Event::RefreshRequested,
            Some(Choice::Press(event)) => event,
            None => {
                terminal.say("Unknown choice").await?;
                continue;
            }
        };

        if let Err(e) = app.dispatch(event).await {
            if !e.is_user_notice() {
                terminal.say(&format!("Error: {e}")).await?;
            }
        }
    }

    Ok(())
}

/// Builds an in-memory marketplace with a few listings and a wallet for it.
async fn simulated_wallet(config: &MarketConfig) -> Result<Arc<dyn WalletProvider>> {
    let market = InMemoryMarketplace::new(config.marketplace_address());
    let seller = Address::from_low_u64_be(0x5e11e4);
    for (token_id, price) in [(1u64, "0.01"), (2, "0.25"), (3, "1.5")] {
        let price = EtherAmount::parse(price).context("invalid seed price")?;
        market
            .seed(ListingRecord {
                seller,
                nft_contract: config.nft_address(),
                token_id: U256::from(token_id),
                price: price.wei(),
                active: true,
            })
            .await;
    }

    let account = Address::from_low_u64_be(0xa11ce);
    Ok(Arc::new(market.wallet(account)))
}
