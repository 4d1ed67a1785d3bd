//! SOL Holder CLI
//!
//! Command line client for the SOL Holder program. Creates funding rounds,
//! deposits into them as a whitelisted wallet, withdraws as the round
//! authority and inspects round state.
//!
//! The configured keypair pays fees and signs as depositor or authority.

mod client;
mod config;
mod report;
mod sender;

use clap::Parser;
use client::{CliError, Client};
use config::{Command, Config};
use report::{format_sol, RoundReport};
use solana_sdk::signature::{Keypair, Signer};
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::{error, info, warn, Level};
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    let _subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .init();

    // Load .env file if present
    dotenvy::dotenv().ok();

    let config = Config::parse();

    info!("SOL Holder CLI");
    info!("RPC URL: {}", config.rpc_url);

    let client = Client::new(config.clone())?;
    info!("Signer: {}", client.payer_pubkey());

    let result = match config.command {
        Command::Init { depositors, expiry, expires_in, round_keypair } => {
            let expiry_time = match (expiry, expires_in) {
                (Some(at), _) => Some(at),
                (None, Some(secs)) => Some(expires_at(secs)?),
                (None, None) => None,
            };

            let round = match round_keypair {
                Some(path) => config::read_keypair(&path)
                    .map_err(|e| CliError::KeypairLoad(e.to_string()))?,
                None => Keypair::new(),
            };

            client.initialize(&round, &depositors, expiry_time).await.map(|sig| {
                info!("Round address: {}", round.pubkey());
                sig
            })
        }
        Command::Deposit { round, amount } => client.deposit(round, amount).await,
        Command::Withdraw { round, amount } => client.withdraw(round, amount).await,
        Command::TransferAuthority { round, new_authority } => {
            client.transfer_authority(round, new_authority).await
        }
        Command::Show { round, json } => {
            let state = client.get_round(round)?;
            let balance = client.get_balance(round)?;
            let now = client.cluster_time()?;
            let report = RoundReport::new(round, &state, balance, now);

            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                report.log();
            }
            return Ok(());
        }
        Command::List => {
            let rounds = client.find_rounds()?;
            let now = client.cluster_time()?;

            if rounds.is_empty() {
                warn!("No funding rounds found where we are the authority");
                return Ok(());
            }

            info!("Managing {} rounds:", rounds.len());
            for (address, state) in &rounds {
                let balance = client.get_balance(*address).unwrap_or(0);
                RoundReport::new(*address, state, balance, now).log();
            }

            let collected: u64 = rounds.iter().map(|(_, r)| r.total_collected).sum();
            info!("Total collected: {}", format_sol(collected));
            return Ok(());
        }
    };

    if let Err(e) = result {
        error!("{}", e);
        return Err(e.into());
    }

    Ok(())
}

/// Unix timestamp `secs` seconds from now
fn expires_at(secs: u64) -> Result<i64, CliError> {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_err(|e| CliError::Parse(e.to_string()))?
        .as_secs();

    now.checked_add(secs)
        .and_then(|t| i64::try_from(t).ok())
        .ok_or_else(|| CliError::Parse(format!("--expires-in {} is out of range", secs)))
}
