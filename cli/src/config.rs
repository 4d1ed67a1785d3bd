//! Configuration for the SOL Holder client

use clap::{Parser, Subcommand};
use solana_sdk::{pubkey::Pubkey, signature::Keypair};
use std::path::{Path, PathBuf};

/// SOL Holder funding round client
#[derive(Parser, Debug, Clone)]
#[command(name = "sol-holder-cli")]
#[command(about = "Create and fund whitelist-gated SOL funding rounds", long_about = None)]
pub struct Config {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,

    /// RPC URL
    #[arg(long, env = "RPC_URL", default_value = "http://127.0.0.1:8899")]
    pub rpc_url: String,

    /// Signer keypair path (payer, depositor or authority depending on the command)
    #[arg(long = "keypair", env = "KEYPAIR_PATH")]
    pub keypair_path: PathBuf,

    /// Priority fee in microlamports per compute unit
    #[arg(long, env = "PRIORITY_FEE", default_value = "0")]
    pub priority_fee: u64,

    /// Confirmation polls before giving up (500ms apart)
    #[arg(long, env = "CONFIRM_RETRIES", default_value = "60")]
    pub confirm_retries: u32,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Create a funding round with the given whitelist
    Init {
        /// Allowed depositor (repeat for each wallet, 1-5)
        #[arg(long = "depositor", required = true)]
        depositors: Vec<Pubkey>,
        /// Unix timestamp at which deposits close
        #[arg(long, conflicts_with = "expires_in")]
        expiry: Option<i64>,
        /// Seconds from now at which deposits close
        #[arg(long)]
        expires_in: Option<u64>,
        /// Keypair for the new round account (a fresh one is generated if omitted)
        #[arg(long)]
        round_keypair: Option<PathBuf>,
    },
    /// Deposit lamports into a round as the configured keypair
    Deposit {
        #[arg(long)]
        round: Pubkey,
        /// Amount in lamports
        #[arg(long)]
        amount: u64,
    },
    /// Withdraw collected lamports to the round authority
    Withdraw {
        #[arg(long)]
        round: Pubkey,
        /// Amount in lamports
        #[arg(long)]
        amount: u64,
    },
    /// Hand round authority to another wallet
    TransferAuthority {
        #[arg(long)]
        round: Pubkey,
        #[arg(long)]
        new_authority: Pubkey,
    },
    /// Show round state
    Show {
        #[arg(long)]
        round: Pubkey,
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// List rounds where the configured keypair is authority
    List,
}

impl Config {
    /// Load the signer keypair from the configured path
    pub fn load_keypair(&self) -> Result<Keypair, Box<dyn std::error::Error>> {
        read_keypair(&self.keypair_path)
    }
}

/// Reads a keypair stored as a JSON byte array (solana-keygen format)
pub fn read_keypair(path: &Path) -> Result<Keypair, Box<dyn std::error::Error>> {
    let keypair_data = std::fs::read_to_string(path)?;
    let keypair_bytes: Vec<u8> = serde_json::from_str(&keypair_data)?;
    Ok(Keypair::from_bytes(&keypair_bytes)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use solana_sdk::signer::Signer;

    #[test]
    fn parses_init_with_repeated_depositors() {
        let a = Pubkey::new_unique();
        let b = Pubkey::new_unique();
        let (a_str, b_str) = (a.to_string(), b.to_string());
        let config = Config::try_parse_from([
            "sol-holder-cli",
            "--keypair",
            "id.json",
            "init",
            "--depositor",
            a_str.as_str(),
            "--depositor",
            b_str.as_str(),
            "--expiry",
            "1956288947",
        ])
        .unwrap();

        match config.command {
            Command::Init { depositors, expiry, expires_in, round_keypair } => {
                assert_eq!(depositors, vec![a, b]);
                assert_eq!(expiry, Some(1_956_288_947));
                assert_eq!(expires_in, None);
                assert!(round_keypair.is_none());
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn expiry_flags_conflict() {
        let depositor = Pubkey::new_unique().to_string();
        let result = Config::try_parse_from([
            "sol-holder-cli",
            "--keypair",
            "id.json",
            "init",
            "--depositor",
            depositor.as_str(),
            "--expiry",
            "1",
            "--expires-in",
            "60",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn init_requires_a_depositor() {
        let result = Config::try_parse_from(["sol-holder-cli", "--keypair", "id.json", "init"]);
        assert!(result.is_err());
    }

    #[test]
    fn parses_deposit() {
        let round = Pubkey::new_unique();
        let round_str = round.to_string();
        let config = Config::try_parse_from([
            "sol-holder-cli",
            "--keypair",
            "id.json",
            "deposit",
            "--round",
            round_str.as_str(),
            "--amount",
            "1000000000",
        ])
        .unwrap();

        assert!(matches!(
            config.command,
            Command::Deposit { round: r, amount: 1_000_000_000 } if r == round
        ));
    }

    #[test]
    fn reads_keypair_file() {
        let keypair = Keypair::new();
        let path = std::env::temp_dir().join(format!("sol-holder-{}.json", keypair.pubkey()));
        std::fs::write(&path, serde_json::to_string(&keypair.to_bytes().to_vec()).unwrap()).unwrap();

        let loaded = read_keypair(&path).unwrap();
        assert_eq!(loaded.pubkey(), keypair.pubkey());

        std::fs::remove_file(&path).unwrap();
    }
}
