//! RPC client for the SOL Holder program
//!
//! Builds, signs and sends instructions, and reads round state back

use sol_holder::{
    error::SolHolderError,
    instruction::{deposit, initialize, transfer_authority, withdraw},
    state::{FundingRound, SolHolderAccount},
};
use solana_client::{
    rpc_client::RpcClient,
    rpc_config::{RpcAccountInfoConfig, RpcProgramAccountsConfig},
    rpc_filter::{Memcmp, RpcFilterType},
};
use solana_sdk::{
    clock::Clock,
    commitment_config::CommitmentConfig,
    compute_budget::ComputeBudgetInstruction,
    instruction::Instruction,
    pubkey::Pubkey,
    signature::{Keypair, Signer},
    sysvar,
    transaction::Transaction,
};
use steel::AccountDeserialize;
use tracing::{debug, error, info, warn};

use crate::{config::Config, sender::TxSender};

/// 8 discriminator + 264 FundingRound
const FUNDING_ROUND_SIZE: u64 = 8 + std::mem::size_of::<FundingRound>() as u64;

/// Authority offset inside the account (right after the discriminator)
const AUTHORITY_OFFSET: usize = 8;

const COMPUTE_UNIT_LIMIT: u32 = 20_000;

pub struct Client {
    config: Config,
    rpc_client: RpcClient,
    payer: Keypair,
    sender: TxSender,
}

impl Client {
    pub fn new(config: Config) -> Result<Self, CliError> {
        let payer = config.load_keypair()
            .map_err(|e| CliError::KeypairLoad(e.to_string()))?;

        let rpc_client = RpcClient::new_with_commitment(
            config.rpc_url.clone(),
            CommitmentConfig::confirmed(),
        );

        let sender = TxSender::new(config.rpc_url.clone())
            .map_err(|e| CliError::Send(e.to_string()))?;

        Ok(Self {
            config,
            rpc_client,
            payer,
            sender,
        })
    }

    pub fn payer_pubkey(&self) -> Pubkey {
        self.payer.pubkey()
    }

    /// Wraps an instruction with compute budget settings, signs and sends it
    async fn send_instruction(
        &self,
        op_name: &str,
        instruction: Instruction,
        extra_signers: &[&Keypair],
    ) -> Result<String, CliError> {
        let recent_blockhash = self.rpc_client
            .get_latest_blockhash()
            .map_err(|e| CliError::Rpc(e.to_string()))?;

        let mut instructions = vec![ComputeBudgetInstruction::set_compute_unit_limit(COMPUTE_UNIT_LIMIT)];
        if self.config.priority_fee > 0 {
            instructions.push(ComputeBudgetInstruction::set_compute_unit_price(self.config.priority_fee));
        }
        instructions.push(instruction);

        let mut signers: Vec<&Keypair> = vec![&self.payer];
        signers.extend_from_slice(extra_signers);

        let mut tx = Transaction::new_with_payer(&instructions, Some(&self.payer.pubkey()));
        tx.try_sign(&signers, recent_blockhash)
            .map_err(|e| CliError::Send(e.to_string()))?;

        match self.sender.send_and_confirm_rpc(&tx, self.config.confirm_retries).await {
            Ok(sig) => {
                info!("✓ {} confirmed: {}", op_name, sig);
                Ok(sig.to_string())
            }
            Err(e) => {
                error!("✗ {} failed: {}", op_name, e);
                Err(CliError::Send(e.to_string()))
            }
        }
    }

    /// Create a funding round with the payer as authority
    pub async fn initialize(
        &self,
        round: &Keypair,
        depositors: &[Pubkey],
        expiry_time: Option<i64>,
    ) -> Result<String, CliError> {
        sol_holder::validation::validate_depositors(depositors)?;

        info!(
            "Initializing round {} with {} depositors (expiry: {})",
            round.pubkey(),
            depositors.len(),
            expiry_time.map(|t| t.to_string()).unwrap_or_else(|| "never".to_string())
        );

        let ix = initialize(self.payer.pubkey(), round.pubkey(), depositors, expiry_time);
        self.send_instruction("initialize", ix, &[round]).await
    }

    /// Deposit as the payer. The round is checked locally first so that
    /// rejected deposits fail without paying a fee.
    pub async fn deposit(&self, round_address: Pubkey, amount: u64) -> Result<String, CliError> {
        let round = self.get_round(round_address)?;
        let now = self.cluster_time()?;
        let index = round.check_deposit(&self.payer.pubkey(), amount, now)?;

        info!("Depositing {} lamports into {} (slot {})", amount, round_address, index);

        let ix = deposit(self.payer.pubkey(), round_address, amount);
        self.send_instruction("deposit", ix, &[]).await
    }

    /// Withdraw to the payer, who must be the round authority
    pub async fn withdraw(&self, round_address: Pubkey, amount: u64) -> Result<String, CliError> {
        let round = self.get_round(round_address)?;
        let now = self.cluster_time()?;

        let balance = self.get_balance(round_address)?;
        let rent_floor = self.rpc_client
            .get_minimum_balance_for_rent_exemption(FUNDING_ROUND_SIZE as usize)
            .map_err(|e| CliError::Rpc(e.to_string()))?;
        round.check_withdraw(&self.payer.pubkey(), amount, now, balance.saturating_sub(rent_floor))?;

        info!("Withdrawing {} lamports from {}", amount, round_address);

        let ix = withdraw(self.payer.pubkey(), round_address, amount);
        self.send_instruction("withdraw", ix, &[]).await
    }

    pub async fn transfer_authority(&self, round_address: Pubkey, new_authority: Pubkey) -> Result<String, CliError> {
        let round = self.get_round(round_address)?;
        if round.authority != self.payer.pubkey() {
            return Err(SolHolderError::NotAuthorized.into());
        }

        info!("Transferring authority of {} to {}", round_address, new_authority);

        let ix = transfer_authority(self.payer.pubkey(), round_address, new_authority);
        self.send_instruction("transfer-authority", ix, &[]).await
    }

    /// Fetch and decode a funding round account
    pub fn get_round(&self, round_address: Pubkey) -> Result<FundingRound, CliError> {
        let account = self.rpc_client.get_account(&round_address)
            .map_err(|e| CliError::Rpc(e.to_string()))?;

        if account.owner != sol_holder::id() {
            return Err(CliError::Deserialize(format!(
                "{} is owned by {}, not the SOL Holder program",
                round_address, account.owner
            )));
        }

        let round = FundingRound::try_from_bytes(&account.data)
            .map_err(|e| CliError::Deserialize(format!("{:?}", e)))?;

        Ok(*round)
    }

    pub fn get_balance(&self, address: Pubkey) -> Result<u64, CliError> {
        self.rpc_client.get_balance(&address)
            .map_err(|e| CliError::Rpc(e.to_string()))
    }

    /// Unix timestamp from the cluster's Clock sysvar
    pub fn cluster_time(&self) -> Result<i64, CliError> {
        let account = self.rpc_client.get_account(&sysvar::clock::id())
            .map_err(|e| CliError::Rpc(e.to_string()))?;

        let clock: Clock = bincode::deserialize(&account.data)
            .map_err(|e| CliError::Deserialize(e.to_string()))?;

        Ok(clock.unix_timestamp)
    }

    /// Find all funding rounds where the payer is the authority
    pub fn find_rounds(&self) -> Result<Vec<(Pubkey, FundingRound)>, CliError> {
        let authority = self.payer.pubkey();

        info!("Scanning for rounds with authority: {} (data_size={})", authority, FUNDING_ROUND_SIZE);

        let accounts = self.rpc_client.get_program_accounts_with_config(
            &sol_holder::id(),
            RpcProgramAccountsConfig {
                filters: Some(vec![
                    RpcFilterType::DataSize(FUNDING_ROUND_SIZE),
                    RpcFilterType::Memcmp(Memcmp::new_base58_encoded(
                        0,
                        &(SolHolderAccount::FundingRound as u64).to_le_bytes(),
                    )),
                    RpcFilterType::Memcmp(Memcmp::new_base58_encoded(
                        AUTHORITY_OFFSET,
                        authority.as_ref(),
                    )),
                ]),
                account_config: RpcAccountInfoConfig {
                    encoding: Some(solana_account_decoder::UiAccountEncoding::Base64),
                    ..Default::default()
                },
                ..Default::default()
            },
        ).map_err(|e| CliError::Rpc(e.to_string()))?;

        info!("GPA returned {} round accounts", accounts.len());

        let mut rounds = Vec::new();
        for (address, account) in accounts {
            match FundingRound::try_from_bytes(&account.data) {
                Ok(round) => {
                    debug!("Found round {} ({} depositors)", address, round.allowed_count);
                    rounds.push((address, *round));
                }
                Err(e) => {
                    warn!("Failed to parse round {}: {:?}", address, e);
                }
            }
        }

        Ok(rounds)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("Failed to load keypair: {0}")]
    KeypairLoad(String),
    #[error("RPC error: {0}")]
    Rpc(String),
    #[error("Deserialize error: {0}")]
    Deserialize(String),
    #[error("Send error: {0}")]
    Send(String),
    #[error("Parse error: {0}")]
    Parse(String),
    #[error("Rejected: {0}")]
    Rejected(#[from] SolHolderError),
}
