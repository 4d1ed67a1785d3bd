#![allow(dead_code)]

use sol_holder::state::{FundingRound, SolHolderAccount};
use solana_program::{clock::Clock, rent::Rent, system_instruction};
use solana_program_test::{processor, BanksClientError, ProgramTest, ProgramTestContext};
use solana_sdk::{
    account::Account,
    instruction::{Instruction, InstructionError},
    pubkey::Pubkey,
    signature::Keypair,
    signer::Signer,
    transaction::{Transaction, TransactionError},
};
use steel::AccountDeserialize;

pub const ONE_SOL: u64 = 1_000_000_000;

// ============================================================================
// Program Setup
// ============================================================================

pub fn setup_programs() -> ProgramTest {
    ProgramTest::new(
        "sol_holder",
        sol_holder::id(),
        processor!(sol_holder::process_instruction),
    )
}

// ============================================================================
// Account Helpers
// ============================================================================

/// Preloads a funding round account with the given state and lamports
/// (lamports are on top of the rent-exempt minimum).
pub fn add_funding_round_account(
    program_test: &mut ProgramTest,
    address: Pubkey,
    round: FundingRound,
    extra_lamports: u64,
) {
    let mut data = Vec::new();
    let discr = (SolHolderAccount::FundingRound as u64).to_le_bytes();
    data.extend_from_slice(&discr);
    data.extend_from_slice(round.to_bytes());

    program_test.add_account(
        address,
        Account {
            lamports: Rent::default().minimum_balance(data.len()).max(1) + extra_lamports,
            data,
            owner: sol_holder::id(),
            executable: false,
            rent_epoch: 0,
        },
    );
}

pub fn new_depositors(n: usize) -> Vec<Keypair> {
    (0..n).map(|_| Keypair::new()).collect()
}

pub fn pubkeys(keypairs: &[Keypair]) -> Vec<Pubkey> {
    keypairs.iter().map(|k| k.pubkey()).collect()
}

// ============================================================================
// Transaction Helpers
// ============================================================================

/// Signs with the payer plus any extra signers and processes the transaction.
pub async fn send(
    context: &ProgramTestContext,
    payer: &Keypair,
    instructions: &[Instruction],
    signers: &[&Keypair],
) -> Result<(), BanksClientError> {
    let mut banks_client = context.banks_client.clone();
    let blockhash = banks_client.get_latest_blockhash().await.unwrap();
    let mut all_signers = Vec::with_capacity(signers.len() + 1);
    all_signers.push(payer);
    for signer in signers {
        if signer.pubkey() != payer.pubkey() {
            all_signers.push(*signer);
        }
    }

    let tx = Transaction::new_signed_with_payer(
        instructions,
        Some(&payer.pubkey()),
        &all_signers,
        blockhash,
    );
    banks_client.process_transaction(tx).await
}

pub async fn fund(context: &ProgramTestContext, to: Pubkey, lamports: u64) {
    let ix = system_instruction::transfer(&context.payer.pubkey(), &to, lamports);
    send(context, &context.payer, &[ix], &[]).await.unwrap();
}

pub async fn fund_all(context: &ProgramTestContext, keypairs: &[Keypair], lamports: u64) {
    for keypair in keypairs {
        fund(context, keypair.pubkey(), lamports).await;
    }
}

pub async fn initialize_round(
    context: &ProgramTestContext,
    authority: &Keypair,
    round: &Keypair,
    depositors: &[Pubkey],
    expiry_time: Option<i64>,
) -> Result<(), BanksClientError> {
    let ix = sol_holder::instruction::initialize(
        authority.pubkey(),
        round.pubkey(),
        depositors,
        expiry_time,
    );
    send(context, authority, &[ix], &[round]).await
}

pub async fn deposit(
    context: &ProgramTestContext,
    depositor: &Keypair,
    round: Pubkey,
    amount: u64,
) -> Result<(), BanksClientError> {
    let ix = sol_holder::instruction::deposit(depositor.pubkey(), round, amount);
    send(context, depositor, &[ix], &[]).await
}

pub async fn withdraw(
    context: &ProgramTestContext,
    authority: &Keypair,
    round: Pubkey,
    amount: u64,
) -> Result<(), BanksClientError> {
    let ix = sol_holder::instruction::withdraw(authority.pubkey(), round, amount);
    send(context, authority, &[ix], &[]).await
}

// ============================================================================
// Read Helpers
// ============================================================================

pub async fn fetch_round(context: &ProgramTestContext, address: Pubkey) -> FundingRound {
    let account = context
        .banks_client
        .clone()
        .get_account(address)
        .await
        .unwrap()
        .expect("funding round account should exist");
    *FundingRound::try_from_bytes(&account.data).unwrap()
}

pub async fn balance(context: &ProgramTestContext, address: Pubkey) -> u64 {
    context.banks_client.clone().get_balance(address).await.unwrap()
}

pub async fn now(context: &ProgramTestContext) -> i64 {
    let clock: Clock = context.banks_client.clone().get_sysvar().await.unwrap();
    clock.unix_timestamp
}

/// Moves the Clock sysvar to the given unix timestamp.
pub async fn set_unix_timestamp(context: &ProgramTestContext, unix_timestamp: i64) {
    let mut clock: Clock = context.banks_client.clone().get_sysvar().await.unwrap();
    clock.unix_timestamp = unix_timestamp;
    context.set_sysvar(&clock);
}

pub fn round_rent() -> u64 {
    Rent::default().minimum_balance(8 + std::mem::size_of::<FundingRound>())
}

// ============================================================================
// Assertions
// ============================================================================

pub fn assert_custom_error<E: Into<u32>>(result: Result<(), BanksClientError>, error: E) {
    let err = result.expect_err("transaction should fail").unwrap();
    assert_eq!(
        err,
        TransactionError::InstructionError(0, InstructionError::Custom(error.into()))
    );
}

pub fn assert_instruction_error(result: Result<(), BanksClientError>, error: InstructionError) {
    let err = result.expect_err("transaction should fail").unwrap();
    assert_eq!(err, TransactionError::InstructionError(0, error));
}
