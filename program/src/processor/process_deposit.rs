use solana_program::{
    account_info::AccountInfo, clock::Clock, msg, program_error::ProgramError, system_program,
    sysvar::Sysvar,
};
use steel::*;

use crate::{
    error::SolHolderError,
    instruction::Deposit,
    state::FundingRound,
};

pub fn process_deposit(
    accounts: &[AccountInfo],
    instruction_data: &[u8],
) -> Result<(), ProgramError> {
    let args = Deposit::try_from_bytes(instruction_data)?;
    let amount = u64::from_le_bytes(args.amount);

    let [
        depositor,              // 0: depositor (signer)
        funding_round_info,     // 1: funding round
        system_program_info,    // 2: system_program
    ] = accounts else {
        return Err(ProgramError::NotEnoughAccountKeys);
    };

    // Verify signer
    if !depositor.is_signer {
        return Err(ProgramError::MissingRequiredSignature);
    }

    // Verify system program
    if *system_program_info.key != system_program::id() {
        return Err(ProgramError::IncorrectProgramId);
    }

    if !funding_round_info.is_writable {
        return Err(ProgramError::InvalidAccountData);
    }

    if funding_round_info.data_is_empty() {
        return Err(SolHolderError::RoundNotInitialized.into());
    }

    let now = Clock::get()?.unix_timestamp;

    let index = funding_round_info
        .as_account::<FundingRound>(&crate::id())?
        .check_deposit(depositor.key, amount, now)?;

    // Transfer SOL from depositor into the round account
    solana_program::program::invoke(
        &solana_program::system_instruction::transfer(
            depositor.key,
            funding_round_info.key,
            amount,
        ),
        &[
            depositor.clone(),
            funding_round_info.clone(),
            system_program_info.clone(),
        ],
    )?;

    let funding_round = funding_round_info.as_account_mut::<FundingRound>(&crate::id())?;
    funding_round.apply_deposit(index, amount)?;

    msg!(
        "deposit {} lamports from {} (slot {}), total {}",
        amount,
        depositor.key,
        index,
        funding_round.total_collected
    );

    Ok(())
}
