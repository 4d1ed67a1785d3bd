use solana_program::{
    account_info::AccountInfo, clock::Clock, msg, program_error::ProgramError, rent::Rent,
    sysvar::Sysvar,
};
use steel::*;

use crate::{
    error::SolHolderError,
    instruction::Withdraw,
    state::FundingRound,
};

/// Process Withdraw instruction
/// Moves collected SOL from the round account to its authority.
/// The round account is program-owned, so lamports are debited directly.
pub fn process_withdraw(
    accounts: &[AccountInfo],
    instruction_data: &[u8],
) -> Result<(), ProgramError> {
    let args = Withdraw::try_from_bytes(instruction_data)?;
    let amount = u64::from_le_bytes(args.amount);

    let [
        authority,              // 0: authority (signer, also recipient)
        funding_round_info,     // 1: funding round
    ] = accounts else {
        return Err(ProgramError::NotEnoughAccountKeys);
    };

    if !authority.is_signer {
        return Err(ProgramError::MissingRequiredSignature);
    }

    if !funding_round_info.is_writable || !authority.is_writable {
        return Err(ProgramError::InvalidAccountData);
    }

    if funding_round_info.data_is_empty() {
        return Err(SolHolderError::RoundNotInitialized.into());
    }

    let now = Clock::get()?.unix_timestamp;

    // Keep rent-exempt minimum
    let rent_floor = Rent::get()?.minimum_balance(funding_round_info.data_len());
    let spendable = funding_round_info.lamports().saturating_sub(rent_floor);

    let funding_round = funding_round_info.as_account_mut::<FundingRound>(&crate::id())?;
    funding_round.check_withdraw(authority.key, amount, now, spendable)?;

    let authority_balance = authority
        .lamports()
        .checked_add(amount)
        .ok_or(SolHolderError::ArithmeticOverflow)?;

    funding_round.apply_withdraw(amount)?;

    **funding_round_info.try_borrow_mut_lamports()? -= amount;
    **authority.try_borrow_mut_lamports()? = authority_balance;

    msg!(
        "withdrew {} lamports to {}, withdrawn {}/{}",
        amount,
        authority.key,
        funding_round.total_withdrawn,
        funding_round.total_collected
    );

    Ok(())
}
