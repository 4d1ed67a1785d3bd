use solana_program::{
    account_info::AccountInfo, msg, program_error::ProgramError, system_program
};
use steel::*;

use crate::{
    instruction::Initialize,
    state::FundingRound,
    validation::unpack_depositors,
};

pub fn process_initialize(
    accounts: &[AccountInfo],
    instruction_data: &[u8],
) -> Result<(), ProgramError> {
    let args = Initialize::try_from_bytes(instruction_data)?;
    let expiry_time = i64::from_le_bytes(args.expiry_time);

    let [signer, funding_round_info, system_program] =
        accounts
    else {
        return Err(ProgramError::NotEnoughAccountKeys);
    };

    if !signer.is_signer {
        return Err(ProgramError::MissingRequiredSignature);
    }

    if !funding_round_info.is_writable {
        return Err(ProgramError::InvalidAccountData);
    }

    if !funding_round_info.data_is_empty() {
        return Err(ProgramError::AccountAlreadyInitialized);
    }

    if *system_program.key != system_program::id() {
        return Err(ProgramError::IncorrectProgramId);
    }

    let depositors = unpack_depositors(args.allowed_count, &args.allowed_depositors)?;
    let round = FundingRound::new(*signer.key, depositors, expiry_time)?;

    let space = 8 + std::mem::size_of::<FundingRound>();
    create_account(
        signer,
        funding_round_info,
        system_program,
        space,
        &crate::ID,
    )?;

    // Set discriminator.
    let mut data = funding_round_info.data.borrow_mut();
    data[0] = FundingRound::discriminator();
    drop(data);

    let funding_round = funding_round_info.as_account_mut::<FundingRound>(&crate::ID)?;
    *funding_round = round;

    msg!(
        "initialized round {} with {} depositors, expiry {}",
        funding_round_info.key,
        funding_round.allowed_count,
        expiry_time
    );

    Ok(())
}
