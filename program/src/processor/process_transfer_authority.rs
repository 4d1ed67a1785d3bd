use solana_program::{account_info::AccountInfo, msg, program_error::ProgramError};
use steel::*;

use crate::{error::SolHolderError, state::FundingRound};

pub fn process_transfer_authority(
    accounts: &[AccountInfo],
    _instruction_data: &[u8],
) -> Result<(), ProgramError> {
    let [signer, funding_round_info, new_authority_info] = accounts else {
        return Err(ProgramError::NotEnoughAccountKeys);
    };

    // 1. Verify signer
    if !signer.is_signer {
        return Err(ProgramError::MissingRequiredSignature);
    }

    // 2. Verify round is initialized
    if funding_round_info.data_is_empty() {
        return Err(SolHolderError::RoundNotInitialized.into());
    }

    // 3. Load round mutably and verify current authority
    let funding_round = funding_round_info.as_account_mut::<FundingRound>(&crate::id())?;

    if funding_round.authority != *signer.key {
        return Err(SolHolderError::NotAuthorized.into());
    }

    // 4. Update authority to new pubkey
    funding_round.authority = *new_authority_info.key;

    msg!("round {} authority -> {}", funding_round_info.key, new_authority_info.key);

    Ok(())
}
