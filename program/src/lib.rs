use instruction::Instructions;
use solana_program::{
    account_info::AccountInfo, declare_id, entrypoint::ProgramResult, program_error::ProgramError,
    pubkey::Pubkey,
};

use processor::*;

pub mod processor;
pub mod error;
pub mod instruction;
pub mod state;
pub mod consts;
pub mod validation;

declare_id!("GbqfvdyqWTAUMF52t8VP5yivWy4aPfVsbsGb9j6VvYnu");

#[cfg(not(feature = "no-entrypoint"))]
solana_program::entrypoint!(process_instruction);

pub fn process_instruction(
    program_id: &Pubkey,
    accounts: &[AccountInfo],
    instruction_data: &[u8],
) -> ProgramResult {
    if program_id.ne(&crate::id()) {
        return Err(ProgramError::IncorrectProgramId);
    }

    let (instruction, data) = instruction_data
        .split_first()
        .ok_or(ProgramError::InvalidInstructionData)?;

    let instruction =
        Instructions::try_from(*instruction).or(Err(ProgramError::InvalidInstructionData))?;

    match instruction {
        Instructions::Initialize => {
            process_initialize::process_initialize(accounts, data)?;
        }
        Instructions::Deposit => {
            process_deposit::process_deposit(accounts, data)?;
        }
        Instructions::Withdraw => {
            process_withdraw::process_withdraw(accounts, data)?;
        }
        Instructions::TransferAuthority => {
            process_transfer_authority::process_transfer_authority(accounts, data)?;
        }
    }

    Ok(())
}
