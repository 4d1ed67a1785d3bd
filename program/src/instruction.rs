use steel::*;

use crate::consts::{MAX_DEPOSITORS, NO_EXPIRY};

#[repr(u8)]
#[derive(Clone, Copy, Debug, Eq, PartialEq, TryFromPrimitive)]
pub enum Instructions {
    Initialize = 0,
    Deposit = 1,
    Withdraw = 2,
    TransferAuthority = 3,
}

/// Initialize instruction data
///
/// Layout (176 bytes total):
/// - expiry_time: [u8; 8] - i64 unix timestamp, i64::MAX for no expiry
/// - allowed_count: u8 - number of populated whitelist slots (1-5)
/// - _pad: [u8; 7]
/// - allowed_depositors: [Pubkey; 5] - unused slots must be zeroed
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct Initialize {
    pub expiry_time: [u8; 8],
    pub allowed_count: u8,
    pub _pad: [u8; 7],
    pub allowed_depositors: [Pubkey; MAX_DEPOSITORS],
}

instruction!(Instructions, Initialize);

impl Initialize {
    /// Packs a whitelist into instruction data. Entries past `MAX_DEPOSITORS`
    /// are not representable; callers are expected to pass at most five.
    pub fn new(allowed_depositors: &[Pubkey], expiry_time: Option<i64>) -> Self {
        let count = allowed_depositors.len().min(MAX_DEPOSITORS);
        let mut slots = [Pubkey::default(); MAX_DEPOSITORS];
        slots[..count].copy_from_slice(&allowed_depositors[..count]);

        Self {
            expiry_time: expiry_time.unwrap_or(NO_EXPIRY).to_le_bytes(),
            allowed_count: allowed_depositors.len().min(u8::MAX as usize) as u8,
            _pad: [0; 7],
            allowed_depositors: slots,
        }
    }
}

/// Create a funding round owned by this program.
/// `funding_round` must be a fresh keypair that co-signs the transaction.
pub fn initialize(
    signer: Pubkey,
    funding_round: Pubkey,
    allowed_depositors: &[Pubkey],
    expiry_time: Option<i64>,
) -> Instruction {
    Instruction {
        program_id: crate::id(),
        accounts: vec![
            AccountMeta::new(signer, true),
            AccountMeta::new(funding_round, true),
            AccountMeta::new_readonly(system_program::id(), false),
        ],
        data: Initialize::new(allowed_depositors, expiry_time).to_bytes(),
    }
}

/// Deposit instruction data
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct Deposit {
    /// Amount to deposit in lamports
    pub amount: [u8; 8],
}

instruction!(Instructions, Deposit);

/// Deposit SOL into a funding round.
/// Only whitelisted depositors can deposit, once each, before expiry.
pub fn deposit(depositor: Pubkey, funding_round: Pubkey, amount: u64) -> Instruction {
    Instruction {
        program_id: crate::id(),
        accounts: vec![
            AccountMeta::new(depositor, true),                       // 0: depositor
            AccountMeta::new(funding_round, false),                  // 1: funding round
            AccountMeta::new_readonly(system_program::id(), false),  // 2: system_program
        ],
        data: Deposit {
            amount: amount.to_le_bytes(),
        }.to_bytes(),
    }
}

/// Withdraw instruction data
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct Withdraw {
    /// Amount to withdraw in lamports
    pub amount: [u8; 8],
}

instruction!(Instructions, Withdraw);

/// Withdraw collected SOL to the round authority.
/// Only allowed once the round is expired or every depositor has paid in.
pub fn withdraw(authority: Pubkey, funding_round: Pubkey, amount: u64) -> Instruction {
    Instruction {
        program_id: crate::id(),
        accounts: vec![
            AccountMeta::new(authority, true),       // 0: authority (also recipient)
            AccountMeta::new(funding_round, false),  // 1: funding round
        ],
        data: Withdraw {
            amount: amount.to_le_bytes(),
        }.to_bytes(),
    }
}

#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct TransferAuthority {}

instruction!(Instructions, TransferAuthority);

/// Transfer round authority to a new pubkey.
pub fn transfer_authority(authority: Pubkey, funding_round: Pubkey, new_authority: Pubkey) -> Instruction {
    Instruction {
        program_id: crate::id(),
        accounts: vec![
            AccountMeta::new(authority, true),
            AccountMeta::new(funding_round, false),
            AccountMeta::new_readonly(new_authority, false),
        ],
        data: TransferAuthority {}.to_bytes(),
    }
}
