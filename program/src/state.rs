use steel::*;
use serde::{Serialize, Deserialize};

use crate::{
    consts::{MAX_DEPOSITORS, NO_EXPIRY},
    error::SolHolderError,
    validation::validate_depositors,
};

#[repr(u8)]
#[derive(Clone, Copy, Debug, Eq, PartialEq, IntoPrimitive, TryFromPrimitive)]
pub enum SolHolderAccount {
    FundingRound = 100,
}

/// A whitelist-gated SOL collection round.
///
/// The round account itself holds the deposited lamports. `deposits[i]` is the
/// amount paid in by `allowed_depositors[i]`; only the first `allowed_count`
/// slots are in use and the rest stay default/zero.
///
/// Size: 32 + 160 + 40 + 8 + 8 + 8 + 1 + 1 + 6 = 264 bytes (+ 8 discriminator = 272)
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable, Serialize, Deserialize)]
pub struct FundingRound {
    /// Administrator of the round, set to the initializing signer
    pub authority: Pubkey,
    /// Wallets allowed to deposit
    pub allowed_depositors: [Pubkey; MAX_DEPOSITORS],
    /// Lamports deposited by each wallet, parallel to allowed_depositors
    pub deposits: [u64; MAX_DEPOSITORS],
    /// Sum of all deposits
    pub total_collected: u64,
    /// Lamports the authority has pulled out of the round
    pub total_withdrawn: u64,
    /// Unix timestamp at which deposits stop (NO_EXPIRY = never)
    pub expiry_time: i64,
    /// How many wallets have deposited so far
    pub depositors_count: u8,
    /// How many whitelist slots are populated
    pub allowed_count: u8,
    pub _padding: [u8; 6],
}

account!(SolHolderAccount, FundingRound);

impl FundingRound {
    /// Builds a fresh round with zeroed deposit state.
    pub fn new(
        authority: Pubkey,
        depositors: &[Pubkey],
        expiry_time: i64,
    ) -> Result<Self, SolHolderError> {
        validate_depositors(depositors)?;

        let mut allowed_depositors = [Pubkey::default(); MAX_DEPOSITORS];
        allowed_depositors[..depositors.len()].copy_from_slice(depositors);

        Ok(Self {
            authority,
            allowed_depositors,
            deposits: [0; MAX_DEPOSITORS],
            total_collected: 0,
            total_withdrawn: 0,
            expiry_time,
            depositors_count: 0,
            allowed_count: depositors.len() as u8,
            _padding: [0; 6],
        })
    }

    /// The populated part of the whitelist.
    pub fn depositors(&self) -> &[Pubkey] {
        let count = (self.allowed_count as usize).min(MAX_DEPOSITORS);
        &self.allowed_depositors[..count]
    }

    pub fn depositor_index(&self, depositor: &Pubkey) -> Option<usize> {
        self.depositors().iter().position(|address| address == depositor)
    }

    pub fn has_expiry(&self) -> bool {
        self.expiry_time != NO_EXPIRY
    }

    pub fn is_expired(&self, now: i64) -> bool {
        now >= self.expiry_time
    }

    /// Every allowed wallet has deposited.
    pub fn is_full(&self) -> bool {
        self.depositors_count >= self.allowed_count
    }

    /// No further deposits can land, so the authority may withdraw.
    pub fn is_closed(&self, now: i64) -> bool {
        self.is_expired(now) || self.is_full()
    }

    pub fn withdrawable(&self) -> u64 {
        self.total_collected.saturating_sub(self.total_withdrawn)
    }

    /// Checks a deposit against the round and returns the depositor's slot.
    ///
    /// Checks run in a fixed order: expiry, whitelist, prior deposit, amount.
    pub fn check_deposit(
        &self,
        depositor: &Pubkey,
        amount: u64,
        now: i64,
    ) -> Result<usize, SolHolderError> {
        if self.is_expired(now) {
            return Err(SolHolderError::FundingTimeExpired);
        }

        let index = self
            .depositor_index(depositor)
            .ok_or(SolHolderError::UnauthorizedDepositAddress)?;

        if self.deposits[index] != 0 {
            return Err(SolHolderError::AlreadyDeposited);
        }

        if amount == 0 {
            return Err(SolHolderError::InvalidAmount);
        }

        Ok(index)
    }

    /// Records a deposit that already passed `check_deposit`.
    pub fn apply_deposit(&mut self, index: usize, amount: u64) -> Result<(), SolHolderError> {
        let total_collected = self
            .total_collected
            .checked_add(amount)
            .ok_or(SolHolderError::ArithmeticOverflow)?;

        self.deposits[index] = amount;
        self.total_collected = total_collected;
        self.depositors_count += 1;

        Ok(())
    }

    /// Checks an authority withdrawal against the ledger.
    ///
    /// `spendable_lamports` is the account balance above its rent-exempt minimum.
    pub fn check_withdraw(
        &self,
        signer: &Pubkey,
        amount: u64,
        now: i64,
        spendable_lamports: u64,
    ) -> Result<(), SolHolderError> {
        if self.authority != *signer {
            return Err(SolHolderError::NotAuthorized);
        }

        if !self.is_closed(now) {
            return Err(SolHolderError::FundingRoundActive);
        }

        if amount == 0 {
            return Err(SolHolderError::InvalidAmount);
        }

        if amount > self.withdrawable() || amount > spendable_lamports {
            return Err(SolHolderError::InsufficientFunds);
        }

        Ok(())
    }

    pub fn apply_withdraw(&mut self, amount: u64) -> Result<(), SolHolderError> {
        self.total_withdrawn = self
            .total_withdrawn
            .checked_add(amount)
            .ok_or(SolHolderError::ArithmeticOverflow)?;
        Ok(())
    }
}
