use steel::*;

/// Custom errors for the SOL Holder program.
///
/// The first three codes are the ones client scripts match on and must keep
/// their values.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq, IntoPrimitive)]
#[repr(u32)]
pub enum SolHolderError {
    // ========================
    // Deposit Errors
    // ========================

    /// The depositor is not on the round's whitelist
    #[error("Address provided does not have permission to deposit")]
    UnauthorizedDepositAddress = 1,

    /// The depositor already has a recorded deposit
    #[error("Address has already deposited")]
    AlreadyDeposited = 2,

    /// The round's expiry time has been reached
    #[error("Funding time has expired")]
    FundingTimeExpired = 3,

    // ========================
    // Account Validation Errors
    // ========================

    /// The signer is not the round authority
    #[error("Not authorized: signer is not the round authority")]
    NotAuthorized = 4,

    /// The funding round account holds no data
    #[error("Round not initialized: initialize the funding round first")]
    RoundNotInitialized = 5,

    /// The whitelist is empty, too long, duplicated or contains the default key
    #[error("Invalid depositor list: expected 1-5 distinct, non-default addresses")]
    InvalidDepositorList = 6,

    // ========================
    // Amount Errors
    // ========================

    /// Zero-lamport deposits and withdrawals are rejected
    #[error("Invalid amount: must be greater than zero")]
    InvalidAmount = 7,

    /// Arithmetic overflow while updating totals
    #[error("Arithmetic overflow: total exceeded u64")]
    ArithmeticOverflow = 8,

    // ========================
    // Withdraw Errors
    // ========================

    /// Withdrawals wait until the round expires or every depositor has paid in
    #[error("Funding round active: wait for expiry or a full round")]
    FundingRoundActive = 9,

    /// Requested more than the collected, rent-free balance
    #[error("Insufficient funds: amount exceeds withdrawable balance")]
    InsufficientFunds = 10,
}

error!(SolHolderError);
