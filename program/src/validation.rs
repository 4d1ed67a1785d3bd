use steel::Pubkey;

use crate::{consts::MAX_DEPOSITORS, error::SolHolderError};

/// Checks a whitelist before it is written into a new funding round.
///
/// Entries must be non-default and pairwise distinct; a duplicate would leave a
/// slot that can never receive a deposit.
pub fn validate_depositors(depositors: &[Pubkey]) -> Result<(), SolHolderError> {
    if depositors.is_empty() || depositors.len() > MAX_DEPOSITORS {
        return Err(SolHolderError::InvalidDepositorList);
    }

    for (i, depositor) in depositors.iter().enumerate() {
        if *depositor == Pubkey::default() {
            return Err(SolHolderError::InvalidDepositorList);
        }
        if depositors[..i].contains(depositor) {
            return Err(SolHolderError::InvalidDepositorList);
        }
    }

    Ok(())
}

/// Unpacks the fixed-size whitelist carried by `Initialize`.
///
/// Slots past `allowed_count` must be zeroed so that the stored account is
/// byte-for-byte determined by the populated list.
pub fn unpack_depositors(
    allowed_count: u8,
    slots: &[Pubkey; MAX_DEPOSITORS],
) -> Result<&[Pubkey], SolHolderError> {
    let count = allowed_count as usize;
    if count > MAX_DEPOSITORS {
        return Err(SolHolderError::InvalidDepositorList);
    }

    if slots[count..].iter().any(|slot| *slot != Pubkey::default()) {
        return Err(SolHolderError::InvalidDepositorList);
    }

    let depositors = &slots[..count];
    validate_depositors(depositors)?;
    Ok(depositors)
}
