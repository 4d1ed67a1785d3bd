pub mod process_deposit;
pub mod process_initialize;
pub mod process_transfer_authority;
pub mod process_withdraw;
