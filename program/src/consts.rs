/// Upper bound on whitelist entries per funding round.
pub const MAX_DEPOSITORS: usize = 5;

/// Sentinel expiry for rounds that never close by time.
pub const NO_EXPIRY: i64 = i64::MAX;
