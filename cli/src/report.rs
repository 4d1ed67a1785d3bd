//! Human and JSON views of a funding round

use serde::Serialize;
use sol_holder::state::FundingRound;
use solana_sdk::{native_token::LAMPORTS_PER_SOL, pubkey::Pubkey};
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RoundStatus {
    /// Accepting deposits
    Open,
    /// Every allowed wallet has deposited
    Full,
    /// Expiry time reached
    Expired,
}

impl RoundStatus {
    pub fn of(round: &FundingRound, now: i64) -> Self {
        if round.is_expired(now) {
            RoundStatus::Expired
        } else if round.is_full() {
            RoundStatus::Full
        } else {
            RoundStatus::Open
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RoundStatus::Open => "open",
            RoundStatus::Full => "full",
            RoundStatus::Expired => "expired",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DepositorEntry {
    pub address: String,
    pub deposited: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct RoundReport {
    pub address: String,
    pub authority: String,
    pub status: RoundStatus,
    /// None when the round never expires
    pub expiry_time: Option<i64>,
    pub total_collected: u64,
    pub total_withdrawn: u64,
    pub balance: u64,
    pub depositors_count: u8,
    pub allowed_count: u8,
    pub depositors: Vec<DepositorEntry>,
}

impl RoundReport {
    pub fn new(address: Pubkey, round: &FundingRound, balance: u64, now: i64) -> Self {
        let depositors = round
            .depositors()
            .iter()
            .zip(round.deposits.iter())
            .map(|(address, deposited)| DepositorEntry {
                address: address.to_string(),
                deposited: *deposited,
            })
            .collect();

        Self {
            address: address.to_string(),
            authority: round.authority.to_string(),
            status: RoundStatus::of(round, now),
            expiry_time: round.has_expiry().then_some(round.expiry_time),
            total_collected: round.total_collected,
            total_withdrawn: round.total_withdrawn,
            balance,
            depositors_count: round.depositors_count,
            allowed_count: round.allowed_count,
            depositors,
        }
    }

    pub fn log(&self) {
        info!("Round: {}", self.address);
        info!("  Authority: {}", self.authority);
        info!("  Status: {}", self.status.as_str());
        match self.expiry_time {
            Some(expiry) => info!("  Expiry: {}", expiry),
            None => info!("  Expiry: never"),
        }
        info!(
            "  Collected: {} ({}), withdrawn: {}",
            format_sol(self.total_collected),
            self.total_collected,
            format_sol(self.total_withdrawn)
        );
        info!("  Balance: {}", format_sol(self.balance));
        info!("  Depositors: {}/{}", self.depositors_count, self.allowed_count);
        for entry in &self.depositors {
            let mark = if entry.deposited > 0 { "✓" } else { "-" };
            info!("    {} {} {}", mark, entry.address, format_sol(entry.deposited));
        }
    }
}

pub fn format_sol(lamports: u64) -> String {
    format!("{:.9} SOL", lamports as f64 / LAMPORTS_PER_SOL as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    const NOW: i64 = 1_700_000_000;

    fn round_with(depositors: &[Pubkey], expiry_time: i64) -> FundingRound {
        FundingRound::new(Pubkey::new_unique(), depositors, expiry_time).unwrap()
    }

    #[test]
    fn status_follows_round_state() {
        let depositors = [Pubkey::new_unique()];
        let mut round = round_with(&depositors, NOW + 10);
        assert_eq!(RoundStatus::of(&round, NOW), RoundStatus::Open);
        assert_eq!(RoundStatus::of(&round, NOW + 10), RoundStatus::Expired);

        let index = round.check_deposit(&depositors[0], 5, NOW).unwrap();
        round.apply_deposit(index, 5).unwrap();
        assert_eq!(RoundStatus::of(&round, NOW), RoundStatus::Full);
        // Expiry wins over full
        assert_eq!(RoundStatus::of(&round, NOW + 10), RoundStatus::Expired);
    }

    #[test]
    fn report_lists_only_populated_slots() {
        let depositors: Vec<Pubkey> = (0..3).map(|_| Pubkey::new_unique()).collect();
        let round = round_with(&depositors, sol_holder::consts::NO_EXPIRY);
        let report = RoundReport::new(Pubkey::new_unique(), &round, 42, NOW);

        assert_eq!(report.depositors.len(), 3);
        assert_eq!(report.depositors[1].address, depositors[1].to_string());
        assert_eq!(report.expiry_time, None);
        assert_eq!(report.balance, 42);
    }

    #[test]
    fn report_json_shape() {
        let depositors = [Pubkey::new_unique()];
        let round = round_with(&depositors, NOW + 10);
        let report = RoundReport::new(Pubkey::new_unique(), &round, 0, NOW);

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["status"], "open");
        assert_eq!(json["expiry_time"], NOW + 10);
        assert_eq!(json["depositors"][0]["deposited"], 0);
    }

    #[test]
    fn formats_lamports_as_sol() {
        assert_eq!(format_sol(1_500_000_000), "1.500000000 SOL");
        assert_eq!(format_sol(0), "0.000000000 SOL");
    }
}
