//! Balance calculations.
//!
//! Everything here is a pure fold over ledger entries. Callers feed in a
//! fresh read of the store on every call; nothing is cached.

use rewards_shared::types::CustomerId;
use serde::{Deserialize, Serialize};

use super::types::{LedgerEntry, REDEEM_COST, TransactionKind};

/// Sums the entries belonging to `customer_id`.
///
/// Entries for other customers are ignored. No entries means a balance of 0.
#[must_use]
pub fn balance<'a, I>(customer_id: CustomerId, entries: I) -> i64
where
    I: IntoIterator<Item = &'a LedgerEntry>,
{
    balance_of(
        entries
            .into_iter()
            .filter(|entry| entry.customer_id == customer_id)
            .map(|entry| entry.points),
    )
}

/// Sums raw signed deltas already scoped to one customer.
#[must_use]
pub fn balance_of<I>(points: I) -> i64
where
    I: IntoIterator<Item = i64>,
{
    points.into_iter().fold(0_i64, i64::saturating_add)
}

/// Progress toward the next reward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewardProgress {
    /// Current balance.
    pub balance: i64,
    /// Cost of one reward.
    pub reward_cost: i64,
    /// Points accumulated toward the next reward.
    pub progress: i64,
    /// `progress` as a whole percentage of `reward_cost` (0-100).
    pub percent: u8,
    /// Number of rewards the balance could pay for right now.
    pub rewards_available: i64,
    /// Points still needed for the next reward.
    pub points_to_next_reward: i64,
    /// Whether a redemption would be accepted.
    pub can_redeem: bool,
}

impl RewardProgress {
    /// Derives progress from a balance.
    #[must_use]
    pub fn from_balance(balance: i64) -> Self {
        let clamped = balance.max(0);
        let progress = clamped % REDEEM_COST;
        // progress < REDEEM_COST, so the percentage is always below 100
        let percent = u8::try_from(progress * 100 / REDEEM_COST).unwrap_or(100);

        Self {
            balance,
            reward_cost: REDEEM_COST,
            progress,
            percent,
            rewards_available: clamped / REDEEM_COST,
            points_to_next_reward: REDEEM_COST - progress,
            can_redeem: balance >= REDEEM_COST,
        }
    }
}

/// Totals across the whole ledger for the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LedgerSummary {
    /// Number of enrolled customers.
    pub total_customers: u64,
    /// Sum of all positive deltas.
    pub total_points_given: i64,
    /// Points spent on redemptions.
    pub total_points_redeemed: i64,
    /// Sum of every delta: points customers currently hold.
    pub outstanding_balance: i64,
}

impl LedgerSummary {
    /// Folds `(kind, points)` pairs into a summary.
    #[must_use]
    pub fn fold<I>(total_customers: u64, entries: I) -> Self
    where
        I: IntoIterator<Item = (TransactionKind, i64)>,
    {
        entries.into_iter().fold(
            Self {
                total_customers,
                ..Self::default()
            },
            |mut acc, (kind, points)| {
                if points > 0 {
                    acc.total_points_given = acc.total_points_given.saturating_add(points);
                }
                if kind == TransactionKind::Redeem {
                    acc.total_points_redeemed =
                        acc.total_points_redeemed.saturating_add(points.saturating_abs());
                }
                acc.outstanding_balance = acc.outstanding_balance.saturating_add(points);
                acc
            },
        )
    }
}
