//! Domain types for the points ledger.

use rewards_shared::types::CustomerId;
use serde::{Deserialize, Serialize};

/// Points deducted by one redemption.
pub const REDEEM_COST: i64 = 200;

/// What one redemption is worth to the customer.
pub const REWARD_LABEL: &str = "$5";

/// Label stored with each ledger entry.
///
/// Display and audit only: the balance is computed from the sign of
/// `points`, never from the kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionKind {
    /// Points granted.
    Add,
    /// Points removed.
    Subtract,
    /// Fixed-cost reward redemption.
    Redeem,
    /// Superadmin balance correction.
    Edit,
}

impl TransactionKind {
    /// Returns the kind as stored in the database.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Add => "add",
            Self::Subtract => "subtract",
            Self::Redeem => "redeem",
            Self::Edit => "edit",
        }
    }
}

impl std::fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for TransactionKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "add" => Ok(Self::Add),
            "subtract" => Ok(Self::Subtract),
            "redeem" => Ok(Self::Redeem),
            "edit" => Ok(Self::Edit),
            other => Err(format!("unknown transaction kind: {other}")),
        }
    }
}

/// A mutating request against a customer's points.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointsAction {
    /// Grant a positive number of points.
    Add(i64),
    /// Remove a positive number of points.
    Subtract(i64),
    /// Spend `REDEEM_COST` points on a reward.
    Redeem,
    /// Set the balance to an absolute, non-negative value.
    SetBalance(i64),
}

impl PointsAction {
    /// Kind recorded for the entry this action appends.
    #[must_use]
    pub const fn kind(&self) -> TransactionKind {
        match self {
            Self::Add(_) => TransactionKind::Add,
            Self::Subtract(_) => TransactionKind::Subtract,
            Self::Redeem => TransactionKind::Redeem,
            Self::SetBalance(_) => TransactionKind::Edit,
        }
    }

    /// Message shown to the operator once the action is recorded.
    #[must_use]
    pub fn success_message(&self) -> String {
        match self {
            Self::Add(amount) => format!("Added {amount} points."),
            Self::Subtract(amount) => format!("Subtracted {amount} points."),
            Self::Redeem => format!("Redeemed {REDEEM_COST} points for {REWARD_LABEL} reward."),
            Self::SetBalance(target) => format!("Adjusted balance to {target} points."),
        }
    }
}

/// The single entry an accepted action appends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LedgerAppend {
    /// Entry kind.
    pub kind: TransactionKind,
    /// Signed delta.
    pub points: i64,
    /// Balance the decision was based on.
    pub balance_before: i64,
    /// Balance once the entry is appended.
    pub balance_after: i64,
}

/// A stored ledger entry as seen by the balance calculator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerEntry {
    /// Customer the entry belongs to.
    pub customer_id: CustomerId,
    /// Entry kind.
    pub kind: TransactionKind,
    /// Signed delta.
    pub points: i64,
}
