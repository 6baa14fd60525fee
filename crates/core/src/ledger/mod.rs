//! Points ledger.
//!
//! A customer's balance is never stored. It is the sum of an append-only
//! sequence of signed entries, and every mutation (including an absolute
//! "set balance") is recorded as one more signed delta.
//!
//! - `balance` - the pure fold, reward progress and ledger summary
//! - `policy` - authorization and arithmetic checks for each action
//! - `types` - entry kinds, actions and the append produced by the policy
//! - `error` - rejection reasons

pub mod balance;
pub mod error;
pub mod policy;
pub mod types;

#[cfg(test)]
mod policy_props;

pub use balance::{LedgerSummary, RewardProgress, balance, balance_of};
pub use error::LedgerError;
pub use policy::authorize;
pub use types::{LedgerAppend, LedgerEntry, PointsAction, REDEEM_COST, REWARD_LABEL, TransactionKind};
