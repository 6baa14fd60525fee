//! Transaction policy engine.
//!
//! `authorize` is the only place that decides whether an action may append to
//! the ledger. It is pure: the caller supplies the balance read inside the
//! same database transaction that will perform the append.

use crate::auth::{Actor, Capability};

use super::error::LedgerError;
use super::types::{LedgerAppend, PointsAction, REDEEM_COST};

/// Validates `action` against the actor's role and the current balance.
///
/// On success returns the single entry to append. On failure nothing may be
/// appended.
///
/// # Example
///
/// ```
/// use rewards_core::auth::{Actor, AdminRole};
/// use rewards_core::ledger::{PointsAction, TransactionKind, authorize};
/// use rewards_shared::types::AdminId;
///
/// let actor = Actor::new(AdminId::new(), "admin", AdminRole::Superadmin);
/// let append = authorize(&actor, PointsAction::SetBalance(0), 50).unwrap();
/// assert_eq!(append.kind, TransactionKind::Edit);
/// assert_eq!(append.points, -50);
/// assert_eq!(append.balance_after, 0);
/// ```
pub fn authorize(
    actor: &Actor,
    action: PointsAction,
    current_balance: i64,
) -> Result<LedgerAppend, LedgerError> {
    let points = match action {
        PointsAction::Add(amount) => {
            actor.require(Capability::AdjustPoints)?;
            if amount <= 0 {
                return Err(LedgerError::NonPositiveAmount(action.kind()));
            }
            amount
        }
        PointsAction::Subtract(amount) => {
            actor.require(Capability::AdjustPoints)?;
            if amount <= 0 {
                return Err(LedgerError::NonPositiveAmount(action.kind()));
            }
            if current_balance < amount {
                return Err(LedgerError::InsufficientBalance {
                    balance: current_balance,
                    requested: amount,
                });
            }
            -amount
        }
        PointsAction::Redeem => {
            actor.require(Capability::AdjustPoints)?;
            if current_balance < REDEEM_COST {
                return Err(LedgerError::RedeemThresholdUnmet {
                    balance: current_balance,
                });
            }
            -REDEEM_COST
        }
        PointsAction::SetBalance(target) => {
            actor.require(Capability::EditBalance)?;
            if target < 0 {
                return Err(LedgerError::NegativeTarget);
            }
            if target == current_balance {
                return Err(LedgerError::BalanceUnchanged);
            }
            target
                .checked_sub(current_balance)
                .ok_or(LedgerError::AmountOverflow)?
        }
    };

    let balance_after = current_balance
        .checked_add(points)
        .ok_or(LedgerError::AmountOverflow)?;

    Ok(LedgerAppend {
        kind: action.kind(),
        points,
        balance_before: current_balance,
        balance_after,
    })
}
