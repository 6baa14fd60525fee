//! Property-based tests for the points ledger.
//!
//! Random action sequences are replayed through `authorize`, appending only
//! what it accepts, and the resulting ledger is checked against the fold.

use proptest::prelude::*;
use rewards_shared::types::{AdminId, CustomerId};

use super::balance::balance;
use super::error::LedgerError;
use super::policy::authorize;
use super::types::{LedgerEntry, PointsAction, REDEEM_COST, TransactionKind};
use crate::auth::{Actor, AdminRole};

fn role_strategy() -> impl Strategy<Value = AdminRole> {
    prop_oneof![Just(AdminRole::Cashier), Just(AdminRole::Superadmin)]
}

/// Mostly valid actions, with some zero, negative and oversized amounts.
fn action_strategy() -> impl Strategy<Value = PointsAction> {
    prop_oneof![
        (-10i64..1_000).prop_map(PointsAction::Add),
        (-10i64..1_000).prop_map(PointsAction::Subtract),
        Just(PointsAction::Redeem),
        (-10i64..2_000).prop_map(PointsAction::SetBalance),
    ]
}

fn actor(role: AdminRole) -> Actor {
    Actor::new(AdminId::new(), "prop", role)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Balance equals the sum of appended deltas and never goes negative.
    #[test]
    fn prop_balance_is_sum_and_never_negative(
        steps in prop::collection::vec((role_strategy(), action_strategy()), 0..60),
    ) {
        let customer_id = CustomerId::new();
        let mut ledger: Vec<LedgerEntry> = Vec::new();

        for (role, action) in steps {
            let current = balance(customer_id, &ledger);
            if let Ok(append) = authorize(&actor(role), action, current) {
                ledger.push(LedgerEntry { customer_id, kind: append.kind, points: append.points });
                let after = balance(customer_id, &ledger);
                prop_assert_eq!(after, append.balance_after);
                prop_assert_eq!(after, current + append.points);
            }
            prop_assert!(balance(customer_id, &ledger) >= 0);
        }

        let summed: i64 = ledger.iter().map(|e| e.points).sum();
        prop_assert_eq!(balance(customer_id, &ledger), summed);
    }

    /// After an accepted edit to `T` the balance is exactly `T`.
    #[test]
    fn prop_edit_lands_on_target(current in 0i64..10_000, target in 0i64..10_000) {
        let result = authorize(&actor(AdminRole::Superadmin), PointsAction::SetBalance(target), current);
        if target == current {
            prop_assert_eq!(result, Err(LedgerError::BalanceUnchanged));
        } else {
            let append = result.unwrap();
            prop_assert_eq!(append.kind, TransactionKind::Edit);
            prop_assert_eq!(append.points, target - current);
            prop_assert_eq!(current + append.points, target);
        }
    }

    /// Redeem is accepted iff balance >= 200 and always deducts exactly 200.
    #[test]
    fn prop_redeem_threshold(current in 0i64..1_000, role in role_strategy()) {
        match authorize(&actor(role), PointsAction::Redeem, current) {
            Ok(append) => {
                prop_assert!(current >= REDEEM_COST);
                prop_assert_eq!(append.points, -REDEEM_COST);
            }
            Err(err) => {
                prop_assert!(current < REDEEM_COST);
                prop_assert_eq!(err, LedgerError::RedeemThresholdUnmet { balance: current });
            }
        }
    }

    /// Cashiers can never edit a balance.
    #[test]
    fn prop_cashier_edit_rejected(current in 0i64..10_000, target in -100i64..10_000) {
        let err = authorize(&actor(AdminRole::Cashier), PointsAction::SetBalance(target), current)
            .unwrap_err();
        prop_assert!(matches!(err, LedgerError::PermissionDenied(_)));
    }

    /// Subtract is accepted iff the amount is positive and covered.
    #[test]
    fn prop_subtract_never_overdraws(current in 0i64..1_000, amount in -10i64..2_000) {
        let result = authorize(&actor(AdminRole::Cashier), PointsAction::Subtract(amount), current);
        prop_assert_eq!(result.is_ok(), amount > 0 && amount <= current);
        if let Ok(append) = result {
            prop_assert!(append.balance_after >= 0);
        }
    }
}
