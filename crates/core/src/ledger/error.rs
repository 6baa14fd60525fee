//! Reasons a points action is rejected.
//!
//! A rejected action appends nothing.

use rewards_shared::AppError;
use thiserror::Error;

use super::types::TransactionKind;
use crate::auth::PermissionDenied;

/// Errors that can occur when authorizing a points action.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    // ========== Validation Errors ==========
    /// Add or subtract with an amount of zero or less.
    #[error("Enter a positive number of points to {}.", .0.as_str())]
    NonPositiveAmount(TransactionKind),

    /// Set-balance target below zero.
    #[error("Balance cannot be negative.")]
    NegativeTarget,

    /// Amount or resulting balance does not fit in 64 bits.
    #[error("Point amount is too large.")]
    AmountOverflow,

    // ========== Authorization Errors ==========
    /// The actor's role does not allow the action.
    #[error(transparent)]
    PermissionDenied(#[from] PermissionDenied),

    // ========== Business Rule Errors ==========
    /// Subtracting would drive the balance below zero.
    #[error("Cannot reduce below zero points.")]
    InsufficientBalance {
        /// Balance at the time of the request.
        balance: i64,
        /// Requested deduction.
        requested: i64,
    },

    /// Balance is below the redemption cost.
    #[error("Customer does not have enough points to redeem.")]
    RedeemThresholdUnmet {
        /// Balance at the time of the request.
        balance: i64,
    },

    /// Set-balance target equals the current balance.
    #[error("The balance is already set to that value.")]
    BalanceUnchanged,
}

impl LedgerError {
    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::NonPositiveAmount(_) => "NON_POSITIVE_AMOUNT",
            Self::NegativeTarget => "NEGATIVE_BALANCE_TARGET",
            Self::AmountOverflow => "AMOUNT_OVERFLOW",
            Self::PermissionDenied(_) => "FORBIDDEN",
            Self::InsufficientBalance { .. } => "INSUFFICIENT_BALANCE",
            Self::RedeemThresholdUnmet { .. } => "REDEEM_THRESHOLD_UNMET",
            Self::BalanceUnchanged => "BALANCE_UNCHANGED",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn http_status_code(&self) -> u16 {
        match self {
            // 400 Bad Request - malformed input
            Self::NonPositiveAmount(_) | Self::NegativeTarget | Self::AmountOverflow => 400,
            // 403 Forbidden - role gate
            Self::PermissionDenied(_) => 403,
            // 422 Unprocessable Entity - ledger rules
            Self::InsufficientBalance { .. }
            | Self::RedeemThresholdUnmet { .. }
            | Self::BalanceUnchanged => 422,
        }
    }
}

impl From<LedgerError> for AppError {
    fn from(err: LedgerError) -> Self {
        let message = err.to_string();
        match err.http_status_code() {
            400 => Self::Validation(message),
            403 => Self::Forbidden(message),
            _ => Self::BusinessRule(message),
        }
    }
}
