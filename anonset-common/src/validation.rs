//! Input validation for coin selection
//!
//! The selector assumes well-formed input: positive values, non-negative
//! anonymity sets and unique coin names. This module checks those
//! assumptions before a run starts, so malformed input is rejected with a
//! descriptive error instead of producing a silently wrong selection.
//!
//! # Usage
//!
//! ```
//! use anonset_common::coin_selection::types::Coin;
//! use anonset_common::validation::{validate_coins, ValidationError};
//! use rust_decimal_macros::dec;
//!
//! let coins = vec![Coin::new("a", dec!(1), 0.0), Coin::new("a", dec!(2), 0.0)];
//! assert!(matches!(validate_coins(&coins), Err(ValidationError::DuplicateCoin(_))));
//! ```

use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use std::collections::HashSet;
use thiserror::Error;

use crate::coin_selection::types::{Coin, Payment, SelectionParams};

/// Errors that can occur during validation
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Invalid anonymity set: {0}")]
    InvalidAnonymitySet(String),

    #[error("Invalid coin name: {0}")]
    InvalidName(String),

    #[error("Duplicate coin: {0}")]
    DuplicateCoin(String),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
}

/// Validates a coin or payment amount (must be strictly positive)
pub fn validate_amount(value: Decimal, what: &str) -> Result<(), ValidationError> {
    if value <= Decimal::ZERO {
        return Err(ValidationError::InvalidAmount(format!(
            "{} must be positive, got {}",
            what, value
        )));
    }
    Ok(())
}

/// Validates a single coin
pub fn validate_coin(coin: &Coin) -> Result<(), ValidationError> {
    if coin.name.trim().is_empty() {
        return Err(ValidationError::InvalidName("coin name is empty".to_string()));
    }

    validate_amount(coin.value, &format!("value of coin {}", coin.name))?;

    if !coin.anonymity_set.is_finite() || coin.anonymity_set < 0.0 {
        return Err(ValidationError::InvalidAnonymitySet(format!(
            "coin {} has anonymity set {}",
            coin.name, coin.anonymity_set
        )));
    }

    // Scoring divides by the anonymity set as a Decimal
    if coin.anonymity_set > 0.0 {
        match Decimal::from_f64(coin.anonymity_set) {
            Some(anonset) if !anonset.is_zero() => {}
            _ => {
                return Err(ValidationError::InvalidAnonymitySet(format!(
                    "coin {} has anonymity set {} outside the representable range",
                    coin.name, coin.anonymity_set
                )));
            }
        }
    }

    Ok(())
}

/// Validates a coin set: every coin on its own, unique names, and a total
/// value that fits in a `Decimal`
pub fn validate_coins(coins: &[Coin]) -> Result<(), ValidationError> {
    let mut seen = HashSet::with_capacity(coins.len());
    let mut total = Decimal::ZERO;

    for coin in coins {
        validate_coin(coin)?;

        if !seen.insert(coin.name.as_str()) {
            return Err(ValidationError::DuplicateCoin(coin.name.clone()));
        }

        total = total.checked_add(coin.value).ok_or_else(|| {
            ValidationError::InvalidAmount(format!(
                "total coin value overflows at coin {}",
                coin.name
            ))
        })?;
    }

    Ok(())
}

/// Validates the pending payments: each positive, total within range
pub fn validate_payments(payments: &[Payment]) -> Result<(), ValidationError> {
    let mut total = Decimal::ZERO;

    for (index, payment) in payments.iter().enumerate() {
        validate_amount(payment.value, &format!("payment #{}", index))?;

        total = total.checked_add(payment.value).ok_or_else(|| {
            ValidationError::InvalidAmount(format!(
                "total payment value overflows at payment #{}",
                index
            ))
        })?;
    }

    Ok(())
}

/// Validates selection parameters
///
/// A coin limit of zero is accepted: it yields an empty selection.
pub fn validate_params(params: &SelectionParams) -> Result<(), ValidationError> {
    if params.anonymity_target == 0 {
        return Err(ValidationError::InvalidParameter(
            "anonymity target must be greater than 0".to_string(),
        ));
    }

    if params.shuffle_chance_percent > 100 {
        return Err(ValidationError::InvalidParameter(format!(
            "shuffle chance must be at most 100 percent, got {}",
            params.shuffle_chance_percent
        )));
    }

    Ok(())
}
