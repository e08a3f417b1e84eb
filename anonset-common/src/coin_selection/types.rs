//! Core types for anonymity-set aware coin selection
//!
//! This module defines the entities consumed by the selector and the
//! parameters that steer it.
//!
//! # Key Types
//!
//! - [`Coin`]: A spendable value unit with a privacy measure
//! - [`Payment`]: An outgoing amount that a selection tries to cover
//! - [`AnonsetTier`]: Privacy tier of a coin relative to an anonymity target
//! - [`SelectionParams`]: Limits and tuning knobs for a single selection run
//!
//! # Example
//!
//! ```
//! use anonset_common::coin_selection::types::{AnonsetTier, Coin};
//! use rust_decimal_macros::dec;
//!
//! let coin = Coin::new("coin1", dec!(10), 1.0).with_origin("tx-a");
//!
//! assert_eq!(AnonsetTier::classify(&coin, 2), AnonsetTier::Orange);
//! ```

use rust_decimal::Decimal;
use rust_decimal::prelude::FromPrimitive;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use crate::validation::ValidationError;

/// A spendable coin
///
/// # Fields
///
/// * `name` - Identifier, unique within one input set
/// * `value` - Amount held by the coin
/// * `anonymity_set` - How many indistinguishable equivalents the coin is mixed among
/// * `origin` - Identifier of the transaction that created the coin, if known
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Coin {
    /// Identifier, unique within one input set
    pub name: String,

    /// Amount held by the coin
    pub value: Decimal,

    /// Privacy measure, higher is more private
    pub anonymity_set: f64,

    /// Transaction the coin originates from
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub origin: Option<String>,
}

impl Coin {
    /// Create a coin without origin information
    ///
    /// # Arguments
    /// * `name` - Identifier of the coin
    /// * `value` - Amount held by the coin
    /// * `anonymity_set` - Privacy measure of the coin
    pub fn new(name: impl Into<String>, value: Decimal, anonymity_set: f64) -> Self {
        Self {
            name: name.into(),
            value,
            anonymity_set,
            origin: None,
        }
    }

    /// Attach the identifier of the transaction that created this coin
    pub fn with_origin(mut self, origin: impl Into<String>) -> Self {
        self.origin = Some(origin.into());
        self
    }

    /// Whether `other` was created by the same transaction.
    ///
    /// Two coins without origin information count as sharing an origin.
    pub fn shares_origin_with(&self, other: &Coin) -> bool {
        self.origin == other.origin
    }

    /// Privacy cost of spending this coin: the full value for coins that were
    /// never mixed, otherwise the value spread over the anonymity set.
    ///
    /// An anonymity set that has no non-zero `Decimal` form (rejected by
    /// [`validate_coin`](crate::validation::validate_coin)) is costed like an
    /// unmixed coin. A quotient beyond the `Decimal` range saturates at
    /// `Decimal::MAX`.
    pub fn privacy_cost(&self) -> Decimal {
        if self.anonymity_set <= 0.0 {
            return self.value;
        }

        match Decimal::from_f64(self.anonymity_set) {
            Some(anonset) if !anonset.is_zero() => {
                self.value.checked_div(anonset).unwrap_or(Decimal::MAX)
            }
            _ => self.value,
        }
    }
}

/// An outgoing payment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payment {
    /// Amount to pay
    pub value: Decimal,
}

impl Payment {
    pub fn new(value: Decimal) -> Self {
        Self { value }
    }
}

/// Privacy tier of a coin
///
/// The declaration order is the spending preference: red coins are consumed
/// first, green coins last.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnonsetTier {
    /// Never mixed (anonymity set of zero)
    Red,

    /// Mixed, but below the anonymity target
    Orange,

    /// At or above the anonymity target
    Green,
}

impl AnonsetTier {
    /// All tiers in spending order
    pub const ALL: [AnonsetTier; 3] = [AnonsetTier::Red, AnonsetTier::Orange, AnonsetTier::Green];

    /// Classify a coin against an anonymity target
    ///
    /// # Arguments
    /// * `coin` - Coin to classify
    /// * `anonymity_target` - Anonymity set at which a coin counts as private
    ///
    /// # Returns
    /// * `Red` if the anonymity set is zero or less, `Green` if it reaches the
    ///   target, `Orange` otherwise
    pub fn classify(coin: &Coin, anonymity_target: u32) -> Self {
        if coin.anonymity_set <= 0.0 {
            AnonsetTier::Red
        } else if coin.anonymity_set >= f64::from(anonymity_target) {
            AnonsetTier::Green
        } else {
            AnonsetTier::Orange
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AnonsetTier::Red => "red",
            AnonsetTier::Orange => "orange",
            AnonsetTier::Green => "green",
        }
    }
}

impl fmt::Display for AnonsetTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AnonsetTier {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "red" => Ok(AnonsetTier::Red),
            "orange" => Ok(AnonsetTier::Orange),
            "green" => Ok(AnonsetTier::Green),
            other => Err(ValidationError::InvalidParameter(format!(
                "Unknown anonymity tier: {}",
                other
            ))),
        }
    }
}

/// How the random decisions of the orderer and the pruning pass are scaled
///
/// `Literal` computes the shuffle chance and the red/orange capacity ratio
/// with truncating integer arithmetic, which collapses them to "always" or
/// "never". It exists so runs can be compared against selections produced
/// that way. `Fractional` uses the percentages the parameters describe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProbabilityScaling {
    /// Probabilities as fractions of one
    #[default]
    Fractional,

    /// Integer-truncated probabilities
    Literal,
}

/// Parameters of one selection run
#[derive(Debug, Clone, PartialEq)]
pub struct SelectionParams {
    /// Anonymity set at which a coin counts as green
    pub anonymity_target: u32,

    /// Maximum number of coins in a solution
    pub max_coins: usize,

    /// Maximum number of selected coins per tier; absent tiers are unlimited
    pub tier_caps: HashMap<AnonsetTier, usize>,

    /// Chance, in percent, that two adjacent candidates trade places
    pub shuffle_chance_percent: u32,

    /// Scaling of random decisions
    pub probability_scaling: ProbabilityScaling,
}

impl Default for SelectionParams {
    fn default() -> Self {
        Self {
            anonymity_target: 2,
            max_coins: 3,
            tier_caps: HashMap::new(),
            shuffle_chance_percent: 10,
            probability_scaling: ProbabilityScaling::Fractional,
        }
    }
}

impl SelectionParams {
    /// Create parameters with the given target and coin limit and defaults otherwise
    pub fn new(anonymity_target: u32, max_coins: usize) -> Self {
        Self {
            anonymity_target,
            max_coins,
            ..Self::default()
        }
    }

    /// Limit the number of selected coins of one tier
    pub fn with_tier_cap(mut self, tier: AnonsetTier, cap: usize) -> Self {
        self.tier_caps.insert(tier, cap);
        self
    }

    /// Set the adjacent-swap chance of the light shuffle
    pub fn with_shuffle_chance(mut self, percent: u32) -> Self {
        self.shuffle_chance_percent = percent;
        self
    }

    /// Set the probability scaling
    pub fn with_probability_scaling(mut self, scaling: ProbabilityScaling) -> Self {
        self.probability_scaling = scaling;
        self
    }

    /// Cap configured for a tier, `None` meaning unlimited
    pub fn tier_cap(&self, tier: AnonsetTier) -> Option<usize> {
        self.tier_caps.get(&tier).copied()
    }
}
