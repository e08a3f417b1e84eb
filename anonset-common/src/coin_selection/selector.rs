//! Greedy coin selector
//!
//! This module provides [`CoinSelector`], the entry point of a selection run.
//!
//! # Overview
//!
//! A run orders the coins (see [`ordering`](crate::coin_selection::ordering)),
//! then walks the candidates front to back:
//!
//! 1. The front candidate is classified. If the solution already holds as
//!    many coins of that tier as the tier cap allows, the candidate is
//!    dropped for good; it is not requeued.
//! 2. Otherwise it joins the solution, and payments that fit the leftover
//!    value are assigned one at a time, each picked at random among those
//!    that fit.
//! 3. Once every payment is handled, the remaining candidates are thinned
//!    out: red and orange coins are dropped with a chance that shrinks as the
//!    solution approaches its coin limit, green coins with a fixed chance.
//!
//! The run stops when no candidates remain or the coin limit is reached.
//! Running out of coins before every payment is handled is not an error;
//! compare [`Solution::handles_all`] against the input payments to detect it.
//!
//! # Usage
//!
//! ```
//! use anonset_common::coin_selection::selector::CoinSelector;
//! use anonset_common::coin_selection::types::{Coin, Payment, SelectionParams};
//! use rand::rngs::StdRng;
//! use rand::SeedableRng;
//! use rust_decimal_macros::dec;
//!
//! let coins = vec![
//!     Coin::new("A", dec!(10), 0.0),
//!     Coin::new("B", dec!(5), 1.0),
//!     Coin::new("C", dec!(15), 2.0),
//! ];
//! let payments = vec![Payment::new(dec!(5)), Payment::new(dec!(2))];
//!
//! let selector = CoinSelector::new(SelectionParams::new(2, 3));
//! let mut rng = StdRng::seed_from_u64(42);
//! let solution = selector.select(&coins, &payments, &mut rng).unwrap();
//!
//! assert!(solution.handles_all(&payments));
//! ```

use rand::Rng;
use serde_json::json;
use std::collections::VecDeque;
use std::time::Instant;

use crate::coin_selection::ordering::order_coins;
use crate::coin_selection::solution::Solution;
use crate::coin_selection::types::{AnonsetTier, Coin, Payment, SelectionParams};
use crate::logging::{self, LogLevel};
use crate::validation::{self, ValidationError};

/// Selector favoring low anonymity set coins for spending
///
/// Holds the parameters of a run; the coins, payments and random source are
/// passed to [`CoinSelector::select`] so that one selector can serve many
/// independent runs.
#[derive(Debug, Clone, Default)]
pub struct CoinSelector {
    params: SelectionParams,
}

impl CoinSelector {
    /// Create a selector with the given parameters
    pub fn new(params: SelectionParams) -> Self {
        Self { params }
    }

    /// Parameters used by this selector
    pub fn params(&self) -> &SelectionParams {
        &self.params
    }

    /// Validate the input, order the coins and run the greedy selection
    ///
    /// # Arguments
    ///
    /// * `coins` - Available coins
    /// * `payments` - Payments to cover
    /// * `rng` - Random source for ordering, payment matching and pruning
    ///
    /// # Returns
    ///
    /// * The solution of this run, or the first validation failure
    pub fn select<R: Rng + ?Sized>(
        &self,
        coins: &[Coin],
        payments: &[Payment],
        rng: &mut R,
    ) -> Result<Solution, ValidationError> {
        validation::validate_params(&self.params)?;
        validation::validate_coins(coins)?;
        validation::validate_payments(payments)?;

        Ok(self.select_unchecked(coins, payments, rng))
    }

    /// Run the selection on input that was already validated
    ///
    /// Used by the trial runner, which validates once and selects many times.
    pub(crate) fn select_unchecked<R: Rng + ?Sized>(
        &self,
        coins: &[Coin],
        payments: &[Payment],
        rng: &mut R,
    ) -> Solution {
        let stopwatch = Instant::now();

        let ordered = order_coins(coins, &self.params, rng);
        let mut solution = self.select_ordered(ordered, payments, rng);

        solution.time_elapsed = stopwatch.elapsed();

        logging::log_selection(
            LogLevel::Debug,
            "selection finished",
            Some(json!({
                "coins": solution.coins.len(),
                "handled_payments": solution.handled_payments.len(),
                "pending_payments": payments.len(),
                "leftover": solution.leftover_value().to_string(),
                "elapsed_us": solution.time_elapsed.as_micros() as u64,
            })),
        );

        solution
    }

    /// Greedy loop over an already ordered candidate list
    ///
    /// # Arguments
    ///
    /// * `ordered` - Candidates, consumed front to back
    /// * `payments` - Payments to cover
    /// * `rng` - Random source for payment matching and pruning
    pub fn select_ordered<R: Rng + ?Sized>(
        &self,
        ordered: Vec<Coin>,
        payments: &[Payment],
        rng: &mut R,
    ) -> Solution {
        let target = self.params.anonymity_target;
        let max_coins = self.params.max_coins;

        let mut remaining_coins: VecDeque<Coin> = ordered.into();
        let mut remaining_payments: Vec<Payment> = payments.to_vec();
        let mut solution = Solution::new();

        while solution.coins.len() < max_coins {
            let Some(coin) = remaining_coins.pop_front() else {
                break;
            };
            let tier = AnonsetTier::classify(&coin, target);

            if let Some(cap) = self.params.tier_cap(tier) {
                if solution.tier_count(tier, target) >= cap {
                    log::debug!("Dropping {} coin {}: tier cap {} reached", tier, coin.name, cap);
                    continue;
                }
            }

            log::debug!("Selecting {} coin {} ({})", tier, coin.name, coin.value);
            solution.coins.push(coin);

            assign_fitting_payments(&mut solution, &mut remaining_payments, rng);

            if remaining_payments.is_empty() && !remaining_coins.is_empty() {
                let before = remaining_coins.len();
                self.prune_remaining(&mut remaining_coins, solution.coins.len(), rng);
                log::debug!(
                    "All payments handled, pruned {} of {} remaining coins",
                    before - remaining_coins.len(),
                    before
                );
            }
        }

        solution
    }

    /// Thin out the remaining candidates once all payments are handled
    fn prune_remaining<R: Rng + ?Sized>(
        &self,
        remaining: &mut VecDeque<Coin>,
        selected: usize,
        rng: &mut R,
    ) {
        let scaling = self.params.probability_scaling;
        let target = self.params.anonymity_target;
        let max_coins = self.params.max_coins;

        remaining.retain(|coin| {
            let drop = match AnonsetTier::classify(coin, target) {
                // Still needs mixing later, so only keep it while the
                // selection has room to spare
                AnonsetTier::Red | AnonsetTier::Orange => {
                    scaling.prune_mixable(rng, selected, max_coins)
                }
                AnonsetTier::Green => scaling.prune_private(rng),
            };
            !drop
        });
    }
}

/// Move payments that fit the leftover value into the solution, picking each
/// one uniformly among those that currently fit
fn assign_fitting_payments<R: Rng + ?Sized>(
    solution: &mut Solution,
    remaining: &mut Vec<Payment>,
    rng: &mut R,
) {
    loop {
        let leftover = solution.leftover_value();
        let fitting: Vec<usize> = remaining
            .iter()
            .enumerate()
            .filter(|(_, payment)| payment.value <= leftover)
            .map(|(index, _)| index)
            .collect();

        if fitting.is_empty() {
            break;
        }

        let pick = fitting[rng.random_range(0..fitting.len())];
        let payment = remaining.remove(pick);
        debug_assert!(payment.value <= leftover);
        solution.handled_payments.push(payment);
    }
}
