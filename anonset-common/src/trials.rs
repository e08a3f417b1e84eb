//! Repeated selection runs with deduplication and ranking
//!
//! A single selection is randomized, so callers usually run it many times
//! and keep the best distinct result. [`TrialRunner`] does that:
//!
//! - the input is validated once,
//! - every trial gets its own `StdRng` seeded with `base_seed + trial_index`,
//!   so any single trial can be replayed on its own,
//! - solutions are deduplicated by identity (first occurrence wins),
//! - the best score group is selected according to a [`ScoreOrder`].
//!
//! Without an explicit seed a base seed is drawn from the thread-local
//! generator and logged, so a run can still be reproduced afterwards.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::HashSet;

use crate::coin_selection::selector::CoinSelector;
use crate::coin_selection::solution::Solution;
use crate::coin_selection::types::{Coin, Payment};
use crate::config::TrialsConfig;
use crate::error::AnonsetResult;
use crate::logging::{self, LogLevel};
use crate::validation;

/// Which end of the score range counts as best
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreOrder {
    /// The highest score wins
    #[default]
    HigherIsBetter,

    /// The lowest score wins
    LowerIsBetter,
}

impl ScoreOrder {
    /// Whether `candidate` ranks above `current`
    pub fn is_better(&self, candidate: Decimal, current: Decimal) -> bool {
        match self {
            ScoreOrder::HigherIsBetter => candidate > current,
            ScoreOrder::LowerIsBetter => candidate < current,
        }
    }
}

/// Runs a selector repeatedly and ranks the distinct results
#[derive(Debug, Clone)]
pub struct TrialRunner {
    trials: usize,
    seed: Option<u64>,
    score_order: ScoreOrder,
}

impl TrialRunner {
    /// Create a runner for the given number of trials with a random base seed
    pub fn new(trials: usize) -> Self {
        Self {
            trials,
            seed: None,
            score_order: ScoreOrder::default(),
        }
    }

    /// Create a runner from the `[trials]` configuration section
    pub fn from_config(config: &TrialsConfig) -> Self {
        Self {
            trials: config.count,
            seed: config.seed,
            score_order: config.score_order,
        }
    }

    /// Use a fixed base seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Rank solutions with the given order
    pub fn with_score_order(mut self, score_order: ScoreOrder) -> Self {
        self.score_order = score_order;
        self
    }

    /// Run all trials
    ///
    /// # Arguments
    ///
    /// * `selector` - Selector to run
    /// * `coins` - Available coins
    /// * `payments` - Payments to cover
    ///
    /// # Returns
    ///
    /// * The report of all trials, or a validation error for malformed input
    pub fn run(
        &self,
        selector: &CoinSelector,
        coins: &[Coin],
        payments: &[Payment],
    ) -> AnonsetResult<TrialReport> {
        validation::validate_params(selector.params())?;
        validation::validate_coins(coins)?;
        validation::validate_payments(payments)?;

        let seed = self.seed.unwrap_or_else(|| rand::rng().random());
        logging::log_trials(
            LogLevel::Info,
            "starting trials",
            Some(json!({
                "trials": self.trials,
                "seed": seed,
                "coins": coins.len(),
                "payments": payments.len(),
            })),
        );

        let attempts: Vec<Solution> = (0..self.trials)
            .map(|trial| {
                let mut rng = StdRng::seed_from_u64(seed.wrapping_add(trial as u64));
                selector.select_unchecked(coins, payments, &mut rng)
            })
            .collect();

        let unique = deduplicate(&attempts);
        let best = best_solutions(&unique, self.score_order);

        logging::log_trials(
            LogLevel::Info,
            "trials finished",
            Some(json!({
                "attempts": attempts.len(),
                "unique": unique.len(),
                "best": best.len(),
                "best_score": best.first().map(|s| s.score().to_string()),
            })),
        );

        Ok(TrialReport {
            seed,
            pending_payments: payments.len(),
            attempts,
            unique,
            best,
        })
    }
}

/// Outcome of a series of trials
#[derive(Debug, Clone, Serialize)]
pub struct TrialReport {
    /// Base seed of the series
    pub seed: u64,

    /// Number of payments each trial tried to cover
    pub pending_payments: usize,

    /// Every solution, in trial order
    pub attempts: Vec<Solution>,

    /// Distinct solutions, first occurrence first
    pub unique: Vec<Solution>,

    /// Distinct solutions sharing the best score
    pub best: Vec<Solution>,
}

impl TrialReport {
    /// Distinct solutions that handle every payment
    pub fn fully_handled(&self) -> Vec<&Solution> {
        self.unique
            .iter()
            .filter(|solution| solution.handled_payments.len() == self.pending_payments)
            .collect()
    }
}

/// Keep the first solution of every identity, preserving order
pub fn deduplicate(solutions: &[Solution]) -> Vec<Solution> {
    let mut seen: HashSet<&Solution> = HashSet::with_capacity(solutions.len());
    solutions
        .iter()
        .filter(|solution| seen.insert(*solution))
        .cloned()
        .collect()
}

/// All solutions sharing the best score under `order`
pub fn best_solutions(solutions: &[Solution], order: ScoreOrder) -> Vec<Solution> {
    let scored: Vec<(Decimal, &Solution)> = solutions.iter().map(|s| (s.score(), s)).collect();

    let best_score = scored.iter().map(|(score, _)| *score).reduce(|best, score| {
        if order.is_better(score, best) {
            score
        } else {
            best
        }
    });

    match best_score {
        Some(best_score) => scored
            .into_iter()
            .filter(|(score, _)| *score == best_score)
            .map(|(_, solution)| solution.clone())
            .collect(),
        None => Vec::new(),
    }
}
