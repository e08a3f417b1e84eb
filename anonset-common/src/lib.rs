//! Anonset Common Library
//!
//! This crate selects coins to cover outgoing payments while spending coins
//! with weak privacy guarantees (a low anonymity set) first, and scores the
//! resulting selections so that repeated randomized runs can be compared.
//!
//! # Modules
//!
//! - `coin_selection`: Coins, payments, tiers, ordering, the selector and solutions
//! - `trials`: Repeated runs, deduplication and best-of-N ranking
//! - `validation`: Input validation for coins, payments and parameters
//! - `error`: Error types shared by the crate
//! - `config`: TOML configuration
//! - `logging`: Logging setup and structured log helpers
//!
//! # Example
//!
//! ```
//! use anonset_common::{Coin, CoinSelector, Payment, SelectionParams, TrialRunner};
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
//! let report = TrialRunner::new(20).with_seed(7).run(&selector, &coins, &payments).unwrap();
//!
//! assert!(!report.best.is_empty());
//! ```

/// Coin selection core
pub mod coin_selection;

/// Repeated runs and ranking
pub mod trials;

/// Input validation
pub mod validation;

/// Error handling
pub mod error;

/// Configuration management
pub mod config;

/// Logging functionality
pub mod logging;

/// Re-export coin selection types
pub use coin_selection::{
    order_coins, AnonsetTier, Coin, CoinSelector, Payment, ProbabilityScaling, SelectionParams,
    Solution,
};

/// Re-export trial types
pub use trials::{ScoreOrder, TrialReport, TrialRunner};

pub use config::Config;
pub use error::{AnonsetError, AnonsetResult};
pub use validation::ValidationError;

/// Library version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
