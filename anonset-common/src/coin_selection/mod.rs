//! Coin selection module
//!
//! This module selects coins to cover a set of payments while spending the
//! least private coins first, and scores the result so that repeated
//! randomized runs can be compared.
//!
//! # Module Structure
//!
//! - `types.rs` - Coins, payments, privacy tiers and selection parameters
//! - `ordering.rs` - Priority sort, origin de-clustering and light shuffle
//! - `selector.rs` - The greedy selection loop (`CoinSelector`)
//! - `solution.rs` - Selection results with score and identity
//! - `chance.rs` - Random decisions shared by ordering and selection
//!
//! # Privacy Tiers
//!
//! Coins are classified against an anonymity target:
//!
//! - **Red**: never mixed (anonymity set of zero)
//! - **Orange**: mixed, but below the target
//! - **Green**: at or above the target
//!
//! Red coins are spent first and green coins last. Per-tier caps limit how
//! many coins of a tier one solution may hold.
//!
//! # Randomness
//!
//! Every random decision goes through the generator handed to
//! [`CoinSelector::select`]. A seeded generator (for example
//! `rand::rngs::StdRng::seed_from_u64`) reproduces a run exactly.

pub mod types;
pub mod ordering;
pub mod selector;
pub mod solution;
mod chance;

pub use ordering::order_coins;
pub use selector::CoinSelector;
pub use solution::Solution;
pub use types::{AnonsetTier, Coin, Payment, ProbabilityScaling, SelectionParams};
