//! Selection results, their score and their identity
//!
//! A [`Solution`] is built by one selection run and read-only afterwards.
//! Everything beyond the selected coins, the handled payments and the elapsed
//! time is derived on demand.
//!
//! Two solutions are equal when their identity strings are equal. The
//! identity sorts coin names and payment values before joining them, so it
//! does not depend on the order in which the run picked them. `Hash` uses
//! the same string, which keeps solutions usable as `HashSet`/`HashMap` keys.

use rust_decimal::Decimal;
use serde::Serialize;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::time::Duration;

use crate::coin_selection::types::{AnonsetTier, Coin, Payment};

/// Separator used when building solution identities
pub const ID_SEPARATOR: &str = "-";

/// Coins selected by one run and the payments they cover
#[derive(Debug, Clone, Default, Serialize)]
pub struct Solution {
    /// Selected coins, in selection order
    pub coins: Vec<Coin>,

    /// Payments assigned to the selected coins, in assignment order
    pub handled_payments: Vec<Payment>,

    /// Wall-clock duration of the run that built this solution
    pub time_elapsed: Duration,
}

impl Solution {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sum of selected coin values
    pub fn total_value(&self) -> Decimal {
        self.coins.iter().map(|coin| coin.value).sum()
    }

    /// Sum of handled payment values
    pub fn total_payment_cost(&self) -> Decimal {
        self.handled_payments.iter().map(|payment| payment.value).sum()
    }

    /// Value of the selected coins not assigned to any payment
    pub fn leftover_value(&self) -> Decimal {
        self.total_value() - self.total_payment_cost()
    }

    /// Number of selected coins that fall in `tier` for the given target
    pub fn tier_count(&self, tier: AnonsetTier, anonymity_target: u32) -> usize {
        self.coins
            .iter()
            .filter(|coin| AnonsetTier::classify(coin, anonymity_target) == tier)
            .count()
    }

    /// Whether every payment in `payments` was handled
    pub fn handles_all(&self, payments: &[Payment]) -> bool {
        self.handled_payments.len() == payments.len()
    }

    /// Score used to rank solutions
    ///
    /// The average privacy cost of the selected coins (see
    /// [`Coin::privacy_cost`]) plus the number of handled payments.
    /// Sums saturate at `Decimal::MAX`.
    pub fn score(&self) -> Decimal {
        let coin_cost = self
            .coins
            .iter()
            .map(Coin::privacy_cost)
            .fold(Decimal::ZERO, Decimal::saturating_add);
        let divisor = Decimal::from(self.coins.len().max(1));

        (coin_cost / divisor).saturating_add(Decimal::from(self.handled_payments.len()))
    }

    /// Canonical identity: sorted coin names followed by sorted payment values
    pub fn id(&self) -> String {
        let mut names: Vec<&str> = self.coins.iter().map(|coin| coin.name.as_str()).collect();
        names.sort_unstable();

        let mut values: Vec<Decimal> = self.handled_payments.iter().map(|p| p.value).collect();
        values.sort_unstable();

        names
            .into_iter()
            .map(str::to_string)
            .chain(values.into_iter().map(|value| value.normalize().to_string()))
            .collect::<Vec<_>>()
            .join(ID_SEPARATOR)
    }
}

impl PartialEq for Solution {
    fn eq(&self, other: &Self) -> bool {
        self.id() == other.id()
    }
}

impl Eq for Solution {}

impl Hash for Solution {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id().hash(state);
    }
}

impl fmt::Display for Solution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Solution({}) total value: {} total payments: {} leftover: {} score: {} compute time: {:?}",
            self.id(),
            self.total_value(),
            self.total_payment_cost(),
            self.leftover_value(),
            self.score().round_dp(4),
            self.time_elapsed,
        )?;

        let coins: Vec<String> = self
            .coins
            .iter()
            .map(|coin| format!("{} {} A{}", coin.name, coin.value, coin.anonymity_set))
            .collect();
        writeln!(f, "Used coins: {}", coins.join(", "))?;

        let payments: Vec<String> = self
            .handled_payments
            .iter()
            .map(|payment| payment.value.to_string())
            .collect();
        writeln!(f, "Handled payments: {}", payments.join(", "))
    }
}
