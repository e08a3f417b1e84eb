//! Random decisions shared by the orderer and the selection engine
//!
//! Every draw goes through the injected generator, so a seeded generator
//! replays a run exactly.

use rand::Rng;

use crate::coin_selection::types::ProbabilityScaling;

/// Chance that a green coin is dropped from the remaining queue once all
/// payments are handled
const GREEN_PRUNE_CHANCE: f64 = 0.8;

/// Chance that a coin sharing its predecessor's origin is placed anyway
const DECLUSTER_PLACE_CHANCE: f64 = 0.5;

impl ProbabilityScaling {
    /// Whether a coin that shares its predecessor's origin is placed without delay
    pub(crate) fn place_despite_origin<R: Rng + ?Sized>(&self, rng: &mut R) -> bool {
        match self {
            ProbabilityScaling::Fractional => rng.random_bool(DECLUSTER_PLACE_CHANCE),
            ProbabilityScaling::Literal => rng.random_range(1..10) < 5,
        }
    }

    /// Whether two adjacent candidates trade places
    ///
    /// # Arguments
    /// * `rng` - Random source
    /// * `chance_percent` - Configured swap chance in percent
    pub(crate) fn swap_neighbours<R: Rng + ?Sized>(&self, rng: &mut R, chance_percent: u32) -> bool {
        match self {
            ProbabilityScaling::Fractional => {
                let chance = f64::from(chance_percent.min(100)) / 100.0;
                rng.random_bool(chance)
            }
            ProbabilityScaling::Literal => {
                // Truncates to 0 below 100 percent
                let chance = chance_percent / 100;
                rng.random::<f64>() <= f64::from(chance)
            }
        }
    }

    /// Whether a red or orange coin leaves the remaining queue after every
    /// payment is handled
    ///
    /// The further the selection is from its coin limit, the more likely the
    /// coin is dropped.
    pub(crate) fn prune_mixable<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        selected: usize,
        max_coins: usize,
    ) -> bool {
        if max_coins == 0 {
            return false;
        }

        match self {
            ProbabilityScaling::Fractional => {
                let capacity = selected as f64 / max_coins as f64;
                rng.random::<f64>() > capacity
            }
            ProbabilityScaling::Literal => {
                // Integer division: zero until the selection is full
                let capacity = (selected / max_coins) * 100 * 100;
                rng.random_range(1..100) > capacity
            }
        }
    }

    /// Whether a green coin leaves the remaining queue after every payment is handled
    pub(crate) fn prune_private<R: Rng + ?Sized>(&self, rng: &mut R) -> bool {
        match self {
            ProbabilityScaling::Fractional => rng.random_bool(GREEN_PRUNE_CHANCE),
            ProbabilityScaling::Literal => rng.random_range(1..10) < 8,
        }
    }
}
