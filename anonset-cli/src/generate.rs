//! Synthetic coins and payments for demonstration runs.

use anonset_common::config::GeneratorConfig;
use anonset_common::{Coin, Payment};
use rand::Rng;
use rust_decimal::Decimal;

/// Generate between `min_coins` and `max_coins` coins
///
/// Values are drawn from `1..max_value` and anonymity sets from
/// `0..max_anonymity_set`. With a non-empty origin pool every coin is
/// assigned one of `tx-0 .. tx-{pool-1}`.
pub fn coins<R: Rng + ?Sized>(config: &GeneratorConfig, count: Option<usize>, rng: &mut R) -> Vec<Coin> {
    let count = count.unwrap_or_else(|| rng.random_range(config.min_coins..=config.max_coins));

    (0..count)
        .map(|i| {
            let value = Decimal::from(rng.random_range(1..config.max_value));
            let anonymity_set = rng.random_range(0..config.max_anonymity_set);
            let coin = Coin::new(format!("Coin {}", i), value, f64::from(anonymity_set));

            if config.origin_pool > 0 {
                coin.with_origin(format!("tx-{}", rng.random_range(0..config.origin_pool)))
            } else {
                coin
            }
        })
        .collect()
}

/// Generate between `min_payments` and `max_payments` payments
pub fn payments<R: Rng + ?Sized>(
    config: &GeneratorConfig,
    count: Option<usize>,
    rng: &mut R,
) -> Vec<Payment> {
    let count = count.unwrap_or_else(|| rng.random_range(config.min_payments..=config.max_payments));

    (0..count)
        .map(|_| Payment::new(Decimal::from(rng.random_range(1..config.max_value))))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    #[test]
    fn test_coins_respect_bounds() {
        let config = GeneratorConfig {
            min_coins: 5,
            max_coins: 8,
            max_value: 10,
            max_anonymity_set: 3,
            origin_pool: 2,
            ..GeneratorConfig::default()
        };
        let mut rng = StdRng::seed_from_u64(1);

        let coins = coins(&config, None, &mut rng);
        assert!((5..=8).contains(&coins.len()));

        let names: HashSet<&str> = coins.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names.len(), coins.len());

        for coin in &coins {
            assert!(coin.value >= Decimal::ONE && coin.value < Decimal::from(10));
            assert!(coin.anonymity_set >= 0.0 && coin.anonymity_set < 3.0);
            let origin = coin.origin.as_deref().unwrap_or_default();
            assert!(origin == "tx-0" || origin == "tx-1");
        }
    }

    #[test]
    fn test_explicit_counts_override_ranges() {
        let config = GeneratorConfig::default();
        let mut rng = StdRng::seed_from_u64(2);

        assert_eq!(coins(&config, Some(4), &mut rng).len(), 4);
        assert!(coins(&config, Some(4), &mut rng).iter().all(|c| c.origin.is_none()));

        let payments = payments(&config, Some(3), &mut rng);
        assert_eq!(payments.len(), 3);
        assert!(payments.iter().all(|p| p.value > Decimal::ZERO));
    }

    #[test]
    fn test_default_config_generates_no_payments() {
        let mut rng = StdRng::seed_from_u64(3);
        assert!(payments(&GeneratorConfig::default(), None, &mut rng).is_empty());
    }
}
