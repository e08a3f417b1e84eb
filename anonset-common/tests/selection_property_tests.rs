//! Property-based tests for the selector
//!
//! These tests use quickcheck to check the guarantees every run gives,
//! whatever the wallet, payments and random draws look like.


use anonset_common::{AnonsetTier, Coin, CoinSelector, Payment, SelectionParams};
use quickcheck::{Arbitrary, Gen, TestResult};
use quickcheck_macros::quickcheck;
use rand::rngs::StdRng;
use rand::SeedableRng;
use rust_decimal::Decimal;
use std::collections::{HashMap, HashSet};

// Helper to generate a wallet of valid, uniquely named coins
#[derive(Clone, Debug)]
struct Wallet(Vec<Coin>);

impl Arbitrary for Wallet {
    fn arbitrary(g: &mut Gen) -> Self {
        let len = usize::arbitrary(g) % 30;
        let coins = (0..len)
            .map(|i| {
                let value = Decimal::from(u32::arbitrary(g) % 1000 + 1);
                let anonymity_set = f64::from(u8::arbitrary(g) % 6);
                let coin = Coin::new(format!("c{}", i), value, anonymity_set);
                if bool::arbitrary(g) {
                    coin.with_origin(format!("tx-{}", u8::arbitrary(g) % 4))
                } else {
                    coin
                }
            })
            .collect();
        Wallet(coins)
    }
}

// Helper to generate strictly positive payments
#[derive(Clone, Debug)]
struct Payments(Vec<Payment>);

impl Arbitrary for Payments {
    fn arbitrary(g: &mut Gen) -> Self {
        let len = usize::arbitrary(g) % 6;
        Payments(
            (0..len)
                .map(|_| Payment::new(Decimal::from(u32::arbitrary(g) % 1500 + 1)))
                .collect(),
        )
    }
}

// Helper to generate payments drawn from a few values, so duplicates are common
#[derive(Clone, Debug)]
struct RepeatedPayments(Vec<Payment>);

impl Arbitrary for RepeatedPayments {
    fn arbitrary(g: &mut Gen) -> Self {
        let len = usize::arbitrary(g) % 10;
        RepeatedPayments(
            (0..len)
                .map(|_| Payment::new(Decimal::from(u8::arbitrary(g) % 4 + 1) * Decimal::from(50)))
                .collect(),
        )
    }
}

fn counts(payments: &[Payment]) -> HashMap<Decimal, usize> {
    let mut counts = HashMap::new();
    for payment in payments {
        *counts.entry(payment.value.normalize()).or_insert(0) += 1;
    }
    counts
}

fn params(target: u8, max_coins: u8, red_cap: Option<u8>) -> SelectionParams {
    let params = SelectionParams::new(u32::from(target % 5) + 1, usize::from(max_coins % 12));
    match red_cap {
        Some(cap) => params.with_tier_cap(AnonsetTier::Red, usize::from(cap % 5)),
        None => params,
    }
}

#[quickcheck]
fn selection_never_exceeds_limits(
    wallet: Wallet,
    payments: Payments,
    target: u8,
    max_coins: u8,
    red_cap: Option<u8>,
    seed: u64,
) -> TestResult {
    test_utils::init_test_environment();
    let params = params(target, max_coins, red_cap);
    let selector = CoinSelector::new(params.clone());
    let mut rng = StdRng::seed_from_u64(seed);

    let solution = match selector.select(&wallet.0, &payments.0, &mut rng) {
        Ok(solution) => solution,
        Err(_) => return TestResult::failed(),
    };

    let within_cap = match params.tier_cap(AnonsetTier::Red) {
        Some(cap) => solution.tier_count(AnonsetTier::Red, params.anonymity_target) <= cap,
        None => true,
    };

    TestResult::from_bool(
        solution.coins.len() <= params.max_coins
            && solution.handled_payments.len() <= payments.0.len()
            && solution.leftover_value() >= Decimal::ZERO
            && within_cap,
    )
}

#[quickcheck]
fn selection_only_uses_wallet_coins(wallet: Wallet, payments: Payments, seed: u64) -> bool {
    test_utils::init_test_environment();
    let selector = CoinSelector::new(SelectionParams::new(2, 8));
    let mut rng = StdRng::seed_from_u64(seed);

    let Ok(solution) = selector.select(&wallet.0, &payments.0, &mut rng) else {
        return false;
    };

    let input: HashSet<&str> = wallet.0.iter().map(|c| c.name.as_str()).collect();
    let picked: HashSet<&str> = solution.coins.iter().map(|c| c.name.as_str()).collect();

    picked.len() == solution.coins.len() && picked.is_subset(&input)
}

#[quickcheck]
fn identity_ignores_selection_order(wallet: Wallet, payments: Payments, seed: u64) -> TestResult {
    let selector = CoinSelector::new(SelectionParams::new(2, 8));
    let mut rng = StdRng::seed_from_u64(seed);

    let Ok(solution) = selector.select(&wallet.0, &payments.0, &mut rng) else {
        return TestResult::failed();
    };
    if solution.coins.len() < 2 {
        return TestResult::discard();
    }

    let mut reversed = solution.clone();
    reversed.coins.reverse();
    reversed.handled_payments.reverse();

    TestResult::from_bool(reversed == solution && reversed.id() == solution.id())
}

#[quickcheck]
fn handled_payments_come_from_the_input(
    wallet: Wallet,
    payments: RepeatedPayments,
    max_coins: u8,
    seed: u64,
) -> TestResult {
    test_utils::init_test_environment();
    let selector = CoinSelector::new(SelectionParams::new(2, usize::from(max_coins % 12)));
    let mut rng = StdRng::seed_from_u64(seed);

    let Ok(solution) = selector.select(&wallet.0, &payments.0, &mut rng) else {
        return TestResult::failed();
    };

    let available = counts(&payments.0);
    let handled = counts(&solution.handled_payments);
    let within_input = handled
        .iter()
        .all(|(value, count)| available.get(value).is_some_and(|available| count <= available));

    TestResult::from_bool(within_input && solution.total_payment_cost() <= solution.total_value())
}
