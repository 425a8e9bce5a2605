//! Cost and production scaling formulas: pure functions over scalar
//! parameters, fully testable.
//!
//! Unit prices blend two terms: an exponential in the purchase count and a
//! logarithmic term keyed to the player's current throughput. The log term
//! keeps pricing responsive to actual earning power instead of purchase
//! count alone; tier coefficients make rarer units react more strongly.

use crate::catalog::MAX_LEVEL;

/// Per-purchase exponential growth rate.
pub const GROWTH_RATE: f64 = 1.18;

/// Throughput (energy/sec) at which the logarithmic price term starts to
/// bite. Divisor of the log ratio; guarded against zero below.
pub const REFERENCE_THROUGHPUT: f64 = 25.0;

/// Exponent exposure used for the one-time shiny toll. Count-independent.
pub const SHINY_COST_EXPONENT: i32 = 45;

/// `GROWTH_RATE^count`, the exponential price growth per copy already owned.
pub fn growth_factor(count: u32) -> f64 {
    GROWTH_RATE.powi(count as i32)
}

/// Throughput-keyed multiplier: `1 + ln(1 + throughput/reference) × coefficient`.
/// A zero reference or non-finite/negative throughput contributes a zero
/// ratio rather than Inf/NaN.
pub fn production_scaling(throughput: f64, tier_coefficient: f64) -> f64 {
    let ratio = if REFERENCE_THROUGHPUT > 0.0 && throughput.is_finite() && throughput > 0.0 {
        throughput / REFERENCE_THROUGHPUT
    } else {
        0.0
    };
    1.0 + (1.0 + ratio).ln() * tier_coefficient
}

/// Price of the next copy of a unit. Floored, and never below `base_cost`.
pub fn unit_cost(base_cost: f64, tier_coefficient: f64, count: u32, throughput: f64) -> f64 {
    let cost = (base_cost * growth_factor(count) * production_scaling(throughput, tier_coefficient)).floor();
    cost.max(base_cost)
}

/// Total price of buying `quantity` copies in one action: the sum of
/// `unit_cost` at each successive virtual count. Throughput is sampled once,
/// at purchase time.
pub fn bulk_unit_cost(
    base_cost: f64,
    tier_coefficient: f64,
    count: u32,
    throughput: f64,
    quantity: u32,
) -> f64 {
    (0..quantity)
        .map(|i| unit_cost(base_cost, tier_coefficient, count + i, throughput))
        .sum()
}

/// Largest quantity purchasable without exceeding `available_energy`,
/// additionally bounded by the unit's level ceiling.
pub fn max_affordable(
    base_cost: f64,
    tier_coefficient: f64,
    count: u32,
    throughput: f64,
    available_energy: f64,
) -> u32 {
    let headroom = MAX_LEVEL.saturating_sub(count);
    let mut spent = 0.0;
    let mut quantity = 0;
    while quantity < headroom {
        let next = unit_cost(base_cost, tier_coefficient, count + quantity, throughput);
        if spent + next > available_energy {
            break;
        }
        spent += next;
        quantity += 1;
    }
    quantity
}

/// Price of a boost activation: the same logarithmic shape as unit cost but
/// without the per-purchase exponential (boosts do not stack, so no
/// purchase-count growth applies). Floored at `base_cost`.
pub fn boost_cost(base_cost: f64, cost_scale_factor: f64, throughput: f64) -> f64 {
    let cost = (base_cost * production_scaling(throughput, cost_scale_factor)).floor();
    cost.max(base_cost)
}

/// One-time toll for the shiny flag: a flat, large multiple of `base_cost`,
/// independent of current count and throughput.
pub fn shiny_cost(base_cost: f64) -> f64 {
    (base_cost * GROWTH_RATE.powi(SHINY_COST_EXPONENT)).floor()
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn prop_cost_never_below_base(
            base in 1.0f64..1e9,
            coef in 0.0f64..0.2,
            count in 0u32..MAX_LEVEL,
            throughput in 0.0f64..1e12,
        ) {
            prop_assert!(unit_cost(base, coef, count, throughput) >= base);
        }

        #[test]
        fn prop_cost_strictly_increases_with_count(
            base in 1.0f64..1e6,
            coef in 0.0f64..0.2,
            count in 0u32..200,
            throughput in 0.0f64..1e9,
        ) {
            let a = unit_cost(base, coef, count, throughput);
            let b = unit_cost(base, coef, count + 1, throughput);
            prop_assert!(b > a, "cost did not increase: {} -> {}", a, b);
        }

        #[test]
        fn prop_cost_monotone_in_throughput(
            base in 1.0f64..1e6,
            coef in 0.001f64..0.2,
            count in 0u32..100,
            low in 0.0f64..1e6,
            extra in 0.0f64..1e6,
        ) {
            let a = unit_cost(base, coef, count, low);
            let b = unit_cost(base, coef, count, low + extra);
            prop_assert!(b >= a);
        }

        #[test]
        fn prop_boost_cost_floor(
            base in 1.0f64..1e9,
            scale in 0.0f64..2.0,
            throughput in 0.0f64..1e12,
        ) {
            prop_assert!(boost_cost(base, scale, throughput) >= base);
        }

        #[test]
        fn prop_scaling_always_finite(
            throughput in proptest::num::f64::ANY,
            coef in 0.0f64..1.0,
        ) {
            prop_assert!(production_scaling(throughput, coef).is_finite());
        }

        #[test]
        fn prop_max_affordable_never_overdraws(
            base in 1.0f64..1e4,
            coef in 0.0f64..0.2,
            count in 0u32..MAX_LEVEL,
            throughput in 0.0f64..1e6,
            energy in 0.0f64..1e8,
        ) {
            let n = max_affordable(base, coef, count, throughput, energy);
            let cost = bulk_unit_cost(base, coef, count, throughput, n);
            prop_assert!(cost <= energy || n == 0);
            prop_assert!(count + n <= MAX_LEVEL);
        }
    }
}
