//! GrowthProjector: static growth-rate scenarios over the current total.
//!
//! Pure function of (current GB, rate set). No trend fitting -- the
//! scenarios are fixed multipliers.

use indexmap::IndexMap;

use crate::units::round2;

/// Built-in scenario rates, in percent. The operator's custom rate is
/// appended; when it duplicates a built-in the later insert wins and the
/// mapping keeps a single entry.
pub const BUILT_IN_RATES: [i32; 2] = [10, 20];

/// Default custom annual growth rate, in percent.
pub const DEFAULT_CUSTOM_RATE: i32 = 30;

/// Lowest meaningful rate: -100% shrinks the tenant to nothing.
pub const MIN_RATE: i32 = -100;

/// The scenario rate set for a run: built-ins plus the custom rate.
/// Negative custom rates model shrinkage, down to [`MIN_RATE`].
pub fn scenario_rates(custom_rate: i32) -> Vec<i32> {
    let mut rates = BUILT_IN_RATES.to_vec();
    rates.push(custom_rate);
    rates
}

/// Project the current total under each scenario rate.
///
/// `projected = current × (1 + rate/100)`, rounded to 2 decimals and
/// floored at zero. Deterministic and idempotent; insertion order is
/// preserved.
pub fn project(current_gb: f64, rates: &[i32]) -> IndexMap<i32, f64> {
    let mut projections = IndexMap::with_capacity(rates.len());
    for &rate in rates {
        let projected = (current_gb * (1.0 + f64::from(rate) / 100.0)).max(0.0);
        projections.insert(rate, round2(projected));
    }
    projections
}
