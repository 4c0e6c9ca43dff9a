//! CostEstimator: compression/growth/rate constants applied to the
//! collected storage total.
//!
//! Internal math keeps full precision; rounding happens only when a
//! figure is rendered or serialized for display.

use crate::model::CostEstimate;
use crate::units::GB_PER_TB;

/// Fractional reduction applied to raw storage to estimate the
/// backed-up footprint.
pub const COMPRESSION_RATE: f64 = 0.40;

/// Annual growth applied to the compressed footprint.
pub const GROWTH_RATE: f64 = 0.20;

/// Storage cost, per GB per month.
pub const COST_PER_GB_MONTH: f64 = 0.02;

/// Worker-node cost, per (raw) TB per month.
pub const COST_PER_TB_MONTH: f64 = 8.0;

/// Baseline storage assumed per user when nothing was collected.
pub const SYNTHETIC_GB_PER_USER: f64 = 5.0;

/// Produce the cost projection for a tenant.
///
/// A zero collected total substitutes the per-user synthetic baseline
/// and flags the result so reporting can annotate it. The worker-node
/// term uses the pre-compression size (synthetic or not): worker cost
/// scales with raw ingest volume.
pub fn estimate(current_storage_gb: f64, user_count: u64) -> CostEstimate {
    let synthetic_baseline = current_storage_gb <= 0.0;
    let base_gb = if synthetic_baseline {
        user_count as f64 * SYNTHETIC_GB_PER_USER
    } else {
        current_storage_gb
    };

    let compressed_storage_gb = base_gb * (1.0 - COMPRESSION_RATE);
    let projected_storage_gb = compressed_storage_gb * (1.0 + GROWTH_RATE);

    let monthly_storage_cost = projected_storage_gb * COST_PER_GB_MONTH;
    let annual_storage_cost = monthly_storage_cost * 12.0;

    let tenant_size_tb = base_gb / GB_PER_TB;
    let monthly_worker_cost = tenant_size_tb * COST_PER_TB_MONTH;
    let annual_worker_cost = monthly_worker_cost * 12.0;

    let total_monthly = monthly_storage_cost + monthly_worker_cost;
    let total_annual = total_monthly * 12.0;

    // Per-user amortization guards the zero-user tenant: unavailable,
    // never NaN or infinity.
    let (per_user_monthly, per_user_annual) = if user_count == 0 {
        (None, None)
    } else {
        let users = user_count as f64;
        (Some(total_monthly / users), Some(total_annual / users))
    };

    CostEstimate {
        current_storage_gb: base_gb,
        synthetic_baseline,
        user_count,
        compressed_storage_gb,
        projected_storage_gb,
        monthly_storage_cost,
        annual_storage_cost,
        tenant_size_tb,
        monthly_worker_cost,
        annual_worker_cost,
        total_monthly,
        total_annual,
        per_user_monthly,
        per_user_annual,
    }
}
