// ── Cost estimate type ──

use serde::{Deserialize, Serialize};

/// Backup cost projection for the tenant.
///
/// All fields carry full precision; rendering rounds to 2 decimals.
/// Per-user figures are `None` when the user count is zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CostEstimate {
    /// Pre-compression storage the estimate is based on. When the
    /// collected total was zero this is the synthetic baseline.
    pub current_storage_gb: f64,
    /// True when `current_storage_gb` was substituted from the per-user
    /// baseline because no usable data was collected.
    pub synthetic_baseline: bool,
    pub user_count: u64,

    pub compressed_storage_gb: f64,
    pub projected_storage_gb: f64,

    pub monthly_storage_cost: f64,
    pub annual_storage_cost: f64,

    /// Raw (pre-compression) tenant size in TB; worker cost scales with
    /// ingest volume, not the compressed footprint.
    pub tenant_size_tb: f64,
    pub monthly_worker_cost: f64,
    pub annual_worker_cost: f64,

    pub total_monthly: f64,
    pub total_annual: f64,

    pub per_user_monthly: Option<f64>,
    pub per_user_annual: Option<f64>,
}
