// ── License SKU catalog and licensing summary types ──

use serde::{Deserialize, Serialize};
use strum::Display;
use uuid::Uuid;

/// Storage entitlement granted to any SKU missing from the catalog.
pub const DEFAULT_SKU_ENTITLEMENT_GB: f64 = 50.0;

/// SKU part numbers excluded from the licensed-user count entirely.
///
/// `FLOW_FREE` is the free Power Automate plan -- consumed units against
/// it say nothing about paid seats.
pub const EXCLUDED_SKUS: &[&str] = &["FLOW_FREE"];

/// Coarse product tier for reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
pub enum SkuTier {
    Enterprise,
    Business,
    Frontline,
    #[strum(serialize = "Exchange Only")]
    ExchangeOnly,
    Unknown,
}

/// One subscribed SKU with its mapped storage entitlement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LicenseSku {
    pub sku_id: Uuid,
    pub sku_part_number: String,
    pub assigned_units: u64,
    pub consumed_units: u64,
    pub storage_limit_gb: f64,
    pub tier: SkuTier,
}

impl LicenseSku {
    /// Whether this SKU counts toward licensed users.
    pub fn is_entitled(&self) -> bool {
        !EXCLUDED_SKUS.contains(&self.sku_part_number.as_str())
    }
}

/// Catalog lookup: SKU part number → (mailbox storage GB, tier).
///
/// Covers the SKUs commonly seen in tenant assessments; anything else
/// falls back to [`DEFAULT_SKU_ENTITLEMENT_GB`] / Unknown.
pub fn sku_entitlement(sku_part_number: &str) -> (f64, SkuTier) {
    match sku_part_number {
        // Microsoft 365 / Office 365 enterprise suites
        "SPE_E3" | "SPE_E5" | "ENTERPRISEPACK" | "ENTERPRISEPREMIUM" | "ENTERPRISEWITHSCAL" => {
            (100.0, SkuTier::Enterprise)
        }
        "STANDARDPACK" | "STANDARDWOFFPACK" => (50.0, SkuTier::Enterprise),
        // Business suites
        "SPB" | "O365_BUSINESS_PREMIUM" | "O365_BUSINESS_ESSENTIALS" | "SMB_BUSINESS" => {
            (50.0, SkuTier::Business)
        }
        // Frontline
        "SPE_F1" | "DESKLESSPACK" | "M365_F1" => (2.0, SkuTier::Frontline),
        // Exchange-only plans
        "EXCHANGESTANDARD" => (50.0, SkuTier::ExchangeOnly),
        "EXCHANGEENTERPRISE" => (100.0, SkuTier::ExchangeOnly),
        _ => (DEFAULT_SKU_ENTITLEMENT_GB, SkuTier::Unknown),
    }
}

/// Entitlement-vs-usage comparison for the tenant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LicensingSummary {
    pub total_licensed_users: u64,
    /// Licensed users × per-user entitlement GB.
    pub entitlement_gb: f64,
    pub current_usage_gb: f64,
    /// Usage beyond entitlement, floored at zero.
    pub excess_gb: f64,
    /// Ceiling of excess over the per-user entitlement.
    pub additional_units_needed: u64,
}

/// Mailbox population breakdown with the shared-mailbox allowance rule.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MailboxMix {
    pub total: u64,
    pub regular: u64,
    pub shared: u64,
    pub resource: u64,
    pub archive_enabled: u64,
    /// Share of mailboxes with an archive, in percent (2 decimals).
    pub archive_percent: f64,
    /// round(licensed users × 0.20).
    pub shared_allowance: u64,
    pub excess_shared: u64,
    /// Ceiling of excess over the flat mailboxes-per-license ratio --
    /// a headcount divisor, deliberately not the GB entitlement.
    pub additional_units_for_shared: u64,
}

/// Archive-threshold evaluation (alternate licensing mode).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ArchiveAssessment {
    /// Mailbox count above which archives require extra licensing.
    pub threshold: f64,
    pub archive_mailboxes: u64,
    pub excess_archive: u64,
    pub additional_units: u64,
}
