//! Domain model for the assessment pipeline.
//!
//! Explicitly typed records with defined defaults; absent data is an
//! explicit [`Metric::Unavailable`] marker, never a silently coerced
//! zero.

pub mod cost;
pub mod license;
pub mod metric;
pub mod report;
pub mod tenant;
pub mod usage;

pub use cost::CostEstimate;
pub use license::{
    ArchiveAssessment, DEFAULT_SKU_ENTITLEMENT_GB, EXCLUDED_SKUS, LicenseSku, LicensingSummary,
    MailboxMix, SkuTier, sku_entitlement,
};
pub use metric::Metric;
pub use report::{GrowthProjection, TenantReport};
pub use tenant::{CollaborationCounts, MailboxCounts, OrgProfile, PlannerSample, UserCounts};
pub use usage::{Service, ServiceReport, ServiceTotals, TopEntry, UsageRecord};
