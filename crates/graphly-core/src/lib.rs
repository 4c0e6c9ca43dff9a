//! Business logic and domain model for the tenant assessment workspace.
//!
//! This crate owns the assessment pipeline between `graphly-api` and the
//! CLI:
//!
//! - **[`collect`]** — Collector: drives the Graph client strictly
//!   sequentially, shapes wire rows into [`model`] records, and degrades
//!   failed sections to [`Metric::Unavailable`] instead of aborting.
//!
//! - **[`aggregate`]** — Aggregator: per-entity usage records reduced to
//!   per-service totals with a top-5 consumer ranking.
//!
//! - **[`growth`]** / **[`licensing`]** / **[`cost`]** — The pure
//!   assessment stages: scenario projections, entitlement-vs-usage
//!   comparison (plus the shared-mailbox and archive rules), and the
//!   backup cost model.
//!
//! - **[`pipeline`]** — [`assess()`](pipeline::assess) wires one
//!   immutable [`CollectionSnapshot`](collect::CollectionSnapshot)
//!   through the stages into one [`TenantReport`].
//!
//! - **Domain model** ([`model`]) — Explicitly typed records; absent
//!   data is an explicit [`Metric::Unavailable`], never a silent zero.

pub mod aggregate;
pub mod collect;
pub mod cost;
pub mod error;
pub mod growth;
pub mod licensing;
pub mod model;
pub mod pipeline;
pub mod runlog;
pub mod units;

// ── Primary re-exports ──────────────────────────────────────────────
pub use collect::{CollectOptions, CollectionSnapshot, collect};
pub use error::CoreError;
pub use licensing::LicensingConfig;
pub use pipeline::{AssessOptions, assess};
pub use runlog::RunLog;

// Re-export model types at the crate root for ergonomics.
pub use model::{
    ArchiveAssessment,
    CollaborationCounts,
    CostEstimate,
    GrowthProjection,
    LicenseSku,
    LicensingSummary,
    MailboxCounts,
    MailboxMix,
    Metric,
    OrgProfile,
    PlannerSample,
    Service,
    ServiceReport,
    ServiceTotals,
    SkuTier,
    TenantReport,
    TopEntry,
    UsageRecord,
    UserCounts,
};
