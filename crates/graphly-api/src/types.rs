// Wire types for the Graph endpoints used by the assessment pipeline.
//
// Shapes follow the v1.0 JSON responses. Usage-report rows come from the
// `$format=application/json` rendition of the report endpoints, one row
// per entity. Fields the pipeline does not read are omitted.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ── OData envelope ───────────────────────────────────────────────────

/// One page of an OData collection response.
#[derive(Debug, Clone, Deserialize)]
pub struct OdataPage<T> {
    pub value: Vec<T>,
    #[serde(rename = "@odata.nextLink", default)]
    pub next_link: Option<String>,
    #[serde(rename = "@odata.count", default)]
    pub count: Option<i64>,
}

/// Error envelope: `{"error": {"code": ..., "message": ...}}`.
#[derive(Debug, Deserialize)]
pub struct OdataError {
    pub error: OdataErrorBody,
}

#[derive(Debug, Deserialize)]
pub struct OdataErrorBody {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

// ── Organization ─────────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Organization {
    pub id: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub verified_domains: Vec<VerifiedDomain>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifiedDomain {
    pub name: String,
    #[serde(default)]
    pub is_default: bool,
}

impl Organization {
    /// The tenant's default domain, if one is flagged.
    pub fn default_domain(&self) -> Option<&str> {
        self.verified_domains
            .iter()
            .find(|d| d.is_default)
            .map(|d| d.name.as_str())
    }
}

// ── Users ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub user_principal_name: Option<String>,
    #[serde(default)]
    pub account_enabled: Option<bool>,
    /// "Member" or "Guest".
    #[serde(default)]
    pub user_type: Option<String>,
}

impl User {
    pub fn is_guest(&self) -> bool {
        self.user_type.as_deref() == Some("Guest")
    }
}

// ── Subscribed SKUs ──────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscribedSku {
    pub sku_id: Uuid,
    pub sku_part_number: String,
    #[serde(default)]
    pub consumed_units: u64,
    #[serde(default)]
    pub prepaid_units: PrepaidUnits,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrepaidUnits {
    #[serde(default)]
    pub enabled: u64,
    #[serde(default)]
    pub suspended: u64,
    #[serde(default)]
    pub warning: u64,
}

// ── Usage-detail report rows ─────────────────────────────────────────

/// One row of `getMailboxUsageDetail`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MailboxUsageRow {
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub user_principal_name: Option<String>,
    #[serde(default)]
    pub storage_used_in_bytes: Option<u64>,
    /// "UserMailbox", "SharedMailbox", "RoomMailbox", "EquipmentMailbox".
    #[serde(default)]
    pub recipient_type: Option<String>,
    #[serde(default)]
    pub has_archive: Option<bool>,
    #[serde(default)]
    pub is_deleted: Option<bool>,
}

/// One row of `getOneDriveUsageAccountDetail`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DriveUsageRow {
    #[serde(default)]
    pub owner_display_name: Option<String>,
    #[serde(default)]
    pub owner_principal_name: Option<String>,
    #[serde(default)]
    pub storage_used_in_bytes: Option<u64>,
    #[serde(default)]
    pub is_deleted: Option<bool>,
}

/// One row of `getSharePointSiteUsageDetail`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteUsageRow {
    #[serde(default)]
    pub site_id: Option<String>,
    #[serde(default)]
    pub site_url: Option<String>,
    #[serde(default)]
    pub owner_display_name: Option<String>,
    #[serde(default)]
    pub storage_used_in_bytes: Option<u64>,
    #[serde(default)]
    pub root_web_template: Option<String>,
    #[serde(default)]
    pub is_deleted: Option<bool>,
}

// ── Groups & Planner ─────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Group {
    pub id: Uuid,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub resource_provisioning_options: Vec<String>,
}

impl Group {
    /// Whether this group is Teams-enabled.
    pub fn is_team(&self) -> bool {
        self.resource_provisioning_options
            .iter()
            .any(|o| o == "Team")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlannerPlan {
    pub id: String,
    #[serde(default)]
    pub title: Option<String>,
}
