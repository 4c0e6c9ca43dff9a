//! Collector: drives the Graph client strictly sequentially and shapes
//! wire rows into domain records.
//!
//! Failure policy (availability over accuracy): a per-service call that
//! fails is logged and its section becomes [`Metric::Unavailable`]; the
//! run continues. Only auth rejection propagates -- partial collection
//! with a dead token would be misleading. No retries.

use chrono::{DateTime, Utc};
use graphly_api::{GraphClient, types};

use crate::error::CoreError;
use crate::model::{
    CollaborationCounts, LicenseSku, MailboxCounts, Metric, OrgProfile, PlannerSample, UsageRecord,
    UserCounts, sku_entitlement,
};
use crate::runlog::RunLog;

/// Options for one collection pass.
#[derive(Debug, Clone)]
pub struct CollectOptions {
    /// Trailing report window in days (valid Graph periods: 7/30/90/180).
    pub period_days: u32,
    /// Scope users and per-user records to members of this group.
    pub group_filter: Option<String>,
    /// Skip the Teams/groups sub-analysis.
    pub skip_teams: bool,
    /// Skip the planner sample.
    pub skip_planner: bool,
    /// How many groups to probe for planner plans.
    pub planner_sample_size: u32,
}

impl Default for CollectOptions {
    fn default() -> Self {
        Self {
            period_days: 180,
            group_filter: None,
            skip_teams: false,
            skip_planner: false,
            planner_sample_size: 5,
        }
    }
}

/// Everything one collection pass produced. Immutable input to the
/// assessment stages.
#[derive(Debug)]
pub struct CollectionSnapshot {
    pub collected_at: DateTime<Utc>,
    pub period_days: u32,

    pub organization: Metric<OrgProfile>,
    pub users: Metric<UserCounts>,
    pub skus: Metric<Vec<LicenseSku>>,

    pub mailboxes: Metric<Vec<UsageRecord>>,
    pub mailbox_counts: Metric<MailboxCounts>,
    pub drives: Metric<Vec<UsageRecord>>,
    pub sites: Metric<Vec<UsageRecord>>,

    /// `None` when skipped by the operator.
    pub collaboration: Option<Metric<CollaborationCounts>>,
    pub planner: Option<Metric<PlannerSample>>,
}

/// Recover a per-service failure into an unavailable section.
///
/// Auth rejection is the one error that escapes: the rest of the run
/// would fail the same way.
fn recover<T>(
    section: &str,
    result: Result<T, graphly_api::Error>,
    log: &mut RunLog,
) -> Result<Metric<T>, CoreError> {
    match result {
        Ok(value) => Ok(Metric::Available(value)),
        Err(e) if e.is_auth_expired() => Err(e.into()),
        Err(e) => {
            log.warn(format!("{section}: {e}; continuing with section unavailable"));
            Ok(Metric::Unavailable)
        }
    }
}

/// Run the full collection pass.
pub async fn collect(
    client: &GraphClient,
    options: &CollectOptions,
    log: &mut RunLog,
) -> Result<CollectionSnapshot, CoreError> {
    log.info(format!(
        "collection started (period D{})",
        options.period_days
    ));

    // Group scope resolves first: a bad scope is operator error, not a
    // degradable section.
    let scope = match &options.group_filter {
        Some(name) => {
            let group =
                client
                    .find_group_by_name(name)
                    .await
                    .map_err(CoreError::from)?
                    .ok_or_else(|| CoreError::GroupNotFound { name: name.clone() })?;
            let members = client
                .list_group_member_users(&group.id)
                .await
                .map_err(CoreError::from)?;
            log.info(format!(
                "scoping to group '{name}' ({} members)",
                members.len()
            ));
            Some(MemberScope::new(&members))
        }
        None => None,
    };

    let organization = recover(
        "organization",
        client.get_organization().await.map(org_profile),
        log,
    )?;

    let users = recover(
        "users",
        client
            .list_users()
            .await
            .map(|users| user_counts(&users, scope.as_ref())),
        log,
    )?;

    let skus = recover(
        "licenses",
        client
            .list_subscribed_skus()
            .await
            .map(|skus| skus.iter().map(sku_from_wire).collect::<Vec<_>>()),
        log,
    )?;

    let mailbox_rows = recover(
        "mailbox usage",
        client.get_mailbox_usage_detail(options.period_days).await,
        log,
    )?;
    let mailboxes = mailbox_rows
        .as_ref()
        .map(|rows| mailbox_records(rows, scope.as_ref()))
        .into();
    let mailbox_counts = mailbox_rows
        .as_ref()
        .map(|rows| mailbox_counts_from_rows(rows, scope.as_ref()))
        .into();

    let drives = recover(
        "onedrive usage",
        client
            .get_drive_usage_detail(options.period_days)
            .await
            .map(|rows| drive_records(&rows, scope.as_ref())),
        log,
    )?;

    // Sites carry no owner UPN we can scope on; the group filter leaves
    // them tenant-wide.
    let sites = recover(
        "sharepoint usage",
        client
            .get_site_usage_detail(options.period_days)
            .await
            .map(|rows| site_records(&rows)),
        log,
    )?;

    let collaboration = if options.skip_teams {
        log.info("teams/groups analysis skipped by operator");
        None
    } else {
        Some(collect_collaboration(client, log).await?)
    };

    let planner = if options.skip_planner {
        log.info("planner sample skipped by operator");
        None
    } else {
        Some(collect_planner(client, options.planner_sample_size, log).await?)
    };

    log.info("collection finished");

    Ok(CollectionSnapshot {
        collected_at: Utc::now(),
        period_days: options.period_days,
        organization,
        users,
        skus,
        mailboxes,
        mailbox_counts,
        drives,
        sites,
        collaboration,
        planner,
    })
}

async fn collect_collaboration(
    client: &GraphClient,
    log: &mut RunLog,
) -> Result<Metric<CollaborationCounts>, CoreError> {
    let teams = recover("teams count", client.count_teams().await, log)?;
    let groups = recover("groups count", client.count_groups().await, log)?;

    Ok(match (teams.as_ref(), groups.as_ref()) {
        (Some(&teams), Some(&groups)) => Metric::Available(CollaborationCounts { teams, groups }),
        _ => Metric::Unavailable,
    })
}

async fn collect_planner(
    client: &GraphClient,
    sample_size: u32,
    log: &mut RunLog,
) -> Result<Metric<PlannerSample>, CoreError> {
    let groups = match recover("planner group sample", client.list_groups(sample_size).await, log)?
    {
        Metric::Available(groups) => groups,
        Metric::Unavailable => return Ok(Metric::Unavailable),
    };

    let mut sample = PlannerSample::default();
    for group in &groups {
        // A group without a provisioned planner answers 403/404; that is
        // expected and only narrows the sample.
        match client.list_planner_plans(&group.id).await {
            Ok(plans) => {
                sample.groups_sampled += 1;
                sample
                    .plan_titles
                    .extend(plans.into_iter().filter_map(|p| p.title));
            }
            Err(e) if e.is_auth_expired() => return Err(e.into()),
            Err(e) => {
                log.warn(format!(
                    "planner plans for group {}: {e}; group skipped",
                    group.id
                ));
            }
        }
    }

    Ok(Metric::Available(sample))
}

// ── Scope filter ─────────────────────────────────────────────────────

/// Lower-cased principal names of the scope group's members.
pub struct MemberScope {
    members: std::collections::HashSet<String>,
}

impl MemberScope {
    pub fn new(users: &[types::User]) -> Self {
        Self {
            members: users
                .iter()
                .filter_map(|u| u.user_principal_name.as_deref())
                .map(str::to_lowercase)
                .collect(),
        }
    }

    fn contains(&self, principal: Option<&str>) -> bool {
        principal.is_some_and(|p| self.members.contains(&p.to_lowercase()))
    }
}

fn in_scope(scope: Option<&MemberScope>, principal: Option<&str>) -> bool {
    scope.is_none_or(|s| s.contains(principal))
}

// ── Wire → domain shaping ────────────────────────────────────────────

pub fn org_profile(org: types::Organization) -> OrgProfile {
    OrgProfile {
        default_domain: org.default_domain().map(str::to_owned),
        tenant_id: org.id,
        display_name: org.display_name.unwrap_or_default(),
    }
}

fn user_counts(users: &[types::User], scope: Option<&MemberScope>) -> UserCounts {
    let mut counts = UserCounts::default();
    for user in users {
        if !in_scope(scope, user.user_principal_name.as_deref()) {
            continue;
        }
        counts.total += 1;
        if user.account_enabled == Some(true) {
            counts.enabled += 1;
        }
        if user.is_guest() {
            counts.guests += 1;
        }
    }
    counts
}

pub fn sku_from_wire(sku: &types::SubscribedSku) -> LicenseSku {
    let (storage_limit_gb, tier) = sku_entitlement(&sku.sku_part_number);
    LicenseSku {
        sku_id: sku.sku_id,
        sku_part_number: sku.sku_part_number.clone(),
        assigned_units: sku.prepaid_units.enabled,
        consumed_units: sku.consumed_units,
        storage_limit_gb,
        tier,
    }
}

pub fn mailbox_records(
    rows: &[types::MailboxUsageRow],
    scope: Option<&MemberScope>,
) -> Vec<UsageRecord> {
    rows.iter()
        .filter(|r| r.is_deleted != Some(true))
        .filter(|r| in_scope(scope, r.user_principal_name.as_deref()))
        .map(|r| {
            let principal = r.user_principal_name.clone().unwrap_or_default();
            UsageRecord {
                display_name: r.display_name.clone().unwrap_or_else(|| principal.clone()),
                entity_id: principal,
                storage_used_bytes: r.storage_used_in_bytes.unwrap_or(0),
            }
        })
        .collect()
}

fn mailbox_counts_from_rows(
    rows: &[types::MailboxUsageRow],
    scope: Option<&MemberScope>,
) -> MailboxCounts {
    let mut counts = MailboxCounts::default();
    for row in rows {
        if row.is_deleted == Some(true)
            || !in_scope(scope, row.user_principal_name.as_deref())
        {
            continue;
        }
        counts.total += 1;
        match row.recipient_type.as_deref() {
            Some("SharedMailbox") => counts.shared += 1,
            Some("RoomMailbox") | Some("EquipmentMailbox") => counts.resource += 1,
            _ => counts.regular += 1,
        }
        if row.has_archive == Some(true) {
            counts.with_archive += 1;
        }
    }
    counts
}

pub fn drive_records(rows: &[types::DriveUsageRow], scope: Option<&MemberScope>) -> Vec<UsageRecord> {
    rows.iter()
        .filter(|r| r.is_deleted != Some(true))
        .filter(|r| in_scope(scope, r.owner_principal_name.as_deref()))
        .map(|r| {
            let principal = r.owner_principal_name.clone().unwrap_or_default();
            UsageRecord {
                display_name: r
                    .owner_display_name
                    .clone()
                    .unwrap_or_else(|| principal.clone()),
                entity_id: principal,
                storage_used_bytes: r.storage_used_in_bytes.unwrap_or(0),
            }
        })
        .collect()
}

pub fn site_records(rows: &[types::SiteUsageRow]) -> Vec<UsageRecord> {
    rows.iter()
        .filter(|r| r.is_deleted != Some(true))
        .map(|r| {
            let url = r.site_url.clone().unwrap_or_default();
            UsageRecord {
                entity_id: r.site_id.clone().unwrap_or_else(|| url.clone()),
                display_name: url,
                storage_used_bytes: r.storage_used_in_bytes.unwrap_or(0),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mailbox_row(
        upn: &str,
        bytes: u64,
        recipient: &str,
        archive: bool,
    ) -> types::MailboxUsageRow {
        types::MailboxUsageRow {
            display_name: Some(upn.split('@').next().unwrap_or(upn).to_owned()),
            user_principal_name: Some(upn.to_owned()),
            storage_used_in_bytes: Some(bytes),
            recipient_type: Some(recipient.to_owned()),
            has_archive: Some(archive),
            is_deleted: Some(false),
        }
    }

    #[test]
    fn deleted_mailboxes_are_dropped() {
        let mut deleted = mailbox_row("gone@contoso.com", 10, "UserMailbox", false);
        deleted.is_deleted = Some(true);
        let rows = vec![mailbox_row("alice@contoso.com", 100, "UserMailbox", true), deleted];

        let records = mailbox_records(&rows, None);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].entity_id, "alice@contoso.com");
    }

    #[test]
    fn mailbox_counts_split_by_recipient_type() {
        let rows = vec![
            mailbox_row("a@contoso.com", 1, "UserMailbox", true),
            mailbox_row("b@contoso.com", 1, "UserMailbox", false),
            mailbox_row("support@contoso.com", 1, "SharedMailbox", false),
            mailbox_row("room1@contoso.com", 1, "RoomMailbox", false),
            mailbox_row("cart@contoso.com", 1, "EquipmentMailbox", false),
        ];

        let counts = mailbox_counts_from_rows(&rows, None);
        assert_eq!(counts.total, 5);
        assert_eq!(counts.regular, 2);
        assert_eq!(counts.shared, 1);
        assert_eq!(counts.resource, 2);
        assert_eq!(counts.with_archive, 1);
    }

    #[test]
    fn missing_bytes_coerce_to_zero_per_row() {
        let mut row = mailbox_row("a@contoso.com", 0, "UserMailbox", false);
        row.storage_used_in_bytes = None;

        let records = mailbox_records(&[row], None);
        assert_eq!(records[0].storage_used_bytes, 0);
    }

    #[test]
    fn scope_filters_by_principal_case_insensitively() {
        let members = vec![types::User {
            id: uuid::Uuid::nil(),
            display_name: Some("Alice".into()),
            user_principal_name: Some("Alice@Contoso.com".into()),
            account_enabled: Some(true),
            user_type: Some("Member".into()),
        }];
        let scope = MemberScope::new(&members);

        let rows = vec![
            mailbox_row("alice@contoso.com", 1, "UserMailbox", false),
            mailbox_row("bob@contoso.com", 1, "UserMailbox", false),
        ];
        let records = mailbox_records(&rows, Some(&scope));
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].entity_id, "alice@contoso.com");
    }
}
