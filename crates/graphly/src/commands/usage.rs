//! The `usage` command: per-service storage totals.

use serde::Serialize;
use tabled::Tabled;

use graphly_api::GraphClient;
use graphly_core::aggregate::aggregate;
use graphly_core::collect::{drive_records, mailbox_records, site_records};
use graphly_core::{Service, ServiceTotals, UsageRecord};

use crate::cli::{GlobalOpts, UsageArgs, UsageService};
use crate::commands::util;
use crate::config;
use crate::error::CliError;
use crate::output;

#[derive(Debug, Tabled)]
struct EntityRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Size (GB)")]
    size_gb: String,
}

#[derive(Debug, Serialize, Tabled)]
struct ServiceRow {
    #[tabled(rename = "Service")]
    service: String,
    #[tabled(rename = "Entities")]
    entities: u64,
    #[tabled(rename = "Total (GB)")]
    total_gb: String,
    #[tabled(rename = "Avg (GB)")]
    average_gb: String,
}

impl ServiceRow {
    fn new(service: Service, totals: &ServiceTotals) -> Self {
        Self {
            service: service.to_string(),
            entities: totals.entity_count,
            total_gb: format!("{:.2}", totals.total_gb),
            average_gb: format!("{:.2}", totals.average_gb),
        }
    }
}

pub async fn handle(args: UsageArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let period_days = args
        .period_days
        .unwrap_or_else(|| config::load_config_or_default().defaults.period_days);
    util::validate_period(period_days)?;
    let client = util::connect(global).await?;

    match args.service {
        UsageService::Mailbox => {
            let records = fetch_records(&client, Service::Exchange, period_days).await?;
            render_entities(&records, global);
        }
        UsageService::Onedrive => {
            let records = fetch_records(&client, Service::OneDrive, period_days).await?;
            render_entities(&records, global);
        }
        UsageService::Sharepoint => {
            let records = fetch_records(&client, Service::SharePoint, period_days).await?;
            render_entities(&records, global);
        }
        UsageService::Summary => {
            let mut rows = Vec::with_capacity(3);
            for service in [Service::Exchange, Service::OneDrive, Service::SharePoint] {
                let records = fetch_records(&client, service, period_days).await?;
                rows.push(ServiceRow::new(service, &aggregate(&records)));
            }
            let ids: Vec<String> = rows.iter().map(|row| row.service.clone()).collect();
            let out = output::render_list(&global.output, &rows, &rows, &ids);
            output::print_output(&out, global.quiet);
        }
    }

    Ok(())
}

async fn fetch_records(
    client: &GraphClient,
    service: Service,
    period_days: u32,
) -> Result<Vec<UsageRecord>, CliError> {
    Ok(match service {
        Service::Exchange => {
            let rows = client.get_mailbox_usage_detail(period_days).await?;
            mailbox_records(&rows, None)
        }
        Service::OneDrive => {
            let rows = client.get_drive_usage_detail(period_days).await?;
            drive_records(&rows, None)
        }
        Service::SharePoint => {
            let rows = client.get_site_usage_detail(period_days).await?;
            site_records(&rows)
        }
    })
}

/// Per-entity listing, largest first.
fn render_entities(records: &[UsageRecord], global: &GlobalOpts) {
    let mut sorted: Vec<UsageRecord> = records.to_vec();
    sorted.sort_by(|a, b| b.storage_used_bytes.cmp(&a.storage_used_bytes));

    let rows: Vec<EntityRow> = sorted
        .iter()
        .map(|record| EntityRow {
            name: record.display_name.clone(),
            size_gb: format!("{:.2}", record.size_gb()),
        })
        .collect();
    let ids: Vec<String> = sorted.iter().map(|r| r.entity_id.clone()).collect();

    let out = output::render_list(&global.output, &sorted, &rows, &ids);
    output::print_output(&out, global.quiet);
}
