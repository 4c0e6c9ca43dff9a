//! The `licenses` command: subscribed SKUs with entitlement mapping.

use tabled::Tabled;

use graphly_core::collect::sku_from_wire;
use graphly_core::licensing::licensed_users;
use graphly_core::LicenseSku;

use crate::cli::{GlobalOpts, LicensesArgs};
use crate::commands::util;
use crate::error::CliError;
use crate::output;

#[derive(Debug, Tabled)]
struct SkuRow {
    #[tabled(rename = "SKU")]
    sku: String,
    #[tabled(rename = "Tier")]
    tier: String,
    #[tabled(rename = "Assigned")]
    assigned: u64,
    #[tabled(rename = "Consumed")]
    consumed: u64,
    #[tabled(rename = "Storage (GB)")]
    storage_gb: String,
}

pub async fn handle(args: LicensesArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let client = util::connect(global).await?;

    let mut skus: Vec<LicenseSku> = client
        .list_subscribed_skus()
        .await?
        .iter()
        .map(sku_from_wire)
        .collect();

    if !args.all {
        skus.retain(LicenseSku::is_entitled);
    }
    skus.sort_by(|a, b| b.consumed_units.cmp(&a.consumed_units));

    let rows: Vec<SkuRow> = skus
        .iter()
        .map(|sku| SkuRow {
            sku: sku.sku_part_number.clone(),
            tier: sku.tier.to_string(),
            assigned: sku.assigned_units,
            consumed: sku.consumed_units,
            storage_gb: format!("{:.0}", sku.storage_limit_gb),
        })
        .collect();
    let ids: Vec<String> = skus.iter().map(|s| s.sku_part_number.clone()).collect();

    let out = output::render_list(&global.output, &skus, &rows, &ids);
    output::print_output(&out, global.quiet);

    if matches!(global.output, crate::cli::OutputFormat::Table) && !global.quiet {
        println!("Licensed users (entitled SKUs): {}", licensed_users(&skus));
    }

    Ok(())
}
