//! Tally report runner
//!
//! Loads the configured snapshot and prints, as JSON, every budget of a user
//! with its progress plus the budget-vs-actual report.
//!
//! Usage: `tally-report <user-id> [month|quarter|year]`

use std::sync::Arc;

use anyhow::Context;
use chrono_tz::Tz;
use serde::Serialize;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tally_core::budget::{BudgetService, BudgetVsActualReport, BudgetWithProgress, ReportPeriod};
use tally_core::currency::RateTable;
use tally_shared::types::{Currency, UserId};
use tally_shared::{AppConfig, Clock, SystemClock};
use tally_store::{MemoryStore, Snapshot};

/// Everything the runner prints.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Report {
    base_currency: Currency,
    supported_currencies: Vec<String>,
    budgets: Vec<BudgetWithProgress>,
    budget_vs_actual: BudgetVsActualReport,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Logs go to stderr so stdout stays valid JSON
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tally=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let mut args = std::env::args().skip(1);
    let user_id: UserId = args
        .next()
        .context("usage: tally-report <user-id> [month|quarter|year]")?
        .parse()
        .context("user id must be a UUID")?;
    let selector = ReportPeriod::from_query(args.next().as_deref());

    let config = AppConfig::load().context("failed to load configuration")?;
    let tz = config.app.tz()?;

    let snapshot = Snapshot::load_or_default(&config.storage.snapshot_path).await?;
    info!(
        path = %config.storage.snapshot_path,
        timezone = %tz,
        %user_id,
        period = %selector,
        "building reports"
    );

    let report = run(
        snapshot,
        user_id,
        selector,
        tz,
        config.app.base_currency,
        SystemClock,
    )
    .await?;

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

/// Builds the report for `user_id` from the documents in `snapshot`.
async fn run<C: Clock>(
    snapshot: Snapshot,
    user_id: UserId,
    selector: ReportPeriod,
    tz: Tz,
    base_currency: Currency,
    clock: C,
) -> anyhow::Result<Report> {
    let store = Arc::new(MemoryStore::from_snapshot(snapshot)?);
    let service = BudgetService::new(store, clock, tz);

    Ok(Report {
        base_currency,
        supported_currencies: RateTable::fallback().codes(),
        budgets: service.list_with_progress(user_id).await?,
        budget_vs_actual: service.budget_vs_actual(user_id, selector).await?,
    })
}
