use super::{industries, statistics, ui};
use crate::core::dashboard::{DashboardApi, MoneyFlowQuery, check_industry};
use crate::core::envelope::ApiError;
use anyhow::Result;
use comfy_table::Table;
use futures::future::{BoxFuture, FutureExt, join_all};
use indicatif::ProgressBar;
use tracing::warn;

type Panel<'a> = BoxFuture<'a, (&'static str, Result<Table, ApiError>)>;

/// Loads the landing panels concurrently. A failing panel is reported in
/// place and does not hide the others.
pub async fn run(api: &dyn DashboardApi, industry: Option<&str>) -> Result<()> {
    check_industry(industry)?;

    let flow_query = MoneyFlowQuery {
        industry: industry.map(str::to_string),
        ..MoneyFlowQuery::default()
    };

    let panels: Vec<Panel<'_>> = vec![
        async { ("Industries", api.industries().await.map(|r| industries::build_table(&r))) }
            .boxed(),
        async {
            (
                "Money Flow",
                api.money_flow(&flow_query)
                    .await
                    .map(|r| statistics::build_money_flow_table(&r)),
            )
        }
        .boxed(),
        async {
            (
                "Sector Trend",
                api.sector_trend(industry)
                    .await
                    .map(|r| statistics::build_sector_trend_table(&r)),
            )
        }
        .boxed(),
    ];

    let pb = ui::new_progress_bar(panels.len() as u64, true);
    pb.set_message("Loading dashboard");
    let results = join_all(panels.into_iter().map(|panel| track(panel, pb.clone()))).await;
    pb.finish_and_clear();

    for (i, (title, result)) in results.iter().enumerate() {
        ui::print_heading(title, None);
        match result {
            Ok(table) => println!("{table}"),
            Err(e) => {
                warn!(panel = title, error = %e, "Overview panel failed");
                println!("{}", ui::style_text(&e.user_message(), ui::StyleType::Error));
            }
        }
        if i + 1 < results.len() {
            ui::print_separator();
        }
    }
    Ok(())
}

async fn track<T>(panel: BoxFuture<'_, T>, pb: ProgressBar) -> T {
    let result = panel.await;
    pb.inc(1);
    result
}
