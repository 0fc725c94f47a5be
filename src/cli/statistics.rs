use super::ui;
use crate::core::currency::CurrencyTable;
use crate::core::dashboard::{
    CompanyStatisticsQuery, DashboardApi, MoneyFlowQuery, PriceChangesQuery, TrendsQuery,
};
use crate::core::format::{format_date, format_market_cap, format_price};
use crate::core::models::{
    CompanyStatisticsResponse, DateRange, IndustryMoneyFlowResponse, MoneyFlowResponse,
    PriceChangesResponse, SectorCompaniesResponse, SectorTrendResponse, TrendsResponse,
};
use anyhow::Result;
use comfy_table::{Cell, Table};

fn range_caption(range: &DateRange) -> String {
    format!("{} ~ {}", format_date(&range.start), format_date(&range.end))
}

pub async fn run_sector_trend(api: &dyn DashboardApi, industry: Option<&str>) -> Result<()> {
    let trend = api.sector_trend(industry).await?;
    ui::print_heading("Sector Trend", Some(&range_caption(&trend.date_range)));
    println!("{}", build_sector_trend_table(&trend));
    Ok(())
}

pub(crate) fn build_sector_trend_table(trend: &SectorTrendResponse) -> Table {
    let mut periods: Vec<u32> = trend
        .sectors
        .iter()
        .flat_map(|s| s.periods.iter().map(|p| p.period))
        .collect();
    periods.sort_unstable();
    periods.dedup();

    let mut table = ui::new_styled_table();
    let mut header = vec![ui::header_cell("Sector")];
    header.extend(periods.iter().map(|p| ui::header_cell(&format!("{p}D"))));
    table.set_header(header);

    for sector in &trend.sectors {
        let mut row = vec![Cell::new(&sector.name)];
        for period in &periods {
            let flow = sector
                .periods
                .iter()
                .find(|p| p.period == *period)
                .map(|p| p.flow_percent);
            row.push(ui::change_cell(flow));
        }
        table.add_row(row);
    }
    table
}

pub async fn run_price_changes(api: &dyn DashboardApi, query: &PriceChangesQuery) -> Result<()> {
    let changes = api.price_changes(query).await?;
    ui::print_heading(
        "Price Changes",
        Some(&format!(
            "{} / {} companies",
            range_caption(&changes.date_range),
            changes.total
        )),
    );
    println!("{}", build_price_changes_table(&changes));
    Ok(())
}

/// Market caps here are served in USD.
fn build_price_changes_table(changes: &PriceChangesResponse) -> Table {
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Ticker"),
        ui::header_cell("Company"),
        ui::header_cell("First"),
        ui::header_cell("Latest"),
        ui::header_cell("Change"),
        ui::header_cell("Market Cap (USD)"),
    ]);
    for item in &changes.companies {
        table.add_row(vec![
            Cell::new(&item.ticker),
            Cell::new(item.name_ko.as_deref().unwrap_or(&item.name)),
            ui::value_cell(format_price(item.first_price)),
            ui::value_cell(format_price(item.latest_price)),
            ui::change_cell(item.percent_change),
            ui::value_cell(format_market_cap(item.market_cap)),
        ]);
    }
    table
}

pub async fn run_money_flow(api: &dyn DashboardApi, query: &MoneyFlowQuery) -> Result<()> {
    let flow = api.money_flow(query).await?;
    ui::print_heading(
        &format!("Money Flow ({} days)", flow.period),
        Some(&range_caption(&flow.date_range)),
    );
    println!("{}", build_money_flow_table(&flow));
    print_flow_totals(flow.total_inflow, flow.total_outflow, flow.net_flow);
    Ok(())
}

pub(crate) fn build_money_flow_table(flow: &MoneyFlowResponse) -> Table {
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Sector"),
        ui::header_cell("Direction"),
        ui::header_cell("Flow"),
        ui::header_cell("Flow %"),
        ui::header_cell("MFI"),
        ui::header_cell("Companies"),
    ]);
    for sector in &flow.flows {
        table.add_row(vec![
            Cell::new(&sector.name),
            ui::flow_cell(sector.flow_direction),
            ui::value_cell(format_market_cap(Some(sector.flow_amount.abs()))),
            ui::change_cell(Some(sector.flow_percent)),
            sector
                .mfi
                .map_or(ui::na_cell(), |m| ui::value_cell(format!("{m:.1}"))),
            Cell::new(sector.company_count),
        ]);
    }
    table
}

fn print_flow_totals(inflow: f64, outflow: f64, net: f64) {
    println!(
        "{} {}  {} {}  {} {}",
        ui::style_text("Inflow", ui::StyleType::TotalLabel),
        format_market_cap(Some(inflow)),
        ui::style_text("Outflow", ui::StyleType::TotalLabel),
        format_market_cap(Some(outflow.abs())),
        ui::style_text("Net", ui::StyleType::TotalLabel),
        ui::style_text(&signed_market_cap(net), ui::StyleType::TotalValue),
    );
}

fn signed_market_cap(value: f64) -> String {
    let sign = if value < 0.0 { "-" } else { "+" };
    format!("{sign}{}", format_market_cap(Some(value.abs())))
}

pub async fn run_industry_flow(api: &dyn DashboardApi, period: u32) -> Result<()> {
    let flow = api.industry_money_flow(period).await?;
    ui::print_heading(
        &format!("Industry Money Flow ({} days)", flow.period),
        Some(&range_caption(&flow.date_range)),
    );
    println!("{}", build_industry_flow_table(&flow));
    Ok(())
}

fn build_industry_flow_table(flow: &IndustryMoneyFlowResponse) -> Table {
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Industry"),
        ui::header_cell("Direction"),
        ui::header_cell("Inflow"),
        ui::header_cell("Outflow"),
        ui::header_cell("Net"),
        ui::header_cell("Net %"),
    ]);
    for industry in &flow.industries {
        let name = match industry.industry_icon.as_deref() {
            Some(icon) => format!("{icon} {}", industry.industry_name),
            None => industry.industry_name.clone(),
        };
        table.add_row(vec![
            Cell::new(name),
            ui::flow_cell(industry.flow_direction),
            ui::value_cell(format_market_cap(Some(industry.total_inflow))),
            ui::value_cell(format_market_cap(Some(industry.total_outflow.abs()))),
            ui::value_cell(signed_market_cap(industry.net_flow)),
            ui::change_cell(Some(industry.net_flow_percent)),
        ]);
    }
    table
}

pub async fn run_sector_companies(
    api: &dyn DashboardApi,
    sector_id: &str,
    period: u32,
) -> Result<()> {
    let companies = api.sector_companies(sector_id, period).await?;
    ui::print_heading(
        &format!("{} ({} days)", companies.sector_name, companies.period),
        Some(&range_caption(&companies.date_range)),
    );
    println!("{}", build_sector_companies_table(&companies));
    Ok(())
}

fn build_sector_companies_table(companies: &SectorCompaniesResponse) -> Table {
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Rank"),
        ui::header_cell("Company"),
        ui::header_cell("Start"),
        ui::header_cell("End"),
        ui::header_cell("Change"),
        ui::header_cell("Market Cap (USD)"),
    ]);
    let mut rows: Vec<_> = companies.companies.iter().collect();
    rows.sort_by_key(|c| c.rank);
    for company in rows {
        table.add_row(vec![
            Cell::new(company.rank),
            Cell::new(company.name_ko.as_deref().unwrap_or(&company.name)),
            ui::value_cell(format_price(company.start_price)),
            ui::value_cell(format_price(company.end_price)),
            ui::change_cell(company.price_change_percent),
            ui::value_cell(format_market_cap(company.market_cap)),
        ]);
    }
    table
}

pub async fn run_company_statistics(
    api: &dyn DashboardApi,
    currency: &CurrencyTable,
    query: &CompanyStatisticsQuery,
) -> Result<()> {
    let stats = api.company_statistics(query).await?;
    ui::print_heading(
        "Companies by Sector Presence",
        Some(&format!(
            "page {}/{} of {} companies",
            stats.page, stats.total_pages, stats.total
        )),
    );
    println!("{}", build_company_statistics_table(&stats, currency));
    Ok(())
}

fn build_company_statistics_table(
    stats: &CompanyStatisticsResponse,
    currency: &CurrencyTable,
) -> Table {
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Ticker"),
        ui::header_cell("Company"),
        ui::header_cell("Sectors"),
        ui::header_cell("Top Ranks"),
        ui::header_cell("Market Cap (USD)"),
        ui::header_cell("Change"),
    ]);
    for item in &stats.companies {
        let ranks: Vec<String> = item
            .sectors
            .iter()
            .map(|s| format!("{} #{}", s.name, s.rank))
            .collect();
        let snapshot = item.latest_snapshot.as_ref();
        table.add_row(vec![
            Cell::new(&item.ticker),
            Cell::new(item.name_ko.as_deref().unwrap_or(&item.name)),
            Cell::new(item.count),
            Cell::new(ranks.join(", ")),
            ui::value_cell(format_market_cap(
                snapshot
                    .and_then(|s| s.market_cap)
                    .map(|v| currency.to_usd(v, &item.ticker)),
            )),
            ui::change_cell(snapshot.and_then(|s| s.price_change)),
        ]);
    }
    table
}

pub async fn run_trends(api: &dyn DashboardApi, query: &TrendsQuery) -> Result<()> {
    let trends = api.trends(query).await?;
    ui::print_heading(
        &format!("Market Cap Trends ({})", query.trend_type),
        Some(&range_caption(&trends.date_range)),
    );
    println!("{}", build_trends_table(&trends));

    if let Some(growth) = &trends.sector_growth {
        ui::print_heading("Sector Growth", None);
        let mut table = ui::new_styled_table();
        table.set_header(vec![
            ui::header_cell("Sector"),
            ui::header_cell("Start"),
            ui::header_cell("End"),
            ui::header_cell("Growth"),
        ]);
        for sector in growth {
            table.add_row(vec![
                Cell::new(&sector.name),
                ui::value_cell(format_market_cap(Some(sector.start_market_cap))),
                ui::value_cell(format_market_cap(Some(sector.end_market_cap))),
                ui::change_cell(Some(sector.growth_rate)),
            ]);
        }
        println!("{table}");
    }
    Ok(())
}

/// First and last market cap of every series and the change between them.
fn build_trends_table(trends: &TrendsResponse) -> Table {
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Name"),
        ui::header_cell("Start"),
        ui::header_cell("End"),
        ui::header_cell("Change"),
        ui::header_cell("Points"),
    ]);
    for item in &trends.items {
        let first = item.data.first().map(|p| p.market_cap);
        let last = item.data.last().map(|p| p.market_cap);
        let change = match (first, last) {
            (Some(first), Some(last)) if first > 0.0 => Some((last - first) / first * 100.0),
            _ => None,
        };
        table.add_row(vec![
            Cell::new(item.name_ko.as_deref().unwrap_or(&item.name)),
            ui::value_cell(format_market_cap(first)),
            ui::value_cell(format_market_cap(last)),
            ui::change_cell(change),
            Cell::new(item.data.len()),
        ]);
    }
    table
}
