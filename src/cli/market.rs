use super::ui;
use crate::core::currency::CurrencyTable;
use crate::core::dashboard::{DashboardApi, MapQuery};
use crate::core::format::{
    format_date, format_market_cap, format_number, format_percent, format_price,
    format_recommendation, format_score, format_volume,
};
use crate::core::models::{
    CompanyDetailResponse, MapResponse, SearchResponse, Sector, SectorCompany,
    SectorDetailResponse,
};
use crate::core::seo::industry_title;
use anyhow::Result;
use comfy_table::{Cell, Table};
use tracing::debug;

const HISTORY_ROWS: usize = 10;
const UNCATEGORIZED: &str = "Uncategorized";

/// Converts a company's market cap to USD using its listing suffix.
fn usd_market_cap(currency: &CurrencyTable, ticker: &str, value: Option<f64>) -> Option<f64> {
    value.map(|v| currency.to_usd(v, ticker))
}

pub async fn run_map(
    api: &dyn DashboardApi,
    currency: &CurrencyTable,
    query: &MapQuery,
    sector: Option<&str>,
    top: usize,
) -> Result<()> {
    let (map, industries) = futures::join!(api.map(query), async {
        match query.industry.as_deref() {
            Some(_) => api.industries().await.ok(),
            None => None,
        }
    });
    let map = map?;
    debug!(
        sectors = map.sectors.len(),
        companies = map.sector_companies.len(),
        "Loaded map"
    );

    let caption = match (&map.selected_date, map.is_historical) {
        (Some(date), true) => format!("Snapshot of {} (historical)", format_date(date)),
        _ => format!(
            "Last updated {}",
            map.last_updated.as_deref().map_or("-".to_string(), format_date)
        ),
    };
    let title = industries
        .zip(query.industry.as_deref())
        .and_then(|(response, id)| industry_title(&response.industries, id));
    if let Some(title) = title {
        println!("{}", ui::style_text(&title, ui::StyleType::TotalLabel));
    }
    ui::print_heading("Market Dominance Map", Some(&caption));
    println!("{}", build_map_table(&map, currency, sector, top));
    Ok(())
}

fn build_map_table(
    map: &MapResponse,
    currency: &CurrencyTable,
    sector_filter: Option<&str>,
    top: usize,
) -> Table {
    let mut table = ui::new_styled_table();
    let mut header = vec![
        ui::header_cell("Category"),
        ui::header_cell("Sector"),
        ui::header_cell("Rank"),
        ui::header_cell("Company"),
        ui::header_cell("Market Cap (USD)"),
        ui::header_cell("Change"),
    ];
    if map.is_historical {
        header.push(ui::header_cell("Since Snapshot"));
    }
    table.set_header(header);

    let mut categories = map.categories.clone();
    categories.sort_by_key(|c| c.order);
    let mut sectors = map.sectors.clone();
    sectors.sort_by_key(|s| s.order);

    // Sectors without a known category are listed after every ordered category.
    let mut groups: Vec<(&str, Vec<&Sector>)> = categories
        .iter()
        .map(|category| {
            let members = sectors
                .iter()
                .filter(|s| s.category_id.as_deref() == Some(category.id.as_str()))
                .collect();
            (category.name.as_str(), members)
        })
        .collect();
    let uncategorized = sectors
        .iter()
        .filter(|s| {
            !s.category_id
                .as_deref()
                .is_some_and(|id| categories.iter().any(|c| c.id == id))
        })
        .collect();
    groups.push((UNCATEGORIZED, uncategorized));

    for (category, members) in groups {
        for sector in members
            .into_iter()
            .filter(|s| sector_filter.is_none_or(|id| s.id == id))
        {
            for entry in map.companies_in(&sector.id).into_iter().take(top) {
                table.add_row(map_row(
                    category,
                    &sector.name,
                    entry,
                    currency,
                    map.is_historical,
                ));
            }
        }
    }
    table
}

fn map_row(
    category: &str,
    sector: &str,
    entry: &SectorCompany,
    currency: &CurrencyTable,
    historical: bool,
) -> Vec<Cell> {
    let snapshot = entry.snapshot.as_ref();
    let market_cap = usd_market_cap(currency, &entry.ticker, snapshot.and_then(|s| s.market_cap));
    let mut row = vec![
        Cell::new(category),
        Cell::new(sector),
        Cell::new(entry.rank),
        Cell::new(entry.company.display_name()),
        ui::value_cell(format_market_cap(market_cap)),
        ui::change_cell(snapshot.and_then(|s| s.price_change)),
    ];
    if historical {
        row.push(ui::change_cell(entry.price_change_from_snapshot));
    }
    row
}

pub async fn run_company(
    api: &dyn DashboardApi,
    currency: &CurrencyTable,
    ticker: &str,
) -> Result<()> {
    let detail = api.company(ticker).await?;
    let title = format!("{} ({})", detail.company.display_name(), detail.company.ticker);
    let caption = detail
        .profile
        .as_ref()
        .and_then(|p| p.description.as_deref());
    ui::print_heading(&title, caption);
    println!("{}", build_company_table(&detail, currency));

    if !detail.sectors.is_empty() {
        let ranks: Vec<String> = detail
            .sectors
            .iter()
            .map(|s| format!("{} #{}", s.sector.name, s.rank))
            .collect();
        println!("Sectors: {}", ranks.join(", "));
    }

    if !detail.history.is_empty() {
        ui::print_heading("Recent Prices", None);
        let mut history = ui::new_styled_table();
        history.set_header(vec![
            ui::header_cell("Date"),
            ui::header_cell("Price"),
            ui::header_cell("Volume"),
        ]);
        for point in detail.history.iter().rev().take(HISTORY_ROWS) {
            history.add_row(vec![
                Cell::new(format_date(&point.date)),
                ui::value_cell(format_price(Some(point.price))),
                ui::value_cell(format_volume(Some(point.volume))),
            ]);
        }
        println!("{history}");
    }
    Ok(())
}

fn build_company_table(detail: &CompanyDetailResponse, currency: &CurrencyTable) -> Table {
    let mut table = ui::new_styled_table();
    table.set_header(vec![ui::header_cell("Metric"), ui::header_cell("Value")]);

    let ticker = detail.company.ticker.as_str();
    let mut rows: Vec<(&str, Cell)> = Vec::new();
    if let Some(snapshot) = &detail.snapshot {
        rows.push((
            "Market Cap (USD)",
            ui::value_cell(format_market_cap(usd_market_cap(
                currency,
                ticker,
                snapshot.market_cap,
            ))),
        ));
        rows.push(("Price", ui::value_cell(format_price(snapshot.price))));
        rows.push(("Change", ui::change_cell(snapshot.price_change)));
        rows.push(("52W High", ui::value_cell(format_price(snapshot.week52_high))));
        rows.push(("52W Low", ui::value_cell(format_price(snapshot.week52_low))));
        rows.push(("Volume", ui::value_cell(format_volume(snapshot.volume))));
        rows.push(("P/E", ui::value_cell(format_number(snapshot.pe_ratio))));
        rows.push(("PEG", ui::value_cell(format_number(snapshot.peg_ratio))));
    }
    if let Some(profile) = &detail.profile {
        rows.push((
            "Employees",
            ui::value_cell(format_number(profile.employees.map(|e| e as f64))),
        ));
        rows.push(("Revenue", ui::value_cell(format_market_cap(profile.revenue))));
        rows.push(("Net Income", ui::value_cell(format_market_cap(profile.net_income))));
    }
    if let Some(score) = &detail.score {
        rows.push((
            "Score",
            ui::value_cell(format_score(score.summary.total, 100.0)),
        ));
        rows.push(("Revenue Growth", ui::value_cell(format_percent(score.revenue_growth))));
        rows.push((
            "Operating Margin",
            ui::value_cell(format_percent(score.operating_margin)),
        ));
        rows.push((
            "Recommendation",
            ui::value_cell(format_recommendation(score.recommendation_key.as_deref())),
        ));
        rows.push((
            "Target Price",
            ui::value_cell(format_price(score.target_mean_price)),
        ));
    }

    for (label, cell) in rows {
        table.add_row(vec![Cell::new(label), cell]);
    }
    table
}

pub async fn run_sector(
    api: &dyn DashboardApi,
    currency: &CurrencyTable,
    sector_id: &str,
) -> Result<()> {
    let detail = api.sector(sector_id).await?;
    let caption = detail
        .category
        .as_ref()
        .map(|c| format!("{} / total {}", c.name, format_market_cap(Some(detail.market_cap_total))));
    ui::print_heading(&detail.sector.name, caption.as_deref());
    if let Some(description) = &detail.sector.description {
        println!("{description}");
    }
    println!("{}", build_sector_table(&detail, currency));
    Ok(())
}

fn build_sector_table(detail: &SectorDetailResponse, currency: &CurrencyTable) -> Table {
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Rank"),
        ui::header_cell("Ticker"),
        ui::header_cell("Company"),
        ui::header_cell("Market Cap (USD)"),
        ui::header_cell("Score"),
    ]);

    let mut companies: Vec<&SectorCompany> = detail.companies.iter().collect();
    companies.sort_by_key(|c| c.rank);
    for entry in companies {
        let market_cap = usd_market_cap(
            currency,
            &entry.ticker,
            entry.snapshot.as_ref().and_then(|s| s.market_cap),
        );
        let score = entry
            .score
            .as_ref()
            .map_or(ui::na_cell(), |s| ui::value_cell(format_score(s.total, 100.0)));
        table.add_row(vec![
            Cell::new(entry.rank),
            Cell::new(&entry.ticker),
            Cell::new(entry.company.display_name()),
            ui::value_cell(format_market_cap(market_cap)),
            score,
        ]);
    }
    table
}

pub async fn run_search(
    api: &dyn DashboardApi,
    currency: &CurrencyTable,
    query: &str,
    limit: u32,
) -> Result<()> {
    let results = api.search(query, limit).await?;
    if results.results.is_empty() {
        println!("No companies match \"{}\".", results.query);
        return Ok(());
    }
    ui::print_heading(
        &format!("Search: {}", results.query),
        Some(&format!("{} result(s)", results.total)),
    );
    println!("{}", build_search_table(&results, currency));
    Ok(())
}

fn build_search_table(results: &SearchResponse, currency: &CurrencyTable) -> Table {
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Ticker"),
        ui::header_cell("Name"),
        ui::header_cell("Price"),
        ui::header_cell("Change"),
        ui::header_cell("Market Cap (USD)"),
    ]);
    for item in &results.results {
        table.add_row(vec![
            Cell::new(&item.ticker),
            Cell::new(item.name_ko.as_deref().unwrap_or(&item.name)),
            ui::value_cell(format_price(item.price)),
            ui::change_cell(item.price_change),
            ui::value_cell(format_market_cap(usd_market_cap(
                currency,
                &item.ticker,
                item.market_cap,
            ))),
        ]);
    }
    table
}
