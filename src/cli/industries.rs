use super::ui;
use crate::core::dashboard::DashboardApi;
use crate::core::format::{format_date, format_market_cap};
use crate::core::models::IndustriesResponse;
use anyhow::Result;
use comfy_table::{Cell, Table};

pub async fn run(api: &dyn DashboardApi) -> Result<()> {
    let industries = api.industries().await?;
    if industries.industries.is_empty() {
        println!("No industries available.");
        return Ok(());
    }
    let caption = industries
        .last_updated
        .as_deref()
        .map(|d| format!("Last updated {}", format_date(d)));
    ui::print_heading("Industries", caption.as_deref());
    println!("{}", build_table(&industries));
    Ok(())
}

pub(crate) fn build_table(industries: &IndustriesResponse) -> Table {
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Id"),
        ui::header_cell("Industry"),
        ui::header_cell("Categories"),
        ui::header_cell("Sectors"),
        ui::header_cell("Companies"),
        ui::header_cell("Market Cap"),
        ui::header_cell("Change"),
    ]);

    for industry in &industries.industries {
        let name = match industry.icon.as_deref() {
            Some(icon) if !icon.is_empty() => format!("{icon} {}", industry.name),
            _ => industry.name.clone(),
        };
        table.add_row(vec![
            Cell::new(&industry.id),
            Cell::new(name),
            Cell::new(industry.category_count),
            Cell::new(industry.sector_count),
            Cell::new(industry.company_count),
            ui::value_cell(format_market_cap(Some(industry.total_market_cap))),
            ui::change_cell(Some(industry.market_cap_change)),
        ]);
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::IndustryOverview;

    #[test]
    fn test_build_table_lists_every_industry() {
        let industries = IndustriesResponse {
            industries: vec![
                IndustryOverview {
                    id: "semiconductor".to_string(),
                    name: "반도체".to_string(),
                    name_en: Some("Semiconductor".to_string()),
                    icon: Some("🔌".to_string()),
                    category_count: 3,
                    sector_count: 12,
                    company_count: 48,
                    total_market_cap: 8.2e12,
                    market_cap_change: 1.4,
                },
                IndustryOverview {
                    id: "bio".to_string(),
                    name: "바이오".to_string(),
                    name_en: None,
                    icon: None,
                    category_count: 1,
                    sector_count: 4,
                    company_count: 20,
                    total_market_cap: 9.5e11,
                    market_cap_change: -0.3,
                },
            ],
            last_updated: None,
        };

        let rendered = build_table(&industries).to_string();
        assert!(rendered.contains("🔌 반도체"));
        assert!(rendered.contains("$8.20T"));
        assert!(rendered.contains("$950.00B"));
        assert!(rendered.contains("-0.30%"));
    }
}
