pub mod cli;
pub mod core;
pub mod providers;

use crate::core::config::AppConfig;
use crate::core::dashboard::{
    CompanyStatisticsQuery, MapQuery, MoneyFlowQuery, PriceChangesQuery, TrendsQuery,
};
use crate::providers::{HttpDashboardClient, ResponseCache};
use anyhow::Result;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info};

/// A dashboard page to render.
#[derive(Debug, Clone)]
pub enum AppCommand {
    Industries,
    Map {
        query: MapQuery,
        sector: Option<String>,
        top: usize,
    },
    Company {
        ticker: String,
    },
    Sector {
        sector_id: String,
    },
    SectorTrend {
        industry: Option<String>,
    },
    PriceChanges(PriceChangesQuery),
    MoneyFlow(MoneyFlowQuery),
    IndustryFlow {
        period: u32,
    },
    SectorCompanies {
        sector_id: String,
        period: u32,
    },
    Statistics(CompanyStatisticsQuery),
    Trends(TrendsQuery),
    Search {
        query: String,
        limit: u32,
    },
    Overview {
        industry: Option<String>,
    },
    Share {
        path: String,
    },
    Sitemap {
        output: Option<PathBuf>,
    },
    JsonLd,
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    info!("Sector King starting...");

    let config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };
    debug!("Loaded config: {config:#?}");

    let cache = Arc::new(ResponseCache::new());
    let client = HttpDashboardClient::new(&config.api.base_url, cache, config.stale_times())?;
    let currency = config.currency_table();
    let site_url = config.site_url();

    match command {
        AppCommand::Industries => cli::industries::run(&client).await,
        AppCommand::Map { query, sector, top } => {
            cli::market::run_map(&client, &currency, &query, sector.as_deref(), top).await
        }
        AppCommand::Company { ticker } => cli::market::run_company(&client, &currency, &ticker).await,
        AppCommand::Sector { sector_id } => {
            cli::market::run_sector(&client, &currency, &sector_id).await
        }
        AppCommand::SectorTrend { industry } => {
            cli::statistics::run_sector_trend(&client, industry.as_deref()).await
        }
        AppCommand::PriceChanges(query) => {
            cli::statistics::run_price_changes(&client, &query).await
        }
        AppCommand::MoneyFlow(query) => cli::statistics::run_money_flow(&client, &query).await,
        AppCommand::IndustryFlow { period } => {
            cli::statistics::run_industry_flow(&client, period).await
        }
        AppCommand::SectorCompanies { sector_id, period } => {
            cli::statistics::run_sector_companies(&client, &sector_id, period).await
        }
        AppCommand::Statistics(query) => {
            cli::statistics::run_company_statistics(&client, &currency, &query).await
        }
        AppCommand::Trends(query) => cli::statistics::run_trends(&client, &query).await,
        AppCommand::Search { query, limit } => {
            cli::market::run_search(&client, &currency, &query, limit).await
        }
        AppCommand::Overview { industry } => {
            cli::overview::run(&client, industry.as_deref()).await
        }
        AppCommand::Share { path } => {
            cli::site::run_share(&client, &site_url, &config.redirects, &path).await
        }
        AppCommand::Sitemap { output } => {
            cli::site::run_sitemap(&client, &site_url, output.as_deref()).await
        }
        AppCommand::JsonLd => cli::site::run_json_ld(&site_url),
    }
}
