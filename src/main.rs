use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use sectorking::AppCommand;
use sectorking::core::dashboard::{
    CompanyStatisticsQuery, DEFAULT_FLOW_LIMIT, DEFAULT_FLOW_PERIOD, DEFAULT_SEARCH_LIMIT,
    MapQuery, MoneyFlowQuery, PriceChangesQuery, TrendsQuery,
};
use sectorking::core::log::init_logging;
use sectorking::core::models::{CompanyStatSort, PriceChangeSort, SortOrder, TrendDays, TrendType};
use std::path::PathBuf;

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to optional configuration file
    #[arg(short, long, global = true)]
    config_path: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// List industries with their market cap
    Industries,
    /// Show the sector dominance map
    Map {
        /// Snapshot date (YYYY-MM-DD)
        #[arg(long)]
        date: Option<String>,
        #[arg(short, long)]
        industry: Option<String>,
        /// Only show this sector
        #[arg(long)]
        sector: Option<String>,
        /// Companies shown per sector
        #[arg(long, default_value_t = 3)]
        top: usize,
    },
    /// Show a company's detail page
    Company { ticker: String },
    /// Show a sector's ranked companies
    Sector { sector_id: String },
    /// Show money flow per sector over several periods
    SectorTrend {
        #[arg(short, long)]
        industry: Option<String>,
    },
    /// Show price changes since the first snapshot
    PriceChanges {
        /// percentChange, name or marketCap
        #[arg(long, default_value_t = PriceChangeSort::default())]
        sort: PriceChangeSort,
        #[arg(long, default_value_t = SortOrder::default())]
        order: SortOrder,
        #[arg(short, long)]
        industry: Option<String>,
    },
    /// Show sector money flow
    MoneyFlow {
        /// Period in days
        #[arg(short, long, default_value_t = DEFAULT_FLOW_PERIOD)]
        period: u32,
        #[arg(short, long, default_value_t = DEFAULT_FLOW_LIMIT)]
        limit: u32,
        #[arg(short, long)]
        industry: Option<String>,
    },
    /// Show money flow per industry
    IndustryFlow {
        #[arg(short, long, default_value_t = DEFAULT_FLOW_PERIOD)]
        period: u32,
    },
    /// Show price data of a sector's companies
    SectorCompanies {
        sector_id: String,
        #[arg(short, long, default_value_t = DEFAULT_FLOW_PERIOD)]
        period: u32,
    },
    /// Show companies ranked by how many sectors they appear in
    Statistics {
        /// count, marketCap or name
        #[arg(long, default_value_t = CompanyStatSort::default())]
        sort: CompanyStatSort,
        #[arg(long, default_value_t = SortOrder::default())]
        order: SortOrder,
        #[arg(long, default_value_t = 1)]
        page: u32,
        #[arg(short, long, default_value_t = 20)]
        limit: u32,
        #[arg(short, long)]
        industry: Option<String>,
    },
    /// Show market cap trends
    Trends {
        /// sector, category or company
        #[arg(short = 't', long = "type", default_value_t = TrendType::default())]
        trend_type: TrendType,
        /// 7, 30 or all
        #[arg(short, long, default_value_t = TrendDays::default())]
        days: TrendDays,
        /// Comma separated ids to include
        #[arg(long, value_delimiter = ',')]
        ids: Vec<String>,
        #[arg(short, long)]
        industry: Option<String>,
    },
    /// Search companies by ticker or name
    Search {
        query: String,
        #[arg(short, long, default_value_t = DEFAULT_SEARCH_LIMIT)]
        limit: u32,
    },
    /// Show the landing page panels
    Overview {
        #[arg(short, long)]
        industry: Option<String>,
    },
    /// Print share links for a page
    Share {
        /// Page path, e.g. /semiconductor/money-flow
        #[arg(default_value = "/")]
        path: String,
    },
    /// Generate sitemap XML
    Sitemap {
        /// Write to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Print the site's JSON-LD structured data
    JsonLd,
}

impl From<Commands> for AppCommand {
    fn from(cmd: Commands) -> AppCommand {
        match cmd {
            Commands::Industries => AppCommand::Industries,
            Commands::Map {
                date,
                industry,
                sector,
                top,
            } => AppCommand::Map {
                query: MapQuery { date, industry },
                sector,
                top,
            },
            Commands::Company { ticker } => AppCommand::Company { ticker },
            Commands::Sector { sector_id } => AppCommand::Sector { sector_id },
            Commands::SectorTrend { industry } => AppCommand::SectorTrend { industry },
            Commands::PriceChanges {
                sort,
                order,
                industry,
            } => AppCommand::PriceChanges(PriceChangesQuery {
                sort,
                order,
                industry,
            }),
            Commands::MoneyFlow {
                period,
                limit,
                industry,
            } => AppCommand::MoneyFlow(MoneyFlowQuery {
                period,
                limit,
                industry,
            }),
            Commands::IndustryFlow { period } => AppCommand::IndustryFlow { period },
            Commands::SectorCompanies { sector_id, period } => {
                AppCommand::SectorCompanies { sector_id, period }
            }
            Commands::Statistics {
                sort,
                order,
                page,
                limit,
                industry,
            } => AppCommand::Statistics(CompanyStatisticsQuery {
                sort,
                order,
                page,
                limit,
                industry,
            }),
            Commands::Trends {
                trend_type,
                days,
                ids,
                industry,
            } => AppCommand::Trends(TrendsQuery {
                trend_type,
                ids,
                days,
                industry,
            }),
            Commands::Search { query, limit } => AppCommand::Search { query, limit },
            Commands::Overview { industry } => AppCommand::Overview { industry },
            Commands::Share { path } => AppCommand::Share { path },
            Commands::Sitemap { output } => AppCommand::Sitemap { output },
            Commands::JsonLd => AppCommand::JsonLd,
            Commands::Setup => unreachable!("Setup command should be handled separately"),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command {
        Some(Commands::Setup) => match cli.config_path.as_deref() {
            Some(path) => sectorking::cli::setup::setup_at_path(path),
            None => sectorking::cli::setup::setup(),
        },
        Some(cmd) => sectorking::run_command(cmd.into(), cli.config_path.as_deref()).await,
        None => {
            Cli::command().print_help()?;
            Ok(())
        }
    };

    if let Err(e) = &result {
        tracing::error!(error = %e, "Application failed");
    }
    result
}
