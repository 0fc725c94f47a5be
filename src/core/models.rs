//! Payload types served by the dashboard endpoints.

use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateRange {
    pub start: String,
    pub end: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyRef {
    pub ticker: String,
    pub name: String,
    pub name_ko: Option<String>,
    pub logo_url: Option<String>,
}

impl CompanyRef {
    /// Korean name when present, otherwise the listing name.
    pub fn display_name(&self) -> &str {
        self.name_ko.as_deref().unwrap_or(&self.name)
    }
}

// Industries

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndustryOverview {
    pub id: String,
    pub name: String,
    pub name_en: Option<String>,
    pub icon: Option<String>,
    pub category_count: u32,
    pub sector_count: u32,
    pub company_count: u32,
    pub total_market_cap: f64,
    pub market_cap_change: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndustriesResponse {
    pub industries: Vec<IndustryOverview>,
    pub last_updated: Option<String>,
}

// Map

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: String,
    pub name: String,
    pub name_en: Option<String>,
    pub order: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sector {
    pub id: String,
    pub category_id: Option<String>,
    pub name: String,
    pub name_en: Option<String>,
    pub order: i32,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreSummary {
    pub total: f64,
    pub scale: f64,
    pub growth: f64,
    pub profitability: f64,
    pub sentiment: f64,
    pub data_quality: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotSummary {
    pub date: String,
    pub market_cap: Option<f64>,
    pub price: Option<f64>,
    pub price_change: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentSnapshot {
    pub price: Option<f64>,
    pub price_change: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SectorCompany {
    pub sector_id: String,
    pub ticker: String,
    pub rank: u32,
    pub notes: Option<String>,
    pub company: CompanyRef,
    pub snapshot: Option<SnapshotSummary>,
    pub score: Option<ScoreSummary>,
    #[serde(default)]
    pub current_snapshot: Option<CurrentSnapshot>,
    #[serde(default)]
    pub price_change_from_snapshot: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapResponse {
    pub categories: Vec<Category>,
    pub sectors: Vec<Sector>,
    pub sector_companies: Vec<SectorCompany>,
    pub last_updated: Option<String>,
    pub selected_date: Option<String>,
    pub available_dates: Vec<String>,
    pub is_historical: bool,
}

impl MapResponse {
    /// Companies of a sector ordered by rank.
    pub fn companies_in(&self, sector_id: &str) -> Vec<&SectorCompany> {
        let mut companies: Vec<&SectorCompany> = self
            .sector_companies
            .iter()
            .filter(|sc| sc.sector_id == sector_id)
            .collect();
        companies.sort_by_key(|sc| sc.rank);
        companies
    }
}

// Company detail

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyProfile {
    pub sector: Option<String>,
    pub industry: Option<String>,
    pub country: Option<String>,
    pub employees: Option<u64>,
    pub revenue: Option<f64>,
    pub net_income: Option<f64>,
    pub description: Option<String>,
    pub website: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanySnapshot {
    pub market_cap: Option<f64>,
    pub price: Option<f64>,
    pub price_change: Option<f64>,
    pub week52_high: Option<f64>,
    pub week52_low: Option<f64>,
    pub volume: Option<f64>,
    pub pe_ratio: Option<f64>,
    pub peg_ratio: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceHistory {
    pub date: String,
    pub price: f64,
    pub volume: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreDetail {
    #[serde(flatten)]
    pub summary: ScoreSummary,
    pub revenue_growth: Option<f64>,
    pub earnings_growth: Option<f64>,
    pub operating_margin: Option<f64>,
    pub return_on_equity: Option<f64>,
    pub recommendation_key: Option<String>,
    pub analyst_count: Option<u32>,
    pub target_mean_price: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SectorRef {
    pub id: String,
    pub name: String,
    pub name_en: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanySectorRank {
    pub sector: SectorRef,
    pub rank: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyDetailResponse {
    pub company: CompanyRef,
    pub profile: Option<CompanyProfile>,
    pub snapshot: Option<CompanySnapshot>,
    pub history: Vec<PriceHistory>,
    pub score: Option<ScoreDetail>,
    pub sectors: Vec<CompanySectorRank>,
}

// Sector detail

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SectorDetailResponse {
    pub sector: Sector,
    pub category: Option<SectorRef>,
    pub companies: Vec<SectorCompany>,
    pub market_cap_total: f64,
}

// Statistics

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SectorTrendPeriod {
    pub period: u32,
    pub flow_percent: f64,
    pub flow_amount: f64,
    pub start_market_cap: f64,
    pub end_market_cap: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SectorTrendData {
    pub id: String,
    pub name: String,
    pub name_en: Option<String>,
    pub periods: Vec<SectorTrendPeriod>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SectorTrendResponse {
    pub sectors: Vec<SectorTrendData>,
    pub date_range: DateRange,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceChangeItem {
    pub ticker: String,
    pub name: String,
    pub name_ko: Option<String>,
    pub first_price: Option<f64>,
    pub first_date: String,
    pub latest_price: Option<f64>,
    pub latest_date: String,
    pub price_change: Option<f64>,
    pub percent_change: Option<f64>,
    pub market_cap: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceChangesResponse {
    pub companies: Vec<PriceChangeItem>,
    pub date_range: DateRange,
    pub total: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlowDirection {
    In,
    Out,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoneyFlowTrendPoint {
    pub date: String,
    pub mfi: Option<f64>,
    pub flow_amount: f64,
    pub market_cap: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SectorMoneyFlow {
    pub id: String,
    pub name: String,
    pub name_en: Option<String>,
    pub mfi: Option<f64>,
    pub flow_direction: FlowDirection,
    pub flow_amount: f64,
    pub flow_percent: f64,
    pub start_market_cap: f64,
    pub end_market_cap: f64,
    pub company_count: u32,
    pub trend: Vec<MoneyFlowTrendPoint>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoneyFlowResponse {
    pub period: u32,
    pub date: String,
    pub flows: Vec<SectorMoneyFlow>,
    pub total_inflow: f64,
    pub total_outflow: f64,
    pub net_flow: f64,
    pub date_range: DateRange,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndustryMoneyFlowSummary {
    pub industry_id: String,
    pub industry_name: String,
    pub industry_name_en: Option<String>,
    pub industry_icon: Option<String>,
    pub total_inflow: f64,
    pub total_outflow: f64,
    pub net_flow: f64,
    pub net_flow_percent: f64,
    pub flow_direction: FlowDirection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndustryMoneyFlowResponse {
    pub industries: Vec<IndustryMoneyFlowSummary>,
    pub period: u32,
    pub date_range: DateRange,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SectorCompanyPriceData {
    pub ticker: String,
    pub name: String,
    pub name_ko: Option<String>,
    pub rank: u32,
    pub start_price: Option<f64>,
    pub end_price: Option<f64>,
    pub price_change_percent: Option<f64>,
    pub market_cap: Option<f64>,
    pub price_history: Vec<PriceHistory>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SectorCompaniesResponse {
    pub sector_id: String,
    pub sector_name: String,
    pub period: u32,
    pub date_range: DateRange,
    pub companies: Vec<SectorCompanyPriceData>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanySectorInfo {
    pub id: String,
    pub name: String,
    pub rank: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LatestSnapshot {
    pub market_cap: Option<f64>,
    pub price: Option<f64>,
    pub price_change: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyStatItem {
    pub ticker: String,
    pub name: String,
    pub name_ko: Option<String>,
    pub count: u32,
    pub sectors: Vec<CompanySectorInfo>,
    pub latest_snapshot: Option<LatestSnapshot>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyStatisticsResponse {
    pub companies: Vec<CompanyStatItem>,
    pub total: u32,
    pub page: u32,
    pub total_pages: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendDataPoint {
    pub date: String,
    pub market_cap: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendItem {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub name_ko: Option<String>,
    pub data: Vec<TrendDataPoint>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryMarketCap {
    pub id: String,
    pub name: String,
    pub name_en: Option<String>,
    pub market_cap: f64,
    pub sector_count: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SectorGrowth {
    pub id: String,
    pub name: String,
    pub name_en: Option<String>,
    pub category_id: Option<String>,
    pub start_market_cap: f64,
    pub end_market_cap: f64,
    pub growth_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendsResponse {
    pub items: Vec<TrendItem>,
    pub date_range: DateRange,
    #[serde(default)]
    pub categories: Option<Vec<CategoryMarketCap>>,
    #[serde(default)]
    pub sector_growth: Option<Vec<SectorGrowth>>,
}

// Search

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResultItem {
    pub ticker: String,
    pub name: String,
    pub name_ko: Option<String>,
    pub price: Option<f64>,
    pub price_change: Option<f64>,
    pub market_cap: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    pub results: Vec<SearchResultItem>,
    pub query: String,
    pub total: u32,
}

// Query parameter enums

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PriceChangeSort {
    #[default]
    PercentChange,
    Name,
    MarketCap,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CompanyStatSort {
    #[default]
    Count,
    MarketCap,
    Name,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TrendType {
    #[default]
    Sector,
    Category,
    Company,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TrendDays {
    Week,
    #[default]
    Month,
    All,
}

macro_rules! query_enum {
    ($ty:ident, $label:literal, { $($variant:ident => $value:literal),+ $(,)? }) => {
        impl $ty {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($ty::$variant => $value,)+
                }
            }
        }

        impl Display for $ty {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $ty {
            type Err = anyhow::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($value => Ok($ty::$variant),)+
                    _ => Err(anyhow::anyhow!("Invalid {}: {}", $label, s)),
                }
            }
        }
    };
}

query_enum!(SortOrder, "sort order", { Asc => "asc", Desc => "desc" });
query_enum!(PriceChangeSort, "price change sort", {
    PercentChange => "percentChange",
    Name => "name",
    MarketCap => "marketCap",
});
query_enum!(CompanyStatSort, "company statistics sort", {
    Count => "count",
    MarketCap => "marketCap",
    Name => "name",
});
query_enum!(TrendType, "trend type", {
    Sector => "sector",
    Category => "category",
    Company => "company",
});
query_enum!(TrendDays, "trend range", { Week => "7", Month => "30", All => "all" });

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_map_response_deserialization() {
        let body = json!({
            "categories": [{"id": "chips", "name": "반도체", "nameEn": "Chips", "order": 1}],
            "sectors": [{
                "id": "memory", "categoryId": "chips", "name": "메모리",
                "nameEn": "Memory", "order": 1, "description": null
            }],
            "sectorCompanies": [
                {
                    "sectorId": "memory", "ticker": "000660.KS", "rank": 2, "notes": null,
                    "company": {"ticker": "000660.KS", "name": "SK hynix", "nameKo": "SK하이닉스", "logoUrl": null},
                    "snapshot": {"date": "2024-06-01", "marketCap": 1.5e14, "price": 210000.0, "priceChange": 1.2},
                    "score": null
                },
                {
                    "sectorId": "memory", "ticker": "005930.KS", "rank": 1, "notes": null,
                    "company": {"ticker": "005930.KS", "name": "Samsung", "nameKo": null, "logoUrl": null},
                    "snapshot": null,
                    "score": {"total": 80.5, "scale": 30, "growth": 15, "profitability": 20, "sentiment": 10, "dataQuality": 0.9}
                }
            ],
            "lastUpdated": "2024-06-01",
            "selectedDate": null,
            "availableDates": ["2024-06-01"],
            "isHistorical": false
        });

        let map: MapResponse = serde_json::from_value(body).unwrap();
        assert_eq!(map.categories[0].name_en.as_deref(), Some("Chips"));
        assert_eq!(map.sector_companies.len(), 2);
        assert!(map.sector_companies[0].current_snapshot.is_none());

        let ranked = map.companies_in("memory");
        assert_eq!(ranked[0].ticker, "005930.KS");
        assert_eq!(ranked[1].company.display_name(), "SK하이닉스");
        assert_eq!(ranked[0].company.display_name(), "Samsung");
        assert!(map.companies_in("unknown").is_empty());
    }

    #[test]
    fn test_score_detail_flattens_summary() {
        let body = json!({
            "total": 72.0, "scale": 25.0, "growth": 12.0, "profitability": 20.0,
            "sentiment": 15.0, "dataQuality": 1.0,
            "revenueGrowth": 0.12, "earningsGrowth": null, "operatingMargin": 0.3,
            "returnOnEquity": null, "recommendationKey": "buy", "analystCount": 31,
            "targetMeanPrice": 95000.0
        });
        let score: ScoreDetail = serde_json::from_value(body).unwrap();
        assert_eq!(score.summary.total, 72.0);
        assert_eq!(score.recommendation_key.as_deref(), Some("buy"));
        assert_eq!(score.analyst_count, Some(31));
    }

    #[test]
    fn test_query_enums_round_trip_wire_names() {
        assert_eq!(PriceChangeSort::default().to_string(), "percentChange");
        assert_eq!(TrendDays::Week.as_str(), "7");
        assert_eq!("marketCap".parse::<CompanyStatSort>().unwrap(), CompanyStatSort::MarketCap);
        assert_eq!(
            "sideways".parse::<SortOrder>().unwrap_err().to_string(),
            "Invalid sort order: sideways"
        );
    }

    #[test]
    fn test_flow_direction_wire_names() {
        let flow: FlowDirection = serde_json::from_value(json!("in")).unwrap();
        assert_eq!(flow, FlowDirection::In);
        assert_eq!(serde_json::to_value(FlowDirection::Out).unwrap(), json!("out"));
    }
}
