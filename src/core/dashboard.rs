//! Dashboard data abstractions: one operation per logical resource.

use crate::core::envelope::ApiError;
use crate::core::models::{
    CompanyDetailResponse, CompanyStatSort, CompanyStatisticsResponse, IndustriesResponse,
    IndustryMoneyFlowResponse, MapResponse, MoneyFlowResponse, PriceChangeSort,
    PriceChangesResponse, SearchResponse, SectorCompaniesResponse, SectorDetailResponse,
    SectorTrendResponse, SortOrder, TrendDays, TrendType, TrendsResponse,
};
use crate::core::validate::{validate_date, validate_industry_id, validate_search_query};
use async_trait::async_trait;

pub const DEFAULT_FLOW_PERIOD: u32 = 14;
pub const DEFAULT_FLOW_LIMIT: u32 = 6;
pub const DEFAULT_SEARCH_LIMIT: u32 = 10;

pub type QueryParams = Vec<(&'static str, String)>;

#[async_trait]
pub trait DashboardApi: Send + Sync {
    async fn industries(&self) -> Result<IndustriesResponse, ApiError>;
    async fn map(&self, query: &MapQuery) -> Result<MapResponse, ApiError>;
    async fn company(&self, ticker: &str) -> Result<CompanyDetailResponse, ApiError>;
    async fn sector(&self, sector_id: &str) -> Result<SectorDetailResponse, ApiError>;
    async fn sector_trend(&self, industry: Option<&str>) -> Result<SectorTrendResponse, ApiError>;
    async fn price_changes(
        &self,
        query: &PriceChangesQuery,
    ) -> Result<PriceChangesResponse, ApiError>;
    async fn money_flow(&self, query: &MoneyFlowQuery) -> Result<MoneyFlowResponse, ApiError>;
    async fn industry_money_flow(&self, period: u32)
    -> Result<IndustryMoneyFlowResponse, ApiError>;
    async fn sector_companies(
        &self,
        sector_id: &str,
        period: u32,
    ) -> Result<SectorCompaniesResponse, ApiError>;
    async fn company_statistics(
        &self,
        query: &CompanyStatisticsQuery,
    ) -> Result<CompanyStatisticsResponse, ApiError>;
    async fn trends(&self, query: &TrendsQuery) -> Result<TrendsResponse, ApiError>;
    async fn search(&self, query: &str, limit: u32) -> Result<SearchResponse, ApiError>;
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct MapQuery {
    pub date: Option<String>,
    pub industry: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct PriceChangesQuery {
    pub sort: PriceChangeSort,
    pub order: SortOrder,
    pub industry: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MoneyFlowQuery {
    pub period: u32,
    pub limit: u32,
    pub industry: Option<String>,
}

impl Default for MoneyFlowQuery {
    fn default() -> Self {
        Self {
            period: DEFAULT_FLOW_PERIOD,
            limit: DEFAULT_FLOW_LIMIT,
            industry: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CompanyStatisticsQuery {
    pub sort: CompanyStatSort,
    pub order: SortOrder,
    pub page: u32,
    pub limit: u32,
    pub industry: Option<String>,
}

impl Default for CompanyStatisticsQuery {
    fn default() -> Self {
        Self {
            sort: CompanyStatSort::default(),
            order: SortOrder::default(),
            page: 1,
            limit: 20,
            industry: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct TrendsQuery {
    pub trend_type: TrendType,
    pub ids: Vec<String>,
    pub days: TrendDays,
    pub industry: Option<String>,
}

fn push_industry(params: &mut QueryParams, industry: Option<&str>) {
    if let Some(industry) = industry {
        params.push(("industry", industry.to_string()));
    }
}

impl MapQuery {
    pub fn validate(&self) -> Result<(), ApiError> {
        if let Some(date) = &self.date {
            if !validate_date(date) {
                return Err(ApiError::InvalidInput(format!(
                    "date must be YYYY-MM-DD: {date}"
                )));
            }
        }
        check_industry(self.industry.as_deref())
    }

    pub fn params(&self) -> QueryParams {
        let mut params = Vec::new();
        if let Some(date) = &self.date {
            params.push(("date", date.clone()));
        }
        push_industry(&mut params, self.industry.as_deref());
        params
    }
}

impl PriceChangesQuery {
    pub fn params(&self) -> QueryParams {
        let mut params = vec![
            ("sort", self.sort.to_string()),
            ("order", self.order.to_string()),
        ];
        push_industry(&mut params, self.industry.as_deref());
        params
    }
}

impl MoneyFlowQuery {
    pub fn params(&self) -> QueryParams {
        let mut params = vec![
            ("period", self.period.to_string()),
            ("limit", self.limit.to_string()),
        ];
        push_industry(&mut params, self.industry.as_deref());
        params
    }
}

impl CompanyStatisticsQuery {
    pub fn params(&self) -> QueryParams {
        let mut params = vec![
            ("sort", self.sort.to_string()),
            ("order", self.order.to_string()),
            ("page", self.page.to_string()),
            ("limit", self.limit.to_string()),
        ];
        push_industry(&mut params, self.industry.as_deref());
        params
    }
}

impl TrendsQuery {
    pub fn params(&self) -> QueryParams {
        let mut params = vec![
            ("type", self.trend_type.to_string()),
            ("days", self.days.to_string()),
        ];
        if !self.ids.is_empty() {
            params.push(("ids", self.ids.join(",")));
        }
        push_industry(&mut params, self.industry.as_deref());
        params
    }
}

/// Rejects malformed industry ids before they reach the network.
pub fn check_industry(industry: Option<&str>) -> Result<(), ApiError> {
    match industry {
        Some(id) if !validate_industry_id(id) => {
            Err(ApiError::InvalidInput(format!("invalid industry id: {id}")))
        }
        _ => Ok(()),
    }
}

pub fn check_not_empty(field: &str, value: &str) -> Result<(), ApiError> {
    if value.trim().is_empty() {
        return Err(ApiError::InvalidInput(format!("{field} must not be empty")));
    }
    Ok(())
}

pub fn check_search_query(query: &str) -> Result<(), ApiError> {
    if !validate_search_query(query) {
        return Err(ApiError::InvalidInput(
            "search query must be 1 to 100 characters".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_queries_match_dashboard_defaults() {
        assert_eq!(
            PriceChangesQuery::default().params(),
            vec![
                ("sort", "percentChange".to_string()),
                ("order", "desc".to_string())
            ]
        );
        assert_eq!(
            MoneyFlowQuery::default().params(),
            vec![("period", "14".to_string()), ("limit", "6".to_string())]
        );
        assert_eq!(
            CompanyStatisticsQuery::default().params(),
            vec![
                ("sort", "count".to_string()),
                ("order", "desc".to_string()),
                ("page", "1".to_string()),
                ("limit", "20".to_string()),
            ]
        );
        assert!(MapQuery::default().params().is_empty());
    }

    #[test]
    fn test_trend_params_join_ids_and_filter_industry() {
        let query = TrendsQuery {
            trend_type: TrendType::Company,
            ids: vec!["AAPL".to_string(), "005930.KS".to_string()],
            days: TrendDays::Week,
            industry: Some("semiconductor".to_string()),
        };
        assert_eq!(
            query.params(),
            vec![
                ("type", "company".to_string()),
                ("days", "7".to_string()),
                ("ids", "AAPL,005930.KS".to_string()),
                ("industry", "semiconductor".to_string()),
            ]
        );
    }

    #[test]
    fn test_map_query_validation() {
        let ok = MapQuery {
            date: Some("2024-06-01".to_string()),
            industry: Some("ai".to_string()),
        };
        assert!(ok.validate().is_ok());

        let bad_date = MapQuery {
            date: Some("June 1st".to_string()),
            industry: None,
        };
        assert!(matches!(bad_date.validate(), Err(ApiError::InvalidInput(_))));

        let bad_industry = MapQuery {
            date: None,
            industry: Some("Tech Sector".to_string()),
        };
        assert_eq!(
            bad_industry.validate().unwrap_err().to_string(),
            "invalid input: invalid industry id: Tech Sector"
        );
    }

    #[test]
    fn test_input_checks() {
        assert!(check_industry(None).is_ok());
        assert!(check_not_empty("ticker", "  ").is_err());
        assert!(check_not_empty("ticker", "AAPL").is_ok());
        assert!(check_search_query("").is_err());
        assert!(check_search_query("hynix").is_ok());
    }
}
