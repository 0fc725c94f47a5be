use async_trait::async_trait;
use reqwest::Url;
use serde::de::DeserializeOwned;
use std::any::Any;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, instrument};

use crate::core::cache::QueryCache;
use crate::core::config::StaleTimes;
use crate::core::dashboard::{
    CompanyStatisticsQuery, DashboardApi, MapQuery, MoneyFlowQuery, PriceChangesQuery,
    QueryParams, TrendsQuery, check_industry, check_not_empty, check_search_query,
};
use crate::core::envelope::{ApiEnvelope, ApiError, ErrorEnvelope, UNKNOWN_ERROR};
use crate::core::models::{
    CompanyDetailResponse, CompanyStatisticsResponse, IndustriesResponse,
    IndustryMoneyFlowResponse, MapResponse, MoneyFlowResponse, PriceChangesResponse,
    SearchResponse, SectorCompaniesResponse, SectorDetailResponse, SectorTrendResponse,
    TrendsResponse,
};

/// Decoded payloads keyed by request; each key maps to exactly one payload type.
pub type ResponseCache = QueryCache<String, Arc<dyn Any + Send + Sync>>;

/// A single GET against the dashboard API.
struct ApiRequest {
    name: &'static str,
    segments: Vec<String>,
    params: QueryParams,
    stale_time: Duration,
    failure_message: &'static str,
    envelope_fallback: &'static str,
}

impl ApiRequest {
    fn new(name: &'static str, path: &str, failure_message: &'static str) -> Self {
        ApiRequest {
            name,
            segments: path.split('/').map(str::to_string).collect(),
            params: Vec::new(),
            stale_time: Duration::ZERO,
            failure_message,
            envelope_fallback: UNKNOWN_ERROR,
        }
    }

    fn segment(mut self, segment: &str) -> Self {
        self.segments.push(segment.to_string());
        self
    }

    fn params(mut self, params: QueryParams) -> Self {
        self.params = params;
        self
    }

    /// Reports the failure message, not "Unknown error", for a failed
    /// envelope without an `error`.
    fn failure_message_on_envelope(mut self) -> Self {
        self.envelope_fallback = self.failure_message;
        self
    }

    fn stale_for(mut self, stale_time: Duration) -> Self {
        self.stale_time = stale_time;
        self
    }

    fn path(&self) -> String {
        format!("/{}", self.segments.join("/"))
    }

    fn cache_key(&self) -> String {
        let query: Vec<String> = self
            .params
            .iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect();
        format!("{}:{}?{}", self.name, self.path(), query.join("&"))
    }
}

pub struct HttpDashboardClient {
    base_url: String,
    client: reqwest::Client,
    cache: Arc<ResponseCache>,
    stale: StaleTimes,
}

impl HttpDashboardClient {
    pub fn new(
        base_url: &str,
        cache: Arc<ResponseCache>,
        stale: StaleTimes,
    ) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("sectorking/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(HttpDashboardClient {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
            cache,
            stale,
        })
    }

    fn url_for(&self, request: &ApiRequest) -> Result<Url, ApiError> {
        let invalid = |reason: String| ApiError::InvalidInput(reason);
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| invalid(format!("invalid base URL {}: {e}", self.base_url)))?;
        url.path_segments_mut()
            .map_err(|_| invalid(format!("base URL cannot carry a path: {}", self.base_url)))?
            .pop_if_empty()
            .extend(&request.segments);
        if !request.params.is_empty() {
            url.query_pairs_mut().extend_pairs(&request.params);
        }
        Ok(url)
    }

    #[instrument(
        name = "DashboardFetch",
        skip(self, request),
        fields(endpoint = request.name, path = %request.path())
    )]
    async fn fetch<T: DeserializeOwned>(&self, request: &ApiRequest) -> Result<T, ApiError> {
        let url = self.url_for(request)?;
        debug!("Requesting dashboard data from {}", url);

        let response = self.client.get(url).send().await?;
        let status = response.status();
        let body = response.text().await?;
        debug!(%status, bytes = body.len(), "Received dashboard response");

        if !status.is_success() {
            let message = serde_json::from_str::<ErrorEnvelope>(&body)
                .ok()
                .and_then(|envelope| envelope.error)
                .filter(|message| !message.is_empty())
                .unwrap_or_else(|| request.failure_message.to_string());
            return Err(ApiError::Status {
                status: status.as_u16(),
                message,
            });
        }

        let envelope: ApiEnvelope<serde_json::Value> = serde_json::from_str(&body)?;
        let data = envelope.into_result_or(request.envelope_fallback)?;
        Ok(serde_json::from_value(data)?)
    }

    async fn get<T>(&self, request: ApiRequest) -> Result<T, ApiError>
    where
        T: DeserializeOwned + Clone + Send + Sync + 'static,
    {
        let key = format!("{}#{}", request.cache_key(), std::any::type_name::<T>());
        let cached = self
            .cache
            .get_or_fetch(key, request.stale_time, || async {
                let data: T = self.fetch(&request).await?;
                Ok::<Arc<dyn Any + Send + Sync>, ApiError>(Arc::new(data))
            })
            .await?;
        cached
            .downcast_ref::<T>()
            .cloned()
            .ok_or(ApiError::MissingData)
    }
}

#[async_trait]
impl DashboardApi for HttpDashboardClient {
    async fn industries(&self) -> Result<IndustriesResponse, ApiError> {
        self.get(
            ApiRequest::new("industries", "api/industries", "Failed to fetch industries")
                .stale_for(self.stale.industries),
        )
        .await
    }

    async fn map(&self, query: &MapQuery) -> Result<MapResponse, ApiError> {
        query.validate()?;
        self.get(
            ApiRequest::new("map", "api/map", "Failed to fetch map data")
                .params(query.params())
                .stale_for(self.stale.default),
        )
        .await
    }

    async fn company(&self, ticker: &str) -> Result<CompanyDetailResponse, ApiError> {
        check_not_empty("ticker", ticker)?;
        self.get(
            ApiRequest::new("company", "api/company", "Failed to fetch company data")
                .segment(ticker)
                .stale_for(self.stale.company),
        )
        .await
    }

    async fn sector(&self, sector_id: &str) -> Result<SectorDetailResponse, ApiError> {
        check_not_empty("sector id", sector_id)?;
        self.get(
            ApiRequest::new("sector", "api/sector", "Failed to fetch sector data")
                .segment(sector_id)
                .stale_for(self.stale.default),
        )
        .await
    }

    async fn sector_trend(&self, industry: Option<&str>) -> Result<SectorTrendResponse, ApiError> {
        check_industry(industry)?;
        let params = industry
            .map(|id| vec![("industry", id.to_string())])
            .unwrap_or_default();
        self.get(
            ApiRequest::new(
                "sector-trend",
                "api/statistics/sector-trend",
                "Failed to fetch sector trend data",
            )
            .failure_message_on_envelope()
            .params(params)
            .stale_for(self.stale.default),
        )
        .await
    }

    async fn price_changes(
        &self,
        query: &PriceChangesQuery,
    ) -> Result<PriceChangesResponse, ApiError> {
        check_industry(query.industry.as_deref())?;
        self.get(
            ApiRequest::new(
                "price-changes",
                "api/statistics/price-changes",
                "Failed to fetch price changes data",
            )
            .failure_message_on_envelope()
            .params(query.params())
            .stale_for(self.stale.default),
        )
        .await
    }

    async fn money_flow(&self, query: &MoneyFlowQuery) -> Result<MoneyFlowResponse, ApiError> {
        check_industry(query.industry.as_deref())?;
        self.get(
            ApiRequest::new(
                "money-flow",
                "api/statistics/money-flow",
                "Failed to fetch money flow data",
            )
            .failure_message_on_envelope()
            .params(query.params())
            .stale_for(self.stale.default),
        )
        .await
    }

    async fn industry_money_flow(
        &self,
        period: u32,
    ) -> Result<IndustryMoneyFlowResponse, ApiError> {
        self.get(
            ApiRequest::new(
                "industry-money-flow",
                "api/statistics/money-flow/industries",
                "Failed to fetch industry money flow data",
            )
            .failure_message_on_envelope()
            .params(vec![("period", period.to_string())])
            .stale_for(self.stale.default),
        )
        .await
    }

    async fn sector_companies(
        &self,
        sector_id: &str,
        period: u32,
    ) -> Result<SectorCompaniesResponse, ApiError> {
        check_not_empty("sector id", sector_id)?;
        self.get(
            ApiRequest::new(
                "sector-companies",
                "api/statistics/money-flow",
                "Failed to fetch sector companies",
            )
            .failure_message_on_envelope()
            .segment(sector_id)
            .segment("companies")
            .params(vec![("period", period.to_string())])
            .stale_for(self.stale.default),
        )
        .await
    }

    async fn company_statistics(
        &self,
        query: &CompanyStatisticsQuery,
    ) -> Result<CompanyStatisticsResponse, ApiError> {
        check_industry(query.industry.as_deref())?;
        self.get(
            ApiRequest::new(
                "company-statistics",
                "api/statistics/companies",
                "Failed to fetch company statistics",
            )
            .params(query.params())
            .stale_for(self.stale.default),
        )
        .await
    }

    async fn trends(&self, query: &TrendsQuery) -> Result<TrendsResponse, ApiError> {
        check_industry(query.industry.as_deref())?;
        self.get(
            ApiRequest::new("trends", "api/statistics/trends", "Failed to fetch trend data")
                .params(query.params())
                .stale_for(self.stale.default),
        )
        .await
    }

    async fn search(&self, query: &str, limit: u32) -> Result<SearchResponse, ApiError> {
        check_search_query(query)?;
        self.get(
            ApiRequest::new("search", "api/search", "Failed to search")
                .params(vec![
                    ("q", query.trim().to_string()),
                    ("limit", limit.to_string()),
                ])
                .stale_for(self.stale.default),
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::FlowDirection;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const INDUSTRIES_BODY: &str = r#"{
        "success": true,
        "data": {
            "industries": [{
                "id": "semiconductor", "name": "반도체", "nameEn": "Semiconductor",
                "icon": "🔌", "categoryCount": 3, "sectorCount": 12, "companyCount": 48,
                "totalMarketCap": 8.2e12, "marketCapChange": 1.4
            }],
            "lastUpdated": "2024-06-01"
        }
    }"#;

    fn client_for(server: &MockServer) -> HttpDashboardClient {
        HttpDashboardClient::new(
            &server.uri(),
            Arc::new(ResponseCache::new()),
            StaleTimes::default(),
        )
        .unwrap()
    }

    async fn mount(server: &MockServer, url_path: &str, status: u16, body: &str) {
        Mock::given(method("GET"))
            .and(path(url_path))
            .respond_with(ResponseTemplate::new(status).set_body_string(body))
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn test_successful_industries_fetch() {
        let server = MockServer::start().await;
        mount(&server, "/api/industries", 200, INDUSTRIES_BODY).await;

        let result = client_for(&server).industries().await.unwrap();
        assert_eq!(result.industries.len(), 1);
        assert_eq!(result.industries[0].id, "semiconductor");
        assert_eq!(result.industries[0].company_count, 48);
        assert_eq!(result.last_updated.as_deref(), Some("2024-06-01"));
    }

    #[tokio::test]
    async fn test_envelope_failure_surfaces_server_message() {
        let server = MockServer::start().await;
        mount(&server, "/api/industries", 200, r#"{"success": false, "error": "x"}"#).await;

        let err = client_for(&server).industries().await.unwrap_err();
        assert!(matches!(&err, ApiError::Envelope(m) if m == "x"));
    }

    #[tokio::test]
    async fn test_statistics_envelope_failure_uses_operation_message() {
        let server = MockServer::start().await;
        mount(&server, "/api/statistics/money-flow", 200, r#"{"success": false}"#).await;
        mount(&server, "/api/industries", 200, r#"{"success": false}"#).await;

        let client = client_for(&server);
        let err = client.money_flow(&MoneyFlowQuery::default()).await.unwrap_err();
        assert!(matches!(&err, ApiError::Envelope(m) if m == "Failed to fetch money flow data"));

        let err = client.industries().await.unwrap_err();
        assert_eq!(err.to_string(), UNKNOWN_ERROR);
    }

    #[tokio::test]
    async fn test_success_without_data_is_missing_data() {
        let server = MockServer::start().await;
        mount(&server, "/api/industries", 200, r#"{"success": true}"#).await;

        let err = client_for(&server).industries().await.unwrap_err();
        assert!(matches!(err, ApiError::MissingData));
    }

    #[tokio::test]
    async fn test_http_error_with_envelope_body() {
        let server = MockServer::start().await;
        mount(
            &server,
            "/api/company/ZZZZ",
            404,
            r#"{"success": false, "error": "Company not found"}"#,
        )
        .await;

        let err = client_for(&server).company("ZZZZ").await.unwrap_err();
        assert_eq!(err.to_string(), "Company not found (HTTP 404)");
    }

    #[tokio::test]
    async fn test_http_error_without_body_uses_fallback() {
        let server = MockServer::start().await;
        mount(&server, "/api/statistics/sector-trend", 500, "").await;

        let err = client_for(&server).sector_trend(None).await.unwrap_err();
        assert!(matches!(
            &err,
            ApiError::Status { status: 500, message } if message == "Failed to fetch sector trend data"
        ));
    }

    #[tokio::test]
    async fn test_malformed_body_is_decode_error() {
        let server = MockServer::start().await;
        mount(&server, "/api/industries", 200, "<html>oops</html>").await;

        let err = client_for(&server).industries().await.unwrap_err();
        assert!(matches!(err, ApiError::Decode(_)));
    }

    #[tokio::test]
    async fn test_transport_failure() {
        let client = HttpDashboardClient::new(
            "http://127.0.0.1:1",
            Arc::new(ResponseCache::new()),
            StaleTimes::default(),
        )
        .unwrap();
        let err = client.industries().await.unwrap_err();
        assert!(matches!(err, ApiError::Transport(_)));
    }

    #[tokio::test]
    async fn test_cached_within_stale_window() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/industries"))
            .respond_with(ResponseTemplate::new(200).set_body_string(INDUSTRIES_BODY))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server);
        let first = client.industries().await.unwrap();
        let second = client.industries().await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_company_is_always_refetched() {
        let server = MockServer::start().await;
        let body = r#"{
            "success": true,
            "data": {
                "company": {"ticker": "005930.KS", "name": "Samsung Electronics", "nameKo": "삼성전자", "logoUrl": null},
                "profile": null,
                "snapshot": {
                    "marketCap": 4.35e14, "price": 73000, "priceChange": -0.5,
                    "week52High": 88000, "week52Low": 65000, "volume": 12000000,
                    "peRatio": 14.2, "pegRatio": null
                },
                "history": [{"date": "2024-05-31", "price": 73500, "volume": 11000000}],
                "score": null,
                "sectors": [{"sector": {"id": "memory", "name": "메모리", "nameEn": "Memory"}, "rank": 1}]
            }
        }"#;
        Mock::given(method("GET"))
            .and(path("/api/company/005930.KS"))
            .respond_with(ResponseTemplate::new(200).set_body_string(body))
            .expect(2)
            .mount(&server)
            .await;

        let client = client_for(&server);
        let detail = client.company("005930.KS").await.unwrap();
        assert_eq!(detail.company.display_name(), "삼성전자");
        assert_eq!(detail.sectors[0].rank, 1);
        client.company("005930.KS").await.unwrap();
    }

    #[tokio::test]
    async fn test_errors_are_not_cached() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/industries"))
            .respond_with(ResponseTemplate::new(503))
            .expect(2)
            .mount(&server)
            .await;

        let client = client_for(&server);
        assert!(client.industries().await.is_err());
        assert!(client.industries().await.is_err());
    }

    #[tokio::test]
    async fn test_ticker_path_segment_is_encoded() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/company/BRK%2FB"))
            .respond_with(
                ResponseTemplate::new(404)
                    .set_body_string(r#"{"success": false, "error": "Company not found"}"#),
            )
            .expect(1)
            .mount(&server)
            .await;

        let err = client_for(&server).company("BRK/B").await.unwrap_err();
        assert_eq!(err.user_message(), "Company not found");
    }

    #[tokio::test]
    async fn test_map_sends_date_and_industry() {
        let server = MockServer::start().await;
        let body = r#"{
            "success": true,
            "data": {
                "categories": [], "sectors": [], "sectorCompanies": [],
                "lastUpdated": "2024-05-31", "selectedDate": "2024-05-31",
                "availableDates": ["2024-05-30", "2024-05-31"], "isHistorical": true
            }
        }"#;
        Mock::given(method("GET"))
            .and(path("/api/map"))
            .and(query_param("date", "2024-05-31"))
            .and(query_param("industry", "semiconductor"))
            .respond_with(ResponseTemplate::new(200).set_body_string(body))
            .expect(1)
            .mount(&server)
            .await;

        let query = MapQuery {
            date: Some("2024-05-31".to_string()),
            industry: Some("semiconductor".to_string()),
        };
        let map = client_for(&server).map(&query).await.unwrap();
        assert!(map.is_historical);
        assert_eq!(map.available_dates.len(), 2);
    }

    #[tokio::test]
    async fn test_invalid_industry_never_hits_network() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let client = client_for(&server);
        let query = MoneyFlowQuery {
            industry: Some("Tech Sector".to_string()),
            ..MoneyFlowQuery::default()
        };
        assert!(matches!(
            client.money_flow(&query).await,
            Err(ApiError::InvalidInput(_))
        ));
        assert!(matches!(
            client.search("   ", 10).await,
            Err(ApiError::InvalidInput(_))
        ));
        assert!(matches!(
            client.company("").await,
            Err(ApiError::InvalidInput(_))
        ));
    }

    #[tokio::test]
    async fn test_money_flow_params_and_decode() {
        let server = MockServer::start().await;
        let body = r#"{
            "success": true,
            "data": {
                "period": 7, "date": "2024-05-31",
                "flows": [{
                    "id": "hbm", "name": "HBM", "nameEn": null, "mfi": 61.5,
                    "flowDirection": "in", "flowAmount": 1.2e10, "flowPercent": 3.4,
                    "startMarketCap": 3.5e11, "endMarketCap": 3.62e11, "companyCount": 4,
                    "trend": [{"date": "2024-05-31", "mfi": null, "flowAmount": 1e9, "marketCap": 3.62e11}]
                }],
                "totalInflow": 1.2e10, "totalOutflow": 0, "netFlow": 1.2e10,
                "dateRange": {"start": "2024-05-24", "end": "2024-05-31"}
            }
        }"#;
        Mock::given(method("GET"))
            .and(path("/api/statistics/money-flow"))
            .and(query_param("period", "7"))
            .and(query_param("limit", "6"))
            .respond_with(ResponseTemplate::new(200).set_body_string(body))
            .mount(&server)
            .await;

        let query = MoneyFlowQuery {
            period: 7,
            ..MoneyFlowQuery::default()
        };
        let flow = client_for(&server).money_flow(&query).await.unwrap();
        assert_eq!(flow.flows[0].flow_direction, FlowDirection::In);
        assert_eq!(flow.flows[0].trend[0].mfi, None);
        assert_eq!(flow.date_range.start, "2024-05-24");
    }

    #[tokio::test]
    async fn test_sector_companies_path() {
        let server = MockServer::start().await;
        let body = r#"{
            "success": true,
            "data": {
                "sectorId": "hbm", "sectorName": "HBM", "period": 14,
                "dateRange": {"start": "2024-05-17", "end": "2024-05-31"},
                "companies": []
            }
        }"#;
        Mock::given(method("GET"))
            .and(path("/api/statistics/money-flow/hbm/companies"))
            .and(query_param("period", "14"))
            .respond_with(ResponseTemplate::new(200).set_body_string(body))
            .expect(1)
            .mount(&server)
            .await;

        let result = client_for(&server).sector_companies("hbm", 14).await.unwrap();
        assert_eq!(result.sector_name, "HBM");
    }

    #[tokio::test]
    async fn test_different_params_use_different_cache_entries() {
        let server = MockServer::start().await;
        let body = r#"{"success": true, "data": {"results": [], "query": "q", "total": 0}}"#;
        Mock::given(method("GET"))
            .and(path("/api/search"))
            .respond_with(ResponseTemplate::new(200).set_body_string(body))
            .expect(2)
            .mount(&server)
            .await;

        let client = client_for(&server);
        client.search("samsung", 10).await.unwrap();
        client.search("samsung", 10).await.unwrap();
        client.search("hynix", 10).await.unwrap();
    }
}
