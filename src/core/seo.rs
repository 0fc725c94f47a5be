//! Page titles, sitemap and structured data for the public site.

use crate::core::models::IndustryOverview;
use chrono::{DateTime, Utc};
use serde_json::{Value, json};

pub const SITE_NAME: &str = "Sector King";
const INDUSTRY_SUBPAGES: [&str; 3] = ["money-flow", "price-changes", "statistics"];

/// Icon and name of the industry with `industry_id`, or `None` if unknown.
pub fn industry_title(industries: &[IndustryOverview], industry_id: &str) -> Option<String> {
    let industry = industries.iter().find(|i| i.id == industry_id)?;
    Some(match industry.icon.as_deref() {
        Some(icon) if !icon.is_empty() => format!("{icon} {}", industry.name),
        _ => industry.name.clone(),
    })
}

#[derive(Debug, Clone, PartialEq)]
pub struct PageMeta {
    pub title: String,
    pub description: String,
    pub canonical_url: String,
}

pub fn industry_page_meta(base_url: &str, industry: &IndustryOverview) -> PageMeta {
    let icon = industry.icon.as_deref().unwrap_or_default();
    let title = format!("{icon} {} 패권 지도", industry.name).trim().to_string();
    PageMeta {
        title,
        description: format!(
            "{} 산업 섹터별 시장 지배력 순위 시각화 - 시가총액 분석, 자금 흐름, 가격 변화율 추적",
            industry.name
        ),
        canonical_url: format!("{}/{}", base_url.trim_end_matches('/'), industry.id),
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SitemapEntry {
    pub url: String,
    pub last_modified: DateTime<Utc>,
    pub change_frequency: &'static str,
    pub priority: f32,
}

/// Home page plus the dashboard, money-flow, price-changes and statistics
/// pages of every industry.
pub fn sitemap_entries(
    base_url: &str,
    industries: &[IndustryOverview],
    now: DateTime<Utc>,
) -> Vec<SitemapEntry> {
    let base = base_url.trim_end_matches('/');
    let entry = |url: String, priority: f32| SitemapEntry {
        url,
        last_modified: now,
        change_frequency: "daily",
        priority,
    };

    let mut entries = vec![entry(base.to_string(), 1.0)];
    for industry in industries {
        entries.push(entry(format!("{base}/{}", industry.id), 0.9));
        for page in INDUSTRY_SUBPAGES {
            entries.push(entry(format!("{base}/{}/{page}", industry.id), 0.8));
        }
    }
    entries
}

pub fn render_sitemap_xml(entries: &[SitemapEntry]) -> String {
    let mut xml = String::from(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<urlset xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\">\n",
    );
    for entry in entries {
        xml.push_str(&format!(
            "<url>\n<loc>{}</loc>\n<lastmod>{}</lastmod>\n<changefreq>{}</changefreq>\n<priority>{:.1}</priority>\n</url>\n",
            escape_xml(&entry.url),
            entry.last_modified.to_rfc3339(),
            entry.change_frequency,
            entry.priority
        ));
    }
    xml.push_str("</urlset>\n");
    xml
}

/// schema.org `WebSite` block with a site search action.
pub fn website_json_ld(base_url: &str) -> Value {
    let base = base_url.trim_end_matches('/');
    json!({
        "@context": "https://schema.org",
        "@type": "WebSite",
        "name": SITE_NAME,
        "alternateName": "섹터킹",
        "url": base,
        "description": "산업별 섹터 시장 지배력 순위 시각화 - 주식 투자, 섹터 자금 흐름, 시가총액 분석, 가격 변화율 추적",
        "potentialAction": {
            "@type": "SearchAction",
            "target": {
                "@type": "EntryPoint",
                "urlTemplate": format!("{base}?q={{search_term_string}}"),
            },
            "query-input": "required name=search_term_string",
        },
    })
}

fn escape_xml(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
