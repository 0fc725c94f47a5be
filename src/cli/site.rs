use super::ui;
use crate::core::dashboard::DashboardApi;
use crate::core::models::IndustryOverview;
use crate::core::seo::{
    PageMeta, SITE_NAME, industry_page_meta, render_sitemap_xml, sitemap_entries,
    website_json_ld,
};
use crate::core::share::{Redirect, SharePlatform, resolve_redirect, share_url};
use crate::core::validate::validate_industry_id;
use anyhow::{Context, Result};
use chrono::Utc;
use comfy_table::{Cell, Table};
use std::path::Path;
use tracing::{debug, warn};

const SITE_DESCRIPTION: &str = "산업별 섹터 시장 지배력 순위 시각화";

/// Path after applying the configured legacy redirects.
fn canonical_path<'a>(redirects: &'a [Redirect], path: &'a str) -> &'a str {
    match resolve_redirect(redirects, path) {
        Some(target) => {
            debug!(from = path, to = target, "Applied redirect");
            target
        }
        None => path,
    }
}

/// Page metadata for `path`; industry pages are titled after their industry.
fn page_meta(site_url: &str, path: &str, industries: &[IndustryOverview]) -> PageMeta {
    let first_segment = path.trim_start_matches('/').split('/').next().unwrap_or("");
    let industry = validate_industry_id(first_segment)
        .then(|| industries.iter().find(|i| i.id == first_segment))
        .flatten();
    match industry {
        Some(industry) => industry_page_meta(site_url, industry),
        None => PageMeta {
            title: SITE_NAME.to_string(),
            description: SITE_DESCRIPTION.to_string(),
            canonical_url: share_url(site_url, path),
        },
    }
}

fn build_share_table(url: &str, meta: &PageMeta) -> Table {
    let mut table = ui::new_styled_table();
    table.set_header(vec![ui::header_cell("Platform"), ui::header_cell("Link")]);
    table.add_row(vec![Cell::new("Link"), Cell::new(url)]);
    for platform in SharePlatform::ALL {
        table.add_row(vec![
            Cell::new(platform.label()),
            Cell::new(platform.intent_url(url, &meta.title, &meta.description)),
        ]);
    }
    table
}

pub async fn run_share(
    api: &dyn DashboardApi,
    site_url: &str,
    redirects: &[Redirect],
    path: &str,
) -> Result<()> {
    let path = canonical_path(redirects, path);
    let industries = match api.industries().await {
        Ok(response) => response.industries,
        Err(e) => {
            warn!(error = %e, "Could not load industries for page title");
            Vec::new()
        }
    };

    let meta = page_meta(site_url, path, &industries);
    let url = share_url(site_url, path);
    ui::print_heading(&meta.title, Some(&meta.description));
    println!("{}", build_share_table(&url, &meta));
    Ok(())
}

pub async fn run_sitemap(
    api: &dyn DashboardApi,
    site_url: &str,
    output: Option<&Path>,
) -> Result<()> {
    let industries = api.industries().await?;
    let entries = sitemap_entries(site_url, &industries.industries, Utc::now());
    let xml = render_sitemap_xml(&entries);

    match output {
        Some(path) => {
            std::fs::write(path, &xml)
                .with_context(|| format!("Failed to write sitemap to {}", path.display()))?;
            tracing::info!(entries = entries.len(), "Wrote sitemap to {}", path.display());
        }
        None => print!("{xml}"),
    }
    Ok(())
}

pub fn run_json_ld(site_url: &str) -> Result<()> {
    let json = serde_json::to_string_pretty(&website_json_ld(site_url))
        .context("Failed to serialize JSON-LD")?;
    println!("{json}");
    Ok(())
}
