//! Display formatting for market figures. Missing values render as `N/A`.

use chrono::NaiveDate;

pub const NOT_AVAILABLE: &str = "N/A";

pub fn format_market_cap(value: Option<f64>) -> String {
    let Some(value) = value else {
        return NOT_AVAILABLE.to_string();
    };
    if value >= 1e12 {
        format!("${:.2}T", value / 1e12)
    } else if value >= 1e9 {
        format!("${:.2}B", value / 1e9)
    } else if value >= 1e6 {
        format!("${:.2}M", value / 1e6)
    } else {
        format!("${}", group_thousands(value))
    }
}

pub fn format_price(value: Option<f64>) -> String {
    value.map_or(NOT_AVAILABLE.to_string(), |v| format!("${v:.2}"))
}

pub fn format_price_change(value: Option<f64>) -> String {
    value.map_or(NOT_AVAILABLE.to_string(), |v| {
        let sign = if v >= 0.0 { "+" } else { "" };
        format!("{sign}{v:.2}%")
    })
}

pub fn format_volume(value: Option<f64>) -> String {
    let Some(value) = value else {
        return NOT_AVAILABLE.to_string();
    };
    if value == 0.0 {
        "0".to_string()
    } else if value >= 1e9 {
        format!("{:.2}B", value / 1e9)
    } else if value >= 1e6 {
        format!("{:.2}M", value / 1e6)
    } else if value >= 1e3 {
        format!("{:.2}K", value / 1e3)
    } else {
        group_thousands(value)
    }
}

pub fn format_number(value: Option<f64>) -> String {
    value.map_or(NOT_AVAILABLE.to_string(), group_thousands)
}

/// Formats a ratio (0.123) as a signed percentage with one decimal (+12.3%).
pub fn format_percent(value: Option<f64>) -> String {
    value.map_or(NOT_AVAILABLE.to_string(), |v| {
        let percent = v * 100.0;
        let sign = if percent >= 0.0 { "+" } else { "" };
        format!("{sign}{percent:.1}%")
    })
}

pub fn format_score(score: f64, max_score: f64) -> String {
    format!("{score:.1}/{max_score}")
}

pub fn format_recommendation(key: Option<&str>) -> String {
    match key {
        None | Some("") => NOT_AVAILABLE.to_string(),
        Some("strong_buy") => "적극 매수".to_string(),
        Some("buy") => "매수".to_string(),
        Some("hold") => "보유".to_string(),
        Some("underperform") => "비중 축소".to_string(),
        Some("sell") => "매도".to_string(),
        Some("none") => "없음".to_string(),
        Some(other) => other.to_string(),
    }
}

/// `2024-01-15` -> `2024. 01. 15.`; unparseable input is returned as is.
pub fn format_date(date: &str) -> String {
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map(|d| d.format("%Y. %m. %d.").to_string())
        .unwrap_or_else(|_| date.to_string())
}

/// Thousands-grouped number with at most three fraction digits.
fn group_thousands(value: f64) -> String {
    let formatted = format!("{:.3}", value.abs());
    let (int_part, frac_part) = formatted.split_once('.').unwrap_or((formatted.as_str(), ""));
    let frac_part = frac_part.trim_end_matches('0');

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if value < 0.0 && (int_part != "0" || !frac_part.is_empty()) {
        "-"
    } else {
        ""
    };
    if frac_part.is_empty() {
        format!("{sign}{grouped}")
    } else {
        format!("{sign}{grouped}.{frac_part}")
    }
}
