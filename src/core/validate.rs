use chrono::NaiveDate;

pub const MAX_INDUSTRY_ID_LEN: usize = 50;
pub const MAX_SEARCH_QUERY_LEN: usize = 100;

/// True iff `industry_id` is 1..=50 chars drawn from `[a-z0-9_-]`.
pub fn validate_industry_id(industry_id: &str) -> bool {
    !industry_id.is_empty()
        && industry_id.len() <= MAX_INDUSTRY_ID_LEN
        && industry_id
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_' || c == '-')
}

/// Strict `YYYY-MM-DD` that names a real calendar day.
pub fn validate_date(date: &str) -> bool {
    date.len() == 10 && NaiveDate::parse_from_str(date, "%Y-%m-%d").is_ok()
}

pub fn validate_search_query(query: &str) -> bool {
    let query = query.trim();
    !query.is_empty() && query.chars().count() <= MAX_SEARCH_QUERY_LEN
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_industry_ids() {
        assert!(validate_industry_id("tech-sector_1"));
        assert!(validate_industry_id("semiconductor"));
        assert!(validate_industry_id("a"));
        assert!(validate_industry_id(&"a".repeat(50)));
    }

    #[test]
    fn test_invalid_industry_ids() {
        assert!(!validate_industry_id(""));
        assert!(!validate_industry_id("Tech Sector"));
        assert!(!validate_industry_id("tech sector"));
        assert!(!validate_industry_id("Tech"));
        assert!(!validate_industry_id("tech/../etc"));
        assert!(!validate_industry_id("반도체"));
        assert!(!validate_industry_id(&"a".repeat(51)));
    }

    #[test]
    fn test_validate_date() {
        assert!(validate_date("2024-01-15"));
        assert!(validate_date("2024-02-29"));
        assert!(!validate_date("2024-02-30"));
        assert!(!validate_date("2024-1-5"));
        assert!(!validate_date("15-01-2024"));
        assert!(!validate_date(""));
    }

    #[test]
    fn test_validate_search_query() {
        assert!(validate_search_query("samsung"));
        assert!(validate_search_query("  삼성  "));
        assert!(!validate_search_query("   "));
        assert!(validate_search_query(&"x".repeat(100)));
        assert!(!validate_search_query(&"x".repeat(101)));
    }
}
