//! Currency normalization for exchange-qualified tickers.
//!
//! Several endpoints serve market caps in each listing's home currency. The home
//! currency is derived from the ticker suffix (`005930.KS` is KRW) and values
//! are normalized to USD with a static rate table.

use std::collections::HashMap;
use std::sync::LazyLock;
use tracing::debug;

pub const REFERENCE_CURRENCY: &str = "USD";

/// Units of each currency per USD, and the env var that overrides it.
const DEFAULT_RATES: &[(&str, &str, f64)] = &[
    ("KRW", "KRW_USD_RATE", 1450.0),
    ("JPY", "JPY_USD_RATE", 150.0),
    ("TWD", "TWD_USD_RATE", 32.0),
    ("HKD", "HKD_USD_RATE", 7.8),
];

const TICKER_SUFFIX_CURRENCY: &[(&str, &str)] = &[
    (".KS", "KRW"),
    (".KQ", "KRW"),
    (".T", "JPY"),
    (".TW", "TWD"),
    (".HK", "HKD"),
];

static ENV_TABLE: LazyLock<CurrencyTable> = LazyLock::new(CurrencyTable::from_env);

#[derive(Debug, Clone)]
pub struct CurrencyTable {
    rates: HashMap<String, f64>,
    suffixes: Vec<(String, String)>,
}

impl Default for CurrencyTable {
    fn default() -> Self {
        Self::with_lookup(|_| None)
    }
}

impl CurrencyTable {
    /// Built-in rates, each overridable by its `*_USD_RATE` env var.
    pub fn from_env() -> Self {
        Self::with_lookup(|name| std::env::var(name).ok())
    }

    /// Builds the table, resolving overrides through `lookup` (env var name -> raw value).
    pub fn with_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let rates = DEFAULT_RATES
            .iter()
            .map(|(currency, var, default)| {
                let rate = lookup(var)
                    .as_deref()
                    .and_then(parse_rate)
                    .unwrap_or(*default);
                (currency.to_string(), rate)
            })
            .collect();

        let suffixes = TICKER_SUFFIX_CURRENCY
            .iter()
            .map(|(suffix, currency)| (suffix.to_string(), currency.to_string()))
            .collect();

        Self { rates, suffixes }
    }

    /// Applies config-file overrides. Invalid or unknown entries are skipped.
    pub fn with_overrides(mut self, overrides: &HashMap<String, f64>) -> Self {
        for (currency, rate) in overrides {
            let currency = currency.to_uppercase();
            if !self.rates.contains_key(&currency) {
                debug!("Ignoring rate override for unknown currency {currency}");
                continue;
            }
            if rate.is_finite() && *rate > 0.0 {
                self.rates.insert(currency, *rate);
            } else {
                debug!("Ignoring invalid rate override {rate} for {currency}");
            }
        }
        self
    }

    /// Home currency of a ticker, or `None` if it carries no known suffix.
    ///
    /// When several suffixes match, the longest one wins.
    pub fn currency_for(&self, ticker: &str) -> Option<&str> {
        self.suffixes
            .iter()
            .filter(|(suffix, _)| ticker.ends_with(suffix.as_str()))
            .max_by_key(|(suffix, _)| suffix.len())
            .map(|(_, currency)| currency.as_str())
    }

    pub fn rate(&self, currency: &str) -> Option<f64> {
        if currency == REFERENCE_CURRENCY {
            return Some(1.0);
        }
        self.rates.get(currency).copied()
    }

    /// Units of the ticker's home currency per USD. Unsuffixed tickers are USD.
    pub fn rate_for(&self, ticker: &str) -> f64 {
        self.currency_for(ticker)
            .and_then(|currency| self.rate(currency))
            .unwrap_or(1.0)
    }

    pub fn to_usd(&self, value: f64, ticker: &str) -> f64 {
        value / self.rate_for(ticker)
    }
}

fn parse_rate(raw: &str) -> Option<f64> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|rate| rate.is_finite() && *rate > 0.0)
}

/// Converts `value` to USD using the process-wide table built from the environment.
pub fn to_usd(value: f64, ticker: &str) -> f64 {
    ENV_TABLE.to_usd(value, ticker)
}
