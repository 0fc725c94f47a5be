//! Shareable page links and social share intents.

use reqwest::Url;
use serde::{Deserialize, Serialize};

pub const DEFAULT_SITE_URL: &str = "https://sectorking.co.kr";

/// A permanent path redirect kept for legacy links.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Redirect {
    pub from: String,
    pub to: String,
}

/// Target of the first redirect whose `from` equals `path`.
pub fn resolve_redirect<'a>(redirects: &'a [Redirect], path: &str) -> Option<&'a str> {
    redirects
        .iter()
        .find(|r| r.from == path)
        .map(|r| r.to.as_str())
}

pub fn share_url(base_url: &str, pathname: &str) -> String {
    let base = base_url.trim_end_matches('/');
    if pathname.starts_with('/') {
        format!("{base}{pathname}")
    } else {
        format!("{base}/{pathname}")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SharePlatform {
    Twitter,
    Facebook,
    LinkedIn,
    Kakao,
}

impl SharePlatform {
    pub const ALL: [SharePlatform; 4] = [
        SharePlatform::Twitter,
        SharePlatform::Facebook,
        SharePlatform::LinkedIn,
        SharePlatform::Kakao,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            SharePlatform::Twitter => "Twitter",
            SharePlatform::Facebook => "Facebook",
            SharePlatform::LinkedIn => "LinkedIn",
            SharePlatform::Kakao => "Kakao",
        }
    }

    /// Share intent URL for `url`. `title` and `description` are only used
    /// by platforms that accept text.
    pub fn intent_url(&self, url: &str, title: &str, description: &str) -> String {
        let (endpoint, params): (&str, Vec<(&str, String)>) = match self {
            SharePlatform::Twitter => (
                "https://twitter.com/intent/tweet",
                vec![
                    ("url", url.to_string()),
                    ("text", format!("{title} - {description}")),
                ],
            ),
            SharePlatform::Facebook => (
                "https://www.facebook.com/sharer/sharer.php",
                vec![("u", url.to_string())],
            ),
            SharePlatform::LinkedIn => (
                "https://www.linkedin.com/sharing/share-offsite/",
                vec![("url", url.to_string())],
            ),
            SharePlatform::Kakao => (
                "https://sharer.kakao.com/talk/friends/picker/link",
                vec![("url", url.to_string()), ("title", title.to_string())],
            ),
        };
        match Url::parse_with_params(endpoint, &params) {
            Ok(intent) => intent.to_string(),
            Err(_) => endpoint.to_string(),
        }
    }
}
