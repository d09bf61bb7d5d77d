//! Web content source: fetches a project page and reduces it to plain text.
//!
//! This is the primary-content collaborator for the explain flow. It makes a
//! single attempt; callers turn failures into `PrimaryContent::Unavailable`.

use async_trait::async_trait;
use reqwest::{Client, Url};
use scraper::{Html, Selector};
use thiserror::Error;
use tracing::{debug, warn};

const USER_AGENT: &str = "Mozilla/5.0 (compatible; Googlebot/2.1; +http://www.google.com/bot.html)";
const FETCH_TIMEOUT_SECS: u64 = 20;
/// Cap on text handed to the model.
pub const MAX_CONTENT_CHARS: usize = 15_000;
const TRUNCATION_MARKER: &str = "... (content truncated)";
const SKIPPED_ELEMENTS: &[&str] = &["script", "style", "noscript", "template"];

#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("invalid URL '{0}'")]
    InvalidUrl(String),

    #[error("failed to fetch the page: {0}")]
    Http(#[from] reqwest::Error),

    #[error("failed to fetch the page, status {0}")]
    Status(u16),

    #[error("could not find a body element on the page")]
    NoBody,

    #[error("could not parse the page: {0}")]
    Parse(String),
}

#[async_trait]
pub trait ContentSource: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<String, ScrapeError>;
}

/// `ContentSource` over plain HTTP GET.
#[derive(Clone)]
pub struct WebScraper {
    client: Client,
}

impl WebScraper {
    pub fn new() -> Result<Self, ScrapeError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(std::time::Duration::from_secs(FETCH_TIMEOUT_SECS))
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl ContentSource for WebScraper {
    async fn fetch(&self, url: &str) -> Result<String, ScrapeError> {
        let parsed = Url::parse(url).map_err(|_| ScrapeError::InvalidUrl(url.to_string()))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ScrapeError::InvalidUrl(url.to_string()));
        }

        let response = self.client.get(parsed).send().await.map_err(|e| {
            warn!("Error fetching {url}: {e}");
            ScrapeError::Http(e)
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ScrapeError::Status(status.as_u16()));
        }

        let html = response.text().await?;
        let text = extract_body_text(&html)?;
        debug!("Fetched {} chars of text from {url}", text.chars().count());
        Ok(text)
    }
}

/// Text content of `<body>` without script/style content, whitespace
/// collapsed and capped at `MAX_CONTENT_CHARS`.
pub fn extract_body_text(html: &str) -> Result<String, ScrapeError> {
    let document = Html::parse_document(html);
    let body_selector = Selector::parse("body").map_err(|e| ScrapeError::Parse(e.to_string()))?;
    let body = document
        .select(&body_selector)
        .next()
        .ok_or(ScrapeError::NoBody)?;

    let mut raw = String::new();
    for node in body.descendants() {
        let Some(text) = node.value().as_text() else {
            continue;
        };
        let hidden = node.ancestors().any(|ancestor| {
            ancestor
                .value()
                .as_element()
                .is_some_and(|el| SKIPPED_ELEMENTS.contains(&el.name()))
        });
        if !hidden {
            raw.push_str(text);
            raw.push(' ');
        }
    }

    let collapsed = raw.split_whitespace().collect::<Vec<_>>().join(" ");
    Ok(truncate_chars(collapsed, MAX_CONTENT_CHARS))
}

fn truncate_chars(text: String, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}{TRUNCATION_MARKER}", &text[..cut]),
        None => text,
    }
}
