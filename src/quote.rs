use std::time::Duration;

use reqwest::{blocking::Client, header::ACCEPT, StatusCode};
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, warn};

/// Text used whenever no quote could be obtained
pub const DEFAULT_TEXT: &str = "The quick brown fox jumps over the lazy dog.";

pub const DEFAULT_QUOTE_URL: &str = "https://quoteslate.vercel.app/api/quotes/random";

const USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/130.0.0.0 Safari/537.36";

#[derive(Debug, Error)]
pub enum QuoteError {
    #[error("quote request failed: {0}")]
    Network(#[from] reqwest::Error),
    #[error("quote service answered {0}")]
    NonSuccessStatus(StatusCode),
    #[error("malformed quote payload: {0}")]
    MalformedPayload(#[from] serde_json::Error),
    #[error("quote payload has no quote text")]
    EmptyQuote,
}

/// Source of reference texts
pub trait QuoteProvider: Send + Sync {
    fn fetch_quote(&self) -> Result<String, QuoteError>;
}

#[derive(Debug, Deserialize)]
struct QuotePayload {
    quote: Option<String>,
}

fn parse_quote(body: &str) -> Result<String, QuoteError> {
    let payload: QuotePayload = serde_json::from_str(body)?;
    payload
        .quote
        .filter(|q| !q.is_empty())
        .ok_or(QuoteError::EmptyQuote)
}

/// Fetches a random quote over HTTP
#[derive(Debug, Clone)]
pub struct HttpQuoteProvider {
    client: Client,
    url: String,
}

impl HttpQuoteProvider {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, QuoteError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl QuoteProvider for HttpQuoteProvider {
    fn fetch_quote(&self) -> Result<String, QuoteError> {
        debug!(url = %self.url, "fetching quote");
        let response = self.client.get(&self.url).header(ACCEPT, "*/*").send()?;

        let status = response.status();
        if !status.is_success() {
            return Err(QuoteError::NonSuccessStatus(status));
        }

        parse_quote(&response.text()?)
    }
}

/// Always serves the same text
#[derive(Debug, Clone)]
pub struct StaticQuoteProvider {
    text: String,
}

impl StaticQuoteProvider {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

impl QuoteProvider for StaticQuoteProvider {
    fn fetch_quote(&self) -> Result<String, QuoteError> {
        if self.text.is_empty() {
            return Err(QuoteError::EmptyQuote);
        }
        Ok(self.text.clone())
    }
}

/// Fetch a quote, substituting [`DEFAULT_TEXT`] on any failure
pub fn fetch_reference_text(provider: &dyn QuoteProvider) -> String {
    match provider.fetch_quote() {
        Ok(text) => text,
        Err(err) => {
            warn!(error = %err, "falling back to default text");
            DEFAULT_TEXT.to_string()
        }
    }
}
