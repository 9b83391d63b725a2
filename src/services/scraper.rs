//! Vendor page scraper
//!
//! Fetches a product page by its product code and extracts the product name
//! and current price using the configured CSS selectors.

use async_trait::async_trait;
use regex::Regex;
use reqwest::{Client, header};
use scraper::{Html, Selector};
use tracing::{debug, info};
use url::Url;
use crate::config::ScraperConfig;
use crate::models::GoodInfo;
use crate::utils::errors::{PriceTrackerError, ScrapeError, Result};
use crate::utils::helpers::normalize_whitespace;

/// Digits with optional thousands separators; decimals and currency marks are ignored
const PRICE_PATTERN: &str = r"\d[\d,]*";

/// Source of the current name and price of a good
#[async_trait]
pub trait PriceSource: Send + Sync {
    async fn fetch_good(&self, good_id: &str) -> Result<GoodInfo>;
}

/// Extracts a [`GoodInfo`] from a product page
#[derive(Debug, Clone)]
pub struct GoodPageParser {
    name: Selector,
    name_source: String,
    single_price: Selector,
    single_price_source: String,
    two_price: Selector,
    two_price_source: String,
    price_pattern: Regex,
}

impl GoodPageParser {
    pub fn new(config: &ScraperConfig) -> Result<Self> {
        Ok(Self {
            name: parse_selector(&config.name_selector)?,
            name_source: config.name_selector.clone(),
            single_price: parse_selector(&config.single_price_selector)?,
            single_price_source: config.single_price_selector.clone(),
            two_price: parse_selector(&config.two_price_selector)?,
            two_price_source: config.two_price_selector.clone(),
            price_pattern: Regex::new(PRICE_PATTERN)
                .map_err(|e| PriceTrackerError::Config(format!("Invalid price pattern: {}", e)))?,
        })
    }

    /// Parse a product page.
    ///
    /// The single-price layout is tried first, then the two-price layout
    /// (list price plus sale price).
    pub fn parse(&self, good_id: &str, html: &str) -> std::result::Result<GoodInfo, ScrapeError> {
        let document = Html::parse_document(html);

        let name = select_text(&document, &self.name, &self.name_source)?;
        if name.is_empty() {
            return Err(ScrapeError::ElementNotFound { selector: self.name_source.clone() });
        }

        let price = select_text(&document, &self.single_price, &self.single_price_source)
            .and_then(|text| self.normalize_price(&text))
            .or_else(|_| {
                select_text(&document, &self.two_price, &self.two_price_source)
                    .and_then(|text| self.normalize_price(&text))
            })?;

        Ok(GoodInfo::new(good_id, name, price))
    }

    /// Turn price text such as `"$1,299"` or `" 12,990 元 "` into an integer
    pub fn normalize_price(&self, text: &str) -> std::result::Result<i64, ScrapeError> {
        let digits = self
            .price_pattern
            .find(text.trim())
            .map(|m| m.as_str().replace(',', ""))
            .ok_or_else(|| ScrapeError::InvalidPrice(text.to_string()))?;

        digits
            .parse::<i64>()
            .map_err(|_| ScrapeError::InvalidPrice(text.to_string()))
    }
}

fn parse_selector(selector: &str) -> std::result::Result<Selector, ScrapeError> {
    Selector::parse(selector).map_err(|e| ScrapeError::InvalidSelector(format!("{}: {:?}", selector, e)))
}

fn select_text(document: &Html, selector: &Selector, source: &str) -> std::result::Result<String, ScrapeError> {
    document
        .select(selector)
        .next()
        .map(|element| normalize_whitespace(&element.text().collect::<String>()))
        .ok_or_else(|| ScrapeError::ElementNotFound { selector: source.to_string() })
}

/// HTTP client for the vendor product page
#[derive(Debug, Clone)]
pub struct ScraperClient {
    client: Client,
    good_url: Url,
    parser: GoodPageParser,
}

impl ScraperClient {
    pub fn new(config: &ScraperConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(config.timeout())
            .build()?;

        Ok(Self {
            client,
            good_url: Url::parse(&config.good_url)?,
            parser: GoodPageParser::new(config)?,
        })
    }

    /// Product page URL for a product code
    pub fn good_url(&self, good_id: &str) -> Url {
        let mut url = self.good_url.clone();
        url.query_pairs_mut().append_pair("i_code", good_id);
        url
    }

    async fn fetch_page(&self, good_id: &str) -> Result<String> {
        let url = self.good_url(good_id);
        debug!(good_id = good_id, url = %url, "Fetching product page");

        let body = self
            .client
            .get(url)
            .header(header::ACCEPT, "text/html")
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        Ok(body)
    }
}

#[async_trait]
impl PriceSource for ScraperClient {
    async fn fetch_good(&self, good_id: &str) -> Result<GoodInfo> {
        let body = self.fetch_page(good_id).await?;
        let info = self.parser.parse(good_id, &body)?;
        info!(good_id = good_id, name = %info.name, price = info.price, "Scraped product page");
        Ok(info)
    }
}
