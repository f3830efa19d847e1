use crate::config::ScraperConfig;
use crate::models::Cache;
use crate::params::ParameterBag;
use crate::scrapers::traits::PageSource;
use crate::scrapers::types::{Page, PageCursor};
use anyhow::{anyhow, Context, Result};
use chrono::Utc;
use reqwest::blocking::{Client, Request};
use reqwest::header::{HeaderMap, HeaderValue, COOKIE};
use scraper::{ElementRef, Html, Selector};
use serde::Deserialize;
use tracing::{debug, info, warn};

const MORE_RESULTS_PATH: &str = "play/search/more-results";

/// JSON envelope returned by the "more results" endpoint
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct MoreResults {
    html_string: String,
    show_load_more: Option<bool>,
}

/// Page source backed by the geocaching.com search endpoint
pub struct GeocachingScraper {
    client: Client,
    config: ScraperConfig,
}

impl GeocachingScraper {
    /// Create a scraper with default settings (anonymous session)
    pub fn new() -> Result<Self> {
        Self::with_config(ScraperConfig::default())
    }

    pub fn with_config(config: ScraperConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        if let Some(cookie) = &config.session_cookie {
            let value = HeaderValue::from_str(cookie).context("Invalid session cookie")?;
            headers.insert(COOKIE, value);
        }

        let client = Client::builder()
            .timeout(config.timeout())
            .user_agent(config.user_agent.as_str())
            .default_headers(headers)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { client, config })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/{}",
            self.config.base_url.trim_end_matches('/'),
            MORE_RESULTS_PATH
        )
    }

    /// Decode a "more results" response body into a page of caches
    pub fn parse_page(body: &str) -> Result<Page> {
        let envelope: MoreResults =
            serde_json::from_str(body).context("Failed to decode search response")?;

        let (items, rows) = parse_rows(&envelope.html_string)?;
        let has_more = envelope.show_load_more.unwrap_or(rows > 0);

        Ok(Page::with_consumed(items, rows, has_more))
    }

    fn build_request(&self, parameters: &ParameterBag, cursor: PageCursor) -> Result<Request> {
        self.client
            .get(self.endpoint())
            .query(parameters)
            .query(&[
                ("startIndex", cursor.start_index.to_string()),
                ("take", self.config.page_size.to_string()),
            ])
            .build()
            .context("Failed to build search request")
    }
}

fn selector(css: &'static str) -> Result<Selector> {
    Selector::parse(css).map_err(|err| anyhow!("Invalid selector '{}': {:?}", css, err))
}

/// Decoded caches plus the number of result rows seen
fn parse_rows(html: &str) -> Result<(Vec<Cache>, usize)> {
    // bare <tr> rows are dropped by the parser outside a table
    let fragment = if html.contains("<table") {
        Html::parse_fragment(html)
    } else {
        Html::parse_fragment(&format!("<table>{}</table>", html))
    };
    let row_selector = selector("tr[data-id]")?;
    let code_selector = selector(".cache-code")?;
    let name_selector = selector(".cache-name")?;
    let favorites_selector = selector("td[data-column='FavoritePoint']")?;
    let link_selector = selector("a[href]")?;

    let mut caches = Vec::new();
    let mut rows = 0;

    for (idx, row) in fragment.select(&row_selector).enumerate() {
        rows += 1;
        let wp = first_text(&row, &code_selector)
            .or_else(|| row.value().attr("data-code").map(str::to_string))
            .unwrap_or_default();

        if wp.is_empty() {
            debug!("Skipped result row {}: no waypoint code", idx);
            continue;
        }

        let name = row
            .value()
            .attr("data-name")
            .map(str::to_string)
            .or_else(|| first_text(&row, &name_selector))
            .unwrap_or_default();

        let favorites = first_text(&row, &favorites_selector)
            .map(|text| text.chars().filter(|c| c.is_ascii_digit()).collect::<String>())
            .and_then(|digits| digits.parse::<u32>().ok())
            .unwrap_or(0);

        let url = row
            .select(&link_selector)
            .next()
            .and_then(|link| link.value().attr("href"))
            .map(str::to_string);

        caches.push(Cache {
            wp,
            name,
            favorites,
            url,
            fetched_at: Utc::now(),
        });
    }

    Ok((caches, rows))
}

fn first_text(row: &ElementRef<'_>, selector: &Selector) -> Option<String> {
    row.select(selector)
        .next()
        .map(|el| el.text().collect::<String>().trim().to_string())
        .filter(|text| !text.is_empty())
}

impl PageSource for GeocachingScraper {
    fn fetch_page(&self, parameters: &ParameterBag, cursor: PageCursor) -> Result<Page> {
        let request = self.build_request(parameters, cursor)?;
        debug!("Fetching {}", request.url());

        let response = self
            .client
            .execute(request)
            .context("Failed to fetch search results")?;

        if !response.status().is_success() {
            warn!("Search endpoint returned status: {}", response.status());
            anyhow::bail!("Failed to fetch search results: {}", response.status());
        }

        let body = response.text().context("Failed to read response body")?;
        debug!("Downloaded {} bytes of search results", body.len());

        let page = Self::parse_page(&body)?;
        info!(
            "Fetched {} of {} rows starting at {}",
            page.items.len(),
            page.consumed,
            cursor.start_index
        );
        Ok(page)
    }

    fn source_name(&self) -> &'static str {
        "Geocaching"
    }
}
