//! Runtime configuration loaded from a JSON file

use crate::error::Result as SearchResult;
use crate::models::{Point, UnitSystem};
use crate::search::{Column, Filter, Order, Origin, RangeInput, SearchRequest, Sorting};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variable naming the config file
pub const CONFIG_ENV: &str = "CACHE_SEARCH_CONFIG";
pub const DEFAULT_CONFIG_FILE: &str = "cache-search.json";

/// Settings for the HTTP page source
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScraperConfig {
    pub base_url: String,
    pub user_agent: String,
    pub timeout_secs: u64,
    /// Results requested per page
    pub page_size: usize,
    /// Raw `Cookie` header of an authenticated session
    pub session_cookie: Option<String>,
}

impl ScraperConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            base_url: "https://www.geocaching.com".to_string(),
            user_agent: "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36".to_string(),
            timeout_secs: 30,
            page_size: 50,
            session_cookie: None,
        }
    }
}

/// Difficulty/terrain as written in the config file: `2.5`, `[1, 3]` or `"1-3"`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum RatingSpec {
    Number(f64),
    Pair([f64; 2]),
    Text(String),
}

impl RatingSpec {
    fn to_input(&self) -> SearchResult<RangeInput> {
        match self {
            RatingSpec::Number(value) => Ok(RangeInput::Scalar(*value)),
            RatingSpec::Pair([a, b]) => Ok(RangeInput::Pair(*a, *b)),
            RatingSpec::Text(text) => text.parse(),
        }
    }
}

/// Search request as described in the config file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchSpec {
    /// `[latitude, longitude]`
    pub center: Option<(f64, f64)>,
    pub radius: Option<i64>,
    pub unit: UnitSystem,
    pub sort: Option<Column>,
    pub order: Order,
    pub limit: Option<usize>,
    pub enabled: Option<bool>,
    pub found: Option<bool>,
    pub personal_note: Option<bool>,
    pub corrected_coordinates: Option<bool>,
    pub premium: Option<bool>,
    pub owner: Option<bool>,
    pub terrain: Option<RatingSpec>,
    pub difficulty: Option<RatingSpec>,
    pub favorite_points: Option<u32>,
    pub keyword: Option<String>,
    pub hidden_by: Option<String>,
}

impl SearchSpec {
    /// Validate every field and assemble the request
    pub fn to_request(&self) -> SearchResult<SearchRequest> {
        let point = self.center.map(Point::try_from).transpose()?;
        let origin = Origin::new(point, self.radius, self.unit)?;
        let sorting = Sorting::new(self.sort, self.order);

        let mut filter = Filter::new();
        filter.set_enabled(self.enabled);
        filter.set_found(self.found);
        filter.set_personal_note(self.personal_note);
        filter.set_corrected_coordinates(self.corrected_coordinates);
        filter.set_premium(self.premium);
        filter.set_owner(self.owner);
        filter.set_terrain(self.terrain.as_ref().map(RatingSpec::to_input).transpose()?)?;
        filter.set_difficulty(
            self.difficulty
                .as_ref()
                .map(RatingSpec::to_input)
                .transpose()?,
        )?;
        filter.set_favorite_points(self.favorite_points)?;
        filter.set_keyword(self.keyword.as_deref())?;
        filter.set_hidden_by(self.hidden_by.as_deref())?;

        Ok(SearchRequest::new(origin, sorting, filter).with_limit(self.limit))
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub scraper: ScraperConfig,
    pub search: SearchSpec,
}

impl Config {
    /// Load from `path`, falling back to defaults when the file does not exist
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;

        let config = serde_json::from_str(&content).context("Failed to parse config file")?;

        Ok(config)
    }

    /// Load from the file named by `CACHE_SEARCH_CONFIG`, or `cache-search.json`
    pub fn from_env() -> Result<Self> {
        let path = std::env::var(CONFIG_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_FILE));
        Self::load(&path)
    }
}
