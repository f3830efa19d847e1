use crate::error::{Result, SearchError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Geographic point in decimal degrees
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Point {
    pub latitude: f64,
    pub longitude: f64,
}

impl Point {
    pub fn new(latitude: f64, longitude: f64) -> Result<Self> {
        if latitude.is_nan() || longitude.is_nan() {
            return Err(SearchError::InvalidArgumentType(
                "coordinates must be numbers".to_string(),
            ));
        }
        if !(-90.0..=90.0).contains(&latitude) {
            return Err(SearchError::out_of_range("latitude", latitude, -90.0, 90.0));
        }
        if !(-180.0..=180.0).contains(&longitude) {
            return Err(SearchError::out_of_range("longitude", longitude, -180.0, 180.0));
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }

    /// Render as `"<lat>, <lon>"`, each coordinate with at least one decimal
    pub fn format_decimal(&self) -> String {
        format!("{}, {}", decimal(self.latitude), decimal(self.longitude))
    }
}

fn decimal(value: f64) -> String {
    let text = value.to_string();
    if text.contains('.') {
        text
    } else {
        format!("{}.0", text)
    }
}

impl TryFrom<(f64, f64)> for Point {
    type Error = SearchError;

    fn try_from((latitude, longitude): (f64, f64)) -> Result<Self> {
        Self::new(latitude, longitude)
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format_decimal())
    }
}

/// Unit system used for the search radius
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum UnitSystem {
    #[default]
    Metric,
    Imperial,
}

impl UnitSystem {
    pub fn suffix(&self) -> &'static str {
        match self {
            UnitSystem::Metric => "km",
            UnitSystem::Imperial => "mi",
        }
    }
}

/// A single geocache listing as returned by a search
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cache {
    /// Waypoint code, e.g. `GC5VJ0P`
    pub wp: String,
    pub name: String,
    pub favorites: u32,
    pub url: Option<String>,
    pub fetched_at: DateTime<Utc>,
}

impl Cache {
    pub fn new(wp: impl Into<String>, name: impl Into<String>, favorites: u32) -> Self {
        Self {
            wp: wp.into(),
            name: name.into(),
            favorites,
            url: None,
            fetched_at: Utc::now(),
        }
    }
}

impl fmt::Display for Cache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.wp)
    }
}
