//! Search attribute filter and its wire encoding
//!
//! A [`Filter`] keeps the validated, typed value of every attribute. The wire
//! parameters are derived from those values each time [`Filter::parameters`]
//! is read, so the typed value is never an artifact of its encoding.

use crate::error::{Result, SearchError};
use crate::params::ParameterBag;
use std::fmt;
use std::str::FromStr;

pub const RATING_MIN: f64 = 1.0;
pub const RATING_MAX: f64 = 5.0;

/// Raw difficulty/terrain input before validation
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RangeInput {
    Scalar(f64),
    Pair(f64, f64),
}

impl From<f64> for RangeInput {
    fn from(value: f64) -> Self {
        RangeInput::Scalar(value)
    }
}

impl From<i32> for RangeInput {
    fn from(value: i32) -> Self {
        RangeInput::Scalar(value as f64)
    }
}

impl From<(f64, f64)> for RangeInput {
    fn from((a, b): (f64, f64)) -> Self {
        RangeInput::Pair(a, b)
    }
}

impl From<(i32, i32)> for RangeInput {
    fn from((a, b): (i32, i32)) -> Self {
        RangeInput::Pair(a as f64, b as f64)
    }
}

impl TryFrom<&[f64]> for RangeInput {
    type Error = SearchError;

    fn try_from(values: &[f64]) -> Result<Self> {
        match values {
            [a, b] => Ok(RangeInput::Pair(*a, *b)),
            _ => Err(SearchError::InvalidValue(format!(
                "a range needs exactly 2 values, got {}",
                values.len()
            ))),
        }
    }
}

/// Accepts `"2.5"`, `"1-5"` and `"1.5,3"`
impl FromStr for RangeInput {
    type Err = SearchError;

    fn from_str(text: &str) -> Result<Self> {
        let text = text.trim();
        let parts: Vec<&str> = if text.contains(',') {
            text.split(',').collect()
        } else {
            // a leading '-' belongs to the number, not the separator
            match text.char_indices().skip(1).find(|(_, c)| *c == '-') {
                Some((idx, _)) => vec![&text[..idx], &text[idx + 1..]],
                None => vec![text],
            }
        };

        let values = parts
            .iter()
            .map(|part| {
                part.trim().parse::<f64>().map_err(|_| {
                    SearchError::InvalidArgumentType(format!("'{}' is not a number", part.trim()))
                })
            })
            .collect::<Result<Vec<f64>>>()?;

        match values.as_slice() {
            [value] => Ok(RangeInput::Scalar(*value)),
            values => RangeInput::try_from(values),
        }
    }
}

/// Validated difficulty/terrain value, quantized to half steps
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Rating {
    Single(f64),
    /// Always `low < high`
    Span(f64, f64),
}

impl Rating {
    /// Quantize, bound-check and order `input`; `what` names the attribute in errors
    pub fn from_input(input: RangeInput, what: &str) -> Result<Self> {
        let (a, b) = match input {
            RangeInput::Scalar(value) => {
                let value = rating_endpoint(value, what)?;
                (value, value)
            }
            RangeInput::Pair(a, b) => (
                rating_endpoint(a, &format!("{} first endpoint", what))?,
                rating_endpoint(b, &format!("{} second endpoint", what))?,
            ),
        };

        let (low, high) = if a > b { (b, a) } else { (a, b) };
        if low == high {
            Ok(Rating::Single(low))
        } else {
            Ok(Rating::Span(low, high))
        }
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&encode_rating(self))
    }
}

/// Round down to the nearest half step
pub fn quantize(value: f64) -> f64 {
    (value * 2.0).floor() / 2.0
}

fn rating_endpoint(value: f64, what: &str) -> Result<f64> {
    if !value.is_finite() {
        return Err(SearchError::InvalidArgumentType(format!(
            "{} must be a finite number",
            what
        )));
    }
    let quantized = quantize(value);
    if !(RATING_MIN..=RATING_MAX).contains(&quantized) {
        return Err(SearchError::out_of_range(what, value, RATING_MIN, RATING_MAX));
    }
    Ok(quantized)
}

/// `2.0` -> `"2"`, `1.5` -> `"1.5"`, spans as `"<low>-<high>"`
pub fn encode_rating(rating: &Rating) -> String {
    match rating {
        Rating::Single(value) => half_step(*value),
        Rating::Span(low, high) => format!("{}-{}", half_step(*low), half_step(*high)),
    }
}

fn half_step(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{}", value as i64)
    } else {
        format!("{}", value)
    }
}

pub fn encode_toggle(value: bool) -> &'static str {
    if value {
        "1"
    } else {
        "2"
    }
}

/// Values accepted by the boolean toggles
pub trait Truthy {
    fn truthy(&self) -> bool;
}

impl Truthy for bool {
    fn truthy(&self) -> bool {
        *self
    }
}

macro_rules! truthy_numbers {
    ($($ty:ty),*) => {
        $(impl Truthy for $ty {
            fn truthy(&self) -> bool {
                *self != (0 as $ty)
            }
        })*
    };
}

truthy_numbers!(i8, i16, i32, i64, u8, u16, u32, u64, usize, f32, f64);

/// Search attributes; every attribute is optional and omitted when unset
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter {
    enabled: Option<bool>,
    found: Option<bool>,
    personal_note: Option<bool>,
    corrected_coordinates: Option<bool>,
    premium: Option<bool>,
    owner: Option<bool>,
    terrain: Option<Rating>,
    difficulty: Option<Rating>,
    favorite_points: Option<u32>,
    keyword: Option<String>,
    hidden_by: Option<String>,
    extra: ParameterBag,
}

macro_rules! toggle_accessors {
    ($($field:ident => $setter:ident),* $(,)?) => {
        $(
            pub fn $field(&self) -> Option<bool> {
                self.$field
            }

            pub fn $setter<T: Truthy>(&mut self, value: Option<T>) {
                self.$field = value.map(|value| value.truthy());
            }
        )*
    };
}

impl Filter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn builder() -> FilterBuilder {
        FilterBuilder::default()
    }

    toggle_accessors! {
        enabled => set_enabled,
        found => set_found,
        personal_note => set_personal_note,
        corrected_coordinates => set_corrected_coordinates,
        premium => set_premium,
        owner => set_owner,
    }

    pub fn terrain(&self) -> Option<Rating> {
        self.terrain
    }

    pub fn set_terrain(&mut self, value: Option<RangeInput>) -> Result<()> {
        self.terrain = value
            .map(|input| Rating::from_input(input, "terrain"))
            .transpose()?;
        Ok(())
    }

    pub fn difficulty(&self) -> Option<Rating> {
        self.difficulty
    }

    pub fn set_difficulty(&mut self, value: Option<RangeInput>) -> Result<()> {
        self.difficulty = value
            .map(|input| Rating::from_input(input, "difficulty"))
            .transpose()?;
        Ok(())
    }

    pub fn favorite_points(&self) -> Option<u32> {
        self.favorite_points
    }

    /// Fractional parts are truncated
    pub fn set_favorite_points<V: Into<f64>>(&mut self, value: Option<V>) -> Result<()> {
        self.favorite_points = match value.map(Into::into) {
            None => None,
            Some(value) if value.is_nan() => {
                return Err(SearchError::InvalidArgumentType(
                    "favorite points must be a number".to_string(),
                ));
            }
            Some(value) if value.trunc() < 0.0 || value.trunc() > u32::MAX as f64 => {
                return Err(SearchError::out_of_range(
                    "favorite points",
                    value,
                    0.0,
                    u32::MAX as f64,
                ));
            }
            Some(value) => Some(value.trunc() as u32),
        };
        Ok(())
    }

    pub fn keyword(&self) -> Option<&str> {
        self.keyword.as_deref()
    }

    pub fn set_keyword(&mut self, value: Option<&str>) -> Result<()> {
        self.keyword = non_empty(value, "keyword")?;
        Ok(())
    }

    /// Username of the cache owner
    pub fn hidden_by(&self) -> Option<&str> {
        self.hidden_by.as_deref()
    }

    pub fn set_hidden_by(&mut self, value: Option<&str>) -> Result<()> {
        self.hidden_by = non_empty(value, "hidden by")?;
        Ok(())
    }

    /// Pass a raw wire parameter through unchanged
    ///
    /// Typed attributes encoding to the same key take precedence.
    pub fn add_parameter(&mut self, name: &str, value: impl Into<String>) -> Result<()> {
        self.extra.add(name, Some(value))
    }

    pub fn remove_parameter(&mut self, name: &str) -> Result<()> {
        self.extra.remove(name)
    }

    /// Wire parameters for every attribute currently set
    pub fn parameters(&self) -> ParameterBag {
        let mut bag = self.extra.clone();

        let toggles = [
            ("e", self.enabled),
            ("f", self.found),
            ("note", self.personal_note),
            ("cc", self.corrected_coordinates),
            ("p", self.premium),
            ("o", self.owner),
        ];
        for (key, value) in toggles {
            if let Some(value) = value {
                bag.set(key, encode_toggle(value).to_string());
            }
        }

        for (key, rating) in [("t", &self.terrain), ("d", &self.difficulty)] {
            if let Some(rating) = rating {
                bag.set(key, encode_rating(rating));
            }
        }

        if let Some(favorite_points) = self.favorite_points {
            bag.set("fav", favorite_points.to_string());
        }
        if let Some(keyword) = &self.keyword {
            bag.set("kw", keyword.clone());
        }
        if let Some(hidden_by) = &self.hidden_by {
            bag.set("owner[0]", hidden_by.clone());
        }

        bag
    }
}

fn non_empty(value: Option<&str>, what: &str) -> Result<Option<String>> {
    match value {
        Some("") => Err(SearchError::InvalidValue(format!("{} must not be empty", what))),
        Some(value) => Ok(Some(value.to_string())),
        None => Ok(None),
    }
}

/// Fluent construction of a [`Filter`]; the first invalid attribute fails `build`
#[derive(Debug, Default)]
pub struct FilterBuilder {
    filter: Filter,
    error: Option<SearchError>,
}

impl FilterBuilder {
    fn record(mut self, result: Result<()>) -> Self {
        if let Err(err) = result {
            self.error.get_or_insert(err);
        }
        self
    }

    pub fn enabled(mut self, value: impl Truthy) -> Self {
        self.filter.set_enabled(Some(value));
        self
    }

    pub fn found(mut self, value: impl Truthy) -> Self {
        self.filter.set_found(Some(value));
        self
    }

    pub fn personal_note(mut self, value: impl Truthy) -> Self {
        self.filter.set_personal_note(Some(value));
        self
    }

    pub fn corrected_coordinates(mut self, value: impl Truthy) -> Self {
        self.filter.set_corrected_coordinates(Some(value));
        self
    }

    pub fn premium(mut self, value: impl Truthy) -> Self {
        self.filter.set_premium(Some(value));
        self
    }

    pub fn owner(mut self, value: impl Truthy) -> Self {
        self.filter.set_owner(Some(value));
        self
    }

    pub fn terrain(mut self, value: impl Into<RangeInput>) -> Self {
        let result = self.filter.set_terrain(Some(value.into()));
        self.record(result)
    }

    pub fn difficulty(mut self, value: impl Into<RangeInput>) -> Self {
        let result = self.filter.set_difficulty(Some(value.into()));
        self.record(result)
    }

    pub fn favorite_points(mut self, value: impl Into<f64>) -> Self {
        let result = self.filter.set_favorite_points(Some(value));
        self.record(result)
    }

    pub fn keyword(mut self, value: &str) -> Self {
        let result = self.filter.set_keyword(Some(value));
        self.record(result)
    }

    pub fn hidden_by(mut self, value: &str) -> Self {
        let result = self.filter.set_hidden_by(Some(value));
        self.record(result)
    }

    pub fn build(self) -> Result<Filter> {
        match self.error {
            Some(err) => Err(err),
            None => Ok(self.filter),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn terrain_of(input: impl Into<RangeInput>) -> Result<Filter> {
        Filter::builder().terrain(input).build()
    }

    #[test]
    fn test_scalar_reads_back_quantized() {
        let mut x = 1.0;
        while x <= 5.0 {
            let filter = terrain_of(x).unwrap();
            assert_eq!(filter.terrain(), Some(Rating::Single(quantize(x))), "x = {}", x);
            x += 0.05;
        }
    }

    #[test]
    fn test_pair_order_does_not_matter() {
        let values = [1.0, 1.3, 2.0, 2.7, 3.5, 4.2, 5.0];
        for &a in &values {
            for &b in &values {
                let forward = terrain_of((a, b)).unwrap().terrain();
                let backward = terrain_of((b, a)).unwrap().terrain();
                assert_eq!(forward, backward);

                let (qa, qb) = (quantize(a), quantize(b));
                let expected = if qa == qb {
                    Rating::Single(qa)
                } else {
                    Rating::Span(qa.min(qb), qa.max(qb))
                };
                assert_eq!(forward, Some(expected));
            }
        }
    }

    #[test]
    fn test_equal_pair_collapses_to_single() {
        let filter = terrain_of((2.5, 2.5)).unwrap();
        assert_eq!(filter.terrain(), Some(Rating::Single(2.5)));
        assert_eq!(filter.parameters().get("t"), Some("2.5"));

        let filter = terrain_of((2.0, 2.4)).unwrap();
        assert_eq!(filter.terrain(), Some(Rating::Single(2.0)));
    }

    #[test]
    fn test_rating_encoding() {
        assert_eq!(terrain_of(1.7).unwrap().parameters().get("t"), Some("1.5"));
        assert_eq!(terrain_of((5, 1)).unwrap().parameters().get("t"), Some("1-5"));
        assert_eq!(terrain_of(3.0).unwrap().parameters().get("t"), Some("3"));
        assert_eq!(
            terrain_of((1.5, 4.0)).unwrap().parameters().get("t"),
            Some("1.5-4")
        );

        let filter = Filter::builder().difficulty((2.5, 1.0)).build().unwrap();
        assert_eq!(filter.parameters().get("d"), Some("1-2.5"));
        assert_eq!(filter.difficulty(), Some(Rating::Span(1.0, 2.5)));
    }

    #[test]
    fn test_encode_rating_is_pure() {
        assert_eq!(encode_rating(&Rating::Single(2.0)), "2");
        assert_eq!(encode_rating(&Rating::Single(4.5)), "4.5");
        assert_eq!(encode_rating(&Rating::Span(1.0, 5.0)), "1-5");
        assert_eq!(Rating::Span(2.5, 3.5).to_string(), "2.5-3.5");
    }

    #[test]
    fn test_endpoint_out_of_range() {
        for input in [0.4, 6.0, 0.99] {
            assert!(matches!(
                terrain_of(input),
                Err(SearchError::OutOfRange { .. })
            ));
        }
        let err = terrain_of((2.0, 7.0)).unwrap_err();
        match err {
            SearchError::OutOfRange { what, .. } => assert_eq!(what, "terrain second endpoint"),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_quantized_upper_bound_accepted() {
        let filter = terrain_of(5.4).unwrap();
        assert_eq!(filter.terrain(), Some(Rating::Single(5.0)));
    }

    #[test]
    fn test_non_numeric_input_rejected() {
        assert!(matches!(
            terrain_of(f64::NAN),
            Err(SearchError::InvalidArgumentType(_))
        ));
        assert!(matches!(
            "abc".parse::<RangeInput>(),
            Err(SearchError::InvalidArgumentType(_))
        ));
    }

    #[test]
    fn test_range_input_from_str() {
        assert_eq!("2.5".parse::<RangeInput>().unwrap(), RangeInput::Scalar(2.5));
        assert_eq!("1-5".parse::<RangeInput>().unwrap(), RangeInput::Pair(1.0, 5.0));
        assert_eq!(" 1.5, 3 ".parse::<RangeInput>().unwrap(), RangeInput::Pair(1.5, 3.0));
        assert_eq!("-2".parse::<RangeInput>().unwrap(), RangeInput::Scalar(-2.0));
        assert!(matches!(
            "1,2,3".parse::<RangeInput>(),
            Err(SearchError::InvalidValue(_))
        ));
    }

    #[test]
    fn test_wrong_length_sequence_rejected() {
        let values: [&[f64]; 3] = [&[], &[1.0], &[1.0, 2.0, 3.0]];
        for values in values {
            assert!(matches!(
                RangeInput::try_from(values),
                Err(SearchError::InvalidValue(_))
            ));
        }
        assert_eq!(
            RangeInput::try_from(&[4.0, 2.0][..]).unwrap(),
            RangeInput::Pair(4.0, 2.0)
        );
    }

    #[test]
    fn test_failed_set_keeps_previous_value() {
        let mut filter = terrain_of(2.0).unwrap();
        assert!(filter.set_terrain(Some(RangeInput::Scalar(9.0))).is_err());
        assert_eq!(filter.terrain(), Some(Rating::Single(2.0)));

        filter.set_terrain(None).unwrap();
        assert_eq!(filter.terrain(), None);
        assert!(!filter.parameters().contains("t"));
    }

    #[test]
    fn test_toggle_encoding() {
        let filter = Filter::builder().found(true).build().unwrap();
        assert_eq!(filter.parameters().get("f"), Some("1"));

        let filter = Filter::builder().found(false).build().unwrap();
        assert_eq!(filter.parameters().get("f"), Some("2"));

        let mut filter = Filter::new();
        filter.set_found(None::<bool>);
        assert!(!filter.parameters().contains("f"));
        assert_eq!(filter.found(), None);
    }

    #[test]
    fn test_toggle_truthiness() {
        let mut filter = Filter::new();
        filter.set_enabled(Some(0_i32));
        assert_eq!(filter.enabled(), Some(false));
        filter.set_enabled(Some(3_i32));
        assert_eq!(filter.enabled(), Some(true));
        filter.set_premium(Some(0.0_f64));
        assert_eq!(filter.premium(), Some(false));
    }

    #[test]
    fn test_all_wire_keys() {
        let filter = Filter::builder()
            .enabled(true)
            .found(false)
            .personal_note(true)
            .corrected_coordinates(false)
            .premium(true)
            .owner(false)
            .terrain(1.5)
            .difficulty((1, 3))
            .favorite_points(12.9_f64)
            .keyword("mystery")
            .hidden_by("someone")
            .build()
            .unwrap();

        let params = filter.parameters();
        let expected = [
            ("e", "1"),
            ("f", "2"),
            ("note", "1"),
            ("cc", "2"),
            ("p", "1"),
            ("o", "2"),
            ("t", "1.5"),
            ("d", "1-3"),
            ("fav", "12"),
            ("kw", "mystery"),
            ("owner[0]", "someone"),
        ];
        assert_eq!(params.len(), expected.len());
        for (key, value) in expected {
            assert_eq!(params.get(key), Some(value), "key {}", key);
        }
    }

    #[test]
    fn test_empty_filter_has_no_parameters() {
        assert!(Filter::new().parameters().is_empty());
    }

    #[test]
    fn test_favorite_points_validation() {
        let mut filter = Filter::new();
        filter.set_favorite_points(Some(7u32)).unwrap();
        assert_eq!(filter.favorite_points(), Some(7));

        assert!(matches!(
            filter.set_favorite_points(Some(-1.0_f64)),
            Err(SearchError::OutOfRange { .. })
        ));
        assert!(matches!(
            filter.set_favorite_points(Some(f64::NAN)),
            Err(SearchError::InvalidArgumentType(_))
        ));
        assert_eq!(filter.favorite_points(), Some(7));

        filter.set_favorite_points(Some(-0.5_f64)).unwrap();
        assert_eq!(filter.favorite_points(), Some(0));
        assert_eq!(filter.parameters().get("fav"), Some("0"));
        filter.set_favorite_points(Some(3.99_f64)).unwrap();
        assert_eq!(filter.favorite_points(), Some(3));

        filter.set_favorite_points(None::<f64>).unwrap();
        assert!(!filter.parameters().contains("fav"));
    }

    #[test]
    fn test_empty_strings_rejected() {
        assert!(matches!(
            Filter::builder().keyword("").build(),
            Err(SearchError::InvalidValue(_))
        ));
        assert!(matches!(
            Filter::builder().hidden_by("").build(),
            Err(SearchError::InvalidValue(_))
        ));
    }

    #[test]
    fn test_builder_reports_first_error() {
        let err = Filter::builder()
            .terrain(0.5)
            .keyword("")
            .build()
            .unwrap_err();
        assert!(matches!(err, SearchError::OutOfRange { .. }));
    }

    #[test]
    fn test_passthrough_parameters() {
        let mut filter = Filter::builder().found(true).build().unwrap();
        filter.add_parameter("sc", "1").unwrap();
        filter.add_parameter("f", "2").unwrap();

        let params = filter.parameters();
        assert_eq!(params.get("sc"), Some("1"));
        assert_eq!(params.get("f"), Some("1"));

        filter.remove_parameter("sc").unwrap();
        assert!(!filter.parameters().contains("sc"));
        assert!(matches!(
            filter.add_parameter("", "1"),
            Err(SearchError::InvalidArgumentType(_))
        ));
    }
}
