use crate::error::{Result, SearchError};
use crate::models::{Point, UnitSystem};
use crate::params::ParameterBag;

/// Value of `ot` meaning "no geographic center"
pub const NO_CENTER: &str = "4";

/// Center point and radius of a search
#[derive(Debug, Clone, PartialEq)]
pub struct Origin {
    point: Option<Point>,
    radius: Option<u32>,
    unit: UnitSystem,
    parameters: ParameterBag,
}

impl Origin {
    /// Without a point the search is worldwide and `radius`/`unit` are ignored
    pub fn new(point: Option<Point>, radius: Option<i64>, unit: UnitSystem) -> Result<Self> {
        let mut parameters = ParameterBag::new();

        let Some(point) = point else {
            parameters.set("ot", NO_CENTER.to_string());
            return Ok(Self {
                point: None,
                radius: None,
                unit,
                parameters,
            });
        };

        parameters.set("origin", point.format_decimal());

        let radius = match radius {
            Some(radius) if radius < 1 => {
                return Err(SearchError::out_of_range(
                    "radius",
                    radius as f64,
                    1.0,
                    u32::MAX as f64,
                ));
            }
            Some(radius) => {
                let radius = u32::try_from(radius).map_err(|_| {
                    SearchError::out_of_range("radius", radius as f64, 1.0, u32::MAX as f64)
                })?;
                parameters.set("radius", format!("{}{}", radius, unit.suffix()));
                Some(radius)
            }
            None => None,
        };

        Ok(Self {
            point: Some(point),
            radius,
            unit,
            parameters,
        })
    }

    /// Search around `point`, given as a [`Point`] or a raw `(latitude, longitude)` pair
    pub fn around<P>(point: P, radius: Option<i64>, unit: UnitSystem) -> Result<Self>
    where
        P: TryInto<Point>,
        SearchError: From<P::Error>,
    {
        let point = point.try_into()?;
        Self::new(Some(point), radius, unit)
    }

    /// Worldwide search with no center constraint
    pub fn anywhere() -> Self {
        let mut parameters = ParameterBag::new();
        parameters.set("ot", NO_CENTER.to_string());
        Self {
            point: None,
            radius: None,
            unit: UnitSystem::default(),
            parameters,
        }
    }

    pub fn point(&self) -> Option<Point> {
        self.point
    }

    pub fn radius(&self) -> Option<u32> {
        self.radius
    }

    pub fn unit(&self) -> UnitSystem {
        self.unit
    }

    pub fn parameters(&self) -> &ParameterBag {
        &self.parameters
    }
}

impl Default for Origin {
    fn default() -> Self {
        Self::anywhere()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn only_no_center(origin: &Origin) -> bool {
        origin.parameters().len() == 1 && origin.parameters().get("ot") == Some("4")
    }

    #[test]
    fn test_no_point_encodes_sentinel() {
        assert!(only_no_center(&Origin::anywhere()));
        assert!(only_no_center(
            &Origin::new(None, None, UnitSystem::Metric).unwrap()
        ));
        assert!(only_no_center(
            &Origin::new(None, Some(34), UnitSystem::Metric).unwrap()
        ));
        assert!(only_no_center(
            &Origin::new(None, None, UnitSystem::Imperial).unwrap()
        ));
    }

    #[test]
    fn test_radius_ignored_without_point() {
        let origin = Origin::new(None, Some(-3), UnitSystem::Metric).unwrap();
        assert!(only_no_center(&origin));
        assert_eq!(origin.radius(), None);
    }

    #[test]
    fn test_point_and_imperial_radius() {
        let point = Point::try_from((-51.7292, -59.2135)).unwrap();
        let origin = Origin::new(Some(point), Some(5), UnitSystem::Imperial).unwrap();

        let mut expected = ParameterBag::new();
        expected.add("origin", Some("-51.7292, -59.2135")).unwrap();
        expected.add("radius", Some("5mi")).unwrap();
        assert_eq!(origin.parameters(), &expected);
    }

    #[test]
    fn test_around_accepts_raw_pair() {
        let origin = Origin::around((-51.7292, -59.2135), Some(5), UnitSystem::Imperial).unwrap();
        assert_eq!(origin.parameters().get("origin"), Some("-51.7292, -59.2135"));
        assert_eq!(origin.parameters().get("radius"), Some("5mi"));

        let point = Point::new(10.0, 20.0).unwrap();
        let origin = Origin::around(point, None, UnitSystem::Metric).unwrap();
        assert_eq!(origin.point(), Some(point));

        assert!(matches!(
            Origin::around((95.0, 0.0), None, UnitSystem::Metric),
            Err(SearchError::OutOfRange { .. })
        ));
    }

    #[test]
    fn test_point_without_radius() {
        let point = Point::new(38.5314833, -28.63125).unwrap();
        let origin = Origin::new(Some(point), None, UnitSystem::Metric).unwrap();
        assert_eq!(origin.parameters().len(), 1);
        assert_eq!(
            origin.parameters().get("origin"),
            Some("38.5314833, -28.63125")
        );
    }

    #[test]
    fn test_metric_radius() {
        let point = Point::new(38.5314833, -28.63125).unwrap();
        let origin = Origin::new(Some(point), Some(10), UnitSystem::Metric).unwrap();
        assert_eq!(origin.parameters().get("radius"), Some("10km"));
        assert_eq!(origin.radius(), Some(10));
    }

    #[test]
    fn test_radius_below_one_rejected() {
        let point = Point::new(38.5, -28.6).unwrap();
        for radius in [0, -1] {
            assert!(matches!(
                Origin::new(Some(point), Some(radius), UnitSystem::Metric),
                Err(SearchError::OutOfRange { .. })
            ));
        }
    }
}
