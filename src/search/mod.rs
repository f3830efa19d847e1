pub mod filter;
pub mod origin;
pub mod results;
pub mod sorting;

pub use filter::{
    encode_rating, encode_toggle, quantize, Filter, FilterBuilder, RangeInput, Rating, Truthy,
};
pub use origin::Origin;
pub use results::SearchResults;
pub use sorting::{Column, Order, Sorting};

use crate::params::ParameterBag;
use crate::scrapers::PageSource;

/// How the endpoint orders results
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchMode {
    /// Server default listing order
    Listing,
    Sorted(Column, Order),
}

/// A fully assembled search: where, in which order, which caches and how many
#[derive(Debug, Clone, Default)]
pub struct SearchRequest {
    origin: Origin,
    sorting: Sorting,
    filter: Filter,
    limit: Option<usize>,
}

impl SearchRequest {
    pub fn new(origin: Origin, sorting: Sorting, filter: Filter) -> Self {
        Self {
            origin,
            sorting,
            filter,
            limit: None,
        }
    }

    /// Stop after `limit` results; `None` reads until the source is exhausted
    pub fn with_limit(mut self, limit: Option<usize>) -> Self {
        self.limit = limit;
        self
    }

    pub fn origin(&self) -> &Origin {
        &self.origin
    }

    pub fn sorting(&self) -> &Sorting {
        &self.sorting
    }

    pub fn filter(&self) -> &Filter {
        &self.filter
    }

    pub fn limit(&self) -> Option<usize> {
        self.limit
    }

    pub fn mode(&self) -> SearchMode {
        match self.sorting.column() {
            Some(column) => SearchMode::Sorted(column, self.sorting.order()),
            None => SearchMode::Listing,
        }
    }

    /// Origin, sorting and filter parameters merged into one bag
    pub fn parameters(&self) -> ParameterBag {
        let mut parameters = ParameterBag::new();
        parameters.extend(self.origin.parameters());
        parameters.extend(self.sorting.parameters());
        parameters.extend(&self.filter.parameters());
        parameters
    }
}

/// Lazily enumerate the results of `request` from `source`
pub fn search<S: PageSource>(source: S, request: &SearchRequest) -> SearchResults<S> {
    SearchResults::new(source, request)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Point, UnitSystem};

    #[test]
    fn test_default_request_is_worldwide_listing() {
        let request = SearchRequest::default();
        assert_eq!(request.mode(), SearchMode::Listing);
        assert_eq!(request.limit(), None);

        let params = request.parameters();
        assert_eq!(params.len(), 1);
        assert_eq!(params.get("ot"), Some("4"));
    }

    #[test]
    fn test_parameters_merge_all_encoders() {
        let point = Point::new(49.733867, 13.397091).unwrap();
        let origin = Origin::new(Some(point), Some(20), UnitSystem::Metric).unwrap();
        let sorting = Sorting::by(Column::Distance, Order::Ascending);
        let filter = Filter::builder().found(false).terrain((1, 2)).build().unwrap();

        let request = SearchRequest::new(origin, sorting, filter).with_limit(Some(100));
        assert_eq!(
            request.mode(),
            SearchMode::Sorted(Column::Distance, Order::Ascending)
        );
        assert_eq!(
            request.parameters().to_query_string(),
            "asc=True&f=2&origin=49.733867, 13.397091&radius=20km&sort=Distance&t=1-2"
        );
    }

    #[test]
    fn test_order_alone_stays_listing() {
        let request = SearchRequest::new(
            Origin::anywhere(),
            Sorting::new(None, Order::Descending),
            Filter::new(),
        );
        assert_eq!(request.mode(), SearchMode::Listing);
        assert!(!request.parameters().contains("asc"));
    }
}
