//! Search-parameter encoding and lazy result enumeration for geocache listings.
//!
//! Build an [`Origin`], a [`Sorting`] and a [`Filter`], combine them into a
//! [`SearchRequest`] and hand it to [`search`] together with a
//! [`PageSource`]. Results are pulled page by page as the iterator advances.
//!
//! ```rust,ignore
//! use cache_search::prelude::*;
//!
//! let point = Point::new(38.5314833, -28.63125)?;
//! let request = SearchRequest::new(
//!     Origin::new(Some(point), Some(10), UnitSystem::Metric)?,
//!     Sorting::by(Column::Favorites, Order::Descending),
//!     Filter::builder().found(false).terrain((1, 3)).build()?,
//! )
//! .with_limit(Some(150));
//!
//! for cache in search(GeocachingScraper::new()?, &request) {
//!     println!("{}", cache?);
//! }
//! ```

pub mod config;
pub mod error;
pub mod models;
pub mod params;
pub mod scrapers;
pub mod search;

pub use error::{Result, SearchError};
pub use models::{Cache, Point, UnitSystem};
pub use params::ParameterBag;
pub use scrapers::{GeocachingScraper, Page, PageCursor, PageSource};
pub use search::{
    search, Column, Filter, Order, Origin, RangeInput, Rating, SearchMode, SearchRequest,
    SearchResults, Sorting,
};

pub mod prelude {
    pub use crate::config::Config;
    pub use crate::error::{Result, SearchError};
    pub use crate::models::{Cache, Point, UnitSystem};
    pub use crate::params::ParameterBag;
    pub use crate::scrapers::{GeocachingScraper, Page, PageCursor, PageSource};
    pub use crate::search::{
        search, Column, Filter, Order, Origin, RangeInput, Rating, SearchMode, SearchRequest,
        SearchResults, Sorting,
    };
}
