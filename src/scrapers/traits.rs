use crate::params::ParameterBag;
use crate::scrapers::types::{Page, PageCursor};
use anyhow::Result;

/// Source of paged search results
/// This allows the enumerator to run against the live site or an in-memory fixture
pub trait PageSource {
    /// Fetch the page starting at `cursor` for the given search parameters
    fn fetch_page(&self, parameters: &ParameterBag, cursor: PageCursor) -> Result<Page>;

    /// Get the name of the page source
    fn source_name(&self) -> &'static str;
}

impl<S: PageSource + ?Sized> PageSource for &S {
    fn fetch_page(&self, parameters: &ParameterBag, cursor: PageCursor) -> Result<Page> {
        (**self).fetch_page(parameters, cursor)
    }

    fn source_name(&self) -> &'static str {
        (**self).source_name()
    }
}
