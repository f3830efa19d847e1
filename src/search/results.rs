use crate::error::{Result, SearchError};
use crate::models::Cache;
use crate::params::ParameterBag;
use crate::scrapers::{PageCursor, PageSource};
use crate::search::{SearchMode, SearchRequest};
use std::collections::VecDeque;
use std::iter::FusedIterator;
use tracing::{debug, info};

/// Lazy, bounded sequence of search results
///
/// Pages are fetched only when the buffered page runs dry and the caller asks
/// for another item. Dropping the iterator stops all fetching. A transport
/// failure is yielded once, after which the sequence ends.
pub struct SearchResults<S> {
    source: S,
    parameters: ParameterBag,
    cursor: PageCursor,
    buffer: VecDeque<Cache>,
    limit: Option<usize>,
    yielded: usize,
    exhausted: bool,
}

impl<S: PageSource> SearchResults<S> {
    pub fn new(source: S, request: &SearchRequest) -> Self {
        let parameters = request.parameters();
        match request.mode() {
            SearchMode::Listing => info!("Searching {} in listing order", source.source_name()),
            SearchMode::Sorted(column, order) => info!(
                "Searching {} sorted by {} ({:?})",
                source.source_name(),
                column.as_str(),
                order
            ),
        }
        debug!("Search parameters: {}", parameters.to_query_string());

        Self {
            source,
            parameters,
            cursor: PageCursor::start(),
            buffer: VecDeque::new(),
            limit: request.limit(),
            yielded: 0,
            exhausted: false,
        }
    }

    /// Number of results handed out so far
    pub fn yielded(&self) -> usize {
        self.yielded
    }

    fn limit_reached(&self) -> bool {
        self.limit.is_some_and(|limit| self.yielded >= limit)
    }

    fn fetch_next_page(&mut self) -> Result<()> {
        let page = self
            .source
            .fetch_page(&self.parameters, self.cursor)
            .map_err(SearchError::Transport)?;

        debug!(
            "Page at {} returned {} results from {} rows",
            self.cursor.start_index,
            page.items.len(),
            page.consumed
        );

        self.cursor = self.cursor.advance(page.consumed);
        if page.consumed == 0 || !page.has_more {
            info!("End of results after {} items", self.cursor.start_index);
            self.exhausted = true;
        }
        self.buffer.extend(page.items);
        Ok(())
    }
}

impl<S: PageSource> Iterator for SearchResults<S> {
    type Item = Result<Cache>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.limit_reached() {
            return None;
        }

        // pages whose rows all failed to decode are skipped, not treated as the end
        while self.buffer.is_empty() {
            if self.exhausted {
                return None;
            }
            if let Err(err) = self.fetch_next_page() {
                self.exhausted = true;
                self.buffer.clear();
                return Some(Err(err));
            }
        }

        let cache = self.buffer.pop_front()?;
        self.yielded += 1;
        Some(Ok(cache))
    }
}

impl<S: PageSource> FusedIterator for SearchResults<S> {}
