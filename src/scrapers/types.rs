use crate::models::Cache;
use serde::{Deserialize, Serialize};

/// Position of the next page within the overall result list
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageCursor {
    /// Zero-based index of the first result on the page
    pub start_index: usize,
}

impl PageCursor {
    pub fn start() -> Self {
        Self::default()
    }

    /// Cursor following a page that held `count` results
    pub fn advance(self, count: usize) -> Self {
        Self {
            start_index: self.start_index + count,
        }
    }
}

/// One page of decoded search results
#[derive(Debug, Clone, Default)]
pub struct Page {
    pub items: Vec<Cache>,
    /// Rows the source returned, including any that failed to decode
    pub consumed: usize,
    /// Whether the source has results beyond this page
    pub has_more: bool,
}

impl Page {
    /// Page where every returned row decoded into an item
    pub fn new(items: Vec<Cache>, has_more: bool) -> Self {
        let consumed = items.len();
        Self::with_consumed(items, consumed, has_more)
    }

    pub fn with_consumed(items: Vec<Cache>, consumed: usize, has_more: bool) -> Self {
        Self {
            items,
            consumed,
            has_more,
        }
    }
}
