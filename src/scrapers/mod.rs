pub mod geocaching;
pub mod traits;
pub mod types;

pub use geocaching::GeocachingScraper;
pub use traits::PageSource;
pub use types::{Page, PageCursor};
