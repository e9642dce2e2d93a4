//! Retrieval and text extraction for target websites.
//!
//! [`PageFetcher`] downloads raw HTML under a hard deadline, and
//! [`extract_page`] turns it into a bounded [`ScrapedPage`] transcript. The
//! extractor never fails: malformed markup degrades to a regex-based pass.

pub mod client;
pub mod error;
pub mod extract;
pub mod normalize;

pub use client::PageFetcher;
pub use error::ScraperError;
pub use extract::{extract_page, ExtractLimits};
pub use normalize::{host_of, normalize_url};
pub use rivalscope_core::{PageLink, ScrapedPage};
