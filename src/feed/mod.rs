mod rss;
mod service;
mod tagging;
pub mod text;

pub use rss::{FeedScope, FeedWriter};
pub use service::{FEED_ITEM_LIMIT, FeedError, FeedService};
pub use tagging::item_categories;
