pub mod feed;
pub mod health;
pub mod queue;
pub mod refresh;
pub mod sitemap;
