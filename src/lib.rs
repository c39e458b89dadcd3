#![warn(rust_2018_idioms)]

pub mod adapter;
pub mod app;
pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod feed;
pub mod handler;
pub mod healthcheck;
pub mod port;
pub mod queue;
pub mod refresh;
pub mod sitemap;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
pub mod xml;

pub use healthcheck::{healthcheck, healthcheck_with_port};
