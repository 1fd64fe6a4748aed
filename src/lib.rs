//! pocket: a personal income and expense ledger with date filters and Telegram reports.
//!
//! The library is used by the `pocket` binary, both for its CLI commands and its MCP server.

mod api;
pub mod args;
pub mod commands;
mod config;
pub mod display;
mod error;
pub mod filter;
pub mod ledger;
mod mcp;
pub mod model;
pub mod report;
pub mod session;
pub mod store;
pub mod summary;
mod utils;


pub use api::{Mode, TEST_MODE_ENV};
pub use config::Config;
pub use error::{Error, ErrorType, Result};
