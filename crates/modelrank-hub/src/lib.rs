//! Record sources for ModelRank.
//!
//! - [`HubClient`]: pages through the Hugging Face datasets-server `rows` API
//! - [`JsonFileSource`]: reads an offline dump of rows
//!
//! Both implement [`modelrank_core::RecordSource`].

pub mod client;
pub mod config;
pub mod file;

pub use client::{fetch_complete, parse_rows_page, HubClient, RowsPage};
pub use config::HubConfig;
pub use file::{parse_rows_document, JsonFileSource};
