//! Blockwatch Data API client and types.
//!
//! **Feature flag:** `data` (required to use this module)
//!
//! The Data API is a read-only HTTP API serving blockchain and market datasets. Every
//! call is authenticated with an API key sent in the `X-API-Key` header.
//!
//! ## Available Endpoints
//!
//! | Endpoint | Description |
//! |----------|-------------|
//! | `databases` | List databases available to the key |
//! | `databases/{db}/codes.json` | List the datasets of a database |
//! | `databases/{db}/{set}/metadata.json` | Schema and metadata of a dataset |
//! | `tables/{db}/{set}.json` | One cursor-paged page of a table |
//! | `series/{db}/{set}.json` | A time series, optionally collapsed |
//!
//! Tables and series arrive as [`Dataframe`](crate::frame::Dataframe)s and can be bound
//! into typed records with [`Client::table_records`] and [`Client::series_records`].
//!
//! # Example
//!
//! ```no_run
//! use blockwatch_client_sdk::config::Config;
//! use blockwatch_client_sdk::data::{Client, types::request::SeriesRequest};
//! use blockwatch_client_sdk::data::types::CollapseMode;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = Client::from_env(Config::default())?;
//!
//! let request = SeriesRequest::builder()
//!     .database("BITCOIN")
//!     .dataset("BLOCK")
//!     .columns(vec!["time".to_owned(), "n_tx".to_owned()])
//!     .collapse(CollapseMode::Daily)
//!     .limit(30)
//!     .build();
//!
//! let series = client.series(&request).await?;
//! let (_, counts) = series.column("n_tx")?;
//! println!("{} daily buckets", counts.len());
//! # Ok(())
//! # }
//! ```
//!
//! # API Base URL
//!
//! The default API endpoint is `https://data.blockwatch.cc/v1/`.

pub mod client;
pub mod types;

pub use client::Client;
