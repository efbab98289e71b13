//! Request types for the Blockwatch Data API.
//!
//! Path segments (database and dataset codes) are carried on the request but never
//! serialized into the query string.

#![allow(
    clippy::module_name_repetitions,
    reason = "Request suffix is intentional for clarity"
)]

use bon::Builder;
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_with::{StringWithSeparator, formats::CommaSeparator, serde_as, skip_serializing_none};

use super::{CollapseMode, Filters, OrderMode};

/// Request parameters for the `databases` listing.
///
/// # Example
///
/// ```
/// use blockwatch_client_sdk::ToQueryParams as _;
/// use blockwatch_client_sdk::data::types::request::DatabasesRequest;
///
/// let request = DatabasesRequest::builder().limit(20).build();
/// assert_eq!(request.query_params(), "?limit=20");
/// ```
#[skip_serializing_none]
#[derive(Debug, Clone, Default, Builder, Serialize)]
#[non_exhaustive]
pub struct DatabasesRequest {
    /// Maximum number of databases per page.
    pub limit: Option<u32>,
    /// Continuation token from a previous [`DatabaseList`](super::response::DatabaseList).
    #[builder(into)]
    pub cursor: Option<String>,
}

/// Request parameters for listing the dataset codes of one database.
#[skip_serializing_none]
#[derive(Debug, Clone, Builder, Serialize)]
#[non_exhaustive]
pub struct DatasetsRequest {
    #[serde(skip_serializing)]
    #[builder(into)]
    pub database: String,
    pub limit: Option<u32>,
    #[builder(into)]
    pub cursor: Option<String>,
}

/// Request for the metadata of a single dataset.
#[derive(Debug, Clone, Builder, Serialize)]
#[non_exhaustive]
pub struct DatasetRequest {
    #[serde(skip_serializing)]
    #[builder(into)]
    pub database: String,
    #[serde(skip_serializing)]
    #[builder(into)]
    pub dataset: String,
}

/// Request parameters for a table page.
///
/// Tables are paged with an opaque `cursor`. Leave it unset for the first page and pass
/// the cursor of the previous [`Table`](super::response::Table) to continue.
///
/// # Example
///
/// ```
/// use blockwatch_client_sdk::ToQueryParams as _;
/// use blockwatch_client_sdk::data::types::request::TableRequest;
/// use blockwatch_client_sdk::data::types::{Filter, FilterMode, Filters};
///
/// let request = TableRequest::builder()
///     .database("BITCOIN")
///     .dataset("BLOCK")
///     .columns(vec!["height".to_owned(), "time".to_owned()])
///     .filters(Filters::new().with(Filter::new("height", FilterMode::Gte, "800000")))
///     .limit(100)
///     .build();
///
/// assert_eq!(
///     request.query_params(),
///     "?columns=height%2Ctime&height.gte=800000&limit=100"
/// );
/// ```
#[serde_as]
#[skip_serializing_none]
#[derive(Debug, Clone, Builder, Serialize)]
#[non_exhaustive]
pub struct TableRequest {
    #[serde(skip_serializing)]
    #[builder(into)]
    pub database: String,
    #[serde(skip_serializing)]
    #[builder(into)]
    pub dataset: String,
    /// Column codes to return, all columns when empty.
    #[serde_as(as = "StringWithSeparator::<CommaSeparator, String>")]
    #[serde(skip_serializing_if = "Vec::is_empty")]
    #[builder(default)]
    pub columns: Vec<String>,
    #[serde(flatten)]
    #[builder(default)]
    pub filters: Filters,
    #[builder(into)]
    pub cursor: Option<String>,
    pub limit: Option<u32>,
}

impl TableRequest {
    /// Returns a copy of this request continuing at `cursor`.
    #[must_use]
    pub fn with_cursor<S: Into<String>>(&self, cursor: S) -> Self {
        Self {
            cursor: Some(cursor.into()),
            ..self.clone()
        }
    }
}

/// Request parameters for a time series.
///
/// # Example
///
/// ```
/// use blockwatch_client_sdk::ToQueryParams as _;
/// use blockwatch_client_sdk::data::types::request::SeriesRequest;
/// use blockwatch_client_sdk::data::types::{CollapseMode, OrderMode};
/// use blockwatch_client_sdk::types::DateTime;
///
/// let request = SeriesRequest::builder()
///     .database("BITCOIN")
///     .dataset("BLOCK")
///     .collapse(CollapseMode::Daily)
///     .order(OrderMode::Asc)
///     .start_date(DateTime::from_timestamp(1_704_067_200, 0).unwrap())
///     .build();
///
/// assert_eq!(
///     request.query_params(),
///     "?collapse=1d&order=asc&start_date=2024-01-01T00%3A00%3A00Z"
/// );
/// ```
#[serde_as]
#[skip_serializing_none]
#[derive(Debug, Clone, Builder, Serialize)]
#[non_exhaustive]
pub struct SeriesRequest {
    #[serde(skip_serializing)]
    #[builder(into)]
    pub database: String,
    #[serde(skip_serializing)]
    #[builder(into)]
    pub dataset: String,
    #[serde_as(as = "StringWithSeparator::<CommaSeparator, String>")]
    #[serde(skip_serializing_if = "Vec::is_empty")]
    #[builder(default)]
    pub columns: Vec<String>,
    pub collapse: Option<CollapseMode>,
    pub order: Option<OrderMode>,
    /// Sent as RFC 3339.
    pub start_date: Option<DateTime<Utc>>,
    /// Sent as RFC 3339.
    pub end_date: Option<DateTime<Utc>>,
    #[serde(flatten)]
    #[builder(default)]
    pub filters: Filters,
    pub limit: Option<u32>,
}
