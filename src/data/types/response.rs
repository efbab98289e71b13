//! Response types for the Blockwatch Data API.
//!
//! [`Table`] and [`Series`] carry their rows as an undecoded [`Dataframe`] and
//! dereference to it, so all cell, column and record decoding is available directly.

use std::ops::{Deref, DerefMut};

use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_with::{NoneAsEmptyString, TimestampMilliSeconds, serde_as};

use super::{ApiError, CollapseMode, OrderMode};
use crate::frame::{Column, Dataframe, RawRow};

/// A published database, the top level grouping of datasets.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
#[non_exhaustive]
pub struct Database {
    #[serde(rename = "database_id")]
    pub id: String,
    pub author_id: String,
    pub code: String,
    pub name: String,
    #[serde(rename = "type")]
    pub dataset_type: String,
    pub state: String,
    pub description: String,
    pub documentation: String,
    #[serde(rename = "imageId")]
    pub image_id: String,
    pub is_premium: bool,
    pub has_sample: bool,
    pub delivery_frequency: String,
    pub data_frequency: String,
    pub reporting_lag: String,
    pub history: String,
    pub coverage: String,
    pub labels: String,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    pub subscribed: bool,
}

/// Paging information of a [`DatabaseList`].
#[serde_as]
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[non_exhaustive]
pub struct ListMeta {
    #[serde(default)]
    pub count: u64,
    /// Continuation token, absent on the last page.
    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    pub cursor: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[non_exhaustive]
pub struct DatabaseList {
    #[serde(default)]
    pub meta: ListMeta,
    #[serde(default)]
    pub databases: Vec<Database>,
}

/// Dataset metadata: its schema, the columns it can be filtered on and its primary key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
#[non_exhaustive]
pub struct Dataset {
    #[serde(rename = "database_code")]
    pub database: String,
    #[serde(rename = "dataset_code")]
    pub dataset: String,
    #[serde(rename = "type")]
    pub dataset_type: String,
    pub name: String,
    pub description: String,
    pub columns: Vec<Column>,
    #[serde(rename = "filters")]
    pub filter_fields: Vec<String>,
    #[serde(rename = "primary_key")]
    pub primary_fields: Vec<String>,
}

/// One page of a table.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(from = "TableBody")]
#[non_exhaustive]
pub struct Table {
    pub frame: Dataframe,
    pub limit: u64,
    pub count: u64,
    /// Continuation token for the next page, absent on the last page.
    pub cursor: Option<String>,
    /// Error reported in the body of an otherwise successful response.
    pub error: Option<ApiError>,
}

/// A time series, optionally collapsed into fixed intervals.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(from = "SeriesBody")]
#[non_exhaustive]
pub struct Series {
    pub frame: Dataframe,
    pub collapse: CollapseMode,
    pub order: OrderMode,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub limit: u64,
    pub count: u64,
    pub error: Option<ApiError>,
}

// Wire layouts. The dataframe fields are spelled out instead of flattened: flattening
// buffers the body and would lose the raw row text.
#[serde_as]
#[derive(Default, Deserialize)]
#[serde(default)]
struct TableBody {
    columns: Vec<Column>,
    data: Vec<RawRow>,
    limit: u64,
    count: u64,
    #[serde_as(as = "NoneAsEmptyString")]
    cursor: Option<String>,
    error: Option<ApiError>,
}

impl From<TableBody> for Table {
    fn from(body: TableBody) -> Self {
        Self {
            frame: Dataframe::new(body.columns, body.data),
            limit: body.limit,
            count: body.count,
            cursor: body.cursor,
            error: body.error,
        }
    }
}

#[serde_as]
#[derive(Default, Deserialize)]
#[serde(default)]
struct SeriesBody {
    columns: Vec<Column>,
    data: Vec<RawRow>,
    collapse: CollapseMode,
    order: OrderMode,
    /// Sent by the service as epoch milliseconds.
    #[serde_as(as = "Option<TimestampMilliSeconds<i64>>")]
    start_date: Option<DateTime<Utc>>,
    #[serde_as(as = "Option<TimestampMilliSeconds<i64>>")]
    end_date: Option<DateTime<Utc>>,
    limit: u64,
    count: u64,
    error: Option<ApiError>,
}

impl From<SeriesBody> for Series {
    fn from(body: SeriesBody) -> Self {
        Self {
            frame: Dataframe::new(body.columns, body.data),
            collapse: body.collapse,
            order: body.order,
            start_date: body.start_date,
            end_date: body.end_date,
            limit: body.limit,
            count: body.count,
            error: body.error,
        }
    }
}

impl Deref for Table {
    type Target = Dataframe;

    fn deref(&self) -> &Self::Target {
        &self.frame
    }
}

impl DerefMut for Table {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.frame
    }
}

impl Deref for Series {
    type Target = Dataframe;

    fn deref(&self) -> &Self::Target {
        &self.frame
    }
}

impl DerefMut for Series {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.frame
    }
}
