use std::backtrace::Backtrace;
use std::error::Error as StdError;
use std::fmt;
use std::time::Duration;

use chrono::{DateTime, Utc};
/// HTTP method type, re-exported for use with error inspection.
pub use reqwest::Method;
/// HTTP status code type, re-exported for use with error inspection.
pub use reqwest::StatusCode;
use reqwest::header;
use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;

pub use crate::frame::error::{
    Cause, ColumnMissingError, ConflictError, DecodeError, FieldBindError, OutOfRange, ShapeError,
    UnsupportedFieldError,
};

#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    /// Error related to non-successful HTTP call
    Status,
    /// Error related to invalid state or input within blockwatch-client-sdk
    Validation,
    /// Internal error from dependencies
    Internal,
    /// The API rejected the call because the request quota is exhausted
    RateLimited,
    /// The API answered successfully but reported an error in the response body
    Api,
    /// A record shape cannot be bound
    Schema,
    /// A dataframe value could not be decoded or bound
    Decode,
}

#[derive(Debug)]
pub struct Error {
    kind: Kind,
    source: Option<Box<dyn StdError + Send + Sync + 'static>>,
    backtrace: Backtrace,
}

impl Error {
    pub fn with_source<S: StdError + Send + Sync + 'static>(kind: Kind, source: S) -> Self {
        Self {
            kind,
            source: Some(Box::new(source)),
            backtrace: Backtrace::capture(),
        }
    }

    pub fn kind(&self) -> Kind {
        self.kind
    }

    pub fn backtrace(&self) -> &Backtrace {
        &self.backtrace
    }

    pub fn inner(&self) -> Option<&(dyn StdError + Send + Sync + 'static)> {
        self.source.as_deref()
    }

    pub fn downcast_ref<E: StdError + 'static>(&self) -> Option<&E> {
        let e = self.source.as_deref()?;
        e.downcast_ref::<E>()
    }

    pub fn validation<S: Into<String>>(message: S) -> Self {
        Validation {
            reason: message.into(),
        }
        .into()
    }

    pub fn status<S: Into<String>>(
        status_code: StatusCode,
        method: Method,
        path: String,
        message: S,
    ) -> Self {
        Status {
            status_code,
            method,
            path,
            message: message.into(),
            errors: Vec::new(),
        }
        .into()
    }

    /// Returns `true` when retrying the same call later may succeed.
    #[must_use]
    pub fn is_temporary(&self) -> bool {
        match self.kind {
            Kind::RateLimited => true,
            Kind::Status => self.downcast_ref::<Status>().is_some_and(|s| {
                s.status_code.is_server_error() || s.status_code == StatusCode::REQUEST_TIMEOUT
            }),
            _ => false,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.source {
            Some(src) => write!(f, "{:?}: {}", self.kind, src),
            None => write!(f, "{:?}", self.kind),
        }
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.source
            .as_deref()
            .map(|e| e as &(dyn StdError + 'static))
    }
}

#[non_exhaustive]
#[derive(Debug)]
pub struct Status {
    pub status_code: StatusCode,
    pub method: Method,
    pub path: String,
    pub message: String,
    /// Structured errors parsed from the response body, if it carried any
    pub errors: Vec<ApiError>,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "error({}) making {} call to {} with {}",
            self.status_code, self.method, self.path, self.message
        )
    }
}

impl StdError for Status {}

#[non_exhaustive]
#[derive(Debug)]
pub struct Validation {
    pub reason: String,
}

impl fmt::Display for Validation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid: {}", self.reason)
    }
}

impl StdError for Validation {}

/// HTTP 429 answer. `reset` is taken from the `X-RateLimit-Reset` header.
#[non_exhaustive]
#[derive(Debug, Clone)]
pub struct RateLimited {
    pub method: Method,
    pub path: String,
    pub reset: Option<DateTime<Utc>>,
    pub message: String,
}

impl RateLimited {
    /// Time left until the quota resets, zero if unknown or already passed.
    #[must_use]
    pub fn remaining(&self) -> Duration {
        self.reset
            .and_then(|reset| (reset - Utc::now()).to_std().ok())
            .unwrap_or_default()
    }
}

impl fmt::Display for RateLimited {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rate limited on {} {}", self.method, self.path)?;
        if let Some(reset) = self.reset {
            write!(f, " until {}", reset.to_rfc3339())?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        Ok(())
    }
}

impl StdError for RateLimited {}

/// One entry of the service's error envelope.
#[skip_serializing_none]
#[non_exhaustive]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    #[serde(default)]
    pub code: i64,
    #[serde(default)]
    pub status: u16,
    #[serde(default)]
    pub message: String,
    pub scope: Option<String>,
    pub detail: Option<String>,
    pub request_id: Option<String>,
    pub reason: Option<String>,
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)?;
        if let Some(detail) = self.detail.as_deref().filter(|d| !d.is_empty()) {
            write!(f, ": {detail}")?;
        }
        if let Some(id) = &self.request_id {
            write!(f, " (request {id})")?;
        }
        Ok(())
    }
}

impl StdError for ApiError {}

/// Error envelope `{"errors": [...]}` returned with non-successful HTTP status codes.
#[non_exhaustive]
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ApiErrors {
    #[serde(default)]
    pub errors: Vec<ApiError>,
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        Error::with_source(Kind::Internal, e)
    }
}

impl From<header::InvalidHeaderValue> for Error {
    fn from(e: header::InvalidHeaderValue) -> Self {
        Error::with_source(Kind::Internal, e)
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::with_source(Kind::Internal, e)
    }
}

impl From<url::ParseError> for Error {
    fn from(e: url::ParseError) -> Self {
        Error::with_source(Kind::Internal, e)
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::with_source(Kind::Internal, e)
    }
}

impl From<Validation> for Error {
    fn from(err: Validation) -> Self {
        Error::with_source(Kind::Validation, err)
    }
}

impl From<Status> for Error {
    fn from(err: Status) -> Self {
        Error::with_source(Kind::Status, err)
    }
}

impl From<RateLimited> for Error {
    fn from(err: RateLimited) -> Self {
        Error::with_source(Kind::RateLimited, err)
    }
}

impl From<ApiError> for Error {
    fn from(err: ApiError) -> Self {
        Error::with_source(Kind::Api, err)
    }
}
