#![cfg_attr(doc, doc = include_str!("../README.md"))]

#[cfg(feature = "blockchain")]
pub mod blockchain;
pub mod config;
#[cfg(feature = "data")]
pub mod data;
pub mod error;
pub mod frame;
#[cfg(feature = "market")]
pub mod market;
#[cfg(feature = "data")]
pub(crate) mod serde_helpers;
pub mod types;

#[cfg(feature = "data")]
use chrono::DateTime;
#[cfg(feature = "data")]
use reqwest::{Request, StatusCode, header::HeaderMap};
use serde::Serialize;
#[cfg(feature = "data")]
use serde::de::DeserializeOwned;

use crate::error::Error;
#[cfg(feature = "data")]
use crate::error::{ApiErrors, RateLimited, Status};

pub type Result<T> = std::result::Result<T, Error>;

/// Environment variable read by [`data::Client::from_env`].
pub const API_KEY_VAR: &str = "BLOCKWATCH_API_KEY";

/// Response header carrying the unix time (seconds) at which the request quota resets.
pub const RATE_LIMIT_RESET_HEADER: &str = "X-RateLimit-Reset";

/// Trait for converting request types to URL query parameters.
///
/// This trait is automatically implemented for all types that implement [`Serialize`].
/// It uses [`serde_html_form`] to serialize the struct fields into a query string.
pub trait ToQueryParams: Serialize {
    /// Converts the request to a URL query string.
    ///
    /// Returns an empty string if no parameters are set, otherwise a string starting
    /// with `?` followed by URL-encoded key-value pairs.
    fn query_params(&self) -> String {
        let params = serde_html_form::to_string(self)
            .inspect_err(|e| {
                #[cfg(feature = "tracing")]
                tracing::error!("Unable to convert to URL-encoded string {e:?}");
                #[cfg(not(feature = "tracing"))]
                let _: &serde_html_form::ser::Error = e;
            })
            .unwrap_or_default();

        if params.is_empty() {
            String::new()
        } else {
            format!("?{params}")
        }
    }
}

impl<T: Serialize> ToQueryParams for T {}

#[cfg(feature = "data")]
#[cfg_attr(
    feature = "tracing",
    tracing::instrument(
        level = "debug",
        skip(client, request, headers),
        fields(
            method = %request.method(),
            path = request.url().path(),
            status_code
        )
    )
)]
async fn request<Response: DeserializeOwned>(
    client: &reqwest::Client,
    mut request: Request,
    headers: Option<HeaderMap>,
) -> Result<Response> {
    let method = request.method().clone();
    let path = request.url().path().to_owned();

    if let Some(h) = headers {
        request.headers_mut().extend(h);
    }

    let response = client.execute(request).await?;
    let status_code = response.status();

    #[cfg(feature = "tracing")]
    tracing::Span::current().record("status_code", status_code.as_u16());

    if status_code == StatusCode::TOO_MANY_REQUESTS {
        let reset = response
            .headers()
            .get(RATE_LIMIT_RESET_HEADER)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.trim().parse::<i64>().ok())
            .and_then(|secs| DateTime::from_timestamp(secs, 0));
        let message = response.text().await.unwrap_or_default();

        #[cfg(feature = "tracing")]
        tracing::warn!(
            method = %method,
            path = %path,
            reset = ?reset,
            "API request rate limited"
        );

        return Err(RateLimited {
            method,
            path,
            reset,
            message,
        }
        .into());
    }

    if !status_code.is_success() {
        let body = response.text().await.unwrap_or_default();
        let errors = serde_json::from_str::<ApiErrors>(&body)
            .map(|envelope| envelope.errors)
            .unwrap_or_default();
        let message = errors.first().map_or(body, ToString::to_string);

        #[cfg(feature = "tracing")]
        tracing::warn!(
            status = %status_code,
            method = %method,
            path = %path,
            message = %message,
            "API request failed"
        );

        return Err(Status {
            status_code,
            method,
            path,
            message,
            errors,
        }
        .into());
    }

    // Read as text so dataframe rows keep their numerals exactly as sent.
    let body = response.text().await?;
    if status_code == StatusCode::NO_CONTENT || body.trim().is_empty() {
        #[cfg(feature = "tracing")]
        tracing::warn!(
            status = %status_code,
            method = %method,
            path = %path,
            "API response has no body"
        );
        return Err(Error::status(
            status_code,
            method,
            path,
            "Empty response body",
        ));
    }

    let response_data: Option<Response> = serde_helpers::deserialize_with_warnings(&body)?;

    if let Some(response) = response_data {
        Ok(response)
    } else {
        #[cfg(feature = "tracing")]
        tracing::warn!(method = %method, path = %path, "API resource not found");
        Err(Error::status(
            StatusCode::NOT_FOUND,
            method,
            path,
            "Unable to find requested resource",
        ))
    }
}
