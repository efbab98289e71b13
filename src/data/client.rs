//! Client for the Blockwatch Data API.
//!
//! # Example
//!
//! ```no_run
//! use blockwatch_client_sdk::config::Config;
//! use blockwatch_client_sdk::data::{Client, types::request::TableRequest};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = Client::from_env(Config::default())?;
//!
//! let request = TableRequest::builder()
//!     .database("BITCOIN")
//!     .dataset("BLOCK")
//!     .limit(10)
//!     .build();
//!
//! let table = client.table(&request).await?;
//! println!("{} rows, next cursor {:?}", table.len(), table.cursor);
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;

use async_stream::try_stream;
#[cfg(feature = "retry")]
use backoff::backoff::Backoff as _;
use futures::Stream;
use reqwest::{
    Client as ReqwestClient, Method, Request,
    header::{ACCEPT, HeaderMap, HeaderValue},
};
use secrecy::{ExposeSecret as _, SecretString};
use serde::Serialize;
use serde::de::DeserializeOwned;
use url::Url;

use super::types::request::{
    DatabasesRequest, DatasetRequest, DatasetsRequest, SeriesRequest, TableRequest,
};
use super::types::response::{DatabaseList, Dataset, Series, Table};
use crate::config::Config;
#[cfg(feature = "retry")]
use crate::error::RateLimited;
use crate::error::Error;
use crate::frame::{DescriptorCache, Record};
use crate::{API_KEY_VAR, Result, ToQueryParams as _};

const API_KEY_HEADER: &str = "X-API-Key";

/// HTTP client for the Blockwatch Data API.
///
/// Cloning is cheap. Clones share the connection pool and the record descriptor cache
/// used by [`Client::table_records`] and [`Client::series_records`].
///
/// # Example
///
/// ```no_run
/// use blockwatch_client_sdk::config::Config;
/// use blockwatch_client_sdk::data::Client;
///
/// let config = Config::builder().host("http://localhost:8000/v1/").build();
/// let client = Client::new("my-api-key".into(), config).unwrap();
/// ```
#[derive(Clone, Debug)]
pub struct Client {
    host: Url,
    client: ReqwestClient,
    descriptors: Arc<DescriptorCache>,
    config: Config,
}

impl Client {
    /// Creates a client authenticating with `api_key`.
    ///
    /// # Errors
    ///
    /// Returns a validation error if the key is empty, and an internal error if the host
    /// URL is invalid or the HTTP client cannot be created from `config`.
    pub fn new(api_key: SecretString, config: Config) -> Result<Client> {
        if api_key.expose_secret().trim().is_empty() {
            return Err(Error::validation("API key must not be empty"));
        }

        let mut key = HeaderValue::from_str(api_key.expose_secret())?;
        key.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(API_KEY_HEADER, key);
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let mut host = Url::parse(&config.host)?;
        if !host.path().ends_with('/') {
            let path = format!("{}/", host.path());
            host.set_path(&path);
        }

        Ok(Self {
            host,
            client: config.http_client(headers)?,
            descriptors: Arc::new(DescriptorCache::new()),
            config,
        })
    }

    /// Creates a client reading the API key from the `BLOCKWATCH_API_KEY` environment
    /// variable.
    ///
    /// # Errors
    ///
    /// Returns a validation error if the variable is unset or empty.
    pub fn from_env(config: Config) -> Result<Client> {
        let key = std::env::var(API_KEY_VAR)
            .map_err(|_missing| Error::validation(format!("{API_KEY_VAR} is not set")))?;

        Self::new(key.into(), config)
    }

    /// Returns the base URL of the API.
    #[must_use]
    pub fn host(&self) -> &Url {
        &self.host
    }

    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Record descriptors resolved by this client and its clones.
    #[must_use]
    pub fn descriptors(&self) -> &DescriptorCache {
        &self.descriptors
    }

    async fn get<Req: Serialize, Res: DeserializeOwned>(
        &self,
        path: &str,
        req: &Req,
    ) -> Result<Res> {
        let query = req.query_params();
        let request = self
            .client
            .request(Method::GET, format!("{}{path}{query}", self.host))
            .build()?;
        self.execute(request).await
    }

    #[cfg(not(feature = "retry"))]
    async fn execute<Res: DeserializeOwned>(&self, request: Request) -> Result<Res> {
        crate::request(&self.client, request, None).await
    }

    /// Sends `request`, repeating it on temporary failures while the retry budget lasts.
    /// A rate limited answer waits until the advertised reset, anything else waits for
    /// the next backoff interval.
    #[cfg(feature = "retry")]
    async fn execute<Res: DeserializeOwned>(&self, request: Request) -> Result<Res> {
        let Some(retry) = self.config.retry.clone() else {
            return crate::request(&self.client, request, None).await;
        };

        let max_attempts = retry.max_attempts;
        let mut backoff: backoff::ExponentialBackoff = retry.into();
        let mut attempt = 1_u32;

        loop {
            let Some(next) = request.try_clone() else {
                return crate::request(&self.client, request, None).await;
            };

            let err = match crate::request(&self.client, next, None).await {
                Err(err) if err.is_temporary() => err,
                result => return result,
            };

            if max_attempts.is_some_and(|max| attempt >= max) {
                return Err(err);
            }

            let wait = err
                .downcast_ref::<RateLimited>()
                .map(RateLimited::remaining)
                .filter(|wait| !wait.is_zero())
                .or_else(|| backoff.next_backoff());
            let Some(wait) = wait else {
                return Err(err);
            };

            #[cfg(feature = "tracing")]
            tracing::warn!(attempt, wait = ?wait, error = %err, "retrying request");

            tokio::time::sleep(wait).await;
            attempt = attempt.saturating_add(1);
        }
    }

    /// Lists the databases visible to the API key, one page at a time.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn databases(&self, request: &DatabasesRequest) -> Result<DatabaseList> {
        self.get("databases", request).await
    }

    /// Lists the datasets of one database.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn datasets(&self, request: &DatasetsRequest) -> Result<Vec<Dataset>> {
        self.get(&format!("databases/{}/codes.json", request.database), request)
            .await
    }

    /// Fetches the schema and metadata of one dataset.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn dataset(&self, request: &DatasetRequest) -> Result<Dataset> {
        self.get(
            &format!(
                "databases/{}/{}/metadata.json",
                request.database, request.dataset
            ),
            request,
        )
        .await
    }

    /// Fetches one page of a table.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the service reports an error in the
    /// response body, the latter as [`Kind::Api`](crate::error::Kind::Api).
    pub async fn table(&self, request: &TableRequest) -> Result<Table> {
        let mut table: Table = self
            .get(
                &format!("tables/{}/{}.json", request.database, request.dataset),
                request,
            )
            .await?;

        match table.error.take() {
            Some(err) => Err(err.into()),
            None => Ok(table),
        }
    }

    /// Streams table pages, following the cursor until the service stops returning one
    /// or returns an empty page.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use blockwatch_client_sdk::config::Config;
    /// use blockwatch_client_sdk::data::{Client, types::request::TableRequest};
    /// use futures::StreamExt as _;
    /// use tokio::pin;
    ///
    /// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
    /// let client = Client::from_env(Config::default())?;
    /// let request = TableRequest::builder()
    ///     .database("BITCOIN")
    ///     .dataset("BLOCK")
    ///     .limit(1000)
    ///     .build();
    ///
    /// let stream = client.stream_table(&request);
    /// pin!(stream);
    ///
    /// while let Some(page) = stream.next().await {
    ///     println!("page with {} rows", page?.len());
    /// }
    /// # Ok(())
    /// # }
    /// ```
    pub fn stream_table<'client>(
        &'client self,
        request: &TableRequest,
    ) -> impl Stream<Item = Result<Table>> + 'client {
        let mut request = request.clone();

        try_stream! {
            loop {
                let table = self.table(&request).await?;

                let next = table
                    .cursor
                    .clone()
                    .filter(|cursor| !table.is_empty() && request.cursor.as_ref() != Some(cursor));

                #[cfg(feature = "tracing")]
                tracing::debug!(rows = table.len(), cursor = ?next, "fetched table page");

                yield table;

                match next {
                    Some(cursor) => request.cursor = Some(cursor),
                    None => break,
                }
            }
        }
    }

    /// Fetches a time series.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the service reports an error in the
    /// response body.
    pub async fn series(&self, request: &SeriesRequest) -> Result<Series> {
        let mut series: Series = self
            .get(
                &format!("series/{}/{}.json", request.database, request.dataset),
                request,
            )
            .await?;

        match series.error.take() {
            Some(err) => Err(err.into()),
            None => Ok(series),
        }
    }

    /// Fetches one table page and binds every row into a `T`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, `T` cannot be described, or a row fails
    /// to decode.
    pub async fn table_records<T: Record + Default>(
        &self,
        request: &TableRequest,
    ) -> Result<Vec<T>> {
        let mut table = self.table(request).await?;
        table.decode_all(&self.descriptors)
    }

    /// Fetches a time series and binds every row into a `T`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, `T` cannot be described, or a row fails
    /// to decode.
    pub async fn series_records<T: Record + Default>(
        &self,
        request: &SeriesRequest,
    ) -> Result<Vec<T>> {
        let mut series = self.series(request).await?;
        series.decode_all(&self.descriptors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Kind;

    #[test]
    fn empty_api_key_should_fail() {
        let err = Client::new(" ".into(), Config::default()).unwrap_err();
        assert_eq!(err.kind(), Kind::Validation);
    }

    #[test]
    fn host_should_end_with_slash() {
        let config = Config::builder().host("http://localhost:8000/v1").build();
        let client = Client::new("key".into(), config).unwrap();

        assert_eq!(client.host().as_str(), "http://localhost:8000/v1/");
    }

    #[test]
    fn clones_should_share_descriptor_cache() {
        crate::record! {
            #[derive(Debug, Default)]
            struct Height {
                height: u64 => "height",
            }
        }

        let client = Client::new("key".into(), Config::default()).unwrap();
        let clone = client.clone();
        client.descriptors().resolve::<Height>().unwrap();

        assert_eq!(clone.descriptors().len(), 1);
    }
}
