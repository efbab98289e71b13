//! Connection configuration.
//!
//! [`Config`] can be built in code with [`Config::builder`] or deserialized from a
//! configuration file (durations in milliseconds):
//!
//! ```
//! use std::time::Duration;
//!
//! use blockwatch_client_sdk::config::Config;
//!
//! let config: Config = serde_json::from_str(r#"{ "response_timeout": 30000 }"#).unwrap();
//! assert_eq!(config.response_timeout, Duration::from_secs(30));
//! assert_eq!(config.connect_timeout, Duration::from_secs(5));
//! ```

use std::path::PathBuf;
use std::time::Duration;

#[cfg(feature = "retry")]
use backoff::{ExponentialBackoff, ExponentialBackoffBuilder};
use bon::Builder;
use reqwest::header::{self, HeaderMap, HeaderValue};
use reqwest::tls::Version;
use reqwest::{Certificate, Client as ReqwestClient, Identity, Proxy};
use secrecy::{ExposeSecret as _, SecretString};
use serde::Deserialize;
use serde_repr::Deserialize_repr;
use serde_with::{DurationMilliSeconds, serde_as};

use crate::Result;
use crate::error::Error;

/// Default API endpoint.
pub const DEFAULT_HOST: &str = "https://data.blockwatch.cc/v1/";

const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);
const DEFAULT_KEEP_ALIVE: Duration = Duration::from_secs(180);
const DEFAULT_IDLE_TIMEOUT: Duration = Duration::from_secs(180);
const DEFAULT_RESPONSE_TIMEOUT: Duration = Duration::from_secs(5);
const DEFAULT_MAX_IDLE_CONNS: usize = 2;

#[must_use]
pub fn default_user_agent() -> String {
    format!("Blockwatch-Data-SDK/{}", env!("CARGO_PKG_VERSION"))
}

/// Minimum or maximum TLS protocol version, numbered like the service's own configs.
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize_repr)]
#[repr(u8)]
pub enum TlsVersion {
    Tls10 = 1,
    Tls11 = 2,
    Tls12 = 3,
    Tls13 = 4,
}

impl From<TlsVersion> for Version {
    fn from(version: TlsVersion) -> Self {
        match version {
            TlsVersion::Tls10 => Version::TLS_1_0,
            TlsVersion::Tls11 => Version::TLS_1_1,
            TlsVersion::Tls12 => Version::TLS_1_2,
            TlsVersion::Tls13 => Version::TLS_1_3,
        }
    }
}

/// Configuration for the HTTP connection to the API.
#[serde_as]
#[non_exhaustive]
#[derive(Debug, Clone, Builder, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Base URL of the API, a trailing slash is added if missing
    #[builder(into, default = DEFAULT_HOST.to_owned())]
    pub host: String,
    #[builder(into, default = default_user_agent())]
    pub user_agent: String,
    /// Timeout for establishing a TCP connection
    #[serde_as(as = "DurationMilliSeconds<u64>")]
    #[builder(default = DEFAULT_CONNECT_TIMEOUT)]
    pub connect_timeout: Duration,
    /// TCP keep-alive interval
    #[serde_as(as = "DurationMilliSeconds<u64>")]
    #[builder(default = DEFAULT_KEEP_ALIVE)]
    pub keep_alive: Duration,
    /// How long an idle pooled connection is kept
    #[serde_as(as = "DurationMilliSeconds<u64>")]
    #[builder(default = DEFAULT_IDLE_TIMEOUT)]
    pub idle_timeout: Duration,
    /// Maximum time to wait for response data once a request is sent
    #[serde_as(as = "DurationMilliSeconds<u64>")]
    #[builder(default = DEFAULT_RESPONSE_TIMEOUT)]
    pub response_timeout: Duration,
    /// Idle connections kept per host
    #[builder(default = DEFAULT_MAX_IDLE_CONNS)]
    pub max_idle_conns: usize,
    /// Proxy URL used for all requests
    #[builder(into)]
    pub proxy: Option<String>,
    #[builder(into)]
    pub proxy_user: Option<String>,
    #[builder(into)]
    pub proxy_pass: Option<SecretString>,
    /// Skip server certificate verification
    #[builder(default)]
    pub allow_insecure_certs: bool,
    pub tls_min_version: Option<TlsVersion>,
    pub tls_max_version: Option<TlsVersion>,
    /// Extra trusted root certificates (PEM bundle)
    #[builder(into)]
    pub root_ca_certs: Option<String>,
    #[builder(into)]
    pub root_ca_file: Option<PathBuf>,
    /// Client certificate (PEM), paired with `client_key`
    #[builder(into)]
    pub client_cert: Option<String>,
    #[builder(into)]
    pub client_key: Option<SecretString>,
    #[builder(into)]
    pub client_cert_file: Option<PathBuf>,
    #[builder(into)]
    pub client_key_file: Option<PathBuf>,
    /// Retry policy for rate limited and other temporary failures, `None` disables retries.
    /// Only honored with the `retry` feature.
    pub retry: Option<RetryConfig>,
}

impl Default for Config {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl Config {
    /// Builds the HTTP client for this configuration, sending `headers` with every request.
    pub fn http_client(&self, mut headers: HeaderMap) -> Result<ReqwestClient> {
        headers.insert(header::USER_AGENT, HeaderValue::from_str(&self.user_agent)?);

        let mut builder = ReqwestClient::builder()
            .default_headers(headers)
            .connect_timeout(self.connect_timeout)
            .read_timeout(self.response_timeout)
            .tcp_keepalive(self.keep_alive)
            .pool_idle_timeout(self.idle_timeout)
            .pool_max_idle_per_host(self.max_idle_conns)
            .danger_accept_invalid_certs(self.allow_insecure_certs);

        if let Some(proxy) = &self.proxy {
            let mut proxy = Proxy::all(proxy.as_str())?;
            if let Some(user) = &self.proxy_user {
                let pass = self
                    .proxy_pass
                    .as_ref()
                    .map_or("", |pass| pass.expose_secret());
                proxy = proxy.basic_auth(user, pass);
            }
            builder = builder.proxy(proxy);
        }

        if let Some(version) = self.tls_min_version {
            builder = builder.min_tls_version(version.into());
        }
        if let Some(version) = self.tls_max_version {
            builder = builder.max_tls_version(version.into());
        }

        for pem in self.root_certificates()? {
            for cert in Certificate::from_pem_bundle(&pem)? {
                builder = builder.add_root_certificate(cert);
            }
        }

        if let Some(identity) = self.identity()? {
            builder = builder.identity(identity);
        }

        Ok(builder.build()?)
    }

    fn root_certificates(&self) -> Result<Vec<Vec<u8>>> {
        let mut pems = Vec::new();
        if let Some(certs) = &self.root_ca_certs {
            pems.push(certs.as_bytes().to_vec());
        }
        if let Some(path) = &self.root_ca_file {
            pems.push(std::fs::read(path)?);
        }
        Ok(pems)
    }

    fn identity(&self) -> Result<Option<Identity>> {
        let cert = match (&self.client_cert, &self.client_cert_file) {
            (Some(pem), _) => pem.as_bytes().to_vec(),
            (None, Some(path)) => std::fs::read(path)?,
            (None, None) => return Ok(None),
        };
        let key = match (&self.client_key, &self.client_key_file) {
            (Some(pem), _) => pem.expose_secret().as_bytes().to_vec(),
            (None, Some(path)) => std::fs::read(path)?,
            (None, None) => {
                return Err(Error::validation(
                    "client certificate configured without a client key",
                ));
            }
        };

        let mut pem = cert;
        pem.push(b'\n');
        pem.extend_from_slice(&key);
        Ok(Some(Identity::from_pem(&pem)?))
    }
}

const DEFAULT_MAX_ATTEMPTS: u32 = 3;
const DEFAULT_INITIAL_BACKOFF: Duration = Duration::from_secs(1);
const DEFAULT_MAX_BACKOFF: Duration = Duration::from_secs(60);
const DEFAULT_BACKOFF_MULTIPLIER: f64 = 2.0;

/// Retry behavior for temporary request failures.
#[expect(
    clippy::module_name_repetitions,
    reason = "Configuration types intentionally mirror the module name for clarity"
)]
#[serde_as]
#[non_exhaustive]
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Maximum number of attempts including the first one. `None` retries forever.
    pub max_attempts: Option<u32>,
    #[serde_as(as = "DurationMilliSeconds<u64>")]
    pub initial_backoff: Duration,
    #[serde_as(as = "DurationMilliSeconds<u64>")]
    pub max_backoff: Duration,
    pub backoff_multiplier: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: Some(DEFAULT_MAX_ATTEMPTS),
            initial_backoff: DEFAULT_INITIAL_BACKOFF,
            max_backoff: DEFAULT_MAX_BACKOFF,
            backoff_multiplier: DEFAULT_BACKOFF_MULTIPLIER,
        }
    }
}

#[cfg(feature = "retry")]
impl From<RetryConfig> for ExponentialBackoff {
    fn from(config: RetryConfig) -> Self {
        ExponentialBackoffBuilder::default()
            .with_initial_interval(config.initial_backoff)
            .with_max_interval(config.max_backoff)
            .with_multiplier(config.backoff_multiplier)
            .with_max_elapsed_time(None)
            .build()
    }
}
