#![cfg(feature = "data")]
#![allow(
    clippy::unwrap_used,
    clippy::missing_panics_doc,
    reason = "Do not need additional syntax for setting up tests, and https://github.com/rust-lang/rust-clippy/issues/13981"
)]
#![allow(
    unused,
    reason = "Deeply nested uses in sub-modules are falsely flagged as being unused"
)]

use blockwatch_client_sdk::config::Config;
use blockwatch_client_sdk::data::Client;
use httpmock::MockServer;
use serde_json::{Value, json};

pub const API_KEY: &str = "test-api-key";
pub const API_KEY_HEADER: &str = "x-api-key";

#[must_use]
pub fn config(server: &MockServer) -> Config {
    Config::builder().host(server.url("/v1/")).build()
}

#[must_use]
pub fn client(server: &MockServer) -> Client {
    Client::new(API_KEY.into(), config(server)).unwrap()
}

/// Schema of the `BITCOIN/BLOCK` table as served by the API.
#[must_use]
pub fn block_columns() -> Value {
    json!([
        { "name": "Height", "code": "height", "type": "uint64" },
        { "name": "Time", "code": "time", "type": "datetime" },
        { "name": "Hash", "code": "hash", "type": "string" },
        { "name": "Transactions", "code": "n_tx", "type": "uint64" },
        { "name": "Volume", "code": "volume", "type": "float64" },
        { "name": "Coinbase", "code": "coinbase", "type": "bytes" }
    ])
}

#[must_use]
pub fn block_rows() -> Value {
    json!([
        [800_000, 1_690_168_629_000_i64, "00000000000000000002a7c4", 3721, 1234.5, "03"],
        [800_001, 1_690_169_200_000_i64, "000000000000000000013ab0", 2954, 987.25, "0a0b"]
    ])
}
