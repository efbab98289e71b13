//! Re-exported types from external crates for convenience.
//!
//! These types appear in record fields and API responses and are re-exported here
//! so users don't need to add these dependencies to their `Cargo.toml`.

/// Date and time types for record timestamps and series ranges.
pub use chrono::{DateTime, TimeDelta, Utc};
/// Secret string type used for API keys and proxy passwords.
pub use secrecy::SecretString;
