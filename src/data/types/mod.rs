use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use phf::phf_map;
use serde::de::StdError;
use serde::ser::{Serialize, Serializer};
use serde_with::{DeserializeFromStr, SerializeDisplay};

use crate::error::{Error, Kind};

pub mod request;
pub mod response;

pub use crate::error::ApiError;

const MINUTE: u64 = 60;
const HOUR: u64 = 60 * MINUTE;
const DAY: u64 = 24 * HOUR;

/// Error returned when a filter, order or collapse mode string is not recognized.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub struct InvalidModeError {
    /// Which mode family was being parsed (`filter`, `order`, `collapse`).
    pub kind: &'static str,
    /// The rejected input.
    pub value: String,
}

impl InvalidModeError {
    #[must_use]
    pub fn new<S: Into<String>>(kind: &'static str, value: S) -> Self {
        Self {
            kind,
            value: value.into(),
        }
    }
}

impl fmt::Display for InvalidModeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid {} mode '{}'", self.kind, self.value)
    }
}

impl StdError for InvalidModeError {}

impl From<InvalidModeError> for Error {
    fn from(err: InvalidModeError) -> Self {
        Error::with_source(Kind::Validation, err)
    }
}

/// Comparison applied by a [`Filter`], sent as the suffix of the query key.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    SerializeDisplay,
    DeserializeFromStr,
    strum_macros::Display,
)]
#[strum(serialize_all = "lowercase")]
#[non_exhaustive]
pub enum FilterMode {
    /// Equal (default).
    #[default]
    Eq,
    /// Not equal.
    Ne,
    Gt,
    Gte,
    Lt,
    Lte,
    /// Value is one of a comma separated list.
    In,
    /// Value is none of a comma separated list.
    #[strum(serialize = "nin")]
    NotIn,
    /// Inclusive range `from,to`.
    #[strum(serialize = "rg")]
    Range,
    /// Regular expression match.
    #[strum(serialize = "re")]
    Regexp,
}

impl FromStr for FilterMode {
    type Err = InvalidModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "" | "eq" => Ok(Self::Eq),
            "ne" => Ok(Self::Ne),
            "gt" => Ok(Self::Gt),
            "gte" => Ok(Self::Gte),
            "lt" => Ok(Self::Lt),
            "lte" => Ok(Self::Lte),
            "in" => Ok(Self::In),
            "nin" => Ok(Self::NotIn),
            "rg" => Ok(Self::Range),
            "re" => Ok(Self::Regexp),
            _ => Err(InvalidModeError::new("filter", s)),
        }
    }
}

/// A single column condition, sent as `field.mode=value`.
///
/// # Example
///
/// ```
/// use blockwatch_client_sdk::data::types::{Filter, FilterMode};
///
/// let filter = Filter::parse("height.gte", "800000").unwrap();
/// assert_eq!(filter.mode, FilterMode::Gte);
/// assert_eq!(filter.key(), "height.gte");
///
/// // A key without a mode compares for equality.
/// assert_eq!(Filter::parse("coin", "btc").unwrap().mode, FilterMode::Eq);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub struct Filter {
    pub field: String,
    pub mode: FilterMode,
    pub value: String,
}

impl Filter {
    #[must_use]
    pub fn new<F: Into<String>, V: Into<String>>(field: F, mode: FilterMode, value: V) -> Self {
        Self {
            field: field.into(),
            mode,
            value: value.into(),
        }
    }

    /// Parses a query key of the form `field` or `field.mode`.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidModeError`] when the mode suffix is not recognized.
    pub fn parse<V: Into<String>>(key: &str, value: V) -> Result<Self, InvalidModeError> {
        let mut parts = key.split('.');
        let field = parts.next().unwrap_or_default();
        let mode = match (parts.next(), parts.next()) {
            (Some(mode), None) => mode.parse()?,
            _ => FilterMode::Eq,
        };

        Ok(Self::new(field, mode, value))
    }

    /// Query parameter name for this filter.
    #[must_use]
    pub fn key(&self) -> String {
        format!("{}.{}", self.field, self.mode)
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}={}", self.field, self.mode, self.value)
    }
}

/// An ordered set of [`Filter`]s. Serializes as one query parameter per filter, so the
/// same column may appear more than once.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[non_exhaustive]
pub struct Filters(Vec<Filter>);

impl Filters {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a filter and returns the set, for chaining.
    #[must_use]
    pub fn with(mut self, filter: Filter) -> Self {
        self.0.push(filter);
        self
    }

    pub fn push(&mut self, filter: Filter) {
        self.0.push(filter);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Filter> {
        self.0.iter()
    }
}

impl From<Vec<Filter>> for Filters {
    fn from(filters: Vec<Filter>) -> Self {
        Self(filters)
    }
}

impl FromIterator<Filter> for Filters {
    fn from_iter<I: IntoIterator<Item = Filter>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'filters> IntoIterator for &'filters Filters {
    type Item = &'filters Filter;
    type IntoIter = std::slice::Iter<'filters, Filter>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl Serialize for Filters {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.0.iter().map(|filter| (filter.key(), &filter.value)))
    }
}

/// Sort direction of a time series.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    SerializeDisplay,
    DeserializeFromStr,
    strum_macros::Display,
)]
#[strum(serialize_all = "lowercase")]
#[non_exhaustive]
pub enum OrderMode {
    Asc,
    /// Newest first (default).
    #[default]
    Desc,
}

impl FromStr for OrderMode {
    type Err = InvalidModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "asc" => Ok(Self::Asc),
            "" | "desc" => Ok(Self::Desc),
            _ => Err(InvalidModeError::new("order", s)),
        }
    }
}

/// Aggregation interval of a time series.
///
/// Parsing accepts both the short wire codes (`1m`, `1d`, `3M`) and the long names
/// (`oneminute`, `daily`, `quarterly`). Codes are case-sensitive, `1m` is a minute and
/// `1M` a month.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    SerializeDisplay,
    DeserializeFromStr,
    strum_macros::Display,
)]
#[non_exhaustive]
pub enum CollapseMode {
    /// Raw, uncollapsed data.
    #[default]
    #[strum(serialize = "none")]
    None,
    #[strum(serialize = "1m")]
    OneMinute,
    #[strum(serialize = "5m")]
    FiveMinutes,
    #[strum(serialize = "15m")]
    FifteenMinutes,
    #[strum(serialize = "30m")]
    ThirtyMinutes,
    #[strum(serialize = "1h")]
    OneHour,
    #[strum(serialize = "3h")]
    ThreeHours,
    #[strum(serialize = "6h")]
    SixHours,
    #[strum(serialize = "12h")]
    TwelveHours,
    #[strum(serialize = "1d")]
    Daily,
    #[strum(serialize = "1w")]
    Weekly,
    #[strum(serialize = "1M")]
    Monthly,
    #[strum(serialize = "3M")]
    Quarterly,
    #[strum(serialize = "1y")]
    Annual,
}

static COLLAPSE_MODES: phf::Map<&'static str, CollapseMode> = phf_map! {
    "" => CollapseMode::None,
    "none" => CollapseMode::None,
    "1m" => CollapseMode::OneMinute,
    "oneminute" => CollapseMode::OneMinute,
    "5m" => CollapseMode::FiveMinutes,
    "fiveminutes" => CollapseMode::FiveMinutes,
    "15m" => CollapseMode::FifteenMinutes,
    "fifteenminutes" => CollapseMode::FifteenMinutes,
    "30m" => CollapseMode::ThirtyMinutes,
    "thirtyminutes" => CollapseMode::ThirtyMinutes,
    "1h" => CollapseMode::OneHour,
    "onehour" => CollapseMode::OneHour,
    "3h" => CollapseMode::ThreeHours,
    "threehours" => CollapseMode::ThreeHours,
    "6h" => CollapseMode::SixHours,
    "sixhours" => CollapseMode::SixHours,
    "12h" => CollapseMode::TwelveHours,
    "twelvehours" => CollapseMode::TwelveHours,
    "1d" => CollapseMode::Daily,
    "daily" => CollapseMode::Daily,
    "1w" => CollapseMode::Weekly,
    "weekly" => CollapseMode::Weekly,
    "1M" => CollapseMode::Monthly,
    "monthly" => CollapseMode::Monthly,
    "3M" => CollapseMode::Quarterly,
    "1q" => CollapseMode::Quarterly,
    "quarterly" => CollapseMode::Quarterly,
    "1y" => CollapseMode::Annual,
    "annual" => CollapseMode::Annual,
};

impl FromStr for CollapseMode {
    type Err = InvalidModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        COLLAPSE_MODES
            .get(s)
            .copied()
            .ok_or_else(|| InvalidModeError::new("collapse", s))
    }
}

impl CollapseMode {
    /// Smallest interval that covers `window`. Months count as 31 days and quarters as
    /// 92 days here, anything longer collapses annually.
    #[must_use]
    pub fn from_duration(window: Duration) -> Self {
        if window.is_zero() {
            return Self::None;
        }

        [
            (MINUTE, Self::OneMinute),
            (5 * MINUTE, Self::FiveMinutes),
            (15 * MINUTE, Self::FifteenMinutes),
            (30 * MINUTE, Self::ThirtyMinutes),
            (HOUR, Self::OneHour),
            (3 * HOUR, Self::ThreeHours),
            (6 * HOUR, Self::SixHours),
            (12 * HOUR, Self::TwelveHours),
            (DAY, Self::Daily),
            (7 * DAY, Self::Weekly),
            (31 * DAY, Self::Monthly),
            (92 * DAY, Self::Quarterly),
        ]
        .into_iter()
        .find(|(limit, _)| window <= Duration::from_secs(*limit))
        .map_or(Self::Annual, |(_, mode)| mode)
    }

    /// Nominal length of one interval. Months are 30 days, quarters 90 and years 365.
    /// [`CollapseMode::None`] has no interval and returns zero.
    #[must_use]
    pub const fn duration(self) -> Duration {
        let secs = match self {
            Self::None => 0,
            Self::OneMinute => MINUTE,
            Self::FiveMinutes => 5 * MINUTE,
            Self::FifteenMinutes => 15 * MINUTE,
            Self::ThirtyMinutes => 30 * MINUTE,
            Self::OneHour => HOUR,
            Self::ThreeHours => 3 * HOUR,
            Self::SixHours => 6 * HOUR,
            Self::TwelveHours => 12 * HOUR,
            Self::Daily => DAY,
            Self::Weekly => 7 * DAY,
            Self::Monthly => 30 * DAY,
            Self::Quarterly => 90 * DAY,
            Self::Annual => 365 * DAY,
        };
        Duration::from_secs(secs)
    }
}
