//! Decoding of the three JSON-in-querystring filter blobs.
//!
//! Each blob is decoded against an explicit shape. Anything that is not valid
//! JSON, or is JSON of the wrong shape, is malformed. The lenient entry points
//! turn malformed input into the empty structure; the strict ones report it.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// A single filter operand as sent by the client.
///
/// Variant order matters for decoding: `1` is an `Integer`, `1.5` a `Float`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Bool(bool),
    Integer(i64),
    Float(f64),
    Text(String),
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::Integer(i) => write!(f, "{i}"),
            Self::Float(x) => write!(f, "{x}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for Scalar {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for Scalar {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<i64> for Scalar {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<bool> for Scalar {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<uuid::Uuid> for Scalar {
    fn from(value: uuid::Uuid) -> Self {
        Self::Text(value.to_string())
    }
}

/// Right-hand side of an equality filter: one value, or a set to match against.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FilterValue {
    One(Scalar),
    Many(Vec<Scalar>),
}

/// `{"field": value | [values]}`
pub type FilterQuery = BTreeMap<String, FilterValue>;

/// `{"field": "fragment"}`
pub type SearchFilterQuery = BTreeMap<String, String>;

/// Inclusive interval on one field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RangedFilter {
    #[serde(alias = "field")]
    pub key: String,
    pub start: Scalar,
    pub end: Scalar,
}

/// Which of the three filter parameters a decoding failure came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterParam {
    Filters,
    SearchFilters,
    RangedFilters,
}

impl FilterParam {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Filters => "filters",
            Self::SearchFilters => "searchFilters",
            Self::RangedFilters => "rangedFilters",
        }
    }
}

/// A filter parameter that was present but could not be decoded.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{}: {reason}", param.as_str())]
pub struct MalformedFilterInput {
    pub param: FilterParam,
    pub reason: String,
}

fn decode<T>(raw: Option<&str>, param: FilterParam) -> Result<T, MalformedFilterInput>
where
    T: for<'de> Deserialize<'de> + Default,
{
    match raw.map(str::trim) {
        None | Some("") => Ok(T::default()),
        Some(text) => serde_json::from_str(text).map_err(|e| MalformedFilterInput {
            param,
            reason: e.to_string(),
        }),
    }
}

fn lenient<T: Default>(result: Result<T, MalformedFilterInput>) -> T {
    result.unwrap_or_else(|err| {
        tracing::debug!(param = err.param.as_str(), reason = %err.reason, "Ignoring malformed filter input");
        T::default()
    })
}

/// Decode `filters`, failing on malformed input.
///
/// # Errors
/// Returns `MalformedFilterInput` when the string is not a JSON object of scalars or scalar arrays.
pub fn try_parse_filters(raw: Option<&str>) -> Result<FilterQuery, MalformedFilterInput> {
    decode(raw, FilterParam::Filters)
}

/// Decode `searchFilters`, failing on malformed input.
///
/// # Errors
/// Returns `MalformedFilterInput` when the string is not a JSON object of strings.
pub fn try_parse_search_filters(
    raw: Option<&str>,
) -> Result<SearchFilterQuery, MalformedFilterInput> {
    decode(raw, FilterParam::SearchFilters)
}

/// Decode `rangedFilters`, failing on malformed input.
///
/// # Errors
/// Returns `MalformedFilterInput` when the string is not a JSON array of `{key, start, end}`.
pub fn try_parse_ranged_filters(
    raw: Option<&str>,
) -> Result<Vec<RangedFilter>, MalformedFilterInput> {
    decode(raw, FilterParam::RangedFilters)
}

#[must_use]
pub fn parse_filters(raw: Option<&str>) -> FilterQuery {
    lenient(try_parse_filters(raw))
}

#[must_use]
pub fn parse_search_filters(raw: Option<&str>) -> SearchFilterQuery {
    lenient(try_parse_search_filters(raw))
}

#[must_use]
pub fn parse_ranged_filters(raw: Option<&str>) -> Vec<RangedFilter> {
    lenient(try_parse_ranged_filters(raw))
}

/// The three decoded filter structures of one request.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedFilters {
    pub filters: FilterQuery,
    pub search: SearchFilterQuery,
    pub ranges: Vec<RangedFilter>,
}

impl ParsedFilters {
    #[must_use]
    pub fn lenient(filters: Option<&str>, search: Option<&str>, ranges: Option<&str>) -> Self {
        Self {
            filters: parse_filters(filters),
            search: parse_search_filters(search),
            ranges: parse_ranged_filters(ranges),
        }
    }

    /// Decode all three parameters, collecting every malformed one.
    ///
    /// # Errors
    /// Returns one `MalformedFilterInput` per parameter that failed to decode.
    pub fn strict(
        filters: Option<&str>,
        search: Option<&str>,
        ranges: Option<&str>,
    ) -> Result<Self, Vec<MalformedFilterInput>> {
        let filters = try_parse_filters(filters);
        let search = try_parse_search_filters(search);
        let ranges = try_parse_ranged_filters(ranges);
        match (filters, search, ranges) {
            (Ok(filters), Ok(search), Ok(ranges)) => Ok(Self {
                filters,
                search,
                ranges,
            }),
            (filters, search, ranges) => Err([filters.err(), search.err(), ranges.err()]
                .into_iter()
                .flatten()
                .collect()),
        }
    }
}
