use serde::{Deserialize, Serialize};
use serde_with::{NoneAsEmptyString, serde_as};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

/// Query parameters accepted by every list endpoint, as received.
///
/// # Pagination
/// `page` is 1-based. The page size may be sent as `rows`, `limit` or
/// `pageSize`; when several are present, `rows` wins, then `limit`.
///
/// # Filtering
/// - `filters`: JSON object, `{"role": ["ADMIN", "EMPLOYEE"], "isActive": true}`
/// - `searchFilters`: JSON object of substrings, `{"name": "jo"}`
/// - `rangedFilters`: JSON array, `[{"key": "createdAt", "start": "2024-01-01", "end": "2024-01-31"}]`
///
/// Empty values are treated as absent.
#[serde_as]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, IntoParams)]
#[serde(default, rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct RawQueryParams {
    /// Page number (1-based).
    #[param(example = "1")]
    #[serde_as(as = "NoneAsEmptyString")]
    pub page: Option<String>,
    /// Page size.
    #[param(example = "10")]
    #[serde_as(as = "NoneAsEmptyString")]
    pub limit: Option<String>,
    /// Page size; takes precedence over `limit`.
    #[serde_as(as = "NoneAsEmptyString")]
    pub rows: Option<String>,
    /// Page size; used when neither `rows` nor `limit` is given.
    #[serde_as(as = "NoneAsEmptyString")]
    pub page_size: Option<String>,
    /// JSON-encoded equality filters.
    #[param(example = r#"{"role":["ADMIN","EMPLOYEE"]}"#)]
    #[serde_as(as = "NoneAsEmptyString")]
    pub filters: Option<String>,
    /// JSON-encoded substring filters.
    #[param(example = r#"{"name":"jo"}"#)]
    #[serde_as(as = "NoneAsEmptyString")]
    pub search_filters: Option<String>,
    /// JSON-encoded inclusive ranges.
    #[param(example = r#"[{"key":"createdAt","start":"2024-01-01","end":"2024-01-31"}]"#)]
    #[serde_as(as = "NoneAsEmptyString")]
    pub ranged_filters: Option<String>,
}

impl RawQueryParams {
    /// The page size actually sent, with the name it was sent under.
    #[must_use]
    pub fn page_size(&self) -> Option<(&'static str, &str)> {
        [
            ("rows", &self.rows),
            ("limit", &self.limit),
            ("pageSize", &self.page_size),
        ]
        .into_iter()
        .find_map(|(name, value)| value.as_deref().map(|v| (name, v)))
    }
}

/// List parameters after validation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    pub page: Option<u64>,
    pub limit: Option<u64>,
    pub filters: Option<String>,
    pub search_filters: Option<String>,
    pub ranged_filters: Option<String>,
}

impl QueryParams {
    /// Best-effort conversion for callers that skip validation: numbers that
    /// do not parse are treated as absent.
    #[must_use]
    pub fn coerce(raw: &RawQueryParams) -> Self {
        let number = |value: Option<&str>| value.and_then(|v| v.trim().parse::<u64>().ok());
        Self {
            page: number(raw.page.as_deref()),
            limit: number(raw.page_size().map(|(_, v)| v)),
            filters: raw.filters.clone(),
            search_filters: raw.search_filters.clone(),
            ranged_filters: raw.ranged_filters.clone(),
        }
    }
}

/// One page of a list query.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PaginatedResult<T> {
    pub items: Vec<T>,
    pub total_count: u64,
    pub total_pages: u64,
}

/// `content` of a list response: `{entries, totalData, totalPage}`.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ListContent<T> {
    pub entries: Vec<T>,
    pub total_data: u64,
    pub total_page: u64,
}

impl<T> From<PaginatedResult<T>> for ListContent<T> {
    fn from(page: PaginatedResult<T>) -> Self {
        Self {
            entries: page.items,
            total_data: page.total_count,
            total_page: page.total_pages,
        }
    }
}

/// Outcome of a bulk delete. Every distinct requested id is in exactly one
/// of: counted in `deleted_count`, `failed_ids`, `not_found_ids`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BulkDeleteResult {
    pub deleted_count: u64,
    pub failed_ids: Vec<Uuid>,
    pub not_found_ids: Vec<Uuid>,
}

/// The envelope every endpoint answers with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ApiResponse<T> {
    pub content: Option<T>,
    pub message: String,
    pub errors: Vec<String>,
}

impl<T> ApiResponse<T> {
    pub fn ok(content: T, message: impl Into<String>) -> Self {
        Self {
            content: Some(content),
            message: message.into(),
            errors: Vec::new(),
        }
    }

    pub fn empty(message: impl Into<String>) -> Self {
        Self {
            content: None,
            message: message.into(),
            errors: Vec::new(),
        }
    }
}

impl ApiResponse<()> {
    pub fn error(message: impl Into<String>, errors: Vec<String>) -> Self {
        Self {
            content: None,
            message: message.into(),
            errors,
        }
    }
}
