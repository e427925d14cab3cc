//! Validation of raw list parameters.
//!
//! Query strings arrive untyped. A [`QuerySchema`] turns a [`RawQueryParams`]
//! into typed [`QueryParams`] or a list of per-field failures; the list query
//! never reaches the store when validation fails.

use serde::Serialize;
use std::fmt;

use crate::models::{QueryParams, RawQueryParams};

/// Validation error with field name and message
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationError {
    /// The field that failed validation
    pub field: String,
    /// Human-readable error message
    pub message: String,
}

impl ValidationError {
    #[must_use]
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl std::error::Error for ValidationError {}

/// Collection of validation errors
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationErrors {
    errors: Vec<ValidationError>,
}

impl ValidationErrors {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    #[must_use]
    pub fn errors(&self) -> &[ValidationError] {
        &self.errors
    }

    /// Find the message for `field`, if it failed.
    #[must_use]
    pub fn message_for(&self, field: &str) -> Option<&str> {
        self.errors
            .iter()
            .find(|e| e.field == field)
            .map(|e| e.message.as_str())
    }

    /// `Ok(value)` when nothing was recorded.
    ///
    /// # Errors
    /// Returns `self` when at least one error was recorded.
    pub fn into_result<T>(self, value: T) -> Result<T, Self> {
        if self.is_empty() { Ok(value) } else { Err(self) }
    }
}

impl From<ValidationError> for ValidationErrors {
    fn from(error: ValidationError) -> Self {
        Self {
            errors: vec![error],
        }
    }
}

impl FromIterator<ValidationError> for ValidationErrors {
    fn from_iter<I: IntoIterator<Item = ValidationError>>(iter: I) -> Self {
        Self {
            errors: iter.into_iter().collect(),
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Validation failed with {} error(s):", self.errors.len())?;
        for error in &self.errors {
            write!(f, "\n  - {error}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

/// Turns raw list parameters into typed ones.
pub trait QuerySchema: Send + Sync {
    /// # Errors
    /// Returns every field that failed, not just the first.
    fn validate(&self, raw: &RawQueryParams) -> Result<QueryParams, ValidationErrors>;
}

/// The schema shared by all list endpoints: `page` and the page size must be
/// positive integers when present. Filter blobs pass through untouched.
#[derive(Debug, Clone, Copy, Default)]
pub struct BaseQuerySchema;

fn positive_integer(
    field: &str,
    raw: Option<&str>,
    errors: &mut ValidationErrors,
) -> Option<u64> {
    let text = raw?.trim();
    match text.parse::<u64>() {
        Ok(0) => {
            errors.add(ValidationError::new(field, "Must be at least 1"));
            None
        }
        Ok(n) => Some(n),
        Err(_) => {
            errors.add(ValidationError::new(
                field,
                format!("Expected a positive integer, received '{text}'"),
            ));
            None
        }
    }
}

impl QuerySchema for BaseQuerySchema {
    fn validate(&self, raw: &RawQueryParams) -> Result<QueryParams, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        let page = positive_integer("page", raw.page.as_deref(), &mut errors);
        let limit = raw
            .page_size()
            .and_then(|(field, value)| positive_integer(field, Some(value), &mut errors));

        errors.into_result(QueryParams {
            page,
            limit,
            filters: raw.filters.clone(),
            search_filters: raw.search_filters.clone(),
            ranged_filters: raw.ranged_filters.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(page: Option<&str>, limit: Option<&str>) -> RawQueryParams {
        RawQueryParams {
            page: page.map(String::from),
            limit: limit.map(String::from),
            ..RawQueryParams::default()
        }
    }

    #[test]
    fn test_numeric_strings_are_coerced() {
        let params = BaseQuerySchema.validate(&raw(Some("2"), Some(" 25 "))).unwrap();
        assert_eq!(params.page, Some(2));
        assert_eq!(params.limit, Some(25));
    }

    #[test]
    fn test_absent_values_stay_absent() {
        let params = BaseQuerySchema.validate(&RawQueryParams::default()).unwrap();
        assert_eq!(params.page, None);
        assert_eq!(params.limit, None);
    }

    #[test]
    fn test_every_bad_field_is_reported() {
        let err = BaseQuerySchema.validate(&raw(Some("two"), Some("0"))).unwrap_err();
        assert_eq!(err.len(), 2);
        assert!(err.message_for("page").unwrap().contains("'two'"));
        assert_eq!(err.message_for("limit"), Some("Must be at least 1"));
    }

    #[test]
    fn test_error_reported_under_alias_used() {
        let params = RawQueryParams {
            rows: Some("-1".into()),
            ..RawQueryParams::default()
        };
        let err = BaseQuerySchema.validate(&params).unwrap_err();
        assert!(err.message_for("rows").is_some());
    }

    #[test]
    fn test_display_lists_each_error() {
        let errors: ValidationErrors = vec![
            ValidationError::new("page", "bad"),
            ValidationError::new("limit", "worse"),
        ]
        .into_iter()
        .collect();
        let text = errors.to_string();
        assert!(text.starts_with("Validation failed with 2 error(s):"));
        assert!(text.contains("page: bad"));
        assert!(text.contains("limit: worse"));
    }
}
