//! Delete-by-ids with a per-id outcome.
//!
//! Each distinct id lands in exactly one of: deleted, `not_found_ids`, or
//! `failed_ids`. One id failing never aborts the rest.

use std::collections::HashSet;
use uuid::Uuid;

use crate::core::{EntityStore, ListResource};
use crate::models::BulkDeleteResult;

/// Why a bulk-delete request was refused before touching the store.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BatchIdsError {
    #[error("IDs parameter is required for bulk delete")]
    Missing,
    #[error("Invalid IDs format")]
    InvalidFormat(String),
    #[error("IDs must be a non-empty array")]
    Empty,
}

impl BatchIdsError {
    /// Detail line for the response `errors` array.
    #[must_use]
    pub fn detail(&self) -> String {
        match self {
            Self::Missing => "Provide ids as a JSON array in the 'ids' query parameter".into(),
            Self::InvalidFormat(reason) => {
                format!("IDs must be a valid JSON array of UUIDs: {reason}")
            }
            Self::Empty => "At least one ID must be provided".into(),
        }
    }
}

/// Non-empty, duplicate-free list of ids in first-occurrence order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchIds(Vec<Uuid>);

impl BatchIds {
    /// # Errors
    /// `BatchIdsError::Empty` when no ids are given.
    pub fn new(ids: impl IntoIterator<Item = Uuid>) -> Result<Self, BatchIdsError> {
        let mut seen = HashSet::new();
        let unique: Vec<Uuid> = ids.into_iter().filter(|id| seen.insert(*id)).collect();
        if unique.is_empty() {
            return Err(BatchIdsError::Empty);
        }
        Ok(Self(unique))
    }

    /// Decode the `ids` query parameter, a JSON array of UUID strings.
    ///
    /// # Errors
    /// `Missing` when absent or blank, `InvalidFormat` when it is not a JSON
    /// array of UUIDs, `Empty` when the array has no elements.
    pub fn from_query(raw: Option<&str>) -> Result<Self, BatchIdsError> {
        let raw = raw.map(str::trim).filter(|s| !s.is_empty());
        let Some(raw) = raw else {
            return Err(BatchIdsError::Missing);
        };
        let ids: Vec<Uuid> = serde_json::from_str(raw)
            .map_err(|e| BatchIdsError::InvalidFormat(e.to_string()))?;
        Self::new(ids)
    }

    #[must_use]
    pub fn as_slice(&self) -> &[Uuid] {
        &self.0
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always false for a constructed batch.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Delete every id in `ids`, one at a time, in order.
///
/// A failed lookup or delete puts the id in `failed_ids`; a missing row puts
/// it in `not_found_ids`. The call itself never fails.
pub async fn bulk_delete<R, S>(store: &S, ids: &BatchIds) -> BulkDeleteResult
where
    R: ListResource,
    S: EntityStore<R> + ?Sized,
{
    let mut result = BulkDeleteResult::default();

    for &id in ids.as_slice() {
        match store.find_unique(id).await {
            Ok(Some(_)) => {}
            Ok(None) => {
                result.not_found_ids.push(id);
                continue;
            }
            Err(e) => {
                tracing::warn!(resource = R::RESOURCE_NAME_PLURAL, %id, error = %e, "Lookup failed during bulk delete");
                result.failed_ids.push(id);
                continue;
            }
        }
        match store.delete(id).await {
            Ok(()) => result.deleted_count += 1,
            Err(e) => {
                tracing::warn!(resource = R::RESOURCE_NAME_PLURAL, %id, error = %e, "Failed to delete");
                result.failed_ids.push(id);
            }
        }
    }

    tracing::debug!(
        resource = R::RESOURCE_NAME_PLURAL,
        requested = ids.len(),
        deleted = result.deleted_count,
        not_found = result.not_found_ids.len(),
        failed = result.failed_ids.len(),
        "Bulk delete finished"
    );
    result
}
