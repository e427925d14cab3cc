//! The paginated query executor behind every list endpoint.
//!
//! One call validates the raw parameters, decodes the filter blobs, builds the
//! predicate, and issues exactly two reads with the same condition: the page
//! and the total count.

use sea_orm::{DbErr, Order};

use crate::config::QueryConfig;
use crate::core::{EntityStore, ListResource};
use crate::filtering::{
    BaseConstraints, DroppedKey, Pagination, ParsedFilters, SearchMode, build_predicate,
};
use crate::models::{PaginatedResult, QueryParams, RawQueryParams};
use crate::validation::{BaseQuerySchema, QuerySchema, ValidationError, ValidationErrors};

#[derive(Debug, thiserror::Error)]
pub enum QueryError {
    #[error("{0}")]
    Validation(#[from] ValidationErrors),
    #[error("store error: {0}")]
    Store(#[from] DbErr),
}

/// Per-call settings for [`paginate`] and [`paginate_with`].
pub struct QueryOptions<'a, R: ListResource> {
    config: QueryConfig,
    schema: Option<&'a dyn QuerySchema>,
    base: BaseConstraints,
    order_by: Option<Vec<(R::ColumnType, Order)>>,
    search_mode: SearchMode,
}

impl<'a, R: ListResource> QueryOptions<'a, R> {
    /// Validate with [`BaseQuerySchema`], no scoping, resource default order,
    /// OR search.
    #[must_use]
    pub fn new(config: QueryConfig) -> Self {
        Self {
            config,
            schema: Some(&BaseQuerySchema),
            base: BaseConstraints::new(),
            order_by: None,
            search_mode: SearchMode::default(),
        }
    }

    /// Replace the validation schema; `None` coerces parameters leniently.
    #[must_use]
    pub fn schema(mut self, schema: Option<&'a dyn QuerySchema>) -> Self {
        self.schema = schema;
        self
    }

    /// Server-asserted terms, applied over any client input.
    #[must_use]
    pub fn scoped(mut self, base: BaseConstraints) -> Self {
        self.base = base;
        self
    }

    /// Ordering for this call, overriding the resource default.
    #[must_use]
    pub fn order_by(mut self, ordering: Vec<(R::ColumnType, Order)>) -> Self {
        self.order_by = Some(ordering);
        self
    }

    #[must_use]
    pub fn search_mode(mut self, mode: SearchMode) -> Self {
        self.search_mode = mode;
        self
    }

    fn ordering(&self) -> Vec<(R::ColumnType, Order)> {
        self.order_by.clone().unwrap_or_else(R::default_order)
    }
}

fn decode_filters(params: &QueryParams, strict: bool) -> Result<ParsedFilters, ValidationErrors> {
    let (filters, search, ranges) = (
        params.filters.as_deref(),
        params.search_filters.as_deref(),
        params.ranged_filters.as_deref(),
    );
    if !strict {
        return Ok(ParsedFilters::lenient(filters, search, ranges));
    }
    ParsedFilters::strict(filters, search, ranges).map_err(|malformed| {
        malformed
            .into_iter()
            .map(|m| ValidationError::new(m.param.as_str(), format!("Malformed JSON: {}", m.reason)))
            .collect()
    })
}

fn check_dropped<R: ListResource>(
    dropped: &[DroppedKey],
    strict: bool,
) -> Result<(), ValidationErrors> {
    if strict {
        let errors: ValidationErrors = dropped
            .iter()
            .map(|d| ValidationError::new(format!("{}.{}", d.param.as_str(), d.key), d.message()))
            .collect();
        return errors.into_result(());
    }
    for d in dropped {
        tracing::warn!(
            resource = R::RESOURCE_NAME_PLURAL,
            param = d.param.as_str(),
            key = %d.key,
            reason = ?d.reason,
            "Ignoring client filter key"
        );
    }
    Ok(())
}

/// Run a list query and convert each row to `R`.
///
/// # Errors
/// `QueryError::Validation` when the parameters fail the schema (or, in strict
/// mode, when filter input is malformed or names a refused key); the store is
/// not touched in that case. `QueryError::Store` when either read fails.
pub async fn paginate<R, S>(
    store: &S,
    raw: &RawQueryParams,
    options: &QueryOptions<'_, R>,
) -> Result<PaginatedResult<R>, QueryError>
where
    R: ListResource,
    S: EntityStore<R> + ?Sized,
{
    paginate_with(store, raw, options, |row| row).await
}

/// Run a list query and map each row through `transform`.
///
/// # Errors
/// See [`paginate`].
pub async fn paginate_with<R, S, T, F>(
    store: &S,
    raw: &RawQueryParams,
    options: &QueryOptions<'_, R>,
    transform: F,
) -> Result<PaginatedResult<T>, QueryError>
where
    R: ListResource,
    S: EntityStore<R> + ?Sized,
    F: FnMut(R) -> T,
{
    let strict = options.config.strict_filters;
    let params = match options.schema {
        Some(schema) => schema.validate(raw)?,
        None => QueryParams::coerce(raw),
    };
    let parsed = decode_filters(&params, strict)?;
    let (predicate, dropped) = build_predicate::<R>(&parsed, options.search_mode, &options.base);
    check_dropped::<R>(&dropped, strict)?;

    let condition = predicate.to_condition::<R>();
    let pagination = Pagination::from_page(params.page, params.limit, &options.config);

    let (rows, total_count) = tokio::try_join!(
        store.find_many(
            condition.clone(),
            pagination.offset,
            pagination.limit,
            options.ordering(),
        ),
        store.count(condition),
    )?;

    tracing::debug!(
        resource = R::RESOURCE_NAME_PLURAL,
        offset = pagination.offset,
        limit = pagination.limit,
        returned = rows.len(),
        total_count,
        "Executed list query"
    );

    Ok(PaginatedResult {
        items: rows.into_iter().map(R::from).map(transform).collect(),
        total_count,
        total_pages: pagination.total_pages(total_count),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::testing::{Call, RecordingStore};
    use crate::entities::shift::{self, Shift};

    fn raw(pairs: &[(&str, &str)]) -> RawQueryParams {
        let map: serde_json::Map<String, serde_json::Value> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), serde_json::Value::String((*v).to_string())))
            .collect();
        serde_json::from_value(serde_json::Value::Object(map)).unwrap()
    }

    #[tokio::test]
    async fn test_page_and_totals() {
        let store = RecordingStore::with_shifts(25);
        let options = QueryOptions::<Shift>::new(QueryConfig::default());
        let result = paginate(&store, &raw(&[("page", "3"), ("limit", "10")]), &options)
            .await
            .unwrap();

        assert_eq!(result.items.len(), 5);
        assert_eq!(result.total_count, 25);
        assert_eq!(result.total_pages, 3);
    }

    #[tokio::test]
    async fn test_exactly_two_reads_with_same_condition() {
        let store = RecordingStore::with_shifts(3);
        let options = QueryOptions::<Shift>::new(QueryConfig::default())
            .scoped(BaseConstraints::new().equals("isActive", true));
        paginate(
            &store,
            &raw(&[("searchFilters", r#"{"name":"morning"}"#)]),
            &options,
        )
        .await
        .unwrap();

        let calls = store.calls();
        assert_eq!(calls.len(), 2);
        let find_condition = calls.iter().find_map(|c| match c {
            Call::FindMany { condition, .. } => Some(condition.clone()),
            _ => None,
        });
        let count_condition = calls.iter().find_map(|c| match c {
            Call::Count { condition } => Some(condition.clone()),
            _ => None,
        });
        assert!(find_condition.is_some());
        assert_eq!(find_condition, count_condition);
    }

    #[tokio::test]
    async fn test_validation_failure_skips_store() {
        let store = RecordingStore::with_shifts(3);
        let options = QueryOptions::<Shift>::new(QueryConfig::default());
        let err = paginate(&store, &raw(&[("page", "first")]), &options)
            .await
            .unwrap_err();

        match err {
            QueryError::Validation(errors) => assert!(errors.message_for("page").is_some()),
            QueryError::Store(e) => panic!("unexpected store error {e}"),
        }
        assert!(store.calls().is_empty());
    }

    #[tokio::test]
    async fn test_without_schema_bad_numbers_fall_back() {
        let store = RecordingStore::with_shifts(15);
        let options = QueryOptions::<Shift>::new(QueryConfig::default()).schema(None);
        let result = paginate(&store, &raw(&[("page", "first")]), &options)
            .await
            .unwrap();
        assert_eq!(result.items.len(), 10);
        assert_eq!(result.total_pages, 2);
    }

    #[tokio::test]
    async fn test_ordering_precedence() {
        let store = RecordingStore::with_shifts(1);
        let defaults = QueryOptions::<Shift>::new(QueryConfig::default());
        paginate(&store, &RawQueryParams::default(), &defaults)
            .await
            .unwrap();
        let explicit = QueryOptions::<Shift>::new(QueryConfig::default())
            .order_by(vec![(shift::Column::Name, Order::Asc)]);
        paginate(&store, &RawQueryParams::default(), &explicit)
            .await
            .unwrap();

        let orderings: Vec<String> = store
            .calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::FindMany { ordering, .. } => Some(ordering),
                _ => None,
            })
            .collect();
        assert_eq!(orderings.len(), 2);
        assert!(orderings[0].contains("CreatedAt") && orderings[0].contains("Desc"));
        assert!(orderings[1].contains("Name") && orderings[1].contains("Asc"));
    }

    #[tokio::test]
    async fn test_transform_applies_per_row() {
        let store = RecordingStore::with_shifts(4);
        let options = QueryOptions::<Shift>::new(QueryConfig::default());
        let result = paginate_with(&store, &RawQueryParams::default(), &options, |s| s.name)
            .await
            .unwrap();
        assert_eq!(result.items.len(), 4);
        assert!(result.items.iter().all(|name| name.starts_with("Shift ")));
    }

    #[tokio::test]
    async fn test_strict_mode_rejects_malformed_and_unknown_input() {
        let store = RecordingStore::with_shifts(2);
        let config = QueryConfig {
            strict_filters: true,
            ..QueryConfig::default()
        };
        let options = QueryOptions::<Shift>::new(config);

        let err = paginate(&store, &raw(&[("filters", "{oops")]), &options)
            .await
            .unwrap_err();
        assert!(matches!(err, QueryError::Validation(ref e) if e.message_for("filters").is_some()));

        let err = paginate(&store, &raw(&[("filters", r#"{"secret":1}"#)]), &options)
            .await
            .unwrap_err();
        assert!(
            matches!(err, QueryError::Validation(ref e) if e.message_for("filters.secret").is_some())
        );
        assert!(store.calls().is_empty());
    }

    #[tokio::test]
    async fn test_lenient_mode_ignores_malformed_input() {
        let store = RecordingStore::with_shifts(2);
        let options = QueryOptions::<Shift>::new(QueryConfig::default());
        let result = paginate(
            &store,
            &raw(&[("filters", "{oops"), ("rangedFilters", r#"{"not":"array"}"#)]),
            &options,
        )
        .await
        .unwrap();
        assert_eq!(result.total_count, 2);
    }

    #[tokio::test]
    async fn test_store_failure_propagates() {
        let store = RecordingStore::with_shifts(2).failing_reads();
        let options = QueryOptions::<Shift>::new(QueryConfig::default());
        let err = paginate(&store, &RawQueryParams::default(), &options)
            .await
            .unwrap_err();
        assert!(matches!(err, QueryError::Store(_)));
    }
}
