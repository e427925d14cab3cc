//! Axum handlers and the application router.

use axum::{
    Json, Router,
    extract::{FromRequestParts, Path, Query, State},
    http::{Method, header, request::Parts},
    routing::get,
};
use sea_orm::DbErr;
use serde::{Deserialize, de::DeserializeOwned};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use utoipa::{IntoParams, OpenApi};
use uuid::Uuid;

use crate::AppState;
use crate::auth::{AdminUser, CurrentUser};
use crate::bulk_delete::{BatchIds, bulk_delete};
use crate::core::{EntityStore, ListResource, SeaOrmStore};
use crate::entities::{attendance::Attendance, user::User};
use crate::errors::ApiError;
use crate::filtering::BaseConstraints;
use crate::models::{ApiResponse, BulkDeleteResult, ListContent, RawQueryParams};
use crate::openapi::ApiDoc;
use crate::query::{QueryOptions, paginate};

type ApiResult<T> = Result<Json<ApiResponse<T>>, ApiError>;

/// `Query` that answers a bad query string with the error envelope.
#[derive(Debug, Clone)]
pub struct ApiQuery<T>(pub T);

impl<S, T> FromRequestParts<S> for ApiQuery<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state).await?;
        Ok(Self(value))
    }
}

/// `ids` for bulk delete: a JSON array of UUID strings.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct BulkDeleteParams {
    /// e.g. `["0b7e...","5f1c..."]`
    pub ids: Option<String>,
}

fn parse_id(raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw.trim())
        .map_err(|_| ApiError::validation_failed(vec!["id: Invalid uuid".to_string()]))
}

async fn list_page<R>(
    state: &AppState,
    raw: &RawQueryParams,
    options: QueryOptions<'_, R>,
) -> Result<ListContent<R>, ApiError>
where
    R: ListResource,
    for<'a> SeaOrmStore<'a>: EntityStore<R>,
{
    let store = SeaOrmStore::new(&state.db);
    Ok(paginate(&store, raw, &options).await?.into())
}

async fn find_one<R>(state: &AppState, raw_id: &str, label: &str) -> Result<R, ApiError>
where
    R: ListResource,
    for<'a> SeaOrmStore<'a>: EntityStore<R>,
{
    let id = parse_id(raw_id)?;
    let store = SeaOrmStore::new(&state.db);
    EntityStore::<R>::find_unique(&store, id)
        .await?
        .map(R::from)
        .ok_or_else(|| ApiError::not_found(label, None))
}

async fn delete_one<R>(state: &AppState, raw_id: &str, label: &str) -> Result<(), ApiError>
where
    R: ListResource,
    for<'a> SeaOrmStore<'a>: EntityStore<R>,
{
    let id = parse_id(raw_id)?;
    let store = SeaOrmStore::new(&state.db);
    EntityStore::<R>::delete(&store, id)
        .await
        .map_err(|err| match err {
            DbErr::RecordNotFound(_) => ApiError::not_found(label, None),
            other => other.into(),
        })
}

async fn delete_many<R>(state: &AppState, params: &BulkDeleteParams) -> Result<BulkDeleteResult, ApiError>
where
    R: ListResource,
    for<'a> SeaOrmStore<'a>: EntityStore<R>,
{
    let ids = BatchIds::from_query(params.ids.as_deref())?;
    let store = SeaOrmStore::new(&state.db);
    Ok(bulk_delete::<R, _>(&store, &ids).await)
}

/// List, get, delete and bulk-delete handlers for one master-data resource.
macro_rules! master_data_handlers {
    ($module:ident, $resource:ty, $label:literal, $collection:literal, $item:literal, $tag:literal) => {
        pub mod $module {
            use super::*;

            #[utoipa::path(
                get,
                path = $collection,
                params(RawQueryParams),
                responses(
                    (status = 200, description = "One page of results", body = ApiResponse<ListContent<$resource>>),
                    (status = 400, description = "Invalid query parameters"),
                    (status = 401, description = "Missing or unknown token")
                ),
                security(("bearer_token" = [])),
                tag = $tag
            )]
            pub async fn list(
                State(state): State<AppState>,
                _user: CurrentUser,
                ApiQuery(raw): ApiQuery<RawQueryParams>,
            ) -> ApiResult<ListContent<$resource>> {
                let options = QueryOptions::<$resource>::new(state.query);
                let content = list_page(&state, &raw, options).await?;
                Ok(Json(ApiResponse::ok(
                    content,
                    format!("Successfully retrieved {}", <$resource as ListResource>::RESOURCE_NAME_PLURAL),
                )))
            }

            #[utoipa::path(
                get,
                path = $item,
                params(("id" = String, Path, description = "Resource UUID")),
                responses(
                    (status = 200, description = "The requested resource", body = ApiResponse<$resource>),
                    (status = 400, description = "Invalid id"),
                    (status = 404, description = "Resource not found")
                ),
                security(("bearer_token" = [])),
                tag = $tag
            )]
            pub async fn get_one(
                State(state): State<AppState>,
                _user: CurrentUser,
                Path(id): Path<String>,
            ) -> ApiResult<$resource> {
                let item = find_one::<$resource>(&state, &id, $label).await?;
                Ok(Json(ApiResponse::ok(
                    item,
                    format!("Successfully retrieved {}", <$resource as ListResource>::RESOURCE_NAME_SINGULAR),
                )))
            }

            #[utoipa::path(
                delete,
                path = $item,
                params(("id" = String, Path, description = "Resource UUID")),
                responses(
                    (status = 200, description = "Resource deleted"),
                    (status = 403, description = "Admin role required"),
                    (status = 404, description = "Resource not found")
                ),
                security(("bearer_token" = [])),
                tag = $tag
            )]
            pub async fn delete(
                State(state): State<AppState>,
                _admin: AdminUser,
                Path(id): Path<String>,
            ) -> ApiResult<()> {
                delete_one::<$resource>(&state, &id, $label).await?;
                Ok(Json(ApiResponse::empty(format!(
                    "Successfully deleted {}",
                    <$resource as ListResource>::RESOURCE_NAME_SINGULAR
                ))))
            }

            #[utoipa::path(
                delete,
                path = $collection,
                params(BulkDeleteParams),
                responses(
                    (status = 200, description = "Per-id outcome", body = ApiResponse<BulkDeleteResult>),
                    (status = 400, description = "Missing, malformed or empty ids"),
                    (status = 403, description = "Admin role required")
                ),
                security(("bearer_token" = [])),
                tag = $tag
            )]
            pub async fn bulk_delete(
                State(state): State<AppState>,
                _admin: AdminUser,
                ApiQuery(params): ApiQuery<BulkDeleteParams>,
            ) -> ApiResult<BulkDeleteResult> {
                let result = delete_many::<$resource>(&state, &params).await?;
                Ok(Json(ApiResponse::ok(
                    result,
                    format!("Successfully deleted {}", <$resource as ListResource>::RESOURCE_NAME_PLURAL),
                )))
            }
        }
    };
}

master_data_handlers!(
    shifts,
    crate::entities::shift::Shift,
    "Shift",
    "/api/master-data/shifts",
    "/api/master-data/shifts/{id}",
    "master-data"
);
master_data_handlers!(
    time_zones,
    crate::entities::time_zone::TimeZone,
    "Time zone",
    "/api/master-data/time-zones",
    "/api/master-data/time-zones/{id}",
    "master-data"
);

/// The caller's own attendance records.
#[utoipa::path(
    get,
    path = "/api/attendances/history",
    params(RawQueryParams),
    responses(
        (status = 200, description = "One page of the caller's attendances", body = ApiResponse<ListContent<Attendance>>),
        (status = 400, description = "Invalid query parameters"),
        (status = 401, description = "Missing or unknown token")
    ),
    security(("bearer_token" = [])),
    tag = "attendances"
)]
pub async fn attendance_history(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    ApiQuery(raw): ApiQuery<RawQueryParams>,
) -> ApiResult<ListContent<Attendance>> {
    let options = QueryOptions::<Attendance>::new(state.query)
        .scoped(BaseConstraints::new().equals("userId", user.id));
    let content = list_page(&state, &raw, options).await?;
    Ok(Json(ApiResponse::ok(
        content,
        "Successfully got attendance history",
    )))
}

#[utoipa::path(
    get,
    path = "/api/admin/attendances",
    params(RawQueryParams),
    responses(
        (status = 200, description = "One page of attendances", body = ApiResponse<ListContent<Attendance>>),
        (status = 403, description = "Admin role required")
    ),
    security(("bearer_token" = [])),
    tag = "admin"
)]
pub async fn admin_attendances(
    State(state): State<AppState>,
    _admin: AdminUser,
    ApiQuery(raw): ApiQuery<RawQueryParams>,
) -> ApiResult<ListContent<Attendance>> {
    let options = QueryOptions::<Attendance>::new(state.query);
    let content = list_page(&state, &raw, options).await?;
    Ok(Json(ApiResponse::ok(content, "Successfully retrieved attendances")))
}

#[utoipa::path(
    get,
    path = "/api/admin/users",
    params(RawQueryParams),
    responses(
        (status = 200, description = "One page of users", body = ApiResponse<ListContent<User>>),
        (status = 403, description = "Admin role required")
    ),
    security(("bearer_token" = [])),
    tag = "admin"
)]
pub async fn admin_users(
    State(state): State<AppState>,
    _admin: AdminUser,
    ApiQuery(raw): ApiQuery<RawQueryParams>,
) -> ApiResult<ListContent<User>> {
    let options = QueryOptions::<User>::new(state.query);
    let content = list_page(&state, &raw, options).await?;
    Ok(Json(ApiResponse::ok(content, "Successfully retrieved users")))
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

pub fn router(state: AppState) -> Router {
    let master_data = Router::new()
        .route("/shifts", get(shifts::list).delete(shifts::bulk_delete))
        .route("/shifts/{id}", get(shifts::get_one).delete(shifts::delete))
        .route(
            "/time-zones",
            get(time_zones::list).delete(time_zones::bulk_delete),
        )
        .route(
            "/time-zones/{id}",
            get(time_zones::get_one).delete(time_zones::delete),
        );

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::DELETE, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .expose_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    Router::new()
        .nest("/api/master-data", master_data)
        .route("/api/attendances/history", get(attendance_history))
        .route("/api/admin/attendances", get(admin_attendances))
        .route("/api/admin/users", get(admin_users))
        .route("/api/openapi.json", get(openapi_json))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
