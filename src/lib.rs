pub mod auth;
pub mod bulk_delete;
pub mod config;
pub mod core;
pub mod entities;
pub mod errors;
pub mod filtering;
pub mod migration;
pub mod models;
pub mod openapi;
pub mod query;
pub mod routes;
pub mod validation;

use sea_orm::DatabaseConnection;

pub use bulk_delete::{BatchIds, BatchIdsError, bulk_delete};
pub use config::{AppConfig, QueryConfig};
pub use crate::core::{EntityStore, ListResource, SeaOrmStore};
pub use errors::ApiError;
pub use models::{ApiResponse, BulkDeleteResult, PaginatedResult, RawQueryParams};
pub use query::{QueryError, QueryOptions, paginate, paginate_with};
pub use routes::router;

/// Shared Axum state.
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub query: QueryConfig,
}

impl AppState {
    #[must_use]
    pub fn new(db: DatabaseConnection, query: QueryConfig) -> Self {
        Self { db, query }
    }
}
