//! Token authentication.
//!
//! The `Authorization` header carries an opaque token, optionally prefixed
//! with `Bearer `, matched against `users.token`.

use axum::extract::FromRequestParts;
use axum::http::{header::AUTHORIZATION, request::Parts};
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};

use crate::AppState;
use crate::entities::user::{self, Role};
use crate::errors::ApiError;

/// The authenticated caller.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub user::Model);

impl CurrentUser {
    /// # Errors
    /// `ApiError::Forbidden` unless the caller is an admin.
    pub fn require_admin(&self) -> Result<(), ApiError> {
        match self.0.role {
            Role::Admin => Ok(()),
            Role::Employee => Err(ApiError::forbidden("Forbidden")),
        }
    }
}

fn bearer_token(parts: &Parts) -> Option<&str> {
    let value = parts.headers.get(AUTHORIZATION)?.to_str().ok()?;
    let token = value.strip_prefix("Bearer ").unwrap_or(value).trim();
    (!token.is_empty()).then_some(token)
}

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts).ok_or_else(|| ApiError::unauthorized("Unauthorized"))?;
        let found = user::Entity::find()
            .filter(user::Column::Token.eq(token))
            .filter(user::Column::IsActive.eq(true))
            .one(&state.db)
            .await?;
        found
            .map(CurrentUser)
            .ok_or_else(|| ApiError::unauthorized("Unauthorized"))
    }
}

/// An authenticated caller with the admin role.
#[derive(Debug, Clone)]
pub struct AdminUser(pub user::Model);

impl FromRequestParts<AppState> for AdminUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let current = CurrentUser::from_request_parts(parts, state).await?;
        current.require_admin()?;
        Ok(AdminUser(current.0))
    }
}
