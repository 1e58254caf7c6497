//! Bearer-token authentication extractors for Axum handlers.

use std::sync::Arc;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use missionboard_core::error::CoreError;
use missionboard_core::roles::Role;
use missionboard_core::types::DbId;
use missionboard_store::models::profile::Profile;
use missionboard_store::repositories::ProfileRepo;
use missionboard_store::RemoteStore;

use crate::auth::jwt::validate_token;
use crate::error::AppError;
use crate::state::AppState;

/// Authenticated user extracted from a Bearer token in the `Authorization`
/// header. The raw token is kept so store calls can act as this user.
#[derive(Debug, Clone)]
pub struct AuthUser {
    /// The auth user id (from `claims.sub`), equal to the profile id.
    pub user_id: DbId,
    pub email: Option<String>,
    pub token: String,
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| {
                AppError::Core(CoreError::Unauthorized(
                    "Missing Authorization header".into(),
                ))
            })?;

        let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized(
                "Invalid Authorization format. Expected: Bearer <token>".into(),
            ))
        })?;

        let claims = validate_token(token, &state.config.jwt).map_err(|_| {
            AppError::Core(CoreError::Unauthorized("Invalid or expired token".into()))
        })?;

        Ok(AuthUser {
            user_id: claims.sub,
            email: claims.email,
            token: token.to_string(),
        })
    }
}

/// An authenticated user together with their profile and a store handle
/// acting as them.
///
/// The profile is created with the default role on first access.
#[derive(Clone)]
pub struct Viewer {
    pub user: AuthUser,
    pub profile: Profile,
    pub store: Arc<dyn RemoteStore>,
}

impl Viewer {
    pub fn user_id(&self) -> DbId {
        self.user.user_id
    }

    pub fn role(&self) -> Role {
        self.profile.role
    }
}

impl FromRequestParts<AppState> for Viewer {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        let service = state.connector.service();
        let profile =
            ProfileRepo::find_or_create(service.as_ref(), user.user_id, user.email.as_deref())
                .await?;
        let store = state.connector.user(&user.token);
        Ok(Viewer {
            user,
            profile,
            store,
        })
    }
}
