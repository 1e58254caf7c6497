//! Handlers for the agency's client accounts.

use std::collections::HashMap;

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use missionboard_store::models::dashboard_settings::DashboardSettingsRow;
use missionboard_store::models::profile::{ClientView, CreateClient, NewProfile};
use missionboard_store::models::validate_input;
use missionboard_store::repositories::{DashboardSettingsRepo, ProfileRepo};
use missionboard_store::NewAuthUser;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAgency;
use crate::response::DataResponse;
use crate::state::AppState;

const INCOMPLETE_FORM: &str = "Bitte alle Felder ausfüllen.";

/// GET /api/v1/clients
///
/// Church profiles, newest first, with the email address of each account.
pub async fn list(
    State(state): State<AppState>,
    RequireAgency(viewer): RequireAgency,
) -> AppResult<Json<DataResponse<Vec<ClientView>>>> {
    let profiles = ProfileRepo::list_churches(viewer.store.as_ref()).await?;

    let mut emails: HashMap<_, _> = match state.connector.auth_admin().list_users().await {
        Ok(users) => users.into_iter().map(|u| (u.id, u.email)).collect(),
        Err(e) => {
            tracing::warn!(error = %e, "Could not list auth users, emails omitted");
            HashMap::new()
        }
    };

    let clients = profiles
        .into_iter()
        .map(|profile| {
            let email = emails.remove(&profile.id).flatten();
            ClientView::new(profile, email)
        })
        .collect();
    Ok(Json(DataResponse { data: clients }))
}

/// POST /api/v1/clients
///
/// Creates a confirmed account, its church profile and welcome branding.
pub async fn create(
    State(state): State<AppState>,
    RequireAgency(viewer): RequireAgency,
    Json(input): Json<CreateClient>,
) -> AppResult<(StatusCode, Json<DataResponse<ClientView>>)> {
    if !input.is_complete() {
        return Err(AppError::BadRequest(INCOMPLETE_FORM.into()));
    }
    let input = input.trimmed();
    validate_input(&input)?;

    let user = state
        .connector
        .auth_admin()
        .create_user(&NewAuthUser {
            email: input.email.clone(),
            password: input.password,
            full_name: input.full_name.clone(),
        })
        .await?;

    let service = state.connector.service();
    let profile = ProfileRepo::create(service.as_ref(), &NewProfile::client(user.id, &input.full_name))
        .await
        .inspect_err(|e| tracing::error!(user_id = %user.id, error = %e, "Client profile not created"))?;

    let welcome = DashboardSettingsRow::welcome(user.id, viewer.user_id(), &input.full_name);
    if let Err(e) = DashboardSettingsRepo::upsert(service.as_ref(), &welcome).await {
        tracing::warn!(church_id = %user.id, error = %e, "Welcome settings not stored");
    }

    tracing::info!(church_id = %user.id, agency_id = %viewer.user_id(), "Client onboarded");
    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: ClientView::new(profile, user.email.or(Some(input.email))),
        }),
    ))
}
