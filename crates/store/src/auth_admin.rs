//! Account management through the hosted auth service's admin API.
//!
//! Only the service key may call these endpoints, so every request is sent
//! with it as both `apikey` and bearer token.

use async_trait::async_trait;
use missionboard_core::types::DbId;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::{Method, RequestBuilder};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tokio::sync::RwLock;

use crate::error::StoreError;

/// Page size of the user listing. Agencies have far fewer clients.
const LIST_PAGE_SIZE: u32 = 1000;

/// An account as the auth service reports it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: DbId,
    #[serde(default)]
    pub email: Option<String>,
}

/// A confirmed account to create on behalf of a client.
#[derive(Debug, Clone)]
pub struct NewAuthUser {
    pub email: String,
    pub password: String,
    pub full_name: String,
}

#[async_trait]
pub trait AuthAdmin: Send + Sync {
    /// Create a confirmed account with `full_name` in its user metadata.
    async fn create_user(&self, user: &NewAuthUser) -> Result<AuthUser, StoreError>;

    async fn list_users(&self) -> Result<Vec<AuthUser>, StoreError>;
}

/// Admin client for the hosted auth service.
#[derive(Debug, Clone)]
pub struct GotrueAdmin {
    client: reqwest::Client,
    auth_url: String,
    service_key: String,
}

/// Error body of the auth service. Older versions use `msg`, newer ones
/// `message`; OAuth-style errors carry `error_description`.
#[derive(Debug, Deserialize)]
struct GotrueError {
    #[serde(default)]
    msg: Option<String>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error_description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct UserPage {
    users: Vec<AuthUser>,
}

impl GotrueAdmin {
    /// * `auth_url` - e.g. `https://xyz.supabase.co/auth/v1`.
    pub fn new(
        client: reqwest::Client,
        auth_url: impl Into<String>,
        service_key: impl Into<String>,
    ) -> Self {
        Self {
            client,
            auth_url: auth_url.into().trim_end_matches('/').to_string(),
            service_key: service_key.into(),
        }
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.client
            .request(method, format!("{}/admin/{}", self.auth_url, path))
            .headers(self.auth_headers())
    }

    fn auth_headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        if let Ok(value) = HeaderValue::from_str(&self.service_key) {
            headers.insert("apikey", value);
        }
        if let Ok(value) = HeaderValue::from_str(&format!("Bearer {}", self.service_key)) {
            headers.insert(AUTHORIZATION, value);
        }
        headers
    }

    async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, StoreError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "<unreadable body>".to_string());
        Err(StoreError::Api {
            status: status.as_u16(),
            message: error_message(&body),
        })
    }
}

fn error_message(body: &str) -> String {
    serde_json::from_str::<GotrueError>(body)
        .ok()
        .and_then(|err| err.msg.or(err.message).or(err.error_description))
        .unwrap_or_else(|| body.to_string())
}

#[async_trait]
impl AuthAdmin for GotrueAdmin {
    async fn create_user(&self, user: &NewAuthUser) -> Result<AuthUser, StoreError> {
        let body = json!({
            "email": user.email,
            "password": user.password,
            "email_confirm": true,
            "user_metadata": { "full_name": user.full_name },
        });
        let response = self.request(Method::POST, "users").json(&body).send().await?;
        let created = Self::ensure_success(response).await?.json::<AuthUser>().await?;
        tracing::info!(user_id = %created.id, "Auth user created");
        Ok(created)
    }

    async fn list_users(&self) -> Result<Vec<AuthUser>, StoreError> {
        let response = self
            .request(Method::GET, "users")
            .query(&[("page", 1), ("per_page", LIST_PAGE_SIZE)])
            .send()
            .await?;
        let page = Self::ensure_success(response).await?.json::<UserPage>().await?;
        Ok(page.users)
    }
}

/// In-process accounts for tests and local development.
#[derive(Debug, Default)]
pub struct MemoryAuthAdmin {
    users: RwLock<Vec<AuthUser>>,
}

impl MemoryAuthAdmin {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register existing accounts.
    pub async fn seed(&self, users: impl IntoIterator<Item = AuthUser>) {
        self.users.write().await.extend(users);
    }

    pub async fn users(&self) -> Vec<AuthUser> {
        self.users.read().await.clone()
    }
}

#[async_trait]
impl AuthAdmin for MemoryAuthAdmin {
    async fn create_user(&self, user: &NewAuthUser) -> Result<AuthUser, StoreError> {
        let mut users = self.users.write().await;
        let taken = users
            .iter()
            .any(|u| u.email.as_deref().is_some_and(|e| e.eq_ignore_ascii_case(&user.email)));
        if taken {
            return Err(StoreError::Api {
                status: 422,
                message: "A user with this email address has already been registered".into(),
            });
        }
        let created = AuthUser {
            id: uuid::Uuid::new_v4(),
            email: Some(user.email.clone()),
        };
        users.push(created.clone());
        Ok(created)
    }

    async fn list_users(&self) -> Result<Vec<AuthUser>, StoreError> {
        Ok(self.users().await)
    }
}
