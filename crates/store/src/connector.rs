//! Hands out store handles bound to the right credential.

use std::sync::Arc;
use std::time::Duration;

use crate::auth_admin::{AuthAdmin, GotrueAdmin, MemoryAuthAdmin};
use crate::error::StoreError;
use crate::remote::RemoteStore;
use crate::rest::{build_client, PostgrestStore};

/// Produces [`RemoteStore`] handles per credential.
pub trait StoreConnector: Send + Sync {
    /// A handle acting as the viewer. Row-level policies apply.
    fn user(&self, access_token: &str) -> Arc<dyn RemoteStore>;

    /// A handle with the service role, bypassing row-level policies.
    fn service(&self) -> Arc<dyn RemoteStore>;

    /// Account management, always with the service role.
    fn auth_admin(&self) -> Arc<dyn AuthAdmin>;
}

/// Connector for the hosted PostgREST endpoint. One pooled HTTP client is
/// shared by every handle.
#[derive(Debug, Clone)]
pub struct PostgrestConnector {
    client: reqwest::Client,
    rest_url: String,
    auth_url: String,
    anon_key: String,
    service_key: String,
}

impl PostgrestConnector {
    /// * `project_url` - e.g. `https://xyz.supabase.co`; `/rest/v1` and
    ///   `/auth/v1` are appended.
    pub fn new(
        project_url: &str,
        anon_key: impl Into<String>,
        service_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, StoreError> {
        let project_url = project_url.trim_end_matches('/');
        Ok(Self {
            client: build_client(timeout)?,
            rest_url: format!("{project_url}/rest/v1"),
            auth_url: format!("{project_url}/auth/v1"),
            anon_key: anon_key.into(),
            service_key: service_key.into(),
        })
    }

    pub fn rest_url(&self) -> &str {
        &self.rest_url
    }

    pub fn auth_url(&self) -> &str {
        &self.auth_url
    }
}

impl StoreConnector for PostgrestConnector {
    fn user(&self, access_token: &str) -> Arc<dyn RemoteStore> {
        Arc::new(PostgrestStore::new(
            self.client.clone(),
            self.rest_url.clone(),
            self.anon_key.clone(),
            access_token,
        ))
    }

    fn service(&self) -> Arc<dyn RemoteStore> {
        Arc::new(PostgrestStore::new(
            self.client.clone(),
            self.rest_url.clone(),
            self.service_key.clone(),
            self.service_key.clone(),
        ))
    }

    fn auth_admin(&self) -> Arc<dyn AuthAdmin> {
        Arc::new(GotrueAdmin::new(
            self.client.clone(),
            self.auth_url.clone(),
            self.service_key.clone(),
        ))
    }
}

/// Returns the same store for every credential. Used with
/// [`MemoryStore`](crate::memory::MemoryStore), which has no policies.
#[derive(Clone)]
pub struct StaticConnector {
    store: Arc<dyn RemoteStore>,
    auth: Arc<dyn AuthAdmin>,
}

impl StaticConnector {
    /// Accounts are kept in a fresh [`MemoryAuthAdmin`].
    pub fn new(store: Arc<dyn RemoteStore>) -> Self {
        Self {
            store,
            auth: Arc::new(MemoryAuthAdmin::new()),
        }
    }

    pub fn with_auth_admin(mut self, auth: Arc<dyn AuthAdmin>) -> Self {
        self.auth = auth;
        self
    }
}

impl StoreConnector for StaticConnector {
    fn user(&self, _access_token: &str) -> Arc<dyn RemoteStore> {
        Arc::clone(&self.store)
    }

    fn service(&self) -> Arc<dyn RemoteStore> {
        Arc::clone(&self.store)
    }

    fn auth_admin(&self) -> Arc<dyn AuthAdmin> {
        Arc::clone(&self.auth)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn urls_are_derived_from_project_url() {
        let connector =
            PostgrestConnector::new("https://xyz.supabase.co/", "anon", "service", Duration::from_secs(5))
                .unwrap();
        assert_eq!(connector.rest_url(), "https://xyz.supabase.co/rest/v1");
        assert_eq!(connector.auth_url(), "https://xyz.supabase.co/auth/v1");
    }
}
