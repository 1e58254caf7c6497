//! Validation of access tokens issued by the hosted auth service.
//!
//! Tokens are HS256-signed with the project's JWT secret and carry the
//! `authenticated` audience. This server never issues tokens; it only checks
//! them and forwards them to the store so row-level policies see the same
//! user.

use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use missionboard_core::types::DbId;
use serde::{Deserialize, Serialize};

/// Audience claim of signed-in users.
pub const AUDIENCE: &str = "authenticated";

/// Claims read from an access token.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject -- the auth user id, which is also the profile id.
    pub sub: DbId,
    #[serde(default)]
    pub email: Option<String>,
    /// Audience (`authenticated`).
    pub aud: String,
    /// Expiration time (UTC Unix timestamp).
    pub exp: i64,
}

#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// HMAC-SHA256 secret shared with the auth service.
    pub secret: String,
}

impl JwtConfig {
    /// Load JWT configuration from environment variables.
    ///
    /// | Env Var               | Required |
    /// |-----------------------|----------|
    /// | `SUPABASE_JWT_SECRET` | **yes**  |
    ///
    /// # Panics
    ///
    /// Panics if `SUPABASE_JWT_SECRET` is not set or is empty.
    pub fn from_env() -> Self {
        let secret = std::env::var("SUPABASE_JWT_SECRET")
            .expect("SUPABASE_JWT_SECRET must be set in the environment");
        assert!(!secret.is_empty(), "SUPABASE_JWT_SECRET must not be empty");
        Self { secret }
    }
}

/// Validate and decode an access token, returning the embedded [`Claims`].
///
/// Checks the signature, expiration and audience.
pub fn validate_token(
    token: &str,
    config: &JwtConfig,
) -> Result<Claims, jsonwebtoken::errors::Error> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_audience(&[AUDIENCE]);
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &validation,
    )?;
    Ok(token_data.claims)
}
