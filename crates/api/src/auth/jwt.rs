//! Principal token validation.
//!
//! Principal tokens are HS256-signed JWTs issued by the authentication
//! provider. Only the signature, expiry, and (when configured) issuer are
//! checked; the claims are then turned into a [`Principal`].

use chapterhouse_core::identity::Principal;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

/// Claims carried by a principal token.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct PrincipalClaims {
    /// Subject -- the provider's stable user id.
    pub sub: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Sign-in method, e.g. `"google.com"` or `"password"`.
    pub provider: String,
    /// Expiration time (UTC Unix timestamp).
    pub exp: i64,
    /// Issued-at time (UTC Unix timestamp).
    pub iat: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iss: Option<String>,
}

impl From<PrincipalClaims> for Principal {
    fn from(claims: PrincipalClaims) -> Self {
        Principal {
            subject_id: claims.sub,
            email: claims.email,
            provider: claims.provider,
        }
    }
}

/// Configuration for principal token validation.
#[derive(Debug, Clone)]
pub struct PrincipalTokenConfig {
    /// HMAC-SHA256 secret shared with the auth provider.
    pub secret: String,
    /// Required `iss` claim, if any.
    pub issuer: Option<String>,
}

impl PrincipalTokenConfig {
    /// Load from the environment.
    ///
    /// | Env Var                  | Required | Default |
    /// |--------------------------|----------|---------|
    /// | `PRINCIPAL_TOKEN_SECRET` | **yes**  | --      |
    /// | `PRINCIPAL_TOKEN_ISSUER` | no       | --      |
    ///
    /// # Panics
    ///
    /// Panics if `PRINCIPAL_TOKEN_SECRET` is not set or is empty.
    pub fn from_env() -> Self {
        let secret = std::env::var("PRINCIPAL_TOKEN_SECRET")
            .expect("PRINCIPAL_TOKEN_SECRET must be set in the environment");
        assert!(!secret.is_empty(), "PRINCIPAL_TOKEN_SECRET must not be empty");

        let issuer = std::env::var("PRINCIPAL_TOKEN_ISSUER")
            .ok()
            .filter(|s| !s.trim().is_empty());

        Self { secret, issuer }
    }
}

/// Validate and decode a principal token.
pub fn validate_principal_token(
    token: &str,
    config: &PrincipalTokenConfig,
) -> Result<PrincipalClaims, jsonwebtoken::errors::Error> {
    let mut validation = Validation::new(Algorithm::HS256);
    if let Some(issuer) = &config.issuer {
        validation.set_issuer(&[issuer]);
    }

    let token_data = decode::<PrincipalClaims>(
        token,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &validation,
    )?;
    Ok(token_data.claims)
}

/// Sign a principal token valid for `ttl_secs` seconds.
///
/// Production tokens come from the auth provider; this is used by local
/// tooling and tests that stand in for it.
pub fn issue_principal_token(
    principal: &Principal,
    ttl_secs: i64,
    config: &PrincipalTokenConfig,
) -> Result<String, jsonwebtoken::errors::Error> {
    let now = chrono::Utc::now().timestamp();
    let claims = PrincipalClaims {
        sub: principal.subject_id.clone(),
        email: principal.email.clone(),
        provider: principal.provider.clone(),
        exp: now + ttl_secs,
        iat: now,
        iss: config.issuer.clone(),
    };

    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )
}
