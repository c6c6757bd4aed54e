//! Bearer token authentication for the `/api` routes

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{HeaderMap, header::AUTHORIZATION},
    middleware::Next,
    response::Response,
};
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use serde::Deserialize;
use tracing::{debug, warn};

use crate::config::AuthConfig;
use crate::store::seed::DEMO_USER;
use crate::{PlannerError, Result};

/// Identity attached to every authenticated request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthUser(pub String);

#[derive(Debug, Deserialize)]
struct Claims {
    #[serde(default)]
    sub: Option<String>,
}

/// How incoming requests are authenticated
#[derive(Clone)]
pub struct AuthSettings {
    disabled: bool,
    key: Option<DecodingKey>,
    validation: Validation,
}

impl std::fmt::Debug for AuthSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthSettings")
            .field("disabled", &self.disabled)
            .field("has_secret", &self.key.is_some())
            .finish()
    }
}

impl AuthSettings {
    #[must_use]
    pub fn from_config(config: &AuthConfig) -> Self {
        let key = config
            .jwt_secret
            .as_deref()
            .filter(|secret| !secret.is_empty())
            .map(|secret| DecodingKey::from_secret(secret.as_bytes()));

        let mut validation = Validation::new(Algorithm::HS256);
        validation.algorithms = vec![Algorithm::HS256, Algorithm::HS384, Algorithm::HS512];
        validation.validate_aud = false;

        if key.is_none() && !config.disabled {
            warn!("No JWT secret configured; every /api request will be rejected");
        }

        Self {
            disabled: config.disabled,
            key,
            validation,
        }
    }

    /// Every request runs as the demo user
    #[must_use]
    pub fn disabled() -> Self {
        Self::from_config(&AuthConfig {
            disabled: true,
            jwt_secret: None,
        })
    }

    #[must_use]
    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    /// Check an HMAC-signed token and return its subject
    pub fn validate_token(&self, token: &str) -> Result<String> {
        let key = self
            .key
            .as_ref()
            .ok_or_else(|| PlannerError::unauthorized("JWT secret not set"))?;

        let data = decode::<Claims>(token, key, &self.validation)
            .map_err(|e| PlannerError::unauthorized(format!("invalid token: {e}")))?;

        data.claims
            .sub
            .filter(|sub| !sub.is_empty())
            .ok_or_else(|| PlannerError::unauthorized("missing sub claim"))
    }

    /// Resolve the caller for a request's headers
    pub fn authenticate(&self, headers: &HeaderMap) -> Result<AuthUser> {
        if self.disabled {
            return Ok(AuthUser(DEMO_USER.to_string()));
        }

        let token = bearer_token(headers)
            .ok_or_else(|| PlannerError::unauthorized("missing bearer token"))?;
        self.validate_token(token).map(AuthUser)
    }
}

/// Token following `Bearer ` in the Authorization header
fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .filter(|token| !token.is_empty())
}

/// Reject unauthenticated requests with 401, otherwise attach [`AuthUser`]
pub async fn require_auth(
    State(settings): State<Arc<AuthSettings>>,
    mut request: Request,
    next: Next,
) -> Result<Response> {
    let user = settings.authenticate(request.headers()).inspect_err(|e| {
        debug!("Rejecting {} {}: {}", request.method(), request.uri().path(), e);
    })?;
    request.extensions_mut().insert(user);
    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;
    use jsonwebtoken::{EncodingKey, Header, encode};
    use serde_json::json;

    const SECRET: &str = "test-secret";

    fn settings() -> AuthSettings {
        AuthSettings::from_config(&AuthConfig {
            disabled: false,
            jwt_secret: Some(SECRET.to_string()),
        })
    }

    fn token(claims: serde_json::Value, secret: &str) -> String {
        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    fn far_future() -> i64 {
        chrono::Utc::now().timestamp() + 3600
    }

    fn headers(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn test_valid_token_yields_subject() {
        let claims = json!({"sub": "user-42", "exp": far_future(), "aud": "authenticated"});
        let jwt = token(claims, SECRET);
        assert_eq!(settings().validate_token(&jwt).unwrap(), "user-42");

        let user = settings().authenticate(&headers(&format!("Bearer {jwt}"))).unwrap();
        assert_eq!(user, AuthUser("user-42".to_string()));
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let jwt = token(json!({"sub": "user-42", "exp": far_future()}), "other-secret");
        let err = settings().validate_token(&jwt).unwrap_err();
        assert!(matches!(err, PlannerError::Unauthorized { .. }));
    }

    #[test]
    fn test_missing_subject_rejected() {
        let jwt = token(json!({"exp": far_future()}), SECRET);
        assert!(settings().validate_token(&jwt).is_err());

        let jwt = token(json!({"sub": "", "exp": far_future()}), SECRET);
        assert!(settings().validate_token(&jwt).is_err());
    }

    #[test]
    fn test_expired_token_rejected() {
        let jwt = token(json!({"sub": "user-42", "exp": 1_000_000}), SECRET);
        assert!(settings().validate_token(&jwt).is_err());
    }

    #[test]
    fn test_missing_or_malformed_header() {
        assert!(settings().authenticate(&HeaderMap::new()).is_err());
        assert!(settings().authenticate(&headers("Basic abc")).is_err());
        assert!(settings().authenticate(&headers("Bearer ")).is_err());
        assert!(settings().authenticate(&headers("Bearer not-a-jwt")).is_err());
    }

    #[test]
    fn test_no_secret_rejects_everything() {
        let settings = AuthSettings::from_config(&AuthConfig::default());
        let jwt = token(json!({"sub": "user-42", "exp": far_future()}), SECRET);
        assert!(settings.validate_token(&jwt).is_err());
    }

    #[test]
    fn test_disabled_runs_as_demo_user() {
        let settings = AuthSettings::disabled();
        assert!(settings.is_disabled());
        let user = settings.authenticate(&HeaderMap::new()).unwrap();
        assert_eq!(user.0, DEMO_USER);
    }
}
