/// Authentication: JWT issuance/verification, password digests, extractors
use crate::{api::middleware::extract_bearer_token, context::AppContext, error::ApiError};
use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::AuthConfig;
use crate::error::ApiResult;

/// Claims embedded in every bearer token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject - the user id
    pub sub: Uuid,
    /// Username at issue time
    pub unique_name: String,
    /// Email at issue time
    pub email: String,
    /// Unique token identifier (UUID v4)
    pub jti: String,
    pub iat: i64,
    pub nbf: i64,
    pub exp: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iss: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aud: Option<String>,
}

/// Issue a signed, time-limited bearer token for a user
pub fn issue_token(
    user_id: Uuid,
    username: &str,
    email: &str,
    config: &AuthConfig,
) -> ApiResult<String> {
    let now = Utc::now();
    let expires = now + Duration::minutes(config.token_expiry_minutes);

    let claims = Claims {
        sub: user_id,
        unique_name: username.to_string(),
        email: email.to_string(),
        jti: Uuid::new_v4().to_string(),
        iat: now.timestamp(),
        nbf: now.timestamp(),
        exp: expires.timestamp(),
        iss: config.jwt_issuer.clone(),
        aud: config.jwt_audience.clone(),
    };

    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(config.jwt_secret.as_bytes()),
    )
    .map_err(|e| ApiError::Internal(format!("Token signing failed: {}", e)))
}

/// Verify a bearer token: signature, expiry, and configured issuer/audience
pub fn verify_token(token: &str, config: &AuthConfig) -> ApiResult<Claims> {
    let mut validation = Validation::new(Algorithm::HS256);
    // Allow some clock skew (5 minutes)
    validation.leeway = 300;

    match &config.jwt_audience {
        Some(aud) => validation.set_audience(&[aud]),
        None => validation.validate_aud = false,
    }
    if let Some(iss) = &config.jwt_issuer {
        validation.set_issuer(&[iss]);
    }

    decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.jwt_secret.as_bytes()),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|e| {
        tracing::debug!("Token verification failed: {}", e);
        match e.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
                ApiError::Authentication("Token has expired".to_string())
            }
            jsonwebtoken::errors::ErrorKind::InvalidSignature => {
                ApiError::Authentication("Invalid token signature".to_string())
            }
            _ => ApiError::Authentication(format!("Invalid token: {}", e)),
        }
    })
}

/// Hash a password with Argon2id and a random salt, PHC string format
pub fn hash_password(password: &str) -> ApiResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| ApiError::Internal(format!("Password hashing failed: {}", e)))
}

/// Verify a password against a stored PHC-formatted digest
pub fn verify_password(password: &str, digest: &str) -> ApiResult<bool> {
    let parsed = PasswordHash::new(digest)
        .map_err(|e| ApiError::Internal(format!("Stored password digest is invalid: {}", e)))?;
    match Argon2::default().verify_password(password.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(ApiError::Internal(format!(
            "Password verification failed: {}",
            e
        ))),
    }
}

/// Authenticated caller - extracted from the bearer token
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: Uuid,
    pub username: String,
    pub email: String,
}

impl AuthUser {
    /// Require that the token subject owns the addressed user resource
    pub fn require_user(&self, user_id: Uuid) -> ApiResult<()> {
        if self.user_id != user_id {
            return Err(ApiError::Forbidden(
                "Token does not match the requested user".to_string(),
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl FromRequestParts<AppContext> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppContext,
    ) -> Result<Self, Self::Rejection> {
        let token = extract_bearer_token(&parts.headers)
            .ok_or_else(|| ApiError::Authentication("Missing authorization header".to_string()))?;

        let claims = verify_token(&token, &state.config.authentication)?;

        Ok(AuthUser {
            user_id: claims.sub,
            username: claims.unique_name,
            email: claims.email,
        })
    }
}

/// Optional authenticated caller - used by browse/search endpoints for the
/// per-user bookmark/rating overlay. An absent or invalid token is not an
/// error; the response simply carries no user columns.
#[derive(Debug, Clone)]
pub struct OptionalAuthUser(pub Option<AuthUser>);

impl OptionalAuthUser {
    pub fn user_id(&self) -> Option<Uuid> {
        self.0.as_ref().map(|u| u.user_id)
    }
}

#[async_trait]
impl FromRequestParts<AppContext> for OptionalAuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppContext,
    ) -> Result<Self, Self::Rejection> {
        let user = extract_bearer_token(&parts.headers)
            .and_then(|token| verify_token(&token, &state.config.authentication).ok())
            .map(|claims| AuthUser {
                user_id: claims.sub,
                username: claims.unique_name,
                email: claims.email,
            });

        Ok(OptionalAuthUser(user))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn auth_config() -> AuthConfig {
        AuthConfig {
            jwt_secret: "0123456789abcdef0123456789abcdef".to_string(),
            jwt_issuer: None,
            jwt_audience: None,
            token_expiry_minutes: 60,
        }
    }

    #[test]
    fn token_round_trip_restores_claims() {
        let config = auth_config();
        let user_id = Uuid::new_v4();

        let token = issue_token(user_id, "alice", "a@x.com", &config).unwrap();
        let claims = verify_token(&token, &config).unwrap();

        assert_eq!(claims.sub, user_id);
        assert_eq!(claims.unique_name, "alice");
        assert_eq!(claims.email, "a@x.com");
        assert!(!claims.jti.is_empty());
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn each_token_gets_a_unique_jti() {
        let config = auth_config();
        let user_id = Uuid::new_v4();

        let a = verify_token(
            &issue_token(user_id, "alice", "a@x.com", &config).unwrap(),
            &config,
        )
        .unwrap();
        let b = verify_token(
            &issue_token(user_id, "alice", "a@x.com", &config).unwrap(),
            &config,
        )
        .unwrap();
        assert_ne!(a.jti, b.jti);
    }

    #[test]
    fn expired_token_is_rejected() {
        let config = auth_config();
        let now = Utc::now();
        // Expired well past the 5-minute leeway.
        let claims = Claims {
            sub: Uuid::new_v4(),
            unique_name: "alice".to_string(),
            email: "a@x.com".to_string(),
            jti: Uuid::new_v4().to_string(),
            iat: (now - Duration::hours(3)).timestamp(),
            nbf: (now - Duration::hours(3)).timestamp(),
            exp: (now - Duration::hours(2)).timestamp(),
            iss: None,
            aud: None,
        };
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(config.jwt_secret.as_bytes()),
        )
        .unwrap();

        let err = verify_token(&token, &config).unwrap_err();
        assert!(err.to_string().contains("expired"));
    }

    #[test]
    fn token_signed_with_other_secret_is_rejected() {
        let config = auth_config();
        let mut other = auth_config();
        other.jwt_secret = "ffffffffffffffffffffffffffffffff".to_string();

        let token = issue_token(Uuid::new_v4(), "alice", "a@x.com", &other).unwrap();
        assert!(verify_token(&token, &config).is_err());
    }

    #[test]
    fn password_digest_verifies() {
        let digest = hash_password("P@ss1word").unwrap();
        assert!(digest.starts_with("$argon2id$"));
        assert!(verify_password("P@ss1word", &digest).unwrap());
        assert!(!verify_password("wrong", &digest).unwrap());
    }

    #[test]
    fn ownership_check_rejects_other_users() {
        let user = AuthUser {
            user_id: Uuid::new_v4(),
            username: "alice".to_string(),
            email: "a@x.com".to_string(),
        };
        assert!(user.require_user(user.user_id).is_ok());
        assert!(user.require_user(Uuid::new_v4()).is_err());
    }
}
