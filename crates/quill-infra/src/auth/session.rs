//! JWT session tokens.
//!
//! The session cookie value is a signed JWT carrying the user's durable id,
//! display name, email, and role. Validation re-checks the signature, expiry,
//! and issuer on every request.

use chrono::{TimeDelta, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use quill_core::domain::{Role, User};
use quill_core::ports::{AuthError, SessionClaims, SessionService};

/// Session signing configuration.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub secret: String,
    pub ttl_hours: i64,
    pub issuer: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            secret: "change-me-in-production".to_string(),
            ttl_hours: 24,
            issuer: "quill".to_string(),
        }
    }
}

impl SessionConfig {
    /// Load from environment. `SECRET_KEY` is the single signing secret the
    /// whole application uses.
    pub fn from_env() -> Self {
        let secret =
            std::env::var("SECRET_KEY").unwrap_or_else(|_| "change-me-in-production".to_string());

        if secret == "change-me-in-production" {
            let is_production = std::env::var("RUST_ENV")
                .map(|v| v == "production" || v == "prod")
                .unwrap_or(false);

            if is_production {
                tracing::error!(
                    "SECURITY: Using default session secret in production! Set the SECRET_KEY environment variable."
                );
            } else {
                tracing::warn!("Using default session secret. Set SECRET_KEY for production use.");
            }
        }

        Self {
            secret,
            ttl_hours: std::env::var("SESSION_TTL_HOURS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(24),
            issuer: std::env::var("SESSION_ISSUER").unwrap_or_else(|_| "quill".to_string()),
        }
    }
}

/// On-the-wire claims layout.
#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String,
    name: String,
    email: String,
    role: String,
    exp: i64,
    iat: i64,
    iss: String,
}

/// JWT-based session service.
pub struct JwtSessions {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    config: SessionConfig,
}

impl JwtSessions {
    pub fn new(config: SessionConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());

        Self {
            encoding_key,
            decoding_key,
            config,
        }
    }
}

impl SessionService for JwtSessions {
    fn issue(&self, user: &User) -> Result<String, AuthError> {
        let now = Utc::now();
        let exp = now + TimeDelta::hours(self.config.ttl_hours);

        let claims = Claims {
            sub: user.id.to_string(),
            name: user.name.clone(),
            email: user.email.clone(),
            role: user.role.as_str().to_string(),
            exp: exp.timestamp(),
            iat: now.timestamp(),
            iss: self.config.issuer.clone(),
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| AuthError::InvalidSession(e.to_string()))
    }

    fn validate(&self, token: &str) -> Result<SessionClaims, AuthError> {
        let mut validation = Validation::default();
        validation.set_issuer(&[&self.config.issuer]);

        let data = decode::<Claims>(token, &self.decoding_key, &validation).map_err(|e| {
            match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::SessionExpired,
                _ => AuthError::InvalidSession(e.to_string()),
            }
        })?;

        let user_id = Uuid::parse_str(&data.claims.sub)
            .map_err(|e| AuthError::InvalidSession(e.to_string()))?;
        let role = Role::parse(&data.claims.role)
            .ok_or_else(|| AuthError::InvalidSession(format!("unknown role {}", data.claims.role)))?;

        Ok(SessionClaims {
            user_id,
            email: data.claims.email,
            name: data.claims.name,
            role,
            exp: data.claims.exp,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> SessionConfig {
        SessionConfig {
            secret: "test-secret-key".to_string(),
            ttl_hours: 1,
            issuer: "quill-test".to_string(),
        }
    }

    fn test_user(role: Role) -> User {
        User::new(
            "reader@example.com".to_string(),
            "hash".to_string(),
            "Reader".to_string(),
            role,
        )
    }

    #[test]
    fn issue_then_validate_recovers_the_identity() {
        let sessions = JwtSessions::new(test_config());
        let user = test_user(Role::Admin);

        let token = sessions.issue(&user).unwrap();
        let claims = sessions.validate(&token).unwrap();

        assert_eq!(claims.user_id, user.id);
        assert_eq!(claims.email, user.email);
        assert_eq!(claims.name, user.name);
        assert_eq!(claims.role, Role::Admin);
    }

    #[test]
    fn garbage_token_is_rejected() {
        let sessions = JwtSessions::new(test_config());

        let result = sessions.validate("not-a-token");

        assert!(matches!(result, Err(AuthError::InvalidSession(_))));
    }

    #[test]
    fn token_from_another_issuer_is_rejected() {
        let a = JwtSessions::new(SessionConfig {
            secret: "same-secret".to_string(),
            ttl_hours: 1,
            issuer: "blog-a".to_string(),
        });
        let b = JwtSessions::new(SessionConfig {
            secret: "same-secret".to_string(),
            ttl_hours: 1,
            issuer: "blog-b".to_string(),
        });

        let token = a.issue(&test_user(Role::Reader)).unwrap();

        assert!(b.validate(&token).is_err());
    }

    #[test]
    fn expired_token_is_rejected_as_expired() {
        let sessions = JwtSessions::new(SessionConfig {
            secret: "test-secret-key".to_string(),
            ttl_hours: -1,
            issuer: "quill-test".to_string(),
        });

        let token = sessions.issue(&test_user(Role::Reader)).unwrap();

        assert!(matches!(
            sessions.validate(&token),
            Err(AuthError::SessionExpired)
        ));
    }
}
