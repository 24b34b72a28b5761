use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use sha2::{Digest, Sha256};

use crate::core::config::AdminConfig;
use crate::core::error::{AppError, Result};
use crate::features::auth::dtos::AdminLoginResponseDto;
use crate::features::auth::model::{AdminSession, AdminSessionClaims, AdminTier};

const SESSION_ISSUER: &str = "haulage-core/admin";

/// Issues and verifies the HS256 session tokens of the two admin tiers
pub struct AdminSessionService {
    admin_digest: [u8; 32],
    super_admin_digest: [u8; 32],
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    ttl_secs: i64,
}

impl AdminSessionService {
    pub fn new(config: &AdminConfig) -> Self {
        let secret = config.session_secret.as_bytes();

        Self {
            admin_digest: digest(&config.admin_password),
            super_admin_digest: digest(&config.super_admin_password),
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            ttl_secs: i64::try_from(config.session_ttl.as_secs()).unwrap_or(i64::MAX),
        }
    }

    /// Exchange a tier password for a session token
    pub fn login(&self, tier: AdminTier, password: &str) -> Result<AdminLoginResponseDto> {
        let expected = match tier {
            AdminTier::Admin => &self.admin_digest,
            AdminTier::SuperAdmin => &self.super_admin_digest,
        };

        if !digests_match(&digest(password), expected) {
            tracing::warn!("Rejected {} login: wrong password", tier);
            return Err(AppError::Unauthorized("Invalid password".to_string()));
        }

        let response = self.issue(tier, Utc::now().timestamp())?;
        tracing::info!("{} session issued, expires at {}", tier, response.expires_at);
        Ok(response)
    }

    fn issue(&self, tier: AdminTier, issued_at: i64) -> Result<AdminLoginResponseDto> {
        let claims = AdminSessionClaims {
            iss: SESSION_ISSUER.to_string(),
            tier,
            iat: issued_at,
            exp: issued_at.saturating_add(self.ttl_secs),
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AppError::Internal(format!("Failed to sign admin session: {}", e)))?;

        Ok(AdminLoginResponseDto {
            token,
            tier,
            expires_at: claims.exp,
        })
    }

    /// Check signature and expiry of a session token
    pub fn verify(&self, token: &str) -> Result<AdminSession> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[SESSION_ISSUER]);
        validation.set_required_spec_claims(&["exp", "iat", "iss"]);
        validation.leeway = 0;

        let claims = decode::<AdminSessionClaims>(token, &self.decoding_key, &validation)
            .map_err(|e| AppError::Unauthorized(format!("Invalid admin session: {}", e)))?
            .claims;

        Ok(AdminSession {
            tier: claims.tier,
            issued_at: claims.iat,
            expires_at: claims.exp,
        })
    }
}

fn digest(password: &str) -> [u8; 32] {
    Sha256::digest(password.as_bytes()).into()
}

/// Fixed-length comparison without early exit
fn digests_match(a: &[u8; 32], b: &[u8; 32]) -> bool {
    a.iter().zip(b.iter()).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn service() -> AdminSessionService {
        AdminSessionService::new(&AdminConfig {
            admin_password: "admin-pass".to_string(),
            super_admin_password: "super-pass".to_string(),
            session_secret: "0123456789abcdef0123456789abcdef".to_string(),
            session_ttl: Duration::from_secs(24 * 60 * 60),
        })
    }

    #[test]
    fn test_login_and_verify() {
        let service = service();
        let response = service.login(AdminTier::Admin, "admin-pass").unwrap();

        let session = service.verify(&response.token).unwrap();
        assert_eq!(session.tier, AdminTier::Admin);
        assert_eq!(session.expires_at - session.issued_at, 86_400);
    }

    #[test]
    fn test_passwords_are_tier_specific() {
        let service = service();
        assert!(service.login(AdminTier::Admin, "super-pass").is_err());
        assert!(service.login(AdminTier::SuperAdmin, "admin-pass").is_err());
        assert!(service.login(AdminTier::SuperAdmin, "super-pass").is_ok());
    }

    #[test]
    fn test_expired_session_is_rejected() {
        let service = service();
        let two_days_ago = Utc::now().timestamp() - 2 * 86_400;
        let response = service.issue(AdminTier::SuperAdmin, two_days_ago).unwrap();

        let err = service.verify(&response.token).unwrap_err();
        assert!(matches!(err, AppError::Unauthorized(_)));
    }

    #[test]
    fn test_token_from_other_secret_is_rejected() {
        let other = AdminSessionService::new(&AdminConfig {
            admin_password: "admin-pass".to_string(),
            super_admin_password: "super-pass".to_string(),
            session_secret: "ffffffffffffffffffffffffffffffff".to_string(),
            session_ttl: Duration::from_secs(60),
        });
        let response = other.login(AdminTier::Admin, "admin-pass").unwrap();

        assert!(service().verify(&response.token).is_err());
    }
}
