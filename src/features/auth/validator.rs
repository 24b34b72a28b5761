use super::model::AuthenticatedUser;
use crate::core::error::AppError;
use jsonwebtoken::{decode, decode_header, Algorithm, Validation};
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;

use super::jwks::JwksClient;

/// Verifies identity-provider access tokens (RS256, keys from JWKS)
pub struct JwtValidator {
    jwks_client: Arc<JwksClient>,
    issuer: String,
    audience: Option<String>,
    leeway: u64,
}

#[derive(Debug, Clone, Deserialize)]
struct Claims {
    sub: String,
    #[serde(default)]
    sid: Option<String>,
    #[serde(default)]
    session_id: Option<String>,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    name: Option<String>,
}

impl JwtValidator {
    pub fn new(
        jwks_client: Arc<JwksClient>,
        issuer: String,
        audience: Option<String>,
        leeway: Duration,
    ) -> Self {
        Self {
            jwks_client,
            issuer,
            audience,
            leeway: leeway.as_secs(),
        }
    }

    fn validation(&self) -> Validation {
        let mut validation = Validation::new(Algorithm::RS256);
        validation.set_issuer(&[&self.issuer]);
        match &self.audience {
            Some(audience) => validation.set_audience(&[audience]),
            None => validation.validate_aud = false,
        }
        validation.leeway = self.leeway;
        validation.validate_nbf = true;
        validation
    }

    pub async fn validate_token(&self, token: &str) -> Result<AuthenticatedUser, AppError> {
        let header = decode_header(token).map_err(|e| AppError::Auth(e.to_string()))?;

        if header.alg != Algorithm::RS256 {
            return Err(AppError::Auth(format!(
                "Unsupported algorithm: {:?}. Only RS256 is allowed",
                header.alg
            )));
        }

        let kid = header
            .kid
            .ok_or_else(|| AppError::Auth("Missing kid in token header".to_string()))?;

        let decoding_key = self
            .jwks_client
            .get_key(&kid)
            .await
            .map_err(|e| AppError::Auth(e.to_string()))?;

        let claims = decode::<Claims>(token, &decoding_key, &self.validation())
            .map_err(|e| AppError::Auth(e.to_string()))?
            .claims;

        Ok(AuthenticatedUser {
            sub: claims.sub,
            session_id: claims.sid.or(claims.session_id),
            email: claims.email,
            name: claims.name,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn validator(audience: Option<&str>) -> JwtValidator {
        JwtValidator::new(
            Arc::new(JwksClient::new(
                "http://localhost/jwks",
                Duration::from_secs(60),
            )),
            "https://id.example.com".to_string(),
            audience.map(str::to_string),
            Duration::from_secs(30),
        )
    }

    #[test]
    fn test_validation_without_audience() {
        let validation = validator(None).validation();
        assert!(!validation.validate_aud);
        assert_eq!(validation.leeway, 30);
    }

    #[test]
    fn test_validation_with_audience() {
        let validation = validator(Some("haulage-api")).validation();
        assert!(validation.validate_aud);
        assert!(validation
            .aud
            .as_ref()
            .is_some_and(|aud| aud.contains("haulage-api")));
    }

    #[tokio::test]
    async fn test_rejects_non_rs256_token() {
        // HS256 header: {"alg":"HS256","typ":"JWT"}
        let token = "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9.eyJzdWIiOiJ4In0.sig";
        let err = validator(None).validate_token(token).await.unwrap_err();
        assert!(matches!(err, AppError::Auth(_)));
    }
}
