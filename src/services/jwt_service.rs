use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::config::EnvironmentConfig;
use crate::models::role::Role;
use crate::utils::errors::AppError;

/// Claims del JWT
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtClaims {
    pub sub: String, // user_id
    pub email: String,
    pub role: Role,
    pub exp: i64,
    pub iat: i64,
}

impl JwtClaims {
    pub fn user_id(&self) -> Result<i64, AppError> {
        self.sub
            .parse()
            .map_err(|_| AppError::Jwt("ID de usuario inválido en el token".to_string()))
    }
}

/// Servicio JWT
#[derive(Clone)]
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    algorithm: Algorithm,
    expiration: Duration,
}

impl JwtService {
    pub fn new(secret: &str, expiration_secs: u64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            algorithm: Algorithm::HS256,
            expiration: Duration::seconds(expiration_secs as i64),
        }
    }

    pub fn from_config(config: &EnvironmentConfig) -> Self {
        Self::new(&config.jwt_secret, config.jwt_expiration)
    }

    /// Genera un token de acceso y su fecha de expiración
    pub fn generate_token(
        &self,
        user_id: i64,
        email: &str,
        role: Role,
    ) -> Result<(String, DateTime<Utc>), AppError> {
        let now = Utc::now();
        let expires_at = now + self.expiration;

        let claims = JwtClaims {
            sub: user_id.to_string(),
            email: email.to_string(),
            role,
            exp: expires_at.timestamp(),
            iat: now.timestamp(),
        };

        let token = encode(&Header::new(self.algorithm), &claims, &self.encoding_key)
            .map_err(|e| AppError::Internal(format!("Error generando token: {}", e)))?;

        Ok((token, expires_at))
    }

    /// Valida firma y expiración, y decodifica los claims
    pub fn validate_token(&self, token: &str) -> Result<JwtClaims, AppError> {
        let mut validation = Validation::new(self.algorithm);
        validation.leeway = 0;

        decode::<JwtClaims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| AppError::Jwt(format!("Token inválido: {}", e)))
    }
}

/// Extraer token del header Authorization
pub fn extract_bearer_token(auth_header: &str) -> Result<&str, AppError> {
    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or_else(|| AppError::Unauthorized("Header Authorization debe comenzar con 'Bearer '".to_string()))?
        .trim();

    if token.is_empty() {
        return Err(AppError::Unauthorized("Token no puede estar vacío".to_string()));
    }

    Ok(token)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_and_validate_token() {
        let jwt_service = JwtService::new("test-secret", 3600);

        let (token, expires_at) = jwt_service
            .generate_token(42, "operador@rentacar.mx", Role::Operador)
            .unwrap();
        assert!(!token.is_empty());
        assert!(expires_at > Utc::now());

        let claims = jwt_service.validate_token(&token).unwrap();
        assert_eq!(claims.user_id().unwrap(), 42);
        assert_eq!(claims.email, "operador@rentacar.mx");
        assert_eq!(claims.role, Role::Operador);
    }

    #[test]
    fn test_rejects_foreign_signature() {
        let issuer = JwtService::new("secret-a", 3600);
        let verifier = JwtService::new("secret-b", 3600);

        let (token, _) = issuer.generate_token(1, "a@b.com", Role::Admin).unwrap();
        assert!(matches!(verifier.validate_token(&token), Err(AppError::Jwt(_))));
    }

    #[test]
    fn test_rejects_expired_token() {
        let jwt_service = JwtService::new("test-secret", 3600);
        let claims = JwtClaims {
            sub: "1".to_string(),
            email: "a@b.com".to_string(),
            role: Role::Cliente,
            exp: (Utc::now() - Duration::hours(1)).timestamp(),
            iat: (Utc::now() - Duration::hours(2)).timestamp(),
        };
        let token = encode(&Header::default(), &claims, &EncodingKey::from_secret(b"test-secret")).unwrap();

        assert!(jwt_service.validate_token(&token).is_err());
    }

    #[test]
    fn test_extract_bearer_token() {
        assert_eq!(extract_bearer_token("Bearer abc.def.ghi").unwrap(), "abc.def.ghi");
        assert!(extract_bearer_token("Basic dXNlcjpwYXNz").is_err());
        assert!(extract_bearer_token("Bearer ").is_err());
    }
}
