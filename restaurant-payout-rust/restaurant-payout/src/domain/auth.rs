use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use crate::domain::error::AuthError;
use crate::infrastructure::config::SecurityConfig;

pub const ACCESS_TOKEN_TYPE: &str = "access";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Restaurant,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Restaurant => "restaurant",
            Role::Admin => "admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = AuthError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "restaurant" => Ok(Role::Restaurant),
            "admin" => Ok(Role::Admin),
            other => Err(AuthError::InvalidToken(format!("unknown role '{other}'"))),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // Restaurant or admin id
    pub role: Role,
    pub exp: i64,
    pub iat: i64,
    pub typ: String,
}

#[derive(Clone)]
pub struct AuthManager {
    secret: String,
    token_ttl: Duration,
}

impl AuthManager {
    pub fn new(secret: impl Into<String>, token_ttl_hours: i64) -> Self {
        Self {
            secret: secret.into(),
            token_ttl: Duration::hours(token_ttl_hours),
        }
    }

    pub fn from_config(config: &SecurityConfig) -> Self {
        Self::new(config.jwt_secret.clone(), config.token_ttl_hours)
    }

    /// Generate a secure JWT secret
    pub fn generate_jwt_secret() -> String {
        let mut rng = rand::rng();
        let bytes: [u8; 64] = rng.random(); // 512-bit secret
        hex::encode(bytes)
    }

    pub fn generate_token(&self, subject: &str, role: Role) -> Result<String, AuthError> {
        let now = Utc::now();
        let claims = Claims {
            sub: subject.to_string(),
            role,
            exp: (now + self.token_ttl).timestamp(),
            iat: now.timestamp(),
            typ: ACCESS_TOKEN_TYPE.to_string(),
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_ref()),
        )
        .map_err(|e| AuthError::InvalidToken(format!("failed to sign token: {e}")))
    }

    pub fn verify_token(&self, token: &str) -> Result<Claims, AuthError> {
        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_ref()),
            &Validation::default(),
        )
        .map_err(|e| AuthError::InvalidToken(e.to_string()))?;

        if token_data.claims.typ != ACCESS_TOKEN_TYPE {
            return Err(AuthError::InvalidToken(format!("unexpected token type '{}'", token_data.claims.typ)));
        }
        if token_data.claims.sub.trim().is_empty() {
            return Err(AuthError::InvalidToken("empty subject".to_string()));
        }

        Ok(token_data.claims)
    }

    /// Generate secure secrets for production
    pub fn generate_production_secrets() -> HashMap<String, String> {
        let mut secrets = HashMap::new();
        secrets.insert("JWT_SECRET".to_string(), Self::generate_jwt_secret());
        secrets.insert("MAIL_API_KEY".to_string(), Self::generate_random_string(32));
        secrets
    }

    fn generate_random_string(length: usize) -> String {
        let mut rng = rand::rng();
        let chars: Vec<char> = "abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789".chars().collect();

        (0..length)
            .map(|_| chars[rng.random_range(0..chars.len())])
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test_secret_for_jwt_verification_1234567890abcdef";

    #[test]
    fn test_jwt_secret_generation() {
        let secret1 = AuthManager::generate_jwt_secret();
        let secret2 = AuthManager::generate_jwt_secret();

        assert_eq!(secret1.len(), 128); // 64 bytes = 128 hex chars
        assert_ne!(secret1, secret2);
    }

    #[test]
    fn test_token_round_trip_keeps_role() {
        let auth = AuthManager::new(SECRET, 1);

        let token = auth.generate_token("rest-42", Role::Restaurant).unwrap();
        let claims = auth.verify_token(&token).unwrap();

        assert_eq!(claims.sub, "rest-42");
        assert_eq!(claims.role, Role::Restaurant);
        assert_eq!(claims.typ, ACCESS_TOKEN_TYPE);
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let token = AuthManager::new(SECRET, 1).generate_token("admin-1", Role::Admin).unwrap();
        let other = AuthManager::new("another_secret_another_secret_another", 1);

        assert!(matches!(other.verify_token(&token), Err(AuthError::InvalidToken(_))));
    }

    #[test]
    fn test_expired_token_rejected() {
        let auth = AuthManager::new(SECRET, -2);
        let token = auth.generate_token("admin-1", Role::Admin).unwrap();

        assert!(auth.verify_token(&token).is_err());
    }

    #[test]
    fn test_role_parsing() {
        assert_eq!("ADMIN".parse::<Role>().unwrap(), Role::Admin);
        assert_eq!(" restaurant ".parse::<Role>().unwrap(), Role::Restaurant);
        assert!("driver".parse::<Role>().is_err());
    }

    #[test]
    fn test_production_secrets_generation() {
        let secrets = AuthManager::generate_production_secrets();

        assert_eq!(secrets["JWT_SECRET"].len(), 128);
        assert_eq!(secrets["MAIL_API_KEY"].len(), 32);
    }
}
