//! Bearer-token extractors.
//!
//! `AuthenticatedUser` accepts any valid token. `RestaurantUser` and
//! `AdminUser` additionally enforce the role and answer 403 otherwise.

use actix_web::{dev::Payload, http::header, web, FromRequest, HttpRequest};
use futures_util::future::{ready, Ready};

use crate::domain::auth::{AuthManager, Role};
use crate::domain::error::{ApiError, AuthError};

#[derive(Debug, Clone, PartialEq)]
pub struct AuthenticatedUser {
    pub id: String,
    pub role: Role,
}

impl AuthenticatedUser {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    pub fn require(&self, role: Role) -> Result<&str, AuthError> {
        if self.role == role {
            Ok(&self.id)
        } else {
            Err(AuthError::Forbidden(format!("{} role required", role)))
        }
    }
}

fn bearer_token(req: &HttpRequest) -> Result<&str, AuthError> {
    let value = req
        .headers()
        .get(header::AUTHORIZATION)
        .ok_or(AuthError::MissingToken)?
        .to_str()
        .map_err(|_| AuthError::InvalidToken("malformed authorization header".to_string()))?;

    match value.split_once(' ') {
        Some((scheme, token)) if scheme.eq_ignore_ascii_case("bearer") && !token.trim().is_empty() => Ok(token.trim()),
        _ => Err(AuthError::InvalidToken("expected 'Bearer <token>'".to_string())),
    }
}

fn authenticate(req: &HttpRequest) -> Result<AuthenticatedUser, ApiError> {
    let auth = req
        .app_data::<web::Data<AuthManager>>()
        .ok_or_else(|| ApiError::Internal("auth manager not registered".to_string()))?;

    let token = bearer_token(req)?;
    let claims = auth.verify_token(token).map_err(|e| {
        tracing::debug!(error = %e, path = req.path(), "Rejected bearer token");
        e
    })?;

    Ok(AuthenticatedUser {
        id: claims.sub,
        role: claims.role,
    })
}

impl FromRequest for AuthenticatedUser {
    type Error = ApiError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(authenticate(req))
    }
}

/// A caller holding the restaurant role; `0` is the restaurant id.
#[derive(Debug, Clone)]
pub struct RestaurantUser(pub String);

impl FromRequest for RestaurantUser {
    type Error = ApiError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(authenticate(req).and_then(|user| Ok(RestaurantUser(user.require(Role::Restaurant)?.to_string()))))
    }
}

/// A caller holding the admin role; `0` is the admin id.
#[derive(Debug, Clone)]
pub struct AdminUser(pub String);

impl FromRequest for AdminUser {
    type Error = ApiError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(authenticate(req).and_then(|user| Ok(AdminUser(user.require(Role::Admin)?.to_string()))))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    const SECRET: &str = "extractor_test_secret_0123456789abcdef";

    fn request_with(token: Option<&str>) -> HttpRequest {
        let mut req = TestRequest::default().app_data(web::Data::new(AuthManager::new(SECRET, 1)));
        if let Some(token) = token {
            req = req.insert_header((header::AUTHORIZATION, format!("Bearer {token}")));
        }
        req.to_http_request()
    }

    #[test]
    fn test_missing_header_is_unauthorized() {
        let err = authenticate(&request_with(None)).unwrap_err();
        assert!(matches!(err, ApiError::Auth(AuthError::MissingToken)));
    }

    #[test]
    fn test_garbage_token_is_invalid() {
        let err = authenticate(&request_with(Some("not-a-jwt"))).unwrap_err();
        assert!(matches!(err, ApiError::Auth(AuthError::InvalidToken(_))));
    }

    #[test]
    fn test_wrong_scheme_rejected() {
        let req = TestRequest::default()
            .app_data(web::Data::new(AuthManager::new(SECRET, 1)))
            .insert_header((header::AUTHORIZATION, "Basic abc"))
            .to_http_request();
        assert!(authenticate(&req).is_err());
    }

    #[actix_web::test]
    async fn test_role_extractors() {
        let token = AuthManager::new(SECRET, 1).generate_token("rest-7", Role::Restaurant).unwrap();
        let req = request_with(Some(&token));

        let user = RestaurantUser::extract(&req).await.unwrap();
        assert_eq!(user.0, "rest-7");

        let err = AdminUser::extract(&req).await.unwrap_err();
        assert!(matches!(err, ApiError::Auth(AuthError::Forbidden(_))));
    }
}
