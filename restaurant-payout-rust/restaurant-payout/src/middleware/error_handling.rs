use actix_web::{error, web, HttpRequest};

use crate::domain::error::ApiError;

/// Malformed JSON bodies answer with the standard error envelope.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(16 * 1024)
        .error_handler(|err: error::JsonPayloadError, req: &HttpRequest| {
            tracing::debug!(path = req.path(), error = %err, "Rejected JSON body");
            ApiError::BadRequest(err.to_string()).into()
        })
}

/// Bad query strings, such as an unknown status filter, answer 400.
pub fn query_config() -> web::QueryConfig {
    web::QueryConfig::default().error_handler(|err: error::QueryPayloadError, req: &HttpRequest| {
        tracing::debug!(path = req.path(), error = %err, "Rejected query string");
        ApiError::BadRequest(err.to_string()).into()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{http::StatusCode, test, App, HttpResponse};
    use serde::Deserialize;

    #[derive(Deserialize)]
    struct Params {
        #[allow(dead_code)]
        page: u32,
    }

    #[actix_web::test]
    async fn test_bad_query_uses_error_envelope() {
        let app = test::init_service(App::new().app_data(query_config()).route(
            "/",
            web::get().to(|_: web::Query<Params>| async { HttpResponse::Ok().finish() }),
        ))
        .await;

        let res = test::call_service(&app, test::TestRequest::get().uri("/?page=abc").to_request()).await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);

        let body: serde_json::Value = test::read_body_json(res).await;
        assert_eq!(body["error"], "BAD_REQUEST");
    }
}
