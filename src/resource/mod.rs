pub mod login;
pub mod signup;

pub use login::login;
pub use signup::signup;

use actix_web::web;
use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::AuthError;
use crate::models::User;

/// Request body shared by login and signup.
///
/// Absent fields default to empty strings so a missing field and an empty
/// field validate identically.
#[derive(Deserialize)]
pub struct AuthParams {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

impl AuthParams {
    pub fn validate(&self) -> Result<(), AuthError> {
        if self.username.is_empty() || self.password.is_empty() {
            return Err(AuthError::Validation);
        }
        Ok(())
    }
}

/// The public view of a user record. Never carries the password hash.
#[derive(Serialize)]
pub struct AuthUser {
    pub id: i32,
    pub username: String,
}

impl From<User> for AuthUser {
    fn from(user: User) -> AuthUser {
        AuthUser {
            id: user.id,
            username: user.username,
        }
    }
}

#[derive(Serialize)]
pub struct AuthResponse {
    pub success: bool,
    pub user: AuthUser,
}

/// API guide (keep updated!)
/// - /api/auth/login
///     - POST { username, password }: log user in
/// - /api/auth/signup
///     - POST { username, password }: create account
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(
        web::JsonConfig::default()
            .limit(4096)
            .error_handler(|err, _req| {
                debug!("rejected request body: {}", err);
                AuthError::Validation.into()
            }),
    )
    .service(
        web::scope("/api/auth")
            .service(web::resource("/login").route(web::post().to(login)))
            .service(web::resource("/signup").route(web::post().to(signup))),
    );
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::bootstrap;
    use crate::store::test::test_store;
    use actix_http::Request;
    use actix_web::dev::{Service, ServiceResponse};
    use actix_web::http::StatusCode;
    use actix_web::{test, web, App, Error};
    use serde_json::{json, Value};
    use tempfile::TempDir;

    async fn test_app(
    ) -> (TempDir, impl Service<Request, Response = ServiceResponse, Error = Error>) {
        let (tmp, store) = test_store();
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(store))
                .configure(configure),
        )
        .await;
        (tmp, app)
    }

    async fn post(
        app: &impl Service<Request, Response = ServiceResponse, Error = Error>,
        uri: &str,
        body: Value,
    ) -> ServiceResponse {
        let req = test::TestRequest::post().uri(uri).set_json(body).to_request();
        test::call_service(app, req).await
    }

    #[actix_web::test]
    async fn test_signup_returns_identity() {
        let (_tmp, app) = test_app().await;

        let resp = post(
            &app,
            "/api/auth/signup",
            json!({"username": "alice", "password": "secret1"}),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::OK);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["success"], json!(true));
        assert_eq!(body["user"]["username"], json!("alice"));
        assert!(body["user"]["id"].is_i64());
        // the hash stays server-side
        assert_eq!(body["user"]["password_hash"], Value::Null);
    }

    #[actix_web::test]
    async fn test_signup_duplicate_conflict() {
        let (_tmp, app) = test_app().await;

        let first = post(
            &app,
            "/api/auth/signup",
            json!({"username": "alice", "password": "secret1"}),
        )
        .await;
        assert_eq!(first.status(), StatusCode::OK);

        let second = post(
            &app,
            "/api/auth/signup",
            json!({"username": "alice", "password": "other"}),
        )
        .await;
        assert_eq!(second.status(), StatusCode::CONFLICT);

        let body: Value = test::read_body_json(second).await;
        assert_eq!(body["error"], json!("User already exists"));
    }

    #[actix_web::test]
    async fn test_login_round_trip() {
        let (_tmp, app) = test_app().await;

        post(
            &app,
            "/api/auth/signup",
            json!({"username": "alice", "password": "secret1"}),
        )
        .await;

        let resp = post(
            &app,
            "/api/auth/login",
            json!({"username": "alice", "password": "secret1"}),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::OK);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["success"], json!(true));
        assert_eq!(body["user"]["username"], json!("alice"));
    }

    #[actix_web::test]
    async fn test_login_rejections_are_indistinguishable() {
        let (_tmp, app) = test_app().await;

        post(
            &app,
            "/api/auth/signup",
            json!({"username": "alice", "password": "secret1"}),
        )
        .await;

        let wrong_password = post(
            &app,
            "/api/auth/login",
            json!({"username": "alice", "password": "wrong"}),
        )
        .await;
        let unknown_user = post(
            &app,
            "/api/auth/login",
            json!({"username": "nonexistent", "password": "x"}),
        )
        .await;

        assert_eq!(wrong_password.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(unknown_user.status(), StatusCode::UNAUTHORIZED);

        let body_a: Value = test::read_body_json(wrong_password).await;
        let body_b: Value = test::read_body_json(unknown_user).await;
        assert_eq!(body_a, body_b);
        assert_eq!(body_a["error"], json!("Invalid credentials"));
    }

    #[actix_web::test]
    async fn test_missing_fields_rejected() {
        let (_tmp, app) = test_app().await;

        for uri in ["/api/auth/login", "/api/auth/signup"] {
            for body in [
                json!({}),
                json!({"username": "alice"}),
                json!({"password": "secret1"}),
                json!({"username": "", "password": "secret1"}),
                json!({"username": "alice", "password": ""}),
            ] {
                let resp = post(&app, uri, body.clone()).await;
                assert_eq!(
                    resp.status(),
                    StatusCode::BAD_REQUEST,
                    "{} accepted {}",
                    uri,
                    body
                );
            }
        }
    }

    #[actix_web::test]
    async fn test_malformed_body_rejected() {
        let (_tmp, app) = test_app().await;

        let req = test::TestRequest::post()
            .uri("/api/auth/login")
            .insert_header(("content-type", "application/json"))
            .set_payload("{not json")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn test_default_account_login() {
        let (_tmp, app) = test_app().await;

        // empty store: the first auth request bootstraps the default account
        let resp = post(
            &app,
            "/api/auth/login",
            json!({
                "username": bootstrap::DEFAULT_USERNAME,
                "password": bootstrap::DEFAULT_PASSWORD,
            }),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::OK);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["user"]["username"], json!(bootstrap::DEFAULT_USERNAME));
    }
}
