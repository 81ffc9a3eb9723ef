//! Registration, login and identity HTTP handlers.
//!
//! ```text
//! POST /api/auth/register {"username":"alice","password":"password123"}
//! POST /api/auth/login    {"username":"alice","password":"password123"}
//! GET  /api/auth/me       Authorization: <token>
//! ```

use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{ApiResult, BearerToken, Error, LoginCredentials, User};

use super::identity_gate::{CurrentUser, RequireIdentity};
use super::state::HttpState;
use super::validation::{map_login_validation_error, missing_field_error};

/// Credentials body shared by register and login.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct CredentialsRequest {
    #[schema(example = "alice")]
    pub username: Option<String>,
    #[schema(example = "password123")]
    pub password: Option<String>,
}

fn required_parts(payload: CredentialsRequest) -> Result<(String, String), Error> {
    let username = payload
        .username
        .ok_or_else(|| missing_field_error("username"))?;
    let password = payload
        .password
        .ok_or_else(|| missing_field_error("password"))?;
    Ok((username, password))
}

fn parse_registration(payload: CredentialsRequest) -> Result<LoginCredentials, Error> {
    let (username, password) = required_parts(payload)?;
    LoginCredentials::try_from_parts(&username, &password).map_err(map_login_validation_error)
}

/// Login names are looked up verbatim; only absent or empty fields are
/// rejected before the identity service sees them.
fn parse_login(payload: CredentialsRequest) -> Result<LoginCredentials, Error> {
    let (username, password) = required_parts(payload)?;
    LoginCredentials::for_login(&username, &password).map_err(map_login_validation_error)
}

/// Register a new user.
#[utoipa::path(
    post,
    path = "/api/auth/register",
    request_body = CredentialsRequest,
    responses(
        (status = 201, description = "User created", body = User),
        (status = 400, description = "Invalid request", body = Error),
        (status = 409, description = "Username already taken", body = Error),
        (status = 503, description = "Service unavailable", body = Error)
    ),
    tags = ["auth"],
    operation_id = "register",
    security([])
)]
#[post("/auth/register")]
pub async fn register(
    state: web::Data<HttpState>,
    payload: web::Json<CredentialsRequest>,
) -> ApiResult<HttpResponse> {
    let credentials = parse_registration(payload.into_inner())?;
    let user = state.registration.register(&credentials).await?;
    Ok(HttpResponse::Created().json(user))
}

/// Exchange credentials for a bearer token.
///
/// Unknown usernames and wrong passwords produce the same `401` body.
#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = CredentialsRequest,
    responses(
        (status = 200, description = "Login success", body = BearerToken),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Invalid credentials", body = Error)
    ),
    tags = ["auth"],
    operation_id = "login",
    security([])
)]
#[post("/auth/login")]
pub async fn login(
    state: web::Data<HttpState>,
    payload: web::Json<CredentialsRequest>,
) -> ApiResult<web::Json<BearerToken>> {
    let credentials = parse_login(payload.into_inner())?;
    let token = state.identity.authenticate(&credentials).await?;
    Ok(web::Json(token))
}

/// Return the identity behind the presented token.
#[utoipa::path(
    get,
    path = "/api/auth/me",
    responses(
        (status = 200, description = "Current user", body = User),
        (status = 401, description = "Unauthorised", body = Error)
    ),
    tags = ["auth"],
    operation_id = "currentUser"
)]
#[get("/auth/me", wrap = "RequireIdentity")]
pub async fn current_user(user: CurrentUser) -> web::Json<User> {
    web::Json(user.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;
    use actix_web::http::header::AUTHORIZATION;
    use actix_web::{App, test};
    use rstest::rstest;
    use serde_json::{Value, json};

    use crate::domain::ports::{MockIdentityResolver, MockUserRegistration};
    use crate::inbound::http::test_utils::{StateBuilder, TEST_TOKEN, resolver_for, user_named};

    async fn send(state: HttpState, request: test::TestRequest) -> (StatusCode, Value) {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state))
                .app_data(crate::inbound::http::json_config())
                .service(
                    web::scope("/api")
                        .service(register)
                        .service(login)
                        .service(current_user),
                ),
        )
        .await;
        let response = test::call_service(&app, request.to_request()).await;
        let status = response.status();
        let body = test::read_body(response).await;
        let value = if body.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&body).expect("JSON body")
        };
        (status, value)
    }

    #[actix_web::test]
    async fn register_returns_the_public_user_only() {
        let alice = user_named("alice");
        let expected = alice.clone();
        let mut registration = MockUserRegistration::new();
        registration
            .expect_register()
            .withf(|creds| {
                creds.username() == "alice" && creds.password() == "password123"
            })
            .times(1)
            .returning(move |_| Ok(alice.clone()));
        let state = StateBuilder::default().registration(registration).build();

        let (status, body) = send(
            state,
            test::TestRequest::post()
                .uri("/api/auth/register")
                .set_json(json!({"username": "alice", "password": "password123"})),
        )
        .await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body.get("id"), Some(&json!(expected.id().to_string())));
        assert_eq!(body.get("username"), Some(&json!("alice")));
        assert!(body.get("password_digest").is_none());
        assert!(body.get("token").is_none());
    }

    #[rstest]
    #[case(json!({"password": "pw"}), "username", "missing_field")]
    #[case(json!({"username": "", "password": "pw"}), "username", "empty_field")]
    #[case(json!({"username": "alice", "password": ""}), "password", "empty_field")]
    #[actix_web::test]
    async fn login_rejects_invalid_payloads(
        #[case] payload: Value,
        #[case] field: &str,
        #[case] code: &str,
    ) {
        let (status, body) = send(
            StateBuilder::default().build(),
            test::TestRequest::post()
                .uri("/api/auth/login")
                .set_json(payload),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["details"]["field"], json!(field));
        assert_eq!(body["details"]["code"], json!(code));
    }

    #[rstest]
    #[case(json!({"username": " alice ", "password": "pw"}), "surrounding_whitespace")]
    #[case(json!({"username": "a".repeat(51), "password": "pw"}), "too_long")]
    #[case(json!({"username": "   ", "password": "pw"}), "empty_field")]
    #[actix_web::test]
    async fn register_rejects_invalid_usernames(#[case] payload: Value, #[case] code: &str) {
        let mut registration = MockUserRegistration::new();
        registration.expect_register().times(0);
        let state = StateBuilder::default().registration(registration).build();

        let (status, body) = send(
            state,
            test::TestRequest::post()
                .uri("/api/auth/register")
                .set_json(payload),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["details"]["field"], json!("username"));
        assert_eq!(body["details"]["code"], json!(code));
    }

    #[rstest]
    #[case("  alice  ".to_owned())]
    #[case("a".repeat(51))]
    #[actix_web::test]
    async fn login_passes_usernames_through_verbatim(#[case] username: String) {
        let expected = username.clone();
        let mut identity = MockIdentityResolver::new();
        identity
            .expect_authenticate()
            .withf(move |creds| creds.username() == expected)
            .times(1)
            .returning(|_| Err(Error::unauthorized("invalid credentials")));
        let state = StateBuilder::default().identity(identity).build();

        let (status, body) = send(
            state,
            test::TestRequest::post()
                .uri("/api/auth/login")
                .set_json(json!({"username": username, "password": "pw"})),
        )
        .await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["code"], json!("unauthorized"));
    }

    #[actix_web::test]
    async fn login_returns_the_token() {
        let mut identity = MockIdentityResolver::new();
        identity
            .expect_authenticate()
            .times(1)
            .returning(|_| Ok(BearerToken::new("signed.token.value")));
        let state = StateBuilder::default().identity(identity).build();

        let (status, body) = send(
            state,
            test::TestRequest::post()
                .uri("/api/auth/login")
                .set_json(json!({"username": "alice", "password": "password123"})),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"token": "signed.token.value"}));
    }

    #[actix_web::test]
    async fn login_failures_are_unauthorised() {
        let mut identity = MockIdentityResolver::new();
        identity
            .expect_authenticate()
            .returning(|_| Err(Error::unauthorized("invalid credentials")));
        let state = StateBuilder::default().identity(identity).build();

        let (status, body) = send(
            state,
            test::TestRequest::post()
                .uri("/api/auth/login")
                .set_json(json!({"username": "alice", "password": "wrong"})),
        )
        .await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["message"], json!("invalid credentials"));
    }

    #[actix_web::test]
    async fn malformed_json_uses_the_error_envelope() {
        let (status, body) = send(
            StateBuilder::default().build(),
            test::TestRequest::post()
                .uri("/api/auth/login")
                .insert_header(("content-type", "application/json"))
                .set_payload("{not json"),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], json!("invalid_request"));
        assert_eq!(body["details"]["code"], json!("malformed_body"));
    }

    #[actix_web::test]
    async fn me_returns_the_resolved_identity() {
        let alice = user_named("alice");
        let state = StateBuilder::default()
            .identity(resolver_for(alice.clone()))
            .build();

        let (status, body) = send(
            state,
            test::TestRequest::get()
                .uri("/api/auth/me")
                .insert_header((AUTHORIZATION, TEST_TOKEN)),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["username"], json!("alice"));
        assert_eq!(body["id"], json!(alice.id().to_string()));
    }

    #[actix_web::test]
    async fn me_requires_a_token() {
        let state = StateBuilder::default()
            .identity(resolver_for(user_named("alice")))
            .build();

        let (status, _) = send(state, test::TestRequest::get().uri("/api/auth/me")).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }
}
