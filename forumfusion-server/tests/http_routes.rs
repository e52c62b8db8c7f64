//! Router tests that never reach the database
//!
//! The pool connects lazily to an unreachable address, so every case here
//! must be answered by routing, auth, validation or the payment provider.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use serde_json::{json, Value};
use sqlx::postgres::PgPoolOptions;
use tower::ServiceExt;

use forumfusion_server::auth::{CookiePolicy, TokenKeys};
use forumfusion_server::config::Environment;
use forumfusion_server::payments::{PaymentError, PaymentIntent, PaymentProvider};
use forumfusion_server::{build_router, AppState};

const SECRET: &str = "router-test-secret";

#[derive(Default)]
struct FakePayments {
    calls: Mutex<Vec<(i64, String)>>,
}

#[async_trait]
impl PaymentProvider for FakePayments {
    async fn create_intent(&self, amount_cents: i64, currency: &str) -> Result<PaymentIntent, PaymentError> {
        self.calls.lock().unwrap().push((amount_cents, currency.to_owned()));
        Ok(PaymentIntent {
            id: "pi_fake".into(),
            client_secret: format!("pi_fake_secret_{amount_cents}"),
        })
    }
}

fn state(payments: Option<Arc<dyn PaymentProvider>>) -> AppState {
    let pool = PgPoolOptions::new()
        .connect_lazy("postgres://forumfusion@127.0.0.1:1/forumfusion")
        .expect("lazy pool");

    AppState {
        pool,
        tokens: TokenKeys::new(SECRET),
        cookies: CookiePolicy::for_environment(Environment::Development),
        token_ttl: chrono::Duration::days(365),
        payments,
    }
}

fn app() -> Router {
    build_router(state(None))
}

fn session_cookie(email: &str) -> String {
    let token = TokenKeys::new(SECRET)
        .issue(email, chrono::Duration::days(1))
        .unwrap();
    format!("token={token}")
}

fn json_request(method: &str, uri: &str, body: Value, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

fn get(uri: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::empty()).unwrap()
}

async fn body_json(response: Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn set_cookie(response: &Response) -> String {
    response
        .headers()
        .get(header::SET_COOKIE)
        .expect("set-cookie header")
        .to_str()
        .unwrap()
        .to_owned()
}

#[tokio::test]
async fn banner_and_health() {
    let response = app().oneshot(get("/", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert_eq!(&bytes[..], b"forum fusion is running...");

    let response = app().oneshot(get("/health", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["status"], "ok");
}

#[tokio::test]
async fn jwt_sets_http_only_cookie() {
    let response = app()
        .oneshot(json_request(
            "POST",
            "/jwt",
            json!({ "email": "Reader@Example.com", "displayName": "Reader" }),
            None,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let cookie = set_cookie(&response);
    assert!(cookie.starts_with("token="));
    assert!(cookie.contains("HttpOnly"));
    assert!(cookie.contains("SameSite=Strict"));
    assert!(!cookie.contains("Secure"));
    assert_eq!(body_json(response).await, json!({ "success": true }));

    let token = cookie
        .trim_start_matches("token=")
        .split(';')
        .next()
        .unwrap();
    let claims = TokenKeys::new(SECRET).verify(token).unwrap();
    assert_eq!(claims.email, "reader@example.com");
}

#[tokio::test]
async fn jwt_rejects_invalid_email() {
    let response = app()
        .oneshot(json_request("POST", "/jwt", json!({ "email": "nope" }), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn logout_expires_cookie() {
    let response = app()
        .oneshot(json_request("POST", "/logout", json!({}), None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let cookie = set_cookie(&response);
    assert!(cookie.starts_with("token=;"));
    assert!(cookie.contains("Max-Age=0"));
}

#[tokio::test]
async fn protected_routes_require_cookie() {
    let cases = [
        get("/myProfile/a@b.co", None),
        get("/comments/6f1c1d7e-1a4b-4c7e-9d1e-2f6a8b9c0d1e", None),
        get("/users", None),
        get("/totalData", None),
        json_request("PUT", "/updateVotes", json!({}), None),
        json_request("POST", "/createPaymentIntent", json!({ "price": 10 }), None),
        json_request("POST", "/tags", json!({ "name": "rust" }), None),
    ];

    for request in cases {
        let uri = request.uri().to_string();
        let response = app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "{uri}");
        assert_eq!(
            body_json(response).await,
            json!({ "message": "Unauthorized access!" })
        );
    }
}

#[tokio::test]
async fn forged_token_is_rejected() {
    let forged = TokenKeys::new("another-secret")
        .issue("a@b.co", chrono::Duration::days(1))
        .unwrap();
    let response = app()
        .oneshot(get("/role/a@b.co", Some(&format!("token={forged}"))))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn malformed_ids_are_bad_requests() {
    let response = app().oneshot(get("/post/not-a-uuid", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let cookie = session_cookie("a@b.co");
    let response = app()
        .oneshot(get("/comments/not-a-uuid", Some(&cookie)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["error"], "validation_error");
}

#[tokio::test]
async fn sign_up_validates_email() {
    let response = app()
        .oneshot(json_request(
            "POST",
            "/users",
            json!({ "email": "not an email", "userName": "x" }),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn vote_request_needs_pressed_flag() {
    let cookie = session_cookie("voter@example.com");
    let response = app()
        .oneshot(json_request(
            "PUT",
            "/updateVotes",
            json!({ "postId": "6f1c1d7e-1a4b-4c7e-9d1e-2f6a8b9c0d1e", "vote": "up" }),
            Some(&cookie),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn payment_intent_uses_cents() {
    let fake = Arc::new(FakePayments::default());
    let provider: Arc<dyn PaymentProvider> = fake.clone();
    let app = build_router(state(Some(provider)));
    let cookie = session_cookie("buyer@example.com");

    let response = app
        .oneshot(json_request(
            "POST",
            "/createPaymentIntent",
            json!({ "price": 19.99 }),
            Some(&cookie),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await,
        json!({ "clientSecret": "pi_fake_secret_1999" })
    );
    assert_eq!(*fake.calls.lock().unwrap(), vec![(1999, "usd".to_string())]);
}

#[tokio::test]
async fn payment_intent_rejects_bad_price() {
    let fake = Arc::new(FakePayments::default());
    let provider: Arc<dyn PaymentProvider> = fake.clone();
    let app = build_router(state(Some(provider)));
    let cookie = session_cookie("buyer@example.com");

    let response = app
        .oneshot(json_request(
            "POST",
            "/createPaymentIntent",
            json!({ "price": 0 }),
            Some(&cookie),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(fake.calls.lock().unwrap().is_empty());
}

#[tokio::test]
async fn payment_intent_without_provider_is_unavailable() {
    let cookie = session_cookie("buyer@example.com");
    let response = app()
        .oneshot(json_request(
            "POST",
            "/createPaymentIntent",
            json!({ "price": 5 }),
            Some(&cookie),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
#[ignore = "requires database"]
async fn admin_routes_forbid_non_admins() {
    use forumfusion_server::db::{self, NewUser, UserRepo};
    use forumfusion_server::models::Email;

    let url = std::env::var("DATABASE_URL").expect("DATABASE_URL required");
    let pool = db::create_pool(&url).await.expect("pool creation failed");
    db::migrations::run(&pool).await.expect("migrations");

    let member = format!("{}@example.com", uuid::Uuid::new_v4());
    UserRepo::new(&pool)
        .register(NewUser {
            email: Email::new(&member).unwrap(),
            user_name: "Member".into(),
            photo_url: None,
        })
        .await
        .unwrap();
    let ghost = format!("{}@example.com", uuid::Uuid::new_v4());

    let app = build_router(AppState {
        pool,
        ..state(None)
    });

    for email in [&member, &ghost] {
        for uri in ["/users", "/totalData"] {
            let response = app
                .clone()
                .oneshot(get(uri, Some(&session_cookie(email))))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::FORBIDDEN, "{uri} as {email}");
            assert_eq!(
                body_json(response).await,
                json!({ "message": "Forbidden access!" })
            );
        }
    }
}

#[tokio::test]
async fn bad_price_is_rejected_before_provider_lookup() {
    let cookie = session_cookie("buyer@example.com");
    let response = app()
        .oneshot(json_request(
            "POST",
            "/createPaymentIntent",
            json!({ "price": 0 }),
            Some(&cookie),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn malformed_bodies_are_json_validation_errors() {
    let cookie = session_cookie("voter@example.com");
    let cases = [
        json_request(
            "PUT",
            "/updateVotes",
            json!({
                "postId": "6f1c1d7e-1a4b-4c7e-9d1e-2f6a8b9c0d1e",
                "vote": "sideways",
                "upVote": true
            }),
            Some(&cookie),
        ),
        json_request("POST", "/createPaymentIntent", json!({ "price": "ten" }), Some(&cookie)),
        json_request("POST", "/jwt", json!({ "name": "no email" }), None),
    ];

    for request in cases {
        let uri = request.uri().to_string();
        let response = app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{uri}");
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "application/json",
            "{uri}"
        );
        assert_eq!(body_json(response).await["error"], "validation_error", "{uri}");
    }
}

#[tokio::test]
async fn body_without_json_content_type_is_rejected() {
    let request = Request::builder()
        .method("POST")
        .uri("/jwt")
        .body(Body::from(r#"{"email":"a@b.co"}"#))
        .unwrap();
    let response = app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["error"], "validation_error");
}

#[tokio::test]
async fn unparseable_query_is_validation_error() {
    let response = app()
        .oneshot(get("/posts?page=first", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["error"], "validation_error");
}
