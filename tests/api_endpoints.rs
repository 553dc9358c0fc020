/// Router-level tests for the request paths that never reach PostgreSQL:
/// input validation, authentication, and ownership checks. The context is
/// built around a lazily-connected pool, so no database is required.
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;
use uuid::Uuid;

use cinegraph::auth;
use cinegraph::config::{
    AuthConfig, DatabaseConfig, JobsConfig, LoggingConfig, ServerConfig, ServiceConfig,
};
use cinegraph::context::AppContext;
use cinegraph::db;
use cinegraph::server::build_router;

const TEST_SECRET: &str = "0123456789abcdef0123456789abcdef";

fn test_config() -> ServerConfig {
    ServerConfig {
        service: ServiceConfig {
            hostname: "localhost".to_string(),
            port: 0,
        },
        database: DatabaseConfig {
            url: "postgres://localhost:1/cinegraph_test".to_string(),
            max_connections: 1,
        },
        authentication: AuthConfig {
            jwt_secret: TEST_SECRET.to_string(),
            jwt_issuer: None,
            jwt_audience: None,
            token_expiry_minutes: 60,
        },
        jobs: JobsConfig {
            actor_refresh_interval_secs: 0,
            actor_refresh_batch_size: 500,
        },
        logging: LoggingConfig {
            level: "info".to_string(),
        },
    }
}

fn test_router() -> Router {
    let config = test_config();
    let pool = db::create_lazy_pool(&config.database).expect("lazy pool");
    build_router(AppContext::with_pool(config, pool))
}

fn bearer_for(user_id: Uuid) -> String {
    let token = auth::issue_token(
        user_id,
        "alice",
        "alice@example.com",
        &test_config().authentication,
    )
    .expect("token");
    format!("Bearer {token}")
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.expect("body").to_bytes();
    serde_json::from_slice(&bytes).expect("json body")
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).expect("request")
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .expect("request")
}

#[tokio::test]
async fn health_reports_ok() {
    let response = test_router().oneshot(get("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn unknown_route_returns_json_404() {
    let response = test_router().oneshot(get("/api/Nope")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let body = body_json(response).await;
    assert_eq!(body["message"], "Endpoint not found");
}

#[tokio::test]
async fn basic_search_requires_a_query() {
    let response = test_router()
        .oneshot(get("/api/MovieSearch/basic"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = body_json(response).await;
    assert_eq!(body["message"], "Search query is required");
    assert!(body.get("error").is_none());
}

#[tokio::test]
async fn blank_query_counts_as_missing() {
    let response = test_router()
        .oneshot(get("/api/MovieSearch/basic?query=%20%20"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn structured_search_requires_a_filter() {
    let response = test_router()
        .oneshot(get("/api/MovieSearch/structured?page=1&pageSize=10"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = body_json(response).await;
    assert_eq!(
        body["message"],
        "At least one search parameter is required (title, plot, characters, or person)"
    );
}

#[tokio::test]
async fn actor_search_requires_a_query() {
    let response = test_router()
        .oneshot(get("/api/ActorController/search"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn signup_rejects_blank_fields() {
    let response = test_router()
        .oneshot(post_json("/api/User/signup", json!({})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = body_json(response).await;
    assert_eq!(body["message"], "Username is required");
}

#[tokio::test]
async fn signin_rejects_blank_credentials() {
    let response = test_router()
        .oneshot(post_json("/api/User/signin", json!({})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = body_json(response).await;
    assert_eq!(body["message"], "Email and password are required");
}

#[tokio::test]
async fn bookmarks_require_a_token() {
    let user_id = Uuid::new_v4();
    let response = test_router()
        .oneshot(post_json(
            &format!("/api/User/{user_id}/bookmarks"),
            json!({"titleId": "tt0000001"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn garbage_token_is_unauthorized() {
    let user_id = Uuid::new_v4();
    let request = Request::builder()
        .uri(format!("/api/User/{user_id}/bookmarks"))
        .header(header::AUTHORIZATION, "Bearer not.a.token")
        .body(Body::empty())
        .unwrap();

    let response = test_router().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn token_for_another_user_is_forbidden() {
    let owner = Uuid::new_v4();
    let other = Uuid::new_v4();

    let request = Request::builder()
        .method("DELETE")
        .uri(format!("/api/User/{other}"))
        .header(header::AUTHORIZATION, bearer_for(owner))
        .body(Body::empty())
        .unwrap();

    let response = test_router().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let body = body_json(response).await;
    assert_eq!(
        body["message"],
        "Not authorized: Token does not match the requested user"
    );
}

#[tokio::test]
async fn rating_out_of_range_is_rejected() {
    let user_id = Uuid::new_v4();

    let mut request = post_json(
        &format!("/api/User/{user_id}/ratings"),
        json!({"titleId": "tt0000001", "rating": 0}),
    );
    request.headers_mut().insert(
        header::AUTHORIZATION,
        bearer_for(user_id).parse().unwrap(),
    );

    let response = test_router().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = body_json(response).await;
    assert_eq!(body["message"], "Rating must be between 1 and 10");
}

#[tokio::test]
async fn exact_match_requires_keywords() {
    let response = test_router()
        .oneshot(post_json(
            "/api/AdvanceSearch/exact-match-titles",
            json!({"keywords": []}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = body_json(response).await;
    assert_eq!(body["message"], "Keywords array is required");
}

#[tokio::test]
async fn best_match_ignores_blank_keywords() {
    // All-whitespace keywords are filtered out, leaving an empty set.
    let response = test_router()
        .oneshot(post_json(
            "/api/AdvanceSearch/best-match-titles",
            json!({"keywords": ["  ", ""]}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn keyword_word_list_requires_keywords() {
    let response = test_router()
        .oneshot(post_json("/api/AdvanceSearch/keyword-word-list", json!([])))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
