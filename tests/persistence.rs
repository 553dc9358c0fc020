/// Database-backed tests for the invariants the validation-only suite
/// cannot reach: duplicate-signup and duplicate-bookmark conflicts leaving
/// the tables unmutated, rating re-adds updating in place, and the
/// indistinguishable signin failure.
///
/// These run against a real PostgreSQL instance and are ignored by
/// default:
///
///     DATABASE_URL=postgres://localhost/cinegraph_test cargo test -- --ignored
use cinegraph::config::{
    AuthConfig, DatabaseConfig, JobsConfig, LoggingConfig, ServerConfig, ServiceConfig,
};
use cinegraph::context::AppContext;
use cinegraph::db;
use cinegraph::error::ApiError;
use cinegraph::users::{AddBookmarkRequest, AddRatingRequest, SigninRequest, SignupRequest};
use uuid::Uuid;

async fn test_context() -> AppContext {
    let url = std::env::var("DATABASE_URL")
        .expect("DATABASE_URL must point at a disposable test database");

    let config = ServerConfig {
        service: ServiceConfig {
            hostname: "localhost".to_string(),
            port: 0,
        },
        database: DatabaseConfig {
            url,
            max_connections: 2,
        },
        authentication: AuthConfig {
            jwt_secret: "0123456789abcdef0123456789abcdef".to_string(),
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
    };

    let pool = db::create_pool(&config.database).await.expect("pool");
    db::run_migrations(&pool).await.expect("migrations");

    AppContext::with_pool(config, pool)
}

/// Unique per-run suffix so tests never collide with leftover rows
fn tag() -> String {
    Uuid::new_v4().simple().to_string()
}

fn signup_request(tag: &str) -> SignupRequest {
    SignupRequest {
        username: format!("user_{tag}"),
        email: format!("{tag}@example.com"),
        password: "P@ss1word".to_string(),
    }
}

async fn seed_title(ctx: &AppContext, tag: &str) -> String {
    let title_id = format!("tt_{tag}");
    sqlx::query("INSERT INTO titles (title_id, primary_title) VALUES ($1, $2)")
        .bind(&title_id)
        .bind("Seeded Title")
        .execute(&ctx.db)
        .await
        .expect("seed title");
    title_id
}

#[tokio::test]
#[ignore]
async fn duplicate_signup_leaves_user_table_unmutated() {
    let ctx = test_context().await;
    let tag = tag();
    let req = signup_request(&tag);

    ctx.users.signup(req.clone()).await.expect("first signup");

    // Same email, fresh username.
    let mut same_email = req.clone();
    same_email.username = format!("other_{tag}");
    let err = ctx.users.signup(same_email).await.unwrap_err();
    assert!(matches!(err, ApiError::Conflict(_)));

    // Same username, fresh email.
    let mut same_username = req.clone();
    same_username.email = format!("other_{tag}@example.com");
    let err = ctx.users.signup(same_username).await.unwrap_err();
    assert!(matches!(err, ApiError::Conflict(_)));

    let count: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM users WHERE email = $1 OR username = $2",
    )
    .bind(&req.email)
    .bind(&req.username)
    .fetch_one(&ctx.db)
    .await
    .expect("count");
    assert_eq!(count, 1);
}

#[tokio::test]
#[ignore]
async fn double_bookmark_keeps_exactly_one_row() {
    let ctx = test_context().await;
    let tag = tag();
    let user = ctx.users.signup(signup_request(&tag)).await.expect("signup");
    let title_id = seed_title(&ctx, &tag).await;

    let req = AddBookmarkRequest {
        title_id: title_id.clone(),
    };
    ctx.users
        .add_bookmark(user.user_id, req.clone())
        .await
        .expect("first bookmark");

    let err = ctx.users.add_bookmark(user.user_id, req).await.unwrap_err();
    assert!(matches!(err, ApiError::Conflict(_)));
    assert_eq!(err.to_string(), "Bookmark already exists for this title");

    let count: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM user_bookmarks WHERE user_id = $1 AND title_id = $2",
    )
    .bind(user.user_id)
    .bind(&title_id)
    .fetch_one(&ctx.db)
    .await
    .expect("count");
    assert_eq!(count, 1);
}

#[tokio::test]
#[ignore]
async fn rating_readd_updates_in_place_and_keeps_previous() {
    let ctx = test_context().await;
    let tag = tag();
    let user = ctx.users.signup(signup_request(&tag)).await.expect("signup");
    let title_id = seed_title(&ctx, &tag).await;

    let first = ctx
        .users
        .add_or_update_rating(
            user.user_id,
            AddRatingRequest {
                title_id: title_id.clone(),
                rating: 7,
            },
        )
        .await
        .expect("first rating");

    let second = ctx
        .users
        .add_or_update_rating(
            user.user_id,
            AddRatingRequest {
                title_id: title_id.clone(),
                rating: 9,
            },
        )
        .await
        .expect("second rating");

    // Same row, updated in place.
    assert_eq!(second.rating_history_id, first.rating_history_id);
    assert_eq!(second.rating, 9);

    let (count, previous): (i64, Option<i16>) = sqlx::query_as(
        "SELECT COUNT(*) OVER (), previous_rating
         FROM user_rating_history
         WHERE user_id = $1 AND title_id = $2",
    )
    .bind(user.user_id)
    .bind(&title_id)
    .fetch_one(&ctx.db)
    .await
    .expect("rating row");
    assert_eq!(count, 1);
    assert_eq!(previous, Some(7));

    // The aggregate was recomputed in the same transaction.
    let (average, votes): (f64, i32) = sqlx::query_as(
        "SELECT average_rating, num_votes FROM title_ratings WHERE title_id = $1",
    )
    .bind(&title_id)
    .fetch_one(&ctx.db)
    .await
    .expect("aggregate");
    assert_eq!(average, 9.0);
    assert_eq!(votes, 1);
}

#[tokio::test]
#[ignore]
async fn signin_failures_are_indistinguishable() {
    let ctx = test_context().await;
    let tag = tag();
    let req = signup_request(&tag);
    ctx.users.signup(req.clone()).await.expect("signup");

    let unknown_email = ctx
        .users
        .signin(SigninRequest {
            email: format!("nobody_{tag}@example.com"),
            password: req.password.clone(),
        })
        .await
        .unwrap_err();

    let wrong_password = ctx
        .users
        .signin(SigninRequest {
            email: req.email.clone(),
            password: "not-the-password".to_string(),
        })
        .await
        .unwrap_err();

    assert_eq!(unknown_email.to_string(), "Invalid email or password");
    assert_eq!(wrong_password.to_string(), unknown_email.to_string());
}
