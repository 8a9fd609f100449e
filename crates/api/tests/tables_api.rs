//! Integration tests for the `/api/db/{table}` endpoints.

mod common;

use axum::http::StatusCode;
use common::{body_json, get, get_auth, post_json_auth, put_json_auth};
use serde_json::{json, Value};
use sqlx::PgPool;

fn city(name: &str, lat: f64, lon: f64) -> Value {
    json!({
        "city_name": name,
        "country_code": "GB",
        "latitude": lat,
        "longitude": lon
    })
}

async fn save_city(app: &axum::Router, token: &str, body: Value) -> Value {
    let response = post_json_auth(app.clone(), "/api/db/saved_cities", body, token).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await
}

// ---------------------------------------------------------------------------
// Access control
// ---------------------------------------------------------------------------

#[tokio::test]
async fn tables_require_auth() {
    let app = common::build_test_app(common::lazy_pool());

    let response = get(app, "/api/db/saved_cities").await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn unknown_table_is_404(pool: PgPool) {
    let app = common::build_test_app(pool);
    let (token, _) = common::login(&app, "t1@example.com").await;

    let response = get_auth(app, "/api/db/users", &token).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["error"], "Unknown table 'users'");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn rows_are_scoped_to_caller(pool: PgPool) {
    let app = common::build_test_app(pool);
    let (alice, alice_id) = common::login(&app, "alice@example.com").await;
    let (bob, _) = common::login(&app, "bob@example.com").await;

    let saved = save_city(&app, &alice, city("London", 51.51, -0.13)).await;
    assert_eq!(saved["user_id"], alice_id);

    let response = get_auth(app.clone(), "/api/db/saved_cities", &bob).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, json!([]));

    // Asking for Alice's rows by owner filter is refused outright.
    let uri = format!("/api/db/saved_cities?user_id={alice_id}");
    let response = get_auth(app, &uri, &bob).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn foreign_owner_in_body_is_403(pool: PgPool) {
    let app = common::build_test_app(pool);
    let (token, user_id) = common::login(&app, "t2@example.com").await;

    let mut body = city("Leeds", 53.8, -1.55);
    body["user_id"] = json!(user_id + 1000);
    let response = post_json_auth(app, "/api/db/saved_cities", body, &token).await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

// ---------------------------------------------------------------------------
// Saved cities
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn duplicate_coordinates_conflict_on_insert(pool: PgPool) {
    let app = common::build_test_app(pool);
    let (token, _) = common::login(&app, "t3@example.com").await;

    save_city(&app, &token, city("London", 51.51, -0.13)).await;
    let response = post_json_auth(
        app,
        "/api/db/saved_cities",
        city("London again", 51.51, -0.13),
        &token,
    )
    .await;

    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn upsert_updates_same_coordinates(pool: PgPool) {
    let app = common::build_test_app(pool);
    let (token, _) = common::login(&app, "t4@example.com").await;

    let first = save_city(&app, &token, city("London", 51.51, -0.13)).await;

    let mut body = city("City of London", 51.51, -0.13);
    body["is_default"] = json!(true);
    let response = put_json_auth(app.clone(), "/api/db/saved_cities", body, &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let updated = body_json(response).await;

    assert_eq!(updated["id"], first["id"]);
    assert_eq!(updated["city_name"], "City of London");
    assert_eq!(updated["is_default"], true);

    let response = get_auth(app, "/api/db/saved_cities", &token).await;
    assert_eq!(body_json(response).await.as_array().unwrap().len(), 1);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn query_options_filter_order_limit_and_project(pool: PgPool) {
    let app = common::build_test_app(pool);
    let (token, user_id) = common::login(&app, "t5@example.com").await;

    save_city(&app, &token, city("Bath", 51.38, -2.36)).await;
    save_city(&app, &token, city("York", 53.96, -1.08)).await;
    let mut oslo = city("Oslo", 59.91, 10.75);
    oslo["country_code"] = json!("NO");
    save_city(&app, &token, oslo).await;

    let uri = format!(
        "/api/db/saved_cities?user_id={user_id}&country_code=GB\
         &orderBy=city_name&order=desc&limit=5&select=city_name,latitude"
    );
    let response = get_auth(app.clone(), &uri, &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await,
        json!([
            { "city_name": "York", "latitude": 53.96 },
            { "city_name": "Bath", "latitude": 51.38 }
        ])
    );

    let response = get_auth(
        app,
        "/api/db/saved_cities?orderBy=latitude&limit=1",
        &token,
    )
    .await;
    let rows = body_json(response).await;
    assert_eq!(rows.as_array().unwrap().len(), 1);
    assert_eq!(rows[0]["city_name"], "Bath");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn malformed_query_options_are_400(pool: PgPool) {
    let app = common::build_test_app(pool);
    let (token, _) = common::login(&app, "t6@example.com").await;

    for uri in [
        "/api/db/saved_cities?password_hash=x",
        "/api/db/saved_cities?limit=0",
        "/api/db/saved_cities?order=desc",
        "/api/db/saved_cities?orderBy=city_name&order=sideways",
        "/api/db/saved_cities?latitude=north",
        "/api/db/saved_cities?select=city_name,secret",
    ] {
        let response = get_auth(app.clone(), uri, &token).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{uri}");
    }
}

// ---------------------------------------------------------------------------
// Preferences
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn preferences_upsert_merges_fields(pool: PgPool) {
    let app = common::build_test_app(pool);
    let (token, user_id) = common::login(&app, "t7@example.com").await;

    let response = put_json_auth(
        app.clone(),
        "/api/db/user_preferences",
        json!({ "user_id": user_id, "theme": "dark", "updated_at": "2026-01-01T00:00:00Z" }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let created = body_json(response).await;
    assert_eq!(created["theme"], "dark");
    assert_eq!(created["language"], "en");
    assert_eq!(created["temperature_unit"], "celsius");
    assert_eq!(created["notifications_enabled"], true);

    let response = put_json_auth(
        app.clone(),
        "/api/db/user_preferences",
        json!({ "temperature_unit": "fahrenheit" }),
        &token,
    )
    .await;
    let updated = body_json(response).await;
    assert_eq!(updated["id"], created["id"]);
    assert_eq!(updated["theme"], "dark", "omitted fields keep their value");
    assert_eq!(updated["temperature_unit"], "fahrenheit");

    let uri = format!("/api/db/user_preferences?user_id={user_id}&limit=1");
    let response = get_auth(app, &uri, &token).await;
    let rows = body_json(response).await;
    assert_eq!(rows.as_array().unwrap().len(), 1);
    assert_eq!(rows[0]["temperature_unit"], "fahrenheit");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn preferences_insert_twice_conflicts(pool: PgPool) {
    let app = common::build_test_app(pool);
    let (token, _) = common::login(&app, "t8@example.com").await;

    let response =
        post_json_auth(app.clone(), "/api/db/user_preferences", json!({}), &token).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(body_json(response).await["theme"], "system");

    let response = post_json_auth(app, "/api/db/user_preferences", json!({}), &token).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn preferences_reject_bad_values(pool: PgPool) {
    let app = common::build_test_app(pool);
    let (alice, _) = common::login(&app, "t9@example.com").await;
    let (bob, _) = common::login(&app, "t10@example.com").await;

    let response = put_json_auth(
        app.clone(),
        "/api/db/user_preferences",
        json!({ "theme": "neon" }),
        &alice,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // Bob's city cannot become Alice's default.
    let bobs_city = save_city(&app, &bob, city("Leeds", 53.8, -1.55)).await;
    let response = put_json_auth(
        app.clone(),
        "/api/db/user_preferences",
        json!({ "default_city_id": bobs_city["id"] }),
        &alice,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let own_city = save_city(&app, &alice, city("Bath", 51.38, -2.36)).await;
    let response = put_json_auth(
        app,
        "/api/db/user_preferences",
        json!({ "default_city_id": own_city["id"] }),
        &alice,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["default_city_id"], own_city["id"]);
}
