use axum::{
    body::Body,
    http::{header::CONTENT_TYPE, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use space_missions::model::NewPlanet;
use space_missions::{app, apply_migrations, connect_in_memory, AppState, EntityStore};
use sqlx::SqlitePool;
use tower::ServiceExt;

async fn setup() -> (Router, SqlitePool) {
    let pool = connect_in_memory().await.unwrap();
    apply_migrations(&pool).await.unwrap();
    (app(AppState::new(pool.clone())), pool)
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(v) => {
            builder = builder.header(CONTENT_TYPE, "application/json");
            Body::from(v.to_string())
        }
        None => Body::empty(),
    };
    let response = app.clone().oneshot(builder.body(body).unwrap()).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

async fn create_scientist(app: &Router, name: &str, field: &str) -> i64 {
    let (status, body) = send(
        app,
        Method::POST,
        "/scientists",
        Some(json!({"name": name, "field_of_study": field})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body["id"].as_i64().unwrap()
}

async fn create_planet(pool: &SqlitePool, name: &str) -> i64 {
    let planet = EntityStore::create_planet(
        pool,
        &NewPlanet {
            name: name.into(),
            distance_from_earth: 42,
            nearest_star: "Sol".into(),
        },
    )
    .await
    .unwrap();
    planet["id"].as_i64().unwrap()
}

async fn create_mission(app: &Router, name: &str, scientist_id: i64, planet_id: i64) -> (StatusCode, Value) {
    send(
        app,
        Method::POST,
        "/missions",
        Some(json!({"name": name, "scientist_id": scientist_id, "planet_id": planet_id})),
    )
    .await
}

async fn count(pool: &SqlitePool, table: &str) -> i64 {
    sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {}", table))
        .fetch_one(pool)
        .await
        .unwrap()
}

fn generic_errors() -> Value {
    json!({"errors": ["validation errors"]})
}

#[tokio::test]
async fn liveness_returns_empty_body() {
    let (app, _pool) = setup().await;
    let (status, body) = send(&app, Method::GET, "/", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.is_null());

    let (status, body) = send(&app, Method::GET, "/ready", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["database"], "ok");

    let (status, body) = send(&app, Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");

    let (status, body) = send(&app, Method::GET, "/version", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "space-missions");
}

#[tokio::test]
async fn create_then_read_round_trip() {
    let (app, _pool) = setup().await;
    let (status, created) = send(
        &app,
        Method::POST,
        "/scientists",
        Some(json!({"name": "Ada", "field_of_study": "Robotics"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["missions"], json!([]));

    let id = created["id"].as_i64().unwrap();
    let (status, read) = send(&app, Method::GET, &format!("/scientists/{}", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(read["name"], "Ada");
    assert_eq!(read["field_of_study"], "Robotics");
    assert_eq!(read["missions"], json!([]));
}

#[tokio::test]
async fn list_omits_missions_but_single_read_includes_them() {
    let (app, pool) = setup().await;
    let scientist = create_scientist(&app, "Ada", "Robotics").await;
    let planet = create_planet(&pool, "Vulcan").await;
    let (status, _) = create_mission(&app, "First Contact", scientist, planet).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, list) = send(&app, Method::GET, "/scientists", None).await;
    assert_eq!(status, StatusCode::OK);
    let list = list.as_array().unwrap();
    assert_eq!(list.len(), 1);
    assert!(list[0].get("missions").is_none());

    let (_, one) = send(&app, Method::GET, &format!("/scientists/{}", scientist), None).await;
    let missions = one["missions"].as_array().unwrap();
    assert_eq!(missions.len(), 1);
    assert_eq!(missions[0]["planet"]["name"], "Vulcan");
    assert!(missions[0].get("scientist").is_none());
    assert!(missions[0]["planet"].get("missions").is_none());

    let (status, planets) = send(&app, Method::GET, "/planets", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(planets[0]["name"], "Vulcan");
    assert!(planets[0].get("missions").is_none());
}

#[tokio::test]
async fn invalid_scientist_is_not_persisted() {
    let (app, pool) = setup().await;
    for body in [
        json!({"name": "", "field_of_study": "Robotics"}),
        json!({"name": "Ada"}),
        json!({"name": "   ", "field_of_study": "Robotics"}),
    ] {
        let (status, errors) = send(&app, Method::POST, "/scientists", Some(body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(errors, generic_errors());
    }
    assert_eq!(count(&pool, "scientists").await, 0);
}

#[tokio::test]
async fn unreadable_body_is_a_validation_error() {
    let (app, _pool) = setup().await;
    let request = Request::builder()
        .method(Method::POST)
        .uri("/scientists")
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let (status, errors) = send(&app, Method::POST, "/missions", Some(json!(["a", "b"]))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(errors, generic_errors());
}

#[tokio::test]
async fn mission_with_unknown_scientist_is_rejected() {
    let (app, pool) = setup().await;
    let planet = create_planet(&pool, "Kepler-22b").await;
    let (status, errors) = create_mission(&app, "Lost", 999, planet).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(errors, generic_errors());
    assert_eq!(count(&pool, "missions").await, 0);

    let scientist = create_scientist(&app, "Grace", "Navigation").await;
    let (status, _) = create_mission(&app, "Lost", scientist, 999).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let (status, _) = create_mission(&app, "Lost", scientist, 0).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(count(&pool, "missions").await, 0);
}

#[tokio::test]
async fn mission_embeds_parents_without_their_mission_lists() {
    let (app, pool) = setup().await;
    let scientist = create_scientist(&app, "Ada", "Robotics").await;
    let planet = create_planet(&pool, "Proxima b").await;
    let (status, mission) = create_mission(&app, "Flyby", scientist, planet).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(mission["name"], "Flyby");
    assert_eq!(mission["scientist_id"], scientist);
    assert_eq!(mission["planet_id"], planet);
    assert_eq!(mission["scientist"]["name"], "Ada");
    assert_eq!(mission["planet"]["name"], "Proxima b");
    assert!(mission["scientist"].get("missions").is_none());
    assert!(mission["planet"].get("missions").is_none());

    let id = mission["id"].as_i64().unwrap();
    let reread = EntityStore::get_mission(&pool, id).await.unwrap();
    assert_eq!(reread, mission);

    let view = EntityStore::get_planet(&pool, planet).await.unwrap();
    let missions = view["missions"].as_array().unwrap();
    assert_eq!(missions.len(), 1);
    assert_eq!(missions[0]["scientist"]["name"], "Ada");
    assert!(missions[0].get("planet").is_none());
    assert!(missions[0]["scientist"].get("missions").is_none());
}

#[tokio::test]
async fn patch_merges_only_given_fields() {
    let (app, _pool) = setup().await;
    let id = create_scientist(&app, "Ada", "Robotics").await;
    let uri = format!("/scientists/{}", id);

    let (status, patched) = send(
        &app,
        Method::PATCH,
        &uri,
        Some(json!({"field_of_study": "xenobiology"})),
    )
    .await;
    assert_eq!(status, StatusCode::ACCEPTED);
    assert_eq!(patched["name"], "Ada");
    assert_eq!(patched["field_of_study"], "xenobiology");
    assert!(patched["missions"].is_array());

    let (_, read) = send(&app, Method::GET, &uri, None).await;
    assert_eq!(read["field_of_study"], "xenobiology");
}

#[tokio::test]
async fn patch_rejections() {
    let (app, _pool) = setup().await;
    let id = create_scientist(&app, "Ada", "Robotics").await;
    let uri = format!("/scientists/{}", id);

    let (status, errors) = send(&app, Method::PATCH, &uri, Some(json!({"name": ""}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(errors, generic_errors());

    let (status, errors) = send(&app, Method::PATCH, &uri, Some(json!({"rank": "captain"}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(errors, json!({"errors": ["unknown field: rank"]}));

    let (_, read) = send(&app, Method::GET, &uri, None).await;
    assert_eq!(read["name"], "Ada");
    assert_eq!(read["field_of_study"], "Robotics");

    let (status, error) = send(&app, Method::PATCH, "/scientists/404", Some(json!({"name": "X"}))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(error, json!({"error": "Scientist not found"}));
}

#[tokio::test]
async fn patch_checks_existence_before_body() {
    let (app, _pool) = setup().await;
    let (status, error) = send(&app, Method::PATCH, "/scientists/999", Some(json!([1]))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(error, json!({"error": "Scientist not found"}));

    let id = create_scientist(&app, "Ada", "Robotics").await;
    let request = Request::builder()
        .method(Method::PATCH)
        .uri(format!("/scientists/{}", id))
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from("not json"))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let errors: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(errors, generic_errors());

    let (status, errors) = send(&app, Method::PATCH, &format!("/scientists/{}", id), Some(json!([1]))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(errors, generic_errors());
}

#[tokio::test]
async fn delete_cascades_to_missions() {
    let (app, pool) = setup().await;
    let doomed = create_scientist(&app, "Ada", "Robotics").await;
    let other = create_scientist(&app, "Grace", "Navigation").await;
    let planet = create_planet(&pool, "Vulcan").await;
    for i in 0..3 {
        let (status, _) = create_mission(&app, &format!("M{}", i), doomed, planet).await;
        assert_eq!(status, StatusCode::CREATED);
    }
    let (status, _) = create_mission(&app, "Keep", other, planet).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(count(&pool, "missions").await, 4);

    let uri = format!("/scientists/{}", doomed);
    let (status, body) = send(&app, Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert!(body.is_null());
    assert_eq!(count(&pool, "missions").await, 1);

    let (status, error) = send(&app, Method::GET, &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(error["error"], "Scientist not found");

    let (status, _) = send(&app, Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn non_numeric_id_is_not_found() {
    let (app, _pool) = setup().await;
    let (status, error) = send(&app, Method::GET, "/scientists/abc", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(error["error"], "Scientist not found");
}

#[tokio::test]
async fn visited_planets_are_derived_from_missions() {
    let (app, pool) = setup().await;
    let ada = create_scientist(&app, "Ada", "Robotics").await;
    let vulcan = create_planet(&pool, "Vulcan").await;
    let hoth = create_planet(&pool, "Hoth").await;
    create_mission(&app, "One", ada, hoth).await;
    create_mission(&app, "Two", ada, vulcan).await;
    create_mission(&app, "Three", ada, hoth).await;

    let graph = EntityStore::scientist_graph(&pool, ada).await.unwrap();
    let names: Vec<&str> = graph
        .planets_of_scientist(ada)
        .into_iter()
        .map(|p| p.name.as_str())
        .collect();
    assert_eq!(names, vec!["Hoth", "Vulcan"]);

    let graph = EntityStore::planet_graph(&pool, hoth).await.unwrap();
    let visitors: Vec<i64> = graph.scientists_of_planet(hoth).into_iter().map(|s| s.id).collect();
    assert_eq!(visitors, vec![ada]);
}
