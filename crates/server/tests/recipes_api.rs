use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode, header},
};
use engine::{
    Engine, EngineError, MemoryRepository, NewRecipe, Recipe, RecipePatch, RecipeRepository,
    ResultEngine,
};
use http_body_util::BodyExt;
use sea_orm::DbErr;
use serde_json::{Value, json};
use tower::ServiceExt;

async fn app() -> (Router, Arc<MemoryRepository>) {
    let repository = Arc::new(MemoryRepository::new());
    let engine = Engine::builder()
        .repository(repository.clone())
        .build()
        .await
        .unwrap();
    (server::router(engine, "/api"), repository)
}

/// Every call fails the way a broken database connection would.
#[derive(Debug)]
struct FailingRepository;

const STORAGE_FAILURE: &str = "disk I/O error at /var/lib/recipes.db";

fn storage_failure() -> EngineError {
    EngineError::Database(DbErr::Custom(STORAGE_FAILURE.to_string()))
}

#[async_trait]
impl RecipeRepository for FailingRepository {
    async fn all(&self) -> ResultEngine<Vec<Recipe>> {
        Err(storage_failure())
    }

    async fn by_id(&self, _id: i32) -> ResultEngine<Recipe> {
        Err(storage_failure())
    }

    async fn create(&self, _recipe: NewRecipe) -> ResultEngine<Recipe> {
        Err(storage_failure())
    }

    async fn update(&self, _id: i32, _patch: RecipePatch) -> ResultEngine<Recipe> {
        Err(storage_failure())
    }

    async fn delete(&self, _id: i32) -> ResultEngine<()> {
        Err(storage_failure())
    }
}

async fn failing_app() -> Router {
    let engine = Engine::builder()
        .repository(Arc::new(FailingRepository))
        .build()
        .await
        .unwrap();
    server::router(engine, "/api")
}

async fn send(router: &Router, method: Method, uri: &str, body: Option<&str>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(raw) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(raw.to_string())
        }
        None => Body::empty(),
    };

    let response = router
        .clone()
        .oneshot(builder.body(body).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

const TEA: &str =
    r#"{"title":"Tea","making_time":"5 min","serves":"1","ingredients":"tea,water","cost":5}"#;

async fn create(router: &Router, body: &str) -> Value {
    let (status, value) = send(router, Method::POST, "/api/recipes/", Some(body)).await;
    assert_eq!(status, StatusCode::OK);
    value["recipe"][0].clone()
}

#[tokio::test]
async fn create_returns_cost_as_string_and_equal_timestamps() {
    let (router, _) = app().await;

    let (status, body) = send(&router, Method::POST, "/api/recipes/", Some(TEA)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Recipe successfully created!");
    let recipe = &body["recipe"][0];
    assert_eq!(recipe["cost"], json!("5"));
    assert_eq!(recipe["title"], "Tea");
    assert_eq!(recipe["making_time"], "5 min");
    assert!(recipe["id"].as_i64().unwrap() > 0);
    assert_eq!(recipe["created_at"], recipe["updated_at"]);
    assert_eq!(recipe["created_at"].as_str().unwrap().len(), "2006-01-02 15:04:05".len());
}

#[tokio::test]
async fn create_rejects_missing_or_zero_fields() {
    let (router, repository) = app().await;

    for body in [
        r#"{"making_time":"5 min","serves":"1","ingredients":"tea,water","cost":5}"#,
        r#"{"title":"Tea","making_time":"5 min","serves":"1","ingredients":"tea,water","cost":0}"#,
        r#"{"title":"","making_time":"5 min","serves":"1","ingredients":"tea,water","cost":5}"#,
        r#"{"title":"Tea","#,
        r#"{"title":"Tea","making_time":"5 min","serves":"1","ingredients":"tea,water","cost":"5"}"#,
    ] {
        let (status, value) = send(&router, Method::POST, "/api/recipes/", Some(body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{body}");
        assert_eq!(value["message"], "Recipe creation failed!");
        assert_eq!(
            value["required"],
            "title, making_time, serves, ingredients, cost"
        );
    }

    assert!(repository.is_empty());
}

#[tokio::test]
async fn list_is_empty_then_newest_first() {
    let (router, _) = app().await;

    let (status, body) = send(&router, Method::GET, "/api/recipes/", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "recipes": [] }));

    let a = create(&router, TEA).await;
    let b = create(
        &router,
        r#"{"title":"Rice","making_time":"20 min","serves":"2","ingredients":"rice,water","cost":300}"#,
    )
    .await;

    let (status, body) = send(&router, Method::GET, "/api/recipes", None).await;
    assert_eq!(status, StatusCode::OK);
    let recipes = body["recipes"].as_array().unwrap();
    assert_eq!(recipes.len(), 2);
    assert_eq!(recipes[0]["id"], b["id"]);
    assert_eq!(recipes[1]["id"], a["id"]);
    assert_eq!(recipes[0]["cost"], json!("300"));
}

#[tokio::test]
async fn get_by_id() {
    let (router, _) = app().await;
    let created = create(&router, TEA).await;
    let id = created["id"].as_i64().unwrap();

    let (status, body) = send(&router, Method::GET, &format!("/api/recipes/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Recipe details by id");
    assert_eq!(body["recipe"].as_array().unwrap().len(), 1);
    assert_eq!(body["recipe"][0]["id"], created["id"]);
    assert_eq!(body["recipe"][0]["cost"], json!("5"));
}

#[tokio::test]
async fn get_missing_is_404_without_recipe() {
    let (router, _) = app().await;

    let (status, body) = send(&router, Method::GET, "/api/recipes/999999", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "No Recipe found");
    assert!(body.get("recipe").is_none());
}

#[tokio::test]
async fn bad_id_is_400() {
    let (router, _) = app().await;

    for method in [Method::GET, Method::DELETE] {
        let (status, body) = send(&router, method, "/api/recipes/abc", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "Invalid ID");
    }

    let (status, body) = send(
        &router,
        Method::PATCH,
        "/api/recipes/-3",
        Some(r#"{"title":"x"}"#),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Invalid ID");
}

#[tokio::test]
async fn partial_update_keeps_other_fields() {
    let (router, repository) = app().await;
    let created = create(
        &router,
        r#"{"title":"Tea","making_time":"5 min","serves":"1","ingredients":"tea,water","cost":100}"#,
    )
    .await;
    let id = created["id"].as_i64().unwrap() as i32;
    let before = engine::RecipeRepository::by_id(repository.as_ref(), id)
        .await
        .unwrap();

    let (status, body) = send(
        &router,
        Method::PATCH,
        &format!("/api/recipes/{id}"),
        Some(r#"{"title":"Green tea","cost":0,"serves":""}"#),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Recipe successfully updated!");
    assert_eq!(
        body["recipe"][0],
        json!({
            "title": "Green tea",
            "making_time": "5 min",
            "serves": "1",
            "ingredients": "tea,water",
            "cost": "100",
        })
    );

    let after = engine::RecipeRepository::by_id(repository.as_ref(), id)
        .await
        .unwrap();
    assert_eq!(after.created_at, before.created_at);
    assert!(after.updated_at > before.updated_at);
}

#[tokio::test]
async fn update_with_malformed_body_is_400() {
    let (router, _) = app().await;
    let created = create(&router, TEA).await;
    let id = created["id"].as_i64().unwrap();

    let (status, body) = send(
        &router,
        Method::PATCH,
        &format!("/api/recipes/{id}"),
        Some("{not json"),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Failed to decode request body");
}

#[tokio::test]
async fn update_missing_is_404() {
    let (router, repository) = app().await;

    let (status, body) = send(
        &router,
        Method::PATCH,
        "/api/recipes/7",
        Some(r#"{"title":"x"}"#),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "No Recipe found");
    assert!(repository.is_empty());
}

#[tokio::test]
async fn delete_then_get_is_404() {
    let (router, repository) = app().await;
    let created = create(&router, TEA).await;
    let id = created["id"].as_i64().unwrap();

    let (status, body) = send(&router, Method::DELETE, &format!("/api/recipes/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "message": "Recipe successfully removed!" }));
    assert!(repository.is_empty());

    let (status, _) = send(&router, Method::GET, &format!("/api/recipes/{id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = send(&router, Method::DELETE, &format!("/api/recipes/{id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "No Recipe found");
}

#[tokio::test]
async fn routes_can_be_mounted_at_root() {
    let engine = Engine::builder()
        .repository(Arc::new(MemoryRepository::new()))
        .build()
        .await
        .unwrap();
    let router = server::router(engine, "/");

    let (status, body) = send(&router, Method::GET, "/recipes/", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "recipes": [] }));
}

#[tokio::test]
async fn spawned_server_answers_over_tcp() {
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    let engine = Engine::builder()
        .repository(Arc::new(MemoryRepository::new()))
        .build()
        .await
        .unwrap();
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = server::spawn_with_listener(engine, "/api".to_string(), listener).unwrap();

    let mut stream = tokio::net::TcpStream::connect(addr).await.unwrap();
    stream
        .write_all(b"GET /api/recipes/ HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n")
        .await
        .unwrap();
    let mut response = String::new();
    stream.read_to_string(&mut response).await.unwrap();

    assert!(response.starts_with("HTTP/1.1 200"), "{response}");
    assert!(response.ends_with(r#"{"recipes":[]}"#), "{response}");
}

#[tokio::test]
async fn ids_past_i32_are_404() {
    let (router, _) = app().await;
    create(&router, TEA).await;

    for uri in ["/api/recipes/2147483648", "/api/recipes/99999999999"] {
        let (status, body) = send(&router, Method::GET, uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{uri}");
        assert_eq!(body["message"], "No Recipe found");

        let (status, body) = send(&router, Method::PATCH, uri, Some(r#"{"title":"x"}"#)).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{uri}");
        assert_eq!(body["message"], "No Recipe found");

        let (status, body) = send(&router, Method::DELETE, uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{uri}");
        assert_eq!(body["message"], "No Recipe found");
    }

    let (status, body) = send(
        &router,
        Method::GET,
        "/api/recipes/99999999999999999999999",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Invalid ID");
}

#[tokio::test]
async fn over_length_create_is_500_and_not_stored() {
    let (router, repository) = app().await;
    let title = "t".repeat(engine::TITLE_MAX_CHARS + 1);
    let body = json!({
        "title": title,
        "making_time": "5 min",
        "serves": "1",
        "ingredients": "tea,water",
        "cost": 5,
    })
    .to_string();

    let (status, value) = send(&router, Method::POST, "/api/recipes/", Some(&body)).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(value["message"], "Recipe creation failed!");
    assert!(repository.is_empty());
}

#[tokio::test]
async fn storage_failures_are_500_without_details() {
    let router = failing_app().await;

    for (method, uri, body) in [
        (Method::GET, "/api/recipes/", None),
        (Method::GET, "/api/recipes/1", None),
        (Method::PATCH, "/api/recipes/1", Some(r#"{"title":"x"}"#)),
    ] {
        let (status, value) = send(&router, method.clone(), uri, body).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR, "{method} {uri}");
        assert_eq!(value, json!({ "message": "internal server error" }));
        assert!(!value.to_string().contains(STORAGE_FAILURE));
    }
}

#[tokio::test]
async fn storage_failure_on_create_is_500_with_required_fields() {
    let router = failing_app().await;

    let (status, value) = send(&router, Method::POST, "/api/recipes/", Some(TEA)).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        value,
        json!({
            "message": "Recipe creation failed!",
            "required": "title, making_time, serves, ingredients, cost",
        })
    );
}

#[tokio::test]
async fn storage_failure_on_delete_is_404() {
    let router = failing_app().await;

    let (status, value) = send(&router, Method::DELETE, "/api/recipes/1", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(value, json!({ "message": "No Recipe found" }));
}
