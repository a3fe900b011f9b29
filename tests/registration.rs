use axum::{
    body::{to_bytes, Body},
    http::{Method, Request, StatusCode},
};
use dynroute_sdk::{
    build_app, load_from_path, users_surface, AppError, Bootstrap, InMemoryUserStore, RegistrationError, RouteKey,
    Settings, SynthesisError, Synthesizer, UserStore,
};
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;

fn store() -> Arc<dyn UserStore> {
    Arc::new(InMemoryUserStore::new())
}

#[test]
fn every_descriptor_is_routed_exactly_once() {
    let mut synth = Synthesizer::new();
    let registered = Bootstrap::new(users_surface())
        .unwrap()
        .synthesize(&mut synth, store())
        .unwrap()
        .register()
        .unwrap();
    let table = registered.table();
    for op in users_surface().operations {
        assert_eq!(table.routes_for(&op.name), 1, "{}", op.name);
    }
    assert_eq!(table.len(), users_surface().operations.len());
    assert!(table.contains(&RouteKey::new(Method::GET, "/users/")));
    assert!(table.contains(&RouteKey::new(Method::GET, "/users")));
    assert!(table.contains(&RouteKey::new(Method::DELETE, "/users/{id}")));
    assert!(!table.contains(&RouteKey::new(Method::DELETE, "/users")));
}

#[test]
fn colliding_bindings_abort_startup() {
    let mut config = users_surface();
    let mut dup = config.routes[1].clone();
    dup.operation = "getAll".into();
    dup.signature.clear();
    config.routes.push(dup);
    let err = build_app(config, &Settings::default(), store()).unwrap_err();
    assert!(matches!(
        err,
        AppError::Registration(RegistrationError::RouteCollision { ref method, ref path }) if method == "GET" && path == "/users"
    ));
}

#[test]
fn unknown_delegate_aborts_startup() {
    let mut config = users_surface();
    config.operations[2].delegate = "insert".into();
    let err = build_app(config, &Settings::default(), store()).unwrap_err();
    assert!(matches!(err, AppError::Synthesis(SynthesisError::UnknownDelegate { .. })));
}

#[tokio::test]
async fn surface_file_builds_a_working_app() {
    let config = load_from_path(concat!(env!("CARGO_MANIFEST_DIR"), "/sample/users_surface.json"))
        .await
        .unwrap();
    let app = build_app(config, &Settings::default(), Arc::new(InMemoryUserStore::with_stub_user())).unwrap();
    let response = app
        .oneshot(Request::builder().uri("/users/").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = serde_json::from_slice(&to_bytes(response.into_body(), usize::MAX).await.unwrap()).unwrap();
    assert_eq!(body.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn routes_endpoint_lists_the_table_in_order() {
    let app = build_app(users_surface(), &Settings::default(), store()).unwrap();
    let response = app
        .clone()
        .oneshot(Request::builder().uri("/routes").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = serde_json::from_slice(&to_bytes(response.into_body(), usize::MAX).await.unwrap()).unwrap();
    let routes = body.as_array().unwrap();
    let summary: Vec<String> = routes
        .iter()
        .map(|r| format!("{} {} {}", r["method"].as_str().unwrap(), r["path"].as_str().unwrap(), r["operation"].as_str().unwrap()))
        .collect();
    assert_eq!(
        summary,
        vec![
            "GET /users/ getAll",
            "GET /users getById",
            "POST /users save",
            "PUT /users update",
            "PATCH /users updateNickName",
            "DELETE /users/{id} delete",
        ]
    );
    assert_eq!(routes[2]["consumes"], "application/json");
    assert!(routes[4].get("consumes").is_none());

    let health = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(health.status(), StatusCode::OK);
}
