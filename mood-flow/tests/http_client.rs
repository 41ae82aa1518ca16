use std::{sync::Arc, time::Duration};

use axum::{
    Json, Router,
    extract::Path,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use mood_flow::{
    ClientConfig, DetailLoader, FlowError, HttpClient, InMemoryStore, ListRoute, MountOutcome,
    MovieApi, NavigationBridge, ResultCache, SearchCoordinator, SearchQuery, check_health,
};
use serde_json::{Value, json};
use tokio::net::TcpListener;

async fn serve(app: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

fn client(base_url: &str, timeout: Duration) -> HttpClient {
    HttpClient::new(&ClientConfig::new(base_url).with_timeout(timeout)).unwrap()
}

async fn recommendations(Json(body): Json<Value>) -> impl IntoResponse {
    let mood = body["mood"].as_str().unwrap_or_default().to_string();
    let page = body["page"].as_u64().unwrap_or(1);
    match mood.as_str() {
        "broken" => (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({"error": "unprocessable", "message": "Mood could not be understood", "status": 422})),
        )
            .into_response(),
        "legacy" => (
            StatusCode::BAD_REQUEST,
            Json(json!({"detail": "mood must be at most 200 characters"})),
        )
            .into_response(),
        "gateway" => (StatusCode::BAD_GATEWAY, "<html>upstream down</html>").into_response(),
        "garbled" => (StatusCode::OK, "not json").into_response(),
        "slow" => {
            tokio::time::sleep(Duration::from_secs(2)).await;
            Json(json!({"recommendations": [], "total_pages": 1, "current_page": 1})).into_response()
        }
        _ => Json(json!({
            "recommendations": [
                {"id": page * 10 + 1, "title": format!("{} #{}", mood, page * 10 + 1), "overview": "..", "rating": 7.5, "poster": null},
                {"id": page * 10 + 2, "title": format!("{} #{}", mood, page * 10 + 2), "overview": "..", "rating": 6.1, "poster": "https://img/p.jpg"}
            ],
            "total_pages": 2,
            "current_page": page
        }))
        .into_response(),
    }
}

async fn movie(Path(id): Path<String>) -> impl IntoResponse {
    match id.as_str() {
        "603" => Json(json!({
            "id": 603,
            "title": "The Matrix",
            "poster_path": "/matrix.jpg",
            "backdrop_path": "/matrix-bg.jpg",
            "genres": ["Action"],
            "trailer": {"name": "Trailer", "key": "vKQi3bBA1y8", "type": "Trailer"}
        }))
        .into_response(),
        "untitled" => Json(json!({"id": 1})).into_response(),
        _ => (StatusCode::NOT_FOUND, Json(json!({"detail": "Movie not found"}))).into_response(),
    }
}

fn backend() -> Router {
    Router::new()
        .route("/health", get(|| async { "OK" }))
        .route("/recommendations/", post(recommendations))
        .route("/movie/{id}", get(movie))
}

#[tokio::test]
async fn test_recommendations_over_http() {
    let base = serve(backend()).await;
    let api = client(&base, Duration::from_secs(5));

    let page = api
        .recommendations(&SearchQuery::new("happy", 2).unwrap())
        .await
        .unwrap();

    assert_eq!(page.current_page, 2);
    assert_eq!(page.total_pages, 2);
    assert_eq!(page.recommendations.len(), 2);
    assert_eq!(page.recommendations[0].id, 21);
    assert_eq!(page.recommendations[1].poster.as_deref(), Some("https://img/p.jpg"));
}

#[tokio::test]
async fn test_structured_error_becomes_api_error() {
    let base = serve(backend()).await;
    let api = client(&base, Duration::from_secs(5));

    let err = api
        .recommendations(&SearchQuery::new("broken", 1).unwrap())
        .await
        .unwrap_err();

    match err {
        FlowError::Api {
            status,
            message,
            details,
        } => {
            assert_eq!(status, 422);
            assert_eq!(message, "Mood could not be understood");
            assert_eq!(details.unwrap()["error"], "unprocessable");
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[tokio::test]
async fn test_detail_error_body_becomes_api_error() {
    let base = serve(backend()).await;
    let api = client(&base, Duration::from_secs(5));

    let err = api
        .recommendations(&SearchQuery::new("legacy", 1).unwrap())
        .await
        .unwrap_err();

    assert!(
        matches!(err, FlowError::Api { status: 400, ref message, .. } if message == "mood must be at most 200 characters")
    );
}

#[tokio::test]
async fn test_unparseable_error_becomes_http_error() {
    let base = serve(backend()).await;
    let api = client(&base, Duration::from_secs(5));

    let err = api
        .recommendations(&SearchQuery::new("gateway", 1).unwrap())
        .await
        .unwrap_err();

    assert!(matches!(err, FlowError::Http(502)));
}

#[tokio::test]
async fn test_undecodable_success_body_is_invalid_payload() {
    let base = serve(backend()).await;
    let api = client(&base, Duration::from_secs(5));

    let err = api
        .recommendations(&SearchQuery::new("garbled", 1).unwrap())
        .await
        .unwrap_err();

    assert!(matches!(err, FlowError::InvalidPayload(_)));
}

#[tokio::test]
async fn test_slow_response_times_out() {
    let base = serve(backend()).await;
    let api = client(&base, Duration::from_millis(200));

    let err = api
        .recommendations(&SearchQuery::new("slow", 1).unwrap())
        .await
        .unwrap_err();

    assert!(matches!(err, FlowError::TimedOut));
}

#[tokio::test]
async fn test_connection_failure_is_network_error() {
    // grab a free port, then close it
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let api = client(&format!("http://{}", addr), Duration::from_secs(2));
    let err = api.health().await.unwrap_err();

    assert!(matches!(err, FlowError::Network(_)));
    assert!(!check_health(&api).await);
}

#[tokio::test]
async fn test_health_probe() {
    let base = serve(backend()).await;
    assert!(check_health(&client(&base, Duration::from_secs(2))).await);

    let down = serve(Router::new().route(
        "/health",
        get(|| async { StatusCode::SERVICE_UNAVAILABLE }),
    ))
    .await;
    assert!(!check_health(&client(&down, Duration::from_secs(2))).await);
}

#[tokio::test]
async fn test_detail_loader_over_http() {
    let base = serve(backend()).await;
    let api = Arc::new(client(&base, Duration::from_secs(5)));
    let loader = DetailLoader::new(api);

    let details = loader.load("603").await.unwrap();
    assert_eq!(details.title, "The Matrix");
    assert_eq!(
        details.poster_path.as_deref(),
        Some("https://image.tmdb.org/t/p/w500/matrix.jpg")
    );
    assert_eq!(
        details.backdrop_path.as_deref(),
        Some("https://image.tmdb.org/t/p/original/matrix-bg.jpg")
    );
    assert_eq!(
        details.trailer.unwrap().watch_url(),
        "https://www.youtube.com/watch?v=vKQi3bBA1y8"
    );

    assert!(matches!(
        loader.load("untitled").await,
        Err(FlowError::InvalidPayload(_))
    ));
    assert!(matches!(
        loader.load("42").await,
        Err(FlowError::Api { status: 404, .. })
    ));
}

#[tokio::test]
async fn test_search_and_paginate_over_http() {
    let base = serve(backend()).await;
    let api = Arc::new(client(&base, Duration::from_secs(5)));
    let local = Arc::new(InMemoryStore::new());
    let coordinator = SearchCoordinator::new(
        api.clone(),
        ResultCache::new(local.clone()),
        NavigationBridge::new(Arc::new(InMemoryStore::new())),
    );

    let outcome = coordinator
        .mount(&ListRoute::for_mood("happy"))
        .await
        .unwrap();
    assert_eq!(outcome, MountOutcome::Fetched);
    coordinator.load_more().await.unwrap();

    let ids: Vec<i64> = coordinator.state().movies.iter().map(|m| m.id).collect();
    assert_eq!(ids, vec![11, 12, 21, 22]);
    assert!(!coordinator.can_load_more());
    assert!(local.contains_key("movies_happy_2"));
}
