use super::*;

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    routing::get,
    Json, Router,
};
use serde_json::json;
use tokio::{
    net::TcpListener,
    sync::{oneshot, Mutex},
};

use crate::ProfileSearchController;

fn profile_json(login: &str) -> serde_json::Value {
    json!({
        "login": login,
        "id": 1296269,
        "avatar_url": format!("https://avatars.example/{login}.png"),
        "html_url": format!("https://github.com/{login}"),
        "name": "Ada Lovelace",
        "company": "Analytical Engines",
        "bio": "first programmer",
        "public_repos": 8,
        "followers": 2,
        "following": 1,
        "created_at": "2008-01-14T04:33:35Z"
    })
}

fn followers_json() -> serde_json::Value {
    json!([
        {
            "login": "grace",
            "id": 1,
            "avatar_url": "https://avatars.example/grace.png",
            "html_url": "https://github.com/grace",
            "type": "User"
        },
        {
            "login": "alan",
            "id": 2,
            "avatar_url": "https://avatars.example/alan.png",
            "html_url": "https://github.com/alan",
            "type": "User"
        }
    ])
}

async fn spawn_fake_github(app: Router) -> Result<String> {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    Ok(format!("http://{addr}"))
}

fn profile_router() -> Router {
    Router::new().route(
        "/users/:username",
        get(|Path(username): Path<String>| async move { Json(profile_json(&username)) }),
    )
}

#[tokio::test]
async fn fetch_profile_decodes_the_fields_the_finder_displays() {
    let base_url = spawn_fake_github(profile_router())
        .await
        .expect("spawn server");
    let client = GithubProfileClient::new(base_url, Duration::from_secs(2)).expect("client");

    let profile = client.fetch_profile("ada").await.expect("profile");

    assert_eq!(profile.login, "ada");
    assert_eq!(profile.name.as_deref(), Some("Ada Lovelace"));
    assert_eq!(profile.bio.as_deref(), Some("first programmer"));
    assert_eq!(profile.avatar_url, "https://avatars.example/ada.png");
    assert_eq!(profile.html_url, "https://github.com/ada");
    assert_eq!(profile.public_repos, 8);
    assert_eq!(profile.followers, 2);
    assert_eq!(profile.following, 1);
}

#[tokio::test]
async fn null_name_and_bio_decode_as_none() {
    let app = Router::new().route(
        "/users/:username",
        get(|| async {
            Json(json!({
                "login": "ghost",
                "avatar_url": "https://avatars.example/ghost.png",
                "html_url": "https://github.com/ghost",
                "name": null,
                "bio": null,
                "public_repos": 0,
                "followers": 0,
                "following": 0
            }))
        }),
    );
    let base_url = spawn_fake_github(app).await.expect("spawn server");
    let client = GithubProfileClient::new(base_url, Duration::from_secs(2)).expect("client");

    let profile = client.fetch_profile("ghost").await.expect("profile");

    assert!(profile.name.is_none());
    assert!(profile.bio.is_none());
}

#[tokio::test]
async fn fetch_followers_decodes_the_list() {
    let app = Router::new().route(
        "/users/:username/followers",
        get(|| async { Json(followers_json()) }),
    );
    let base_url = spawn_fake_github(app).await.expect("spawn server");
    let client = GithubProfileClient::new(base_url, Duration::from_secs(2)).expect("client");

    let followers = client.fetch_followers("ada").await.expect("followers");

    assert_eq!(followers.len(), 2);
    assert_eq!(followers[0].login, "grace");
    assert_eq!(followers[0].id, 1);
    assert_eq!(followers[0].html_url, "https://github.com/grace");
    assert_eq!(followers[1].login, "alan");
}

#[tokio::test]
async fn an_empty_followers_array_decodes_to_no_followers() {
    let app = Router::new().route(
        "/users/:username/followers",
        get(|| async { Json(json!([])) }),
    );
    let base_url = spawn_fake_github(app).await.expect("spawn server");
    let client = GithubProfileClient::new(base_url, Duration::from_secs(2)).expect("client");

    let followers = client.fetch_followers("ada").await.expect("followers");

    assert!(followers.is_empty());
}

#[derive(Clone)]
struct RecordedHeaders {
    tx: Arc<Mutex<Option<oneshot::Sender<(Option<String>, Option<String>)>>>>,
}

async fn handle_profile_recording_headers(
    State(state): State<RecordedHeaders>,
    headers: HeaderMap,
    Path(username): Path<String>,
) -> Json<serde_json::Value> {
    let user_agent = headers
        .get("user-agent")
        .and_then(|value| value.to_str().ok())
        .map(String::from);
    let accept = headers
        .get("accept")
        .and_then(|value| value.to_str().ok())
        .map(String::from);
    if let Some(tx) = state.tx.lock().await.take() {
        let _ = tx.send((user_agent, accept));
    }
    Json(profile_json(&username))
}

#[tokio::test]
async fn sends_github_headers_on_every_request() {
    let (tx, rx) = oneshot::channel();
    let state = RecordedHeaders {
        tx: Arc::new(Mutex::new(Some(tx))),
    };
    let app = Router::new()
        .route("/users/:username", get(handle_profile_recording_headers))
        .with_state(state);
    let base_url = spawn_fake_github(app).await.expect("spawn server");
    let client = GithubProfileClient::new(base_url, Duration::from_secs(2)).expect("client");

    client.fetch_profile("ada").await.expect("profile");

    let (user_agent, accept) = rx.await.expect("headers");
    assert_eq!(user_agent.as_deref(), Some("github-profile-finder"));
    assert_eq!(accept.as_deref(), Some("application/vnd.github.v3+json"));
}

#[tokio::test]
async fn missing_user_maps_to_not_found() {
    let app = Router::new().route(
        "/users/:username",
        get(|| async {
            (
                StatusCode::NOT_FOUND,
                Json(json!({
                    "message": "Not Found",
                    "documentation_url": "https://docs.github.com/rest"
                })),
            )
        }),
    );
    let base_url = spawn_fake_github(app).await.expect("spawn server");
    let client = GithubProfileClient::new(base_url, Duration::from_secs(2)).expect("client");

    let err = client.fetch_profile("ghost").await.expect_err("404");

    assert_eq!(
        err,
        FetchError::NotFound {
            username: "ghost".to_string()
        }
    );
}

#[tokio::test]
async fn server_errors_map_to_transport_with_the_status() {
    let app = Router::new().route(
        "/users/:username",
        get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "boom") }),
    );
    let base_url = spawn_fake_github(app).await.expect("spawn server");
    let client = GithubProfileClient::new(base_url, Duration::from_secs(2)).expect("client");

    let err = client.fetch_profile("ada").await.expect_err("500");

    match err {
        FetchError::Transport { message } => {
            assert!(message.contains("500"), "unexpected message: {message}");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn undecodable_bodies_map_to_transport() {
    let app = Router::new().route("/users/:username", get(|| async { "not-json" }));
    let base_url = spawn_fake_github(app).await.expect("spawn server");
    let client = GithubProfileClient::new(base_url, Duration::from_secs(2)).expect("client");

    let err = client.fetch_profile("ada").await.expect_err("bad body");

    match err {
        FetchError::Transport { message } => {
            assert!(
                message.contains("invalid response body"),
                "unexpected message: {message}"
            );
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn slow_responses_map_to_transport_after_the_timeout() {
    let app = Router::new().route(
        "/users/:username",
        get(|| async {
            tokio::time::sleep(Duration::from_millis(500)).await;
            Json(profile_json("ada"))
        }),
    );
    let base_url = spawn_fake_github(app).await.expect("spawn server");
    let client = GithubProfileClient::new(base_url, Duration::from_millis(100)).expect("client");

    let err = client.fetch_profile("ada").await.expect_err("timeout");

    assert!(matches!(err, FetchError::Transport { .. }));
}

#[tokio::test]
async fn trailing_slash_in_the_base_url_is_tolerated() {
    let base_url = spawn_fake_github(profile_router())
        .await
        .expect("spawn server");
    let client =
        GithubProfileClient::new(format!("{base_url}/"), Duration::from_secs(2)).expect("client");

    let profile = client.fetch_profile("ada").await.expect("profile");

    assert_eq!(profile.login, "ada");
}

#[tokio::test]
async fn end_to_end_search_against_a_fake_api() {
    let app = Router::new()
        .route(
            "/users/:username",
            get(|Path(username): Path<String>| async move { Json(profile_json(&username)) }),
        )
        .route(
            "/users/:username/followers",
            get(|| async { Json(followers_json()) }),
        );
    let base_url = spawn_fake_github(app).await.expect("spawn server");

    let client = GithubProfileClient::new(base_url, Duration::from_secs(2)).expect("client");
    let controller = ProfileSearchController::new(Arc::new(client));

    controller.search("ada").await.expect("search");

    let snapshot = controller.snapshot().await;
    assert_eq!(snapshot.profile.expect("profile").login, "ada");
    assert_eq!(snapshot.followers.len(), 2);
    assert_eq!(snapshot.history, ["ada"]);
}
