// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

use std::{net::TcpListener, sync::Arc, time::Duration};

use lp_api_contract::CreatePollRequest;
use lp_core::IdGenerator;
use lp_rest_client::{RestClient, RestClientError};
use lp_rest_server::{dependencies::DefaultServerDependencies, Server, ServerConfig};
use reqwest::StatusCode;
use serde_json::{json, Value};
use tokio::task::JoinHandle;

async fn spawn_server() -> (String, JoinHandle<()>) {
    spawn_server_with(|config| DefaultServerDependencies::new(config)).await
}

async fn spawn_server_with(
    deps: impl FnOnce(ServerConfig) -> DefaultServerDependencies,
) -> (String, JoinHandle<()>) {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind to ephemeral port");
    let addr = listener.local_addr().expect("port");
    drop(listener);

    let config = ServerConfig {
        bind_addr: addr,
        enable_cors: true,
        ..Default::default()
    };
    let server = Server::with_state(config.clone(), deps(config).into_state());
    let base = format!("http://{}", addr);

    let handle = tokio::spawn(async move {
        server.run_until(std::future::pending()).await.expect("server run");
    });

    wait_for_health(&base).await;
    (base, handle)
}

async fn wait_for_health(base_url: &str) {
    let client = reqwest::Client::new();
    let healthz = format!("{}/api/v1/healthz", base_url);
    let deadline = tokio::time::Instant::now() + Duration::from_secs(10);
    loop {
        if let Ok(response) = client.get(&healthz).send().await {
            if response.status().is_success() {
                return;
            }
        }
        if tokio::time::Instant::now() > deadline {
            panic!("server did not become healthy at {}", healthz);
        }
        tokio::time::sleep(Duration::from_millis(100)).await;
    }
}

fn poll(question: &str, options: &[&str], max_votes: u32) -> CreatePollRequest {
    CreatePollRequest {
        key: None,
        question: question.to_string(),
        options: options.iter().map(|o| o.to_string()).collect(),
        max_votes,
    }
}

fn picks(options: &[&str]) -> Vec<String> {
    options.iter().map(|o| o.to_string()).collect()
}

fn status_of(err: &RestClientError) -> Option<StatusCode> {
    err.status()
}

#[tokio::test]
async fn organizer_and_participants_run_a_poll() {
    let (base, handle) = spawn_server().await;
    let client = RestClient::from_url(&base).expect("client");

    let key = client.create_session().await.expect("create").key;
    let alice = client.join_session(&key).await.expect("join").user_id;
    let bob = client.join_session(&key).await.expect("join").user_id;
    assert_ne!(alice, bob);

    client.lock_session(&key).await.expect("lock");
    let late = client.join_session(&key).await.unwrap_err();
    assert_eq!(status_of(&late), Some(StatusCode::FORBIDDEN));

    client
        .create_poll(&key, &poll("Best editor?", &["vim", "emacs", "helix"], 2))
        .await
        .expect("create poll");

    client.vote(&key, &alice, &picks(&["vim", "helix"])).await.expect("alice votes");
    client.vote(&key, &bob, &picks(&["vim"])).await.expect("bob votes");

    let again = client.vote(&key, &bob, &picks(&["emacs"])).await.unwrap_err();
    assert_eq!(status_of(&again), Some(StatusCode::CONFLICT));

    let results = client.results(&key).await.expect("results");
    assert_eq!(results.participants, 2);
    assert_eq!(results.voted, 2);
    let vim = results.options.iter().find(|o| o.option == "vim").unwrap();
    assert_eq!(vim.votes, 2);
    assert_eq!(vim.percent, 100.0);
    let helix = results.options.iter().find(|o| o.option == "helix").unwrap();
    assert_eq!(helix.percent, 50.0);

    let closed = client.close_poll(&key).await.expect("close");
    assert!(closed.current_poll.is_none());
    assert_eq!(client.history(&key).await.expect("history").items.len(), 1);

    let sessions = client.list_sessions().await.expect("list");
    assert_eq!(sessions.total, 1);
    assert_eq!(sessions.items[0].polls_closed, 1);

    client.end_session(&key).await.expect("end");
    let gone = client.get_session(&key).await.unwrap_err();
    assert!(gone.is_not_found());

    handle.abort();
}

#[tokio::test]
async fn invariants_are_enforced_over_http() {
    let (base, handle) = spawn_server().await;
    let client = RestClient::from_url(&base).expect("client");

    let key = client.create_session().await.expect("create").key;
    let user = client.join_session(&key).await.expect("join").user_id;

    let no_poll = client.vote(&key, &user, &picks(&["a"])).await.unwrap_err();
    assert_eq!(status_of(&no_poll), Some(StatusCode::CONFLICT));

    let close_nothing = client.close_poll(&key).await.unwrap_err();
    assert_eq!(status_of(&close_nothing), Some(StatusCode::CONFLICT));

    let too_many = client.create_poll(&key, &poll("Q", &["a", "b"], 3)).await.unwrap_err();
    assert_eq!(status_of(&too_many), Some(StatusCode::BAD_REQUEST));

    client.create_poll(&key, &poll("Q", &["a", "b"], 1)).await.expect("poll");
    let second = client.create_poll(&key, &poll("Q2", &["x", "y"], 1)).await.unwrap_err();
    assert_eq!(status_of(&second), Some(StatusCode::CONFLICT));

    let over_limit = client.vote(&key, &user, &picks(&["a", "b"])).await.unwrap_err();
    assert_eq!(status_of(&over_limit), Some(StatusCode::BAD_REQUEST));

    let unknown = client.vote(&key, &user, &picks(&["c"])).await.unwrap_err();
    assert_eq!(status_of(&unknown), Some(StatusCode::BAD_REQUEST));

    let empty = client.vote(&key, &user, &[]).await.unwrap_err();
    assert_eq!(status_of(&empty), Some(StatusCode::BAD_REQUEST));

    let stranger = client.vote(&key, "0000", &picks(&["a"])).await.unwrap_err();
    assert!(stranger.is_not_found());

    let missing = client.join_session("999999").await.unwrap_err();
    assert!(missing.is_not_found());

    handle.abort();
}

#[tokio::test]
async fn flat_routes_keep_legacy_shapes() {
    let (base, handle) = spawn_server().await;
    let http = reqwest::Client::new();

    let session: Value = http
        .post(format!("{base}/create-session"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let key = session["key"].as_str().unwrap().to_string();
    assert_eq!(session["locked"], false);
    assert!(session["currentPoll"].is_null());

    let joined: Value = http
        .post(format!("{base}/join-session"))
        .json(&json!({ "key": key }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let user = joined["userId"].as_str().unwrap().to_string();
    assert_eq!(joined["session"]["users"][&user]["voted"], false);

    let response = http
        .post(format!("{base}/create-poll"))
        .json(&json!({
            "key": key,
            "question": "Tabs?",
            "options": ["Tabs", "Spaces"],
            "maxVotes": 1
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let voted: Value = http
        .post(format!("{base}/vote"))
        .json(&json!({ "key": key, "userId": user, "selectedOptions": ["Spaces"] }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(voted["currentPoll"]["votes"]["Spaces"], 1);
    assert_eq!(voted["users"][&user]["votes"][0], "Spaces");

    let closed: Value = http
        .post(format!("{base}/close-poll"))
        .json(&json!({ "key": key }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(closed["currentPoll"].is_null());
    assert_eq!(closed["pollHistory"][0]["active"], false);

    let locked: Value = http
        .post(format!("{base}/lock-session"))
        .json(&json!({ "key": key }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(locked["locked"], true);

    let refused = http
        .post(format!("{base}/join-session"))
        .json(&json!({ "key": key }))
        .send()
        .await
        .unwrap();
    assert_eq!(refused.status(), StatusCode::FORBIDDEN);
    let body: Value = refused.json().await.unwrap();
    assert_eq!(body["error"], "Session locked");

    let fetched = http.get(format!("{base}/session/{key}")).send().await.unwrap();
    assert_eq!(fetched.status(), StatusCode::OK);

    let missing = http.get(format!("{base}/session/100000")).send().await.unwrap();
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);
    let body: Value = missing.json().await.unwrap();
    assert_eq!(body["error"], "Session not found");

    let no_key = http
        .post(format!("{base}/vote"))
        .json(&json!({ "userId": user, "selectedOptions": ["Tabs"] }))
        .send()
        .await
        .unwrap();
    assert_eq!(no_key.status(), StatusCode::BAD_REQUEST);

    handle.abort();
}

#[tokio::test]
async fn cors_preflight_is_answered() {
    let (base, handle) = spawn_server().await;
    let http = reqwest::Client::new();

    let response = http
        .request(reqwest::Method::OPTIONS, format!("{base}/create-session"))
        .header("origin", "http://dashboard.local")
        .header("access-control-request-method", "POST")
        .send()
        .await
        .unwrap();
    assert!(response.status().is_success());
    assert_eq!(
        response.headers().get("access-control-allow-origin").unwrap(),
        "*"
    );

    handle.abort();
}

struct OneKey;

impl IdGenerator for OneKey {
    fn session_key(&self) -> String {
        "777777".to_string()
    }

    fn user_id(&self) -> String {
        "7777".to_string()
    }
}

#[tokio::test]
async fn exhausted_keys_return_503() {
    let (base, handle) = spawn_server_with(|config| {
        DefaultServerDependencies::with_id_generator(config, Arc::new(OneKey))
    })
    .await;
    let client = RestClient::from_url(&base).expect("client");

    assert_eq!(client.create_session().await.expect("first").key, "777777");
    let err = client.create_session().await.unwrap_err();
    assert_eq!(status_of(&err), Some(StatusCode::SERVICE_UNAVAILABLE));

    handle.abort();
}
