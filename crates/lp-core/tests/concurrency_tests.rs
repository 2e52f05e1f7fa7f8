// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

use futures::future::join_all;
use lp_api_contract::CreatePollRequest;
use lp_core::{IdGenerator, InMemorySessionStore, PollError, SessionStore};
use std::collections::HashSet;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

/// Hands out the same key and id forever
struct FixedIds;

impl IdGenerator for FixedIds {
    fn session_key(&self) -> String {
        "424242".to_string()
    }

    fn user_id(&self) -> String {
        "4242".to_string()
    }
}

/// Repeats each id twice before moving on
struct StutteringIds {
    counter: AtomicU32,
}

impl IdGenerator for StutteringIds {
    fn session_key(&self) -> String {
        (100_000 + self.counter.fetch_add(1, Ordering::SeqCst) / 2).to_string()
    }

    fn user_id(&self) -> String {
        (1_000 + self.counter.fetch_add(1, Ordering::SeqCst) / 2).to_string()
    }
}

fn two_option_poll() -> CreatePollRequest {
    CreatePollRequest {
        key: None,
        question: "Ship it?".to_string(),
        options: vec!["Yes".to_string(), "No".to_string()],
        max_votes: 1,
    }
}

#[tokio::test]
async fn concurrent_joins_get_distinct_ids() {
    let store = Arc::new(InMemorySessionStore::new());
    let key = store.create_session().await.unwrap().key;

    let joins = (0..200).map(|_| {
        let store = Arc::clone(&store);
        let key = key.clone();
        tokio::spawn(async move { store.join_session(&key).await })
    });
    let ids: Vec<String> = join_all(joins)
        .await
        .into_iter()
        .map(|joined| joined.unwrap().unwrap().1)
        .collect();

    let unique: HashSet<_> = ids.iter().collect();
    assert_eq!(unique.len(), 200);
    assert_eq!(store.get_session(&key).await.unwrap().users.len(), 200);
}

#[tokio::test]
async fn concurrent_votes_are_all_counted() {
    let store = Arc::new(InMemorySessionStore::new());
    let key = store.create_session().await.unwrap().key;

    let mut users = Vec::new();
    for _ in 0..100 {
        users.push(store.join_session(&key).await.unwrap().1);
    }
    store.create_poll(&key, &two_option_poll()).await.unwrap();

    let votes = users.iter().enumerate().map(|(i, user)| {
        let store = Arc::clone(&store);
        let key = key.clone();
        let user = user.clone();
        let choice = if i % 4 == 0 { "No" } else { "Yes" };
        tokio::spawn(async move { store.vote(&key, &user, &[choice.to_string()]).await })
    });
    for result in join_all(votes).await {
        assert!(result.unwrap().is_ok());
    }

    let results = store.results(&key).await.unwrap();
    assert_eq!(results.voted, 100);
    assert_eq!(results.options[0].votes, 75);
    assert_eq!(results.options[1].votes, 25);
}

#[tokio::test]
async fn racing_double_votes_count_once() {
    let store = Arc::new(InMemorySessionStore::new());
    let key = store.create_session().await.unwrap().key;
    let (_, user) = store.join_session(&key).await.unwrap();
    store.create_poll(&key, &two_option_poll()).await.unwrap();

    let attempts = (0..20).map(|_| {
        let store = Arc::clone(&store);
        let key = key.clone();
        let user = user.clone();
        tokio::spawn(async move { store.vote(&key, &user, &["Yes".to_string()]).await })
    });
    let outcomes: Vec<_> = join_all(attempts).await.into_iter().map(|r| r.unwrap()).collect();

    assert_eq!(outcomes.iter().filter(|r| r.is_ok()).count(), 1);
    assert!(outcomes
        .iter()
        .filter_map(|r| r.as_ref().err())
        .all(|e| matches!(e, PollError::AlreadyVoted(_))));
    assert_eq!(store.results(&key).await.unwrap().options[0].votes, 1);
}

#[tokio::test]
async fn collisions_are_retried() {
    let store = InMemorySessionStore::with_id_generator(Arc::new(StutteringIds {
        counter: AtomicU32::new(0),
    }));

    let first = store.create_session().await.unwrap().key;
    let second = store.create_session().await.unwrap().key;
    assert_ne!(first, second);
}

#[tokio::test]
async fn exhausted_key_space_is_reported() {
    let store = InMemorySessionStore::with_id_generator(Arc::new(FixedIds)).with_max_attempts(5);

    let key = store.create_session().await.unwrap().key;
    assert_eq!(key, "424242");
    assert!(matches!(
        store.create_session().await,
        Err(PollError::KeySpaceExhausted(_))
    ));

    store.join_session(&key).await.unwrap();
    assert!(matches!(
        store.join_session(&key).await,
        Err(PollError::KeySpaceExhausted(_))
    ));
}
