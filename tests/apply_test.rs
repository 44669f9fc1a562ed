//! End-to-end push flow against the in-memory store

mod helpers;

use cruiser::{apply, ApplyError, ConfigStore, ConfigStoreError, InMemoryConfigStore};
use helpers::{build_topology, legacy_config, test_credentials};

#[tokio::test]
async fn apply_replaces_whatever_the_server_had() {
    let store = InMemoryConfigStore::with_config(legacy_config());

    let outcome = apply(&store, &test_credentials()).await.unwrap();
    assert_eq!(outcome.groups, 5);
    assert_eq!(outcome.pipelines, 13);

    let current = store.current().await;
    assert_eq!(current, build_topology());
    assert!(current.group("legacy").is_none());
}

#[tokio::test]
async fn apply_commits_a_new_version() {
    let store = InMemoryConfigStore::new();
    let (_, before) = store.fetch().await.unwrap();

    let outcome = apply(&store, &test_credentials()).await.unwrap();
    assert_ne!(outcome.version, before);

    let (_, after) = store.fetch().await.unwrap();
    assert_eq!(outcome.version, after);
}

#[tokio::test]
async fn apply_twice_converges_on_the_same_configuration() {
    let store = InMemoryConfigStore::new();

    apply(&store, &test_credentials()).await.unwrap();
    let first = store.current().await;

    apply(&store, &test_credentials()).await.unwrap();
    assert_eq!(store.current().await, first);
}

#[tokio::test]
async fn concurrent_push_surfaces_a_conflict() {
    let store = InMemoryConfigStore::new();
    let (config, version) = store.fetch().await.unwrap();

    // Someone else pushes between our fetch and our push.
    store.push(&config, &version).await.unwrap();

    let result = store.push(&build_topology(), &version).await;
    assert!(matches!(result, Err(ConfigStoreError::Conflict { .. })));
}

#[tokio::test]
async fn apply_error_renders_the_store_failure() {
    let store = InMemoryConfigStore::new();
    let (config, version) = store.fetch().await.unwrap();
    store.push(&config, &version).await.unwrap();

    // Drive the same conflict through the ApplyError wrapper.
    let error: ApplyError = store
        .push(&build_topology(), &version)
        .await
        .map(|_| ())
        .unwrap_err()
        .into();
    assert!(error.to_string().contains("changed on the server"));
}
