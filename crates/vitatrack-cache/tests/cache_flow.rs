//! Cross-component cache flows over the in-memory backend.
//!
//! These tests exercise the components together the way a request handler
//! does: consult the cache, fall through on miss, write back, invalidate
//! after mutations, and keep working when the backend goes away.

use serde_json::{Value, json};
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use vitatrack_cache::{
    CacheConfig, CacheInvalidator, DynCacheBackend, InvalidationDomain, MemoryBackend,
    ProfileCache, RequestCache, ResultMemoizer, SessionStore, diagnostics,
};

fn backend() -> (Arc<MemoryBackend>, DynCacheBackend) {
    let memory = Arc::new(MemoryBackend::new());
    let dyn_backend: DynCacheBackend = memory.clone();
    (memory, dyn_backend)
}

fn conditions(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| (*v).to_string()).collect()
}

#[tokio::test]
async fn login_request_logout_flow() {
    let (_memory, cache) = backend();
    let ttl = CacheConfig::default().ttl;
    let sessions = SessionStore::new(cache.clone());

    // Login stores the token; a re-login replaces it.
    sessions.put("alice", "token-one", ttl.session).await;
    sessions.put("alice", "token-two", ttl.session).await;
    assert_eq!(sessions.get("alice").await.as_deref(), Some("token-two"));

    // Logout removes it; subsequent lookups miss.
    assert!(sessions.remove("alice").await);
    assert_eq!(sessions.get("alice").await, None);
}

#[tokio::test]
async fn snapshot_read_through_and_mutation_invalidation() {
    let (_memory, cache) = backend();
    let ttl = CacheConfig::default().ttl;
    let profiles = ProfileCache::new(cache.clone());
    let requests = RequestCache::new(cache.clone());
    let invalidator = CacheInvalidator::new(cache.clone());

    // First read misses; the handler computes and caches the snapshot.
    assert_eq!(profiles.get("alice").await, None);
    let snapshot = json!({ "bmi": 23.4, "conditions": ["hypertension"] });
    profiles.put("alice", snapshot.clone(), ttl.profile).await;
    assert_eq!(profiles.get("alice").await, Some(snapshot));

    // A generic health endpoint is cached through the wrapper.
    let summary: Result<Value, ()> = requests
        .wrap("alice", "/api/health/summary", ttl.request, || async {
            Ok(json!({ "status": "ok" }))
        })
        .await;
    assert!(summary.is_ok());

    // A successful health mutation invalidates both shapes for alice only.
    let bob_snapshot = json!({ "bmi": 27.0 });
    profiles.put("bob", bob_snapshot.clone(), ttl.profile).await;
    let removed = invalidator
        .invalidate("alice", &[InvalidationDomain::Health])
        .await;
    assert_eq!(removed, 2);

    assert_eq!(profiles.get("alice").await, None);
    assert_eq!(profiles.get("bob").await, Some(bob_snapshot));
}

#[tokio::test]
async fn recommendation_sharing_across_users() {
    let (_memory, cache) = backend();
    let ttl = CacheConfig::default().ttl;
    let memoizer = ResultMemoizer::new(cache.clone());
    let computed = AtomicU32::new(0);

    // Two users with nearby BMIs and the same conditions share one entry.
    let shared = conditions(&["diabetes"]);
    let mut results = Vec::new();
    for bmi in [24.9, 23.1] {
        let value = match memoizer.get(bmi, &shared).await {
            Some(hit) => hit,
            None => {
                computed.fetch_add(1, Ordering::SeqCst);
                let value = json!({ "dailyCalories": 1900 });
                memoizer
                    .put(bmi, &shared, value.clone(), ttl.recommendation_rule)
                    .await;
                value
            }
        };
        results.push(value);
    }

    assert_eq!(computed.load(Ordering::SeqCst), 1, "second caller hits");
    assert_eq!(results[0], results[1]);

    // A genuinely different profile computes its own entry.
    assert_eq!(memoizer.get(30.0, &shared).await, None);
}

#[tokio::test]
async fn ttl_expiry_returns_to_miss() {
    let (memory, cache) = backend();
    let profiles = ProfileCache::new(cache.clone());

    profiles
        .put("alice", json!({ "bmi": 22.0 }), Duration::from_secs(1_800))
        .await;
    assert!(profiles.get("alice").await.is_some());

    memory.advance(Duration::from_secs(1_801));
    assert_eq!(profiles.get("alice").await, None);
}

#[tokio::test]
async fn full_stack_degrades_when_backend_goes_away() {
    let (memory, cache) = backend();
    let ttl = CacheConfig::default().ttl;
    let sessions = SessionStore::new(cache.clone());
    let profiles = ProfileCache::new(cache.clone());
    let memoizer = ResultMemoizer::new(cache.clone());
    let requests = RequestCache::new(cache.clone());
    let invalidator = CacheInvalidator::new(cache.clone());

    sessions.put("alice", "token", ttl.session).await;
    profiles.put("alice", json!({}), ttl.profile).await;

    // The backend drops mid-flight.
    memory.set_connected(false);

    // Every read degrades to a miss, every write to a no-op; nothing errors.
    assert_eq!(sessions.get("alice").await, None);
    assert_eq!(profiles.get("alice").await, None);
    assert_eq!(memoizer.get(24.0, &conditions(&[])).await, None);
    assert_eq!(
        invalidator
            .invalidate("alice", &[InvalidationDomain::Health])
            .await,
        0
    );
    assert_eq!(diagnostics::probe(&cache).await, None);

    // The wrapped handler still answers, recomputing each time.
    let calls = AtomicU32::new(0);
    for _ in 0..2 {
        let result: Result<Value, ()> = requests
            .wrap("alice", "/api/meals/daily", ttl.request, || async {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok(json!({ "meals": [] }))
            })
            .await;
        assert!(result.is_ok());
    }
    assert_eq!(calls.load(Ordering::SeqCst), 2);

    // Recovery: the flag flips back and cached state is visible again.
    memory.set_connected(true);
    assert_eq!(sessions.get("alice").await.as_deref(), Some("token"));
}

#[tokio::test]
async fn probe_measures_round_trip() {
    let (_memory, cache) = backend();
    let latency = diagnostics::probe(&cache).await;
    assert!(latency.is_some());
}
