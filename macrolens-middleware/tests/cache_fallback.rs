use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use macrolens_middleware::{CacheCoordinator, MemoryStore};
use macrolens_types::{CacheStatus, DegradedPolicy, MacrolensError};

fn coordinator(policy: DegradedPolicy) -> CacheCoordinator {
    CacheCoordinator::new(Arc::new(MemoryStore::new(16)), policy)
}

#[tokio::test]
async fn live_success_writes_through_and_reports_fresh() {
    let coord = coordinator(DegradedPolicy::Never);
    let (value, status) = coord
        .fetch_with_fallback("k", Duration::from_secs(60), false, || async {
            Ok::<_, MacrolensError>(41)
        })
        .await
        .unwrap();
    assert_eq!(value, 41);
    assert_eq!(status, CacheStatus::Fresh);
}

#[tokio::test]
async fn fresh_entry_short_circuits_the_fetch() {
    let coord = coordinator(DegradedPolicy::Never);
    let calls = Arc::new(AtomicUsize::new(0));

    for expected in [CacheStatus::Fresh, CacheStatus::Cached] {
        let calls = calls.clone();
        let (value, status) = coord
            .fetch_with_fallback("k", Duration::from_secs(60), false, move || async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok::<_, MacrolensError>(7)
            })
            .await
            .unwrap();
        assert_eq!(value, 7);
        assert_eq!(status, expected);
    }
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn force_refresh_bypasses_a_fresh_entry() {
    let coord = coordinator(DegradedPolicy::Never);
    let seed = coord
        .fetch_with_fallback("k", Duration::from_secs(60), false, || async {
            Ok::<_, MacrolensError>(1)
        })
        .await
        .unwrap();
    assert_eq!(seed, (1, CacheStatus::Fresh));

    let (value, status) = coord
        .fetch_with_fallback("k", Duration::from_secs(60), true, || async {
            Ok::<_, MacrolensError>(2)
        })
        .await
        .unwrap();
    assert_eq!(value, 2);
    assert_eq!(status, CacheStatus::Fresh);
}

#[tokio::test]
async fn stale_entry_is_served_on_failure_when_policy_allows() {
    let coord = coordinator(DegradedPolicy::StaleIfError);
    // ttl of zero: the entry is written but expires immediately
    coord
        .fetch_with_fallback("k", Duration::from_secs(0), false, || async {
            Ok::<_, MacrolensError>(9)
        })
        .await
        .unwrap();
    tokio::time::sleep(Duration::from_millis(1100)).await;

    let (value, status) = coord
        .fetch_with_fallback("k", Duration::from_secs(0), false, || async {
            Err::<i32, _>(MacrolensError::upstream("fred", "503 service unavailable"))
        })
        .await
        .unwrap();
    assert_eq!(value, 9);
    assert_eq!(status, CacheStatus::Stale);
}

#[tokio::test]
async fn stale_serving_is_refused_under_production_policy() {
    let coord = coordinator(DegradedPolicy::Never);
    coord
        .fetch_with_fallback("k", Duration::from_secs(0), false, || async {
            Ok::<_, MacrolensError>(9)
        })
        .await
        .unwrap();
    tokio::time::sleep(Duration::from_millis(1100)).await;

    let err = coord
        .fetch_with_fallback("k", Duration::from_secs(0), false, || async {
            Err::<i32, _>(MacrolensError::upstream("fred", "503 service unavailable"))
        })
        .await
        .unwrap_err();
    assert!(matches!(err, MacrolensError::Unavailable { .. }));
}

#[tokio::test]
async fn failure_with_empty_cache_is_unavailable() {
    let coord = coordinator(DegradedPolicy::StaleIfError);
    let err = coord
        .fetch_with_fallback("k", Duration::from_secs(60), false, || async {
            Err::<i32, _>(MacrolensError::upstream("fred", "connection reset"))
        })
        .await
        .unwrap_err();
    assert!(matches!(err, MacrolensError::Unavailable { .. }));
}

#[tokio::test]
async fn not_found_is_never_masked_by_the_cache() {
    let coord = coordinator(DegradedPolicy::StaleIfError);
    coord
        .fetch_with_fallback("k", Duration::from_secs(0), false, || async {
            Ok::<_, MacrolensError>(9)
        })
        .await
        .unwrap();
    tokio::time::sleep(Duration::from_millis(1100)).await;

    let err = coord
        .fetch_with_fallback("k", Duration::from_secs(0), false, || async {
            Err::<i32, _>(MacrolensError::not_found("series NOPE"))
        })
        .await
        .unwrap_err();
    assert!(matches!(err, MacrolensError::NotFound { .. }));
}
