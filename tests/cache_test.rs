//! Query cache behavior under a paused tokio clock.

use std::sync::Arc;
use std::time::Duration;

use devbox::adapters::mock::MockFetcher;
use devbox::cache::{QueryCache, QueryData, QueryKey};
use devbox::models::{Record, ResourceKind, Stats};
use serde_json::json;

const POLL: Duration = Duration::from_secs(1);

fn cache_with(fetcher: &MockFetcher) -> QueryCache {
    QueryCache::with_poll_interval(Arc::new(fetcher.clone()), POLL)
}

fn sms_records(ids: &[&str]) -> QueryData {
    let body: Vec<serde_json::Value> = ids
        .iter()
        .map(|id| {
            json!({
                "id": id,
                "created_at": "2024-05-01T10:00:00Z",
                "sms": {"from": "+15550001", "to": ["+15550002"], "message": "hi"}
            })
        })
        .collect();
    let records = Record::parse_list(ResourceKind::Sms, &serde_json::to_vec(&body).unwrap()).unwrap();
    QueryData::Records(records)
}

fn stats_total(total: usize) -> Stats {
    Stats {
        emails: total,
        total,
        ..Stats::default()
    }
}

/// Let spawned fetch and poll tasks run.
async fn settle() {
    for _ in 0..10 {
        tokio::task::yield_now().await;
    }
}

#[tokio::test(start_paused = true)]
async fn test_concurrent_queries_share_one_fetch() {
    let fetcher = MockFetcher::with_latency(Duration::from_millis(100));
    fetcher.set_stats(stats_total(3));
    let cache = cache_with(&fetcher);

    let (a, b) = tokio::join!(cache.query(QueryKey::Stats), cache.query(QueryKey::Stats));

    assert_eq!(fetcher.calls(QueryKey::Stats), 1);
    assert_eq!(a.unwrap().as_stats().unwrap().total, 3);
    assert_eq!(b.unwrap().as_stats().unwrap().total, 3);

    // Fresh data is served without another call
    cache.query(QueryKey::Stats).await.unwrap();
    assert_eq!(fetcher.calls(QueryKey::Stats), 1);
}

#[tokio::test(start_paused = true)]
async fn test_refresh_always_fetches() {
    let fetcher = MockFetcher::new();
    let cache = cache_with(&fetcher);

    cache.query(QueryKey::Push).await.unwrap();
    cache.refresh(QueryKey::Push).await.unwrap();
    assert_eq!(fetcher.calls(QueryKey::Push), 2);
}

#[tokio::test(start_paused = true)]
async fn test_snapshot_has_no_side_effects() {
    let fetcher = MockFetcher::new();
    let cache = cache_with(&fetcher);

    let snapshot = cache.snapshot(QueryKey::Chat);
    assert!(snapshot.data.is_none());
    assert!(!snapshot.is_fetching);
    settle().await;
    assert_eq!(fetcher.calls(QueryKey::Chat), 0);
}

#[tokio::test(start_paused = true)]
async fn test_subscribe_fetches_and_polls() {
    let fetcher = MockFetcher::new();
    fetcher.set_result(QueryKey::Sms, Ok(sms_records(&["s1"])));
    let cache = cache_with(&fetcher);

    let mut sub = cache.subscribe(QueryKey::Sms);
    assert!(sub.is_loading());
    let snapshot = sub.wait_until(|s| s.data.is_some()).await;
    assert_eq!(snapshot.records().unwrap().len(), 1);
    assert_eq!(fetcher.calls(QueryKey::Sms), 1);
    assert!(cache.is_polling(QueryKey::Sms));

    // New data shows up on the next poll
    fetcher.set_result(QueryKey::Sms, Ok(sms_records(&["s2", "s1"])));
    tokio::time::sleep(POLL + Duration::from_millis(50)).await;
    settle().await;

    assert_eq!(fetcher.calls(QueryKey::Sms), 2);
    assert_eq!(sub.snapshot().records().unwrap().len(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_subscribers_share_one_poller() {
    let fetcher = MockFetcher::new();
    let cache = cache_with(&fetcher);

    let first = cache.subscribe(QueryKey::Emails);
    let second = cache.subscribe(QueryKey::Emails);
    settle().await;
    assert_eq!(cache.subscriber_count(QueryKey::Emails), 2);
    assert_eq!(fetcher.calls(QueryKey::Emails), 1);

    tokio::time::sleep(POLL * 3 + Duration::from_millis(50)).await;
    settle().await;
    assert_eq!(fetcher.calls(QueryKey::Emails), 4);

    drop(first);
    assert!(cache.is_polling(QueryKey::Emails));
    drop(second);
    assert_eq!(cache.subscriber_count(QueryKey::Emails), 0);
    assert!(!cache.is_polling(QueryKey::Emails));
}

#[tokio::test(start_paused = true)]
async fn test_polling_stops_after_last_unsubscribe() {
    let fetcher = MockFetcher::new();
    let cache = cache_with(&fetcher);

    let sub = cache.subscribe(QueryKey::Chat);
    settle().await;
    assert_eq!(fetcher.calls(QueryKey::Chat), 1);
    drop(sub);

    tokio::time::sleep(POLL * 5).await;
    settle().await;
    assert_eq!(fetcher.calls(QueryKey::Chat), 1);

    // Data stays cached for later reads
    assert!(cache.snapshot(QueryKey::Chat).data.is_some());
}

#[tokio::test(start_paused = true)]
async fn test_invalidate_without_subscribers_waits_for_next_read() {
    let fetcher = MockFetcher::new();
    let cache = cache_with(&fetcher);

    cache.query(QueryKey::Stats).await.unwrap();
    cache.invalidate(QueryKey::Stats);
    settle().await;

    assert!(cache.snapshot(QueryKey::Stats).is_stale);
    assert_eq!(fetcher.calls(QueryKey::Stats), 1);

    cache.query(QueryKey::Stats).await.unwrap();
    assert_eq!(fetcher.calls(QueryKey::Stats), 2);
    assert!(!cache.snapshot(QueryKey::Stats).is_stale);
}

#[tokio::test(start_paused = true)]
async fn test_invalidate_refetches_subscribed_key() {
    let fetcher = MockFetcher::new();
    fetcher.set_stats(stats_total(1));
    let cache = cache_with(&fetcher);

    let mut sub = cache.subscribe(QueryKey::Stats);
    sub.wait_until(|s| s.data.is_some()).await;

    fetcher.set_stats(stats_total(2));
    cache.invalidate(QueryKey::Stats);
    let snapshot = sub
        .wait_until(|s| s.stats().map(|st| st.total) == Some(2))
        .await;

    assert!(!snapshot.is_stale);
    assert_eq!(fetcher.calls(QueryKey::Stats), 2);
}

#[tokio::test(start_paused = true)]
async fn test_invalidation_during_fetch_is_not_lost() {
    let fetcher = MockFetcher::with_latency(Duration::from_millis(100));
    let cache = cache_with(&fetcher);

    let mut sub = cache.subscribe(QueryKey::Emails);
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(fetcher.calls(QueryKey::Emails), 1);
    cache.invalidate(QueryKey::Emails);

    // The fetch that started before the invalidation cannot clear it
    let snapshot = sub.wait_until(|s| s.data.is_some()).await;
    assert!(snapshot.is_stale);

    let snapshot = sub.wait_until(|s| !s.is_stale).await;
    assert!(snapshot.data.is_some());
    assert_eq!(fetcher.calls(QueryKey::Emails), 2);
}

#[tokio::test(start_paused = true)]
async fn test_failed_refetch_keeps_last_good_data() {
    let fetcher = MockFetcher::new();
    fetcher.set_result(QueryKey::Sms, Ok(sms_records(&["s1", "s2"])));
    let cache = cache_with(&fetcher);

    let mut sub = cache.subscribe(QueryKey::Sms);
    sub.wait_until(|s| s.data.is_some()).await;

    fetcher.set_failure(QueryKey::Sms, 503);
    cache.invalidate(QueryKey::Sms);
    let snapshot = sub.wait_until(|s| s.error.is_some()).await;

    assert_eq!(snapshot.records().unwrap().len(), 2);
    assert!(snapshot.is_stale);
    assert_eq!(snapshot.error.as_ref().unwrap().http_status(), Some(503));

    // The next poll recovers and clears the error
    fetcher.set_result(QueryKey::Sms, Ok(sms_records(&["s1"])));
    let snapshot = sub.wait_until(|s| s.error.is_none()).await;
    assert!(!snapshot.is_stale);
    assert_eq!(snapshot.records().unwrap().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_first_fetch_failure_surfaces_error() {
    let fetcher = MockFetcher::new();
    fetcher.set_failure(QueryKey::Push, 500);
    let cache = cache_with(&fetcher);

    let err = cache.query(QueryKey::Push).await.unwrap_err();
    assert_eq!(err.http_status(), Some(500));

    let snapshot = cache.snapshot(QueryKey::Push);
    assert!(snapshot.data.is_none());
    assert!(snapshot.error.is_some());
    assert!(!snapshot.is_loading());
}

#[tokio::test(start_paused = true)]
async fn test_invalidate_all_marks_every_key() {
    let fetcher = MockFetcher::new();
    let cache = cache_with(&fetcher);

    for key in QueryKey::ALL {
        cache.query(key).await.unwrap();
    }
    cache.invalidate_all();

    for key in QueryKey::ALL {
        assert!(cache.snapshot(key).is_stale, "{} should be stale", key);
    }
}
