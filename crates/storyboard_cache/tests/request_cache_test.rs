use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use storyboard_cache::RequestCache;
use storyboard_error::{StoryboardError, StoryboardResult, UpstreamError, UpstreamErrorKind};

fn counting_producer(
    calls: Arc<AtomicUsize>,
    value: &'static str,
) -> impl FnOnce() -> futures::future::BoxFuture<'static, StoryboardResult<String>> {
    move || {
        Box::pin(async move {
            calls.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(20)).await;
            Ok(value.to_string())
        })
    }
}

#[tokio::test]
async fn concurrent_identical_keys_share_one_request() {
    let cache: RequestCache<StoryboardResult<String>> = RequestCache::new();
    let calls = Arc::new(AtomicUsize::new(0));

    let (a, b, c) = tokio::join!(
        cache.get_or_create("a cat's day", counting_producer(calls.clone(), "first")),
        cache.get_or_create("a cat's day", counting_producer(calls.clone(), "second")),
        cache.get_or_create("  a cat's   day ", counting_producer(calls.clone(), "third")),
    );

    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(a.expect("ok"), "first");
    assert_eq!(b.expect("ok"), "first");
    assert_eq!(c.expect("ok"), "first");
}

#[tokio::test]
async fn failure_is_shared_by_all_waiters() {
    let cache: RequestCache<StoryboardResult<String>> = RequestCache::new();
    let calls = Arc::new(AtomicUsize::new(0));

    let failing = |calls: Arc<AtomicUsize>| {
        move || async move {
            calls.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(20)).await;
            Err::<String, StoryboardError>(
                UpstreamError::new(UpstreamErrorKind::Narrative("boom".into())).into(),
            )
        }
    };

    let (a, b, c) = tokio::join!(
        cache.get_or_create("story", failing(calls.clone())),
        cache.get_or_create("story", failing(calls.clone())),
        cache.get_or_create("story", failing(calls.clone())),
    );

    assert_eq!(calls.load(Ordering::SeqCst), 1);
    for result in [a, b, c] {
        let err = result.unwrap_err();
        assert!(err.is_upstream());
        assert!(err.user_message().contains("boom"));
    }
}

#[tokio::test]
async fn entry_is_removed_after_settling() {
    let cache: RequestCache<StoryboardResult<String>> = RequestCache::new();
    let calls = Arc::new(AtomicUsize::new(0));

    let first = cache
        .get_or_create("story", counting_producer(calls.clone(), "one"))
        .await;
    assert_eq!(first.expect("ok"), "one");
    assert_eq!(cache.in_flight(), 0);
    assert!(!cache.contains("story"));

    let second = cache
        .get_or_create("story", counting_producer(calls.clone(), "two"))
        .await;
    assert_eq!(second.expect("ok"), "two");
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn different_keys_do_not_coalesce() {
    let cache: RequestCache<StoryboardResult<String>> = RequestCache::new();
    let calls = Arc::new(AtomicUsize::new(0));

    let (a, b) = tokio::join!(
        cache.get_or_create("a cat", counting_producer(calls.clone(), "cat")),
        cache.get_or_create("A cat", counting_producer(calls.clone(), "Cat")),
    );

    assert_eq!(calls.load(Ordering::SeqCst), 2);
    assert_eq!(a.expect("ok"), "cat");
    assert_eq!(b.expect("ok"), "Cat");
}

#[tokio::test]
async fn pending_request_is_visible() {
    let cache = Arc::new(RequestCache::<u32>::new());
    let (release, wait) = tokio::sync::oneshot::channel::<()>();

    let task = {
        let cache = cache.clone();
        tokio::spawn(async move {
            cache
                .get_or_create("slow", move || async move {
                    let _ = wait.await;
                    7
                })
                .await
        })
    };

    while !cache.contains("slow") {
        tokio::task::yield_now().await;
    }
    assert_eq!(cache.in_flight(), 1);

    release.send(()).expect("receiver alive");
    assert_eq!(task.await.expect("join"), 7);
    assert_eq!(cache.in_flight(), 0);
}
