//! Shared pending-request cache.

use futures::FutureExt;
use futures::future::{BoxFuture, Shared};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

type Pending<V> = Shared<BoxFuture<'static, V>>;

struct Entry<V> {
    generation: u64,
    pending: Pending<V>,
}

/// Collapse surrounding and repeated internal whitespace.
///
/// Case is preserved; prompts differing only in case are different requests.
///
/// # Examples
///
/// ```
/// use storyboard_cache::normalize_key;
///
/// assert_eq!(normalize_key("  a cat's   day\n"), "a cat's day");
/// assert_ne!(normalize_key("A cat"), normalize_key("a cat"));
/// ```
pub fn normalize_key(key: &str) -> String {
    key.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Coalesces concurrent requests for the same key.
///
/// Values are cloned out to every waiter, so a failure is shared too: use a
/// `Result` with a `Clone` error as `V`.
///
/// # Example
///
/// ```
/// use storyboard_cache::RequestCache;
///
/// # futures::executor::block_on(async {
/// let cache: RequestCache<u32> = RequestCache::new();
/// let value = cache.get_or_create("answer", || async { 42 }).await;
/// assert_eq!(value, 42);
/// assert_eq!(cache.in_flight(), 0);
/// # });
/// ```
pub struct RequestCache<V> {
    entries: Arc<Mutex<HashMap<String, Entry<V>>>>,
    next_generation: AtomicU64,
}

impl<V> RequestCache<V>
where
    V: Clone + Send + Sync + 'static,
{
    /// Create an empty cache.
    pub fn new() -> Self {
        Self {
            entries: Arc::new(Mutex::new(HashMap::new())),
            next_generation: AtomicU64::new(0),
        }
    }

    /// Join the pending request for `key`, or start one with `producer`.
    ///
    /// `producer` runs at most once per pending request. The entry is removed
    /// as soon as the request settles, so a later call after settlement
    /// starts a fresh request.
    #[tracing::instrument(skip(self, producer), fields(in_flight = self.in_flight()))]
    pub async fn get_or_create<F, Fut>(&self, key: &str, producer: F) -> V
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = V> + Send + 'static,
    {
        let key = normalize_key(key);
        let pending = {
            let mut entries = self.entries.lock();
            match entries.get(&key) {
                Some(entry) => {
                    tracing::debug!(key = %key, "Joining in-flight request");
                    entry.pending.clone()
                }
                None => {
                    tracing::debug!(key = %key, "Starting new request");
                    let generation = self.next_generation.fetch_add(1, Ordering::Relaxed);
                    let pending = self.settling(key.clone(), generation, producer());
                    entries.insert(
                        key,
                        Entry {
                            generation,
                            pending: pending.clone(),
                        },
                    );
                    pending
                }
            }
        };
        pending.await
    }

    /// Wrap `request` so it evicts its own entry when it completes.
    fn settling<Fut>(&self, key: String, generation: u64, request: Fut) -> Pending<V>
    where
        Fut: Future<Output = V> + Send + 'static,
    {
        let entries = Arc::clone(&self.entries);
        async move {
            let value = request.await;
            let mut entries = entries.lock();
            if entries
                .get(&key)
                .is_some_and(|entry| entry.generation == generation)
            {
                entries.remove(&key);
                tracing::debug!(key = %key, remaining = entries.len(), "Request settled");
            }
            value
        }
        .boxed()
        .shared()
    }

    /// Number of requests currently pending.
    pub fn in_flight(&self) -> usize {
        self.entries.lock().len()
    }

    /// Whether a request for `key` is pending.
    pub fn contains(&self, key: &str) -> bool {
        self.entries.lock().contains_key(&normalize_key(key))
    }
}

impl<V> Default for RequestCache<V>
where
    V: Clone + Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<V> std::fmt::Debug for RequestCache<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestCache")
            .field("in_flight", &self.entries.lock().len())
            .finish()
    }
}
