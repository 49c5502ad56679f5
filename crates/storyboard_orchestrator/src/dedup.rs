//! Narrative service decorator that coalesces identical concurrent requests.

use async_trait::async_trait;
use std::sync::Arc;
use storyboard_cache::RequestCache;
use storyboard_error::StoryboardResult;
use storyboard_interface::{NarrativeOutline, NarrativeService};

/// Wraps a narrative service so concurrent calls with the same prompt and
/// scene count share one upstream request and its outcome.
pub struct DeduplicatingNarrative {
    inner: Arc<dyn NarrativeService>,
    pending: RequestCache<StoryboardResult<NarrativeOutline>>,
}

impl DeduplicatingNarrative {
    /// Wrap `inner`.
    pub fn new(inner: Arc<dyn NarrativeService>) -> Self {
        Self {
            inner,
            pending: RequestCache::new(),
        }
    }

    /// Requests currently awaiting the upstream service.
    pub fn in_flight(&self) -> usize {
        self.pending.in_flight()
    }
}

#[async_trait]
impl NarrativeService for DeduplicatingNarrative {
    async fn generate_narrative(
        &self,
        prompt: &str,
        scene_count: usize,
    ) -> StoryboardResult<NarrativeOutline> {
        let inner = Arc::clone(&self.inner);
        let owned_prompt = prompt.to_string();
        let key = format!("{}\u{1f}{}", scene_count, prompt);
        self.pending
            .get_or_create(&key, move || async move {
                inner.generate_narrative(&owned_prompt, scene_count).await
            })
            .await
    }
}

impl std::fmt::Debug for DeduplicatingNarrative {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeduplicatingNarrative")
            .field("pending", &self.pending)
            .finish_non_exhaustive()
    }
}
