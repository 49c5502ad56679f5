//! Exclusive in-flight task bookkeeping.

use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::sync::Arc;
use storyboard_core::{SequenceId, TaskKey};
use storyboard_error::{InFlightError, StoryboardResult};
use tracing::debug;

#[derive(Debug, Default)]
struct TrackerState {
    /// Active keys with the generation of the guard that owns them
    active: BTreeMap<TaskKey, u64>,
    creating: bool,
    next_generation: u64,
}

/// Set of in-flight generation tasks.
///
/// Cloning shares the same underlying set.
///
/// # Example
///
/// ```
/// use storyboard_core::{SequenceId, TaskKey, TaskKind};
/// use storyboard_orchestrator::TaskTracker;
///
/// let tracker = TaskTracker::new();
/// let key = TaskKey::new(SequenceId::new(), 0, TaskKind::Animate);
///
/// let guard = tracker.begin(key).unwrap();
/// assert!(tracker.begin(key).is_err());
/// drop(guard);
/// assert!(tracker.begin(key).is_ok());
/// ```
#[derive(Debug, Clone, Default)]
pub struct TaskTracker {
    state: Arc<Mutex<TrackerState>>,
}

impl TaskTracker {
    /// Create an empty tracker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark `key` active.
    ///
    /// The returned guard releases the key when dropped, whether the task
    /// succeeded, failed, or its future was cancelled.
    ///
    /// # Errors
    ///
    /// Returns an already-in-flight error if `key` is active.
    #[track_caller]
    pub fn begin(&self, key: TaskKey) -> StoryboardResult<TaskGuard> {
        let mut state = self.state.lock();
        if state.active.contains_key(&key) {
            debug!(task = %key, "Task already in flight");
            return Err(InFlightError::new(key.to_string()).into());
        }
        let generation = state.next_generation;
        state.next_generation += 1;
        state.active.insert(key, generation);
        debug!(task = %key, active = state.active.len(), "Task started");

        Ok(TaskGuard {
            tracker: self.clone(),
            key,
            generation,
        })
    }

    /// Mark `key` inactive. Idempotent.
    pub fn end(&self, key: &TaskKey) {
        if self.state.lock().active.remove(key).is_some() {
            debug!(task = %key, "Task ended");
        }
    }

    fn release(&self, key: &TaskKey, generation: u64) {
        let mut state = self.state.lock();
        if state.active.get(key) == Some(&generation) {
            state.active.remove(key);
            debug!(task = %key, active = state.active.len(), "Task released");
        }
    }

    /// Whether `key` is in flight.
    pub fn is_active(&self, key: &TaskKey) -> bool {
        self.state.lock().active.contains_key(key)
    }

    /// Whether any kind of task is in flight for one scene.
    pub fn is_scene_busy(&self, sequence_id: SequenceId, scene_index: usize) -> bool {
        self.state
            .lock()
            .active
            .keys()
            .any(|k| k.sequence_id() == sequence_id && k.scene_index() == scene_index)
    }

    /// All in-flight keys, in key order.
    pub fn snapshot(&self) -> Vec<TaskKey> {
        self.state.lock().active.keys().copied().collect()
    }

    /// Mark sequence creation in flight.
    ///
    /// # Errors
    ///
    /// Returns an already-in-flight error if a creation is running.
    #[track_caller]
    pub fn begin_create(&self) -> StoryboardResult<CreateGuard> {
        let mut state = self.state.lock();
        if state.creating {
            return Err(InFlightError::new("sequence creation").into());
        }
        state.creating = true;
        debug!("Sequence creation started");
        Ok(CreateGuard {
            tracker: self.clone(),
        })
    }

    /// Whether a sequence creation is in flight.
    pub fn is_creating(&self) -> bool {
        self.state.lock().creating
    }
}

/// Releases a task key on drop.
#[derive(Debug)]
#[must_use = "the task key is released as soon as the guard is dropped"]
pub struct TaskGuard {
    tracker: TaskTracker,
    key: TaskKey,
    generation: u64,
}

impl TaskGuard {
    /// Key held by this guard.
    pub fn key(&self) -> TaskKey {
        self.key
    }
}

impl Drop for TaskGuard {
    fn drop(&mut self) {
        self.tracker.release(&self.key, self.generation);
    }
}

/// Clears the creation flag on drop.
#[derive(Debug)]
#[must_use = "creation is marked finished as soon as the guard is dropped"]
pub struct CreateGuard {
    tracker: TaskTracker,
}

impl Drop for CreateGuard {
    fn drop(&mut self) {
        self.tracker.state.lock().creating = false;
        debug!("Sequence creation finished");
    }
}
