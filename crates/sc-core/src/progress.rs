//! Named tasks with counts, advance/hide (§4.3). Safe for concurrent
//! `advance_task` calls from the `tokio` tasks a vendor adapter fans region
//! lookups out to (§5).

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::RwLock;

pub type TaskId = u64;

struct Task {
    name: String,
    total: u64,
    completed: AtomicU64,
    hidden: AtomicBool,
}

#[derive(Debug, Clone)]
pub struct TaskSnapshot {
    pub id: TaskId,
    pub name: String,
    pub total: u64,
    pub completed: u64,
    pub hidden: bool,
}

/// Hookable to a TUI (§9, "Progress callbacks"): the CLI wires it to a
/// renderer, tests wire it to nothing and just poll [`ProgressTracker::tasks`].
#[derive(Clone, Default)]
pub struct ProgressTracker {
    tasks: Arc<RwLock<HashMap<TaskId, Task>>>,
    next_id: Arc<AtomicU64>,
}

impl ProgressTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn start_task(&self, name: impl Into<String>, total: u64) -> TaskId {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let task = Task {
            name: name.into(),
            total,
            completed: AtomicU64::new(0),
            hidden: AtomicBool::new(false),
        };
        self.tasks.write().await.insert(id, task);
        id
    }

    /// Advances `id` by `by`. A lock held only for the lookup; the counter
    /// itself is atomic, so concurrent advances from parallel region-fetch
    /// tasks never race each other.
    pub async fn advance_task(&self, id: TaskId, by: u64) {
        if let Some(task) = self.tasks.read().await.get(&id) {
            task.completed.fetch_add(by, Ordering::SeqCst);
        }
    }

    pub async fn hide_task(&self, id: TaskId) {
        if let Some(task) = self.tasks.read().await.get(&id) {
            task.hidden.store(true, Ordering::SeqCst);
        }
    }

    pub async fn tasks(&self) -> Vec<TaskSnapshot> {
        self.tasks
            .read()
            .await
            .iter()
            .map(|(id, task)| TaskSnapshot {
                id: *id,
                name: task.name.clone(),
                total: task.total,
                completed: task.completed.load(Ordering::SeqCst),
                hidden: task.hidden.load(Ordering::SeqCst),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc as StdArc;

    #[tokio::test]
    async fn advance_and_hide_are_reflected_in_snapshot() {
        let tracker = ProgressTracker::new();
        let id = tracker.start_task("regions", 3).await;
        tracker.advance_task(id, 1).await;
        tracker.advance_task(id, 2).await;
        tracker.hide_task(id).await;

        let snapshot = tracker.tasks().await;
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot[0].completed, 3);
        assert!(snapshot[0].hidden);
    }

    #[tokio::test]
    async fn concurrent_advances_from_multiple_tasks_all_land() {
        let tracker = ProgressTracker::new();
        let id = tracker.start_task("regions", 100).await;
        let tracker = StdArc::new(tracker);

        let mut handles = Vec::new();
        for _ in 0..10 {
            let tracker = tracker.clone();
            handles.push(tokio::spawn(async move {
                for _ in 0..10 {
                    tracker.advance_task(id, 1).await;
                }
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        let snapshot = tracker.tasks().await;
        assert_eq!(snapshot[0].completed, 100);
    }
}
