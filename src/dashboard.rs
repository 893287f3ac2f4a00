//! Today dashboard view.
//!
//! A client-side state machine over the task store: fetch the tasks due
//! today, render them as a table, and mark tasks complete. Completion is a
//! two-phase update: the row flips locally before the store is asked
//! (speculative), then a reconciling re-read replaces local state with store
//! truth whether the write succeeded or not.

use std::sync::Arc;

use chrono::{DateTime, Duration, Local, LocalResult, NaiveDateTime, NaiveTime, TimeZone, Utc};

use crate::store::{Task, TaskStatus, TaskStore};

/// Fetch lifecycle of the view.
///
/// A failed fetch suppresses the table entirely; stale rows are never shown
/// next to an error.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchState {
    Loading,
    Failed(String),
    Loaded(Vec<Task>),
}

/// The "due today" window in the local timezone:
/// [00:00:00.000, 23:59:59.999], resolved to UTC for the store query.
pub fn today_range(now: DateTime<Local>) -> (DateTime<Utc>, DateTime<Utc>) {
    let start = now.date_naive().and_time(NaiveTime::MIN);
    let end = start + Duration::days(1) - Duration::milliseconds(1);
    (local_to_utc(start), local_to_utc(end))
}

fn local_to_utc(naive: NaiveDateTime) -> DateTime<Utc> {
    match Local.from_local_datetime(&naive) {
        LocalResult::Single(dt) | LocalResult::Ambiguous(dt, _) => dt.with_timezone(&Utc),
        // Wall time skipped by a DST jump; the following hour exists.
        LocalResult::None => match Local.from_local_datetime(&(naive + Duration::hours(1))) {
            LocalResult::Single(dt) | LocalResult::Ambiguous(dt, _) => dt.with_timezone(&Utc),
            LocalResult::None => Utc.from_utc_datetime(&naive),
        },
    }
}

/// Client-side view over today's tasks.
pub struct TodayView {
    store: Arc<dyn TaskStore>,
    state: FetchState,
    alert: Option<String>,
}

impl TodayView {
    pub fn new(store: Arc<dyn TaskStore>) -> Self {
        Self {
            store,
            state: FetchState::Loading,
            alert: None,
        }
    }

    pub fn state(&self) -> &FetchState {
        &self.state
    }

    /// Take the pending user-visible alert, if any.
    pub fn take_alert(&mut self) -> Option<String> {
        self.alert.take()
    }

    /// Reload today's tasks from the store.
    pub async fn refresh(&mut self) {
        self.state = FetchState::Loading;
        let (start, end) = today_range(Local::now());

        match self.store.tasks_due_between(start, end).await {
            Ok(tasks) => self.state = FetchState::Loaded(tasks),
            Err(e) => {
                tracing::error!("Failed to load today's tasks: {}", e);
                self.state = FetchState::Failed("Failed to load tasks".to_string());
            }
        }
    }

    /// Mark a task complete.
    ///
    /// The local row flips immediately, then the store is asked to confirm.
    /// Either way the view ends on a reconciling [`refresh`](Self::refresh):
    /// on success it picks up store truth, on failure it reverts the
    /// speculative flip and raises an alert. The failed write itself is not
    /// retried.
    pub async fn mark_complete(&mut self, id: &str) {
        self.apply_speculative(id);

        match self.store.set_task_status(id, TaskStatus::Completed).await {
            Ok(()) => self.refresh().await,
            Err(e) => {
                tracing::error!("Failed to complete task {}: {}", id, e);
                self.alert = Some("Failed to update task".to_string());
                self.refresh().await;
            }
        }
    }

    /// Phase one of [`mark_complete`](Self::mark_complete): the provisional
    /// local transition, applied before any confirmation from the store.
    fn apply_speculative(&mut self, id: &str) {
        if let FetchState::Loaded(tasks) = &mut self.state {
            for task in tasks.iter_mut().filter(|t| t.id == id) {
                task.status = TaskStatus::Completed;
            }
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Rendering
// ─────────────────────────────────────────────────────────────────────────────

/// Render the view as plain text for the terminal client.
pub fn render(view: &TodayView) -> String {
    match view.state() {
        FetchState::Loading => "Loading tasks...\n".to_string(),
        FetchState::Failed(msg) => format!("{}\n", msg),
        FetchState::Loaded(tasks) if tasks.is_empty() => {
            "Today's Tasks\n\nNo tasks due today\n".to_string()
        }
        FetchState::Loaded(tasks) => render_table(tasks),
    }
}

fn render_table(tasks: &[Task]) -> String {
    let mut out = String::from("Today's Tasks\n\n");
    out.push_str(&format!(
        "{:<28}  {:<8}  {:<12}  {:<5}  {}\n",
        "Title", "Type", "App", "Due", "Status"
    ));

    for task in tasks {
        out.push_str(&format!(
            "{:<28}  {:<8}  {:<12}  {:<5}  {}{}\n",
            task.title.as_deref().unwrap_or("(no title)"),
            task.task_type.to_string(),
            task.related_id,
            due_time_local(task),
            status_label(task.status),
            action_hint(task),
        ));
    }

    out
}

/// Local time-of-day of the due timestamp.
fn due_time_local(task: &Task) -> String {
    task.due_at.with_timezone(&Local).format("%H:%M").to_string()
}

/// Status label with its color code: green once completed, yellow while open.
fn status_label(status: TaskStatus) -> String {
    match status {
        TaskStatus::Completed => format!("\x1b[32m{}\x1b[0m", status),
        TaskStatus::Open => format!("\x1b[33m{}\x1b[0m", status),
    }
}

/// The completion affordance, shown only while a task is still open.
fn action_hint(task: &Task) -> String {
    match task.status {
        TaskStatus::Completed => String::new(),
        TaskStatus::Open => format!("  [complete {}]", task.id),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{Application, NewTask, TaskType};
    use async_trait::async_trait;
    use std::sync::Mutex;
    use tokio_test::block_on;

    /// Store double backed by a plain Vec, mirroring the store's filter and
    /// ordering semantics for the due-window query.
    struct FakeStore {
        tasks: Mutex<Vec<Task>>,
        update_fails: bool,
        list_fails: bool,
    }

    impl FakeStore {
        fn with_tasks(tasks: Vec<Task>) -> Self {
            Self {
                tasks: Mutex::new(tasks),
                update_fails: false,
                list_fails: false,
            }
        }
    }

    #[async_trait]
    impl TaskStore for FakeStore {
        async fn application(&self, _id: &str) -> anyhow::Result<Option<Application>> {
            Ok(None)
        }

        async fn insert_task(&self, _task: &NewTask) -> anyhow::Result<Task> {
            anyhow::bail!("not used by the dashboard")
        }

        async fn tasks_due_between(
            &self,
            start: DateTime<Utc>,
            end: DateTime<Utc>,
        ) -> anyhow::Result<Vec<Task>> {
            if self.list_fails {
                anyhow::bail!("upstream unavailable");
            }
            let tasks = self.tasks.lock().unwrap();
            let mut due: Vec<Task> = tasks
                .iter()
                .filter(|t| t.due_at >= start && t.due_at <= end)
                .cloned()
                .collect();
            due.sort_by_key(|t| t.due_at);
            Ok(due)
        }

        async fn set_task_status(&self, id: &str, status: TaskStatus) -> anyhow::Result<()> {
            if self.update_fails {
                anyhow::bail!("permission denied for table tasks");
            }
            let mut tasks = self.tasks.lock().unwrap();
            for task in tasks.iter_mut().filter(|t| t.id == id) {
                task.status = status;
            }
            Ok(())
        }
    }

    fn task(id: &str, due_at: DateTime<Utc>) -> Task {
        Task {
            id: id.to_string(),
            tenant_id: "T1".to_string(),
            related_id: "A1".to_string(),
            task_type: TaskType::Call,
            due_at,
            title: Some(format!("call {}", id)),
            status: TaskStatus::Open,
        }
    }

    fn loaded_tasks(view: &TodayView) -> &[Task] {
        match view.state() {
            FetchState::Loaded(tasks) => tasks,
            other => panic!("expected loaded state, got {:?}", other),
        }
    }

    #[test]
    fn test_today_range_endpoints() {
        let (start, end) = today_range(Local::now());

        let start_local = start.with_timezone(&Local);
        assert_eq!(start_local.time(), NaiveTime::MIN);
        assert_eq!(
            end - start,
            Duration::days(1) - Duration::milliseconds(1)
        );
    }

    #[test]
    fn test_refresh_fetches_only_today() {
        block_on(async {
            let (start, end) = today_range(Local::now());
            let store = FakeStore::with_tasks(vec![
                task("yesterday", start - Duration::seconds(1)),
                task("midnight", start),
                task("noon", start + Duration::hours(12)),
                task("last-ms", end),
                task("tomorrow", end + Duration::milliseconds(1)),
            ]);

            let mut view = TodayView::new(Arc::new(store));
            view.refresh().await;

            let ids: Vec<&str> = loaded_tasks(&view).iter().map(|t| t.id.as_str()).collect();
            assert_eq!(ids, vec!["midnight", "noon", "last-ms"]);
        });
    }

    #[test]
    fn test_refresh_failure_suppresses_table() {
        block_on(async {
            let mut store = FakeStore::with_tasks(vec![]);
            store.list_fails = true;

            let mut view = TodayView::new(Arc::new(store));
            view.refresh().await;

            assert_eq!(
                *view.state(),
                FetchState::Failed("Failed to load tasks".to_string())
            );
            let rendered = render(&view);
            assert!(rendered.contains("Failed to load tasks"));
            assert!(!rendered.contains("Title"));
        });
    }

    #[test]
    fn test_speculative_flip_is_immediate() {
        block_on(async {
            let (start, _) = today_range(Local::now());
            let store = FakeStore::with_tasks(vec![task("t1", start + Duration::hours(9))]);

            let mut view = TodayView::new(Arc::new(store));
            view.refresh().await;
            assert_eq!(loaded_tasks(&view)[0].status, TaskStatus::Open);

            // Before any store confirmation, the row already reads completed.
            view.apply_speculative("t1");
            assert_eq!(loaded_tasks(&view)[0].status, TaskStatus::Completed);
        });
    }

    #[test]
    fn test_mark_complete_confirms_against_store() {
        block_on(async {
            let (start, _) = today_range(Local::now());
            let store = FakeStore::with_tasks(vec![
                task("t1", start + Duration::hours(9)),
                task("t2", start + Duration::hours(10)),
            ]);

            let mut view = TodayView::new(Arc::new(store));
            view.refresh().await;
            view.mark_complete("t1").await;

            assert!(view.take_alert().is_none());
            let tasks = loaded_tasks(&view);
            assert_eq!(tasks[0].status, TaskStatus::Completed);
            assert_eq!(tasks[1].status, TaskStatus::Open);
        });
    }

    #[test]
    fn test_failed_completion_reverts_and_alerts() {
        block_on(async {
            let (start, _) = today_range(Local::now());
            let mut store = FakeStore::with_tasks(vec![task("t1", start + Duration::hours(9))]);
            store.update_fails = true;

            let mut view = TodayView::new(Arc::new(store));
            view.refresh().await;
            view.mark_complete("t1").await;

            // The reconciling re-read restored store truth.
            assert_eq!(loaded_tasks(&view)[0].status, TaskStatus::Open);
            assert_eq!(view.take_alert(), Some("Failed to update task".to_string()));
            assert!(view.take_alert().is_none());
        });
    }

    #[test]
    fn test_render_title_placeholder_and_action_hint() {
        block_on(async {
            let (start, _) = today_range(Local::now());
            let mut untitled = task("t1", start + Duration::hours(9));
            untitled.title = None;
            let mut done = task("t2", start + Duration::hours(10));
            done.status = TaskStatus::Completed;

            let store = FakeStore::with_tasks(vec![untitled, done]);
            let mut view = TodayView::new(Arc::new(store));
            view.refresh().await;

            let rendered = render(&view);
            assert!(rendered.contains("(no title)"));
            assert!(rendered.contains("[complete t1]"));
            assert!(!rendered.contains("[complete t2]"));
        });
    }

    #[test]
    fn test_render_loading_and_empty() {
        let store = FakeStore::with_tasks(vec![]);
        let view = TodayView::new(Arc::new(store));
        assert_eq!(render(&view), "Loading tasks...\n");

        block_on(async {
            let store = FakeStore::with_tasks(vec![]);
            let mut view = TodayView::new(Arc::new(store));
            view.refresh().await;
            assert!(render(&view).contains("No tasks due today"));
        });
    }
}
