//! External data store layer.
//!
//! Storage is owned entirely by a managed Postgres reached over PostgREST.
//! This module holds the row types, the [`TaskStore`] trait the rest of the
//! crate depends on, and the Supabase implementation. The service-role
//! credential lives only inside [`SupabaseStore`]; handlers and views get an
//! `Arc<dyn TaskStore>` injected at startup and operate on already-authorized
//! data.

mod supabase;
mod types;

pub use supabase::SupabaseStore;
pub use types::{Application, NewTask, Task, TaskStatus, TaskType};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Query surface against the external store.
#[async_trait]
pub trait TaskStore: Send + Sync {
    /// Look up an application by id. `Ok(None)` when no row matches.
    async fn application(&self, id: &str) -> anyhow::Result<Option<Application>>;

    /// Insert a task and return the stored row.
    async fn insert_task(&self, task: &NewTask) -> anyhow::Result<Task>;

    /// Tasks with `due_at` inside `[start, end]`, ascending by `due_at`.
    async fn tasks_due_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> anyhow::Result<Vec<Task>>;

    /// Set the status of a single task by id.
    async fn set_task_status(&self, id: &str, status: TaskStatus) -> anyhow::Result<()>;
}
