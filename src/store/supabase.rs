//! Supabase client for the PostgREST API.

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use reqwest::Client;

use super::{Application, NewTask, Task, TaskStatus, TaskStore};

/// Supabase client for database operations.
///
/// Authenticates with the service-role key, which bypasses row-level
/// security. The key never leaves this type.
pub struct SupabaseStore {
    client: Client,
    url: String,
    service_role_key: String,
}

impl SupabaseStore {
    /// Create a new store client.
    pub fn new(url: &str, service_role_key: &str) -> Self {
        Self {
            client: Client::new(),
            url: url.trim_end_matches('/').to_string(),
            service_role_key: service_role_key.to_string(),
        }
    }

    /// Get the PostgREST URL.
    fn rest_url(&self) -> String {
        format!("{}/rest/v1", self.url)
    }
}

#[async_trait]
impl TaskStore for SupabaseStore {
    async fn application(&self, id: &str) -> anyhow::Result<Option<Application>> {
        let resp = self
            .client
            .get(format!(
                "{}/applications?id=eq.{}&select=id,tenant_id",
                self.rest_url(),
                id
            ))
            .header("apikey", &self.service_role_key)
            .header("Authorization", format!("Bearer {}", self.service_role_key))
            .send()
            .await?;

        let status = resp.status();
        let text = resp.text().await?;

        if !status.is_success() {
            anyhow::bail!("Failed to fetch application: {} - {}", status, text);
        }

        let rows: Vec<Application> = serde_json::from_str(&text)?;
        Ok(rows.into_iter().next())
    }

    async fn insert_task(&self, task: &NewTask) -> anyhow::Result<Task> {
        let resp = self
            .client
            .post(format!("{}/tasks", self.rest_url()))
            .header("apikey", &self.service_role_key)
            .header("Authorization", format!("Bearer {}", self.service_role_key))
            .header("Content-Type", "application/json")
            .header("Prefer", "return=representation")
            .json(task)
            .send()
            .await?;

        let status = resp.status();
        let text = resp.text().await?;

        if !status.is_success() {
            anyhow::bail!("Failed to create task: {} - {}", status, text);
        }

        let tasks: Vec<Task> = serde_json::from_str(&text)?;
        tasks
            .into_iter()
            .next()
            .ok_or_else(|| anyhow::anyhow!("No task returned"))
    }

    async fn tasks_due_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> anyhow::Result<Vec<Task>> {
        let resp = self
            .client
            .get(format!(
                "{}/tasks?due_at=gte.{}&due_at=lte.{}&order=due_at.asc",
                self.rest_url(),
                start.to_rfc3339_opts(SecondsFormat::Millis, true),
                end.to_rfc3339_opts(SecondsFormat::Millis, true)
            ))
            .header("apikey", &self.service_role_key)
            .header("Authorization", format!("Bearer {}", self.service_role_key))
            .send()
            .await?;

        let status = resp.status();
        let text = resp.text().await?;

        if !status.is_success() {
            anyhow::bail!("Failed to list tasks: {} - {}", status, text);
        }

        Ok(serde_json::from_str(&text)?)
    }

    async fn set_task_status(&self, id: &str, new_status: TaskStatus) -> anyhow::Result<()> {
        let resp = self
            .client
            .patch(format!("{}/tasks?id=eq.{}", self.rest_url(), id))
            .header("apikey", &self.service_role_key)
            .header("Authorization", format!("Bearer {}", self.service_role_key))
            .header("Content-Type", "application/json")
            .json(&serde_json::json!({ "status": new_status }))
            .send()
            .await?;

        if !resp.status().is_success() {
            let text = resp.text().await?;
            anyhow::bail!("Failed to update task: {}", text);
        }

        Ok(())
    }
}
