use reqwest::Client;
use serde_json::{Value, json};
use tracing::{debug, warn};

use crate::config::WebhookConfig;
use crate::db::models::project::Project;
use crate::db::models::task::Task;

/// Optional automation hooks. Deliveries run in the background and failures
/// are only logged.
#[derive(Clone)]
pub struct WebhookNotifier {
    http: Client,
    config: WebhookConfig,
}

pub fn project_created_payload(project: &Project) -> Value {
    json!({
        "event": "project_created",
        "project": {
            "id": project.id,
            "name": project.name,
            "description": project.description,
            "subject_area": project.subject_area,
            "owner_id": project.owner_id,
            "created_at": project.created_at,
        }
    })
}

pub fn task_created_payload(task: &Task) -> Value {
    json!({
        "event": "task_created",
        "task": {
            "id": task.id,
            "project_id": task.project_id,
            "title": task.title,
            "status": task.status,
            "due_date": task.due_date,
            "creator_id": task.creator_id,
            "created_at": task.created_at,
        }
    })
}

impl WebhookNotifier {
    pub fn new(http: Client, config: WebhookConfig) -> Self {
        Self { http, config }
    }

    pub fn project_created(&self, project: &Project) {
        if let Some(url) = self.config.project_created_url.clone() {
            self.fire(url, project_created_payload(project));
        }
    }

    pub fn task_created(&self, task: &Task) {
        if let Some(url) = self.config.task_created_url.clone() {
            self.fire(url, task_created_payload(task));
        }
    }

    fn fire(&self, url: String, payload: Value) {
        let http = self.http.clone();
        tokio::spawn(async move {
            match http.post(&url).json(&payload).send().await {
                Ok(resp) if resp.status().is_success() => {
                    debug!(url = %url, "Webhook delivered");
                }
                Ok(resp) => warn!(url = %url, status = %resp.status(), "Webhook rejected"),
                Err(e) => warn!(url = %url, "Webhook delivery failed: {}", e),
            }
        });
    }
}
