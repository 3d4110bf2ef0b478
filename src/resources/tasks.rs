//! Asynchronous tasks
//!
//! Create, delete and action calls answer with task ids. A finished task lists
//! the ids of what it created under a key that depends on the resource family.

use crate::client::{CloudClient, ResourceScope, ServiceClient};
use crate::error::{Error, Result};
use crate::types::{JsonObject, JsonValue};
use serde::{Deserialize, Serialize};

pub const VERSION: &str = "v1";
pub const RESOURCE: &str = "tasks";

/// Lifecycle of a task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TaskState {
    New,
    Running,
    Finished,
    Error,
}

/// A long-running operation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub state: TaskState,
    #[serde(default)]
    pub task_type: Option<String>,
    /// Ids of created resources per resource family
    #[serde(default)]
    pub created_resources: Option<JsonObject>,
    #[serde(default)]
    pub error: Option<String>,
}

impl Task {
    pub fn is_finished(&self) -> bool {
        self.state == TaskState::Finished
    }

    pub fn is_failed(&self) -> bool {
        self.state == TaskState::Error
    }
}

/// Response of every task-producing call
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskResults {
    #[serde(default)]
    pub tasks: Vec<String>,
}

impl TaskResults {
    /// First task id, if any
    pub fn first(&self) -> Option<&str> {
        self.tasks.first().map(String::as_str)
    }
}

pub fn service(cloud: &CloudClient) -> Result<ServiceClient> {
    cloud.service(VERSION, RESOURCE, ResourceScope::Global)
}

/// Fetch a task
pub async fn get(client: &ServiceClient, task_id: &str) -> Result<Task> {
    let url = client.service_url(&[task_id])?;
    client.get_json(&url).await
}

/// First id the task created under `key`.
///
/// `resource` names the family in errors, e.g. `GPU cluster`. Fails when the
/// task reports nothing under `key` or an empty list.
pub fn extract_created_id(task: &Task, key: &str, resource: &str) -> Result<String> {
    let ids = match task.created_resources.as_ref().and_then(|created| created.get(key)) {
        None | Some(JsonValue::Null) => Vec::new(),
        Some(value) => Vec::<String>::deserialize(value)
            .map_err(|e| Error::task_resource(resource, format!("'{key}': {e}")))?,
    };

    ids.into_iter()
        .next()
        .ok_or_else(|| Error::task_resource(resource, "empty list"))
}
