//! Request types for MCP tools.
//!
//! Arguments arrive loosely typed from the transport; serde rejects shape
//! mismatches and the server validates string contents before any storage
//! access.

use rmcp::schemars::JsonSchema;
use serde::Deserialize;

#[derive(Debug, Deserialize, JsonSchema)]
pub struct ListTasksRequest {
    #[schemars(description = "Exact, case-sensitive project name as shown by list_projects")]
    pub project: String,
    #[schemars(
        description = "Which tasks to show: 'all' (default), 'checked', or 'unchecked'. Parents of matching tasks are always kept for context."
    )]
    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct SetTaskCheckedRequest {
    #[schemars(description = "Exact, case-sensitive project name")]
    pub project: String,
    #[schemars(description = "The id of the task, as shown in list_tasks output")]
    pub task_id: String,
    #[schemars(description = "true to check the task off, false to uncheck it")]
    pub checked: bool,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct GetTaskDetailRequest {
    #[schemars(description = "Exact, case-sensitive project name")]
    pub project: String,
    #[schemars(description = "The id of the task, as shown in list_tasks output")]
    pub task_id: String,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct AppendRawTaskRequest {
    #[schemars(description = "Exact, case-sensitive project name")]
    pub project: String,
    #[schemars(
        description = "Free-form task text. It is queued in the project's raw log and structured later by the companion app."
    )]
    pub text: String,
}
