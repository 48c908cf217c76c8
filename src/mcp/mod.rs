//! MCP server exposing the shared task tree to AI agents.

mod types;

use std::str::FromStr;

pub use types::*;

use rmcp::{
    handler::server::{tool::ToolRouter, wrapper::Parameters},
    model::{CallToolResult, Content, ServerInfo},
    tool, tool_handler, tool_router, ErrorData as McpError, ServerHandler, ServiceExt,
};

use crate::error::StoreError;
use crate::models::StatusFilter;
use crate::service::TaskService;
use crate::storage::Store;

#[derive(Clone)]
pub struct McpServer {
    service: TaskService,
    tool_router: ToolRouter<Self>,
}

impl McpServer {
    pub fn new(store: Store) -> Self {
        Self {
            service: TaskService::new(store),
            tool_router: Self::tool_router(),
        }
    }

    fn store_err(e: StoreError) -> McpError {
        match e {
            StoreError::NotFound(_) | StoreError::Validation(_) => {
                McpError::invalid_params(e.to_string(), None)
            }
            StoreError::Parse { .. } | StoreError::Io { .. } => {
                McpError::internal_error(e.to_string(), None)
            }
        }
    }

    fn parse_status(status: Option<&str>) -> Result<StatusFilter, McpError> {
        match status {
            None => Ok(StatusFilter::All),
            Some(s) => {
                StatusFilter::from_str(s).map_err(|msg| McpError::invalid_params(msg, None))
            }
        }
    }

    async fn run_list_projects(&self) -> Result<String, McpError> {
        self.service.list_projects().await.map_err(Self::store_err)
    }

    async fn run_list_tasks(&self, req: ListTasksRequest) -> Result<String, McpError> {
        let status = Self::parse_status(req.status.as_deref())?;
        self.service
            .list_tasks(&req.project, status)
            .await
            .map_err(Self::store_err)
    }

    async fn run_set_task_checked(&self, req: SetTaskCheckedRequest) -> Result<String, McpError> {
        self.service
            .set_task_checked(&req.project, &req.task_id, req.checked)
            .await
            .map_err(Self::store_err)
    }

    async fn run_get_task_detail(&self, req: GetTaskDetailRequest) -> Result<String, McpError> {
        self.service
            .get_task_detail(&req.project, &req.task_id)
            .await
            .map_err(Self::store_err)
    }

    async fn run_append_raw_task(&self, req: AppendRawTaskRequest) -> Result<String, McpError> {
        self.service
            .append_raw_task(&req.project, &req.text)
            .await
            .map_err(Self::store_err)
    }

    // ============================================================
    // Test helpers - expose tool logic for testing
    // ============================================================

    pub async fn test_list_projects(&self) -> Result<String, McpError> {
        self.run_list_projects().await
    }

    pub async fn test_list_tasks(
        &self,
        project: &str,
        status: Option<&str>,
    ) -> Result<String, McpError> {
        self.run_list_tasks(ListTasksRequest {
            project: project.to_string(),
            status: status.map(str::to_string),
        })
        .await
    }

    pub async fn test_set_task_checked(
        &self,
        project: &str,
        task_id: &str,
        checked: bool,
    ) -> Result<String, McpError> {
        self.run_set_task_checked(SetTaskCheckedRequest {
            project: project.to_string(),
            task_id: task_id.to_string(),
            checked,
        })
        .await
    }

    pub async fn test_get_task_detail(
        &self,
        project: &str,
        task_id: &str,
    ) -> Result<String, McpError> {
        self.run_get_task_detail(GetTaskDetailRequest {
            project: project.to_string(),
            task_id: task_id.to_string(),
        })
        .await
    }

    pub async fn test_append_raw_task(
        &self,
        project: &str,
        text: &str,
    ) -> Result<String, McpError> {
        self.run_append_raw_task(AppendRawTaskRequest {
            project: project.to_string(),
            text: text.to_string(),
        })
        .await
    }
}

#[tool_router]
impl McpServer {
    // ============================================================
    // Discovery Tools
    // ============================================================

    #[tool(
        description = "List all projects that have a shared checklist, most recently accessed first. Call this FIRST to learn the exact project names the other tools expect."
    )]
    async fn list_projects(&self) -> Result<CallToolResult, McpError> {
        let text = self.run_list_projects().await?;
        Ok(CallToolResult::success(vec![Content::text(text)]))
    }

    #[tool(
        description = "Show a project's task tree with checkboxes and task ids. Optionally filter by status ('all', 'checked', 'unchecked'); parents of matching tasks are kept so each match stays in context. Use the ids from this output with the other task tools."
    )]
    async fn list_tasks(
        &self,
        params: Parameters<ListTasksRequest>,
    ) -> Result<CallToolResult, McpError> {
        let text = self.run_list_tasks(params.0).await?;
        Ok(CallToolResult::success(vec![Content::text(text)]))
    }

    #[tool(
        description = "Get full details of one task: status, metadata (priority, deadline, tags, dependencies, notes, ...) and its immediate subtasks."
    )]
    async fn get_task_detail(
        &self,
        params: Parameters<GetTaskDetailRequest>,
    ) -> Result<CallToolResult, McpError> {
        let text = self.run_get_task_detail(params.0).await?;
        Ok(CallToolResult::success(vec![Content::text(text)]))
    }

    // ============================================================
    // Update Tools
    // ============================================================

    #[tool(
        description = "Check or uncheck a task. Call this when you finish a task (checked=true) or need to reopen it (checked=false). Side effect: rewrites the project's task document; the companion app sees the change immediately."
    )]
    async fn set_task_checked(
        &self,
        params: Parameters<SetTaskCheckedRequest>,
    ) -> Result<CallToolResult, McpError> {
        let text = self.run_set_task_checked(params.0).await?;
        Ok(CallToolResult::success(vec![Content::text(text)]))
    }

    #[tool(
        description = "Add a new task as free-form text. The text is appended to the project's raw task log and turned into a structured task the next time the companion app formats the project. It will not appear in list_tasks until then."
    )]
    async fn append_raw_task(
        &self,
        params: Parameters<AppendRawTaskRequest>,
    ) -> Result<CallToolResult, McpError> {
        let text = self.run_append_raw_task(params.0).await?;
        Ok(CallToolResult::success(vec![Content::text(text)]))
    }
}

#[tool_handler]
impl ServerHandler for McpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            server_info: rmcp::model::Implementation {
                name: "tasktree".into(),
                version: env!("CARGO_PKG_VERSION").into(),
                title: None,
                icons: None,
                website_url: None,
            },
            capabilities: rmcp::model::ServerCapabilities::builder()
                .enable_tools()
                .build(),
            instructions: Some(
                r#"tasktree gives you read/write access to the checklist a user keeps in their companion app.

WORKFLOW:
1. Call list_projects to find the project name (names are exact and case-sensitive)
2. Call list_tasks to see the task tree; use status='unchecked' to see what is left
3. Call get_task_detail for priority, deadline, dependencies and notes before starting a task
4. Call set_task_checked with checked=true when a task is done
5. Call append_raw_task to add follow-up work you discover

NOTES:
- Task ids come from list_tasks output; never invent them
- Changes are whole-document writes; if the user edits the same project at the same moment, the last write wins
- Raw tasks are structured later by the companion app, so they do not show up in list_tasks right away"#
                    .into(),
            ),
            ..Default::default()
        }
    }
}

pub async fn run_stdio_server(store: Store) -> anyhow::Result<()> {
    use tokio::io::{stdin, stdout};

    tracing::info!("Starting MCP server via stdio (root: {})", store.root().display());

    let service = McpServer::new(store);
    let server = service.serve((stdin(), stdout())).await?;

    let quit_reason = server.waiting().await?;
    tracing::info!("MCP server stopped: {:?}", quit_reason);

    Ok(())
}
