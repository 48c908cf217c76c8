//! Task tree use-case service.
//!
//! # Responsibility
//! - Run each request through resolve, load, locate or filter, mutate and
//!   persist, returning human-readable text.
//! - Validate raw caller input before it reaches storage.
//!
//! # Invariants
//! - A request that fails never writes: an unknown task id is reported before
//!   anything is saved.
//! - The registry and task documents are read fresh for every request.

use crate::error::{Result, StoreError};
use crate::models::StatusFilter;
use crate::render;
use crate::storage::Store;
use crate::tree;

/// Operations exposed to the agent and the CLI.
#[derive(Debug, Clone)]
pub struct TaskService {
    store: Store,
}

impl TaskService {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    /// Registered projects, most recently accessed first.
    pub async fn list_projects(&self) -> Result<String> {
        let projects = self.store.list_projects().await?;
        if projects.is_empty() {
            return Ok("No projects found.".to_string());
        }
        Ok(format!(
            "Projects ({}):\n{}",
            projects.len(),
            render::render_projects(&projects)
        ))
    }

    pub async fn list_tasks(&self, project: &str, status: StatusFilter) -> Result<String> {
        let project = self.store.project(project).await?;
        let notes = project.load_notes().await?;
        let (checked, total) = notes.progress();

        let filtered = tree::filter_by_status(&notes.tasks, status);
        tracing::debug!(
            "Filtered {} by {}: {} root tasks remain",
            project.name(),
            status,
            filtered.len()
        );

        let header = format!(
            "Tasks for {} ({}): {}/{} complete",
            project.name(),
            status,
            checked,
            total
        );
        if filtered.is_empty() {
            return Ok(format!("{}\nNo tasks match filter '{}'.", header, status));
        }
        Ok(format!("{}\n{}", header, render::render_tree(&filtered)))
    }

    pub async fn set_task_checked(
        &self,
        project: &str,
        task_id: &str,
        checked: bool,
    ) -> Result<String> {
        require("task_id", task_id)?;
        let project = self.store.project(project).await?;
        let mut notes = project.load_notes().await?;

        let node = tree::find_mut(&mut notes.tasks, task_id)
            .ok_or_else(|| task_not_found(project.name(), task_id))?
            .into_node_mut();
        node.checked = checked;
        let text = node.text.clone();

        notes.last_modified = notes.last_modified.now_like();
        project.save_notes(&notes).await?;

        let state = if checked { "checked" } else { "unchecked" };
        tracing::info!("Marked task {} in {} as {}", task_id, project.name(), state);
        Ok(format!("Task \"{}\" marked as {}.", text, state))
    }

    pub async fn get_task_detail(&self, project: &str, task_id: &str) -> Result<String> {
        require("task_id", task_id)?;
        let project = self.store.project(project).await?;
        let notes = project.load_notes().await?;

        let located = tree::find(&notes.tasks, task_id)
            .ok_or_else(|| task_not_found(project.name(), task_id))?;
        Ok(render::render_task_detail(located.node()))
    }

    /// Queue free-form text for the companion's formatter.
    pub async fn append_raw_task(&self, project: &str, text: &str) -> Result<String> {
        require("text", text)?;
        let project = self.store.project(project).await?;
        project.append_raw(text).await?;
        Ok(format!(
            "Added raw task to {}. It will be structured the next time the project is formatted.",
            project.name()
        ))
    }
}

fn require(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(StoreError::Validation(format!("{} must not be blank", field)));
    }
    Ok(())
}

fn task_not_found(project: &str, task_id: &str) -> StoreError {
    StoreError::NotFound(format!("task '{}' in project '{}'", task_id, project))
}
