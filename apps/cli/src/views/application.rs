use std::fmt::Write as _;

use tracing::{info, warn};
use unicompass_core::seeding::seed_plan;
use unicompass_core::{application_unlocked, Todo, TodoInput, TodoStatus, University};

use crate::client::ApiClient;
use crate::error::ClientError;
use crate::views::university_heading;

/// Refusal when nothing is locked; the caller should send the student back to
/// the universities view.
pub const LOCK_FIRST: &str =
    "Lock at least one university to unlock application guidance. \
     Run `unicompass universities list` to pick one.";

#[derive(Debug, Clone, PartialEq)]
pub struct ApplicationView {
    pub locked: Vec<University>,
    pub todos: Vec<Todo>,
    /// Default to-dos created during this load.
    pub seeded: usize,
}

/// Creates the planned to-dos one after another. Stops at the first failure
/// and keeps whatever was already created.
pub async fn create_sequentially(client: &ApiClient, plan: &[TodoInput]) -> usize {
    let mut created = 0;
    for input in plan {
        match client.create_todo(input).await {
            Ok(_) => created += 1,
            Err(e) => {
                warn!(
                    "Stopped seeding default to-dos after {created} of {}: {e}",
                    plan.len()
                );
                break;
            }
        }
    }
    created
}

/// Loads the application view. The gate and the seeding check are
/// re-evaluated on every load.
pub async fn load(client: &ApiClient) -> Result<ApplicationView, ClientError> {
    let locked = client.list_locked().await?;
    if !application_unlocked(locked.len()) {
        return Err(ClientError::Precondition(LOCK_FIRST.to_string()));
    }

    let mut todos = client.list_todos().await?;
    let mut seeded = 0;
    if let Some(plan) = seed_plan(todos.len(), &locked) {
        seeded = create_sequentially(client, &plan).await;
        info!("Seeded {seeded} default to-dos");
        todos = client.list_todos().await?;
    }

    Ok(ApplicationView {
        locked,
        todos,
        seeded,
    })
}

fn status_mark(status: TodoStatus) -> &'static str {
    match status {
        TodoStatus::Pending => "[ ]",
        TodoStatus::InProgress => "[~]",
        TodoStatus::Completed => "[x]",
    }
}

pub fn render(view: &ApplicationView) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "Locked universities:");
    for university in &view.locked {
        let _ = writeln!(out, "  - {}", university_heading(university));
        let exams = university.required_exams();
        if !exams.is_empty() {
            let _ = writeln!(out, "    requires: {}", exams.join(", "));
        }
    }
    let _ = writeln!(out);

    if view.seeded > 0 {
        let _ = writeln!(out, "Added {} default application tasks.", view.seeded);
    }

    let done = view.todos.iter().filter(|t| t.is_completed()).count();
    let _ = writeln!(out, "To-dos ({done}/{} done):", view.todos.len());
    for todo in &view.todos {
        let _ = writeln!(
            out,
            "  {} #{} {} ({})",
            status_mark(todo.status),
            todo.id,
            todo.title,
            todo.priority
        );
        if let Some(due) = todo.due_date {
            let _ = writeln!(out, "        due {}", due.format("%Y-%m-%d"));
        }
    }
    out
}

pub fn render_todos(todos: &[Todo]) -> String {
    if todos.is_empty() {
        return "No to-dos yet.\n".to_string();
    }
    todos
        .iter()
        .map(|t| {
            format!(
                "{} #{} {} ({}, {})\n",
                status_mark(t.status),
                t.id,
                t.title,
                t.priority,
                t.status
            )
        })
        .collect()
}
