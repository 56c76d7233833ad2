//! Default application to-dos.
//!
//! The application view seeds five template tasks whenever the student has
//! locked a university and has no to-dos at all. The check runs on every load,
//! so clearing the list seeds it again.

use crate::models::{Priority, TodoInput, University};

struct Template {
    title: &'static str,
    description: &'static str,
    priority: Priority,
}

const TEMPLATES: [Template; 5] = [
    Template {
        title: "Write Statement of Purpose (SOP)",
        description: "Draft a compelling SOP highlighting your academic background, goals, \
                      and why you chose this program",
        priority: Priority::High,
    },
    Template {
        title: "Request Letters of Recommendation",
        description: "Contact professors or employers for recommendation letters",
        priority: Priority::High,
    },
    Template {
        title: "Prepare Transcripts",
        description: "Request official transcripts from your current institution",
        priority: Priority::High,
    },
    Template {
        title: "Complete Application Form",
        description: "Fill out the university application form with all required information",
        priority: Priority::Medium,
    },
    Template {
        title: "Submit Application Fee",
        description: "Pay the required application fee",
        priority: Priority::Medium,
    },
];

pub const DEFAULT_TODO_COUNT: usize = TEMPLATES.len();

pub fn should_seed(todo_count: usize, locked_count: usize) -> bool {
    todo_count == 0 && locked_count > 0
}

/// The template tasks for one university, in creation order.
pub fn default_todos(university_id: i64) -> Vec<TodoInput> {
    TEMPLATES
        .iter()
        .map(|t| TodoInput {
            university_id: Some(university_id),
            title: t.title.to_string(),
            description: Some(t.description.to_string()),
            priority: t.priority,
            due_date: None,
        })
        .collect()
}

/// What to create on this load, if anything. All tasks reference the first
/// locked university.
pub fn seed_plan(todo_count: usize, locked: &[University]) -> Option<Vec<TodoInput>> {
    if !should_seed(todo_count, locked.len()) {
        return None;
    }
    locked.first().map(|u| default_todos(u.id))
}
