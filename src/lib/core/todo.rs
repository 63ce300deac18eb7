use serde::{Deserialize, Serialize};

use crate::core::TodoError;

/// The to-do item. `id` stays `None` until a repository has persisted it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Todo {
    pub id: Option<String>,
    pub task: String,
    pub is_complete: bool,
}

impl Todo {
    /// Builds an unsaved, incomplete todo.
    pub fn new(task: impl Into<String>) -> Result<Self, TodoError> {
        Self::from_parts(Some(task.into()), None, false)
    }

    pub fn from_parts(
        task: Option<String>,
        id: Option<String>,
        is_complete: bool,
    ) -> Result<Self, TodoError> {
        let task = match task {
            Some(task) if !task.is_empty() => task,
            _ => return Err(TodoError::InvalidInput("Task cannot be empty.".into())),
        };
        Ok(Self {
            id,
            task,
            is_complete,
        })
    }
}
