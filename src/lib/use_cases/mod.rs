//! One object per application operation. Each holds the repository it
//! delegates to and exposes a single `execute`.

use std::sync::Arc;

use crate::core::{Todo, TodoError};
use crate::storage::TodoRepository;

pub struct GetTodos<R: TodoRepository> {
    repository: Arc<R>,
}

impl<R: TodoRepository> GetTodos<R> {
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    pub async fn execute(&self) -> Result<Vec<Todo>, TodoError> {
        self.repository.get_all().await
    }
}

pub struct CreateTodo<R: TodoRepository> {
    repository: Arc<R>,
}

impl<R: TodoRepository> CreateTodo<R> {
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    /// Validates `task` before anything reaches the repository.
    pub async fn execute(&self, task: Option<String>) -> Result<Todo, TodoError> {
        let todo = Todo::from_parts(task, None, false)?;
        self.repository.add(todo).await
    }
}

pub struct UpdateTodo<R: TodoRepository> {
    repository: Arc<R>,
}

impl<R: TodoRepository> UpdateTodo<R> {
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    pub async fn execute(&self, id: &str, is_complete: bool) -> Result<Todo, TodoError> {
        self.repository.update_status(id, is_complete).await
    }
}

pub struct DeleteTodo<R: TodoRepository> {
    repository: Arc<R>,
}

impl<R: TodoRepository> DeleteTodo<R> {
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    pub async fn execute(&self, id: &str) -> Result<bool, TodoError> {
        self.repository.delete(id).await
    }
}

/// The four use cases bound to one shared repository.
pub struct TodoUseCases<R: TodoRepository> {
    pub get_todos: GetTodos<R>,
    pub create_todo: CreateTodo<R>,
    pub update_todo: UpdateTodo<R>,
    pub delete_todo: DeleteTodo<R>,
}

impl<R: TodoRepository> TodoUseCases<R> {
    pub fn new(repository: Arc<R>) -> Self {
        Self {
            get_todos: GetTodos::new(repository.clone()),
            create_todo: CreateTodo::new(repository.clone()),
            update_todo: UpdateTodo::new(repository.clone()),
            delete_todo: DeleteTodo::new(repository),
        }
    }
}
