use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::core::{Todo, TodoError};

use super::TodoRepository;

/// Process-local repository. Ids are sequential integers starting at 1.
#[derive(Default)]
pub struct InMemoryTodoRepository {
    inner: Mutex<Inner>,
}

#[derive(Default)]
struct Inner {
    todos: Vec<Todo>,
    last_id: u64,
}

impl InMemoryTodoRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TodoRepository for InMemoryTodoRepository {
    async fn get_all(&self) -> Result<Vec<Todo>, TodoError> {
        Ok(self.inner.lock().await.todos.clone())
    }

    async fn add(&self, mut todo: Todo) -> Result<Todo, TodoError> {
        let mut inner = self.inner.lock().await;
        inner.last_id += 1;
        todo.id = Some(inner.last_id.to_string());
        inner.todos.push(todo.clone());
        Ok(todo)
    }

    async fn update_status(&self, id: &str, is_complete: bool) -> Result<Todo, TodoError> {
        let mut inner = self.inner.lock().await;
        let todo = inner
            .todos
            .iter_mut()
            .find(|todo| todo.id.as_deref() == Some(id))
            .ok_or_else(|| TodoError::NotFound(id.to_string()))?;
        todo.is_complete = is_complete;
        Ok(todo.clone())
    }

    async fn delete(&self, id: &str) -> Result<bool, TodoError> {
        let mut inner = self.inner.lock().await;
        let before = inner.todos.len();
        inner.todos.retain(|todo| todo.id.as_deref() != Some(id));
        Ok(inner.todos.len() < before)
    }
}
