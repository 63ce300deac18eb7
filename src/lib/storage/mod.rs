pub mod error;
pub mod memory;
pub mod supabase;

pub use error::*;

use async_trait::async_trait;
use crate::core::{Todo, TodoError};

/// Persistence boundary for todos. Use cases only ever see this trait.
#[async_trait]
pub trait TodoRepository: Send + Sync {
    async fn get_all(&self) -> Result<Vec<Todo>, TodoError>;
    /// Persists `todo` and returns it with `id` filled in.
    async fn add(&self, todo: Todo) -> Result<Todo, TodoError>;
    /// Fails with [`TodoError::NotFound`] when no row has `id`.
    async fn update_status(&self, id: &str, is_complete: bool) -> Result<Todo, TodoError>;
    /// `Ok(false)` when there was nothing to delete.
    async fn delete(&self, id: &str) -> Result<bool, TodoError>;
}
