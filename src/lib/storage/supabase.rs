use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Url};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use tracing::{debug, instrument};

use crate::core::{Todo, TodoError};
use crate::storage::{StorageError, TodoRepository};

pub const TODOS_TABLE: &str = "todos";
const TODO_COLUMNS: &str = "id,task,is_complete";

/// Thin handle on a PostgREST endpoint (`{url}/rest/v1/{table}`), as exposed by Supabase.
#[derive(Clone, Debug)]
pub struct SupabaseClient {
    http: Client,
    rest_url: Url,
    api_key: String,
}

impl SupabaseClient {
    pub fn new(url: &str, api_key: impl Into<String>, timeout: Duration) -> Result<Self, StorageError> {
        let mut base =
            Url::parse(url).map_err(|e| StorageError::InvalidUrl(format!("{url}: {e}")))?;
        if base.cannot_be_a_base() {
            return Err(StorageError::InvalidUrl(url.to_string()));
        }
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        let rest_url = base
            .join("rest/v1/")
            .map_err(|e| StorageError::InvalidUrl(format!("{url}: {e}")))?;
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            rest_url,
            api_key: api_key.into(),
        })
    }

    fn request(&self, method: Method, table: &str) -> Result<RequestBuilder, StorageError> {
        let url = self
            .rest_url
            .join(table)
            .map_err(|e| StorageError::InvalidUrl(format!("{table}: {e}")))?;
        Ok(self
            .http
            .request(method, url)
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key))
    }

    async fn rows<T: DeserializeOwned>(request: RequestBuilder) -> Result<Vec<T>, StorageError> {
        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(StorageError::Status {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response.json::<Vec<T>>().await?)
    }
}

#[derive(Deserialize)]
struct TodoRow {
    id: RowId,
    task: Option<String>,
    #[serde(default)]
    is_complete: Option<bool>,
}

/// Primary keys are usually `bigint`, but text keys are accepted too.
#[derive(Deserialize)]
#[serde(untagged)]
enum RowId {
    Number(i64),
    Text(String),
}

impl From<RowId> for String {
    fn from(id: RowId) -> Self {
        match id {
            RowId::Number(n) => n.to_string(),
            RowId::Text(s) => s,
        }
    }
}

impl TryFrom<TodoRow> for Todo {
    type Error = StorageError;

    fn try_from(row: TodoRow) -> Result<Self, Self::Error> {
        let id = String::from(row.id);
        Todo::from_parts(row.task, Some(id.clone()), row.is_complete.unwrap_or(false))
            .map_err(|_| StorageError::MalformedRow(format!("row {id} has no task")))
    }
}

/// [`TodoRepository`] backed by the hosted `todos` table.
///
/// Built with `None` when the backend could not be configured; every call
/// then fails with [`StorageError::Unconfigured`].
pub struct SupabaseTodoRepository {
    client: Option<Arc<SupabaseClient>>,
    table: String,
}

impl SupabaseTodoRepository {
    pub fn new(client: Option<Arc<SupabaseClient>>) -> Self {
        Self {
            client,
            table: TODOS_TABLE.to_string(),
        }
    }

    fn client(&self) -> Result<&SupabaseClient, StorageError> {
        self.client.as_deref().ok_or(StorageError::Unconfigured)
    }

    fn by_id(id: &str) -> [(&'static str, String); 2] {
        [("id", format!("eq.{id}")), ("select", TODO_COLUMNS.to_string())]
    }
}

#[async_trait]
impl TodoRepository for SupabaseTodoRepository {
    #[instrument(skip(self), fields(table = %self.table))]
    async fn get_all(&self) -> Result<Vec<Todo>, TodoError> {
        let request = self
            .client()?
            .request(Method::GET, &self.table)?
            .query(&[("select", TODO_COLUMNS)]);
        let rows: Vec<TodoRow> = SupabaseClient::rows(request).await?;
        debug!(count = rows.len(), "Fetched todo rows");
        let todos = rows
            .into_iter()
            .map(Todo::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(todos)
    }

    #[instrument(skip(self, todo), fields(table = %self.table))]
    async fn add(&self, mut todo: Todo) -> Result<Todo, TodoError> {
        let request = self
            .client()?
            .request(Method::POST, &self.table)?
            .query(&[("select", TODO_COLUMNS)])
            .header("Prefer", "return=representation")
            .json(&json!({ "task": todo.task }));
        let rows: Vec<TodoRow> = SupabaseClient::rows(request).await?;
        let row = rows
            .into_iter()
            .next()
            .ok_or_else(|| StorageError::MalformedRow("insert returned no rows".into()))?;
        todo.id = Some(row.id.into());
        todo.is_complete = row.is_complete.unwrap_or(false);
        debug!(id = ?todo.id, "Inserted todo");
        Ok(todo)
    }

    #[instrument(skip(self), fields(table = %self.table))]
    async fn update_status(&self, id: &str, is_complete: bool) -> Result<Todo, TodoError> {
        let request = self
            .client()?
            .request(Method::PATCH, &self.table)?
            .query(&Self::by_id(id))
            .header("Prefer", "return=representation")
            .json(&json!({ "is_complete": is_complete }));
        let rows: Vec<TodoRow> = SupabaseClient::rows(request).await?;
        let row = rows
            .into_iter()
            .next()
            .ok_or_else(|| TodoError::NotFound(id.to_string()))?;
        Ok(Todo::try_from(row)?)
    }

    #[instrument(skip(self), fields(table = %self.table))]
    async fn delete(&self, id: &str) -> Result<bool, TodoError> {
        let request = self
            .client()?
            .request(Method::DELETE, &self.table)?
            .query(&Self::by_id(id))
            .header("Prefer", "return=representation");
        let rows: Vec<Value> = SupabaseClient::rows(request).await?;
        debug!(deleted = rows.len(), "Deleted todo rows");
        Ok(!rows.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(json: Value) -> TodoRow {
        serde_json::from_value(json).unwrap()
    }

    #[test]
    fn numeric_ids_become_strings() {
        let todo = Todo::try_from(row(json!({"id": 42, "task": "a", "is_complete": true}))).unwrap();
        assert_eq!(todo.id.as_deref(), Some("42"));
        assert!(todo.is_complete);
    }

    #[test]
    fn text_ids_pass_through() {
        let todo = Todo::try_from(row(json!({"id": "abc", "task": "a"}))).unwrap();
        assert_eq!(todo.id.as_deref(), Some("abc"));
        assert!(!todo.is_complete);
    }

    #[test]
    fn row_without_task_is_malformed() {
        let err = Todo::try_from(row(json!({"id": 1, "task": null, "is_complete": false})))
            .unwrap_err();
        assert!(matches!(err, StorageError::MalformedRow(_)));
    }

    #[test]
    fn rest_url_is_rooted_under_rest_v1() {
        let client =
            SupabaseClient::new("https://example.supabase.co", "key", Duration::from_secs(1))
                .unwrap();
        assert_eq!(client.rest_url.as_str(), "https://example.supabase.co/rest/v1/");

        let nested =
            SupabaseClient::new("http://localhost:54321/proxy", "key", Duration::from_secs(1))
                .unwrap();
        assert_eq!(nested.rest_url.as_str(), "http://localhost:54321/proxy/rest/v1/");
    }

    #[test]
    fn garbage_url_is_rejected() {
        let err = SupabaseClient::new("not a url", "key", Duration::from_secs(1)).unwrap_err();
        assert!(matches!(err, StorageError::InvalidUrl(_)));
    }

    #[tokio::test]
    async fn unconfigured_repository_fails_every_call() {
        let repo = SupabaseTodoRepository::new(None);
        let err = repo.get_all().await.unwrap_err();
        assert!(matches!(StorageError::cause_of(&err), Some(StorageError::Unconfigured)));
        let err = repo.delete("1").await.unwrap_err();
        assert!(matches!(StorageError::cause_of(&err), Some(StorageError::Unconfigured)));
    }
}
