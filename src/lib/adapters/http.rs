use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use axum::{
    Json, Router,
    extract::{
        Path, Request, State,
        rejection::{JsonRejection, PathRejection},
    },
    http::StatusCode,
    routing::{get, put},
};
use serde::Deserialize;
use serde_json::Value;
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, info_span, warn};

use crate::adapters::ApiError;
use crate::core::Todo;
use crate::storage::TodoRepository;
use crate::use_cases::TodoUseCases;

pub const LIVENESS_MESSAGE: &str = "Todo backend is running";

const FAILED_LIST: &str = "Failed to fetch todo items.";
const FAILED_CREATE: &str = "Failed to create todo item.";
const FAILED_UPDATE: &str = "Failed to update todo item.";
const FAILED_DELETE: &str = "Failed to delete todo item.";

/// Router state: the use cases, shared by every request.
pub struct AppState<R: TodoRepository> {
    use_cases: Arc<TodoUseCases<R>>,
}

impl<R: TodoRepository> AppState<R> {
    pub fn new(use_cases: TodoUseCases<R>) -> Self {
        Self {
            use_cases: Arc::new(use_cases),
        }
    }
}

impl<R: TodoRepository> Clone for AppState<R> {
    fn clone(&self) -> Self {
        Self {
            use_cases: Arc::clone(&self.use_cases),
        }
    }
}

#[derive(Deserialize)]
pub struct CreateTodoRequest {
    pub task: Option<String>,
}

/// `is_complete` is kept loose so a non-boolean gets our own 400 message.
#[derive(Deserialize)]
pub struct UpdateTodoRequest {
    pub is_complete: Option<Value>,
}

/// GET /api/todos
pub async fn list_todos<R: TodoRepository + 'static>(
    State(state): State<AppState<R>>,
) -> Result<Json<Vec<Todo>>, ApiError> {
    let todos = state
        .use_cases
        .get_todos
        .execute()
        .await
        .map_err(|e| ApiError::from_todo(e, FAILED_LIST))?;
    Ok(Json(todos))
}

/// POST /api/todos
pub async fn create_todo<R: TodoRepository + 'static>(
    State(state): State<AppState<R>>,
    payload: Result<Json<CreateTodoRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Todo>), ApiError> {
    let Json(body) = payload?;
    let todo = state
        .use_cases
        .create_todo
        .execute(body.task)
        .await
        .map_err(|e| ApiError::from_todo(e, FAILED_CREATE))?;
    info!(id = ?todo.id, "Todo created");
    Ok((StatusCode::CREATED, Json(todo)))
}

/// PUT /api/todos/{id}
pub async fn update_todo<R: TodoRepository + 'static>(
    State(state): State<AppState<R>>,
    path: Result<Path<String>, PathRejection>,
    payload: Result<Json<UpdateTodoRequest>, JsonRejection>,
) -> Result<Json<Todo>, ApiError> {
    let Path(id) = path?;
    let Json(body) = payload?;
    let is_complete = body.is_complete.as_ref().and_then(Value::as_bool).ok_or_else(|| {
        ApiError::BadRequest("Missing or invalid 'is_complete' status (must be boolean).".into())
    })?;
    let todo = state
        .use_cases
        .update_todo
        .execute(&id, is_complete)
        .await
        .map_err(|e| ApiError::from_todo(e, FAILED_UPDATE))?;
    Ok(Json(todo))
}

/// DELETE /api/todos/{id}
pub async fn delete_todo<R: TodoRepository + 'static>(
    State(state): State<AppState<R>>,
    path: Result<Path<String>, PathRejection>,
) -> Result<StatusCode, ApiError> {
    let Path(id) = path?;
    let deleted = state
        .use_cases
        .delete_todo
        .execute(&id)
        .await
        .map_err(|e| ApiError::from_todo(e, FAILED_DELETE))?;
    if deleted {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::NotFound(format!(
            "Todo with ID {id} not found or failed to delete."
        )))
    }
}

async fn liveness() -> &'static str {
    LIVENESS_MESSAGE
}

fn api_routes<R: TodoRepository + 'static>() -> Router<AppState<R>> {
    Router::new()
        .route("/todos", get(list_todos::<R>).post(create_todo::<R>))
        .route("/todos/{id}", put(update_todo::<R>).delete(delete_todo::<R>))
}

/// Builds the full application router around `use_cases`.
pub fn router<R: TodoRepository + 'static>(use_cases: TodoUseCases<R>) -> Router {
    let trace_layer = TraceLayer::new_for_http().make_span_with(|request: &Request| {
        let uri = request.uri().to_string();
        info_span!("http_request", method = ?request.method(), uri)
    });

    Router::new()
        .route("/", get(liveness))
        .nest("/api", api_routes::<R>())
        .layer(trace_layer)
        .layer(CorsLayer::permissive())
        .with_state(AppState::new(use_cases))
}

pub struct HttpServer {
    router: Router,
    listener: TcpListener,
}

impl HttpServer {
    pub async fn new<R: TodoRepository + 'static>(
        use_cases: TodoUseCases<R>,
        addr: &str,
    ) -> anyhow::Result<Self> {
        let listener = TcpListener::bind(addr)
            .await
            .with_context(|| format!("failed to listen on {addr}"))?;
        Ok(Self {
            router: router(use_cases),
            listener,
        })
    }

    pub fn local_addr(&self) -> anyhow::Result<SocketAddr> {
        self.listener
            .local_addr()
            .context("listener has no local address")
    }

    pub async fn run(self) -> anyhow::Result<()> {
        info!(addr = %self.local_addr()?, "HTTP server listening");
        axum::serve(self.listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .context("received error from running server")?;
        info!("Server shutdown complete");
        Ok(())
    }
}

/// Resolves on Ctrl+C or, on unix, SIGTERM. The SIGTERM handler is installed
/// when this is called, not when the future is first polled.
fn shutdown_signal() -> impl Future<Output = ()> + Send {
    #[cfg(unix)]
    let terminate = terminate_signal();

    async move {
        let ctrl_c = async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                warn!(error = %e, "Failed to listen for Ctrl+C");
                std::future::pending::<()>().await;
            }
        };

        #[cfg(unix)]
        let terminate = async move {
            match terminate {
                Ok(signal) => signal.await,
                Err(e) => {
                    warn!(error = %e, "Failed to listen for SIGTERM");
                    std::future::pending::<()>().await;
                }
            }
        };

        #[cfg(not(unix))]
        let terminate = std::future::pending::<()>();

        tokio::select! {
            _ = ctrl_c => warn!("Received Ctrl+C, shutting down"),
            _ = terminate => warn!("Received SIGTERM, shutting down"),
        }
    }
}

#[cfg(unix)]
fn terminate_signal() -> std::io::Result<impl Future<Output = ()> + Send> {
    use tokio::signal::unix::{SignalKind, signal};

    let mut term = signal(SignalKind::terminate())?;
    Ok(async move {
        term.recv().await;
    })
}
