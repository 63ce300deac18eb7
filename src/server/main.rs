use std::sync::Arc;

use prk_todos::adapters::HttpServer;
use prk_todos::config::AppConfig;
use prk_todos::context::AppContext;
use prk_todos::use_cases::TodoUseCases;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::from_env()?;
    tracing_subscriber::fmt()
        .with_env_filter(std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()))
        .init();

    let context = AppContext::new(config);
    let repository = Arc::new(context.todo_repository());
    let use_cases = TodoUseCases::new(repository);

    let server = HttpServer::new(use_cases, &context.config.bind_addr()).await?;
    server.run().await
}
