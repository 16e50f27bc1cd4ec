use tokio::net::TcpListener;
use todo_core::Resources;
use todo_server::Config;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Config::from_env()?;
    let store = config.database.open()?;
    let listener = TcpListener::bind(config.addr()).await?;
    tracing::info!(addr = %listener.local_addr()?, database = ?config.database, "listening");

    todo_server::run(listener, Resources::new(store)).await?;
    Ok(())
}
