use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), std::io::Error> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let port = std::env::var("PORT").unwrap_or_else(|_| "3000".to_string());
    let username = std::env::var("GREYHOUND_USERNAME")
        .unwrap_or_else(|_| mock_server::DEFAULT_USERNAME.to_string());
    let password = std::env::var("GREYHOUND_PASSWORD")
        .unwrap_or_else(|_| mock_server::DEFAULT_PASSWORD.to_string());

    let addr = format!("127.0.0.1:{port}");
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!(%addr, %username, "mock GREYHOUND API listening under /rest");
    let router = mock_server::app_with(&username, &password, mock_server::Store::seeded());
    mock_server::run_with(listener, router).await
}
