use anyhow::Context;
use clap::Parser;
use tokio::net::TcpListener;
use todo_server::config::{init_logging, ServerConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ServerConfig::parse();
    init_logging(config.log_format);

    let addr = config.addr();
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    tracing::info!(%addr, "listening");

    todo_server::run_until(listener, todo_server::shutdown_on(tokio::signal::ctrl_c())).await?;
    Ok(())
}
