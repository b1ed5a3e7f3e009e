//! Terminal front-end for a todo list.
//!
//! Every command loads the list, applies its edit to the view straight away,
//! shows that optimistic view, then reconciles with the server and shows the
//! settled result.

mod render;
mod transport;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use todo_core::{RemoteBackend, TodoClient, TodoSession};

use crate::render::{render, resolve};
use crate::transport::ReqwestTransport;

type Session = TodoSession<RemoteBackend<ReqwestTransport>>;

#[derive(Debug, Parser)]
#[command(name = "todo-panel", version, about)]
struct Cli {
    /// Base URL of the todo server.
    #[arg(long, env = "TODO_URL", default_value = "http://127.0.0.1:3000")]
    url: String,

    /// Identifier of the embedding location; its last `/` segment names the list.
    #[arg(long, env = "TODO_LOCAL_ID")]
    local_id: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Show the list.
    List,
    /// Add a todo.
    Add {
        #[arg(required = true, num_args = 1..)]
        label: Vec<String>,
    },
    /// Check or uncheck a todo by id (or unique id prefix).
    Toggle { id: String },
    /// Change a todo's label.
    Rename {
        id: String,
        #[arg(required = true, num_args = 1..)]
        label: Vec<String>,
    },
    /// Delete a todo.
    Remove { id: String },
    /// Delete every todo in the list.
    Clear,
}

fn init_logging() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();
}

async fn print(session: &Session) {
    let list = session.list().lock().await;
    print!("{}", render(list.entries(), list.summary(), list.last_error()));
}

/// Apply the command's edit to the view. Returns false if nothing changed.
async fn apply(session: &Session, command: Command) -> Result<bool> {
    let changed = match command {
        Command::List => false,
        Command::Add { label } => {
            session.add(label.join(" ")).await;
            true
        }
        Command::Toggle { id } => {
            let key = resolve(&session.entries().await, &id)?;
            session.toggle(key).await
        }
        Command::Rename { id, label } => {
            let key = resolve(&session.entries().await, &id)?;
            session.rename(key, label.join(" ")).await
        }
        Command::Remove { id } => {
            let key = resolve(&session.entries().await, &id)?;
            session.remove(key).await
        }
        Command::Clear => {
            session.delete_all().await.context("failed to delete all todos")?;
            false
        }
    };
    Ok(changed)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging();

    let client = TodoClient::new(&cli.url, &cli.local_id);
    let session = TodoSession::load(RemoteBackend::new(client, ReqwestTransport::new()))
        .await
        .with_context(|| format!("failed to load list from {}", cli.url))?;

    if !apply(&session, cli.command).await? {
        print(&session).await;
        return Ok(());
    }

    print(&session).await;
    println!();
    let result = session.reconcile().await;
    print(&session).await;
    result.context("changes were not saved")?;
    Ok(())
}
