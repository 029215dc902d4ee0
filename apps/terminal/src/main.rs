use std::{path::PathBuf, sync::Arc};

use anyhow::{Context, Result};
use clap::Parser;
use presenter::{PresenterOptions, TodoListPresenter, TodoPresenter};
use shared::domain::TodoFilter;
use storage::{prepare_database_url, InMemoryTodoRepository, SqliteTodoRepository, TodoRepository};
use tokio::io::{stdin, stdout, BufReader};
use tracing::info;

mod config;
mod intent;
mod protocol;
mod view;

use config::Settings;

#[derive(Parser, Debug)]
#[command(about = "Todo list driven by a reactive presenter")]
struct Args {
    /// Config file; defaults to ./todo.toml when present.
    #[arg(long)]
    config: Option<PathBuf>,
    /// SQLite location. Todos stay in memory when unset.
    #[arg(long)]
    database_url: Option<String>,
    #[arg(long)]
    filter: Option<TodoFilter>,
    /// Tracing filter directive, e.g. `debug` or `presenter=trace`.
    #[arg(long)]
    log: Option<String>,
    /// Speak JSON lines on stdin/stdout instead of the interactive view.
    #[arg(long)]
    protocol: bool,
}

impl Args {
    fn apply(&self, mut settings: Settings) -> Settings {
        if let Some(v) = &self.database_url {
            settings.database_url = Some(v.clone());
        }
        if let Some(v) = self.filter {
            settings.initial_filter = v;
        }
        if let Some(v) = &self.log {
            settings.log_filter = v.clone();
        }
        settings
    }
}

async fn build_repository(settings: &Settings) -> Result<Arc<dyn TodoRepository>> {
    let Some(raw_database_url) = settings.database_url.as_deref() else {
        info!("todo: using in-memory repository");
        return Ok(Arc::new(InMemoryTodoRepository::new()));
    };

    let database_url = prepare_database_url(raw_database_url);
    let repository = SqliteTodoRepository::new(&database_url)
        .await
        .with_context(|| format!("failed to open todo database '{database_url}'"))?;
    repository.health_check().await?;
    info!(database_url, "todo: using sqlite repository");
    Ok(Arc::new(repository))
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let settings = args.apply(config::load_settings(args.config.as_deref())?);

    tracing_subscriber::fmt()
        .with_env_filter(settings.log_filter.as_str())
        .with_writer(std::io::stderr)
        .init();

    let repository = build_repository(&settings).await?;
    let presenter: Arc<dyn TodoPresenter> = TodoListPresenter::open(
        repository,
        PresenterOptions {
            event_buffer: settings.event_buffer,
            initial_filter: settings.initial_filter,
        },
    )
    .await;

    let reader = BufReader::new(stdin());
    if args.protocol {
        protocol::serve(presenter, reader, stdout()).await
    } else {
        view::run(presenter, reader, stdout()).await
    }
}
