use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tasktree::config::Config;
use tasktree::mcp;
use tasktree::models::StatusFilter;
use tasktree::service::TaskService;
use tasktree::storage::Store;

#[derive(Parser)]
#[command(name = "tasktree")]
#[command(about = "Shared checklist store for a companion app and AI agents")]
struct Cli {
    /// Storage root (overrides TASKTREE_ROOT)
    #[arg(long, global = true)]
    root: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start MCP server via stdio
    Mcp,
    /// List projects, most recently accessed first
    Projects,
    /// Show a project's task tree
    Tasks {
        project: String,

        /// Filter by status: all, checked, or unchecked
        #[arg(short, long, default_value = "all")]
        status: StatusFilter,
    },
    /// Mark a task as checked
    Check { project: String, task_id: String },
    /// Mark a task as unchecked
    Uncheck { project: String, task_id: String },
    /// Show a task's metadata and immediate children
    Show { project: String, task_id: String },
    /// Append free-form text to a project's raw task log
    Append { project: String, text: String },
}

/// Initialize tracing on stderr; stdout carries the MCP protocol or command output
fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| "tasktree=info".into()),
    );

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_tracing();

    let config = Config::resolve(cli.root)?;
    let store = Store::new(&config);

    let service = TaskService::new(store.clone());
    let output = match cli.command {
        Commands::Mcp => {
            mcp::run_stdio_server(store).await?;
            return Ok(());
        }
        Commands::Projects => service.list_projects().await?,
        Commands::Tasks { project, status } => service.list_tasks(&project, status).await?,
        Commands::Check { project, task_id } => {
            service.set_task_checked(&project, &task_id, true).await?
        }
        Commands::Uncheck { project, task_id } => {
            service.set_task_checked(&project, &task_id, false).await?
        }
        Commands::Show { project, task_id } => service.get_task_detail(&project, &task_id).await?,
        Commands::Append { project, text } => service.append_raw_task(&project, &text).await?,
    };

    println!("{}", output.trim_end());
    Ok(())
}
