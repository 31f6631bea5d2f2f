use clap::{Parser, Subcommand};
use taskgrid::config::{GridConfig, StoreBackend};
use taskgrid::store::GroupExpansionStore;
use taskgrid::grid::TreeGrid;
use taskgrid::grid::selection::Selection;
use taskgrid::model::loader::load_snapshot;
use taskgrid::render::{render_grid, render_header, render_legend};
use std::path::PathBuf;
use anyhow::Result;
use tracing::info;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// YAML config file
    #[arg(long, short, global = true)]
    config: Option<PathBuf>,

    /// Override the configured expansion store
    #[arg(long, global = true, value_enum)]
    store: Option<StoreBackend>,

    /// Override the file store location
    #[arg(long, global = true)]
    state_file: Option<PathBuf>,

    /// Override the Redis connection URL
    #[arg(long, global = true)]
    redis: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the grid for a snapshot file
    Show {
        /// Snapshot file (YAML or JSON)
        #[arg(long, short)]
        snapshot: PathBuf,

        /// Workflow id (defaults to config, then the snapshot file stem)
        #[arg(long, short)]
        workflow: Option<String>,

        /// Select a run column before printing
        #[arg(long)]
        select_run: Option<String>,

        /// Narrow the selection to one task of the selected run
        #[arg(long, requires = "select_run")]
        select_task: Option<String>,

        /// Hover a run column before printing
        #[arg(long)]
        hover: Option<String>,
    },

    /// Toggle a group open/closed and persist it
    Toggle {
        #[arg(long, short)]
        snapshot: PathBuf,

        #[arg(long, short)]
        workflow: Option<String>,

        /// Dot-qualified group id
        #[arg(long, short)]
        group: String,
    },

    /// List persisted open groups
    OpenGroups {
        #[arg(long, short)]
        workflow: Option<String>,
    },

    /// Forget all persisted open groups for a workflow
    Reset {
        #[arg(long, short)]
        workflow: Option<String>,
    },
}

fn load_config(cli: &Cli) -> Result<GridConfig> {
    let mut config = match &cli.config {
        Some(path) => GridConfig::load(path)?,
        None => GridConfig::default(),
    };
    if let Some(store) = cli.store {
        config.store = store;
    }
    if let Some(path) = &cli.state_file {
        config.state_file = path.clone();
    }
    if let Some(url) = &cli.redis {
        config.redis_url = url.clone();
    }
    Ok(config)
}

fn print_grid(grid: &TreeGrid) -> Result<()> {
    println!("{}", render_header(grid));
    println!();
    print!("{}", render_grid(grid)?);
    println!();
    print!("{}", render_legend(grid)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();
    let cli = Cli::parse();
    let config = load_config(&cli)?;
    let store = config.open_store()?;

    match cli.command {
        Commands::Show { snapshot, workflow, select_run, select_task, hover } => {
            let workflow_id = config.resolve_workflow(workflow, Some(snapshot.as_path()))?;
            let data = load_snapshot(&snapshot)?;
            info!("Loaded snapshot with {} runs", data.dag_runs.len());

            let mut grid = TreeGrid::mount(&workflow_id, store).await;
            grid.set_auto_refresh(config.auto_refresh);
            grid.apply_snapshot(data);

            if let Some(run_id) = select_run {
                grid.select(Selection::from_ids(&run_id, select_task.as_deref()));
            }
            if let Some(run_id) = hover {
                grid.enter_run(&run_id);
            }
            print_grid(&grid)?;
        }

        Commands::Toggle { snapshot, workflow, group } => {
            let workflow_id = config.resolve_workflow(workflow, Some(snapshot.as_path()))?;
            let data = load_snapshot(&snapshot)?;

            let mut grid = TreeGrid::mount(&workflow_id, store).await;
            grid.apply_snapshot(data);
            let open = grid.toggle_group(&group).await;
            info!("Group {} is now {}", group, if open { "open" } else { "closed" });
            print_grid(&grid)?;
        }

        Commands::OpenGroups { workflow } => {
            let workflow = config.resolve_workflow(workflow, None)?;
            let groups = store.open_groups(&workflow).await?.unwrap_or_default();
            for group in groups {
                println!("{}", group);
            }
        }

        Commands::Reset { workflow } => {
            let workflow = config.resolve_workflow(workflow, None)?;
            store.clear(&workflow).await?;
            info!("Cleared open groups for {}", workflow);
        }
    }

    Ok(())
}
