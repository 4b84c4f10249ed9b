use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod cli;
mod config;
mod library;
mod migrate;
mod query;
mod session;
mod store;
mod types;

#[derive(Parser)]
#[command(name = "jingui")]
#[command(version)]
#[command(about = "Find classical prescriptions for your symptoms")]
struct Cli {
    /// Print diagnostic logs to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Describe symptoms and get prescription recommendations
    Consult {
        /// Symptom description
        query: String,

        /// Toggle favorite on option N of the result (repeatable)
        #[arg(short, long)]
        favorite: Vec<usize>,
    },

    /// Manage favorite prescriptions
    #[command(subcommand)]
    Favorites(FavoritesCommands),

    /// Manage search history
    #[command(subcommand)]
    History(HistoryCommands),

    /// View or set configuration
    Config {
        /// Config key
        key: Option<String>,

        /// Config value
        value: Option<String>,
    },
}

#[derive(Subcommand)]
enum FavoritesCommands {
    /// List favorites, newest first
    List,

    /// Show a favorite in full
    Show {
        /// Name or list index
        target: String,
    },

    /// Remove a favorite
    Remove {
        /// Name or list index
        target: String,
    },

    /// Export favorites to stdout
    Export {
        /// Output format
        #[arg(short, long, default_value = "json", value_parser = ["json", "md"])]
        format: String,
    },
}

#[derive(Subcommand)]
enum HistoryCommands {
    /// List recent searches
    List {
        /// Maximum results
        #[arg(short = 'n', long, default_value = "15")]
        limit: usize,
    },

    /// Run a past search again
    Rerun {
        /// Query text or list index
        target: String,

        /// Toggle favorite on option N of the result (repeatable)
        #[arg(short, long)]
        favorite: Vec<usize>,
    },

    /// Clear all searches
    Clear {
        /// Skip confirmation
        #[arg(short, long)]
        force: bool,
    },
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "jingui=debug" } else { "jingui=warn" };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Consult { query, favorite } => cli::consult::run_consult(&query, &favorite),
        Commands::Favorites(cmd) => match cmd {
            FavoritesCommands::List => cli::favorites::run_list(),
            FavoritesCommands::Show { target } => cli::favorites::run_show(&target),
            FavoritesCommands::Remove { target } => cli::favorites::run_remove(&target),
            FavoritesCommands::Export { format } => cli::favorites::run_export(&format),
        },
        Commands::History(cmd) => match cmd {
            HistoryCommands::List { limit } => cli::history::run_list(limit),
            HistoryCommands::Rerun { target, favorite } => {
                cli::history::run_rerun(&target, &favorite)
            }
            HistoryCommands::Clear { force } => cli::history::run_clear(force),
        },
        Commands::Config { key, value } => cli::config::run_config(key.as_deref(), value.as_deref()),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
