//! Exemplar Forge - few-shot prompting for AI code generation
//!
//! Retrieves the examples most relevant to a request, packs them with
//! recent turns into a size-bounded prompt and asks a backend for code.

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use exemplar_forge::config;

mod cli;

/// Exemplar Forge - example-driven code generation
#[derive(Parser)]
#[command(name = "exemplar")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Few-shot example retrieval and prompt budgeting for AI code generation", long_about = None)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Example corpus (JSON array of {description, code})
    #[arg(long, global = true, env = "EXEMPLAR_CORPUS")]
    corpus: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start an interactive session
    Chat,

    /// Rank corpus examples against a request
    Rank {
        /// The request to rank examples for
        query: String,

        /// Maximum results
        #[arg(short, long)]
        limit: Option<usize>,

        /// Print results as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the prompt that would be sent for a request
    Prompt {
        /// The request to build a prompt for
        request: String,

        /// Character budget for the prompt
        #[arg(short, long)]
        budget: Option<usize>,

        /// Print messages as JSON
        #[arg(long)]
        json: bool,
    },

    /// Generate code from natural language
    Generate {
        /// Description of what to generate
        description: String,

        /// Output file path
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Show configuration
    Config {
        /// Show current configuration
        #[arg(long)]
        show: bool,

        /// Initialize configuration file
        #[arg(long)]
        init: bool,
    },

    /// Show version, corpus and provider info
    Info,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging; stdout stays clean for --json output
    let level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    // Load configuration
    let mut config = config::load_config(cli.config.as_deref())?;
    config.verbose = cli.verbose;
    if let Some(corpus) = cli.corpus {
        config.retrieval.corpus_path = Some(corpus.into());
    }

    info!("Exemplar Forge v{}", env!("CARGO_PKG_VERSION"));

    match cli.command {
        Some(Commands::Chat) | None => {
            cli::chat::run(config).await?;
        }
        Some(Commands::Rank { query, limit, json }) => {
            cli::rank::run(config, &query, limit, json)?;
        }
        Some(Commands::Prompt { request, budget, json }) => {
            cli::prompt::run(config, &request, budget, json)?;
        }
        Some(Commands::Generate { description, output }) => {
            cli::generate::run(config, &description, output.as_deref()).await?;
        }
        Some(Commands::Config { show, init }) => {
            if init {
                config::init_config()?;
            } else if show {
                config::show_config(&config)?;
            }
        }
        Some(Commands::Info) => {
            cli::info::run(&config).await?;
        }
    }

    Ok(())
}
