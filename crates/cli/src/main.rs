mod commands;

use clap::{CommandFactory, Parser};
use clap_complete::{Shell, generate};
use std::io;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "folio")]
#[command(version, about = "Build tooling for a markdown portfolio and blog", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Parser)]
enum Command {
    /// Initialize a new site directory
    Init {
        /// Path to the site directory (must exist)
        path: PathBuf,

        /// Site title
        #[arg(long)]
        title: Option<String>,

        /// Site description
        #[arg(long)]
        description: Option<String>,
    },

    /// Validate site configuration and content collections
    Validate {
        /// Path to site directory
        path: PathBuf,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the redirect manifest
    Redirects {
        /// Path to site directory
        path: PathBuf,
    },

    /// Write generated artifacts into an output directory
    Build {
        /// Path to site directory
        path: PathBuf,

        /// Output directory for generated files
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Serve the redirect manifest locally
    Preview {
        /// Path to site directory
        path: PathBuf,

        /// Port to serve on
        #[arg(short, long, default_value = "8080")]
        port: u16,
    },

    /// Generate shell completion scripts
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("folio=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing();

    match cli.command {
        Command::Init {
            path,
            title,
            description,
        } => commands::init::run(path, title, description).await,
        Command::Validate { path, json } => commands::validate::run(path, json).await,
        Command::Redirects { path } => commands::redirects::run(path).await,
        Command::Build { path, output } => commands::build::run(path, output).await,
        Command::Preview { path, port } => commands::preview::run(path, port).await,
        Command::Completions { shell } => {
            let mut cmd = Cli::command();
            generate(shell, &mut cmd, "folio", &mut io::stdout());
            Ok(())
        }
    }
}
