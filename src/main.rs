use std::path::PathBuf;

use clap::{Parser, Subcommand};
use relish::cli;

#[derive(Parser)]
#[command(name = "relish")]
#[command(about = "Review grid server with an =AI() cell formula")]
#[command(long_about = "Relish - Restaurant review grid server

A SQLite-backed store for a spreadsheet-like review grid, plus an =AI()
cell formula that forwards prompts to a hosted completion provider.

COMMANDS:
  serve - Start the HTTP server backing the grid
  seed  - Recreate the reviews table and load example data

EXAMPLES:
  relish seed                                  # Load the built-in reviews
  relish serve                                 # Serve on localhost:3000
  relish serve --port 8080 --assets public     # Serve the demo UI too

ENVIRONMENT:
  OPENAI_API_KEY    API key for the completion provider
  OPENAI_BASE_URL   Provider base URL override (testing/self-hosted)
  OPENAI_MODEL      Model name (default: gpt-4o-mini)

Docs: https://github.com/royalbit/relish")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(long_about = "Start the HTTP server backing the review grid.

Serves the grid store endpoints (/api/reviews, /api/review/create,
/api/review/update, /api/review/delete), the =AI() formula endpoint
(/api/generate), and health/version probes. With --assets, a directory
of static demo UI files is mounted at /.

The completion provider is configured from the environment; without
OPENAI_API_KEY the =AI() formula answers with the fixed error content.")]
    /// Start the HTTP server backing the review grid
    Serve {
        /// Host address to bind to (use 0.0.0.0 for all interfaces)
        #[arg(short = 'H', long, default_value = "127.0.0.1", env = "RELISH_HOST")]
        host: String,

        /// Port to listen on
        #[arg(short, long, default_value = "3000", env = "RELISH_PORT")]
        port: u16,

        /// Path to the SQLite database file
        #[arg(long, default_value = "reviews.db", env = "RELISH_DB")]
        db: PathBuf,

        /// Directory of static demo UI assets to serve at /
        #[arg(long)]
        assets: Option<PathBuf>,

        /// Completion model override (default: OPENAI_MODEL or gpt-4o-mini)
        #[arg(long)]
        model: Option<String>,
    },

    #[command(long_about = "Recreate the reviews table and load example data.

Drops any existing rows (ids restart at 1) and bulk inserts the built-in
example reviews, or the rows from --file. The file is a JSON array of row
objects with optional string fields:

  [{\"restaurant\": \"Pho 88\", \"review\": \"Great broth\", \"sentiment\": \"Positive\"}]")]
    /// Recreate the reviews table and load example data
    Seed {
        /// Path to the SQLite database file
        #[arg(long, default_value = "reviews.db", env = "RELISH_DB")]
        db: PathBuf,

        /// JSON file of rows to load instead of the built-in example set
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve {
            host,
            port,
            db,
            assets,
            model,
        } => cli::serve(host, port, db, assets, model).await,

        Commands::Seed { db, file } => {
            cli::seed(db, file)?;
            Ok(())
        }
    }
}
