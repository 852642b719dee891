use crate::demo::{run_demo, run_score, run_show, ScoreArgs, ShowArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use housing_index::error::AppError;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "Housing Imbalance Index",
    about = "Score housing developments for social imbalance and serve the map API",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Print the index and level of every development
    Score(ScoreArgs),
    /// Run one selection pass and print the detail panel
    Show(ShowArgs),
    /// Walk through the bundled sample: scores, a click, and the navigation write-back
    Demo,
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
    /// CSV file or directory of CSV files (defaults to APP_DATA_PATH, then the bundled sample)
    #[arg(long)]
    pub(crate) data: Option<PathBuf>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Score(args) => run_score(args),
        Command::Show(args) => run_show(args),
        Command::Demo => run_demo(),
    }
}
