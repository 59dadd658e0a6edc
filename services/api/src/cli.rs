use crate::demo::{run_demo, DemoArgs};
use crate::scoring::{run_score, ScoreArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use kapital_admin::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Melanin Kapital Admin",
    about = "Score SME business profiles and run the lending administration service",
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
    /// Score business records from a JSON file
    Score(ScoreArgs),
    /// Register and score sample businesses, then print the verification queue
    Demo(DemoArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Score(args) => run_score(args),
        Command::Demo(args) => run_demo(args),
    }
}
