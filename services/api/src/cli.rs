use crate::demo::{run_demo, run_extract, run_score, DemoArgs, ExtractArgs, ScoreArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use package_insight::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Package Insight",
    about = "Extract shipment identifiers from parcel barcodes and score their risk",
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
    /// Print the fields extracted from a barcode payload
    Extract(ExtractArgs),
    /// Score a barcode payload against a rule snapshot
    Score(ScoreArgs),
    /// Push a handful of sample scans through the scanner pipeline
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
        Command::Extract(args) => run_extract(args),
        Command::Score(args) => run_score(args),
        Command::Demo(args) => run_demo(args).await,
    }
}
