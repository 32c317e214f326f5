use clap::Parser;
use tracing::info;

use sqlrepl::cli::Args;
use sqlrepl::commands::Command;
use sqlrepl::config::ConfigFile;
use sqlrepl::db::SqliteEngineInit;
use sqlrepl::fetch::HttpFetcher;
use sqlrepl::logging;
use sqlrepl::session::Session;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    logging::init_logging(&args.log_level)?;

    let config = ConfigFile::load()?;
    let dataset = config.resolve_dataset(args.dataset.as_deref());
    let fetcher = HttpFetcher::new(config.fetch_timeout())?;

    let mut session = Session::open(SqliteEngineInit::new(), fetcher, &dataset)
        .await
        .with_export_options(config.export.clone());
    session.require_ready()?;
    info!(dataset = %dataset, tables = session.catalog().len(), "Session ready");

    let command = match args.command {
        Command::Repl(cmd) => Command::Repl(cmd.with_suggestion(config.default_query)),
        other => other,
    };
    let output = command.run(&mut session, args.format)?;
    println!("{}", output);
    Ok(())
}
