use crate::prelude::*;
use clap::Parser;
use std::path::PathBuf;

mod catalog;
mod config;
mod countries;
mod error;
mod favorites;
mod history;
mod news;
mod prelude;
mod store;

#[derive(Debug, clap::Parser)]
#[command(
    author,
    version,
    about,
    long_about = "Browse, filter and follow the countries of the world"
)]
pub struct App {
    #[command(subcommand)]
    pub command: SubCommands,

    #[clap(flatten)]
    global: Global,
}

#[derive(Debug, Clone, clap::Args)]
pub struct Global {
    /// Directory where favorites and history are stored
    #[clap(long, env = "COUNTRYDEX_DATA_DIR", global = true)]
    data_dir: Option<PathBuf>,

    /// Timeout in seconds for every external request
    #[clap(long, env = "COUNTRYDEX_HTTP_TIMEOUT", global = true)]
    timeout: Option<u64>,

    /// Whether to display additional information.
    #[clap(long, env = "COUNTRYDEX_VERBOSE", global = true, default_value = "false")]
    verbose: bool,
}

#[derive(Debug, clap::Parser)]
pub enum SubCommands {
    /// Browse, inspect and share countries
    Countries(crate::countries::App),

    /// Manage favorite countries
    Favorites(crate::favorites::App),

    /// Show or clear recently viewed countries
    History(crate::history::App),

    /// Fetch recent news for one or more countries
    News(crate::news::App),
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    color_eyre::install()?;

    let app = App::parse();

    match app.command {
        SubCommands::Countries(sub_app) => crate::countries::run(sub_app, app.global).await,
        SubCommands::Favorites(sub_app) => crate::favorites::run(sub_app, app.global).await,
        SubCommands::History(sub_app) => crate::history::run(sub_app, app.global).await,
        SubCommands::News(sub_app) => crate::news::run(sub_app, app.global).await,
    }
    .map_err(|err: color_eyre::eyre::Report| eyre!(err))
}
