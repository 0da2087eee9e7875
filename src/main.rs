use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod discs;
mod error;
mod feed;
mod media;
mod panel;
mod paths;
mod resource_pack;
mod staging;
mod templates;
mod workflow;

use cli::{Command, RootArgs};

fn main() -> Result<()> {
    let args = RootArgs::parse();
    init_tracing(args.verbose);

    let paths = workflow::resolve_data_dir(args.data_dir)?;
    match args.command {
        Command::Init(init) => workflow::run_init(&paths, init),
        Command::Pack(pack) => workflow::run_pack(&paths, pack),
        Command::Discs(discs) => workflow::run_discs(&paths, discs),
        Command::Run(run) => workflow::run_episode(&paths, run),
        Command::Panel(panel) => workflow::run_panel(panel),
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
