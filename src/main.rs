mod app;
mod cli;
mod codec;
mod config;
mod consts;
mod core;
mod error;
mod estimate;
mod output;
mod pricing;
mod utils;

use clap::Parser;

use cli::Cli;
use config::Config;
use utils::init_logging;

fn main() {
    let config = Config::load();
    let cli = Cli::parse().with_config(&config);

    init_logging(cli.debug);
    config.report();

    if let Err(e) = app::run(&cli, &config) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
