use boilr::app::{handle_fatal_error, init_logging, AppConfig};
use boilr::cli::{execute, Cli};
use clap::Parser;

fn main() {
    let cli = Cli::parse();
    let verbose = cli.verbose;

    let config = match AppConfig::new(verbose) {
        Ok(config) => config,
        Err(e) => handle_fatal_error(e, verbose),
    };
    init_logging(&config);

    if let Err(e) = execute(cli, &config) {
        handle_fatal_error(e, verbose);
    }
}
