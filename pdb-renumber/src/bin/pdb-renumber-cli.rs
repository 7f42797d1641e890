use clap::Parser;
use env_logger::Builder;
use log::{error, LevelFilter};
use pdb_renumber::application::{default_output_directory, main_to_wrap, Cli};
use std::process::ExitCode;
use tokio::runtime::Runtime;

fn main() -> ExitCode {
    let cli = Cli::parse();

    if std::env::var("RUST_LOG").is_ok() {
        env_logger::init();
    } else {
        let mut verbosity_level = LevelFilter::Info;
        if cli.verbose {
            verbosity_level = LevelFilter::Debug
        };
        if cli.trace {
            verbosity_level = LevelFilter::Trace
        };

        let mut builder = Builder::new();
        builder
            .filter_module("pdb_renumber", verbosity_level)
            .filter_module("pdb_renumber_cli", verbosity_level)
            .format_target(false)
            .init();
    }

    let runtime = match Runtime::new() {
        Ok(runtime) => runtime,
        Err(error) => {
            error!("Unable to create the runtime: {error}");
            return ExitCode::FAILURE;
        }
    };

    let run_status = default_output_directory()
        .and_then(|output_directory| runtime.block_on(main_to_wrap(cli, output_directory)));
    let Err(error) = run_status else {
        return ExitCode::SUCCESS;
    };

    error!("{error}");
    ExitCode::FAILURE
}
