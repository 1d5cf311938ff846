use std::process::ExitCode;

use clap::Parser;

use regionfx::cli_run;

fn main() -> ExitCode {
    env_logger::init();
    let args = regionfx::CliArgs::parse();
    cli_run(args)
}
