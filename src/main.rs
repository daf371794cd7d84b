use clap::Parser;
use stratagem::cli::{run, Cli};

fn main() -> std::process::ExitCode {
    run(Cli::parse())
}
