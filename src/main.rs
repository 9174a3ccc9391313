use clap::Parser;
use propplan::cli::{run, Cli};

fn main() -> std::process::ExitCode {
    run(Cli::parse())
}
