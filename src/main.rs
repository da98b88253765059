use clap::Parser;
use tradefeed::cli::{run, Cli};
use tradefeed::telemetry::init_tracing;

fn main() -> std::process::ExitCode {
    init_tracing();
    run(Cli::parse())
}
