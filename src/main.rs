mod cli;
mod model;
mod pipeline;
mod registry;
mod storage;

use clap::Parser;

fn main() {
    let args = cli::Cli::parse();
    match cli::run(args) {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("aka: {e:#}");
            std::process::exit(pipeline::FAILURE_EXIT_CODE);
        }
    }
}
