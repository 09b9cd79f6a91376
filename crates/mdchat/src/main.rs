use std::process::ExitCode;

use clap::Parser;

use mdchat::app;
use mdchat::args::Args;

fn main() -> ExitCode {
    let args = Args::parse();

    let _ = std::thread::Builder::new()
        .name("markdown-highlight-prewarm".to_string())
        .spawn(mdstream::prewarm_highlighting);

    match app::run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("{error}");
            ExitCode::FAILURE
        }
    }
}
