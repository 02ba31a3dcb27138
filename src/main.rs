//! `cleanup-bucket` entry point.

use clap::Parser;

use bucket_sweep::cli::{commands, handle_error, Cli};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let json = cli.json;

    let code = match commands::sweep::execute(cli).await {
        Ok(code) => code,
        Err(err) => handle_error(err, json),
    };

    std::process::exit(code);
}
