mod cli;

use clap::Parser;
use cli::Cli;

#[tokio::main]
async fn main() {
    if let Err(e) = cli::execute(Cli::parse()).await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
