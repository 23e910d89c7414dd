use clap::{Parser, Subcommand};

pub mod config;
pub mod init_config;
pub mod serve;

#[derive(Parser)]
#[command(name = "veriflow")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Payment-gated credential verification service", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the verification service
    Serve {
        /// Path to config file (default: ~/.local/share/veriflow/config.toml)
        #[arg(long)]
        config: Option<String>,
    },

    /// Write a commented default config file and exit
    InitConfig {
        /// Where to write the config (default: ~/.local/share/veriflow/config.toml)
        #[arg(long)]
        path: Option<String>,

        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },

    /// Display version information
    Version,
}

pub async fn execute(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Serve { config } => serve::execute(config).await,
        Commands::InitConfig { path, force } => init_config::execute(path, force),
        Commands::Version => {
            println!("veriflow {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}
