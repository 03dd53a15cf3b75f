use std::net::SocketAddr;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "petboard", about = "Petboard — pet adoption listings", version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Clone, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Start the web server
    Serve(ServeArgs),
    /// Print available and adopted pets
    List(ListArgs),
    /// Create an empty pet document if none exists
    Init(InitArgs),
}

#[derive(Args)]
pub struct ServeArgs {
    /// TOML configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,
    /// Override the bind address
    #[arg(long)]
    pub bind: Option<SocketAddr>,
    /// Override the pet document path
    #[arg(long)]
    pub data_file: Option<PathBuf>,
}

#[derive(Args)]
pub struct ListArgs {
    #[arg(long, default_value = "pets.json")]
    pub data_file: PathBuf,
    #[arg(long, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Args)]
pub struct InitArgs {
    #[arg(long, default_value = "pets.json")]
    pub data_file: PathBuf,
}
