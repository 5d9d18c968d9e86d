use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};

#[derive(Clone, Debug, Parser)]
#[command(name = "apkscope", version = env!("CARGO_PKG_VERSION"), about, long_about = None, propagate_version = true)]
pub struct App {
    /// Configuration file (defaults to ./apkscope.toml when present)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// More log output; repeat for trace
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Print JSON records instead of tables
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    #[command(alias = "x", name = "extract", about = "Copy an installed package into the cache dir")]
    Extract { package: String },
    #[command(alias = "meta", name = "metadata", about = "Print package metadata")]
    Metadata { file: PathBuf },
    #[command(alias = "urls", name = "endpoints", about = "Print embedded URLs")]
    Endpoints { file: PathBuf },
    #[command(alias = "ent", name = "entropy", about = "Print the obfuscation verdict")]
    Entropy { file: PathBuf },
    #[command(alias = "ls", name = "entries", about = "List archive entries with sizes")]
    Entries { file: PathBuf },
    #[command(name = "serve", about = "Answer JSON-lines method calls on stdin/stdout")]
    Serve,
}
