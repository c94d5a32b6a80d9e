use std::path::PathBuf;

use clap::Parser;

/// Storyloom picture-book gateway
#[derive(Debug, Parser)]
#[command(name = "storyloom", about = "Picture-book generation and narration gateway")]
pub struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "storyloom.toml", env = "STORYLOOM_CONFIG")]
    pub config: PathBuf,

    /// Override the listen address
    #[arg(long, env = "STORYLOOM_LISTEN")]
    pub listen: Option<std::net::SocketAddr>,
}
