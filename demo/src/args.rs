use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;

/// Faultline demo service
#[derive(Debug, Parser)]
#[command(name = "faultline-demo", about = "Demo user API with centralized error handling")]
pub struct Args {
    /// Path to configuration file (defaults to `faultline.toml` when present)
    #[arg(short, long, env = "FAULTLINE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Override the listen address
    #[arg(long, env = "FAULTLINE_LISTEN")]
    pub listen: Option<SocketAddr>,
}

impl Args {
    /// Config file to load, if any
    ///
    /// An explicit path is always returned; the default path only when the
    /// file exists.
    pub fn config_path(&self) -> Option<PathBuf> {
        match &self.config {
            Some(path) => Some(path.clone()),
            None => {
                let default = PathBuf::from("faultline.toml");
                default.exists().then_some(default)
            }
        }
    }
}
