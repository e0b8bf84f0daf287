pub mod check_db;
pub mod serve;
pub mod slugify;

use crate::Config;
use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

const DEFAULT_CONFIG: &str = "codao.toml";

#[derive(Parser)]
#[command(name = "codao")]
#[command(version)]
#[command(about = "Server for the Bánh Tằm Cô Đào ordering site", long_about = None)]
pub struct Cli {
    /// Config file; when omitted, codao.toml is used if present.
    #[arg(short, long, env = "CODAO_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

impl Cli {
    pub fn load_config(&self) -> Result<Config> {
        match &self.config {
            Some(path) => Config::load(path, true),
            None => Config::load(Path::new(DEFAULT_CONFIG), false),
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the web server
    Serve {
        #[arg(short = 'H', long)]
        host: Option<String>,
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Print the slug for each argument
    Slugify {
        #[arg(required = true)]
        text: Vec<String>,
    },
    /// Check that the database is reachable
    CheckDb,
}
