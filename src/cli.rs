use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Endpoint a local world server listens on by default.
pub const DEFAULT_URL: &str = "ws://127.0.0.1:8081/ws";

#[derive(Debug, Parser)]
#[command(name = "gridling")]
#[command(about = "Terminal client for a shared grid world, turtle board included")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Join a world server
    Play {
        /// WebSocket endpoint of the world server
        #[arg(short, long, default_value = DEFAULT_URL)]
        url: String,

        /// Turtle program to have ready on the board
        #[arg(short, long, value_name = "FILE")]
        program: Option<PathBuf>,
    },
    /// Run a turtle program without a server and print the final board
    Run {
        /// Program file, a JSON list of ops
        #[arg(value_name = "FILE")]
        program: PathBuf,
    },
}

impl Default for Command {
    fn default() -> Self {
        Command::Play {
            url: DEFAULT_URL.to_string(),
            program: None,
        }
    }
}
