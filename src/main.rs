use std::path::Path;

use anyhow::Result;
use clap::Parser;
use tracing::error;
use tracing_subscriber::EnvFilter;

use gridling::cli::{Cli, Command};
use gridling::core::connection::Connection;
use gridling::core::engine::Engine;
use gridling::turtle::program;
use gridling::turtle::session::{TurtleSession, BOARD_SIZE};

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr; stdout belongs to the terminal UI. Quiet unless
    // RUST_LOG says otherwise.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("error"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command.unwrap_or_default() {
        Command::Play { url, program } => play(&url, program.as_deref()).await,
        Command::Run { program } => run_headless(&program).await,
    }
}

async fn play(url: &str, program: Option<&Path>) -> Result<()> {
    let connection = Connection::connect(url).await?;
    let engine = Engine::new(connection, program.map(Path::to_path_buf));

    let terminal = ratatui::init();
    let result = engine.run(terminal).await;
    ratatui::restore();
    result
}

async fn run_headless(path: &Path) -> Result<()> {
    match program::run_file(path).await {
        Ok(session) => {
            print_board(&session);
            Ok(())
        }
        Err(err) => {
            error!(%err, path = %path.display(), "turtle program aborted");
            std::process::exit(1);
        }
    }
}

fn print_board(session: &TurtleSession) {
    for row in 1..=BOARD_SIZE {
        let mut line = String::with_capacity(BOARD_SIZE as usize * 2);
        for col in 1..=BOARD_SIZE {
            let cell = if session.position() == (col, row) {
                '@'
            } else if session.color_at(col, row).is_some() {
                '#'
            } else {
                '.'
            };
            line.push(cell);
            line.push(' ');
        }
        println!("{}", line.trim_end());
    }
    println!("turtle at {:?}, {} cells painted", session.position(), session.painted().len());
}
