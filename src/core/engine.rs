//! Event loop gluing the terminal, the socket, and the scenes together.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::event::{self, Event, KeyEventKind};
use ratatui::DefaultTerminal;
use tokio::time;
use tracing::info;

use crate::core::connection::Connection;
use crate::core::scene::{Scene, Transition};
use crate::core::world::WorldScene;
use crate::turtle::editor::EditorScene;

/// Tick period driving glides and turtle program stepping.
pub const TICK: Duration = Duration::from_millis(33);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Focus {
    World,
    Editor,
}

pub struct Engine {
    connection: Connection,
    world: WorldScene,
    editor: EditorScene,
    focus: Focus,
    connected: bool,
}

impl Engine {
    pub fn new(connection: Connection, program: Option<PathBuf>) -> Self {
        let world = WorldScene::new(connection.outbox());
        Self {
            connection,
            world,
            editor: EditorScene::new(program),
            focus: Focus::World,
            connected: true,
        }
    }

    pub async fn run(mut self, mut terminal: DefaultTerminal) -> Result<()> {
        let mut ticker = time::interval(TICK);
        let mut last_tick = Instant::now();

        loop {
            terminal.draw(|frame| match self.focus {
                Focus::World => self.world.render(frame),
                Focus::Editor => self.editor.render(frame),
            })?;

            // INPUT (non-blocking)
            match self.poll_key()? {
                Some(Transition::Quit) => break,
                Some(Transition::ToWorld) => self.focus = Focus::World,
                Some(Transition::ToEditor) => self.focus = Focus::Editor,
                Some(Transition::Stay) | None => {}
            }

            tokio::select! {
                // RECEIVE: everything the server pushes goes to the world,
                // focused or not.
                msg = self.connection.next_message(), if self.connected => match msg {
                    Some(msg) => self.world.handle_server(msg),
                    None => {
                        info!("connection lost, world is frozen");
                        self.connected = false;
                    }
                },

                // TICK: both scenes advance so glides and turtle runs keep
                // going while the other scene has focus.
                _ = ticker.tick() => {
                    let dt = last_tick.elapsed();
                    last_tick = Instant::now();
                    self.world.on_tick(dt);
                    self.editor.on_tick(dt);
                }
            }
        }

        Ok(())
    }

    /// Polls the keyboard without blocking and routes the key to whichever
    /// scene has focus.
    fn poll_key(&mut self) -> Result<Option<Transition>> {
        if !event::poll(Duration::ZERO)? {
            return Ok(None);
        }
        let Event::Key(key) = event::read()? else {
            return Ok(None);
        };
        if key.kind != KeyEventKind::Press {
            return Ok(None);
        }
        let transition = match self.focus {
            Focus::World => self.world.handle_key(key),
            Focus::Editor => self.editor.handle_key(key),
        };
        Ok(Some(transition))
    }
}
