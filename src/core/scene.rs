use std::time::Duration;

use crossterm::event::KeyEvent;
use ratatui::Frame;

/// What the engine should do after a scene handled a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Stay,
    ToWorld,
    ToEditor,
    Quit,
}

/// A full-screen page of the client. The engine drives whichever scene has
/// focus with keys and frames, and drives every scene with ticks so
/// animations keep running off-screen.
pub trait Scene {
    fn handle_key(&mut self, key: KeyEvent) -> Transition;
    fn on_tick(&mut self, dt: Duration);
    fn render(&self, frame: &mut Frame);
}
