//! The shared world scene: one map, every connected player's avatar on it.
//! Positions are server-authoritative; all this scene does is mirror them
//! and glide sprites toward each update.

use std::time::Duration;

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Span;
use ratatui::widgets::{Block, Paragraph};
use ratatui::Frame;
use tracing::{debug, trace};

use crate::core::connection::Outbox;
use crate::core::direction::Direction;
use crate::core::messages::ServerMessage;
use crate::core::players::PlayerRegistry;
use crate::core::scene::{Scene, Transition};
use crate::core::tween::Tween;

/// World units a single move command covers.
pub const MOVE_STEP: f32 = 20.0;
/// How long a sprite glides toward each authoritative position.
pub const TWEEN_DURATION: Duration = Duration::from_millis(200);
/// Sprite footprint kept fully inside the map when clamping.
pub const SPRITE_SIZE: f32 = 16.0;

const MAP_WIDTH: f32 = 800.0;
const MAP_HEIGHT: f32 = 600.0;

// World units per terminal cell. Cells are roughly twice as tall as wide, so
// the vertical scale is doubled to keep hops looking square.
const CELL_WIDTH: f32 = 10.0;
const CELL_HEIGHT: f32 = 20.0;

/// Map dimensions used for clamping move targets.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapBounds {
    pub width: f32,
    pub height: f32,
}

impl MapBounds {
    /// Clamps a position so the whole sprite stays on the map.
    pub fn clamp(&self, x: f32, y: f32) -> (f32, f32) {
        (
            x.clamp(0.0, (self.width - SPRITE_SIZE).max(0.0)),
            y.clamp(0.0, (self.height - SPRITE_SIZE).max(0.0)),
        )
    }
}

impl Default for MapBounds {
    fn default() -> Self {
        Self {
            width: MAP_WIDTH,
            height: MAP_HEIGHT,
        }
    }
}

pub struct WorldScene {
    players: PlayerRegistry,
    bounds: MapBounds,
    outbox: Outbox,
    /// True from the moment we send a move until our own glide finishes.
    /// While set, further input is dropped so commands cannot pile up.
    local_moving: bool,
}

impl WorldScene {
    pub fn new(outbox: Outbox) -> Self {
        Self::with_bounds(outbox, MapBounds::default())
    }

    pub fn with_bounds(outbox: Outbox, bounds: MapBounds) -> Self {
        Self {
            players: PlayerRegistry::new(),
            bounds,
            outbox,
            local_moving: false,
        }
    }

    pub fn players(&self) -> &PlayerRegistry {
        &self.players
    }

    pub fn move_pending(&self) -> bool {
        self.local_moving
    }

    /// Single dispatch point for everything the server pushes.
    pub fn handle_server(&mut self, msg: ServerMessage) {
        match msg {
            ServerMessage::SetPlayerId { id, x, y } => {
                self.players.set_local_id(&id);
                self.players.spawn(&id, x, y);
            }
            ServerMessage::AllPlayers { players } => {
                for player in players {
                    self.players.spawn(&player.id, player.x, player.y);
                }
            }
            ServerMessage::NewPlayer { id, x, y } => {
                self.players.spawn(&id, x, y);
            }
            ServerMessage::PlayerMoved { id, x, y } => self.update_player(&id, x, y),
            ServerMessage::PlayerLeft { id } => {
                self.players.remove(&id);
            }
            ServerMessage::Unknown => debug!("ignoring message of unknown type"),
        }
    }

    /// Reconciles one player against an authoritative position: face the raw
    /// displacement, then glide to the target clamped onto the map. An update
    /// for a player we never saw join spawns them in place.
    fn update_player(&mut self, id: &str, x: f32, y: f32) {
        if !self.players.contains(id) {
            self.players.spawn(id, x, y);
            return;
        }
        let (tx, ty) = self.bounds.clamp(x, y);
        if let Some(player) = self.players.get_mut(id) {
            player.facing = Some(Direction::from_displacement(x - player.x, y - player.y));
            player.tween = Some(Tween::new((player.x, player.y), (tx, ty), TWEEN_DURATION));
        }
    }

    /// Input path: send the move intent unless one is already in flight or
    /// the step would be swallowed by the map edge.
    fn try_move(&mut self, direction: Direction) {
        if self.local_moving {
            trace!(?direction, "move already in flight, key dropped");
            return;
        }
        let Some(local_id) = self.players.local_id() else {
            trace!("no identity yet, key dropped");
            return;
        };
        let Some(player) = self.players.get(local_id) else {
            return;
        };
        let (dx, dy) = direction.delta();
        let (tx, ty) = self.bounds.clamp(
            player.x + dx as f32 * MOVE_STEP,
            player.y + dy as f32 * MOVE_STEP,
        );
        if tx == player.x && ty == player.y {
            trace!(?direction, "move blocked by the map edge");
            return;
        }
        self.outbox.send_move(direction);
        self.local_moving = true;
    }
}

impl Scene for WorldScene {
    fn handle_key(&mut self, key: KeyEvent) -> Transition {
        match key.code {
            KeyCode::Left => self.try_move(Direction::Left),
            KeyCode::Right => self.try_move(Direction::Right),
            KeyCode::Up => self.try_move(Direction::Up),
            KeyCode::Down => self.try_move(Direction::Down),
            KeyCode::Char('e') | KeyCode::Tab => return Transition::ToEditor,
            KeyCode::Char('q') | KeyCode::Esc => return Transition::Quit,
            _ => {}
        }
        Transition::Stay
    }

    fn on_tick(&mut self, dt: Duration) {
        let mut completed = Vec::new();
        for (id, player) in self.players.iter_mut() {
            let Some(tween) = player.tween.as_mut() else {
                continue;
            };
            let (x, y) = tween.advance(dt);
            player.x = x;
            player.y = y;
            if tween.finished() {
                player.tween = None;
                player.facing = None;
                completed.push(id.clone());
            }
        }
        // Only our own glide finishing re-opens the input gate.
        if completed.iter().any(|id| self.players.is_local(id)) {
            self.local_moving = false;
        }
    }

    fn render(&self, frame: &mut Frame) {
        let area = frame.area();
        let status = match self.players.local_id() {
            Some(id) => format!(" {} | {} online ", id, self.players.len()),
            None => " joining... ".to_string(),
        };
        let block = Block::bordered()
            .title(status)
            .title_bottom(" arrows move | e editor | q quit ");
        let inner = block.inner(area);
        frame.render_widget(block, area);
        if inner.width == 0 || inner.height == 0 {
            return;
        }

        let (cam_x, cam_y) = match self.players.camera_target() {
            Some(target) => (target.x, target.y),
            None => (self.bounds.width / 2.0, self.bounds.height / 2.0),
        };

        for (id, player) in self.players.iter() {
            let col = ((player.x - cam_x) / CELL_WIDTH + inner.width as f32 / 2.0).round() as i32;
            let row = ((player.y - cam_y) / CELL_HEIGHT + inner.height as f32 / 2.0).round() as i32;
            if col < 0 || row < 0 || col >= inner.width as i32 || row >= inner.height as i32 {
                continue;
            }
            let local = self.players.is_local(id);
            let glyph = match player.facing {
                Some(direction) => direction.glyph(),
                None if local => '@',
                None => 'o',
            };
            let style = if local {
                Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::Cyan)
            };
            let cell = Rect::new(inner.x + col as u16, inner.y + row as u16, 1, 1);
            frame.render_widget(Paragraph::new(Span::styled(glyph.to_string(), style)), cell);
        }
    }
}
