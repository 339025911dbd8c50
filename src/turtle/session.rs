use std::collections::{HashMap, VecDeque};

use tracing::debug;

use crate::core::direction::Direction;

/// Cells per side of the square board. Coordinates are 1-based.
pub const BOARD_SIZE: u16 = 25;
/// Where the turtle starts and returns to on reset.
pub const START_CELL: (u16, u16) = (13, 13);

/// All state for one turtle board: the turtle's cell plus everything loaded
/// and painted so far.
#[derive(Debug, Clone, PartialEq)]
pub struct TurtleSession {
    col: u16,
    row: u16,
    queue: VecDeque<String>,
    painted: HashMap<(u16, u16), String>,
}

impl Default for TurtleSession {
    fn default() -> Self {
        Self::new()
    }
}

impl TurtleSession {
    pub fn new() -> Self {
        Self {
            col: START_CELL.0,
            row: START_CELL.1,
            queue: VecDeque::new(),
            painted: HashMap::new(),
        }
    }

    /// Current cell as (col, row), both in 1..=BOARD_SIZE.
    pub fn position(&self) -> (u16, u16) {
        (self.col, self.row)
    }

    /// How many paint blocks are queued.
    pub fn loaded(&self) -> usize {
        self.queue.len()
    }

    /// Color of the block that would be dropped next.
    pub fn next_color(&self) -> Option<&str> {
        self.queue.front().map(String::as_str)
    }

    pub fn painted(&self) -> &HashMap<(u16, u16), String> {
        &self.painted
    }

    pub fn color_at(&self, col: u16, row: u16) -> Option<&str> {
        self.painted.get(&(col, row)).map(String::as_str)
    }

    /// Moves `count` cells in one hop. The landing cell is clamped to the
    /// board, so walking off an edge parks the turtle on it.
    pub fn shift(&mut self, direction: Direction, count: u16) {
        let (dx, dy) = direction.delta();
        self.col = clamp_axis(self.col as i32 + dx * count as i32);
        self.row = clamp_axis(self.row as i32 + dy * count as i32);
    }

    /// Queues `count` blocks of `color` behind whatever is already loaded.
    pub fn load(&mut self, count: u16, color: &str) {
        for _ in 0..count {
            self.queue.push_back(color.to_string());
        }
        debug!(count, %color, loaded = self.queue.len(), "blocks loaded");
    }

    /// Paints the current cell with the next queued block. With nothing
    /// loaded this does nothing.
    pub fn drop_block(&mut self) {
        if let Some(color) = self.queue.pop_front() {
            self.painted.insert((self.col, self.row), color);
        }
    }

    /// Back to the starting state: a centered turtle on a clean board.
    pub fn reset(&mut self) {
        *self = Self::new();
    }
}

fn clamp_axis(v: i32) -> u16 {
    v.clamp(1, BOARD_SIZE as i32) as u16
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_centered_with_nothing_loaded() {
        let session = TurtleSession::new();
        assert_eq!(session.position(), START_CELL);
        assert_eq!(session.loaded(), 0);
        assert!(session.painted().is_empty());
    }

    #[test]
    fn shifts_move_in_screen_coordinates() {
        let mut session = TurtleSession::new();
        session.shift(Direction::Right, 3);
        assert_eq!(session.position(), (16, 13));
        session.shift(Direction::Up, 2);
        assert_eq!(session.position(), (16, 11));
        session.shift(Direction::Left, 1);
        session.shift(Direction::Down, 1);
        assert_eq!(session.position(), (15, 12));
    }

    #[test]
    fn shifts_clamp_to_the_board_edges() {
        let mut session = TurtleSession::new();
        session.shift(Direction::Left, 100);
        assert_eq!(session.position(), (1, 13));
        session.shift(Direction::Down, 100);
        assert_eq!(session.position(), (1, 25));
        // A hop that would overshoot still lands on the edge cell.
        session.shift(Direction::Right, 30);
        assert_eq!(session.position(), (25, 25));
    }

    #[test]
    fn blocks_paint_in_load_order() {
        let mut session = TurtleSession::new();
        session.load(2, "red");
        session.load(1, "blue");
        assert_eq!(session.loaded(), 3);
        assert_eq!(session.next_color(), Some("red"));

        session.drop_block();
        session.shift(Direction::Right, 1);
        session.drop_block();
        session.shift(Direction::Right, 1);
        session.drop_block();

        assert_eq!(session.color_at(13, 13), Some("red"));
        assert_eq!(session.color_at(14, 13), Some("red"));
        assert_eq!(session.color_at(15, 13), Some("blue"));
        assert_eq!(session.loaded(), 0);
    }

    #[test]
    fn dropping_with_an_empty_queue_paints_nothing() {
        let mut session = TurtleSession::new();
        session.drop_block();
        assert!(session.painted().is_empty());
    }

    #[test]
    fn repainting_a_cell_takes_the_newest_color() {
        let mut session = TurtleSession::new();
        session.load(1, "red");
        session.load(1, "green");
        session.drop_block();
        session.drop_block();
        assert_eq!(session.color_at(13, 13), Some("green"));
        assert_eq!(session.painted().len(), 1);
    }

    #[test]
    fn reset_restores_the_starting_state() {
        let mut session = TurtleSession::new();
        session.load(3, "red");
        session.shift(Direction::Up, 5);
        session.drop_block();
        session.reset();
        assert_eq!(session, TurtleSession::new());
    }
}
