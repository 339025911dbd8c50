//! The turtle board scene: load a block-editor export and watch it paint.

use std::path::PathBuf;
use std::time::Duration;

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph};
use ratatui::Frame;
use tracing::warn;

use crate::core::scene::{Scene, Transition};
use crate::turtle::program::{ProgramRunner, StepOutcome, TurtleProgram, STEP_PAUSE};
use crate::turtle::session::{TurtleSession, BOARD_SIZE};

pub struct EditorScene {
    session: TurtleSession,
    program_path: Option<PathBuf>,
    runner: Option<ProgramRunner>,
    /// Time left before the runner may take its next step.
    pause: Duration,
    status: String,
}

impl EditorScene {
    pub fn new(program_path: Option<PathBuf>) -> Self {
        let status = match &program_path {
            Some(path) => format!("press r to run {}", path.display()),
            None => "no program loaded (start with --program)".to_string(),
        };
        Self {
            session: TurtleSession::new(),
            program_path,
            runner: None,
            pause: Duration::ZERO,
            status,
        }
    }

    pub fn running(&self) -> bool {
        self.runner.is_some()
    }

    pub fn session(&self) -> &TurtleSession {
        &self.session
    }

    /// Reloads the program file and starts it from its first step. The board
    /// is left as-is, programs run against whatever state is already there.
    fn start_run(&mut self) {
        let Some(path) = self.program_path.clone() else {
            self.status = "no program loaded (start with --program)".to_string();
            return;
        };
        match TurtleProgram::from_file(&path).and_then(|program| program.compile()) {
            Ok(runner) => {
                self.status = format!("running ({} steps)", runner.remaining());
                self.pause = Duration::ZERO;
                self.runner = Some(runner);
            }
            Err(err) => {
                warn!(%err, path = %path.display(), "turtle program rejected");
                self.status = err.to_string();
            }
        }
    }

    #[cfg(test)]
    fn install_runner(&mut self, runner: ProgramRunner) {
        self.pause = Duration::ZERO;
        self.runner = Some(runner);
    }
}

impl Scene for EditorScene {
    fn handle_key(&mut self, key: KeyEvent) -> Transition {
        match key.code {
            KeyCode::Char('r') => self.start_run(),
            // Reset parks the turtle and clears the board, but a running
            // program keeps going from the reset state.
            KeyCode::Char('x') => {
                self.session.reset();
                self.status = "board reset".to_string();
            }
            KeyCode::Char('e') | KeyCode::Tab | KeyCode::Esc => return Transition::ToWorld,
            KeyCode::Char('q') => return Transition::Quit,
            _ => {}
        }
        Transition::Stay
    }

    fn on_tick(&mut self, dt: Duration) {
        if self.runner.is_none() {
            return;
        }
        if self.pause > dt {
            self.pause -= dt;
            return;
        }
        self.pause = Duration::ZERO;
        let mut finished = false;
        if let Some(runner) = self.runner.as_mut() {
            loop {
                match runner.step(&mut self.session) {
                    StepOutcome::Moved => {
                        self.pause = STEP_PAUSE;
                        break;
                    }
                    StepOutcome::Ran => {}
                    StepOutcome::Finished => {
                        finished = true;
                        break;
                    }
                }
            }
        }
        if finished {
            self.runner = None;
            self.status = "program finished".to_string();
        }
    }

    fn render(&self, frame: &mut Frame) {
        let area = frame.area();
        let block = Block::bordered()
            .title(" turtle board ")
            .title_bottom(" r run | x reset | e world | q quit ");
        let inner = block.inner(area);
        frame.render_widget(block, area);
        if inner.width == 0 || inner.height == 0 {
            return;
        }

        let mut lines = Vec::with_capacity(BOARD_SIZE as usize + 2);
        for row in 1..=BOARD_SIZE {
            let mut spans = Vec::with_capacity(BOARD_SIZE as usize);
            for col in 1..=BOARD_SIZE {
                let turtle_here = self.session.position() == (col, row);
                let span = match (turtle_here, self.session.color_at(col, row)) {
                    (true, Some(color)) => Span::styled(
                        "@ ",
                        Style::default().fg(Color::Black).bg(parse_color(color)),
                    ),
                    (true, None) => Span::styled(
                        "@ ",
                        Style::default()
                            .fg(Color::Green)
                            .add_modifier(Modifier::BOLD),
                    ),
                    (false, Some(color)) => {
                        Span::styled("  ", Style::default().bg(parse_color(color)))
                    }
                    (false, None) => Span::styled(". ", Style::default().fg(Color::DarkGray)),
                };
                spans.push(span);
            }
            lines.push(Line::from(spans));
        }

        let inventory = match self.session.next_color() {
            Some(color) => format!("{} blocks loaded, next {}", self.session.loaded(), color),
            None => "no blocks loaded".to_string(),
        };
        lines.push(Line::raw(""));
        lines.push(Line::raw(format!("{} | {}", self.status, inventory)));
        frame.render_widget(Paragraph::new(lines), inner);
    }
}

/// Maps an editor color to a terminal color. Names ratatui knows and
/// `#rrggbb` hex pass straight through. A few extra palette names are mapped
/// by hand, and anything unrecognized paints white.
fn parse_color(name: &str) -> Color {
    match name.to_ascii_lowercase().as_str() {
        "orange" => Color::Rgb(255, 165, 0),
        "purple" => Color::Magenta,
        "pink" => Color::Rgb(255, 105, 180),
        other => other.parse().unwrap_or(Color::White),
    }
}
