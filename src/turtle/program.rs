//! Programs exported from the block editor: a JSON list of ops, with
//! `repeat` the only nesting construct. Programs are flattened up front so
//! the runner is a dumb cursor over primitive steps.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::core::direction::Direction;
use crate::turtle::session::TurtleSession;

/// Pause inserted after each movement step.
pub const STEP_PAUSE: Duration = Duration::from_millis(100);
/// Ceiling on the flattened step count; nested repeats multiply fast.
pub const MAX_STEPS: usize = 10_000;

#[derive(Debug, Error)]
pub enum ProgramError {
    #[error("failed to read program: {0}")]
    Io(#[from] std::io::Error),
    #[error("program is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("program expands to more than {MAX_STEPS} steps")]
    TooLong,
}

/// One editor block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "lowercase")]
pub enum TurtleOp {
    /// Step one cell.
    Move { direction: Direction },
    /// Hop several cells at once.
    Jump { count: u16, direction: Direction },
    /// Queue paint blocks.
    Load { count: u16, color: String },
    /// Paint the current cell with the next queued block.
    Drop,
    Repeat { times: u16, body: Vec<TurtleOp> },
}

/// A primitive step after repeat expansion.
#[derive(Debug, Clone, PartialEq)]
enum Step {
    Shift { direction: Direction, count: u16 },
    Load { count: u16, color: String },
    Paint,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TurtleProgram {
    ops: Vec<TurtleOp>,
}

impl TurtleProgram {
    pub fn new(ops: Vec<TurtleOp>) -> Self {
        Self { ops }
    }

    pub fn from_json(text: &str) -> Result<Self, ProgramError> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn from_file(path: &Path) -> Result<Self, ProgramError> {
        Self::from_json(&std::fs::read_to_string(path)?)
    }

    /// Expands repeats into a flat step list, refusing programs that blow
    /// past [`MAX_STEPS`].
    pub fn compile(&self) -> Result<ProgramRunner, ProgramError> {
        let mut steps = Vec::new();
        flatten(&self.ops, &mut steps)?;
        Ok(ProgramRunner { steps, cursor: 0 })
    }
}

fn flatten(ops: &[TurtleOp], out: &mut Vec<Step>) -> Result<(), ProgramError> {
    for op in ops {
        match op {
            TurtleOp::Move { direction } => out.push(Step::Shift {
                direction: *direction,
                count: 1,
            }),
            TurtleOp::Jump { count, direction } => out.push(Step::Shift {
                direction: *direction,
                count: *count,
            }),
            TurtleOp::Load { count, color } => out.push(Step::Load {
                count: *count,
                color: color.clone(),
            }),
            TurtleOp::Drop => out.push(Step::Paint),
            TurtleOp::Repeat { times, body } => {
                for _ in 0..*times {
                    flatten(body, out)?;
                }
            }
        }
        if out.len() > MAX_STEPS {
            return Err(ProgramError::TooLong);
        }
    }
    Ok(())
}

/// What applying one step did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// A movement ran; wait [`STEP_PAUSE`] before the next step.
    Moved,
    /// A non-movement step ran; keep going immediately.
    Ran,
    Finished,
}

/// Cursor over a compiled program. Stepping mutates the session in place.
#[derive(Debug, Clone, PartialEq)]
pub struct ProgramRunner {
    steps: Vec<Step>,
    cursor: usize,
}

impl ProgramRunner {
    pub fn step(&mut self, session: &mut TurtleSession) -> StepOutcome {
        let Some(step) = self.steps.get(self.cursor) else {
            return StepOutcome::Finished;
        };
        self.cursor += 1;
        match step {
            Step::Shift { direction, count } => {
                session.shift(*direction, *count);
                StepOutcome::Moved
            }
            Step::Load { count, color } => {
                session.load(*count, color);
                StepOutcome::Ran
            }
            Step::Paint => {
                session.drop_block();
                StepOutcome::Ran
            }
        }
    }

    pub fn finished(&self) -> bool {
        self.cursor >= self.steps.len()
    }

    pub fn remaining(&self) -> usize {
        self.steps.len() - self.cursor
    }

    /// Runs to completion, sleeping the step pause after each movement.
    pub async fn run(&mut self, session: &mut TurtleSession) {
        loop {
            match self.step(session) {
                StepOutcome::Moved => tokio::time::sleep(STEP_PAUSE).await,
                StepOutcome::Ran => {}
                StepOutcome::Finished => break,
            }
        }
    }
}

/// Headless entry point: load, compile, and run a program file against a
/// fresh board.
pub async fn run_file(path: &Path) -> Result<TurtleSession, ProgramError> {
    let program = TurtleProgram::from_file(path)?;
    let mut runner = program.compile()?;
    info!(path = %path.display(), steps = runner.remaining(), "running turtle program");
    let mut session = TurtleSession::new();
    runner.run(&mut session).await;
    Ok(session)
}
