pub mod cli;

pub mod core {
    pub mod connection;
    pub mod direction;
    pub mod engine;
    pub mod messages;
    pub mod players;
    pub mod scene;
    pub mod tween;
    pub mod world;
}

pub mod turtle {
    pub mod editor;
    pub mod program;
    pub mod session;
}

// Re-export for convenience
pub use crate::core::connection::{Connection, Outbox};
pub use crate::core::engine::Engine;
pub use crate::core::scene::{Scene, Transition};
pub use crate::core::world::WorldScene;
pub use crate::turtle::editor::EditorScene;
