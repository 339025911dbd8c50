use std::collections::HashMap;

use tracing::{debug, info, warn};

use crate::core::direction::Direction;
use crate::core::tween::Tween;

/// One avatar in the shared world.
#[derive(Debug, Clone, PartialEq)]
pub struct Player {
    pub x: f32,
    pub y: f32,
    /// Facing while a glide is in progress; `None` when standing still.
    pub facing: Option<Direction>,
    pub tween: Option<Tween>,
}

impl Player {
    fn at(x: f32, y: f32) -> Self {
        Self {
            x,
            y,
            facing: None,
            tween: None,
        }
    }
}

/// Every connected player keyed by server-assigned id, plus which of them is
/// us and which one the camera follows.
#[derive(Debug, Default)]
pub struct PlayerRegistry {
    players: HashMap<String, Player>,
    local_id: Option<String>,
    camera: Option<String>,
}

impl PlayerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the server-assigned identity. The id is set once per session;
    /// repeat assignments are logged and dropped.
    pub fn set_local_id(&mut self, id: &str) {
        match &self.local_id {
            Some(current) if current == id => {}
            Some(current) => {
                warn!(%current, rejected = %id, "ignoring repeated identity assignment");
            }
            None => {
                info!(%id, "local player id assigned");
                self.local_id = Some(id.to_string());
            }
        }
    }

    pub fn local_id(&self) -> Option<&str> {
        self.local_id.as_deref()
    }

    pub fn is_local(&self, id: &str) -> bool {
        self.local_id.as_deref() == Some(id)
    }

    /// Adds a player if absent. Duplicate spawns (roster overlap, replayed
    /// joins) leave the existing avatar untouched. Returns whether anything
    /// was inserted.
    pub fn spawn(&mut self, id: &str, x: f32, y: f32) -> bool {
        if self.players.contains_key(id) {
            debug!(%id, "player already present, spawn skipped");
            return false;
        }
        self.players.insert(id.to_string(), Player::at(x, y));
        if self.is_local(id) {
            self.camera = Some(id.to_string());
            info!(%id, x, y, "local player spawned, camera following");
        } else {
            debug!(%id, x, y, "remote player spawned");
        }
        true
    }

    /// Removes a player. Unknown ids are a no-op; the server may announce a
    /// departure we never saw join.
    pub fn remove(&mut self, id: &str) -> bool {
        if self.players.remove(id).is_none() {
            debug!(%id, "departure for unknown player ignored");
            return false;
        }
        if self.camera.as_deref() == Some(id) {
            self.camera = None;
        }
        info!(%id, "player left");
        true
    }

    pub fn get(&self, id: &str) -> Option<&Player> {
        self.players.get(id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut Player> {
        self.players.get_mut(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.players.contains_key(id)
    }

    /// The player the viewport is centered on, if any.
    pub fn camera_target(&self) -> Option<&Player> {
        self.camera.as_ref().and_then(|id| self.players.get(id))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Player)> {
        self.players.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&String, &mut Player)> {
        self.players.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }
}
