//! Wire format shared with the position-sync server. Everything is a small
//! JSON object tagged by a `type` field.

use serde::{Deserialize, Serialize};

use crate::core::direction::Direction;

/// One roster entry inside an `allplayers` frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerInfo {
    pub id: String,
    pub x: f32,
    pub y: f32,
}

/// Everything the server can push at us.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ServerMessage {
    /// Our identity for this session, with an optional spawn point.
    #[serde(rename = "setPlayerId")]
    SetPlayerId {
        id: String,
        #[serde(default)]
        x: f32,
        #[serde(default)]
        y: f32,
    },
    /// Snapshot of everyone already connected, sent once after joining.
    #[serde(rename = "allplayers")]
    AllPlayers {
        #[serde(default)]
        players: Vec<PlayerInfo>,
    },
    #[serde(rename = "newplayer")]
    NewPlayer { id: String, x: f32, y: f32 },
    /// Authoritative position after the server applied someone's move.
    #[serde(rename = "playerMoved")]
    PlayerMoved { id: String, x: f32, y: f32 },
    #[serde(rename = "playerLeft")]
    PlayerLeft { id: String },
    /// Message types added server-side after this build; logged and dropped.
    #[serde(other)]
    Unknown,
}

/// Everything we send. Movement intent only, the server owns positions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ClientMessage {
    Move { direction: Direction },
}

pub fn decode(frame: &str) -> Result<ServerMessage, serde_json::Error> {
    serde_json::from_str(frame)
}

pub fn encode(msg: &ClientMessage) -> Result<String, serde_json::Error> {
    serde_json::to_string(msg)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_set_player_id_with_spawn_point() {
        let msg = decode(r#"{"type":"setPlayerId","id":"player-1","x":100,"y":150}"#).unwrap();
        assert_eq!(
            msg,
            ServerMessage::SetPlayerId {
                id: "player-1".into(),
                x: 100.0,
                y: 150.0,
            }
        );
    }

    #[test]
    fn set_player_id_spawn_point_defaults_to_origin() {
        let msg = decode(r#"{"type":"setPlayerId","id":"player-7"}"#).unwrap();
        assert_eq!(
            msg,
            ServerMessage::SetPlayerId {
                id: "player-7".into(),
                x: 0.0,
                y: 0.0,
            }
        );
    }

    #[test]
    fn decodes_roster() {
        let msg = decode(
            r#"{"type":"allplayers","players":[{"id":"player-1","x":100,"y":100},{"id":"player-2","x":150,"y":100}]}"#,
        )
        .unwrap();
        let ServerMessage::AllPlayers { players } = msg else {
            panic!("wrong variant");
        };
        assert_eq!(players.len(), 2);
        assert_eq!(players[0].id, "player-1");
        assert_eq!(players[1].x, 150.0);
    }

    #[test]
    fn roster_without_players_field_is_empty() {
        let msg = decode(r#"{"type":"allplayers"}"#).unwrap();
        assert_eq!(msg, ServerMessage::AllPlayers { players: vec![] });
    }

    #[test]
    fn decodes_movement_and_departure() {
        assert_eq!(
            decode(r#"{"type":"playerMoved","id":"player-2","x":120,"y":100}"#).unwrap(),
            ServerMessage::PlayerMoved {
                id: "player-2".into(),
                x: 120.0,
                y: 100.0,
            }
        );
        assert_eq!(
            decode(r#"{"type":"playerLeft","id":"player-2"}"#).unwrap(),
            ServerMessage::PlayerLeft {
                id: "player-2".into(),
            }
        );
    }

    #[test]
    fn unknown_type_is_tolerated() {
        let msg = decode(r#"{"type":"serverShutdown","reason":"maintenance"}"#).unwrap();
        assert_eq!(msg, ServerMessage::Unknown);
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(decode("{not json").is_err());
        assert!(decode(r#"{"type":"playerMoved","id":42}"#).is_err());
    }

    #[test]
    fn encodes_move_exactly_as_the_server_parses_it() {
        let json = encode(&ClientMessage::Move {
            direction: Direction::Left,
        })
        .unwrap();
        assert_eq!(json, r#"{"type":"move","direction":"left"}"#);
    }

    #[test]
    fn every_direction_serializes_lowercase() {
        for (direction, expected) in [
            (Direction::Left, "left"),
            (Direction::Right, "right"),
            (Direction::Up, "up"),
            (Direction::Down, "down"),
        ] {
            let json = encode(&ClientMessage::Move { direction }).unwrap();
            assert!(json.contains(&format!(r#""direction":"{expected}""#)));
        }
    }
}
