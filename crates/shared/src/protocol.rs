//! Wire protocol shared by the chess client and the relay server
//!
//! Every frame is a JSON text message. Client frames wrap a [`ClientEvent`]
//! and optionally carry an acknowledgement id; the server answers acknowledged
//! frames with [`ServerFrame::Ack`] and pushes room events with
//! [`ServerFrame::Event`].
//!
//! # Events
//!
//! | direction | event | payload | ack payload |
//! |---|---|---|---|
//! | client → server | `create-game` | [`CreateGamePayload`] | room id |
//! | client → server | `join-game` | [`JoinGamePayload`] | [`PlayerInfo`] of the host |
//! | client → server | `leave-game` | [`LeaveGamePayload`] | none |
//! | client → server | `make-move` | [`MakeMovePayload`] | not acknowledged |
//! | server → client | `opponent-connected` | [`PlayerInfo`] | |
//! | server → client | `opponent-disconnected` | none | |
//! | server → client | `make-move` | [`WireMove`] | |
//!
//! # Example frames
//!
//! ```text
//! {"ack":1,"message":{"event":"create-game","payload":{"color":"w","name":"ana"}}}
//! {"kind":"ack","id":1,"success":true,"payload":"ROOM42"}
//! {"kind":"event","message":{"event":"make-move","payload":{"from":"e7","to":"e5"}}}
//! ```

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Side of the board, encoded as `"w"` / `"b"` on the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Color {
    #[serde(rename = "w")]
    White,
    #[serde(rename = "b")]
    Black,
}

impl Color {
    /// The other side
    pub fn opposite(self) -> Self {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Color::White => "White",
            Color::Black => "Black",
        }
    }
}

/// Display name and seat of a participant
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerInfo {
    pub name: String,
    pub color: Color,
}

/// A move as it travels between clients
///
/// Squares use algebraic notation (`"e2"`). The promotion letter is
/// upper-case for white and lower-case for black.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireMove {
    pub from: String,
    pub to: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub promotion_piece: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateGamePayload {
    pub color: Color,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JoinGamePayload {
    pub room_id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaveGamePayload {
    pub room_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MakeMovePayload {
    #[serde(rename = "move")]
    pub mv: WireMove,
    pub room_id: String,
}

/// Requests sent by the client
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "payload", rename_all = "kebab-case")]
pub enum ClientEvent {
    CreateGame(CreateGamePayload),
    JoinGame(JoinGamePayload),
    LeaveGame(LeaveGamePayload),
    MakeMove(MakeMovePayload),
}

impl ClientEvent {
    /// Event name as it appears on the wire
    pub fn name(&self) -> &'static str {
        match self {
            ClientEvent::CreateGame(_) => "create-game",
            ClientEvent::JoinGame(_) => "join-game",
            ClientEvent::LeaveGame(_) => "leave-game",
            ClientEvent::MakeMove(_) => "make-move",
        }
    }
}

/// Outbound frame: an event plus the acknowledgement id the server echoes back
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientFrame {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ack: Option<u64>,
    pub message: ClientEvent,
}

/// Events pushed by the server to the members of a room
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "payload", rename_all = "kebab-case")]
pub enum ServerEvent {
    OpponentConnected(PlayerInfo),
    OpponentDisconnected,
    MakeMove(WireMove),
}

/// Inbound frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ServerFrame {
    /// Reply to an acknowledged client frame
    Ack {
        id: u64,
        success: bool,
        #[serde(default)]
        payload: Value,
    },
    Event { message: ServerEvent },
}
