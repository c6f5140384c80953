//! Lobby state: who we are, which room we are in, who we play against

use crate::networking::error::{TransportError, TransportResult};
use shared::protocol::{Color, PlayerInfo};
use std::fmt;
use std::str::FromStr;
use url::Url;

/// Length of a room join code
pub const JOIN_CODE_LEN: usize = 6;

/// Six ASCII letters or digits identifying a room, stored upper-case
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct JoinCode(String);

impl JoinCode {
    /// Parse a bare code; surrounding whitespace is ignored
    pub fn parse(input: &str) -> TransportResult<Self> {
        let code = input.trim();
        if code.len() == JOIN_CODE_LEN && code.chars().all(|c| c.is_ascii_alphanumeric()) {
            Ok(Self(code.to_ascii_uppercase()))
        } else {
            Err(TransportError::InvalidJoinCode {
                code: input.to_string(),
            })
        }
    }

    /// Parse either a bare code or a share link carrying `?code=XXXXXX`
    pub fn from_input(input: &str) -> TransportResult<Self> {
        match Url::parse(input.trim()) {
            Ok(link) => link
                .query_pairs()
                .find(|(key, _)| key == "code")
                .ok_or_else(|| TransportError::InvalidJoinCode {
                    code: input.to_string(),
                })
                .and_then(|(_, code)| Self::parse(&code)),
            Err(_) => Self::parse(input),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for JoinCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for JoinCode {
    type Err = TransportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_input(s)
    }
}

/// The room we are seated in
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomSession {
    pub room_id: String,
    /// Colour the local player plays
    pub color: Color,
    pub opponent: Option<PlayerInfo>,
}

/// Multiplayer session state
///
/// `room` is set when a create or join request is acknowledged and cleared
/// on leave.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MultiplayerSession {
    pub player_name: String,
    pub room: Option<RoomSession>,
}

impl MultiplayerSession {
    pub fn new(player_name: impl Into<String>) -> Self {
        Self {
            player_name: player_name.into(),
            room: None,
        }
    }

    pub fn is_in_room(&self) -> bool {
        self.room.is_some()
    }

    pub fn room_id(&self) -> Option<&str> {
        self.room.as_ref().map(|room| room.room_id.as_str())
    }

    pub fn color(&self) -> Option<Color> {
        self.room.as_ref().map(|room| room.color)
    }

    pub fn opponent(&self) -> Option<&PlayerInfo> {
        self.room.as_ref().and_then(|room| room.opponent.as_ref())
    }

    /// Share link for the current room on a web front end at `base`
    pub fn invite_link(&self, base: &str) -> Option<String> {
        let room_id = self.room_id()?;
        let mut link = Url::parse(base).ok()?;
        link.query_pairs_mut().clear().append_pair("code", room_id);
        Some(link.to_string())
    }
}
