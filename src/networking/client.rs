//! Multiplayer game client
//!
//! [`GameClient`] glues a [`GameSession`] to a [`TransportQueue`]:
//! - locally committed moves are sent as `make-move` while in a room
//! - inbound frames are parsed, acks resolved and room events applied
//! - lobby requests (create, join, leave) update [`MultiplayerSession`]
//!
//! Everything runs on the caller's thread. Ack callbacks and status bus
//! subscribers only push into channels; the client drains them after each
//! call so state changes happen in one place.
//!
//! # Notices
//!
//! Things the front end should show the user are collected as
//! [`ClientNotice`]s and handed out by [`GameClient::take_notices`].
//! Failed requests become notices too; none of them change local state.
//! Room state only changes once the server has acknowledged the request,
//! leaving included.

use crate::game::resources::{ChessEngine, GameStatus, MoveOracle, TerminalState};
use crate::game::systems::{BoardInput, InteractionOutcome};
use crate::game::types::{Color, Move};
use crate::game::GameSession;
use crate::input::pointer::BoardRect;
use crate::networking::error::{AckError, TransportError, TransportResult};
use crate::networking::lobby::{JoinCode, MultiplayerSession, RoomSession};
use crate::networking::queue::{Link, TransportQueue};
use crate::networking::socket::LinkEvent;
use serde::de::IgnoredAny;
use shared::protocol::{
    ClientEvent, CreateGamePayload, JoinGamePayload, LeaveGamePayload, MakeMovePayload,
    PlayerInfo, ServerEvent, ServerFrame,
};
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};
use tracing::{debug, info, warn};

/// Something the user should be told about
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientNotice {
    Connected,
    Disconnected,
    RoomCreated { room_id: String, color: Color },
    JoinedRoom { room_id: String, host: PlayerInfo },
    LeftRoom,
    OpponentJoined(PlayerInfo),
    OpponentLeft,
    OpponentMoved(Move),
    GameOver(GameStatus),
    /// An acknowledged request came back unsuccessful
    RequestFailed { action: &'static str, reason: String },
}

/// Ack results funnelled back from the queue's callbacks
#[derive(Debug)]
enum LobbyReply {
    Created {
        color: Color,
        result: Result<String, AckError>,
    },
    Joined {
        room_id: String,
        result: Result<PlayerInfo, AckError>,
    },
    Left {
        room_id: String,
        result: Result<IgnoredAny, AckError>,
    },
}

pub struct GameClient<L: Link, O: MoveOracle = ChessEngine> {
    queue: TransportQueue<L>,
    game: GameSession<O>,
    lobby: MultiplayerSession,
    replies_tx: UnboundedSender<LobbyReply>,
    replies_rx: UnboundedReceiver<LobbyReply>,
    status_rx: UnboundedReceiver<(TerminalState, Color)>,
    notices: Vec<ClientNotice>,
}

impl<L: Link> GameClient<L> {
    pub fn new(link: L, board: BoardRect, player_name: impl Into<String>) -> Self {
        Self::with_session(link, GameSession::new(board), player_name)
    }
}

impl<L: Link, O: MoveOracle> GameClient<L, O> {
    /// Client around an existing session, keeping its oracle
    pub fn with_session(link: L, mut game: GameSession<O>, player_name: impl Into<String>) -> Self {
        let (status_tx, status_rx) = unbounded_channel();
        game.subscribe_status(move |state, to_move_next| {
            let _ = status_tx.send((state, to_move_next));
        });
        let (replies_tx, replies_rx) = unbounded_channel();

        Self {
            queue: TransportQueue::new(link),
            game,
            lobby: MultiplayerSession::new(player_name),
            replies_tx,
            replies_rx,
            status_rx,
            notices: Vec::new(),
        }
    }

    pub fn game(&self) -> &GameSession<O> {
        &self.game
    }

    pub fn game_mut(&mut self) -> &mut GameSession<O> {
        &mut self.game
    }

    pub fn lobby(&self) -> &MultiplayerSession {
        &self.lobby
    }

    pub fn queue(&self) -> &TransportQueue<L> {
        &self.queue
    }

    /// Notices collected since the last call
    pub fn take_notices(&mut self) -> Vec<ClientNotice> {
        std::mem::take(&mut self.notices)
    }

    /// Ask the server for a new room, seated as `color`
    pub fn create_game(&mut self, color: Color) -> TransportResult<()> {
        info!("[LOBBY] Creating game as {}", color.name());
        let replies = self.replies_tx.clone();
        self.queue.emit_with_ack::<String, _>(
            ClientEvent::CreateGame(CreateGamePayload {
                color,
                name: self.lobby.player_name.clone(),
            }),
            move |result| {
                let _ = replies.send(LobbyReply::Created { color, result });
            },
        )?;
        Ok(())
    }

    /// Join the room behind `code`; our colour is the opposite of the host's
    pub fn join_game(&mut self, code: &JoinCode) -> TransportResult<()> {
        info!("[LOBBY] Joining room {}", code);
        let room_id = code.to_string();
        let replies = self.replies_tx.clone();
        self.queue.emit_with_ack::<PlayerInfo, _>(
            ClientEvent::JoinGame(JoinGamePayload {
                room_id: room_id.clone(),
                name: self.lobby.player_name.clone(),
            }),
            move |result| {
                let _ = replies.send(LobbyReply::Joined { room_id, result });
            },
        )?;
        Ok(())
    }

    /// Ask to leave the current room
    ///
    /// The room, seat and board stay as they are until the server
    /// acknowledges; a rejected leave only produces a notice.
    pub fn leave_game(&mut self) -> TransportResult<()> {
        let Some(room_id) = self.lobby.room_id().map(str::to_string) else {
            debug!("[LOBBY] Leave requested outside a room");
            return Ok(());
        };
        info!("[LOBBY] Leaving room {}", room_id);

        let replies = self.replies_tx.clone();
        self.queue.emit_with_ack::<IgnoredAny, _>(
            ClientEvent::LeaveGame(LeaveGamePayload {
                room_id: room_id.clone(),
            }),
            move |result| {
                let _ = replies.send(LobbyReply::Left { room_id, result });
            },
        )?;
        Ok(())
    }

    /// Feed board input; committed moves are sent to the opponent
    ///
    /// A game-over notice for the move is recorded even when sending fails.
    pub fn handle_input(&mut self, input: BoardInput) -> TransportResult<InteractionOutcome> {
        let outcome = self.game.handle_input(input);
        let sent = match (&outcome, self.lobby.room_id()) {
            (InteractionOutcome::Committed(local), Some(room_id)) => {
                let payload = MakeMovePayload {
                    mv: self.game.encode_local_move(local),
                    room_id: room_id.to_string(),
                };
                self.queue.emit(ClientEvent::MakeMove(payload))
            }
            _ => Ok(()),
        };
        self.drain_status();
        sent.map(|()| outcome)
    }

    /// Process one event from the link
    pub fn handle_link_event(&mut self, event: LinkEvent) -> TransportResult<()> {
        match event {
            LinkEvent::Connected => {
                self.notices.push(ClientNotice::Connected);
                self.queue.on_connected()?;
            }
            LinkEvent::Disconnected => {
                self.notices.push(ClientNotice::Disconnected);
                self.queue.on_disconnected()?;
            }
            LinkEvent::Frame(text) => match serde_json::from_str::<ServerFrame>(&text) {
                Ok(frame) => self.handle_frame(frame),
                Err(err) => warn!("[NETWORK] Dropping unreadable frame: {}", TransportError::Decode(err)),
            },
        }
        Ok(())
    }

    fn handle_frame(&mut self, frame: ServerFrame) {
        match frame {
            ServerFrame::Ack {
                id,
                success,
                payload,
            } => {
                self.queue.resolve_ack(id, success, payload);
                self.drain_replies();
            }
            ServerFrame::Event { message } => self.handle_server_event(message),
        }
    }

    fn handle_server_event(&mut self, event: ServerEvent) {
        match event {
            ServerEvent::OpponentConnected(opponent) => {
                info!("[LOBBY] Opponent {} connected", opponent.name);
                if let Some(room) = self.lobby.room.as_mut() {
                    room.opponent = Some(opponent.clone());
                }
                self.notices.push(ClientNotice::OpponentJoined(opponent));
            }
            ServerEvent::OpponentDisconnected => {
                info!("[LOBBY] Opponent disconnected");
                if let Some(room) = self.lobby.room.as_mut() {
                    room.opponent = None;
                }
                self.notices.push(ClientNotice::OpponentLeft);
            }
            ServerEvent::MakeMove(wire) => {
                if let Some(mv) = self.game.apply_remote_move(&wire) {
                    self.notices.push(ClientNotice::OpponentMoved(mv));
                }
                self.drain_status();
            }
        }
    }

    fn drain_replies(&mut self) {
        while let Ok(reply) = self.replies_rx.try_recv() {
            match reply {
                LobbyReply::Created { color, result } => match result {
                    Ok(room_id) => {
                        info!("[LOBBY] Room {} created", room_id);
                        self.enter_room(RoomSession {
                            room_id: room_id.clone(),
                            color,
                            opponent: None,
                        });
                        self.notices.push(ClientNotice::RoomCreated { room_id, color });
                    }
                    Err(err) => self.request_failed("create-game", err),
                },
                LobbyReply::Joined { room_id, result } => match result {
                    Ok(host) => {
                        info!("[LOBBY] Joined room {} hosted by {}", room_id, host.name);
                        self.enter_room(RoomSession {
                            room_id: room_id.clone(),
                            color: host.color.opposite(),
                            opponent: Some(host.clone()),
                        });
                        self.notices.push(ClientNotice::JoinedRoom { room_id, host });
                    }
                    Err(err) => self.request_failed("join-game", err),
                },
                LobbyReply::Left { room_id, result } => match result {
                    Ok(_) => self.leave_room(&room_id),
                    Err(err) => self.request_failed("leave-game", err),
                },
            }
        }
    }

    fn enter_room(&mut self, room: RoomSession) {
        self.game.set_seat(Some(room.color));
        self.start_new_game();
        self.lobby.room = Some(room);
    }

    fn leave_room(&mut self, room_id: &str) {
        if self.lobby.room_id() != Some(room_id) {
            debug!("[LOBBY] Leave of {} acknowledged after the room changed", room_id);
            return;
        }
        info!("[LOBBY] Left room {}", room_id);
        self.lobby.room = None;
        self.game.set_seat(None);
        self.start_new_game();
        self.notices.push(ClientNotice::LeftRoom);
    }

    fn start_new_game(&mut self) {
        if let Err(err) = self.game.new_game() {
            warn!("[LOBBY] Could not reset the board: {}", err);
        }
    }

    fn request_failed(&mut self, action: &'static str, err: AckError) {
        warn!("[LOBBY] {} failed: {}", action, err);
        self.notices.push(ClientNotice::RequestFailed {
            action,
            reason: err.to_string(),
        });
    }

    fn drain_status(&mut self) {
        while let Ok((state, to_move_next)) = self.status_rx.try_recv() {
            let local = self.game.seat().unwrap_or(Color::White);
            self.notices
                .push(ClientNotice::GameOver(GameStatus::attribute(state, to_move_next, local)));
        }
    }
}
