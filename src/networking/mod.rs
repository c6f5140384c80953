//! Networking module - transport to the relay server and lobby handling
//!
//! # Layers
//!
//! - [`socket`] - [`WsLink`](socket::WsLink), the WebSocket link
//! - [`queue`] - [`TransportQueue`](queue::TransportQueue), FIFO delivery and acks
//! - [`lobby`] - Join codes and room state
//! - [`client`] - [`GameClient`](client::GameClient), game session plus transport
//! - [`error`] - [`TransportError`](error::TransportError) and [`AckError`](error::AckError)

pub mod client;
pub mod error;
pub mod lobby;
pub mod queue;
pub mod socket;

pub use client::{ClientNotice, GameClient};
pub use error::{AckError, TransportError, TransportResult};
pub use lobby::{JoinCode, MultiplayerSession, RoomSession};
pub use queue::{AckReply, ConnectionState, Link, TransportQueue};
pub use socket::{LinkEvent, WsLink};
