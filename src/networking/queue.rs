//! Outbound transport queue
//!
//! Frames emitted while the link is down are held here and sent, oldest
//! first, as soon as the link reports a connection. Frames emitted while
//! connected go straight out.
//!
//! # Connection States
//!
//! ```text
//!  Disconnected ──emit (queues)──▶ Connecting ──on_connected (drain)──▶ Connected
//!       ▲                                                                  │
//!       └─────────────────────── on_disconnected / send error ─────────────┘
//! ```
//!
//! # Acknowledgements
//!
//! Create, join and leave requests carry an ack id. The callback registered
//! with [`TransportQueue::emit_with_ack`] runs once the server's reply for
//! that id arrives, with the payload already decoded. There is no timeout:
//! a request the server never answers stays pending.
//!
//! `make-move` is fire-and-forget. A frame the link accepted but the server
//! never saw is not retried.

use crate::networking::error::{AckError, TransportError, TransportResult};
use serde::de::DeserializeOwned;
use serde_json::Value;
use shared::protocol::{ClientEvent, ClientFrame};
use std::collections::{HashMap, VecDeque};
use tracing::{debug, info, warn};

/// A connection the queue can open and write text frames to
///
/// `open` only starts connecting; the owner reports completion through
/// [`TransportQueue::on_connected`].
pub trait Link {
    fn open(&mut self) -> TransportResult<()>;
    fn send(&mut self, text: String) -> TransportResult<()>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectionState {
    #[default]
    Disconnected,
    Connecting,
    Connected,
}

/// Server reply to an acknowledged frame
#[derive(Debug, Clone, PartialEq)]
pub struct AckReply {
    pub success: bool,
    pub payload: Value,
}

impl AckReply {
    /// Decode the payload of a successful reply
    ///
    /// # Errors
    ///
    /// - [`AckError::Rejected`] when `success` is false; a string payload is
    ///   used as the reason
    /// - [`AckError::Malformed`] when the payload does not decode as `T`
    pub fn into_result<T: DeserializeOwned>(self) -> Result<T, AckError> {
        if !self.success {
            let reason = match self.payload {
                Value::String(reason) => reason,
                _ => "request rejected by server".to_string(),
            };
            return Err(AckError::Rejected { reason });
        }
        Ok(serde_json::from_value(self.payload)?)
    }
}

type AckCallback = Box<dyn FnOnce(AckReply)>;

pub struct TransportQueue<L: Link> {
    link: L,
    state: ConnectionState,
    pending: VecDeque<ClientFrame>,
    acks: HashMap<u64, AckCallback>,
    next_ack: u64,
}

impl<L: Link> TransportQueue<L> {
    pub fn new(link: L) -> Self {
        Self {
            link,
            state: ConnectionState::Disconnected,
            pending: VecDeque::new(),
            acks: HashMap::new(),
            next_ack: 1,
        }
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    pub fn is_connected(&self) -> bool {
        self.state == ConnectionState::Connected
    }

    /// Frames waiting for a connection
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Acknowledged requests still waiting for a reply
    pub fn awaiting_ack(&self) -> usize {
        self.acks.len()
    }

    pub fn link(&self) -> &L {
        &self.link
    }

    pub fn link_mut(&mut self) -> &mut L {
        &mut self.link
    }

    /// Send a fire-and-forget event
    pub fn emit(&mut self, event: ClientEvent) -> TransportResult<()> {
        self.dispatch(ClientFrame {
            ack: None,
            message: event,
        })
    }

    /// Send an event and run `callback` with the decoded reply
    ///
    /// # Returns
    ///
    /// The ack id the reply will carry.
    ///
    /// # Errors
    ///
    /// If the link cannot be opened the request is dropped along with its
    /// callback; nothing for it stays queued.
    pub fn emit_with_ack<T, F>(&mut self, event: ClientEvent, callback: F) -> TransportResult<u64>
    where
        T: DeserializeOwned + 'static,
        F: FnOnce(Result<T, AckError>) + 'static,
    {
        let id = self.next_ack;
        self.next_ack += 1;
        self.acks
            .insert(id, Box::new(move |reply: AckReply| callback(reply.into_result::<T>())));

        let frame = ClientFrame {
            ack: Some(id),
            message: event,
        };
        if let Err(err) = self.dispatch(frame) {
            // Withdraw the request whole so a later drain cannot send it
            self.acks.remove(&id);
            self.pending.retain(|queued| queued.ack != Some(id));
            return Err(err);
        }
        Ok(id)
    }

    fn dispatch(&mut self, frame: ClientFrame) -> TransportResult<()> {
        match self.state {
            ConnectionState::Connected => self.send_frame(frame),
            ConnectionState::Connecting => {
                debug!("[TRANSPORT] Queued {} while connecting", frame.message.name());
                self.pending.push_back(frame);
                Ok(())
            }
            ConnectionState::Disconnected => {
                debug!("[TRANSPORT] Queued {} and connecting", frame.message.name());
                self.pending.push_back(frame);
                self.connect()
            }
        }
    }

    /// Write one frame; on failure it goes back to the head of the queue
    fn send_frame(&mut self, frame: ClientFrame) -> TransportResult<()> {
        let text = serde_json::to_string(&frame).map_err(TransportError::Encode)?;
        match self.link.send(text) {
            Ok(()) => {
                debug!("[TRANSPORT] Sent {}", frame.message.name());
                Ok(())
            }
            Err(err) => {
                warn!(
                    "[TRANSPORT] Send of {} failed ({}), requeueing",
                    frame.message.name(),
                    err
                );
                self.pending.push_front(frame);
                self.state = ConnectionState::Disconnected;
                self.connect()
            }
        }
    }

    fn connect(&mut self) -> TransportResult<()> {
        self.state = ConnectionState::Connecting;
        if let Err(err) = self.link.open() {
            self.state = ConnectionState::Disconnected;
            return Err(err);
        }
        Ok(())
    }

    /// Link is up: send everything queued, first in first out
    ///
    /// # Returns
    ///
    /// Number of frames sent.
    pub fn on_connected(&mut self) -> TransportResult<usize> {
        self.state = ConnectionState::Connected;
        info!("[TRANSPORT] Connected, draining {} queued frame(s)", self.pending.len());

        let mut sent = 0;
        while self.state == ConnectionState::Connected {
            let Some(frame) = self.pending.pop_front() else {
                break;
            };
            self.send_frame(frame)?;
            if self.state == ConnectionState::Connected {
                sent += 1;
            }
        }
        Ok(sent)
    }

    /// Link went down; reconnect if anything is still queued
    pub fn on_disconnected(&mut self) -> TransportResult<()> {
        warn!("[TRANSPORT] Disconnected");
        self.state = ConnectionState::Disconnected;
        if self.pending.is_empty() {
            return Ok(());
        }
        self.connect()
    }

    /// Hand a server reply to the callback waiting for `id`
    ///
    /// # Returns
    ///
    /// `false` if no request with that id is pending.
    pub fn resolve_ack(&mut self, id: u64, success: bool, payload: Value) -> bool {
        match self.acks.remove(&id) {
            Some(callback) => {
                callback(AckReply { success, payload });
                true
            }
            None => {
                warn!("[TRANSPORT] Ack {} matches no pending request", id);
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::protocol::{Color, CreateGamePayload, LeaveGamePayload};
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Default)]
    struct RecordingLink {
        opens: usize,
        sent: Vec<String>,
        fail_next_send: bool,
        fail_next_open: bool,
    }

    impl Link for RecordingLink {
        fn open(&mut self) -> TransportResult<()> {
            self.opens += 1;
            if std::mem::take(&mut self.fail_next_open) {
                return Err(TransportError::Runtime("no runtime".to_string()));
            }
            Ok(())
        }

        fn send(&mut self, text: String) -> TransportResult<()> {
            if std::mem::take(&mut self.fail_next_send) {
                return Err(TransportError::Closed);
            }
            self.sent.push(text);
            Ok(())
        }
    }

    fn leave(room: &str) -> ClientEvent {
        ClientEvent::LeaveGame(LeaveGamePayload {
            room_id: room.to_string(),
        })
    }

    fn sent_rooms(queue: &TransportQueue<RecordingLink>) -> Vec<String> {
        queue
            .link()
            .sent
            .iter()
            .map(|text| {
                let frame: ClientFrame = serde_json::from_str(text).expect("valid frame");
                match frame.message {
                    ClientEvent::LeaveGame(payload) => payload.room_id,
                    other => other.name().to_string(),
                }
            })
            .collect()
    }

    #[test]
    fn test_emit_while_disconnected_queues_and_opens_once() {
        let mut queue = TransportQueue::new(RecordingLink::default());
        queue.emit(leave("A")).expect("emit");
        queue.emit(leave("B")).expect("emit");

        assert_eq!(queue.state(), ConnectionState::Connecting);
        assert_eq!(queue.pending_len(), 2);
        assert_eq!(queue.link().opens, 1);
        assert!(queue.link().sent.is_empty());
    }

    #[test]
    fn test_drain_is_fifo() {
        //! Queued frames go out in the order they were emitted
        let mut queue = TransportQueue::new(RecordingLink::default());
        for room in ["A", "B", "C"] {
            queue.emit(leave(room)).expect("emit");
        }

        assert_eq!(queue.on_connected().expect("drain"), 3);
        assert_eq!(sent_rooms(&queue), vec!["A", "B", "C"]);
        assert_eq!(queue.pending_len(), 0);
    }

    #[test]
    fn test_connected_emit_sends_immediately() {
        let mut queue = TransportQueue::new(RecordingLink::default());
        queue.on_connected().expect("drain");
        queue.emit(leave("A")).expect("emit");
        assert_eq!(sent_rooms(&queue), vec!["A"]);
        assert_eq!(queue.link().opens, 0);
    }

    #[test]
    fn test_failed_send_requeues_at_front() {
        //! A frame the link refused is sent first after reconnecting
        let mut queue = TransportQueue::new(RecordingLink::default());
        queue.on_connected().expect("drain");
        queue.link_mut().fail_next_send = true;

        queue.emit(leave("A")).expect("emit");
        queue.emit(leave("B")).expect("emit");
        assert_eq!(queue.state(), ConnectionState::Connecting);

        queue.on_connected().expect("drain");
        assert_eq!(sent_rooms(&queue), vec!["A", "B"]);
    }

    #[test]
    fn test_ack_resolves_typed_payload() {
        let mut queue = TransportQueue::new(RecordingLink::default());
        queue.on_connected().expect("drain");
        let result = Rc::new(RefCell::new(None));
        let id = {
            let result = Rc::clone(&result);
            queue
                .emit_with_ack::<String, _>(
                    ClientEvent::CreateGame(CreateGamePayload {
                        color: Color::White,
                        name: "ana".to_string(),
                    }),
                    move |reply| *result.borrow_mut() = Some(reply.map_err(|e| e.to_string())),
                )
                .expect("emit")
        };

        assert_eq!(queue.awaiting_ack(), 1);
        assert!(queue.resolve_ack(id, true, Value::String("ROOM42".to_string())));
        assert_eq!(*result.borrow(), Some(Ok("ROOM42".to_string())));
        assert!(!queue.resolve_ack(id, true, Value::Null), "Ack runs at most once");
    }

    #[test]
    fn test_failed_open_withdraws_acked_request() {
        //! A request whose connection never started is neither queued nor awaited
        let mut queue = TransportQueue::new(RecordingLink::default());
        queue.link_mut().fail_next_open = true;
        let create = || {
            ClientEvent::CreateGame(CreateGamePayload {
                color: Color::White,
                name: "ana".to_string(),
            })
        };

        let failed = queue.emit_with_ack::<String, _>(create(), |_| {});
        assert!(failed.is_err());
        assert_eq!(queue.state(), ConnectionState::Disconnected);
        assert_eq!(queue.pending_len(), 0);
        assert_eq!(queue.awaiting_ack(), 0);

        let answered = Rc::new(RefCell::new(None));
        let id = {
            let answered = Rc::clone(&answered);
            queue
                .emit_with_ack::<String, _>(create(), move |reply| {
                    *answered.borrow_mut() = reply.ok();
                })
                .expect("second attempt connects")
        };
        assert_eq!(queue.on_connected().expect("drain"), 1);

        let frame: ClientFrame =
            serde_json::from_str(&queue.link().sent[0]).expect("valid frame");
        assert_eq!(frame.ack, Some(id));
        assert!(queue.resolve_ack(id, true, Value::String("ROOM42".to_string())));
        assert_eq!(*answered.borrow(), Some("ROOM42".to_string()));
    }

    #[test]
    fn test_rejected_ack_reports_reason() {
        let reply = AckReply {
            success: false,
            payload: Value::String("room full".to_string()),
        };
        match reply.into_result::<String>() {
            Err(AckError::Rejected { reason }) => assert_eq!(reason, "room full"),
            other => panic!("Expected rejection, got {:?}", other),
        }
    }

    #[test]
    fn test_disconnect_without_pending_stays_idle() {
        let mut queue = TransportQueue::new(RecordingLink::default());
        queue.on_connected().expect("drain");
        queue.on_disconnected().expect("disconnect");
        assert_eq!(queue.state(), ConnectionState::Disconnected);
        assert_eq!(queue.link().opens, 0);
    }
}
