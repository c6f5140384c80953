//! Opponent move relay
//!
//! Applies moves that arrive from the opponent to the local oracle and tells
//! interested parties (board view, session) that the position changed.
//!
//! Bad input never panics and never reaches the board: an undecodable or
//! illegal move is logged and dropped, and no listener is notified.

use crate::game::events::{Listeners, SubscriptionId};
use crate::game::resources::{decode_move, MoveOracle};
use crate::game::types::Move;
use shared::protocol::WireMove;
use tracing::{info, warn};

/// Callback run after an opponent move has been applied
pub type OpponentMoveListener = dyn FnMut(&Move);

#[derive(Default)]
pub struct OpponentMoveRelay {
    listeners: Listeners<OpponentMoveListener>,
}

impl OpponentMoveRelay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_opponent_move<F>(&mut self, callback: F) -> SubscriptionId
    where
        F: FnMut(&Move) + 'static,
    {
        self.listeners.subscribe(Box::new(callback))
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.listeners.unsubscribe(id)
    }

    /// Decode and apply a move from the opponent
    ///
    /// # Returns
    ///
    /// The applied move, or `None` when it was dropped.
    pub fn relay<O: MoveOracle + ?Sized>(&mut self, oracle: &mut O, wire: &WireMove) -> Option<Move> {
        let mv = match decode_move(wire) {
            Ok(mv) => mv,
            Err(err) => {
                warn!("[NETWORK_MOVE] Dropping undecodable move: {}", err);
                return None;
            }
        };

        if let Err(err) = oracle.play_move(&mv) {
            warn!("[NETWORK_MOVE] Dropping opponent move {}: {}", mv, err);
            return None;
        }

        info!("[NETWORK_MOVE] Applied opponent move {}", mv);
        for listener in self.listeners.iter_mut() {
            listener(&mv);
        }
        Some(mv)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::resources::ChessEngine;
    use crate::game::types::Color;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn wire(from: &str, to: &str, promotion: Option<&str>) -> WireMove {
        WireMove {
            from: from.to_string(),
            to: to.to_string(),
            promotion_piece: promotion.map(str::to_string),
        }
    }

    #[test]
    fn test_relay_applies_and_notifies() {
        let mut engine = ChessEngine::new();
        let mut relay = OpponentMoveRelay::new();
        let seen = Rc::new(RefCell::new(Vec::new()));
        {
            let seen = Rc::clone(&seen);
            relay.on_opponent_move(move |mv| seen.borrow_mut().push(mv.to_string()));
        }

        let applied = relay.relay(&mut engine, &wire("e2", "e4", None));

        assert_eq!(applied.map(|mv| mv.to_string()), Some("e2e4".to_string()));
        assert_eq!(*seen.borrow(), vec!["e2e4".to_string()]);
        assert_eq!(engine.turn(), Color::Black);
    }

    #[test]
    fn test_illegal_move_dropped_silently() {
        //! An illegal move leaves the position alone and notifies nobody
        let mut engine = ChessEngine::new();
        let mut relay = OpponentMoveRelay::new();
        let hits = Rc::new(RefCell::new(0));
        {
            let hits = Rc::clone(&hits);
            relay.on_opponent_move(move |_| *hits.borrow_mut() += 1);
        }
        let before = engine.board_snapshot();

        assert!(relay.relay(&mut engine, &wire("e2", "e5", None)).is_none());
        assert!(relay.relay(&mut engine, &wire("z9", "e4", None)).is_none());
        assert!(relay.relay(&mut engine, &wire("e2", "e4", Some("xx"))).is_none());

        assert_eq!(*hits.borrow(), 0);
        assert_eq!(engine.board_snapshot(), before);
        assert_eq!(engine.turn(), Color::White);
    }

    #[test]
    fn test_unsubscribed_listener_not_called() {
        let mut engine = ChessEngine::new();
        let mut relay = OpponentMoveRelay::new();
        let hits = Rc::new(RefCell::new(0));
        let token = {
            let hits = Rc::clone(&hits);
            relay.on_opponent_move(move |_| *hits.borrow_mut() += 1)
        };
        assert!(relay.unsubscribe(token));

        relay.relay(&mut engine, &wire("g1", "f3", None));
        assert_eq!(*hits.borrow(), 0);
    }

    #[test]
    fn test_promotion_letter_either_case() {
        let mut engine = ChessEngine::from_fen("8/P6k/8/8/8/8/8/K7 w - - 0 1").expect("valid fen");
        let mut relay = OpponentMoveRelay::new();
        let applied = relay.relay(&mut engine, &wire("a7", "a8", Some("n")));
        assert_eq!(applied.map(|mv| mv.to_string()), Some("a7a8n".to_string()));
    }
}
