//! Game session - one board, one position, one set of listeners
//!
//! A [`GameSession`] owns everything a single game needs: the rules oracle,
//! the interaction state machine, the opponent move relay and the status
//! bus. Sessions are plain values, so several can exist side by side (tests
//! do this constantly).
//!
//! # Move Paths
//!
//! ```text
//! local:  handle_input ─▶ BoardInteraction ─▶ oracle.play_move ─┐
//! remote: apply_remote_move ─▶ OpponentMoveRelay ─▶ oracle ─────┤
//!                                                               ▼
//!                                   after_move: recent move, terminal check,
//!                                   StatusBus broadcast when terminal
//! ```
//!
//! The session never talks to the network. Committed local moves come back
//! as [`InteractionOutcome::Committed`]; the caller decides whether to send
//! them (see [`GameSession::encode_local_move`]).

use crate::game::error::GameResult;
use crate::game::events::{StatusBus, SubscriptionId};
use crate::game::resources::{
    encode_move, CaptureSummary, ChessEngine, GameStatus, MoveOracle, TerminalState, STARTING_FEN,
};
use crate::game::systems::{
    BoardInput, BoardInteraction, InputGate, InteractionOutcome, LocalMove, OpponentMoveRelay,
};
use crate::game::types::{Color, Move, Piece};
use crate::input::pointer::{BoardRect, Orientation};
use shared::protocol::WireMove;
use tracing::info;

pub struct GameSession<O: MoveOracle = ChessEngine> {
    oracle: O,
    interaction: BoardInteraction,
    relay: OpponentMoveRelay,
    status_bus: StatusBus,
    /// Colour the local player controls; `None` for free play
    seat: Option<Color>,
    terminal: TerminalState,
    recent_move: Option<Move>,
}

impl GameSession<ChessEngine> {
    /// Session on the standard starting position
    pub fn new(board: BoardRect) -> Self {
        Self::with_oracle(ChessEngine::new(), board)
    }
}

impl<O: MoveOracle> GameSession<O> {
    pub fn with_oracle(oracle: O, board: BoardRect) -> Self {
        let terminal = oracle.terminal_state();
        Self {
            oracle,
            interaction: BoardInteraction::new(board, Orientation::WhiteBottom),
            relay: OpponentMoveRelay::new(),
            status_bus: StatusBus::default(),
            seat: None,
            terminal,
            recent_move: None,
        }
    }

    /// Back to the starting position, keeping seat and subscribers
    pub fn new_game(&mut self) -> GameResult<()> {
        self.oracle.reset(STARTING_FEN)?;
        self.clear_progress();
        info!("[GAME] New game started");
        Ok(())
    }

    /// Continue from an arbitrary position
    pub fn load_position(&mut self, fen: &str) -> GameResult<()> {
        self.oracle.load_position(fen)?;
        self.clear_progress();
        Ok(())
    }

    fn clear_progress(&mut self) {
        self.interaction.reset();
        self.terminal = self.oracle.terminal_state();
        self.recent_move = None;
    }

    /// Seat the local player and orient the board with their side at the bottom
    pub fn set_seat(&mut self, seat: Option<Color>) {
        self.seat = seat;
        self.interaction
            .set_orientation(Orientation::for_color(seat.unwrap_or(Color::White)));
        self.interaction.reset();
    }

    pub fn seat(&self) -> Option<Color> {
        self.seat
    }

    pub fn set_board(&mut self, board: BoardRect) {
        self.interaction.set_board(board);
    }

    fn gate(&self) -> InputGate {
        InputGate {
            seat: self.seat,
            game_over: self.terminal.is_terminal(),
        }
    }

    /// Feed one input to the interaction state machine
    pub fn handle_input(&mut self, input: BoardInput) -> InteractionOutcome {
        let gate = self.gate();
        let outcome = self.interaction.handle(input, &mut self.oracle, gate);
        if let InteractionOutcome::Committed(local) = &outcome {
            self.after_move(local.mv);
        }
        outcome
    }

    /// Apply a move received from the opponent
    ///
    /// Undecodable or illegal moves are dropped by the relay and leave the
    /// session untouched.
    pub fn apply_remote_move(&mut self, wire: &WireMove) -> Option<Move> {
        let mv = self.relay.relay(&mut self.oracle, wire)?;
        self.interaction.refresh();
        self.after_move(mv);
        Some(mv)
    }

    fn after_move(&mut self, mv: Move) {
        self.recent_move = Some(mv);
        self.terminal = self.oracle.terminal_state();
        if self.terminal.is_terminal() {
            info!("[GAME] Game over: {}", self.terminal.message());
            self.status_bus.broadcast(self.terminal, self.oracle.turn());
        }
    }

    /// Wire form of a move this board just committed
    pub fn encode_local_move(&self, local: &LocalMove) -> WireMove {
        encode_move(&local.mv, local.mover)
    }

    /// Result relative to the seat (White in free play)
    pub fn status(&self) -> GameStatus {
        GameStatus::attribute(
            self.terminal,
            self.oracle.turn(),
            self.seat.unwrap_or(Color::White),
        )
    }

    pub fn terminal_state(&self) -> TerminalState {
        self.terminal
    }

    pub fn is_game_over(&self) -> bool {
        self.terminal.is_terminal()
    }

    pub fn side_to_move(&self) -> Color {
        self.oracle.turn()
    }

    /// True when the seated player may move; always true in free play
    pub fn is_local_turn(&self) -> bool {
        self.seat.is_none_or(|seat| seat == self.oracle.turn())
    }

    pub fn recent_move(&self) -> Option<Move> {
        self.recent_move
    }

    pub fn board_snapshot(&self) -> Vec<Piece> {
        self.oracle.board_snapshot()
    }

    pub fn captured_pieces(&self, color: Color) -> CaptureSummary {
        self.oracle.captured_pieces(color)
    }

    pub fn material_advantage(&self) -> i32 {
        self.oracle.material_advantage()
    }

    pub fn interaction(&self) -> &BoardInteraction {
        &self.interaction
    }

    pub fn oracle(&self) -> &O {
        &self.oracle
    }

    /// Subscribe to terminal-state broadcasts
    pub fn subscribe_status<F>(&mut self, callback: F) -> SubscriptionId
    where
        F: FnMut(TerminalState, Color) + 'static,
    {
        self.status_bus.subscribe(callback)
    }

    pub fn unsubscribe_status(&mut self, id: SubscriptionId) -> bool {
        self.status_bus.unsubscribe(id)
    }

    /// Subscribe to refresh notifications for applied opponent moves
    pub fn on_opponent_move<F>(&mut self, callback: F) -> SubscriptionId
    where
        F: FnMut(&Move) + 'static,
    {
        self.relay.on_opponent_move(callback)
    }

    pub fn unsubscribe_opponent_move(&mut self, id: SubscriptionId) -> bool {
        self.relay.unsubscribe(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::resources::Outcome;
    use crate::game::systems::PointerEvent;
    use crate::game::types::Square;
    use crate::input::pointer::square_center;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn play(session: &mut GameSession, text: &str) -> InteractionOutcome {
        let mv: Move = text.parse().expect("valid move text");
        let board = *session.interaction().board();
        let orientation = session.interaction().orientation();
        let (fx, fy) = square_center(mv.from, &board, orientation);
        let (tx, ty) = square_center(mv.to, &board, orientation);
        session.handle_input(BoardInput::Pointer(PointerEvent::Down { x: fx, y: fy }));
        session.handle_input(BoardInput::Pointer(PointerEvent::Move { x: tx, y: ty }));
        let outcome = session.handle_input(BoardInput::Pointer(PointerEvent::Up { x: tx, y: ty }));
        match (outcome, mv.promotion) {
            (InteractionOutcome::PromotionRequired { .. }, Some(piece)) => {
                session.handle_input(BoardInput::ChoosePromotion(piece))
            }
            (outcome, _) => outcome,
        }
    }

    fn wire(text: &str) -> WireMove {
        WireMove {
            from: text[0..2].to_string(),
            to: text[2..4].to_string(),
            promotion_piece: None,
        }
    }

    #[test]
    fn test_local_move_records_recent_move() {
        let mut session = GameSession::new(BoardRect::square(800.0));
        assert!(matches!(play(&mut session, "e2e4"), InteractionOutcome::Committed(_)));
        assert_eq!(session.recent_move().map(|m| m.to_string()), Some("e2e4".to_string()));
        assert_eq!(session.side_to_move(), Color::Black);
    }

    #[test]
    fn test_fools_mate_broadcasts_once_and_locks_input() {
        //! Terminal state reaches every subscriber and pointer input stops
        let mut session = GameSession::new(BoardRect::square(800.0));
        session.set_seat(Some(Color::White));
        let seen = Rc::new(RefCell::new(Vec::new()));
        {
            let seen = Rc::clone(&seen);
            session.subscribe_status(move |state, next| seen.borrow_mut().push((state, next)));
        }

        play(&mut session, "f2f3");
        session.apply_remote_move(&wire("e7e5"));
        play(&mut session, "g2g4");
        session.apply_remote_move(&wire("d8h4"));

        assert_eq!(*seen.borrow(), vec![(TerminalState::Checkmate, Color::White)]);
        assert_eq!(session.status().outcome, Some(Outcome::Lose));
        assert!(session.is_game_over());
        assert_eq!(play(&mut session, "a2a3"), InteractionOutcome::Ignored);
    }

    #[test]
    fn test_remote_move_clears_selection() {
        let mut session = GameSession::new(BoardRect::square(800.0));
        let board = *session.interaction().board();
        let (x, y) = square_center(
            Square::from_notation("e2").expect("valid"),
            &board,
            Orientation::WhiteBottom,
        );
        session.handle_input(BoardInput::Pointer(PointerEvent::Down { x, y }));
        assert!(session.interaction().selection().is_some());

        session.apply_remote_move(&wire("e2e4"));
        assert!(session.interaction().selection().is_none());
    }

    #[test]
    fn test_new_game_keeps_seat_and_clears_progress() {
        let mut session = GameSession::new(BoardRect::square(800.0));
        session.set_seat(Some(Color::Black));
        session.apply_remote_move(&wire("e2e4"));
        session.new_game().expect("starting position loads");

        assert_eq!(session.seat(), Some(Color::Black));
        assert!(session.recent_move().is_none());
        assert_eq!(session.side_to_move(), Color::White);
        assert!(session.interaction().orientation().is_flipped());
    }

    #[test]
    fn test_is_local_turn() {
        let mut session = GameSession::new(BoardRect::square(800.0));
        assert!(session.is_local_turn());
        session.set_seat(Some(Color::Black));
        assert!(!session.is_local_turn());
    }
}
