//! Board interaction state machine
//!
//! Turns raw pointer input into validated moves. All interaction state lives
//! in one [`InteractionState`] value and changes only through
//! [`BoardInteraction::handle`].
//!
//! # States
//!
//! ```text
//!            pointer-down on own piece
//!   Idle ─────────────────────────────▶ Selected ──pointer-move──▶ Dragging
//!    ▲                                     │                          │
//!    │          release / drop / click     │                          │
//!    └──────────────── resolve ◀───────────┴──────────────────────────┘
//!                         │ two or more moves share (from, to)
//!                         ▼
//!                  AwaitingPromotion ──choice──▶ apply ──▶ Idle
//! ```
//!
//! Applying a move is synchronous, so the resolving step between a choice and
//! `Idle` never outlives a single call.
//!
//! # Drop Resolution
//!
//! The destination is matched against the selection's legal moves:
//! - no match: back to `Idle`, nothing applied, nothing emitted
//! - one match: applied through the oracle and reported as
//!   [`InteractionOutcome::Committed`]
//! - several matches (promotion): held in `AwaitingPromotion`
//!
//! # Gating
//!
//! [`InputGate`] carries the outside conditions: a finished game ignores all
//! pointer input, and a seated player cannot pick up the opponent's pieces.
//! Picking up a piece whose side is not to move resets to `Idle`.

use crate::game::error::GameError;
use crate::game::resources::{MoveOracle, PendingPromotion, Selection};
use crate::game::types::{Color, Move, Piece, PromotionPiece, Square};
use crate::input::pointer::{drag_offset, pixel_to_square, BoardRect, Orientation};
use tracing::{debug, warn};

/// Raw pointer event in client pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    Down { x: f32, y: f32 },
    Move { x: f32, y: f32 },
    Up { x: f32, y: f32 },
}

/// Everything the state machine reacts to
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BoardInput {
    Pointer(PointerEvent),
    /// Piece picked in the promotion prompt
    ChoosePromotion(PromotionPiece),
    /// Promotion prompt closed without a choice
    DismissPromotion,
    /// The drag lost its anchor (window blur, element removed)
    CancelDrag,
}

/// Conditions decided outside the board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct InputGate {
    /// Colour the local player controls; `None` lets both sides move
    pub seat: Option<Color>,
    pub game_over: bool,
}

/// A move made on this board, with the colour that made it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocalMove {
    pub mv: Move,
    pub mover: Color,
}

#[derive(Debug, Clone, PartialEq)]
pub enum InteractionState {
    Idle,
    Selected {
        selection: Selection,
        /// Pointer still held since the press that selected the piece
        pointer_down: bool,
    },
    Dragging {
        selection: Selection,
        hover: Square,
        /// Piece position in board pixels
        offset: (f32, f32),
    },
    AwaitingPromotion(PendingPromotion),
}

/// What a single input did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InteractionOutcome {
    /// Input had no effect
    Ignored,
    Selected(Square),
    Dragging { hover: Square },
    /// Pointer released over the origin; the piece stays selected
    Released,
    /// Back to `Idle` without a move
    Reset,
    PromotionRequired { from: Square, to: Square },
    /// Move applied to the oracle
    Committed(LocalMove),
    /// The oracle refused a move the selection listed
    Rejected(GameError),
}

/// Owner of the interaction state for one board
#[derive(Debug, Clone)]
pub struct BoardInteraction {
    state: InteractionState,
    board: BoardRect,
    orientation: Orientation,
}

impl BoardInteraction {
    pub fn new(board: BoardRect, orientation: Orientation) -> Self {
        Self {
            state: InteractionState::Idle,
            board,
            orientation,
        }
    }

    pub fn state(&self) -> &InteractionState {
        &self.state
    }

    pub fn board(&self) -> &BoardRect {
        &self.board
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    pub fn set_board(&mut self, board: BoardRect) {
        self.board = board;
    }

    pub fn set_orientation(&mut self, orientation: Orientation) {
        self.orientation = orientation;
    }

    /// Drop any selection, drag or pending promotion
    pub fn reset(&mut self) {
        if self.state != InteractionState::Idle {
            debug!("[INPUT] Interaction reset");
        }
        self.state = InteractionState::Idle;
    }

    /// Re-read the board after a move made elsewhere
    ///
    /// The position changed under any selection, so it is discarded.
    pub fn refresh(&mut self) {
        self.reset();
    }

    pub fn selection(&self) -> Option<&Selection> {
        match &self.state {
            InteractionState::Selected { selection, .. }
            | InteractionState::Dragging { selection, .. } => Some(selection),
            _ => None,
        }
    }

    /// Squares to mark as legal destinations
    pub fn legal_destinations(&self) -> Vec<Square> {
        self.selection()
            .map(Selection::legal_destinations)
            .unwrap_or_default()
    }

    pub fn hover_square(&self) -> Option<Square> {
        match &self.state {
            InteractionState::Dragging { hover, .. } => Some(*hover),
            _ => None,
        }
    }

    /// Position of the dragged piece in board pixels
    pub fn drag_offset(&self) -> Option<(f32, f32)> {
        match &self.state {
            InteractionState::Dragging { offset, .. } => Some(*offset),
            _ => None,
        }
    }

    pub fn pending_promotion(&self) -> Option<&PendingPromotion> {
        match &self.state {
            InteractionState::AwaitingPromotion(pending) => Some(pending),
            _ => None,
        }
    }

    /// Single transition function
    ///
    /// # Arguments
    ///
    /// * `input` - Pointer event or promotion prompt result
    /// * `oracle` - Rules engine; only mutated when a move is committed
    /// * `gate` - Seat and game-over conditions
    pub fn handle<O: MoveOracle + ?Sized>(
        &mut self,
        input: BoardInput,
        oracle: &mut O,
        gate: InputGate,
    ) -> InteractionOutcome {
        let state = std::mem::replace(&mut self.state, InteractionState::Idle);
        let (next, outcome) = self.transition(state, input, oracle, gate);
        self.state = next;
        outcome
    }

    fn transition<O: MoveOracle + ?Sized>(
        &self,
        state: InteractionState,
        input: BoardInput,
        oracle: &mut O,
        gate: InputGate,
    ) -> (InteractionState, InteractionOutcome) {
        use InteractionOutcome as Out;
        use InteractionState as St;

        match (state, input) {
            // --- Idle ---
            (St::Idle, BoardInput::Pointer(PointerEvent::Down { x, y })) => {
                let square = self.square_at(x, y);
                self.select(square, &*oracle, gate)
                    .unwrap_or((St::Idle, Out::Ignored))
            }
            (St::Idle, _) => (St::Idle, Out::Ignored),

            // --- Selected ---
            (St::Selected { mut selection, .. }, BoardInput::Pointer(PointerEvent::Down { x, y })) => {
                let square = self.square_at(x, y);
                if square == selection.square() {
                    selection.reselect = true;
                    (
                        St::Selected {
                            selection,
                            pointer_down: true,
                        },
                        Out::Selected(square),
                    )
                } else if selection.is_legal_destination(square) {
                    debug!("[INPUT] Click-to-move {} -> {}", selection.square(), square);
                    self.resolve_drop(selection, square, oracle)
                } else {
                    self.select(square, &*oracle, gate)
                        .unwrap_or((St::Idle, Out::Reset))
                }
            }
            (
                St::Selected {
                    selection,
                    pointer_down: true,
                },
                BoardInput::Pointer(PointerEvent::Move { x, y }),
            ) => {
                let hover = self.square_at(x, y);
                let offset = drag_offset(x, y, &self.board);
                (
                    St::Dragging {
                        selection,
                        hover,
                        offset,
                    },
                    Out::Dragging { hover },
                )
            }
            (
                St::Selected {
                    selection,
                    pointer_down: true,
                },
                BoardInput::Pointer(PointerEvent::Up { x, y }),
            ) => self.release(selection, self.square_at(x, y), oracle),
            (St::Selected { .. }, BoardInput::CancelDrag) => (St::Idle, Out::Reset),
            (state @ St::Selected { .. }, _) => (state, Out::Ignored),

            // --- Dragging ---
            (St::Dragging { selection, .. }, BoardInput::Pointer(PointerEvent::Move { x, y })) => {
                let hover = self.square_at(x, y);
                let offset = drag_offset(x, y, &self.board);
                (
                    St::Dragging {
                        selection,
                        hover,
                        offset,
                    },
                    Out::Dragging { hover },
                )
            }
            (St::Dragging { selection, .. }, BoardInput::Pointer(PointerEvent::Up { x, y })) => {
                self.release(selection, self.square_at(x, y), oracle)
            }
            (St::Dragging { .. }, BoardInput::CancelDrag) => {
                debug!("[INPUT] Drag cancelled");
                (St::Idle, Out::Reset)
            }
            (state @ St::Dragging { .. }, _) => (state, Out::Ignored),

            // --- AwaitingPromotion ---
            (St::AwaitingPromotion(pending), BoardInput::ChoosePromotion(piece)) => {
                match pending.resolve(piece) {
                    Some(mv) => self.commit(mv, pending.color, oracle),
                    None => {
                        warn!("[INPUT] {:?} is not a promotion choice here", piece);
                        (St::AwaitingPromotion(pending), Out::Ignored)
                    }
                }
            }
            (
                St::AwaitingPromotion(_),
                BoardInput::DismissPromotion
                | BoardInput::CancelDrag
                | BoardInput::Pointer(PointerEvent::Down { .. }),
            ) => {
                debug!("[INPUT] Promotion cancelled");
                (St::Idle, Out::Reset)
            }
            (state @ St::AwaitingPromotion(_), _) => (state, Out::Ignored),
        }
    }

    fn square_at(&self, x: f32, y: f32) -> Square {
        pixel_to_square(x, y, &self.board, self.orientation)
    }

    /// Try to pick up the piece on `square`
    ///
    /// `None` when there is nothing selectable there and the input should be
    /// ignored; `Some((Idle, Reset))` when the piece belongs to the side not
    /// to move.
    fn select<O: MoveOracle + ?Sized>(
        &self,
        square: Square,
        oracle: &O,
        gate: InputGate,
    ) -> Option<(InteractionState, InteractionOutcome)> {
        if gate.game_over {
            return None;
        }
        let piece: Piece = oracle.piece_at(square)?;
        if gate.seat.is_some_and(|seat| seat != piece.color) {
            return None;
        }
        if piece.color != oracle.turn() {
            debug!("[INPUT] {} is not to move", piece.color.name());
            return Some((InteractionState::Idle, InteractionOutcome::Reset));
        }

        let legal_moves = oracle.moves_for_square(square);
        debug!(
            "[INPUT] Selected {:?} on {} ({} legal moves)",
            piece.kind,
            square,
            legal_moves.len()
        );
        Some((
            InteractionState::Selected {
                selection: Selection::new(piece, legal_moves),
                pointer_down: true,
            },
            InteractionOutcome::Selected(square),
        ))
    }

    fn release<O: MoveOracle + ?Sized>(
        &self,
        selection: Selection,
        square: Square,
        oracle: &mut O,
    ) -> (InteractionState, InteractionOutcome) {
        if square != selection.square() {
            return self.resolve_drop(selection, square, oracle);
        }
        if selection.reselect {
            debug!("[INPUT] Deselected {}", square);
            return (InteractionState::Idle, InteractionOutcome::Reset);
        }
        (
            InteractionState::Selected {
                selection,
                pointer_down: false,
            },
            InteractionOutcome::Released,
        )
    }

    fn resolve_drop<O: MoveOracle + ?Sized>(
        &self,
        selection: Selection,
        to: Square,
        oracle: &mut O,
    ) -> (InteractionState, InteractionOutcome) {
        let from = selection.square();
        let mut candidates = selection.moves_to(to);
        match candidates.len() {
            0 => {
                debug!("[INPUT] {} -> {} is not legal", from, to);
                (InteractionState::Idle, InteractionOutcome::Reset)
            }
            1 => {
                let mv = candidates.remove(0);
                self.commit(mv, selection.piece.color, oracle)
            }
            _ => {
                debug!("[INPUT] {} -> {} needs a promotion choice", from, to);
                (
                    InteractionState::AwaitingPromotion(PendingPromotion::new(
                        from,
                        to,
                        selection.piece.color,
                        candidates,
                    )),
                    InteractionOutcome::PromotionRequired { from, to },
                )
            }
        }
    }

    fn commit<O: MoveOracle + ?Sized>(
        &self,
        mv: Move,
        mover: Color,
        oracle: &mut O,
    ) -> (InteractionState, InteractionOutcome) {
        match oracle.play_move(&mv) {
            Ok(()) => (
                InteractionState::Idle,
                InteractionOutcome::Committed(LocalMove { mv, mover }),
            ),
            Err(err) => {
                warn!("[INPUT] Engine refused {}: {}", mv, err);
                (InteractionState::Idle, InteractionOutcome::Rejected(err))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::error::GameResult;
    use crate::game::resources::{CaptureSummary, ChessEngine};
    use crate::input::pointer::square_center;

    const SIZE: f32 = 800.0;

    fn sq(notation: &str) -> Square {
        Square::from_notation(notation).expect("valid square")
    }

    fn setup() -> (BoardInteraction, ChessEngine) {
        (
            BoardInteraction::new(BoardRect::square(SIZE), Orientation::WhiteBottom),
            ChessEngine::new(),
        )
    }

    fn at(interaction: &BoardInteraction, notation: &str) -> (f32, f32) {
        square_center(sq(notation), interaction.board(), interaction.orientation())
    }

    fn down(i: &mut BoardInteraction, e: &mut ChessEngine, notation: &str) -> InteractionOutcome {
        let (x, y) = at(i, notation);
        i.handle(BoardInput::Pointer(PointerEvent::Down { x, y }), e, InputGate::default())
    }

    fn drag(i: &mut BoardInteraction, e: &mut ChessEngine, notation: &str) -> InteractionOutcome {
        let (x, y) = at(i, notation);
        i.handle(BoardInput::Pointer(PointerEvent::Move { x, y }), e, InputGate::default())
    }

    fn up(i: &mut BoardInteraction, e: &mut ChessEngine, notation: &str) -> InteractionOutcome {
        let (x, y) = at(i, notation);
        i.handle(BoardInput::Pointer(PointerEvent::Up { x, y }), e, InputGate::default())
    }

    #[test]
    fn test_drag_and_drop_commits_move() {
        let (mut i, mut e) = setup();
        assert_eq!(down(&mut i, &mut e, "e2"), InteractionOutcome::Selected(sq("e2")));
        assert_eq!(drag(&mut i, &mut e, "e4"), InteractionOutcome::Dragging { hover: sq("e4") });
        assert_eq!(i.hover_square(), Some(sq("e4")));

        let outcome = up(&mut i, &mut e, "e4");
        assert_eq!(
            outcome,
            InteractionOutcome::Committed(LocalMove {
                mv: Move::new(sq("e2"), sq("e4")),
                mover: Color::White,
            })
        );
        assert_eq!(i.state(), &InteractionState::Idle);
        assert_eq!(e.turn(), Color::Black);
    }

    #[test]
    fn test_click_select_then_click_destination() {
        //! Pressing a highlighted destination moves without dragging
        let (mut i, mut e) = setup();
        down(&mut i, &mut e, "g1");
        assert_eq!(up(&mut i, &mut e, "g1"), InteractionOutcome::Released);
        assert!(i.legal_destinations().contains(&sq("f3")));

        let outcome = down(&mut i, &mut e, "f3");
        assert!(matches!(outcome, InteractionOutcome::Committed(_)));
        assert!(e.piece_at(sq("f3")).is_some());
    }

    #[test]
    fn test_reselect_returns_to_idle_without_change() {
        let (mut i, mut e) = setup();
        let before = e.board_snapshot();
        down(&mut i, &mut e, "e2");
        up(&mut i, &mut e, "e2");
        down(&mut i, &mut e, "e2");
        assert_eq!(up(&mut i, &mut e, "e2"), InteractionOutcome::Reset);
        assert_eq!(i.state(), &InteractionState::Idle);
        assert_eq!(e.board_snapshot(), before);
    }

    #[test]
    fn test_illegal_drop_resets() {
        let (mut i, mut e) = setup();
        down(&mut i, &mut e, "e2");
        drag(&mut i, &mut e, "e5");
        assert_eq!(up(&mut i, &mut e, "e5"), InteractionOutcome::Reset);
        assert_eq!(i.state(), &InteractionState::Idle);
        assert_eq!(e.turn(), Color::White);
    }

    #[test]
    fn test_drag_back_to_origin_keeps_selection() {
        let (mut i, mut e) = setup();
        down(&mut i, &mut e, "e2");
        drag(&mut i, &mut e, "e3");
        assert_eq!(up(&mut i, &mut e, "e2"), InteractionOutcome::Released);
        assert!(i.selection().is_some());
    }

    #[test]
    fn test_wrong_side_resets() {
        //! Picking up a black piece on White's turn resets the interaction
        let (mut i, mut e) = setup();
        down(&mut i, &mut e, "e2");
        up(&mut i, &mut e, "e2");
        assert_eq!(down(&mut i, &mut e, "e7"), InteractionOutcome::Reset);
        assert_eq!(i.state(), &InteractionState::Idle);
    }

    #[test]
    fn test_seat_ignores_opponent_pieces() {
        let (mut i, mut e) = setup();
        e.play_move(&"e2e4".parse().expect("valid")).expect("legal");
        let (x, y) = at(&i, "e7");
        let gate = InputGate {
            seat: Some(Color::White),
            game_over: false,
        };
        let outcome = i.handle(BoardInput::Pointer(PointerEvent::Down { x, y }), &mut e, gate);
        assert_eq!(outcome, InteractionOutcome::Ignored);
    }

    #[test]
    fn test_not_my_turn_rejects_selection() {
        //! A seated player cannot pick up pieces while the opponent is to move
        let (mut i, mut e) = setup();
        e.play_move(&"e2e4".parse().expect("valid")).expect("legal");
        let (x, y) = at(&i, "d2");
        let gate = InputGate {
            seat: Some(Color::White),
            game_over: false,
        };
        let outcome = i.handle(BoardInput::Pointer(PointerEvent::Down { x, y }), &mut e, gate);
        assert_eq!(outcome, InteractionOutcome::Reset);
        assert!(i.selection().is_none());
    }

    #[test]
    fn test_game_over_ignores_input() {
        let (mut i, mut e) = setup();
        let (x, y) = at(&i, "e2");
        let gate = InputGate {
            seat: None,
            game_over: true,
        };
        let outcome = i.handle(BoardInput::Pointer(PointerEvent::Down { x, y }), &mut e, gate);
        assert_eq!(outcome, InteractionOutcome::Ignored);
    }

    #[test]
    fn test_cancel_drag() {
        let (mut i, mut e) = setup();
        down(&mut i, &mut e, "e2");
        drag(&mut i, &mut e, "e4");
        let outcome = i.handle(BoardInput::CancelDrag, &mut e, InputGate::default());
        assert_eq!(outcome, InteractionOutcome::Reset);
        assert_eq!(e.turn(), Color::White);
    }

    #[test]
    fn test_promotion_prompt_and_choice() {
        let mut e = ChessEngine::from_fen("8/P6k/8/8/8/8/8/K7 w - - 0 1").expect("valid fen");
        let mut i = BoardInteraction::new(BoardRect::square(SIZE), Orientation::WhiteBottom);
        down(&mut i, &mut e, "a7");
        drag(&mut i, &mut e, "a8");
        assert_eq!(
            up(&mut i, &mut e, "a8"),
            InteractionOutcome::PromotionRequired {
                from: sq("a7"),
                to: sq("a8"),
            }
        );
        assert_eq!(e.turn(), Color::White, "Nothing applied before the choice");

        let outcome = i.handle(
            BoardInput::ChoosePromotion(PromotionPiece::Knight),
            &mut e,
            InputGate::default(),
        );
        assert_eq!(
            outcome,
            InteractionOutcome::Committed(LocalMove {
                mv: Move::with_promotion(sq("a7"), sq("a8"), PromotionPiece::Knight),
                mover: Color::White,
            })
        );
        assert_eq!(
            e.piece_at(sq("a8")).map(|p| p.kind),
            Some(crate::game::types::PieceKind::Knight)
        );
    }

    #[test]
    fn test_click_outside_promotion_prompt_cancels() {
        let mut e = ChessEngine::from_fen("8/P6k/8/8/8/8/8/K7 w - - 0 1").expect("valid fen");
        let mut i = BoardInteraction::new(BoardRect::square(SIZE), Orientation::WhiteBottom);
        down(&mut i, &mut e, "a7");
        drag(&mut i, &mut e, "a8");
        up(&mut i, &mut e, "a8");

        assert_eq!(down(&mut i, &mut e, "d4"), InteractionOutcome::Reset);
        assert_eq!(i.state(), &InteractionState::Idle);
        assert!(e.piece_at(sq("a7")).is_some());
    }

    #[test]
    fn test_flipped_board_targets_mirrored_squares() {
        let mut e = ChessEngine::new();
        let mut i = BoardInteraction::new(BoardRect::square(SIZE), Orientation::BlackBottom);
        e.play_move(&"e2e4".parse().expect("valid")).expect("legal");
        assert_eq!(down(&mut i, &mut e, "d7"), InteractionOutcome::Selected(sq("d7")));
        drag(&mut i, &mut e, "d5");
        assert!(matches!(up(&mut i, &mut e, "d5"), InteractionOutcome::Committed(_)));
    }

    /// Lists the engine's moves but refuses to play any of them
    struct RefusingOracle(ChessEngine);

    impl MoveOracle for RefusingOracle {
        fn reset(&mut self, fen: &str) -> GameResult<()> {
            self.0.reset(fen)
        }
        fn load_position(&mut self, fen: &str) -> GameResult<()> {
            self.0.load_position(fen)
        }
        fn moves_for_square(&self, square: Square) -> Vec<Move> {
            self.0.moves_for_square(square)
        }
        fn play_move(&mut self, mv: &Move) -> GameResult<()> {
            Err(GameError::IllegalMove { mv: mv.to_string() })
        }
        fn turn(&self) -> Color {
            self.0.turn()
        }
        fn is_checkmate(&self) -> bool {
            false
        }
        fn is_stalemate(&self) -> bool {
            false
        }
        fn is_insufficient_material(&self) -> bool {
            false
        }
        fn is_threefold_repetition(&self) -> bool {
            false
        }
        fn board_snapshot(&self) -> Vec<Piece> {
            self.0.board_snapshot()
        }
        fn captured_pieces(&self, color: Color) -> CaptureSummary {
            self.0.captured_pieces(color)
        }
        fn material_advantage(&self) -> i32 {
            self.0.material_advantage()
        }
    }

    #[test]
    fn test_engine_refusal_returns_to_idle() {
        //! A listed move the engine still refuses ends like an illegal drop
        let mut oracle = RefusingOracle(ChessEngine::new());
        let mut i = BoardInteraction::new(BoardRect::square(SIZE), Orientation::WhiteBottom);
        let gate = InputGate::default();
        for event in [
            PointerEvent::Down { x: at(&i, "e2").0, y: at(&i, "e2").1 },
            PointerEvent::Move { x: at(&i, "e4").0, y: at(&i, "e4").1 },
        ] {
            i.handle(BoardInput::Pointer(event), &mut oracle, gate);
        }
        let (x, y) = at(&i, "e4");
        let outcome = i.handle(BoardInput::Pointer(PointerEvent::Up { x, y }), &mut oracle, gate);

        assert_eq!(
            outcome,
            InteractionOutcome::Rejected(GameError::IllegalMove {
                mv: "e2e4".to_string()
            })
        );
        assert_eq!(i.state(), &InteractionState::Idle);
        assert_eq!(oracle.turn(), Color::White);
    }
}
