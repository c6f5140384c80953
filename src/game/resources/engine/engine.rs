//! Chess engine resource - single source of truth for the position
//!
//! Wraps a `shakmaty::Chess` position behind [`MoveOracle`], converting
//! between engine types and the client's own [`Square`], [`Piece`] and
//! [`Move`] types. No shakmaty type leaves this module.
//!
//! # Bookkeeping
//!
//! Besides the position itself the engine keeps:
//! - captured pieces, recorded as moves are applied
//! - a key for every position reached, used for threefold repetition
//!
//! # Repetition Key
//!
//! Two positions count as the same when the same pieces stand on the same
//! squares, the same side is to move, the same castling rights remain and
//! the same en passant capture (if any) is legal. Rights that cannot be used
//! yet still distinguish positions.
//!
//! # Move Conversion
//!
//! - Castling is reported as the king's two-square step (`e1g1`, `e8c8`)
//! - En passant is an ordinary pawn move to the empty target square
//! - Drop moves never occur in standard chess and are skipped

use super::{MoveOracle, STARTING_FEN};
use crate::game::error::{GameError, GameResult};
use crate::game::resources::captured::{CaptureSummary, CapturedPieces};
use crate::game::types::{Color, Move, Piece, PieceKind, PromotionPiece, Square};
use shakmaty::fen::Fen;
use shakmaty::{CastlingMode, Chess, EnPassantMode, Position, Role};
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use tracing::{debug, info};

/// Chess engine resource
///
/// # Usage
///
/// ```rust,ignore
/// let mut engine = ChessEngine::new();
/// let e2 = Square::from_notation("e2").unwrap();
/// let moves = engine.moves_for_square(e2); // e2e3, e2e4
/// engine.play_move(&moves[1])?;
/// assert_eq!(engine.turn(), Color::Black);
/// ```
#[derive(Debug, Clone)]
pub struct ChessEngine {
    position: Chess,
    captured: CapturedPieces,
    /// Repetition keys of every position reached, oldest first
    history: Vec<u64>,
}

impl Default for ChessEngine {
    fn default() -> Self {
        let mut engine = Self {
            position: Chess::default(),
            captured: CapturedPieces::default(),
            history: Vec::new(),
        };
        engine.history.push(engine.position_key());
        engine
    }
}

impl ChessEngine {
    /// Engine at the standard starting position
    pub fn new() -> Self {
        Self::default()
    }

    /// Engine at an arbitrary position
    pub fn from_fen(fen: &str) -> GameResult<Self> {
        let mut engine = Self::default();
        engine.load_position(fen)?;
        Ok(engine)
    }

    fn parse_position(fen: &str) -> GameResult<Chess> {
        let parsed = fen
            .parse::<Fen>()
            .map_err(|err| GameError::InvalidPosition {
                message: format!("{fen:?}: {err}"),
            })?;
        parsed
            .into_position(CastlingMode::Standard)
            .map_err(|err| GameError::InvalidPosition {
                message: format!("{fen:?}: {err}"),
            })
    }

    /// Engine moves starting on `square`, paired with their client form
    fn engine_moves_from(&self, square: Square) -> Vec<(shakmaty::Move, Move)> {
        let from = to_engine_square(square);
        self.position
            .legal_moves()
            .into_iter()
            .filter(|m| m.from() == Some(from))
            .filter_map(|m| from_engine_move(&m).map(|mv| (m, mv)))
            .collect()
    }

    fn position_key(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        for piece in self.board_snapshot() {
            piece.hash(&mut hasher);
        }
        self.turn().hash(&mut hasher);
        self.position.castles().castling_rights().hash(&mut hasher);
        self.position.ep_square(EnPassantMode::Legal).hash(&mut hasher);
        hasher.finish()
    }

    /// Number of positions recorded since the last reset, including the first
    pub fn positions_seen(&self) -> usize {
        self.history.len()
    }
}

impl MoveOracle for ChessEngine {
    fn reset(&mut self, fen: &str) -> GameResult<()> {
        self.load_position(fen)?;
        info!(
            "[ENGINE] Reset to {}",
            if fen == STARTING_FEN { "starting position" } else { fen }
        );
        Ok(())
    }

    fn load_position(&mut self, fen: &str) -> GameResult<()> {
        self.position = Self::parse_position(fen)?;
        self.captured.clear();
        self.history.clear();
        self.history.push(self.position_key());
        Ok(())
    }

    fn moves_for_square(&self, square: Square) -> Vec<Move> {
        self.engine_moves_from(square)
            .into_iter()
            .map(|(_, mv)| mv)
            .collect()
    }

    fn play_move(&mut self, mv: &Move) -> GameResult<()> {
        let illegal = || GameError::IllegalMove { mv: mv.to_string() };
        let engine_move = self
            .engine_moves_from(mv.from)
            .into_iter()
            .find(|(_, candidate)| candidate == mv)
            .map(|(engine_move, _)| engine_move)
            .ok_or_else(illegal)?;

        let mover = self.turn();
        let captured = engine_move.capture();
        self.position = self
            .position
            .clone()
            .play(engine_move)
            .map_err(|_| illegal())?;

        if let Some(role) = captured {
            self.captured.add_capture(mover.opposite(), kind_from_role(role));
        }
        self.history.push(self.position_key());

        debug!("[ENGINE] {} played {}", mover.name(), mv);
        Ok(())
    }

    fn turn(&self) -> Color {
        from_engine_color(self.position.turn())
    }

    fn is_checkmate(&self) -> bool {
        self.position.is_checkmate()
    }

    fn is_stalemate(&self) -> bool {
        self.position.is_stalemate()
    }

    fn is_insufficient_material(&self) -> bool {
        self.position.is_insufficient_material()
    }

    fn is_threefold_repetition(&self) -> bool {
        match self.history.last() {
            Some(current) => self.history.iter().filter(|key| *key == current).count() >= 3,
            None => false,
        }
    }

    fn board_snapshot(&self) -> Vec<Piece> {
        Square::all().filter_map(|square| self.piece_at(square)).collect()
    }

    fn captured_pieces(&self, color: Color) -> CaptureSummary {
        self.captured.summary(color)
    }

    fn material_advantage(&self) -> i32 {
        self.captured.material_advantage()
    }

    fn piece_at(&self, square: Square) -> Option<Piece> {
        self.position
            .board()
            .piece_at(to_engine_square(square))
            .map(|piece| Piece {
                kind: kind_from_role(piece.role),
                color: from_engine_color(piece.color),
                square,
            })
    }
}

fn to_engine_square(square: Square) -> shakmaty::Square {
    shakmaty::Square::new(u32::from(square.index()))
}

fn from_engine_square(square: shakmaty::Square) -> Option<Square> {
    Square::from_index(square as u8)
}

fn from_engine_color(color: shakmaty::Color) -> Color {
    match color {
        shakmaty::Color::White => Color::White,
        shakmaty::Color::Black => Color::Black,
    }
}

fn kind_from_role(role: Role) -> PieceKind {
    match role {
        Role::Pawn => PieceKind::Pawn,
        Role::Knight => PieceKind::Knight,
        Role::Bishop => PieceKind::Bishop,
        Role::Rook => PieceKind::Rook,
        Role::Queen => PieceKind::Queen,
        Role::King => PieceKind::King,
    }
}

fn promotion_from_role(role: Role) -> Option<PromotionPiece> {
    match role {
        Role::Queen => Some(PromotionPiece::Queen),
        Role::Rook => Some(PromotionPiece::Rook),
        Role::Bishop => Some(PromotionPiece::Bishop),
        Role::Knight => Some(PromotionPiece::Knight),
        Role::Pawn | Role::King => None,
    }
}

fn from_engine_move(m: &shakmaty::Move) -> Option<Move> {
    match m {
        shakmaty::Move::Normal {
            from, to, promotion, ..
        } => Some(Move {
            from: from_engine_square(*from)?,
            to: from_engine_square(*to)?,
            promotion: promotion.and_then(promotion_from_role),
        }),
        shakmaty::Move::EnPassant { from, to } => Some(Move::new(
            from_engine_square(*from)?,
            from_engine_square(*to)?,
        )),
        shakmaty::Move::Castle { king, rook } => {
            // Engine encodes castling as king-takes-rook
            let king_file = if (rook.file() as u8) > (king.file() as u8) { 6 } else { 2 };
            Some(Move::new(
                from_engine_square(*king)?,
                Square::new(king_file, king.rank() as u8)?,
            ))
        }
        shakmaty::Move::Put { .. } => None,
    }
}
