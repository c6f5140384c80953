//! Terminal front end for the game client
//!
//! Provides a text rendition of the board and a small command language that
//! drives the interaction state machine exactly like a pointer would:
//! - Board drawn from the snapshot through the same orientation mapping used
//!   for pointer targeting, with legal destinations and the recent move marked
//! - Captured pieces per side with the material balance
//! - Commands turned into synthetic pointer events at square centres
//!
//! # Commands
//!
//! ```text
//! e2e4 / e7e8q     drag a piece (promotion letter answers the prompt)
//! click e2         press and release on a square
//! promote q        answer an open promotion prompt
//! board            redraw
//! captures         captured pieces and balance
//! status           side to move and result
//! leave            leave the current room
//! help / quit
//! ```

use crate::game::resources::CaptureSummary;
use crate::game::systems::{BoardInput, PointerEvent};
use crate::game::types::{Color, Move, Piece, PromotionPiece, Square};
use crate::input::pointer::{display_cell, square_at_cell, square_center, BoardRect, Cell, Orientation};
use std::fmt::Write;

/// Help text listing the commands
pub const HELP: &str = "\
commands:
  e2e4 | e7e8q   move a piece (drag)
  click <sq>     press and release on a square
  promote <q|r|b|n>
  board | captures | status | leave | help | quit";

/// Errors reading a command line
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CommandError {
    #[error("Empty command")]
    Empty,

    #[error("Unknown command {0:?}, type help")]
    Unknown(String),

    #[error("{command} needs {expected}")]
    MissingArgument {
        command: &'static str,
        expected: &'static str,
    },

    #[error("Invalid {what}: {value:?}")]
    InvalidArgument { what: &'static str, value: String },
}

/// A parsed terminal command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Move(Move),
    Click(Square),
    Promote(PromotionPiece),
    Board,
    Captures,
    Status,
    Leave,
    Help,
    Quit,
}

impl Command {
    pub fn parse(line: &str) -> Result<Self, CommandError> {
        let mut words = line.split_whitespace();
        let Some(head) = words.next() else {
            return Err(CommandError::Empty);
        };
        let head = head.to_ascii_lowercase();
        let arg = words.next();

        match head.as_str() {
            "board" | "b" => Ok(Command::Board),
            "captures" | "c" => Ok(Command::Captures),
            "status" | "s" => Ok(Command::Status),
            "leave" => Ok(Command::Leave),
            "help" | "?" => Ok(Command::Help),
            "quit" | "exit" | "q" => Ok(Command::Quit),
            "click" => {
                let value = arg.ok_or(CommandError::MissingArgument {
                    command: "click",
                    expected: "a square",
                })?;
                Square::from_notation(&value.to_ascii_lowercase())
                    .map(Command::Click)
                    .ok_or_else(|| CommandError::InvalidArgument {
                        what: "square",
                        value: value.to_string(),
                    })
            }
            "promote" => {
                let value = arg.ok_or(CommandError::MissingArgument {
                    command: "promote",
                    expected: "one of q r b n",
                })?;
                let mut letters = value.chars();
                match (letters.next().and_then(PromotionPiece::from_letter), letters.next()) {
                    (Some(piece), None) => Ok(Command::Promote(piece)),
                    _ => Err(CommandError::InvalidArgument {
                        what: "promotion piece",
                        value: value.to_string(),
                    }),
                }
            }
            text => text
                .parse::<Move>()
                .map(Command::Move)
                .map_err(|_| CommandError::Unknown(line.trim().to_string())),
        }
    }
}

/// Pointer events that drag `mv.from` onto `mv.to`
///
/// A promotion letter in `mv` is appended as the prompt's answer.
pub fn drag_script(mv: Move, board: &BoardRect, orientation: Orientation) -> Vec<BoardInput> {
    let (fx, fy) = square_center(mv.from, board, orientation);
    let (tx, ty) = square_center(mv.to, board, orientation);
    let mut script = vec![
        BoardInput::Pointer(PointerEvent::Down { x: fx, y: fy }),
        BoardInput::Pointer(PointerEvent::Move { x: tx, y: ty }),
        BoardInput::Pointer(PointerEvent::Up { x: tx, y: ty }),
    ];
    if let Some(piece) = mv.promotion {
        script.push(BoardInput::ChoosePromotion(piece));
    }
    script
}

/// Pointer events for pressing and releasing on `square`
pub fn click_script(square: Square, board: &BoardRect, orientation: Orientation) -> Vec<BoardInput> {
    let (x, y) = square_center(square, board, orientation);
    vec![
        BoardInput::Pointer(PointerEvent::Down { x, y }),
        BoardInput::Pointer(PointerEvent::Up { x, y }),
    ]
}

/// Markers drawn on top of the pieces
#[derive(Debug, Clone, Default)]
pub struct BoardMarks {
    pub destinations: Vec<Square>,
    pub recent: Option<Move>,
}

/// Render the board with `orientation`'s side at the bottom
///
/// Legal destinations show as `*` on empty squares and are bracketed when
/// occupied; the recent move's squares are bracketed with `( )`.
pub fn render_board(pieces: &[Piece], orientation: Orientation, marks: &BoardMarks) -> String {
    let mut grid = [['.'; 8]; 8];
    for piece in pieces {
        let Cell { row, col } = display_cell(piece.square, orientation);
        grid[usize::from(row)][usize::from(col)] = piece.symbol();
    }

    let mut out = String::new();
    for row in 0..8u8 {
        let rank_label = if orientation.is_flipped() { row + 1 } else { 8 - row };
        let _ = write!(out, "{rank_label} ");
        for col in 0..8u8 {
            let square = square_at_cell(Cell { row, col }, orientation);
            let symbol = grid[usize::from(row)][usize::from(col)];
            let is_destination = marks.destinations.contains(&square);
            let is_recent = marks
                .recent
                .is_some_and(|mv| mv.from == square || mv.to == square);
            let cell = match (is_destination, is_recent, symbol) {
                (true, _, '.') => " * ".to_string(),
                (true, _, symbol) => format!("[{symbol}]"),
                (false, true, symbol) => format!("({symbol})"),
                (false, false, symbol) => format!(" {symbol} "),
            };
            out.push_str(&cell);
        }
        out.push('\n');
    }

    out.push_str("  ");
    for col in 0..8u8 {
        let file = if orientation.is_flipped() { 7 - col } else { col };
        let _ = write!(out, " {} ", (b'a' + file) as char);
    }
    out
}

/// One line per side: pieces lost, pawns collapsed into a count
pub fn render_captures(lost_by: impl Fn(Color) -> CaptureSummary, advantage: i32) -> String {
    let mut out = String::new();
    for color in [Color::White, Color::Black] {
        let summary = lost_by(color);
        let _ = write!(out, "{} lost:", color.name());
        if summary.is_empty() {
            out.push_str(" nothing");
        }
        for kind in &summary.pieces {
            let _ = write!(out, " {}", kind.letter());
        }
        if summary.pawns > 0 {
            let _ = write!(out, " p x{}", summary.pawns);
        }
        out.push('\n');
    }
    let _ = match advantage {
        0 => write!(out, "Material even"),
        n if n > 0 => write!(out, "White +{n}"),
        n => write!(out, "Black +{}", -n),
    };
    out
}
