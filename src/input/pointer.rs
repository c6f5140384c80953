//! Pointer coordinate mapping between screen pixels and board squares
//!
//! Pure functions: nothing here reads or writes game state.
//!
//! # Coordinate Spaces
//!
//! - **Client pixels**: pointer position as delivered by the windowing layer
//! - **Board pixels**: client pixels minus the board's top-left corner
//! - **Cells**: display grid, `row` 0 at the top, `col` 0 at the left
//! - **Squares**: chess coordinates (file a-h, rank 1-8)
//!
//! # Orientation
//!
//! With White at the bottom, cell (row, col) is file `col`, rank `7 - row`.
//! Flipping mirrors both axes: file `7 - col`, rank `row`. Targeting and
//! highlight placement both go through [`display_cell`] / [`square_at_cell`]
//! so they cannot disagree.
//!
//! # Clamping
//!
//! Pointer positions are clamped to the board before dividing into cells,
//! so a drag released outside the board lands on the nearest edge square.

use crate::game::types::{Color, Square};

/// Board rectangle in client pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoardRect {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl BoardRect {
    pub fn new(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// Square board of `size` pixels anchored at the origin
    pub fn square(size: f32) -> Self {
        Self::new(0.0, 0.0, size, size)
    }

    pub fn square_width(&self) -> f32 {
        self.width / 8.0
    }

    pub fn square_height(&self) -> f32 {
        self.height / 8.0
    }

    /// Client position converted to board pixels and clamped to the board
    pub fn clamp_local(&self, x: f32, y: f32) -> (f32, f32) {
        (
            (x - self.left).clamp(0.0, self.width.max(0.0)),
            (y - self.top).clamp(0.0, self.height.max(0.0)),
        )
    }
}

/// Which side is drawn at the bottom of the board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Orientation {
    #[default]
    WhiteBottom,
    BlackBottom,
}

impl Orientation {
    /// Orientation that puts `color` at the bottom
    pub fn for_color(color: Color) -> Self {
        match color {
            Color::White => Orientation::WhiteBottom,
            Color::Black => Orientation::BlackBottom,
        }
    }

    pub fn is_flipped(self) -> bool {
        self == Orientation::BlackBottom
    }
}

/// Display grid position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Cell {
    pub row: u8,
    pub col: u8,
}

/// Cell where `square` is drawn
pub fn display_cell(square: Square, orientation: Orientation) -> Cell {
    match orientation {
        Orientation::WhiteBottom => Cell {
            row: 7 - square.rank(),
            col: square.file(),
        },
        Orientation::BlackBottom => Cell {
            row: square.rank(),
            col: 7 - square.file(),
        },
    }
}

/// Square drawn at `cell`
///
/// Rows and columns past the edge are clamped to 7.
pub fn square_at_cell(cell: Cell, orientation: Orientation) -> Square {
    let row = cell.row.min(7);
    let col = cell.col.min(7);
    let (file, rank) = match orientation {
        Orientation::WhiteBottom => (col, 7 - row),
        Orientation::BlackBottom => (7 - col, row),
    };
    Square::clamped(file, rank)
}

/// Square under a pointer position
///
/// # Arguments
///
/// * `x`, `y` - Pointer position in client pixels
/// * `board` - Board rectangle in client pixels
/// * `orientation` - Which side is at the bottom
///
/// # Returns
///
/// The square under the pointer, or the nearest edge square when the pointer
/// is outside the board.
pub fn pixel_to_square(x: f32, y: f32, board: &BoardRect, orientation: Orientation) -> Square {
    let (local_x, local_y) = board.clamp_local(x, y);
    let col = cell_index(local_x, board.square_width());
    let row = cell_index(local_y, board.square_height());
    square_at_cell(Cell { row, col }, orientation)
}

fn cell_index(offset: f32, cell_size: f32) -> u8 {
    if cell_size <= 0.0 || !offset.is_finite() {
        return 0;
    }
    (offset / cell_size).floor().clamp(0.0, 7.0) as u8
}

/// Top-left corner of `square` in board pixels
///
/// Inverse of [`pixel_to_square`]: any point inside the returned cell maps
/// back to `square`.
pub fn square_to_pixel_offset(square: Square, board: &BoardRect, orientation: Orientation) -> (f32, f32) {
    let cell = display_cell(square, orientation);
    (
        f32::from(cell.col) * board.square_width(),
        f32::from(cell.row) * board.square_height(),
    )
}

/// Centre of `square` in client pixels
pub fn square_center(square: Square, board: &BoardRect, orientation: Orientation) -> (f32, f32) {
    let (x, y) = square_to_pixel_offset(square, board, orientation);
    (
        board.left + x + board.square_width() / 2.0,
        board.top + y + board.square_height() / 2.0,
    )
}

/// Top-left position of a dragged piece in board pixels
///
/// The piece is centred on the pointer and kept fully inside the board.
pub fn drag_offset(x: f32, y: f32, board: &BoardRect) -> (f32, f32) {
    let (local_x, local_y) = board.clamp_local(x, y);
    let half_w = board.square_width() / 2.0;
    let half_h = board.square_height() / 2.0;
    (
        (local_x - half_w).clamp(0.0, (board.width - board.square_width()).max(0.0)),
        (local_y - half_h).clamp(0.0, (board.height - board.square_height()).max(0.0)),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(notation: &str) -> Square {
        Square::from_notation(notation).expect("valid square")
    }

    #[test]
    fn test_corners_white_bottom() {
        //! Top-left is a8 and bottom-right is h1 with White at the bottom
        let board = BoardRect::square(800.0);
        let o = Orientation::WhiteBottom;
        assert_eq!(pixel_to_square(5.0, 5.0, &board, o), sq("a8"));
        assert_eq!(pixel_to_square(795.0, 795.0, &board, o), sq("h1"));
        assert_eq!(pixel_to_square(450.0, 650.0, &board, o), sq("e2"));
    }

    #[test]
    fn test_corners_black_bottom() {
        //! Flipping mirrors both axes
        let board = BoardRect::square(800.0);
        let o = Orientation::BlackBottom;
        assert_eq!(pixel_to_square(5.0, 5.0, &board, o), sq("h1"));
        assert_eq!(pixel_to_square(795.0, 795.0, &board, o), sq("a8"));
        assert_eq!(pixel_to_square(350.0, 150.0, &board, o), sq("e2"));
    }

    #[test]
    fn test_offboard_clamps_to_edge() {
        //! Drops outside the board resolve to the nearest edge square
        let board = BoardRect::new(100.0, 50.0, 400.0, 400.0);
        let o = Orientation::WhiteBottom;
        assert_eq!(pixel_to_square(-300.0, -300.0, &board, o), sq("a8"));
        assert_eq!(pixel_to_square(9000.0, 9000.0, &board, o), sq("h1"));
        assert_eq!(pixel_to_square(500.0, 300.0, &board, o), sq("h3"));
        assert_eq!(pixel_to_square(325.0, 10_000.0, &board, o), sq("e1"));
    }

    #[test]
    fn test_offset_is_inverse_of_mapping() {
        let board = BoardRect::new(20.0, 30.0, 640.0, 640.0);
        for orientation in [Orientation::WhiteBottom, Orientation::BlackBottom] {
            for square in Square::all() {
                let (cx, cy) = square_center(square, &board, orientation);
                assert_eq!(pixel_to_square(cx, cy, &board, orientation), square);

                let (ox, oy) = square_to_pixel_offset(square, &board, orientation);
                let corner = pixel_to_square(board.left + ox + 0.5, board.top + oy + 0.5, &board, orientation);
                assert_eq!(corner, square);
            }
        }
    }

    #[test]
    fn test_display_cell_agrees_with_targeting() {
        for orientation in [Orientation::WhiteBottom, Orientation::BlackBottom] {
            for square in Square::all() {
                assert_eq!(square_at_cell(display_cell(square, orientation), orientation), square);
            }
        }
    }

    #[test]
    fn test_drag_offset_stays_on_board() {
        let board = BoardRect::square(800.0);
        assert_eq!(drag_offset(-50.0, -50.0, &board), (0.0, 0.0));
        assert_eq!(drag_offset(5000.0, 5000.0, &board), (700.0, 700.0));
        assert_eq!(drag_offset(400.0, 400.0, &board), (350.0, 350.0));
    }

    #[test]
    fn test_orientation_for_color() {
        assert_eq!(Orientation::for_color(Color::White), Orientation::WhiteBottom);
        assert!(Orientation::for_color(Color::Black).is_flipped());
    }
}
