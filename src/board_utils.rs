//! Text rendering for the terminal board

use shakmaty::{Board, Color, File, Rank, Square};

/// Render the board as an 8x8 grid with coordinates
///
/// White pieces are uppercase, black lowercase, empty squares `.`. The side
/// given as `perspective` is drawn at the bottom.
pub fn render_board(board: &Board, perspective: Color) -> String {
    let ranks: Vec<u32> = match perspective {
        Color::White => (0..8).rev().collect(),
        Color::Black => (0..8).collect(),
    };
    let files: Vec<u32> = match perspective {
        Color::White => (0..8).collect(),
        Color::Black => (0..8).rev().collect(),
    };

    let mut out = String::new();
    for &rank in &ranks {
        out.push_str(&format!("{} ", rank + 1));
        for &file in &files {
            let square = Square::from_coords(File::new(file), Rank::new(rank));
            let symbol = board.piece_at(square).map(|p| p.char()).unwrap_or('.');
            out.push(' ');
            out.push(symbol);
        }
        out.push('\n');
    }

    out.push_str("  ");
    for &file in &files {
        out.push(' ');
        out.push(char::from(b'a' + file as u8));
    }
    out.push('\n');
    out
}
