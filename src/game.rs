//! Game state for the terminal client
//!
//! The rules library is the source of truth: every move, whether typed by the
//! user or suggested by the engine, goes through it before it is recorded.
//! The engine only ever sees the starting position plus the list of moves
//! played so far.

use crate::client::AnalyzeBody;
use crate::error::{ClientError, ClientResult};
use shakmaty::fen::Fen;
use shakmaty::uci::Uci;
use shakmaty::{CastlingMode, Chess, Color, Move, Outcome, Position};

/// A game in progress
#[derive(Debug, Clone, Default)]
pub struct Game {
    /// FEN the game started from; `None` for the initial layout
    start_fen: Option<String>,
    position: Chess,
    /// Moves played so far, as UCI tokens
    moves: Vec<String>,
}

impl Game {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an arbitrary position
    ///
    /// Blank input means the initial layout, the same as the API.
    pub fn from_fen(fen: &str) -> ClientResult<Self> {
        let fen = fen.trim();
        if fen.is_empty() || fen == "startpos" {
            return Ok(Self::new());
        }

        let parsed: Fen = fen.parse().map_err(|e| ClientError::InvalidPosition {
            message: format!("{e}"),
        })?;
        let position: Chess =
            parsed
                .into_position(CastlingMode::Standard)
                .map_err(|e| ClientError::InvalidPosition {
                    message: format!("{e}"),
                })?;

        Ok(Self {
            start_fen: Some(fen.to_string()),
            position,
            moves: Vec::new(),
        })
    }

    pub fn position(&self) -> &Chess {
        &self.position
    }

    pub fn moves(&self) -> &[String] {
        &self.moves
    }

    pub fn turn(&self) -> Color {
        self.position.turn()
    }

    /// Apply a move typed by the user
    pub fn play_user(&mut self, uci: &str) -> ClientResult<()> {
        let m = legal_move(&self.position, uci).ok_or_else(|| ClientError::IllegalMove {
            uci: uci.trim().to_string(),
        })?;
        self.apply(&m);
        Ok(())
    }

    /// Apply the engine's best move
    ///
    /// A move the rules library rejects is reported as
    /// [`ClientError::IllegalEngineMove`] and leaves the game unchanged.
    pub fn apply_engine_move(&mut self, uci: &str) -> ClientResult<()> {
        let m = legal_move(&self.position, uci).ok_or_else(|| ClientError::IllegalEngineMove {
            uci: uci.trim().to_string(),
        })?;
        self.apply(&m);
        Ok(())
    }

    pub fn outcome(&self) -> Option<Outcome> {
        self.position.outcome()
    }

    /// Request body asking the engine about the current position
    pub fn analysis_request(&self, depth: Option<u32>, movetime: Option<u64>) -> AnalyzeBody {
        AnalyzeBody {
            fen: self.start_fen.clone(),
            moves: self.moves.clone(),
            depth,
            movetime,
        }
    }

    fn apply(&mut self, m: &Move) {
        self.moves
            .push(m.to_uci(CastlingMode::Standard).to_string());
        self.position.play_unchecked(m);
    }
}

/// Parse a UCI token and check it against the position
fn legal_move(position: &Chess, uci: &str) -> Option<Move> {
    let uci: Uci = uci.trim().parse().ok()?;
    uci.to_move(position).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_game_is_white_to_move() {
        let game = Game::new();
        assert_eq!(game.turn(), Color::White);
        assert!(game.moves().is_empty());
        assert!(game.outcome().is_none());
    }

    #[test]
    fn test_user_moves_are_recorded_in_order() {
        let mut game = Game::new();
        game.play_user("e2e4").expect("legal");
        game.play_user(" e7e5 ").expect("legal");
        assert_eq!(game.moves(), ["e2e4", "e7e5"]);
        assert_eq!(game.turn(), Color::White);
    }

    #[test]
    fn test_illegal_user_move_rejected() {
        let mut game = Game::new();
        assert!(matches!(
            game.play_user("e2e5"),
            Err(ClientError::IllegalMove { .. })
        ));
        assert!(matches!(
            game.play_user("hello"),
            Err(ClientError::IllegalMove { .. })
        ));
        assert!(game.moves().is_empty());
    }

    #[test]
    fn test_illegal_engine_move_surfaced() {
        let mut game = Game::new();
        let err = game.apply_engine_move("e1e8").expect_err("illegal");
        assert!(matches!(err, ClientError::IllegalEngineMove { ref uci } if uci == "e1e8"));

        let err = game.apply_engine_move("(none)").expect_err("no move");
        assert!(matches!(err, ClientError::IllegalEngineMove { .. }));
        assert!(game.moves().is_empty());
    }

    #[test]
    fn test_engine_move_applied() {
        let mut game = Game::new();
        game.play_user("e2e4").expect("legal");
        game.apply_engine_move("c7c5").expect("legal");
        assert_eq!(game.moves(), ["e2e4", "c7c5"]);
    }

    #[test]
    fn test_fools_mate_ends_game() {
        let mut game = Game::new();
        for uci in ["f2f3", "e7e5", "g2g4"] {
            game.play_user(uci).expect("legal");
        }
        game.apply_engine_move("d8h4").expect("legal");
        assert_eq!(
            game.outcome(),
            Some(Outcome::Decisive {
                winner: Color::Black
            })
        );
    }

    #[test]
    fn test_from_fen() {
        let fen = "4k3/8/8/8/8/8/8/4K2R w K - 0 1";
        let mut game = Game::from_fen(fen).expect("valid fen");
        game.play_user("e1g1").expect("castling is legal");

        let body = game.analysis_request(Some(10), None);
        assert_eq!(body.fen.as_deref(), Some(fen));
        assert_eq!(body.moves, vec!["e1g1"]);
        assert_eq!(body.depth, Some(10));
    }

    #[test]
    fn test_blank_fen_is_initial_layout() {
        let game = Game::from_fen("  ").expect("blank is startpos");
        assert!(game.analysis_request(None, Some(600)).fen.is_none());
    }

    #[test]
    fn test_invalid_fen_rejected() {
        assert!(matches!(
            Game::from_fen("not a fen"),
            Err(ClientError::InvalidPosition { .. })
        ));
        // Parses, but both kings are missing
        assert!(matches!(
            Game::from_fen("8/8/8/8/8/8/8/8 w - - 0 1"),
            Err(ClientError::InvalidPosition { .. })
        ));
    }
}
