use std::fmt;

use shakmaty::{san::SanPlus, Chess, Move, Position};

use crate::{game::GameBuilder, tag::Headers, writer};

/// A game as a plain list of moves, without variations or comments.
///
/// The cursor is a ply index: `0` is the starting position, `len()` is the
/// position after the last move.
#[derive(Debug, Clone)]
pub struct SimpleGame {
    headers: Headers,
    moves: Vec<Move>,
    /// `boards[i]` is the position after `i` plies. Never empty.
    boards: Vec<Chess>,
    ply: usize,
}

impl Default for SimpleGame {
    fn default() -> SimpleGame {
        SimpleGame::new(Headers::default(), Chess::default())
    }
}

impl SimpleGame {
    pub fn new(headers: Headers, start: Chess) -> SimpleGame {
        SimpleGame {
            headers,
            moves: Vec::new(),
            boards: vec![start],
            ply: 0,
        }
    }

    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    pub fn headers_mut(&mut self) -> &mut Headers {
        &mut self.headers
    }

    pub fn moves(&self) -> &[Move] {
        &self.moves
    }

    pub fn len(&self) -> usize {
        self.moves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }

    /// The cursor.
    pub fn ply(&self) -> usize {
        self.ply
    }

    pub fn start_board(&self) -> &Chess {
        &self.boards[0]
    }

    /// The position at the cursor.
    pub fn board(&self) -> &Chess {
        &self.boards[self.ply]
    }

    /// The position before ply `ply`, if the game is long enough.
    pub fn board_at(&self, ply: usize) -> Option<&Chess> {
        self.boards.get(ply)
    }

    /// Plays a move at the cursor. Moves after the cursor are discarded.
    ///
    /// The move must be legal in [`SimpleGame::board()`].
    pub fn add_move(&mut self, m: Move) {
        self.moves.truncate(self.ply);
        self.boards.truncate(self.ply + 1);

        let mut board = self.board().clone();
        board.play_unchecked(m.clone());
        self.boards.push(board);
        self.moves.push(m);
        self.ply += 1;
    }

    pub fn forward(&mut self) {
        if self.ply < self.moves.len() {
            self.ply += 1;
        }
    }

    pub fn back(&mut self) {
        self.ply = self.ply.saturating_sub(1);
    }

    pub fn to_beginning(&mut self) {
        self.ply = 0;
    }

    pub fn to_end(&mut self) {
        self.ply = self.moves.len();
    }

    pub fn is_at_beginning(&self) -> bool {
        self.ply == 0
    }

    pub fn is_at_end(&self) -> bool {
        self.ply == self.moves.len()
    }

    /// The moves in SAN, with check and checkmate suffixes.
    pub fn san_moves(&self) -> Vec<SanPlus> {
        self.moves
            .iter()
            .zip(&self.boards)
            .map(|(m, board)| SanPlus::from_move(board.clone(), m.clone()))
            .collect()
    }

    /// Renders the game as PGN.
    pub fn to_pgn(&self) -> String {
        self.to_string()
    }
}

impl GameBuilder for SimpleGame {
    const ANNOTATIONS: bool = false;

    type Cursor = usize;

    fn from_headers(headers: Headers, start: Chess) -> SimpleGame {
        SimpleGame::new(headers, start)
    }

    fn headers_mut(&mut self) -> &mut Headers {
        SimpleGame::headers_mut(self)
    }

    fn board(&self) -> &Chess {
        SimpleGame::board(self)
    }

    fn cursor(&self) -> usize {
        self.ply
    }

    fn set_cursor(&mut self, ply: usize) {
        self.ply = ply.min(self.moves.len());
    }

    fn add_move(&mut self, m: Move) {
        SimpleGame::add_move(self, m);
    }

    fn is_at_beginning(&self) -> bool {
        SimpleGame::is_at_beginning(self)
    }

    fn is_at_end(&self) -> bool {
        SimpleGame::is_at_end(self)
    }

    fn forward(&mut self) {
        SimpleGame::forward(self);
    }

    fn back(&mut self) {
        SimpleGame::back(self);
    }

    fn to_beginning(&mut self) {
        SimpleGame::to_beginning(self);
    }

    fn to_end(&mut self) {
        SimpleGame::to_end(self);
    }
}

impl fmt::Display for SimpleGame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writer::write_simple_game(f, self)
    }
}
