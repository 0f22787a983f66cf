use std::fmt;

use shakmaty::{Chess, Move};

use crate::{simple::SimpleGame, tag::Headers, tree::AnnotatedGame, writer};

/// A game container the movetext parser can build.
///
/// The parser only ever appends moves at the cursor and moves the cursor
/// around. Containers that keep no annotations can rely on the default
/// methods, which ignore comments and variations.
pub trait GameBuilder {
    /// Whether variations are parsed into the container (`true`) or skipped
    /// (`false`). Comments are only offered when this is `true`.
    const ANNOTATIONS: bool;

    /// A saved cursor position.
    type Cursor: Copy;

    /// Creates an empty game starting from the given position.
    fn from_headers(headers: Headers, start: Chess) -> Self
    where
        Self: Sized;

    fn headers_mut(&mut self) -> &mut Headers;

    /// The position at the cursor.
    fn board(&self) -> &Chess;

    fn cursor(&self) -> Self::Cursor;

    /// Moves the cursor back to a position saved with
    /// [`GameBuilder::cursor()`].
    fn set_cursor(&mut self, cursor: Self::Cursor);

    /// Plays a legal move at the cursor and advances the cursor to it.
    fn add_move(&mut self, m: Move);

    fn is_at_beginning(&self) -> bool;

    /// Whether there are no moves after the cursor.
    fn is_at_end(&self) -> bool;

    fn forward(&mut self);

    fn back(&mut self);

    fn to_beginning(&mut self);

    fn to_end(&mut self);

    /// Whether the cursor is on a node without continuations.
    fn is_leaf(&self) -> bool {
        self.is_at_end()
    }

    /// Moves the cursor to the node the current variation branches from.
    fn to_beginning_of_variation(&mut self) {}

    /// Attaches a comment that precedes the move at the cursor.
    fn add_pre_comment(&mut self, comment: String) {
        let _comment = comment;
    }

    /// Attaches a comment that follows the move at the cursor.
    fn add_comment(&mut self, comment: String) {
        let _comment = comment;
    }
}

/// A parsed game, either flat or with variations and comments.
#[derive(Debug, Clone)]
pub enum Game {
    Simple(SimpleGame),
    Annotated(AnnotatedGame),
}

impl Game {
    pub fn headers(&self) -> &Headers {
        match self {
            Game::Simple(game) => game.headers(),
            Game::Annotated(game) => game.headers(),
        }
    }

    pub fn headers_mut(&mut self) -> &mut Headers {
        match self {
            Game::Simple(game) => game.headers_mut(),
            Game::Annotated(game) => game.headers_mut(),
        }
    }

    /// The position at the cursor.
    pub fn board(&self) -> &Chess {
        match self {
            Game::Simple(game) => game.board(),
            Game::Annotated(game) => game.board(),
        }
    }

    pub fn as_simple(&self) -> Option<&SimpleGame> {
        match self {
            Game::Simple(game) => Some(game),
            Game::Annotated(_) => None,
        }
    }

    pub fn as_annotated(&self) -> Option<&AnnotatedGame> {
        match self {
            Game::Simple(_) => None,
            Game::Annotated(game) => Some(game),
        }
    }

    pub fn into_simple(self) -> Option<SimpleGame> {
        match self {
            Game::Simple(game) => Some(game),
            Game::Annotated(_) => None,
        }
    }

    pub fn into_annotated(self) -> Option<AnnotatedGame> {
        match self {
            Game::Simple(_) => None,
            Game::Annotated(game) => Some(game),
        }
    }

    /// Renders the game as PGN. Same as [`game_to_pgn()`](crate::game_to_pgn).
    pub fn to_pgn(&self) -> String {
        self.to_string()
    }
}

impl From<SimpleGame> for Game {
    fn from(game: SimpleGame) -> Game {
        Game::Simple(game)
    }
}

impl From<AnnotatedGame> for Game {
    fn from(game: AnnotatedGame) -> Game {
        Game::Annotated(game)
    }
}

impl fmt::Display for Game {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Game::Simple(game) => writer::write_simple_game(f, game),
            Game::Annotated(game) => writer::write_annotated_game(f, game),
        }
    }
}
