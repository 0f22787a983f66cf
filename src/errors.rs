use std::{error, fmt, io};

use crate::token::Token;

/// Error when reading PGN.
///
/// Every variant is fatal to the game that is currently being parsed.
/// Unresolvable move notation is *not* an error: such tokens are skipped.
#[derive(Debug)]
pub enum Error {
    /// End of input inside a `"quoted string"`.
    UnterminatedString,
    /// End of input inside a `{ comment }`.
    UnterminatedComment,
    /// End of input before the `)` closing a variation.
    UnterminatedVariation,
    /// A tag pair that is not exactly `[Name "value"]`. Holds the token
    /// that broke the pattern.
    MalformedTagPair(Token),
    /// A character that cannot start any token.
    InvalidCharacter(char),
    /// The `FEN` tag does not describe a legal starting position.
    InvalidFen(String),
    /// The underlying reader failed.
    Io(io::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::UnterminatedString => f.write_str("unterminated string"),
            Error::UnterminatedComment => f.write_str("unterminated comment"),
            Error::UnterminatedVariation => f.write_str("unterminated variation"),
            Error::MalformedTagPair(token) => {
                write!(f, "malformed tag pair near {:?} {:?}", token.kind, token.text)
            }
            Error::InvalidCharacter(ch) => write!(f, "invalid character {ch:?}"),
            Error::InvalidFen(fen) => write!(f, "invalid FEN tag {fen:?}"),
            Error::Io(err) => write!(f, "i/o error: {err}"),
        }
    }
}

impl error::Error for Error {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            Error::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Error {
        Error::Io(err)
    }
}
