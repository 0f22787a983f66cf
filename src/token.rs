use std::fmt;

/// The kind of a [`Token`].
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum TokenKind {
    /// `"quoted"`, with escapes already decoded.
    String,
    /// A symbol consisting only of digits, like a move number.
    Integer,
    Period,
    Asterisk,
    LeftBracket,
    RightBracket,
    LeftParen,
    RightParen,
    LeftAngle,
    RightAngle,
    /// `$` followed by digits. The text holds the digits only.
    Nag,
    /// Moves, tag names, results and other bare words.
    Symbol,
    /// `{ ... }`, excluding the braces.
    Comment,
    /// `; ...` up to the end of the line, excluding the semicolon.
    LineComment,
    EndOfFile,
}

/// A single lexical token of PGN text.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>) -> Token {
        Token {
            kind,
            text: text.into(),
        }
    }

    pub(crate) fn eof() -> Token {
        Token::new(TokenKind::EndOfFile, "")
    }

    /// Whether this token ends the movetext of a game: `*`, end of input,
    /// or one of the results `1-0`, `0-1` and `1/2-1/2`.
    ///
    /// # Examples
    ///
    /// ```
    /// use pgn_tree::{Token, TokenKind};
    ///
    /// assert!(Token::new(TokenKind::Symbol, "1/2-1/2").terminates_game());
    /// assert!(!Token::new(TokenKind::Symbol, "1-1").terminates_game());
    /// ```
    pub fn terminates_game(&self) -> bool {
        match self.kind {
            TokenKind::Asterisk | TokenKind::EndOfFile => true,
            TokenKind::Symbol => matches!(self.text.as_str(), "1-0" | "0-1" | "1/2-1/2"),
            _ => false,
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            TokenKind::String => write!(f, "\"{}\"", self.text),
            TokenKind::Nag => write!(f, "${}", self.text),
            TokenKind::Comment => write!(f, "{{{}}}", self.text),
            TokenKind::LineComment => write!(f, ";{}", self.text),
            _ => f.write_str(&self.text),
        }
    }
}
