//! Tokenizer for PGN text.

use std::io::Read;

use crate::{
    errors::Error,
    source::Source,
    token::{Token, TokenKind},
};

/// Converts a byte stream into [`Token`]s, one at a time.
///
/// Once the input is exhausted, every call to [`Lexer::next_token()`]
/// returns a [`TokenKind::EndOfFile`] token.
///
/// # Examples
///
/// ```
/// use pgn_tree::{Lexer, TokenKind};
///
/// let mut lexer = Lexer::new(&b"1. e4 {best by test}"[..]);
///
/// let kinds = [TokenKind::Integer, TokenKind::Period, TokenKind::Symbol, TokenKind::Comment];
/// for kind in kinds {
///     assert_eq!(lexer.next_token()?.kind, kind);
/// }
/// assert_eq!(lexer.next_token()?.kind, TokenKind::EndOfFile);
/// # Ok::<_, pgn_tree::Error>(())
/// ```
#[derive(Debug)]
pub struct Lexer<R> {
    source: Source<R>,
}

impl<R: Read> Lexer<R> {
    pub fn new(inner: R) -> Lexer<R> {
        Lexer {
            source: Source::new(inner),
        }
    }

    /// Skips a UTF-8 byte order mark at the current position.
    pub fn skip_bom(&mut self) -> Result<(), Error> {
        Ok(self.source.skip_bom()?)
    }

    /// Skips whitespace and returns the next character without consuming it.
    pub fn peek(&mut self) -> Result<Option<u8>, Error> {
        Ok(self.source.skip_whitespace()?)
    }

    /// Discards raw input up to the next `needle` without tokenizing it.
    pub(crate) fn skip_until(&mut self, needle: u8) -> Result<bool, Error> {
        Ok(self.source.skip_until(needle)?)
    }

    pub fn next_token(&mut self) -> Result<Token, Error> {
        self.source.skip_whitespace()?;

        let Some(ch) = self.source.next_byte()? else {
            return Ok(Token::eof());
        };

        let kind = match ch {
            b'"' => return self.read_string(),
            b'{' => return self.read_comment(),
            b';' => return self.read_line_comment(),
            b'$' => return self.read_nag(),
            ch if is_symbol_start(ch) => return self.read_symbol(ch),
            b'.' => TokenKind::Period,
            b'*' => TokenKind::Asterisk,
            b'[' => TokenKind::LeftBracket,
            b']' => TokenKind::RightBracket,
            b'(' => TokenKind::LeftParen,
            b')' => TokenKind::RightParen,
            b'<' => TokenKind::LeftAngle,
            b'>' => TokenKind::RightAngle,
            ch if ch.is_ascii() => return Err(Error::InvalidCharacter(char::from(ch))),
            _ => return Err(Error::InvalidCharacter(char::REPLACEMENT_CHARACTER)),
        };

        Ok(Token::new(kind, char::from(ch)))
    }

    fn read_string(&mut self) -> Result<Token, Error> {
        let mut text = Vec::new();
        loop {
            match self.source.read_until2(b'"', b'\\', &mut text)? {
                Some(b'"') => break,
                Some(_) => match self.source.next_byte()? {
                    Some(escaped @ (b'\\' | b'"')) => text.push(escaped),
                    Some(other) => {
                        text.push(b'\\');
                        self.source.unread(other);
                    }
                    None => return Err(Error::UnterminatedString),
                },
                None => return Err(Error::UnterminatedString),
            }
        }
        Ok(Token::new(TokenKind::String, into_text(text)))
    }

    fn read_comment(&mut self) -> Result<Token, Error> {
        let mut text = Vec::new();
        if !self.source.read_until(b'}', &mut text)? {
            return Err(Error::UnterminatedComment);
        }
        Ok(Token::new(TokenKind::Comment, into_text(text)))
    }

    fn read_line_comment(&mut self) -> Result<Token, Error> {
        let mut text = Vec::new();
        self.source.read_until(b'\n', &mut text)?;
        if text.last() == Some(&b'\r') {
            text.pop();
        }
        Ok(Token::new(TokenKind::LineComment, into_text(text)))
    }

    fn read_nag(&mut self) -> Result<Token, Error> {
        let mut text = String::new();
        while let Some(ch) = self.source.next_byte()? {
            if ch.is_ascii_digit() {
                text.push(char::from(ch));
            } else {
                self.source.unread(ch);
                break;
            }
        }
        Ok(Token::new(TokenKind::Nag, text))
    }

    fn read_symbol(&mut self, first: u8) -> Result<Token, Error> {
        let mut text = String::from(char::from(first));
        while let Some(ch) = self.source.next_byte()? {
            if is_symbol_continuation(ch) {
                text.push(char::from(ch));
            } else {
                self.source.unread(ch);
                break;
            }
        }

        let kind = if text.bytes().all(|ch| ch.is_ascii_digit()) {
            TokenKind::Integer
        } else {
            TokenKind::Symbol
        };
        Ok(Token::new(kind, text))
    }

    /// Gets the unread input, including anything already buffered.
    pub fn into_inner(self) -> impl Read {
        self.source.into_inner()
    }
}

fn is_symbol_start(ch: u8) -> bool {
    ch.is_ascii_alphanumeric() || ch == b'-'
}

fn is_symbol_continuation(ch: u8) -> bool {
    is_symbol_start(ch) || matches!(ch, b'_' | b'+' | b'#' | b'=' | b':' | b'/')
}

fn into_text(bytes: Vec<u8>) -> String {
    String::from_utf8(bytes)
        .unwrap_or_else(|err| String::from_utf8_lossy(err.as_bytes()).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(pgn: &str) -> Result<Vec<Token>, Error> {
        let mut lexer = Lexer::new(pgn.as_bytes());
        let mut tokens = Vec::new();
        loop {
            let token = lexer.next_token()?;
            if token.kind == TokenKind::EndOfFile {
                return Ok(tokens);
            }
            tokens.push(token);
        }
    }

    fn kinds(pgn: &str) -> Vec<TokenKind> {
        tokens(pgn).unwrap().into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn test_single_characters() {
        use TokenKind::*;
        assert_eq!(
            kinds(". * [ ] ( ) < >"),
            [Period, Asterisk, LeftBracket, RightBracket, LeftParen, RightParen, LeftAngle, RightAngle]
        );
    }

    #[test]
    fn test_symbols_and_integers() {
        let tokens = tokens("12. Nbd7+ O-O-O e8=Q# 1/2-1/2 -x a_b:c").unwrap();
        let texts: Vec<_> = tokens.iter().map(|t| (t.kind, t.text.as_str())).collect();
        assert_eq!(
            texts,
            [
                (TokenKind::Integer, "12"),
                (TokenKind::Period, "."),
                (TokenKind::Symbol, "Nbd7+"),
                (TokenKind::Symbol, "O-O-O"),
                (TokenKind::Symbol, "e8=Q#"),
                (TokenKind::Symbol, "1/2-1/2"),
                (TokenKind::Symbol, "-x"),
                (TokenKind::Symbol, "a_b:c"),
            ]
        );
    }

    #[test]
    fn test_move_number_with_dots() {
        use TokenKind::*;
        assert_eq!(kinds("3...Nf6"), [Integer, Period, Period, Period, Symbol]);
    }

    #[test]
    fn test_string_escapes() {
        let tokens = tokens(r#""Quote \" Test" "back\\slash" "keep\n""#).unwrap();
        assert_eq!(tokens[0], Token::new(TokenKind::String, "Quote \" Test"));
        assert_eq!(tokens[1], Token::new(TokenKind::String, "back\\slash"));
        assert_eq!(tokens[2], Token::new(TokenKind::String, "keep\\n"));
    }

    #[test]
    fn test_unterminated() {
        assert!(matches!(tokens("\"abc"), Err(Error::UnterminatedString)));
        assert!(matches!(tokens("\"abc\\"), Err(Error::UnterminatedString)));
        assert!(matches!(tokens("{abc"), Err(Error::UnterminatedComment)));
    }

    #[test]
    fn test_comments() {
        let tokens = tokens("{ multi\nline } ; to the end\r\n; at eof").unwrap();
        assert_eq!(tokens[0], Token::new(TokenKind::Comment, " multi\nline "));
        assert_eq!(tokens[1], Token::new(TokenKind::LineComment, " to the end"));
        assert_eq!(tokens[2], Token::new(TokenKind::LineComment, " at eof"));
    }

    #[test]
    fn test_nag() {
        let tokens = tokens("$14 $(").unwrap();
        assert_eq!(tokens[0], Token::new(TokenKind::Nag, "14"));
        assert_eq!(tokens[1], Token::new(TokenKind::Nag, ""));
        assert_eq!(tokens[2].kind, TokenKind::LeftParen);
    }

    #[test]
    fn test_invalid_character() {
        assert!(matches!(tokens("e4 !"), Err(Error::InvalidCharacter('!'))));
        assert!(matches!(tokens("%"), Err(Error::InvalidCharacter('%'))));
        assert!(matches!(
            tokens("é"),
            Err(Error::InvalidCharacter(char::REPLACEMENT_CHARACTER))
        ));
    }

    #[test]
    fn test_eof_is_sticky() {
        let mut lexer = Lexer::new(&b"  \n\t"[..]);
        for _ in 0..3 {
            assert_eq!(lexer.next_token().unwrap().kind, TokenKind::EndOfFile);
        }
    }

    #[test]
    fn test_terminates_game() {
        let tokens = tokens("* 1-0 0-1 1/2-1/2 e4 1").unwrap();
        let terminating: Vec<_> = tokens.iter().map(Token::terminates_game).collect();
        assert_eq!(terminating, [true, true, true, true, false, false]);
        assert!(Token::eof().terminates_game());
    }

    #[test]
    fn test_peek_does_not_consume() {
        let mut lexer = Lexer::new(&b"  [Event"[..]);
        assert_eq!(lexer.peek().unwrap(), Some(b'['));
        assert_eq!(lexer.next_token().unwrap().kind, TokenKind::LeftBracket);
        assert_eq!(lexer.next_token().unwrap().text, "Event");
    }
}
