use std::{io::Read, iter::FusedIterator};

use shakmaty::{fen::Fen, san::SanPlus, CastlingMode, Chess, Move};
use tracing::{debug, trace};

use crate::{
    config::Config,
    errors::Error,
    game::{Game, GameBuilder},
    lexer::Lexer,
    simple::SimpleGame,
    tag::Headers,
    token::{Token, TokenKind},
    tree::AnnotatedGame,
};

/// Reads games from PGN text.
///
/// # Examples
///
/// ```
/// use pgn_tree::Reader;
///
/// let pgn = b"[White \"Deep Blue\"]\n[Black \"Kasparov\"]\n\n1. e4 c5 2. c3 *";
///
/// let mut reader = Reader::new(&pgn[..]);
/// let game = reader.read_simple_game()?.expect("one game");
///
/// assert_eq!(game.headers().white, "Deep Blue");
/// assert_eq!(game.len(), 3);
/// assert!(reader.read_simple_game()?.is_none());
/// # Ok::<_, pgn_tree::Error>(())
/// ```
#[derive(Debug)]
pub struct Reader<R> {
    lexer: Lexer<R>,
}

impl<R: Read> Reader<R> {
    pub fn new(inner: R) -> Reader<R> {
        Reader {
            lexer: Lexer::new(inner),
        }
    }

    /// Skips a UTF-8 byte order mark at the current position.
    pub fn skip_bom(&mut self) -> Result<(), Error> {
        self.lexer.skip_bom()
    }

    /// Whether anything but whitespace is left in the input.
    pub fn has_more(&mut self) -> Result<bool, Error> {
        Ok(self.lexer.peek()?.is_some())
    }

    /// Reads the tag pairs at the current position.
    ///
    /// Stops at the first character that does not start a tag pair, without
    /// consuming it.
    pub fn read_headers(&mut self) -> Result<Headers, Error> {
        let mut headers = Headers::new();
        while self.lexer.peek()? == Some(b'[') {
            self.expect(TokenKind::LeftBracket)?;
            let name = self.expect(TokenKind::Symbol)?.text;
            let value = self.expect(TokenKind::String)?.text;
            self.expect(TokenKind::RightBracket)?;
            headers.set(name, value);
        }
        Ok(headers)
    }

    fn expect(&mut self, kind: TokenKind) -> Result<Token, Error> {
        let token = self.lexer.next_token()?;
        if token.kind == kind {
            Ok(token)
        } else {
            Err(Error::MalformedTagPair(token))
        }
    }

    /// Reads the next game, with variations and comments if `annotations`
    /// is set.
    ///
    /// Returns `Ok(None)` if there is nothing left to read.
    pub fn read_game(&mut self, annotations: bool) -> Result<Option<Game>, Error> {
        Ok(if annotations {
            self.read_annotated_game()?.map(Game::Annotated)
        } else {
            self.read_simple_game()?.map(Game::Simple)
        })
    }

    pub fn read_simple_game(&mut self) -> Result<Option<SimpleGame>, Error> {
        self.read_game_as()
    }

    pub fn read_annotated_game(&mut self) -> Result<Option<AnnotatedGame>, Error> {
        self.read_game_as()
    }

    /// Reads the next game into any [`GameBuilder`].
    ///
    /// The returned game has its cursor at the starting position.
    pub fn read_game_as<G: GameBuilder>(&mut self) -> Result<Option<G>, Error> {
        if !self.has_more()? {
            return Ok(None);
        }

        let headers = self.read_headers()?;
        debug!(
            white = %headers.white,
            black = %headers.black,
            fen = headers.fen.is_some(),
            "read headers"
        );

        let start = start_position(&headers)?;
        let mut game = G::from_headers(headers, start);
        self.read_movetext(&mut game)?;
        Ok(Some(game))
    }

    fn read_movetext<G: GameBuilder>(&mut self, game: &mut G) -> Result<(), Error> {
        // Where to continue after each open variation.
        let mut branches: Vec<G::Cursor> = Vec::new();
        let mut pending_comment: Option<String> = None;
        let mut plies = 0usize;

        loop {
            if self.lexer.peek()? == Some(b'[') {
                if !branches.is_empty() {
                    return Err(Error::UnterminatedVariation);
                }
                debug!("movetext interrupted by tag pair");
                break;
            }

            let token = self.lexer.next_token()?;
            if token.terminates_game() {
                if token.kind == TokenKind::EndOfFile && !branches.is_empty() {
                    return Err(Error::UnterminatedVariation);
                }
                if token.kind == TokenKind::Symbol && game.headers_mut().result == "*" {
                    game.headers_mut().result = token.text;
                }
                break;
            }

            match token.kind {
                TokenKind::LeftParen if G::ANNOTATIONS => {
                    branches.push(game.cursor());
                    game.back();
                }
                TokenKind::LeftParen => self.skip_variation()?,
                TokenKind::RightParen => match branches.pop() {
                    Some(branch) => game.set_cursor(branch),
                    None => trace!("ignoring unmatched closing parenthesis"),
                },
                TokenKind::Comment if G::ANNOTATIONS => {
                    if game.is_at_beginning() || !game.is_at_end() {
                        pending_comment = Some(match pending_comment.take() {
                            Some(pending) => pending + " " + &token.text,
                            None => token.text,
                        });
                    } else {
                        game.add_comment(token.text);
                    }
                }
                TokenKind::Symbol => match resolve_san(game.board(), &token.text) {
                    Some(m) => {
                        game.add_move(m);
                        plies += 1;
                        if let Some(comment) = pending_comment.take() {
                            game.add_pre_comment(comment);
                        }
                    }
                    None => trace!(symbol = %token.text, "discarding symbol that is not a legal move"),
                },
                _ => {}
            }
        }

        if let Some(comment) = pending_comment {
            trace!(%comment, "dropping comment without a following move");
        }

        debug!(plies, "finished game");
        game.to_beginning();
        Ok(())
    }

    /// Skips a variation whose `(` was already consumed.
    fn skip_variation(&mut self) -> Result<(), Error> {
        let mut depth = 1usize;
        while depth > 0 {
            match self.lexer.next_token()?.kind {
                TokenKind::LeftParen => depth += 1,
                TokenKind::RightParen => depth -= 1,
                TokenKind::EndOfFile => return Err(Error::UnterminatedVariation),
                _ => {}
            }
        }
        Ok(())
    }

    /// Discards tokens up to the start of the next tag pair.
    ///
    /// Returns `false` if the input ended first.
    pub fn goto_next_game(&mut self) -> Result<bool, Error> {
        loop {
            match self.lexer.peek()? {
                Some(b'[') => return Ok(true),
                None => return Ok(false),
                Some(_) => {
                    self.lexer.next_token()?;
                }
            }
        }
    }

    /// Discards the current line and all following lines that start with
    /// `[`.
    fn skip_tag_lines(&mut self) -> Result<(), Error> {
        while self.lexer.skip_until(b'\n')? && self.lexer.peek()? == Some(b'[') {}
        Ok(())
    }

    /// Discards raw input up to the next `[`, without tokenizing it, to get
    /// past input that fails to tokenize.
    fn resync(&mut self) -> Result<bool, Error> {
        self.lexer.skip_until(b'[')
    }

    /// Iterates over all remaining games.
    pub fn games(self, config: Config) -> Games<R> {
        Games {
            reader: self,
            config,
            started: false,
            finished: false,
        }
    }

    /// Gets the remaining input, including anything already buffered.
    pub fn into_inner(self) -> impl Read {
        self.lexer.into_inner()
    }
}

fn start_position(headers: &Headers) -> Result<Chess, Error> {
    let Some(ref fen) = headers.fen else {
        return Ok(Chess::default());
    };

    let invalid = || Error::InvalidFen(fen.clone());
    let setup = Fen::from_ascii(fen.as_bytes()).map_err(|_| invalid())?;
    setup
        .clone()
        .into_position(CastlingMode::Standard)
        .or_else(|_| setup.into_position(CastlingMode::Chess960))
        .map_err(|_| invalid())
}

fn resolve_san(board: &Chess, text: &str) -> Option<Move> {
    let san_plus = SanPlus::from_ascii(text.as_bytes()).ok()?;
    san_plus.san.to_move(board).ok()
}

/// Iterator over the games of a [`Reader`], created by [`Reader::games()`].
///
/// Each game is parsed only when it is requested. Errors are yielded as
/// they occur; the iterator then continues with the next game that starts
/// with a tag pair.
#[derive(Debug)]
pub struct Games<R> {
    reader: Reader<R>,
    config: Config,
    started: bool,
    finished: bool,
}

impl<R: Read> Games<R> {
    fn advance(&mut self) -> Result<Option<Game>, Error> {
        if !self.started {
            self.started = true;
            self.reader.skip_bom()?;
        } else if !self.reader.goto_next_game()? {
            return Ok(None);
        }
        self.reader.read_game(self.config.annotations)
    }

    /// Skips the rest of a game that failed to parse.
    ///
    /// A broken tag pair leaves the rest of the tag section and the
    /// movetext of the same game ahead. Anything that fails to tokenize is
    /// skipped as raw input.
    fn recover(&mut self, err: &Error) -> Result<bool, Error> {
        if matches!(err, Error::MalformedTagPair(_)) {
            self.reader.skip_tag_lines()?;
            if let Ok(found) = self.reader.goto_next_game() {
                return Ok(found);
            }
        }
        self.reader.resync()
    }

    pub fn into_reader(self) -> Reader<R> {
        self.reader
    }
}

impl<R: Read> Iterator for Games<R> {
    type Item = Result<Game, Error>;

    fn next(&mut self) -> Option<Result<Game, Error>> {
        if self.finished {
            return None;
        }

        match self.advance() {
            Ok(Some(game)) => Some(Ok(game)),
            Ok(None) => {
                self.finished = true;
                None
            }
            Err(err) => {
                match self.recover(&err) {
                    Ok(true) => debug!(%err, "skipping to next game after error"),
                    Ok(false) | Err(_) => self.finished = true,
                }
                Some(Err(err))
            }
        }
    }
}

impl<R: Read> FusedIterator for Games<R> {}

/// Reads the first game in `pgn`.
///
/// Returns an empty game if there is no game at all.
///
/// # Examples
///
/// ```
/// use pgn_tree::game_from_str;
///
/// let game = game_from_str("[Event \"Test\"]\n\n1. e4 e5 *", false)?;
/// assert_eq!(game.headers().event, "Test");
/// assert_eq!(game.as_simple().map(|game| game.len()), Some(2));
/// # Ok::<_, pgn_tree::Error>(())
/// ```
pub fn game_from_str(pgn: &str, annotations: bool) -> Result<Game, Error> {
    let mut reader = Reader::new(pgn.as_bytes());
    reader.skip_bom()?;
    Ok(match reader.read_game(annotations)? {
        Some(game) => game,
        None if annotations => Game::Annotated(AnnotatedGame::default()),
        None => Game::Simple(SimpleGame::default()),
    })
}

/// Reads all games in `pgn`.
pub fn games_from_str(pgn: &str, config: Config) -> Result<Vec<Game>, Error> {
    Reader::new(pgn.as_bytes()).games(config).collect()
}
