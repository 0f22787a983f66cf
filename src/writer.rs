//! Rendering games as PGN text.
//!
//! Tags come first: the Seven Tag Roster in its usual order, then `Setup`
//! and `FEN` for games with a custom starting position, then all other tags
//! in the order they were added. The movetext follows after a blank line,
//! on a single line, terminated by the game result from the `Result` tag.

use std::fmt::{self, Display, Write};

use shakmaty::{san::SanPlus, Chess, Color, Position};

use crate::{
    game::Game,
    simple::SimpleGame,
    tag::{escape, Headers, SEVEN_TAG_ROSTER},
    tree::{AnnotatedGame, NodeId},
};

/// Renders a game as PGN.
///
/// # Examples
///
/// ```
/// use pgn_tree::{game_from_str, game_to_pgn};
///
/// let game = game_from_str("1.e4   e5\n2.Nf3 (2.f4) *", true)?;
/// assert!(game_to_pgn(&game).ends_with("\n\n1. e4 e5 2. Nf3 (2. f4) *\n"));
/// # Ok::<_, pgn_tree::Error>(())
/// ```
pub fn game_to_pgn(game: &Game) -> String {
    game.to_string()
}

pub fn write_game<W: Write + ?Sized>(out: &mut W, game: &Game) -> fmt::Result {
    match game {
        Game::Simple(game) => write_simple_game(out, game),
        Game::Annotated(game) => write_annotated_game(out, game),
    }
}

/// Writes the tag section, including the blank line that ends it.
pub fn write_headers<W: Write + ?Sized>(out: &mut W, headers: &Headers) -> fmt::Result {
    for (name, value) in headers.iter().take(SEVEN_TAG_ROSTER.len()) {
        write_tag(out, name, value)?;
    }
    if let Some(ref fen) = headers.fen {
        write_tag(out, "Setup", "1")?;
        write_tag(out, "FEN", fen)?;
    }
    for (name, value) in headers.others() {
        write_tag(out, name, value)?;
    }
    out.write_char('\n')
}

fn write_tag<W: Write + ?Sized>(out: &mut W, name: &str, value: &str) -> fmt::Result {
    writeln!(out, "[{name} \"{}\"]", escape(value))
}

pub fn write_simple_game<W: Write + ?Sized>(out: &mut W, game: &SimpleGame) -> fmt::Result {
    write_headers(out, game.headers())?;

    let mut movetext = Movetext::new(out);
    for (ply, m) in game.moves().iter().enumerate() {
        let Some(before) = game.board_at(ply) else {
            break;
        };
        movetext.move_number(before, ply == 0)?;
        movetext.token(SanPlus::from_move(before.clone(), m.clone()))?;
    }
    movetext.finish(&game.headers().result)
}

pub fn write_annotated_game<W: Write + ?Sized>(out: &mut W, game: &AnnotatedGame) -> fmt::Result {
    write_headers(out, game.headers())?;

    let mut movetext = Movetext::new(out);
    let root = game.node(game.root());
    for comment in [root.precomment(), root.comment()].into_iter().flatten() {
        movetext.comment(comment)?;
    }
    write_line(&mut movetext, game, game.root(), true)?;
    movetext.finish(&game.headers().result)
}

/// Writes everything after `id`: the main continuation, with each
/// variation right after the move it replaces.
///
/// Black moves need an explicit number at the start of a line and whenever
/// the line was interrupted by a comment or variation.
fn write_line<W: Write + ?Sized>(
    movetext: &mut Movetext<'_, W>,
    game: &AnnotatedGame,
    mut id: NodeId,
    mut interrupted: bool,
) -> fmt::Result {
    while let Some((&main, variations)) = game.node(id).children().split_first() {
        write_move(movetext, game, main, interrupted)?;

        for &variation in variations {
            movetext.begin_variation()?;
            write_move(movetext, game, variation, true)?;
            let after_comment = game.node(variation).comment().is_some();
            write_line(movetext, game, variation, after_comment)?;
            movetext.end_variation()?;
        }

        interrupted = !variations.is_empty() || game.node(main).comment().is_some();
        id = main;
    }

    Ok(())
}

fn write_move<W: Write + ?Sized>(
    movetext: &mut Movetext<'_, W>,
    game: &AnnotatedGame,
    id: NodeId,
    interrupted: bool,
) -> fmt::Result {
    let node = game.node(id);
    let (Some(parent), Some(san)) = (node.parent(), game.san(id)) else {
        return Ok(());
    };

    if let Some(comment) = node.precomment() {
        movetext.comment(comment)?;
    }
    movetext.move_number(game.node(parent).board(), interrupted || node.precomment().is_some())?;
    movetext.token(san)?;
    if let Some(comment) = node.comment() {
        movetext.comment(comment)?;
    }
    Ok(())
}

/// Space separated movetext tokens.
struct Movetext<'w, W: ?Sized> {
    out: &'w mut W,
    /// Whether the next token needs a separating space.
    separate: bool,
}

impl<'w, W: Write + ?Sized> Movetext<'w, W> {
    fn new(out: &'w mut W) -> Movetext<'w, W> {
        Movetext {
            out,
            separate: false,
        }
    }

    fn space(&mut self) -> fmt::Result {
        if self.separate {
            self.out.write_char(' ')?;
        }
        Ok(())
    }

    fn token<T: Display>(&mut self, token: T) -> fmt::Result {
        self.space()?;
        self.separate = true;
        write!(self.out, "{token}")
    }

    fn comment(&mut self, comment: &str) -> fmt::Result {
        self.token(format_args!("{{{comment}}}"))
    }

    fn move_number(&mut self, before: &Chess, explicit: bool) -> fmt::Result {
        match before.turn() {
            Color::White => self.token(format_args!("{}.", before.fullmoves())),
            Color::Black if explicit => self.token(format_args!("{}...", before.fullmoves())),
            Color::Black => Ok(()),
        }
    }

    fn begin_variation(&mut self) -> fmt::Result {
        self.space()?;
        self.separate = false;
        self.out.write_char('(')
    }

    fn end_variation(&mut self) -> fmt::Result {
        self.separate = true;
        self.out.write_char(')')
    }

    /// Terminates the movetext with `result`, or with `*` if `result` is
    /// not a game result.
    fn finish(mut self, result: &str) -> fmt::Result {
        let result = match result {
            "1-0" | "0-1" | "1/2-1/2" => result,
            _ => "*",
        };
        self.token(result)?;
        self.out.write_char('\n')
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reader::game_from_str;

    const EMPTY_TAGS: &str = "[Event \"?\"]\n[Site \"?\"]\n[Date \"????.??.??\"]\n[Round \"?\"]\n[White \"?\"]\n[Black \"?\"]\n[Result \"*\"]\n\n";

    fn movetext(pgn: &str, annotations: bool) -> String {
        let written = game_to_pgn(&game_from_str(pgn, annotations).unwrap());
        written
            .strip_prefix(EMPTY_TAGS)
            .expect("default tags")
            .to_owned()
    }

    #[test]
    fn test_empty_game() {
        assert_eq!(movetext("", false), "*\n");
        assert_eq!(movetext("", true), "*\n");
    }

    #[test]
    fn test_simple_movetext() {
        assert_eq!(movetext("1.e4 e5 2.Nf3 Nc6 3.Bb5 *", false), "1. e4 e5 2. Nf3 Nc6 3. Bb5 *\n");
        assert_eq!(movetext("1. f3 e5 2. g4 Qh4 *", false), "1. f3 e5 2. g4 Qh4# *\n");
    }

    #[test]
    fn test_variations() {
        assert_eq!(movetext("1. e4 (1. d4 d5) e5 *", true), "1. e4 (1. d4 d5) 1... e5 *\n");
        assert_eq!(
            movetext("1. e4 e5 (1... c5 2. Nf3 (2. c3) 2... d6) 2. Nf3 *", true),
            "1. e4 e5 (1... c5 2. Nf3 (2. c3) 2... d6) 2. Nf3 *\n"
        );
    }

    #[test]
    fn test_comments() {
        assert_eq!(
            movetext("{start} 1. e4 {good} e5 {solid} 2. Nf3 *", true),
            "{start} 1. e4 {good} 1... e5 {solid} 2. Nf3 *\n"
        );
    }

    #[test]
    fn test_tags() {
        let pgn = "[White \"Quote \\\" Test\"]\n[ECO \"C20\"]\n[FEN \"4k3/8/8/8/8/8/4P3/4K3 b - - 0 7\"]\n\n7... Kd7 8. e4 1-0";
        let game = game_from_str(pgn, false).unwrap();

        assert_eq!(
            game_to_pgn(&game),
            concat!(
                "[Event \"?\"]\n[Site \"?\"]\n[Date \"????.??.??\"]\n[Round \"?\"]\n",
                "[White \"Quote \\\" Test\"]\n[Black \"?\"]\n[Result \"1-0\"]\n",
                "[Setup \"1\"]\n[FEN \"4k3/8/8/8/8/8/4P3/4K3 b - - 0 7\"]\n[ECO \"C20\"]\n",
                "\n7... Kd7 8. e4 1-0\n",
            )
        );
    }

    #[test]
    fn test_result_token_is_sanitized() {
        let game = game_from_str("[Result \"{\"]\n1. e4 *", false).unwrap();
        assert!(game_to_pgn(&game).ends_with("[Result \"{\"]\n\n1. e4 *\n"));
    }
}
