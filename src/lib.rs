//! A streaming reader and writer for chess games in PGN notation, with
//! support for variations and comments.
//!
//! PGN text is split into [`Token`]s by a hand-written [`Lexer`]. The
//! [`Reader`] parses tag pairs into [`Headers`] and replays the movetext on
//! a board, producing either a flat [`SimpleGame`] or an [`AnnotatedGame`]
//! tree that keeps all variations and comments. Games render back to PGN
//! with [`game_to_pgn()`].
//!
//! Move legality, SAN and FEN are provided by [`shakmaty`].
//!
//! # Examples
//!
//! Read a game with a variation:
//!
//! ```
//! use pgn_tree::{Reader, Game};
//!
//! let pgn = b"[Event \"Casual game\"]
//!
//! 1. e4 e5 2. Nf3 (2. f4 exf4) 2... Nc6 *";
//!
//! let mut reader = Reader::new(&pgn[..]);
//! let game = reader.read_annotated_game()?.expect("one game");
//!
//! assert_eq!(game.headers().event, "Casual game");
//! assert_eq!(game.mainline().count(), 4);
//! assert_eq!(game.num_moves(), 6);
//!
//! // Write it back.
//! let pgn = Game::from(game).to_pgn();
//! assert!(pgn.ends_with("1. e4 e5 2. Nf3 (2. f4 exf4) 2... Nc6 *\n"));
//! # Ok::<_, pgn_tree::Error>(())
//! ```
//!
//! Iterate over all games in a file on a background thread:
//!
//! ```no_run
//! use std::fs::File;
//! use pgn_tree::{Config, GameStream};
//!
//! let file = File::open("games.pgn")?;
//! for game in GameStream::spawn(file, Config::default())? {
//!     let game = game?;
//!     println!("{} - {}", game.headers().white, game.headers().black);
//! }
//! # Ok::<_, Box<dyn std::error::Error>>(())
//! ```
//!
//! # Logging
//!
//! Emits [`tracing`](https://docs.rs/tracing) events: `debug` at game
//! boundaries and `trace` for discarded input, such as symbols that are not
//! legal moves. No subscriber is installed.
//!
//! # Feature flags
//!
//! * `serde`: Implements [`serde::Serialize`](https://docs.rs/serde/1/serde/trait.Serialize.html)
//!   for [`Headers`] and [`AnnotatedGame`].

#![doc(html_root_url = "https://docs.rs/pgn-tree/0.1.0")]
#![forbid(unsafe_code)]
#![warn(missing_debug_implementations)]
#![cfg_attr(docs_rs, feature(doc_auto_cfg))]

mod config;
mod errors;
mod game;
mod lexer;
mod reader;
mod simple;
mod source;
mod stream;
mod token;
mod tree;

pub mod tag;
pub mod writer;

pub use config::Config;
pub use errors::Error;
pub use game::{Game, GameBuilder};
pub use lexer::Lexer;
pub use reader::{game_from_str, games_from_str, Games, Reader};
pub use shakmaty;
pub use simple::SimpleGame;
pub use stream::GameStream;
pub use tag::Headers;
pub use token::{Token, TokenKind};
pub use tree::{AnnotatedGame, Mainline, Node, NodeId};
pub use writer::game_to_pgn;
