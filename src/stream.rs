use std::{
    io::{self, Read},
    iter::FusedIterator,
    thread::{self, JoinHandle},
};

use crossbeam_channel::{Receiver, Sender};
use tracing::debug;

use crate::{config::Config, errors::Error, game::Game, reader::Reader};

/// Games parsed on a background thread.
///
/// The producer thread owns the reader and hands games over through a
/// rendezvous channel: it starts parsing the next game only after the
/// previous one was received.
///
/// # Examples
///
/// ```
/// use std::io::Cursor;
/// use pgn_tree::{Config, GameStream};
///
/// let pgn = "[Event \"1\"]\n1. e4 *\n\n[Event \"2\"]\n1. d4 *\n";
/// let stream = GameStream::spawn(Cursor::new(pgn), Config::default())?;
///
/// let events: Vec<_> = stream
///     .map(|game| game.map(|game| game.headers().event.clone()))
///     .collect::<Result<_, _>>()?;
/// assert_eq!(events, ["1", "2"]);
/// # Ok::<_, Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug)]
pub struct GameStream {
    receiver: Option<Receiver<Result<Game, Error>>>,
    producer: Option<JoinHandle<()>>,
}

impl GameStream {
    /// Starts reading games from `source` on a new thread.
    pub fn spawn<R>(source: R, config: Config) -> io::Result<GameStream>
    where
        R: Read + Send + 'static,
    {
        let (sender, receiver) = crossbeam_channel::bounded(0);
        let producer = thread::Builder::new()
            .name("pgn-game-stream".to_owned())
            .spawn(move || produce(Reader::new(source), config, sender))?;

        Ok(GameStream {
            receiver: Some(receiver),
            producer: Some(producer),
        })
    }
}

fn produce<R: Read>(reader: Reader<R>, config: Config, sender: Sender<Result<Game, Error>>) {
    for game in reader.games(config) {
        if sender.send(game).is_err() {
            debug!("game stream dropped, stopping producer");
            return;
        }
    }
}

impl Iterator for GameStream {
    type Item = Result<Game, Error>;

    fn next(&mut self) -> Option<Result<Game, Error>> {
        self.receiver.as_ref()?.recv().ok()
    }
}

impl FusedIterator for GameStream {}

impl Drop for GameStream {
    fn drop(&mut self) {
        // Disconnect first, so that a producer blocked on send wakes up.
        drop(self.receiver.take());
        if let Some(producer) = self.producer.take() {
            if producer.join().is_err() {
                debug!("game stream producer panicked");
            }
        }
    }
}
