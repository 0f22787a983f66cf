#![no_main]

use std::{fmt, io};

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use pgn_tree::{Config, Reader};

#[derive(Arbitrary)]
struct TestCase {
    pgn: Vec<u8>,
    annotations: bool,
}

impl fmt::Debug for TestCase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TestCase")
            .field("pgn", &String::from_utf8_lossy(&self.pgn))
            .field("annotations", &self.annotations)
            .finish()
    }
}

fuzz_target!(|data: TestCase| {
    let config = Config::default().with_annotations(data.annotations);

    for game in Reader::new(io::Cursor::new(&data.pgn)).games(config) {
        let Ok(game) = game else {
            continue;
        };

        // Whatever was read must be writable and readable again.
        let written = game.to_pgn();
        let mut reader = Reader::new(written.as_bytes());
        let reread = reader
            .read_game(data.annotations)
            .expect("written pgn is valid")
            .expect("written pgn has a game");
        assert_eq!(reread.headers(), game.headers());
    }
});
