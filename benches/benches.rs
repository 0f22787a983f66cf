use iai::black_box;
use pgn_tree::{game_from_str, game_to_pgn, Config, Game, Lexer, Reader, TokenKind};

const PGN: &str = r#"[Event "Rated blitz game"]
[Site "?"]
[Date "????.??.??"]
[Round "?"]
[White "?"]
[Black "?"]
[Result "0-1"]

1. e4 e5 2. Nf3 Nc6 3. Bc4 Nf6 4. Ng5 d5 5. exd5 Na5 6. Bb5+ c6 7. dxc6
bxc6 8. Ba4 Ba6 9. d3 Bc5 10. O-O O-O 11. Nc3 Qc7 12. Nge4 Be7 13. Nxf6+
Bxf6 14. Ne4 Be7 15. Re1 Rad8 16. f3 c5 17. Be3 c4 18. Qc1 cxd3 19. cxd3
Qb8 20. Nf2 Bxd3 21. Nxd3 Rxd3 22. Qc2 Rxe3 23. Rxe3 Qb6 24. Re1 Bc5 25.
Qe4 f5 26. Qxe5 f4 27. Qd5+ Kh8 28. Kh1 Bxe3 29. b3 Qd8 30. Rd1 Qxd5 31.
Rxd5 Nb7 32. b4 Rd8 33. Rxd8+ Nxd8 34. Bd7 Kg8 35. a4 Kf8 36. g4 Ke7 37.
Bf5 h6 38. h4 Nf7 39. h5 Nd6 40. Bd3 Ke6 41. Kg2 Kd5 42. Kh3 Nf7 43. b5
Bb6 44. Kg2 Kc5 45. Kf1 Ne5 46. Be2 Kb4 47. Bd1 Nc4 48. Ke2 Ne3 49. g5
hxg5 50. Kd2 Nxd1 51. Kxd1 Kxa4 52. Kd2 Kxb5 53. Kd3 a5 54. Ke4 a4 55.
Kf5 a3 56. h6 gxh6 0-1
"#;

const ANNOTATED: &str = r#"[Event "Two Knights"]

1. e4 e5 2. Nf3 Nc6 3. Bc4 Nf6 4. Ng5 { the Fried Liver is near } d5
(4... Bc5 5. Nxf7 (5. Bxf7+ Ke7) 5... Bxf2+) 5. exd5 Na5 (5... Nxd5 6. Nxf7
Kxf7 7. Qf3+ Ke6 8. Nc3) 6. Bb5+ c6 7. dxc6 bxc6 8. Ba4 { or } (8. Be2 h6
9. Nf3 e4 10. Ne5 Bd6) 8... Ba6 *
"#;

fn bench_tokenize() -> usize {
    let mut lexer = Lexer::new(black_box(PGN).as_bytes());
    let mut tokens = 0;
    while lexer.next_token().expect("valid pgn").kind != TokenKind::EndOfFile {
        tokens += 1;
    }
    tokens
}

fn bench_read_simple() -> Game {
    let game = game_from_str(black_box(PGN), false).expect("valid pgn");
    assert_eq!(game.as_simple().map(|game| game.len()), Some(112));
    game
}

fn bench_read_annotated() -> Game {
    game_from_str(black_box(ANNOTATED), true).expect("valid pgn")
}

fn bench_read_stream() -> usize {
    let pgn = black_box(PGN).repeat(10);
    Reader::new(pgn.as_bytes())
        .games(Config::default().with_annotations(true))
        .map(|game| game.expect("valid pgn"))
        .count()
}

fn bench_write_annotated() -> String {
    let game = game_from_str(ANNOTATED, true).expect("valid pgn");
    game_to_pgn(black_box(&game))
}

iai::main!(
    bench_tokenize,
    bench_read_simple,
    bench_read_annotated,
    bench_read_stream,
    bench_write_annotated,
);
