//! Game-level notation: a whole move history as PGN movetext.
//!
//! [`encode`] writes the canonical form `1. e4 e5 2. Nf3`, prefixed by
//! `SetUp`/`FEN` tag pairs when the game did not begin from the standard
//! starting position, and by `[Termination "abandoned"]` when the game was
//! aborted. [`decode`] replays such text through the rules and
//! accepts the common PGN decorations (tag pairs, comments, annotation
//! glyphs, a trailing result).

use crate::{Board, Game, Status};
use chess_core::Color;
use thiserror::Error;

/// Error type for decoding notation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NotationError {
    /// A move token does not name exactly one legal move at its ply
    /// (1-based), or follows the end of the game.
    #[error("malformed notation at ply {position}: {token}")]
    MalformedNotation { position: usize, token: String },

    /// The text is structurally invalid at the given byte offset.
    #[error("unexpected token at byte {offset}: {token}")]
    UnexpectedToken { offset: usize, token: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TokenKind<'a> {
    /// Contents of a `[...]` tag pair.
    Tag(&'a str),
    MoveNumber { number: u32, black: bool },
    San,
    Result,
}

#[derive(Debug, Clone, Copy)]
struct Token<'a> {
    offset: usize,
    text: &'a str,
    kind: TokenKind<'a>,
}

impl Token<'_> {
    fn unexpected(&self) -> NotationError {
        unexpected(self.offset, self.text)
    }
}

fn unexpected(offset: usize, token: &str) -> NotationError {
    NotationError::UnexpectedToken {
        offset,
        token: token.to_string(),
    }
}

/// `Termination` tag value marking an aborted game.
const ABANDONED: &str = "abandoned";

/// Encodes a game's move history.
pub fn encode(game: &Game) -> String {
    let mut out = String::new();

    let start = game.start_board();
    if *start != Board::startpos() {
        out.push_str("[SetUp \"1\"]\n");
        out.push_str(&format!("[FEN \"{}\"]\n", start.to_fen()));
    }
    if game.status() == Status::Aborted {
        out.push_str(&format!("[Termination \"{}\"]\n", ABANDONED));
    }
    if !out.is_empty() {
        out.push('\n');
    }

    let mut movetext: Vec<String> = Vec::with_capacity(game.ply_count() * 3 / 2 + 1);
    for (ply, (board, played)) in game.boards().iter().zip(game.history()).enumerate() {
        match board.side_to_move() {
            Color::White => movetext.push(format!("{}.", board.fullmove_number())),
            Color::Black if ply == 0 => movetext.push(format!("{}...", board.fullmove_number())),
            Color::Black => {}
        }
        movetext.push(played.san.clone());
    }
    out.push_str(&movetext.join(" "));
    out
}

/// Decodes notation into a replayed game.
///
/// Every move token is resolved against the legal moves of the board it is
/// played on; zero or several matches fail the whole decode.
pub fn decode(text: &str) -> Result<Game, NotationError> {
    let tokens = tokenize(text)?;
    let mut tokens = tokens.iter().peekable();

    let mut start = Board::startpos();
    let mut abandoned: Option<&Token<'_>> = None;
    while let Some(tag) = tokens.next_if(|t| matches!(t.kind, TokenKind::Tag(_))) {
        let TokenKind::Tag(content) = tag.kind else {
            continue;
        };
        let (name, value) = parse_tag(content).ok_or_else(|| tag.unexpected())?;
        match name {
            "FEN" => start = Board::from_fen(value).map_err(|_| tag.unexpected())?,
            "Termination" if value == ABANDONED => abandoned = Some(tag),
            _ => {}
        }
    }

    let mut game = Game::from_board(start);
    let mut pending_number: Option<&Token<'_>> = None;

    while let Some(token) = tokens.next() {
        match token.kind {
            TokenKind::Tag(_) => return Err(token.unexpected()),
            TokenKind::MoveNumber { number, black } => {
                let board = game.board();
                let black_to_move = board.side_to_move() == Color::Black;
                if pending_number.is_some()
                    || number != board.fullmove_number()
                    || black != black_to_move
                {
                    return Err(token.unexpected());
                }
                pending_number = Some(token);
            }
            TokenKind::San => {
                pending_number = None;
                let position = game.ply_count() + 1;
                game.apply_san(token.text)
                    .map_err(|_| NotationError::MalformedNotation {
                        position,
                        token: token.text.to_string(),
                    })?;
            }
            TokenKind::Result => {
                if pending_number.is_some() || tokens.peek().is_some() {
                    return Err(token.unexpected());
                }
            }
        }
    }

    if let Some(number) = pending_number {
        return Err(number.unexpected());
    }
    if let Some(tag) = abandoned {
        // A finished game cannot also have been abandoned.
        game.abort().map_err(|_| tag.unexpected())?;
    }

    Ok(game)
}

/// Splits `Name "value"` into its parts.
fn parse_tag(content: &str) -> Option<(&str, &str)> {
    let (name, value) = content.trim().split_once(char::is_whitespace)?;
    let value = value.trim().strip_prefix('"')?.strip_suffix('"')?;
    Some((name, value))
}

fn tokenize(text: &str) -> Result<Vec<Token<'_>>, NotationError> {
    let mut tokens = Vec::new();
    let mut i = 0;

    while let Some(c) = text[i..].chars().next() {
        match c {
            c if c.is_whitespace() => i += c.len_utf8(),
            '{' => {
                let close = text[i..].find('}').ok_or_else(|| unexpected(i, "{"))?;
                i += close + 1;
            }
            ';' => i = text[i..].find('\n').map_or(text.len(), |n| i + n),
            '[' => {
                let close = text[i..].find(']').ok_or_else(|| unexpected(i, "["))?;
                tokens.push(Token {
                    offset: i,
                    text: &text[i..=i + close],
                    kind: TokenKind::Tag(&text[i + 1..i + close]),
                });
                i += close + 1;
            }
            '$' => {
                let digits = text[i + 1..]
                    .bytes()
                    .take_while(u8::is_ascii_digit)
                    .count();
                if digits == 0 {
                    return Err(unexpected(i, "$"));
                }
                i += 1 + digits;
            }
            // Variations are not supported.
            '(' | ')' | '}' | ']' => return Err(unexpected(i, &c.to_string())),
            _ => {
                let end = text[i..]
                    .find(|ch: char| ch.is_whitespace() || "{}[]();$".contains(ch))
                    .map_or(text.len(), |n| i + n);
                push_word(&text[i..end], i, &mut tokens)?;
                i = end;
            }
        }
    }

    Ok(tokens)
}

/// Classifies one whitespace-delimited word, splitting `12.Nf3` into a move
/// number and a move.
fn push_word<'a>(
    word: &'a str,
    offset: usize,
    tokens: &mut Vec<Token<'a>>,
) -> Result<(), NotationError> {
    if matches!(word, "1-0" | "0-1" | "1/2-1/2" | "*") {
        tokens.push(Token {
            offset,
            text: word,
            kind: TokenKind::Result,
        });
        return Ok(());
    }

    let digits = word.bytes().take_while(u8::is_ascii_digit).count();
    if digits == 0 || !word[digits..].starts_with('.') {
        tokens.push(Token {
            offset,
            text: word,
            kind: TokenKind::San,
        });
        return Ok(());
    }

    let dots = word[digits..].bytes().take_while(|&b| b == b'.').count();
    let number = word[..digits]
        .parse::<u32>()
        .map_err(|_| unexpected(offset, word))?;
    let black = match dots {
        1 => false,
        3 => true,
        _ => return Err(unexpected(offset, word)),
    };

    let split = digits + dots;
    tokens.push(Token {
        offset,
        text: &word[..split],
        kind: TokenKind::MoveNumber { number, black },
    });
    if split < word.len() {
        tokens.push(Token {
            offset: offset + split,
            text: &word[split..],
            kind: TokenKind::San,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn play(moves: &[&str]) -> Game {
        let mut game = Game::new();
        for san in moves {
            game.apply_san(san).unwrap();
        }
        game
    }

    #[test]
    fn encode_canonical_form() {
        assert_eq!(encode(&Game::new()), "");
        let game = play(&["e4", "e5", "Nf3", "Nc6", "Bb5"]);
        assert_eq!(encode(&game), "1. e4 e5 2. Nf3 Nc6 3. Bb5");
    }

    #[test]
    fn encode_fools_mate() {
        let game = play(&["f3", "e5", "g4", "Qh4#"]);
        assert_eq!(game.status(), Status::Checkmate);
        assert_eq!(encode(&game), "1. f3 e5 2. g4 Qh4#");
        assert_eq!(decode(&encode(&game)), Ok(game));
    }

    #[test]
    fn encode_custom_start_with_black_to_move() {
        let fen = "4k3/8/8/8/8/8/4P3/4K2R b K - 0 12";
        let mut game = Game::from_fen(fen).unwrap();
        game.apply_uci("e8d7").unwrap();
        game.apply_uci("e1g1").unwrap();

        let text = encode(&game);
        assert_eq!(
            text,
            format!("[SetUp \"1\"]\n[FEN \"{}\"]\n\n12... Kd7 13. O-O", fen)
        );
        assert_eq!(decode(&text), Ok(game));
    }

    #[test]
    fn decode_plain_and_attached_numbers() {
        let expected = play(&["e4", "e5", "Nf3"]);
        assert_eq!(decode("1. e4 e5 2. Nf3"), Ok(expected.clone()));
        assert_eq!(decode("1.e4 e5 2.Nf3"), Ok(expected.clone()));
        assert_eq!(decode("1. e4 1... e5 2. Nf3"), Ok(expected.clone()));
        assert_eq!(decode("e4 e5 Nf3"), Ok(expected));
        assert_eq!(decode("  \n"), Ok(Game::new()));
    }

    #[test]
    fn decode_pgn_decorations() {
        let text = "[Event \"Casual\"]\n[Site \"?\"]\n\n\
                    1. e4 {best by test} e5 $1 2. Nf3!? Nc6 ; main line\n\
                    3. Bb5 a6 *";
        let game = decode(text).unwrap();
        assert_eq!(game.ply_count(), 6);
        assert_eq!(encode(&game), "1. e4 e5 2. Nf3 Nc6 3. Bb5 a6");
    }

    #[test]
    fn decode_castling_spellings() {
        let text = "1. e4 e5 2. Nf3 Nc6 3. Bc4 Bc5 4. 0-0 Nf6";
        let game = decode(text).unwrap();
        assert_eq!(encode(&game), "1. e4 e5 2. Nf3 Nc6 3. Bc4 Bc5 4. O-O Nf6");
    }

    #[test]
    fn decode_illegal_and_late_moves() {
        assert_eq!(
            decode("1. e4 e5 2. Ke3"),
            Err(NotationError::MalformedNotation {
                position: 3,
                token: "Ke3".to_string()
            })
        );
        assert_eq!(
            decode("1. f3 e5 2. g4 Qh4# 3. Kf2"),
            Err(NotationError::MalformedNotation {
                position: 5,
                token: "Kf2".to_string()
            })
        );
        assert_eq!(
            decode("1. e4 e5 2. e8"),
            Err(NotationError::MalformedNotation {
                position: 3,
                token: "e8".to_string()
            })
        );
    }

    #[test]
    fn decode_ambiguous_move() {
        let text = "[FEN \"8/8/8/8/8/8/8/1N1K1N1k w - - 0 1\"]\n1. Nd2";
        assert_eq!(
            decode(text),
            Err(NotationError::MalformedNotation {
                position: 1,
                token: "Nd2".to_string()
            })
        );
        assert!(decode("[FEN \"8/8/8/8/8/8/8/1N1K1N1k w - - 0 1\"]\n1. Nbd2").is_ok());
    }

    #[test]
    fn decode_structural_errors() {
        let cases: [(&str, usize, &str); 9] = [
            ("1. e4 (1. d4) e5", 6, "("),
            ("1. e4 e5 1-0 2. Nf3", 9, "1-0"),
            ("2. e4", 0, "2."),
            ("1... e4", 0, "1..."),
            ("1. e4 2. d4", 6, "2."),
            ("1. e4 {unterminated", 6, "{"),
            ("[Event \"x\"", 0, "["),
            ("e4 [Event \"x\"]", 3, "[Event \"x\"]"),
            ("1. e4 e5 2.", 9, "2."),
        ];
        for (text, offset, token) in cases {
            assert_eq!(
                decode(text),
                Err(NotationError::UnexpectedToken {
                    offset,
                    token: token.to_string()
                }),
                "{}",
                text
            );
        }
    }

    #[test]
    fn decode_rejects_bad_tags() {
        assert!(matches!(
            decode("[FEN \"not a fen\"] 1. e4"),
            Err(NotationError::UnexpectedToken { offset: 0, .. })
        ));
        assert!(matches!(
            decode("[Broken] 1. e4"),
            Err(NotationError::UnexpectedToken { offset: 0, .. })
        ));
    }

    #[test]
    fn aborted_game_roundtrips() {
        let mut game = play(&["e4"]);
        game.abort().unwrap();

        let text = encode(&game);
        assert_eq!(text, "[Termination \"abandoned\"]\n\n1. e4");
        let decoded = decode(&text).unwrap();
        assert_eq!(decoded.status(), Status::Aborted);
        assert_eq!(decoded, game);

        let mut empty = Game::new();
        empty.abort().unwrap();
        assert_eq!(decode(&encode(&empty)), Ok(empty));
    }

    #[test]
    fn abandoned_tag_on_finished_game_is_rejected() {
        let text = "[Termination \"abandoned\"]\n1. f3 e5 2. g4 Qh4#";
        assert!(matches!(
            decode(text),
            Err(NotationError::UnexpectedToken { offset: 0, .. })
        ));
        // Other termination reasons are informational.
        assert!(decode("[Termination \"normal\"]\n1. e4").is_ok());
    }

    fn assert_one_king_each(game: &Game) {
        for board in game.boards() {
            for color in Color::BOTH {
                assert!(board.king_square(color).is_some(), "{}", board.to_fen());
            }
        }
    }

    #[test]
    fn fen_tag_with_king_en_prise_is_rejected() {
        assert!(matches!(
            decode("[FEN \"4k3/8/8/8/8/8/8/4R1K1 w - - 0 1\"]\n1. Rxe8"),
            Err(NotationError::UnexpectedToken { offset: 0, .. })
        ));
    }

    #[test]
    fn fen_tag_with_bogus_en_passant_cannot_capture_a_king() {
        assert_eq!(
            decode("[FEN \"8/8/8/3Pk3/8/8/8/4K3 w - e6 0 1\"]\n1. dxe6"),
            Err(NotationError::MalformedNotation {
                position: 1,
                token: "dxe6".to_string(),
            })
        );
        let game = decode("[FEN \"8/8/8/3Pk3/8/8/8/4K3 w - e6 0 1\"]\n1. d6").unwrap();
        assert_one_king_each(&game);
    }

    #[test]
    fn fen_tag_with_huge_clocks_does_not_panic() {
        let game = decode(
            "[FEN \"4k3/8/8/8/8/8/8/R3K3 b - - 0 4294967295\"]\n4294967295... Kd7",
        )
        .unwrap();
        assert_eq!(game.board().fullmove_number(), u32::MAX);
        assert_one_king_each(&game);

        let game = decode("[FEN \"4k3/8/8/8/8/8/8/R3K3 w - - 4294967295 1\"]").unwrap();
        assert_eq!(game.status(), Status::DrawFiftyMove);
    }

    #[test]
    fn notation_error_display() {
        let err = NotationError::MalformedNotation {
            position: 3,
            token: "Ke3".to_string(),
        };
        assert_eq!(err.to_string(), "malformed notation at ply 3: Ke3");
    }

    fn random_game(start: Game, choices: &[usize]) -> Game {
        let mut game = start;
        for &choice in choices {
            let moves = game.legal_moves();
            if moves.is_empty() {
                break;
            }
            game.apply_move(moves[choice % moves.len()]).unwrap();
        }
        game
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(48))]

        #[test]
        fn roundtrip_from_startpos(choices in prop::collection::vec(any::<usize>(), 0..120)) {
            let game = random_game(Game::new(), &choices);
            let decoded = decode(&encode(&game)).unwrap();
            prop_assert_eq!(decoded.status(), game.status());
            prop_assert_eq!(decoded, game);
        }

        #[test]
        fn roundtrip_from_kiwipete(choices in prop::collection::vec(any::<usize>(), 0..60)) {
            let start = Game::from_fen(
                "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1pP/PPPBBPPP/R3K2R w KQkq - 0 1",
            )
            .unwrap();
            let game = random_game(start, &choices);
            prop_assert_eq!(decode(&encode(&game)).unwrap(), game);
        }
    }
}
