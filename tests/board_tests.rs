//! Flip protocol scenarios against boards parsed from their text format.
//!
//! These are single-player and sequenced multi-player runs; the genuinely
//! concurrent cases live in `concurrency_tests.rs`.

use memory_scramble::{parse_board, Board, BoardError};

fn parsed(text: &str) -> Board {
    parse_board(text).expect("test board should parse")
}

/// Cross-check the board against its structural invariants through the
/// public accessors.
fn assert_invariants(board: &Board, players: &[&str]) {
    let mut face_up = 0usize;
    let mut controlled = 0usize;
    for row in 0..board.num_rows() as i32 {
        for col in 0..board.num_cols() as i32 {
            let picture = board.picture_at(row, col).unwrap();
            let up = board.is_face_up(row, col).unwrap();
            let controller = board.controller_at(row, col).unwrap();
            if picture.is_none() {
                assert!(!up, "empty cell ({},{}) must be face down", row, col);
                assert_eq!(controller, None);
            }
            if controller.is_some() {
                assert!(up, "controlled cell ({},{}) must be face up", row, col);
                controlled += 1;
            }
            if up {
                face_up += 1;
            }
        }
    }
    assert!(controlled <= face_up);

    for player in players {
        let mut held: Vec<Option<String>> = Vec::new();
        for row in 0..board.num_rows() as i32 {
            for col in 0..board.num_cols() as i32 {
                if board.controller_at(row, col).unwrap().as_deref() == Some(*player) {
                    held.push(board.picture_at(row, col).unwrap());
                }
            }
        }
        assert!(held.len() <= 2, "{} controls {} cells", player, held.len());
        if held.len() == 2 {
            assert_eq!(held[0], held[1], "{} holds two unequal cards", player);
        }
    }
}

#[tokio::test]
async fn scenario_basic_match() {
    let board = parsed("1x3\nA\nA\nB\n");
    board.register_player("p", None).unwrap();

    board.flip_up("p", 0, 0).await.unwrap();
    assert!(board.is_face_up(0, 0).unwrap());
    assert_eq!(board.controller_at(0, 0).unwrap(), Some("p".to_string()));
    assert_invariants(&board, &["p"]);

    board.flip_up("p", 0, 1).await.unwrap();
    for col in [0, 1] {
        assert!(board.is_face_up(0, col).unwrap());
        assert_eq!(board.controller_at(0, col).unwrap(), Some("p".to_string()));
    }
    assert_invariants(&board, &["p"]);

    board.flip_up("p", 0, 2).await.unwrap();
    for col in [0, 1] {
        assert_eq!(board.picture_at(0, col).unwrap(), None);
        assert!(!board.is_face_up(0, col).unwrap());
    }
    assert!(board.is_face_up(0, 2).unwrap());
    assert_eq!(board.controller_at(0, 2).unwrap(), Some("p".to_string()));
    assert_invariants(&board, &["p"]);
}

#[tokio::test]
async fn scenario_mismatch_then_flip_down() {
    let board = parsed("1x3\nA\nB\nC\n");
    board.register_player("p", None).unwrap();

    board.flip_up("p", 0, 0).await.unwrap();
    board.flip_up("p", 0, 1).await.unwrap();
    for col in [0, 1] {
        assert!(board.is_face_up(0, col).unwrap());
        assert_eq!(board.controller_at(0, col).unwrap(), None);
    }
    assert_invariants(&board, &["p"]);

    board.flip_up("p", 0, 2).await.unwrap();
    assert!(!board.is_face_up(0, 0).unwrap());
    assert!(!board.is_face_up(0, 1).unwrap());
    assert!(board.is_face_up(0, 2).unwrap());
    assert_eq!(board.controller_at(0, 2).unwrap(), Some("p".to_string()));
    assert_invariants(&board, &["p"]);
}

#[tokio::test]
async fn scenario_takeover_of_loose_card() {
    let board = parsed("1x2\nA\nB\n");
    board.register_player("p1", None).unwrap();
    board.register_player("p2", None).unwrap();

    board.flip_up("p1", 0, 0).await.unwrap();
    board.flip_up("p1", 0, 1).await.unwrap();
    // Mismatch: both face-up, unheld.
    assert_eq!(board.controller_at(0, 0).unwrap(), None);
    assert_eq!(board.controller_at(0, 1).unwrap(), None);

    // p2 claims one; p2 has no pending pair, so the other stays up.
    board.flip_up("p2", 0, 0).await.unwrap();
    assert!(board.is_face_up(0, 0).unwrap());
    assert_eq!(board.controller_at(0, 0).unwrap(), Some("p2".to_string()));
    assert!(board.is_face_up(0, 1).unwrap());
    assert_eq!(board.controller_at(0, 1).unwrap(), None);
    assert_invariants(&board, &["p1", "p2"]);
}

#[tokio::test]
async fn scenario_second_card_held_fails_fast() {
    let board = parsed("1x3\nA\nA\nB\n");
    board.register_player("p1", None).unwrap();
    board.register_player("p2", None).unwrap();

    board.flip_up("p2", 0, 1).await.unwrap();
    board.flip_up("p1", 0, 0).await.unwrap();

    let err = board.flip_up("p1", 0, 1).await.unwrap_err();
    assert!(matches!(err, BoardError::Controlled { .. }));
    assert!(err.to_string().contains("controlled"));
    // p1's first card is left face-up and unheld.
    assert!(board.is_face_up(0, 0).unwrap());
    assert_eq!(board.controller_at(0, 0).unwrap(), None);
    assert_eq!(board.controller_at(0, 1).unwrap(), Some("p2".to_string()));
    assert_invariants(&board, &["p1", "p2"]);

    // p1's next first flip turns the abandoned card down.
    board.flip_up("p1", 0, 2).await.unwrap();
    assert!(!board.is_face_up(0, 0).unwrap());
    assert!(board.is_face_up(0, 2).unwrap());
    assert_eq!(board.controller_at(0, 2).unwrap(), Some("p1".to_string()));
    assert_invariants(&board, &["p1", "p2"]);
}

#[tokio::test]
async fn scenario_same_card_twice() {
    let board = parsed("1x3\nA\nA\nB\n");
    board.register_player("p", None).unwrap();

    board.flip_up("p", 0, 0).await.unwrap();
    let err = board.flip_up("p", 0, 0).await.unwrap_err();
    assert!(err.to_string().contains("cannot choose same card"));
    assert!(board.is_face_up(0, 0).unwrap());
    assert_eq!(board.controller_at(0, 0).unwrap(), None);
    assert_invariants(&board, &["p"]);

    board.flip_up("p", 0, 2).await.unwrap();
    assert!(!board.is_face_up(0, 0).unwrap());
    assert_eq!(board.controller_at(0, 2).unwrap(), Some("p".to_string()));
    assert_invariants(&board, &["p"]);
}

#[tokio::test]
async fn bounds_errors_on_every_edge() {
    let board = parsed("2x3\nA\nB\nC\nC\nB\nA\n");
    board.register_player("p", None).unwrap();

    for (row, col) in [(-1, 0), (0, -1), (2, 0), (0, 3)] {
        let err = board.flip_up("p", row, col).await.unwrap_err();
        assert!(
            matches!(err, BoardError::OutOfBounds { .. }),
            "({},{}) should be out of bounds",
            row,
            col
        );
        assert!(err.to_string().contains("out of bounds"));
    }
    // Nothing changed.
    for row in 0..2 {
        for col in 0..3 {
            assert!(!board.is_face_up(row, col).unwrap());
        }
    }
}

#[tokio::test]
async fn unregistered_player_cannot_flip() {
    let board = parsed("1x2\nA\nA\n");
    let err = board.flip_up("unknown", 0, 0).await.unwrap_err();
    assert_eq!(err, BoardError::UnknownPlayer("unknown".to_string()));
    assert!(err.to_string().contains("unknown player"));
}

#[test]
fn register_player_validates_and_is_idempotent() {
    let board = parsed("1x2\nA\nA\n");
    board.register_player("zoe", Some("Zoe")).unwrap();
    board.register_player("zoe", Some("Other")).unwrap();
    assert!(matches!(
        board.register_player("", None),
        Err(BoardError::InvalidPlayerId(_))
    ));
    assert!(matches!(
        board.register_player("z z", None),
        Err(BoardError::InvalidPlayerId(_))
    ));
}

#[test]
fn fresh_parse_dump_round_trip() {
    let text = "2x2\napple\npear\npear\napple\n";
    assert_eq!(parsed(text).dump_pictures(), text);
}

#[tokio::test]
async fn repeated_look_is_stable() {
    let board = parsed("1x3\nA\nA\nB\n");
    board.flip("p", 0, 0).await.unwrap();
    let first = board.look("p").unwrap();
    let second = board.look("p").unwrap();
    assert_eq!(first, second);
}

#[tokio::test]
async fn look_shows_per_viewer_ownership() {
    let board = parsed("1x3\nA\nA\nB\n");
    board.register_player("p1", None).unwrap();
    board.flip_up("p1", 0, 0).await.unwrap();

    assert_eq!(board.look("p1").unwrap(), "1x3\nmy A\ndown\ndown\n");
    assert_eq!(board.look("p2").unwrap(), "1x3\nup A\ndown\ndown\n");
}

#[tokio::test]
async fn look_shows_removed_cards_as_none() {
    let board = parsed("1x3\nA\nA\nB\n");
    board.register_player("p", None).unwrap();
    board.flip_up("p", 0, 0).await.unwrap();
    board.flip_up("p", 0, 1).await.unwrap();
    board.flip_up("p", 0, 2).await.unwrap();
    assert_eq!(board.look("p").unwrap(), "1x3\nnone\nnone\nmy B\n");
}
