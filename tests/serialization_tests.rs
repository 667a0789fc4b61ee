//! Serialization tests.
//!
//! Plain structural form, JSON and binary encodings of `GameState`, and
//! `MatchConfig` parsing.

use card_gomoku::board::{Board, Point};
use card_gomoku::cards::CardId;
use card_gomoku::core::{
    GameState, MatchConfig, OpponentKind, Player, Seed, SerializeError, SimultaneousFivePolicy,
};
use card_gomoku::deck::DeckState;
use card_gomoku::rules::Winner;

fn sample() -> GameState {
    let mut board = Board::new(6).unwrap();
    board.place(Point::new(1, 2), Player::One).unwrap();
    board.place(Point::new(3, 4), Player::Two).unwrap();
    let deck = DeckState::from_piles(
        vec![CardId::new("Take"), CardId::new("Place")],
        vec![CardId::new("TimeFreeze")],
    );
    let mut state = GameState::new(board, Player::Two, deck);
    state.status.skip_next_turns[Player::One] = 2;
    state
}

/// Test the JSON round trip.
#[test]
fn test_json_round_trip() {
    let state = sample();
    let json = state.to_json().unwrap();
    assert_eq!(GameState::from_json(&json).unwrap(), state);
}

/// Test the binary round trip, including a winner.
#[test]
fn test_binary_round_trip() {
    let mut state = sample();
    state.winner = Some(Winner::Draw);
    let bytes = state.to_bytes().unwrap();
    assert_eq!(GameState::from_bytes(&bytes).unwrap(), state);
}

/// Test that a deserialized copy is independent of the original.
#[test]
fn test_copy_is_independent() {
    let state = sample();
    let mut copy = GameState::from_plain(&state.to_plain()).unwrap();

    copy.board.place(Point::new(0, 0), Player::One).unwrap();
    copy.deck.discard(&[CardId::new("Place")]);
    copy.status.skip_next_turns[Player::Two] = 5;

    assert_eq!(state.board.owner_at(Point::new(0, 0)), None);
    assert_eq!(state.deck.discard_pile().len(), 1);
    assert_eq!(state.skips_pending(Player::Two), 0);
}

/// Test the plain form layout.
#[test]
fn test_plain_form_layout() {
    let plain = sample().to_plain();
    assert_eq!(plain.board.cells[2][1], 1);
    assert_eq!(plain.board.cells[4][3], 2);
    assert_eq!(plain.current_player, 2);
    assert_eq!(plain.deck.draw_pile, vec!["Take", "Place"]);
    assert_eq!(plain.status.skip_next_turns.get(&1), Some(&2));
}

/// Test that malformed JSON is rejected with a typed error.
#[test]
fn test_rejects_malformed() {
    assert!(matches!(GameState::from_json("{"), Err(SerializeError::Json(_))));

    let mut plain = sample().to_plain();
    plain.board.cells[0][0] = 7;
    assert!(matches!(
        GameState::from_plain(&plain),
        Err(SerializeError::InvalidCell { value: 7, .. })
    ));
}

/// Test that config JSON accepts partial input and both seed forms.
#[test]
fn test_config_json() {
    let config = MatchConfig::from_json(
        r#"{
            "boardSize": 9,
            "firstPlayer": 2,
            "seed": 42,
            "simultaneousFivePolicy": "draw",
            "opponent": "heuristic"
        }"#,
    )
    .unwrap();
    assert_eq!(config.board_size, 9);
    assert_eq!(config.first_player, Player::Two);
    assert_eq!(config.seed, Seed::Number(42));
    assert_eq!(config.simultaneous_five_policy, SimultaneousFivePolicy::Draw);
    assert_eq!(config.opponent, OpponentKind::Heuristic);
    assert!(config.ensure_first_playable);

    let negative = MatchConfig::from_json(r#"{"seed": -5}"#).unwrap();
    assert_eq!(negative.seed, Seed::Number(-5));

    let text = MatchConfig::from_json(r#"{"seed": "abc"}"#).unwrap();
    assert_eq!(text.seed, Seed::Text("abc".to_string()));
    assert_eq!(text.board_size, 15);

    assert!(MatchConfig::from_json(r#"{"boardSize": 0}"#).is_err());
}
