//! Plain structural form of `GameState`.
//!
//! `SerializedGameState` holds only primitives, strings, sequences and
//! maps: no persistent collections, no registry references. It is what a
//! presentation layer or a save file sees:
//!
//! ```json
//! {
//!   "board": {
//!     "size": 3,
//!     "cells": [[0,1,0],[0,0,0],[2,0,0]],
//!     "lastMove": { "x": 0, "y": 2, "player": 2 }
//!   },
//!   "currentPlayer": 1,
//!   "deck": { "drawPile": ["Take", "Place"], "discardPile": [] },
//!   "status": { "skipNextTurns": { "1": 0, "2": 1 } },
//!   "winner": null
//! }
//! ```
//!
//! Converting back validates every field, so a hand-edited or truncated
//! form yields a `SerializeError` instead of a corrupt state.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::error::{BoardError, SerializeError};
use super::player::{Player, PlayerMap};
use super::state::{GameState, StatusState};
use crate::board::{Board, CellValue, LastMove, Point};
use crate::cards::CardId;
use crate::deck::DeckState;
use crate::rules::Winner;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SerializedLastMove {
    pub x: i32,
    pub y: i32,
    pub player: u8,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SerializedBoard {
    pub size: usize,
    /// Row-major: `cells[y][x]`, values 0 (empty), 1, 2.
    pub cells: Vec<Vec<u8>>,
    pub last_move: Option<SerializedLastMove>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SerializedDeck {
    pub draw_pile: Vec<String>,
    pub discard_pile: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SerializedStatus {
    /// Player number -> pending skips. Missing players have none.
    pub skip_next_turns: BTreeMap<u8, u32>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SerializedWinner {
    Player(u8),
    Draw,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SerializedGameState {
    pub board: SerializedBoard,
    pub current_player: u8,
    pub deck: SerializedDeck,
    pub status: SerializedStatus,
    #[serde(default)]
    pub winner: Option<SerializedWinner>,
}

/// Convert a state into its plain form.
#[must_use]
pub fn serialize_game_state(state: &GameState) -> SerializedGameState {
    let board = &state.board;
    SerializedGameState {
        board: SerializedBoard {
            size: board.size(),
            cells: (0..board.size())
                .map(|y| board.row(y).map(CellValue::as_u8).collect())
                .collect(),
            last_move: board.last_move().map(|m| SerializedLastMove {
                x: m.x,
                y: m.y,
                player: m.player.number(),
            }),
        },
        current_player: state.current_player.number(),
        deck: SerializedDeck {
            draw_pile: state.deck.draw_pile().iter().map(ToString::to_string).collect(),
            discard_pile: state.deck.discard_pile().iter().map(ToString::to_string).collect(),
        },
        status: SerializedStatus {
            skip_next_turns: state
                .status
                .skip_next_turns
                .iter()
                .map(|(player, &skips)| (player.number(), skips))
                .collect(),
        },
        winner: state.winner.map(|w| match w {
            Winner::Player(p) => SerializedWinner::Player(p.number()),
            Winner::Draw => SerializedWinner::Draw,
        }),
    }
}

/// Rebuild a state from its plain form.
pub fn deserialize_game_state(form: &SerializedGameState) -> Result<GameState, SerializeError> {
    let board = deserialize_board(&form.board)?;
    let current_player = Player::try_from(form.current_player)?;

    let deck = DeckState::from_piles(
        form.deck.draw_pile.iter().map(CardId::new),
        form.deck.discard_pile.iter().map(CardId::new),
    );

    let mut skip_next_turns = PlayerMap::default();
    for (&number, &skips) in &form.status.skip_next_turns {
        skip_next_turns[Player::try_from(number)?] = skips;
    }

    let winner = match &form.winner {
        None => None,
        Some(SerializedWinner::Draw) => Some(Winner::Draw),
        Some(SerializedWinner::Player(n)) => Some(Winner::Player(Player::try_from(*n)?)),
    };

    Ok(GameState {
        board,
        current_player,
        deck,
        status: StatusState { skip_next_turns },
        winner,
    })
}

fn deserialize_board(form: &SerializedBoard) -> Result<Board, SerializeError> {
    let size = form.size;
    if size == 0 {
        return Err(BoardError::InvalidSize(size).into());
    }
    if form.cells.len() != size || form.cells.iter().any(|row| row.len() != size) {
        return Err(SerializeError::RaggedBoard { size });
    }

    let mut cells = Vec::with_capacity(size * size);
    for (y, row) in form.cells.iter().enumerate() {
        for (x, &value) in row.iter().enumerate() {
            let cell =
                CellValue::from_u8(value).ok_or(SerializeError::InvalidCell { x, y, value })?;
            cells.push(cell);
        }
    }

    let last_move = form
        .last_move
        .as_ref()
        .map(|m| {
            Ok::<_, SerializeError>(LastMove {
                x: m.x,
                y: m.y,
                player: Player::try_from(m.player)?,
            })
        })
        .transpose()?;

    let board = Board::from_cells(size, cells, last_move)?;
    if let Some(m) = last_move {
        if !board.is_on_board(m.point()) {
            return Err(BoardError::OutOfBounds(Point::new(m.x, m.y)).into());
        }
    }
    Ok(board)
}

impl GameState {
    /// Plain structural form.
    #[must_use]
    pub fn to_plain(&self) -> SerializedGameState {
        serialize_game_state(self)
    }

    /// Rebuild from the plain structural form.
    pub fn from_plain(form: &SerializedGameState) -> Result<Self, SerializeError> {
        deserialize_game_state(form)
    }

    /// Plain form as JSON.
    pub fn to_json(&self) -> Result<String, SerializeError> {
        Ok(serde_json::to_string(&self.to_plain())?)
    }

    pub fn from_json(json: &str) -> Result<Self, SerializeError> {
        let form: SerializedGameState = serde_json::from_str(json)?;
        deserialize_game_state(&form)
    }

    /// Plain form as compact binary.
    pub fn to_bytes(&self) -> Result<Vec<u8>, SerializeError> {
        Ok(bincode::serialize(&self.to_plain())?)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, SerializeError> {
        let form: SerializedGameState = bincode::deserialize(bytes)?;
        deserialize_game_state(&form)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> GameState {
        let mut board = Board::new(3).unwrap();
        board.place(Point::new(1, 0), Player::One).unwrap();
        board.place(Point::new(0, 2), Player::Two).unwrap();
        let mut state = GameState::new(
            board,
            Player::One,
            DeckState::from_piles(
                vec![CardId::new("Take"), CardId::new("Place")],
                vec![CardId::new("TimeFreeze")],
            ),
        );
        state.status.skip_next_turns[Player::Two] = 1;
        state
    }

    #[test]
    fn test_plain_form_shape() {
        let form = serialize_game_state(&sample());
        assert_eq!(form.board.cells, vec![vec![0, 1, 0], vec![0, 0, 0], vec![2, 0, 0]]);
        assert_eq!(
            form.board.last_move,
            Some(SerializedLastMove { x: 0, y: 2, player: 2 })
        );
        assert_eq!(form.deck.draw_pile, vec!["Take", "Place"]);
        assert_eq!(form.status.skip_next_turns.get(&2), Some(&1));
        assert_eq!(form.winner, None);
    }

    #[test]
    fn test_round_trip() {
        let mut state = sample();
        state.winner = Some(Winner::Player(Player::Two));

        let back = deserialize_game_state(&serialize_game_state(&state)).unwrap();
        assert_eq!(back, state);

        let json = state.to_json().unwrap();
        assert_eq!(GameState::from_json(&json).unwrap(), state);

        let bytes = state.to_bytes().unwrap();
        assert_eq!(GameState::from_bytes(&bytes).unwrap(), state);
    }

    #[test]
    fn test_rejects_bad_input() {
        let mut form = serialize_game_state(&sample());
        form.board.cells[1][1] = 7;
        assert!(matches!(
            deserialize_game_state(&form),
            Err(SerializeError::InvalidCell { x: 1, y: 1, value: 7 })
        ));

        let mut form = serialize_game_state(&sample());
        form.board.cells.pop();
        assert!(matches!(
            deserialize_game_state(&form),
            Err(SerializeError::RaggedBoard { size: 3 })
        ));

        let mut form = serialize_game_state(&sample());
        form.current_player = 3;
        assert!(matches!(
            deserialize_game_state(&form),
            Err(SerializeError::InvalidPlayer(3))
        ));

        let mut form = serialize_game_state(&sample());
        form.board.last_move = Some(SerializedLastMove { x: 9, y: 0, player: 1 });
        assert!(matches!(
            deserialize_game_state(&form),
            Err(SerializeError::Board(BoardError::OutOfBounds(_)))
        ));
    }

    #[test]
    fn test_missing_skip_entries_default_to_zero() {
        let mut form = serialize_game_state(&sample());
        form.status.skip_next_turns.clear();
        let state = deserialize_game_state(&form).unwrap();
        assert_eq!(state.skips_pending(Player::One), 0);
        assert_eq!(state.skips_pending(Player::Two), 0);
    }
}
