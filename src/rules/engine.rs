//! Win resolution.
//!
//! Effects such as `SwapAll` and Spontaneous Generation can complete lines
//! far from the last placement, so resolution always scans the whole board.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::board::scan_all_wins;
use crate::core::config::SimultaneousFivePolicy;
use crate::core::player::Player;
use crate::core::state::GameState;

/// Result of a decided match.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Winner {
    /// Single winner.
    Player(Player),
    /// Both players completed a line on the same step under the draw policy.
    Draw,
}

impl Winner {
    /// Check if a player won.
    #[must_use]
    pub fn is_winner(&self, player: Player) -> bool {
        matches!(self, Winner::Player(p) if *p == player)
    }

    /// The winning player, `None` for a draw.
    #[must_use]
    pub const fn player(&self) -> Option<Player> {
        match self {
            Winner::Player(p) => Some(*p),
            Winner::Draw => None,
        }
    }
}

impl std::fmt::Display for Winner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Winner::Player(p) => write!(f, "{p} wins"),
            Winner::Draw => f.write_str("draw"),
        }
    }
}

/// Decide the winner from the board, if any.
///
/// - no line of five: unchanged
/// - lines for one player: that player wins
/// - lines for both: `policy` decides (`Attacker` -> `attacker`, `Draw` -> draw)
///
/// A state that already has a winner is returned unchanged.
#[must_use]
pub fn resolve_wins(
    state: &GameState,
    attacker: Player,
    policy: SimultaneousFivePolicy,
) -> GameState {
    if state.winner.is_some() {
        return state.clone();
    }

    let wins = scan_all_wins(&state.board);
    let one = wins.iter().any(|w| w.player == Player::One);
    let two = wins.iter().any(|w| w.player == Player::Two);

    let winner = match (one, two) {
        (false, false) => return state.clone(),
        (true, false) => Winner::Player(Player::One),
        (false, true) => Winner::Player(Player::Two),
        (true, true) => match policy {
            SimultaneousFivePolicy::Attacker => Winner::Player(attacker),
            SimultaneousFivePolicy::Draw => Winner::Draw,
        },
    };

    info!(%winner, lines = wins.len(), "match decided");
    let mut next = state.clone();
    next.winner = Some(winner);
    next
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{Board, Point};
    use crate::deck::DeckState;
    use crate::effects::{apply_ops, DomainOp};

    fn state_with_rows(rows: &[(i32, Player)]) -> GameState {
        let mut board = Board::new(5).unwrap();
        for &(y, player) in rows {
            for x in 0..5 {
                board.place(Point::new(x, y), player).unwrap();
            }
        }
        GameState::new(board, Player::One, DeckState::default())
    }

    #[test]
    fn test_no_win() {
        let s = state_with_rows(&[]);
        let next = resolve_wins(&s, Player::One, SimultaneousFivePolicy::Attacker);
        assert_eq!(next.winner, None);
    }

    #[test]
    fn test_full_board_without_five_is_not_decided() {
        let mut board = Board::new(2).unwrap();
        let stones = [
            (0, 0, Player::One),
            (1, 0, Player::Two),
            (0, 1, Player::Two),
            (1, 1, Player::One),
        ];
        for (x, y, player) in stones {
            board.place(Point::new(x, y), player).unwrap();
        }
        let s = GameState::new(board, Player::One, DeckState::default());
        assert_eq!(s.board.count_empties(), 0);

        let next = resolve_wins(&s, Player::One, SimultaneousFivePolicy::Draw);
        assert_eq!(next, s);
    }

    #[test]
    fn test_single_winner_ignores_attacker() {
        let s = state_with_rows(&[(2, Player::Two)]);
        let next = resolve_wins(&s, Player::One, SimultaneousFivePolicy::Attacker);
        assert_eq!(next.winner, Some(Winner::Player(Player::Two)));
        assert!(next.winner.unwrap().is_winner(Player::Two));
    }

    #[test]
    fn test_simultaneous_policy() {
        let s = state_with_rows(&[(0, Player::One), (1, Player::Two)]);
        let s = apply_ops(&s, &[DomainOp::SwapAll]).unwrap();

        let attacker = resolve_wins(&s, Player::One, SimultaneousFivePolicy::Attacker);
        assert_eq!(attacker.winner, Some(Winner::Player(Player::One)));

        let attacker_two = resolve_wins(&s, Player::Two, SimultaneousFivePolicy::Attacker);
        assert_eq!(attacker_two.winner, Some(Winner::Player(Player::Two)));

        let draw = resolve_wins(&s, Player::Two, SimultaneousFivePolicy::Draw);
        assert_eq!(draw.winner, Some(Winner::Draw));
        assert!(!Winner::Draw.is_winner(Player::One));
    }

    #[test]
    fn test_winner_is_terminal() {
        let mut s = state_with_rows(&[(0, Player::One)]);
        s.winner = Some(Winner::Player(Player::Two));
        let next = resolve_wins(&s, Player::One, SimultaneousFivePolicy::Attacker);
        assert_eq!(next.winner, Some(Winner::Player(Player::Two)));
    }

    #[test]
    fn test_winner_serde() {
        assert_eq!(serde_json::to_string(&Winner::Draw).unwrap(), "\"draw\"");
        assert_eq!(
            serde_json::to_string(&Winner::Player(Player::One)).unwrap(),
            r#"{"player":1}"#
        );
    }
}
