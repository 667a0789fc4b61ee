//! Player identification and per-player data storage.
//!
//! ## Player
//!
//! The engine is strictly two-player: `Player::One` and `Player::Two`.
//! On the wire a player is its number (`1` or `2`).
//!
//! ## PlayerMap
//!
//! Fixed two-slot storage indexed by `Player`. Backed by an array, so
//! cloning is a plain copy and no live state is ever shared.

use serde::{Deserialize, Serialize};
use std::ops::{Index, IndexMut};

use super::error::SerializeError;

/// One of the two players.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Player {
    One,
    Two,
}

impl Player {
    /// Both players in seat order.
    pub const BOTH: [Player; 2] = [Player::One, Player::Two];

    /// The other player.
    #[must_use]
    pub const fn opponent(self) -> Self {
        match self {
            Player::One => Player::Two,
            Player::Two => Player::One,
        }
    }

    /// Wire number (1 or 2).
    #[must_use]
    pub const fn number(self) -> u8 {
        match self {
            Player::One => 1,
            Player::Two => 2,
        }
    }

    /// Parse a wire number.
    #[must_use]
    pub const fn from_number(number: u8) -> Option<Self> {
        match number {
            1 => Some(Player::One),
            2 => Some(Player::Two),
            _ => None,
        }
    }

    /// Slot index (0-based).
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Player::One => 0,
            Player::Two => 1,
        }
    }
}

impl TryFrom<u8> for Player {
    type Error = SerializeError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Player::from_number(value).ok_or(SerializeError::InvalidPlayer(value))
    }
}

impl From<Player> for u8 {
    fn from(player: Player) -> Self {
        player.number()
    }
}

impl std::fmt::Display for Player {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Player {}", self.number())
    }
}

/// Per-player data storage with O(1) access.
///
/// ## Example
///
/// ```
/// use card_gomoku::core::{Player, PlayerMap};
///
/// let mut skips: PlayerMap<u32> = PlayerMap::default();
/// skips[Player::Two] += 1;
///
/// assert_eq!(skips[Player::One], 0);
/// assert_eq!(skips[Player::Two], 1);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayerMap<T> {
    data: [T; 2],
}

impl<T> PlayerMap<T> {
    /// Create a map with values from a factory function.
    pub fn new(factory: impl Fn(Player) -> T) -> Self {
        Self {
            data: [factory(Player::One), factory(Player::Two)],
        }
    }

    /// Create a map with both entries set to the same value.
    pub fn with_value(value: T) -> Self
    where
        T: Clone,
    {
        Self {
            data: [value.clone(), value],
        }
    }

    /// Get a reference to a player's data.
    #[must_use]
    pub fn get(&self, player: Player) -> &T {
        &self.data[player.index()]
    }

    /// Get a mutable reference to a player's data.
    pub fn get_mut(&mut self, player: Player) -> &mut T {
        &mut self.data[player.index()]
    }

    /// Iterate over `(player, value)` pairs in seat order.
    pub fn iter(&self) -> impl Iterator<Item = (Player, &T)> {
        Player::BOTH.into_iter().zip(self.data.iter())
    }
}

impl<T> Index<Player> for PlayerMap<T> {
    type Output = T;

    fn index(&self, player: Player) -> &Self::Output {
        self.get(player)
    }
}

impl<T> IndexMut<Player> for PlayerMap<T> {
    fn index_mut(&mut self, player: Player) -> &mut Self::Output {
        self.get_mut(player)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opponent() {
        assert_eq!(Player::One.opponent(), Player::Two);
        assert_eq!(Player::Two.opponent(), Player::One);
    }

    #[test]
    fn test_number_round_trip() {
        for player in Player::BOTH {
            assert_eq!(Player::from_number(player.number()), Some(player));
        }
        assert_eq!(Player::from_number(0), None);
        assert_eq!(Player::from_number(3), None);
    }

    #[test]
    fn test_player_serde_as_number() {
        let json = serde_json::to_string(&Player::Two).unwrap();
        assert_eq!(json, "2");

        let parsed: Player = serde_json::from_str("1").unwrap();
        assert_eq!(parsed, Player::One);

        assert!(serde_json::from_str::<Player>("7").is_err());
    }

    #[test]
    fn test_player_map_index() {
        let mut map = PlayerMap::new(|p| p.number() as u32 * 10);
        assert_eq!(map[Player::One], 10);
        assert_eq!(map[Player::Two], 20);

        map[Player::One] = 5;
        let pairs: Vec<_> = map.iter().map(|(p, v)| (p, *v)).collect();
        assert_eq!(pairs, vec![(Player::One, 5), (Player::Two, 20)]);
    }
}
