//! Line geometry: win detection and maximal same-owner fragments.
//!
//! Lines are walked along the four `DIRECTIONS`. A full-board scan starts a
//! line only at a *head*: a stone whose predecessor along the direction is
//! not the same owner. Each maximal fragment is therefore reported once.

use serde::{Deserialize, Serialize};

use super::grid::{Board, CellValue, Point};
use crate::core::player::Player;

/// Horizontal, vertical, diagonal, anti-diagonal.
pub const DIRECTIONS: [(i32, i32); 4] = [(1, 0), (0, 1), (1, 1), (1, -1)];

/// Stones in a row needed to win.
pub const WIN_LENGTH: usize = 5;

/// A completed line of at least `WIN_LENGTH` stones.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WinLine {
    pub player: Player,
    pub length: usize,
    /// Coordinates in walking order.
    pub line: Vec<Point>,
}

/// A maximal run of one player's stones along one direction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Fragment {
    pub player: Player,
    pub direction: (i32, i32),
    pub start: Point,
    pub length: usize,
    /// Empty on-board cells adjacent to either end (0..=2).
    pub open_ends: u8,
}

impl Fragment {
    /// The fragment's cells from head to tail.
    pub fn points(&self) -> impl Iterator<Item = Point> + '_ {
        let (dx, dy) = self.direction;
        (0..self.length as i32).map(move |k| self.start.offset(dx, dy, k))
    }
}

/// All same-owner cells through `origin` along `(dx, dy)`, ordered from the
/// backward end to the forward end. Empty when `origin` is not owned by
/// `player`.
#[must_use]
pub fn run_through(
    board: &Board,
    origin: Point,
    (dx, dy): (i32, i32),
    player: Player,
) -> Vec<Point> {
    if board.owner_at(origin) != Some(player) {
        return Vec::new();
    }
    let mut back = 1;
    while board.owner_at(origin.offset(dx, dy, -back)) == Some(player) {
        back += 1;
    }
    let mut fwd = 1;
    while board.owner_at(origin.offset(dx, dy, fwd)) == Some(player) {
        fwd += 1;
    }
    (1 - back..fwd).map(|k| origin.offset(dx, dy, k)).collect()
}

/// Check only the lines through `last_move`.
///
/// Returns the first direction (in `DIRECTIONS` order) reaching
/// `WIN_LENGTH`. `None` if there is no last move or its cell no longer
/// holds the mover's stone.
#[must_use]
pub fn check_win_from_last_move(board: &Board) -> Option<WinLine> {
    let last = board.last_move()?;
    DIRECTIONS.iter().find_map(|&dir| {
        let line = run_through(board, last.point(), dir, last.player);
        (line.len() >= WIN_LENGTH).then(|| WinLine {
            player: last.player,
            length: line.len(),
            line,
        })
    })
}

/// Every maximal fragment on the board, scanned row-major per direction.
#[must_use]
pub fn fragments(board: &Board) -> Vec<Fragment> {
    let mut out = Vec::new();
    for (start, cell) in board.iter() {
        let CellValue::Occupied(player) = cell else {
            continue;
        };
        for &(dx, dy) in &DIRECTIONS {
            let before = start.offset(dx, dy, -1);
            if board.owner_at(before) == Some(player) {
                continue;
            }
            let mut length = 1;
            while board.owner_at(start.offset(dx, dy, length)) == Some(player) {
                length += 1;
            }
            let after = start.offset(dx, dy, length);
            let open_ends = u8::from(board.cell(before) == Some(CellValue::Empty))
                + u8::from(board.cell(after) == Some(CellValue::Empty));
            out.push(Fragment {
                player,
                direction: (dx, dy),
                start,
                length: length as usize,
                open_ends,
            });
        }
    }
    out
}

/// Every line of at least `WIN_LENGTH` for both players.
#[must_use]
pub fn scan_all_wins(board: &Board) -> Vec<WinLine> {
    fragments(board)
        .into_iter()
        .filter(|f| f.length >= WIN_LENGTH)
        .map(|f| WinLine {
            player: f.player,
            length: f.length,
            line: f.points().collect(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board_with(size: usize, stones: &[(i32, i32, Player)]) -> Board {
        let mut board = Board::new(size).unwrap();
        for &(x, y, p) in stones {
            board.place(Point::new(x, y), p).unwrap();
        }
        board
    }

    fn row(y: i32, xs: std::ops::Range<i32>, p: Player) -> Vec<(i32, i32, Player)> {
        xs.map(|x| (x, y, p)).collect()
    }

    #[test]
    fn test_horizontal_five() {
        let board = board_with(9, &row(2, 0..5, Player::One));
        let win = check_win_from_last_move(&board).unwrap();
        assert_eq!(win.player, Player::One);
        assert_eq!(win.length, 5);
        assert_eq!(win.line.first(), Some(&Point::new(0, 2)));
        assert_eq!(win.line.last(), Some(&Point::new(4, 2)));
    }

    #[test]
    fn test_four_is_not_a_win() {
        let board = board_with(9, &row(0, 0..4, Player::Two));
        assert!(check_win_from_last_move(&board).is_none());
        assert!(scan_all_wins(&board).is_empty());
    }

    #[test]
    fn test_vertical_and_diagonals_at_edges() {
        let vertical: Vec<_> = (4..9).map(|y| (8, y, Player::One)).collect();
        assert!(check_win_from_last_move(&board_with(9, &vertical)).is_some());

        let diagonal: Vec<_> = (0..5).map(|k| (k, k, Player::Two)).collect();
        let win = check_win_from_last_move(&board_with(5, &diagonal)).unwrap();
        assert_eq!(win.player, Player::Two);

        let anti: Vec<_> = (0..5).map(|k| (k, 4 - k, Player::One)).collect();
        let board = board_with(5, &anti);
        assert!(check_win_from_last_move(&board).is_some());
        assert_eq!(scan_all_wins(&board).len(), 1);
    }

    #[test]
    fn test_win_found_from_middle_placement() {
        let mut stones = row(3, 0..2, Player::One);
        stones.extend(row(3, 3..5, Player::One));
        stones.push((2, 3, Player::One));
        let board = board_with(7, &stones);

        let win = check_win_from_last_move(&board).unwrap();
        assert_eq!(win.line, (0..5).map(|x| Point::new(x, 3)).collect::<Vec<_>>());
    }

    #[test]
    fn test_last_move_removed() {
        let mut board = board_with(9, &row(0, 0..5, Player::One));
        board.remove(Point::new(4, 0)).unwrap();
        assert!(check_win_from_last_move(&board).is_none());
    }

    #[test]
    fn test_scan_reports_each_line_once() {
        let mut stones = row(0, 0..6, Player::One);
        stones.extend(row(4, 1..6, Player::Two));
        let board = board_with(9, &stones);

        let wins = scan_all_wins(&board);
        assert_eq!(wins.len(), 2);
        assert!(wins.iter().any(|w| w.player == Player::One && w.length == 6));
        assert!(wins.iter().any(|w| w.player == Player::Two && w.length == 5));
    }

    #[test]
    fn test_fragment_open_ends() {
        let board = board_with(9, &row(4, 0..3, Player::One));
        let horizontal = fragments(&board)
            .into_iter()
            .find(|f| f.direction == (1, 0))
            .unwrap();
        assert_eq!(horizontal.length, 3);
        // The board edge closes the left end.
        assert_eq!(horizontal.open_ends, 1);

        let singles = fragments(&board)
            .into_iter()
            .filter(|f| f.direction == (0, 1))
            .count();
        assert_eq!(singles, 3);
    }

    #[test]
    fn test_run_through() {
        let board = board_with(9, &row(1, 2..6, Player::Two));
        let run = run_through(&board, Point::new(3, 1), (1, 0), Player::Two);
        assert_eq!(run.len(), 4);
        assert!(run_through(&board, Point::new(3, 1), (1, 0), Player::One).is_empty());
    }
}
