//! The board grid.

use im::Vector;
use serde::{Deserialize, Serialize};

use crate::core::error::BoardError;
use crate::core::player::Player;

/// A board coordinate. `x` is the column, `y` the row.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Step `k` cells along direction `(dx, dy)`.
    #[must_use]
    pub const fn offset(self, dx: i32, dy: i32, k: i32) -> Self {
        Self {
            x: self.x + dx * k,
            y: self.y + dy * k,
        }
    }
}

impl std::fmt::Display for Point {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({},{})", self.x, self.y)
    }
}

/// Contents of one cell.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum CellValue {
    #[default]
    Empty,
    Occupied(Player),
}

impl CellValue {
    /// The stone's owner, if any.
    #[must_use]
    pub const fn owner(self) -> Option<Player> {
        match self {
            CellValue::Empty => None,
            CellValue::Occupied(player) => Some(player),
        }
    }

    #[must_use]
    pub const fn is_empty(self) -> bool {
        matches!(self, CellValue::Empty)
    }

    /// Wire form: 0 empty, 1/2 player number.
    #[must_use]
    pub const fn as_u8(self) -> u8 {
        match self {
            CellValue::Empty => 0,
            CellValue::Occupied(player) => player.number(),
        }
    }

    #[must_use]
    pub const fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(CellValue::Empty),
            n => match Player::from_number(n) {
                Some(player) => Some(CellValue::Occupied(player)),
                None => None,
            },
        }
    }
}

impl TryFrom<u8> for CellValue {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        CellValue::from_u8(value).ok_or_else(|| format!("invalid cell value: {value}"))
    }
}

impl From<CellValue> for u8 {
    fn from(cell: CellValue) -> Self {
        cell.as_u8()
    }
}

/// The most recent placement.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LastMove {
    pub x: i32,
    pub y: i32,
    pub player: Player,
}

impl LastMove {
    #[must_use]
    pub const fn point(self) -> Point {
        Point::new(self.x, self.y)
    }
}

/// Square grid of cells, row-major.
///
/// ## Example
///
/// ```
/// use card_gomoku::board::{Board, CellValue, Point};
/// use card_gomoku::core::Player;
///
/// let mut board = Board::new(9).unwrap();
/// board.place(Point::new(4, 4), Player::One).unwrap();
///
/// assert_eq!(board.get(Point::new(4, 4)).unwrap(), CellValue::Occupied(Player::One));
/// assert!(board.place(Point::new(4, 4), Player::Two).is_err());
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Board {
    size: usize,
    cells: Vector<CellValue>,
    last_move: Option<LastMove>,
}

impl Board {
    /// Create an empty `size`x`size` board.
    pub fn new(size: usize) -> Result<Self, BoardError> {
        if size == 0 || i32::try_from(size).is_err() {
            return Err(BoardError::InvalidSize(size));
        }
        Ok(Self {
            size,
            cells: std::iter::repeat(CellValue::Empty).take(size * size).collect(),
            last_move: None,
        })
    }

    /// Rebuild a board from row-major cells. `cells.len()` must be `size * size`.
    pub(crate) fn from_cells(
        size: usize,
        cells: Vec<CellValue>,
        last_move: Option<LastMove>,
    ) -> Result<Self, BoardError> {
        if size == 0 || cells.len() != size * size {
            return Err(BoardError::InvalidSize(size));
        }
        Ok(Self {
            size,
            cells: cells.into_iter().collect(),
            last_move,
        })
    }

    #[must_use]
    pub fn size(&self) -> usize {
        self.size
    }

    #[must_use]
    pub fn last_move(&self) -> Option<LastMove> {
        self.last_move
    }

    /// Whether `0 <= x,y < size`.
    #[must_use]
    pub fn is_on_board(&self, point: Point) -> bool {
        self.index(point).is_some()
    }

    fn index(&self, point: Point) -> Option<usize> {
        let x = usize::try_from(point.x).ok()?;
        let y = usize::try_from(point.y).ok()?;
        (x < self.size && y < self.size).then_some(y * self.size + x)
    }

    fn require_index(&self, point: Point) -> Result<usize, BoardError> {
        self.index(point).ok_or(BoardError::OutOfBounds(point))
    }

    /// Read a cell.
    pub fn get(&self, point: Point) -> Result<CellValue, BoardError> {
        let idx = self.require_index(point)?;
        Ok(self.cells[idx])
    }

    /// Read a cell, `None` when off the board.
    #[must_use]
    pub fn cell(&self, point: Point) -> Option<CellValue> {
        self.index(point).map(|idx| self.cells[idx])
    }

    /// Owner of a cell, `None` when empty or off the board.
    #[must_use]
    pub fn owner_at(&self, point: Point) -> Option<Player> {
        self.cell(point).and_then(CellValue::owner)
    }

    pub fn is_empty_cell(&self, point: Point) -> Result<bool, BoardError> {
        Ok(self.get(point)?.is_empty())
    }

    /// Put a stone on an empty cell and record it as the last move.
    pub fn place(&mut self, point: Point, player: Player) -> Result<(), BoardError> {
        let idx = self.require_index(point)?;
        if !self.cells[idx].is_empty() {
            return Err(BoardError::CellOccupied(point));
        }
        self.cells.set(idx, CellValue::Occupied(player));
        self.last_move = Some(LastMove {
            x: point.x,
            y: point.y,
            player,
        });
        Ok(())
    }

    /// Clear an occupied cell. `last_move` is left as is.
    pub fn remove(&mut self, point: Point) -> Result<Player, BoardError> {
        let idx = self.require_index(point)?;
        match self.cells[idx] {
            CellValue::Empty => Err(BoardError::CellEmpty(point)),
            CellValue::Occupied(player) => {
                self.cells.set(idx, CellValue::Empty);
                Ok(player)
            }
        }
    }

    /// Flip the owner of every stone. `last_move` is left as is.
    pub fn swap_all(&mut self) {
        for cell in self.cells.iter_mut() {
            if let CellValue::Occupied(player) = *cell {
                *cell = CellValue::Occupied(player.opponent());
            }
        }
    }

    /// All points in row-major order.
    pub fn points(&self) -> impl Iterator<Item = Point> + '_ {
        let size = self.size as i32;
        (0..size).flat_map(move |y| (0..size).map(move |x| Point::new(x, y)))
    }

    /// `(point, cell)` pairs in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (Point, CellValue)> + '_ {
        self.points().zip(self.cells.iter().copied())
    }

    /// Empty cells in row-major order.
    #[must_use]
    pub fn empties(&self) -> Vec<Point> {
        self.iter()
            .filter(|(_, cell)| cell.is_empty())
            .map(|(point, _)| point)
            .collect()
    }

    /// Cells owned by `player` in row-major order.
    #[must_use]
    pub fn stones_of(&self, player: Player) -> Vec<Point> {
        self.iter()
            .filter(|(_, cell)| cell.owner() == Some(player))
            .map(|(point, _)| point)
            .collect()
    }

    #[must_use]
    pub fn count_empties(&self) -> usize {
        self.cells.iter().filter(|cell| cell.is_empty()).count()
    }

    #[must_use]
    pub fn has_stones_of(&self, player: Player) -> bool {
        self.cells.iter().any(|cell| cell.owner() == Some(player))
    }

    /// One row as wire values.
    pub fn row(&self, y: usize) -> impl Iterator<Item = CellValue> + '_ {
        self.cells.iter().skip(y * self.size).take(self.size).copied()
    }
}

impl std::fmt::Display for Board {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for y in 0..self.size {
            for cell in self.row(y) {
                let c = match cell {
                    CellValue::Empty => '.',
                    CellValue::Occupied(Player::One) => 'X',
                    CellValue::Occupied(Player::Two) => 'O',
                };
                write!(f, "{c}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
