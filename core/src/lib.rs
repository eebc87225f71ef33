use ndarray::Array2;
use serde::{Deserialize, Serialize};
use std::ops::Index;

pub use cell::*;
pub use engine::*;
pub use error::*;
pub use generator::*;
pub use types::*;

mod cell;
mod engine;
mod error;
mod generator;
mod types;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Difficulty {
    pub rows: usize,
    pub cols: usize,
    pub mines: usize,
}

impl Difficulty {
    /// Validates a custom configuration before any board is built.
    pub fn new(rows: usize, cols: usize, mines: usize) -> Result<Self> {
        if rows == 0 || cols == 0 {
            return Err(GameError::InvalidDimensions);
        }
        if mines == 0 || mines >= rows * cols {
            return Err(GameError::MineCountOutOfRange);
        }
        Ok(Self { rows, cols, mines })
    }

    pub const fn easy() -> Self {
        Self {
            rows: 9,
            cols: 9,
            mines: 10,
        }
    }

    pub const fn medium() -> Self {
        Self {
            rows: 16,
            cols: 16,
            mines: 40,
        }
    }

    pub const fn hard() -> Self {
        Self {
            rows: 16,
            cols: 30,
            mines: 99,
        }
    }

    pub const fn size(&self) -> GridSize {
        (self.rows, self.cols)
    }

    pub const fn total_cells(&self) -> usize {
        self.rows * self.cols
    }
}

/// Mine placement for one board, separate from what the player has uncovered.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Minefield {
    mines: Array2<bool>,
    count: usize,
}

impl Minefield {
    pub fn from_mine_mask(mines: Array2<bool>) -> Self {
        let count = mines.iter().filter(|&&is_mine| is_mine).count();
        Self { mines, count }
    }

    pub fn from_mine_indices(size: GridSize, mine_indices: &[CellIndex]) -> Result<Self> {
        let mut mines: Array2<bool> = Array2::default(size);

        for &index in mine_indices {
            if index >= mines.len() {
                return Err(GameError::InvalidIndex);
            }
            mines[to_coords(index, size.1)] = true;
        }

        Ok(Self::from_mine_mask(mines))
    }

    pub fn difficulty(&self) -> Difficulty {
        Difficulty {
            rows: self.rows(),
            cols: self.cols(),
            mines: self.count,
        }
    }

    pub fn validate_index(&self, index: CellIndex) -> Result<CellIndex> {
        if index < self.total_cells() {
            Ok(index)
        } else {
            Err(GameError::InvalidIndex)
        }
    }

    pub fn size(&self) -> GridSize {
        self.mines.dim()
    }

    pub fn rows(&self) -> usize {
        self.mines.dim().0
    }

    pub fn cols(&self) -> usize {
        self.mines.dim().1
    }

    pub fn total_cells(&self) -> usize {
        self.mines.len()
    }

    pub fn safe_count(&self) -> usize {
        self.total_cells() - self.count
    }

    pub fn mine_count(&self) -> usize {
        self.count
    }

    pub fn iter_neighbors(&self, index: CellIndex) -> NeighborIter {
        NeighborIter::new(index, self.size())
    }

    /// Live count of mined 8-neighbors; always reflects the current mask.
    pub fn adjacent_mines(&self, index: CellIndex) -> u8 {
        self.iter_neighbors(index)
            .filter(|&pos| self[pos])
            .count()
            .try_into()
            .unwrap()
    }

    pub fn mine_indices(&self) -> Vec<CellIndex> {
        (0..self.total_cells()).filter(|&pos| self[pos]).collect()
    }

    /// Moves a mine between cells, keeping the total count intact.
    pub(crate) fn move_mine(&mut self, from: CellIndex, to: CellIndex) {
        debug_assert!(self[from] && !self[to]);
        let cols = self.cols();
        self.mines[to_coords(from, cols)] = false;
        self.mines[to_coords(to, cols)] = true;
    }
}

impl Index<CellIndex> for Minefield {
    type Output = bool;

    fn index(&self, index: CellIndex) -> &Self::Output {
        &self.mines[to_coords(index, self.cols())]
    }
}

/// Outcome of toggling a flag
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FlagOutcome {
    NoChange,
    MarkChanged,
}

impl FlagOutcome {
    /// Whether this outcome could have caused an update to the game
    pub const fn has_update(self) -> bool {
        match self {
            Self::NoChange => false,
            Self::MarkChanged => true,
        }
    }
}

/// Outcome of opening a cell
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum OpenOutcome {
    NoChange,
    Safe,
    Explode,
    Win,
}

impl OpenOutcome {
    /// Whether this outcome could have caused an update to the game
    pub const fn has_update(self) -> bool {
        use OpenOutcome::*;
        match self {
            NoChange => false,
            Safe => true,
            Explode => true,
            Win => true,
        }
    }

    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Explode | Self::Win)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn difficulty_rejects_bad_configurations() {
        assert_eq!(Difficulty::new(0, 9, 1), Err(GameError::InvalidDimensions));
        assert_eq!(Difficulty::new(9, 0, 1), Err(GameError::InvalidDimensions));
        assert_eq!(Difficulty::new(3, 3, 0), Err(GameError::MineCountOutOfRange));
        assert_eq!(Difficulty::new(3, 3, 9), Err(GameError::MineCountOutOfRange));
        assert_eq!(Difficulty::new(3, 3, 10), Err(GameError::MineCountOutOfRange));
        assert!(Difficulty::new(3, 3, 8).is_ok());
    }

    #[test]
    fn difficulty_presets_match_the_classic_boards() {
        let easy = Difficulty::easy();
        assert_eq!((easy.rows, easy.cols, easy.mines), (9, 9, 10));

        let medium = Difficulty::medium();
        assert_eq!((medium.rows, medium.cols, medium.mines), (16, 16, 40));

        let hard = Difficulty::hard();
        assert_eq!((hard.rows, hard.cols, hard.mines), (16, 30, 99));
        assert_eq!(hard.total_cells(), 480);
    }

    #[test]
    fn minefield_from_indices_counts_and_validates() {
        let field = Minefield::from_mine_indices((3, 3), &[0, 4]).unwrap();
        assert_eq!(field.mine_count(), 2);
        assert_eq!(field.safe_count(), 7);
        assert!(field[0] && field[4]);
        assert_eq!(field.mine_indices(), vec![0, 4]);

        assert_eq!(
            Minefield::from_mine_indices((3, 3), &[9]),
            Err(GameError::InvalidIndex)
        );
    }

    #[test]
    fn adjacent_mines_counts_the_live_mask() {
        // mines in the top-left corner and center of a 3x3 board
        let field = Minefield::from_mine_indices((3, 3), &[0, 4]).unwrap();
        assert_eq!(field.adjacent_mines(1), 2);
        assert_eq!(field.adjacent_mines(8), 1);
        assert_eq!(field.adjacent_mines(2), 1);

        for index in 0..field.total_cells() {
            let expected = field
                .iter_neighbors(index)
                .filter(|&pos| field[pos])
                .count();
            assert_eq!(usize::from(field.adjacent_mines(index)), expected);
        }
    }

    #[test]
    fn move_mine_preserves_the_count() {
        let mut field = Minefield::from_mine_indices((3, 3), &[0]).unwrap();
        field.move_mine(0, 8);
        assert_eq!(field.mine_count(), 1);
        assert!(!field[0]);
        assert!(field[8]);
    }

    #[test]
    fn validate_index_bounds() {
        let field = Minefield::from_mine_indices((2, 2), &[0]).unwrap();
        assert_eq!(field.validate_index(3), Ok(3));
        assert_eq!(field.validate_index(4), Err(GameError::InvalidIndex));
    }
}
