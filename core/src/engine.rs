use chrono::prelude::*;
use ndarray::Array2;
use rand::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::{HashSet, VecDeque};

use crate::*;

/// Valid transitions:
/// - NotStarted -> InProgress
/// - NotStarted -> Won | Lost (the first reveal can end the game)
/// - InProgress -> Won | Lost
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameState {
    /// Initial state
    NotStarted,
    /// Game started
    InProgress,
    /// Game ended and player won
    Won,
    /// Game ended and player lost
    Lost,
}

impl GameState {
    /// Indicates the game has not started yet
    pub const fn is_initial(self) -> bool {
        matches!(self, Self::NotStarted)
    }

    /// Indicates the game has ended and no moves can be made anymore
    pub const fn is_final(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::NotStarted
    }
}

/// Result of a reveal action: the merged outcome plus every cell whose
/// visual state changed (opened, flood-filled, or disclosed mines).
#[derive(Clone, Debug, PartialEq)]
pub struct OpenReport {
    pub outcome: OpenOutcome,
    pub changed: Vec<CellIndex>,
}

impl OpenReport {
    fn no_change() -> Self {
        Self {
            outcome: OpenOutcome::NoChange,
            changed: Vec::new(),
        }
    }
}

/// Result of a flag action.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct FlagReport {
    pub outcome: FlagOutcome,
    pub flagged: bool,
    pub mines_left: isize,
}

/// Represents a game from the first board build to win or loss.
///
/// A new game or a difficulty change is a fresh `Game` value replacing the
/// old one, so resets can never be observed half-done.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Game {
    minefield: Minefield,
    grid: Array2<Cell>,
    open_count: usize,
    flag_count: usize,
    state: GameState,
    seed: u64,
    triggered_mine: Option<CellIndex>,
    started_at: Option<DateTime<Utc>>,
    ended_at: Option<DateTime<Utc>>,
}

impl Game {
    /// Wraps an existing minefield; `seed` drives first-reveal mine relocation.
    pub fn new(minefield: Minefield, seed: u64) -> Game {
        let size = minefield.size();
        Self {
            minefield,
            grid: Array2::default(size),
            open_count: 0,
            flag_count: 0,
            state: Default::default(),
            seed,
            triggered_mine: None,
            started_at: None,
            ended_at: None,
        }
    }

    /// Starts a fresh session for a difficulty.
    pub fn with_difficulty(difficulty: &Difficulty, seed: u64) -> Game {
        Self::new(ClusteredGenerator::new(seed).generate(difficulty), seed)
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn ended(&self) -> bool {
        self.state.is_final()
    }

    pub fn difficulty(&self) -> Difficulty {
        self.minefield.difficulty()
    }

    pub fn size(&self) -> GridSize {
        self.minefield.size()
    }

    pub fn rows(&self) -> usize {
        self.minefield.rows()
    }

    pub fn cols(&self) -> usize {
        self.minefield.cols()
    }

    pub fn total_mines(&self) -> usize {
        self.minefield.mine_count()
    }

    pub fn cell_at(&self, index: CellIndex) -> Cell {
        self.grid_at(index)
    }

    /// Whether the cell hides a mine; meant for post-game disclosure.
    pub fn has_mine_at(&self, index: CellIndex) -> bool {
        self.minefield[index]
    }

    /// The mine that ended the game, if it was lost.
    pub fn triggered_mine(&self) -> Option<CellIndex> {
        self.triggered_mine
    }

    /// How many seconds have passed since the game started, 0 if it hasn't started
    pub fn elapsed_secs(&self) -> u32 {
        if let Some(started_at) = self.started_at {
            (self.ended_at.unwrap_or_else(Utc::now) - started_at)
                .num_seconds()
                .max(0) as u32
        } else {
            0
        }
    }

    /// How many mines have not been flagged yet; negative when over-flagged.
    pub fn mines_left(&self) -> isize {
        (self.minefield.mine_count() as isize) - (self.flag_count as isize)
    }

    /// Toggle the flag on a closed cell. Opened cells and finished games
    /// ignore the action.
    pub fn toggle_flag(&mut self, index: CellIndex) -> Result<FlagReport> {
        use FlagOutcome::*;

        let index = self.minefield.validate_index(index)?;

        let outcome = if self.state.is_final() {
            NoChange
        } else {
            match self.grid_at(index) {
                Cell::Closed => {
                    self.set_grid(index, Cell::Flagged);
                    self.flag_count += 1;
                    MarkChanged
                }
                Cell::Flagged => {
                    self.set_grid(index, Cell::Closed);
                    self.flag_count -= 1;
                    MarkChanged
                }
                Cell::Open(_) => NoChange,
            }
        };

        Ok(FlagReport {
            outcome,
            flagged: self.grid_at(index) == Cell::Flagged,
            mines_left: self.mines_left(),
        })
    }

    /// Reveal a cell. Flagged and already-open cells are skipped; the first
    /// reveal of a session clears its neighborhood of mines beforehand.
    pub fn open(&mut self, index: CellIndex) -> Result<OpenReport> {
        use OpenOutcome::*;

        let index = self.minefield.validate_index(index)?;

        if self.state.is_final() {
            return Ok(OpenReport::no_change());
        }

        if self.state.is_initial() {
            self.secure_first_reveal(index);
            self.mark_started();
        }

        let mut changed = Vec::new();
        let outcome = match self.grid_at(index) {
            Cell::Flagged | Cell::Open(_) => NoChange,
            Cell::Closed => self.open_cell(index, &mut changed),
        };

        if outcome.is_terminal() {
            // terminal either way: the presentation layer shows every mine
            changed.extend(self.minefield.mine_indices());
        }

        Ok(OpenReport { outcome, changed })
    }

    /// Helper to open a single cell and flood-fill from it if it is a zero.
    fn open_cell(&mut self, index: CellIndex, changed: &mut Vec<CellIndex>) -> OpenOutcome {
        use OpenOutcome::*;

        if self.minefield[index] {
            self.triggered_mine = Some(index);
            self.mark_ended(false);
            return Explode;
        }

        let count = self.minefield.adjacent_mines(index);
        self.set_grid(index, Cell::Open(count));
        self.open_count += 1;
        changed.push(index);
        log::debug!("opened cell {}, adjacent mines: {}", index, count);

        if count == 0 {
            let mut visited = HashSet::from([index]);
            let mut to_visit: VecDeque<_> = self
                .minefield
                .iter_neighbors(index)
                .filter(|&pos| self.grid_at(pos) == Cell::Closed)
                .collect();

            while let Some(visit_index) = to_visit.pop_front() {
                if !visited.insert(visit_index) {
                    continue;
                }

                // flagged cells stop the cascade, opened ones are already done
                if self.grid_at(visit_index) != Cell::Closed {
                    continue;
                }

                let visit_count = self.minefield.adjacent_mines(visit_index);
                self.set_grid(visit_index, Cell::Open(visit_count));
                self.open_count += 1;
                changed.push(visit_index);
                log::trace!(
                    "flood opened cell {}, adjacent mines: {}",
                    visit_index,
                    visit_count
                );

                if visit_count == 0 {
                    to_visit.extend(
                        self.minefield
                            .iter_neighbors(visit_index)
                            .filter(|&pos| self.grid_at(pos) == Cell::Closed)
                            .filter(|pos| !visited.contains(pos)),
                    );
                }
            }
        }

        if self.open_count == self.minefield.safe_count() {
            self.mark_ended(true);
            Win
        } else {
            Safe
        }
    }

    /// Clears the clicked cell and its neighbors of mines before the very
    /// first reveal, relocating them to random cells outside that zone.
    fn secure_first_reveal(&mut self, index: CellIndex) {
        let mut safe_zone: Vec<CellIndex> = self.minefield.iter_neighbors(index).collect();
        safe_zone.push(index);

        let mines_to_move: Vec<CellIndex> = safe_zone
            .iter()
            .copied()
            .filter(|&pos| self.minefield[pos])
            .collect();
        if mines_to_move.is_empty() {
            return;
        }

        let mut pool: Vec<CellIndex> = (0..self.minefield.total_cells())
            .filter(|&pos| !self.minefield[pos] && !safe_zone.contains(&pos))
            .collect();

        let mut rng = SmallRng::seed_from_u64(self.seed);
        for mine_index in mines_to_move {
            if pool.is_empty() {
                // board too dense to clear the zone; the mine stays put
                log::warn!(
                    "no room to relocate mine {} away from the first reveal",
                    mine_index
                );
                continue;
            }
            let target = pool.swap_remove(rng.gen_range(0..pool.len()));
            self.minefield.move_mine(mine_index, target);
            log::debug!("relocated mine {} -> {}", mine_index, target);
        }
    }

    /// Moves the initial state to in-progress, recording the start time.
    fn mark_started(&mut self) {
        if self.state.is_initial() {
            self.state = GameState::InProgress;
            self.started_at = Some(Utc::now());
        }
    }

    fn mark_ended(&mut self, won: bool) {
        if self.state.is_final() {
            return;
        }
        self.state = if won { GameState::Won } else { GameState::Lost };
        self.ended_at = Some(Utc::now());
    }

    fn grid_at(&self, index: CellIndex) -> Cell {
        self.grid[to_coords(index, self.minefield.cols())]
    }

    fn set_grid(&mut self, index: CellIndex, cell: Cell) {
        let coords = to_coords(index, self.minefield.cols());
        self.grid[coords] = cell;
    }
}
