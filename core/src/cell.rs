use serde::{Deserialize, Serialize};

/// Player-visible state of a single board cell.
///
/// Mine membership is not stored here; it lives in the [`Minefield`] mask so
/// adjacency counts can always be served live from it.
///
/// [`Minefield`]: crate::Minefield
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Cell {
    Closed,
    Flagged,
    /// Opened, with the adjacent-mine count fixed at open time.
    Open(u8),
}

impl Cell {
    pub const fn is_open(self) -> bool {
        matches!(self, Self::Open(_))
    }

    // whether the cell is visually closed
    pub const fn is_closed(self) -> bool {
        matches!(self, Self::Closed | Self::Flagged)
    }
}

impl Default for Cell {
    fn default() -> Self {
        Self::Closed
    }
}
