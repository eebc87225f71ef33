use ndarray::Array2;
use rand::prelude::*;

use super::*;

/// Placement strategy that grows each new mine next to the safe frontier, so
/// mines tend to cluster instead of spreading uniformly. Falls back to
/// uniform placement when no frontier cell remains near saturation.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ClusteredGenerator {
    seed: u64,
}

impl ClusteredGenerator {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }
}

impl MinefieldGenerator for ClusteredGenerator {
    fn generate(self, difficulty: &Difficulty) -> Minefield {
        let total = difficulty.total_cells();
        let size = difficulty.size();
        let mut rng = SmallRng::seed_from_u64(self.seed);
        let mut mask = vec![false; total];

        let first = rng.gen_range(0..total);
        mask[first] = true;
        let mut placed = 1;

        while placed < difficulty.mines {
            // Safe cells that still border safe ground; new mines grow from here.
            let anchors: Vec<CellIndex> = (0..total)
                .filter(|&index| {
                    !mask[index] && NeighborIter::new(index, size).any(|pos| !mask[pos])
                })
                .collect();

            let target = if let Some(&anchor) = anchors.choose(&mut rng) {
                let frontier: Vec<CellIndex> = NeighborIter::new(anchor, size)
                    .filter(|&pos| !mask[pos])
                    .collect();
                *frontier.choose(&mut rng).expect("anchor has a free neighbor")
            } else {
                // Only isolated safe cells are left; place uniformly instead.
                let open: Vec<CellIndex> = (0..total).filter(|&index| !mask[index]).collect();
                *open
                    .choose(&mut rng)
                    .expect("difficulty leaves at least one free cell")
            };

            mask[target] = true;
            placed += 1;
        }

        debug_assert_eq!(placed, difficulty.mines);
        log::debug!(
            "placed {} mines on a {}x{} board",
            placed,
            difficulty.rows,
            difficulty.cols
        );

        let mines = Array2::from_shape_vec(size, mask).expect("mask length matches board size");
        Minefield::from_mine_mask(mines)
    }
}
