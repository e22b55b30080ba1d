use crate::{Action, Reward, UtilityTable};
use itertools::iproduct;
use thiserror::Error;

/// Map sentinel marking an impassable cell, as written in map files.
pub const OBSTACLE_SENTINEL: f64 = 99.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Cell {
    /// Passable cell swept by the solvers.
    Normal { reward: Reward },
    /// Absorbing cell: utility pinned to its reward, never swept, no action.
    Terminal { reward: Reward },
    /// Impassable cell, excluded from all computation.
    Obstacle,
}

impl Cell {
    pub fn is_obstacle(self) -> bool {
        matches!(self, Cell::Obstacle)
    }

    pub fn is_normal(self) -> bool {
        matches!(self, Cell::Normal { .. })
    }
}

#[derive(Debug, Error)]
pub enum GridError {
    #[error("map has no cells")]
    Empty,
    #[error("map is jagged: row {row} has {got} columns, expected {expected}")]
    Jagged {
        row: usize,
        expected: usize,
        got: usize,
    },
    #[error("failed to parse map: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Immutable rectangular grid world. Dimensions and cell kinds are fixed for
/// the lifetime of a solve.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    rows: usize,
    cols: usize,
    cells: Vec<Cell>,
}

impl Grid {
    /// Builds a grid from a 2-D array of map values: `99` marks an obstacle,
    /// `0` a plain cell taking `whitespace_reward`, any other value a
    /// terminal cell with that reward.
    pub fn from_map(map: &[Vec<f64>], whitespace_reward: Reward) -> Result<Self, GridError> {
        if map.is_empty() || map[0].is_empty() {
            return Err(GridError::Empty);
        }

        let rows = map.len();
        let cols = map[0].len();
        let mut cells = Vec::with_capacity(rows * cols);
        for (r, row) in map.iter().enumerate() {
            if row.len() != cols {
                return Err(GridError::Jagged {
                    row: r,
                    expected: cols,
                    got: row.len(),
                });
            }
            for &v in row {
                cells.push(if v == OBSTACLE_SENTINEL {
                    Cell::Obstacle
                } else if v == 0.0 {
                    Cell::Normal {
                        reward: whitespace_reward,
                    }
                } else {
                    Cell::Terminal { reward: v }
                });
            }
        }

        Ok(Self { rows, cols, cells })
    }

    /// Parses the JSON map format of the external loader: a 2-D number array.
    pub fn from_json(text: &str, whitespace_reward: Reward) -> Result<Self, GridError> {
        let map = serde_json::from_str::<Vec<Vec<f64>>>(text)?;
        Self::from_map(&map, whitespace_reward)
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn cell(&self, r: usize, c: usize) -> Cell {
        self.cells[r * self.cols + c]
    }

    pub fn reward(&self, r: usize, c: usize) -> Reward {
        match self.cell(r, c) {
            Cell::Normal { reward } | Cell::Terminal { reward } => reward,
            Cell::Obstacle => 0.0,
        }
    }

    /// All swept (normal) cells in row-major order.
    pub fn normal_cells(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        iproduct!(0..self.rows, 0..self.cols).filter(|&(r, c)| self.cell(r, c).is_normal())
    }

    /// Destination of `action` from `(r, c)`, or `None` when the move runs
    /// off-grid or into an obstacle and the agent bounces back in place.
    pub fn destination(&self, r: usize, c: usize, action: Action) -> Option<(usize, usize)> {
        let (dr, dc) = action.delta();
        let nr = r as isize + dr;
        let nc = c as isize + dc;
        if nr < 0 || nc < 0 || nr >= self.rows as isize || nc >= self.cols as isize {
            return None;
        }
        let (nr, nc) = (nr as usize, nc as usize);
        if self.cell(nr, nc).is_obstacle() {
            None
        } else {
            Some((nr, nc))
        }
    }

    /// Starting utility table: zero for normal cells, pinned reward for
    /// terminal cells, dead zero for obstacles.
    pub fn initial_utilities(&self) -> UtilityTable {
        let mut u = UtilityTable::new(self.rows, self.cols);
        for (r, c) in iproduct!(0..self.rows, 0..self.cols) {
            if let Cell::Terminal { reward } = self.cell(r, c) {
                u.set(r, c, reward);
            }
        }
        u
    }
}
