extern crate itertools;
extern crate rand;
extern crate serde_json;

pub mod grid;
pub mod mdps;
pub mod render;

pub type Utility = f64;
pub type Reward = f64;

/// The four grid actions in their fixed enumeration order.
///
/// The cyclic ordering is load-bearing: the stochastic transition model puts
/// 0.8 on the intended action and 0.1 on each of its two mod-4 neighbors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Down,
    Left,
    Up,
    Right,
}

impl Action {
    pub const ALL: [Action; 4] = [Action::Down, Action::Left, Action::Up, Action::Right];

    pub fn delta(self) -> (isize, isize) {
        match self {
            Action::Down => (1, 0),
            Action::Left => (0, -1),
            Action::Up => (-1, 0),
            Action::Right => (0, 1),
        }
    }

    pub fn index(self) -> usize {
        match self {
            Action::Down => 0,
            Action::Left => 1,
            Action::Up => 2,
            Action::Right => 3,
        }
    }

    pub fn from_index(i: usize) -> Action {
        Action::ALL[i % 4]
    }

    /// `(a - 1) mod 4`: the direction the agent slips to on its left.
    pub fn veer_left(self) -> Action {
        Action::from_index(self.index() + 3)
    }

    /// `(a + 1) mod 4`: the direction the agent slips to on its right.
    pub fn veer_right(self) -> Action {
        Action::from_index(self.index() + 1)
    }
}

/// Per-cell utilities, replaced wholesale each sweep (Jacobi-style update).
/// Obstacle entries stay at 0.0 and are never read as destination values.
#[derive(Debug, Clone, PartialEq)]
pub struct UtilityTable {
    rows: usize,
    cols: usize,
    values: Vec<Utility>,
}

impl UtilityTable {
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            values: vec![0.0; rows * cols],
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn get(&self, r: usize, c: usize) -> Utility {
        self.values[r * self.cols + c]
    }

    pub fn set(&mut self, r: usize, c: usize, v: Utility) {
        self.values[r * self.cols + c] = v;
    }
}

/// One action per normal cell; obstacles and terminal cells carry no action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PolicyTable {
    rows: usize,
    cols: usize,
    actions: Vec<Option<Action>>,
}

impl PolicyTable {
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            actions: vec![None; rows * cols],
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn get(&self, r: usize, c: usize) -> Option<Action> {
        self.actions[r * self.cols + c]
    }

    pub fn set(&mut self, r: usize, c: usize, a: Option<Action>) {
        self.actions[r * self.cols + c] = a;
    }

    pub fn is_action_free(&self) -> bool {
        self.actions.iter().all(|a| a.is_none())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn action_order_is_down_left_up_right() {
        assert_eq!(
            Action::ALL,
            [Action::Down, Action::Left, Action::Up, Action::Right]
        );
        for (i, a) in Action::ALL.iter().enumerate() {
            assert_eq!(a.index(), i);
            assert_eq!(Action::from_index(i), *a);
        }
    }

    #[test]
    fn veer_neighbors_wrap_mod_4() {
        assert_eq!(Action::Down.veer_left(), Action::Right);
        assert_eq!(Action::Down.veer_right(), Action::Left);
        assert_eq!(Action::Up.veer_left(), Action::Left);
        assert_eq!(Action::Up.veer_right(), Action::Right);
        assert_eq!(Action::Left.veer_left(), Action::Down);
        assert_eq!(Action::Right.veer_right(), Action::Down);
    }

    #[test]
    fn veering_from_the_intended_action_is_an_involution_pair() {
        for a in Action::ALL {
            assert_eq!(a.veer_left().veer_right(), a);
            assert_eq!(a.veer_right().veer_left(), a);
        }
    }
}
