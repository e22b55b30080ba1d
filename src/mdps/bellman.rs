//! The hot inner computation both solvers share: expected discounted utility
//! of one action from one cell, under the fixed stochastic transition model
//! (0.8 intended direction, 0.1 each mod-4 neighbor). Pure functions of a
//! frozen utility snapshot; nothing here mutates `U`.

use crate::grid::Grid;
use crate::{Action, PolicyTable, Utility, UtilityTable};

/// Utility of the state reached by performing `action` from `(r, c)`.
/// Off-grid or obstacle destinations bounce the agent back in place.
pub fn next_utility(grid: &Grid, u: &UtilityTable, r: usize, c: usize, action: Action) -> Utility {
    match grid.destination(r, c, action) {
        Some((nr, nc)) => u.get(nr, nc),
        None => u.get(r, c),
    }
}

/// `reward + discount * (0.1 * left-veer + 0.8 * intended + 0.1 * right-veer)`.
pub fn expected_utility(
    grid: &Grid,
    u: &UtilityTable,
    r: usize,
    c: usize,
    action: Action,
    discount: f64,
) -> Utility {
    grid.reward(r, c)
        + discount
            * (0.1 * next_utility(grid, u, r, c, action.veer_left())
                + 0.8 * next_utility(grid, u, r, c, action)
                + 0.1 * next_utility(grid, u, r, c, action.veer_right()))
}

/// Argmax over the fixed action order; strict `>` keeps the first-encountered
/// action on ties, so the result is deterministic.
pub fn best_action(
    grid: &Grid,
    u: &UtilityTable,
    r: usize,
    c: usize,
    discount: f64,
) -> (Action, Utility) {
    let mut best = Action::Down;
    let mut best_u = f64::NEG_INFINITY;
    for a in Action::ALL {
        let q = expected_utility(grid, u, r, c, a, discount);
        if q > best_u {
            best = a;
            best_u = q;
        }
    }
    (best, best_u)
}

/// Greedy policy for a utility snapshot; obstacles and terminals stay
/// action-free.
pub fn greedy_policy(grid: &Grid, u: &UtilityTable, discount: f64) -> PolicyTable {
    let mut policy = PolicyTable::new(grid.rows(), grid.cols());
    for (r, c) in grid.normal_cells() {
        let (a, _) = best_action(grid, u, r, c, discount);
        policy.set(r, c, Some(a));
    }
    policy
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_eq::assert_float_eq;

    fn corridor() -> Grid {
        Grid::from_map(&[vec![0.0, 1.0]], -0.04).unwrap()
    }

    #[test]
    fn next_utility_bounces_off_every_edge() {
        let g = corridor();
        let mut u = g.initial_utilities();
        u.set(0, 0, 0.5);

        // Up, Down and Left all leave the 1x2 corridor from (0, 0).
        assert_float_eq!(next_utility(&g, &u, 0, 0, Action::Up), 0.5, abs <= 0.0);
        assert_float_eq!(next_utility(&g, &u, 0, 0, Action::Down), 0.5, abs <= 0.0);
        assert_float_eq!(next_utility(&g, &u, 0, 0, Action::Left), 0.5, abs <= 0.0);
        assert_float_eq!(next_utility(&g, &u, 0, 0, Action::Right), 1.0, abs <= 0.0);
    }

    #[test]
    fn next_utility_bounces_off_obstacles() {
        let g = Grid::from_map(&[vec![0.0, 99.0]], -0.04).unwrap();
        let mut u = g.initial_utilities();
        u.set(0, 0, 0.25);
        assert_float_eq!(next_utility(&g, &u, 0, 0, Action::Right), 0.25, abs <= 0.0);
    }

    #[test]
    fn expected_utility_mixes_veers_at_one_tenth_each() {
        let g = corridor();
        let u = g.initial_utilities(); // (0.0, 1.0)

        // Right: 0.8 into the terminal, both veers bounce back to 0.0.
        let q = expected_utility(&g, &u, 0, 0, Action::Right, 0.9);
        assert_float_eq!(q, -0.04 + 0.9 * 0.8, abs <= 1e-12);

        // Up: only the right-hand veer reaches the terminal.
        let q = expected_utility(&g, &u, 0, 0, Action::Up, 0.9);
        assert_float_eq!(q, -0.04 + 0.9 * 0.1, abs <= 1e-12);
    }

    #[test]
    fn best_action_breaks_ties_by_fixed_order() {
        // Fully isolated cell: every action bounces, all four values tie.
        let g = Grid::from_map(&[vec![0.0]], -0.04).unwrap();
        let u = g.initial_utilities();
        let (a, q) = best_action(&g, &u, 0, 0, 0.9);
        assert_eq!(a, Action::Down);
        assert_float_eq!(q, -0.04, abs <= 1e-12);
    }

    #[test]
    fn greedy_policy_leaves_terminals_action_free() {
        let g = corridor();
        let u = g.initial_utilities();
        let p = greedy_policy(&g, &u, 0.9);
        assert_eq!(p.get(0, 0), Some(Action::Right));
        assert_eq!(p.get(0, 1), None);
    }
}
