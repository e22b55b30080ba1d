//! Text rendering of utility and policy grids for human inspection. Owned by
//! the presentation side; the solvers never format anything.

use crate::grid::{Cell, Grid};
use crate::{Action, PolicyTable, UtilityTable};

pub fn action_name(a: Action) -> &'static str {
    match a {
        Action::Down => "Down",
        Action::Left => "Left",
        Action::Up => "Up",
        Action::Right => "Right",
    }
}

/// One fixed-width row per grid row, walls shown as `WALL`, terminals as
/// their reward value, plain cells as their action.
pub fn render_policy(grid: &Grid, policy: &PolicyTable) -> String {
    render_with(grid, |r, c| match grid.cell(r, c) {
        Cell::Obstacle => "WALL".to_string(),
        Cell::Terminal { reward } => format!("{reward:.2}"),
        Cell::Normal { .. } => match policy.get(r, c) {
            Some(a) => action_name(a).to_string(),
            None => "-".to_string(),
        },
    })
}

pub fn render_utilities(grid: &Grid, u: &UtilityTable) -> String {
    render_with(grid, |r, c| {
        if grid.cell(r, c).is_obstacle() {
            "WALL".to_string()
        } else {
            format!("{:.2}", u.get(r, c))
        }
    })
}

fn render_with(grid: &Grid, cell: impl Fn(usize, usize) -> String) -> String {
    let mut out = String::new();
    for r in 0..grid.rows() {
        out.push('|');
        for c in 0..grid.cols() {
            out.push_str(&format!(" {:<5} |", cell(r, c)));
        }
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid() -> Grid {
        Grid::from_map(&[vec![0.0, 99.0], vec![0.0, 1.0]], -0.04).unwrap()
    }

    #[test]
    fn policy_rows_are_fixed_width() {
        let g = grid();
        let mut p = PolicyTable::new(2, 2);
        p.set(0, 0, Some(Action::Down));
        p.set(1, 0, Some(Action::Right));
        assert_eq!(
            render_policy(&g, &p),
            "| Down  | WALL  |\n| Right | 1.00  |\n"
        );
    }

    #[test]
    fn unsolved_cells_render_as_a_dash() {
        let g = grid();
        let p = PolicyTable::new(2, 2);
        assert_eq!(render_policy(&g, &p), "| -     | WALL  |\n| -     | 1.00  |\n");
    }

    #[test]
    fn utilities_render_walls_as_wall() {
        let g = grid();
        let mut u = g.initial_utilities();
        u.set(1, 0, -0.4);
        assert_eq!(
            render_utilities(&g, &u),
            "| 0.00  | WALL  |\n| -0.40 | 1.00  |\n"
        );
    }
}
