use crate::grid::Grid;
use crate::mdps::bellman::{best_action, expected_utility, greedy_policy};
use crate::mdps::{MdpSolver, SolveError, SolverConfig};
use crate::{Action, PolicyTable, Utility, UtilityTable};
use std::rc::Rc;
use tracing::{debug, info};

/// Bellman optimality updates over a frozen snapshot of the previous sweep,
/// repeated until the largest per-cell change drops below
/// `threshold * (1 - discount) / discount`, then greedy policy extraction.
pub struct ValueIteration {
    grid: Rc<Grid>,
    config: SolverConfig,
    utilities: UtilityTable,
    policy: PolicyTable,
    change_history: Vec<f64>,
}

impl ValueIteration {
    pub fn new(grid: Rc<Grid>, config: SolverConfig) -> Self {
        let utilities = grid.initial_utilities();
        let policy = PolicyTable::new(grid.rows(), grid.cols());
        Self {
            grid,
            config,
            utilities,
            policy,
            change_history: Vec::new(),
        }
    }

    pub fn utilities(&self) -> &UtilityTable {
        &self.utilities
    }

    pub fn policy(&self) -> &PolicyTable {
        &self.policy
    }

    /// Per-sweep max change, for the convergence-plotting collaborator.
    pub fn change_history(&self) -> &[f64] {
        &self.change_history
    }
}

impl MdpSolver<f64> for ValueIteration {
    fn v_star(&self, r: usize, c: usize) -> Utility {
        self.utilities.get(r, c)
    }

    fn q_star(&self, r: usize, c: usize, a: Action) -> Option<Utility> {
        if self.grid.cell(r, c).is_normal() {
            Some(expected_utility(
                &self.grid,
                &self.utilities,
                r,
                c,
                a,
                self.config.discount,
            ))
        } else {
            None
        }
    }

    fn pi_star(&self, r: usize, c: usize) -> Option<Action> {
        self.policy.get(r, c)
    }

    /// Returns the final sweep's max change and the sweep count.
    fn exec(&mut self) -> Result<(f64, usize), SolveError> {
        self.config.validate()?;

        self.utilities = self.grid.initial_utilities();
        self.policy = PolicyTable::new(self.grid.rows(), self.grid.cols());
        self.change_history.clear();

        if self.grid.normal_cells().next().is_none() {
            return Ok((0.0, 0));
        }

        let bound = self.config.stopping_bound();
        let mut iterations = 0;
        let mut max_change;
        loop {
            iterations += 1;
            if let Some(cap) = self.config.max_sweeps {
                if iterations > cap {
                    return Err(SolveError::SweepLimit(cap));
                }
            }

            // Synchronous sweep: nextU is built entirely from the frozen
            // previous table, never read-after-write.
            let mut next = self.utilities.clone();
            max_change = 0.0f64;
            for (r, c) in self.grid.normal_cells() {
                let (_, best) =
                    best_action(&self.grid, &self.utilities, r, c, self.config.discount);
                max_change = max_change.max((best - self.utilities.get(r, c)).abs());
                next.set(r, c, best);
            }
            self.utilities = next;
            self.change_history.push(max_change);
            debug!(iteration = iterations, max_change, "value iteration sweep");

            if max_change < bound {
                break;
            }
        }

        self.policy = greedy_policy(&self.grid, &self.utilities, self.config.discount);
        info!(iterations, "value iteration converged");
        Ok((max_change, iterations))
    }
}
