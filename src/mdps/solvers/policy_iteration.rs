use crate::grid::Grid;
use crate::mdps::bellman::{best_action, expected_utility};
use crate::mdps::{MdpSolver, SolveError, SolverConfig};
use crate::{Action, PolicyTable, Utility, UtilityTable};
use rand::prelude::*;
use std::rc::Rc;
use tracing::{debug, info};

/// Alternates bounded policy evaluation (`evaluation_depth` synchronous
/// sweeps under the fixed policy) with greedy improvement, until an
/// improvement sweep changes no cell.
pub struct PolicyIteration {
    grid: Rc<Grid>,
    config: SolverConfig,
    utilities: UtilityTable,
    policy: PolicyTable,
    seed: Option<u64>,
}

impl PolicyIteration {
    pub fn new(grid: Rc<Grid>, config: SolverConfig) -> Self {
        Self::build(grid, config, None)
    }

    /// Deterministic variant: the random initial policy is drawn from a
    /// seeded generator.
    pub fn with_seed(grid: Rc<Grid>, config: SolverConfig, seed: u64) -> Self {
        Self::build(grid, config, Some(seed))
    }

    fn build(grid: Rc<Grid>, config: SolverConfig, seed: Option<u64>) -> Self {
        let utilities = grid.initial_utilities();
        let policy = PolicyTable::new(grid.rows(), grid.cols());
        Self {
            grid,
            config,
            utilities,
            policy,
            seed,
        }
    }

    pub fn utilities(&self) -> &UtilityTable {
        &self.utilities
    }

    pub fn policy(&self) -> &PolicyTable {
        &self.policy
    }

    fn random_policy(&self, rng: &mut StdRng) -> PolicyTable {
        let mut policy = PolicyTable::new(self.grid.rows(), self.grid.cols());
        for (r, c) in self.grid.normal_cells() {
            policy.set(r, c, Some(Action::from_index(rng.gen_range(0..4))));
        }
        policy
    }

    /// Truncated policy evaluation: exactly `evaluation_depth` synchronous
    /// Bellman sweeps under the current fixed policy.
    fn evaluate_policy(&mut self) {
        for _ in 0..self.config.evaluation_depth {
            let mut next = self.utilities.clone();
            for (r, c) in self.grid.normal_cells() {
                if let Some(a) = self.policy.get(r, c) {
                    next.set(
                        r,
                        c,
                        expected_utility(&self.grid, &self.utilities, r, c, a, self.config.discount),
                    );
                }
            }
            self.utilities = next;
        }
    }

    /// Greedy improvement over the frozen utility estimate. Switches only on
    /// strict improvement so ties keep the incumbent action and the outer
    /// loop terminates. Returns whether any cell changed.
    fn improve_policy(&mut self) -> bool {
        let mut changed = false;
        for (r, c) in self.grid.normal_cells() {
            let current = match self.policy.get(r, c) {
                Some(a) => a,
                None => continue,
            };
            let (best, best_q) = best_action(&self.grid, &self.utilities, r, c, self.config.discount);
            let current_q =
                expected_utility(&self.grid, &self.utilities, r, c, current, self.config.discount);
            if best_q > current_q {
                self.policy.set(r, c, Some(best));
                changed = true;
            }
        }
        changed
    }
}

impl MdpSolver<bool> for PolicyIteration {
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

    /// Returns policy stability (always true on success) and the outer
    /// iteration count, the terminal check pass included.
    fn exec(&mut self) -> Result<(bool, usize), SolveError> {
        self.config.validate()?;

        self.utilities = self.grid.initial_utilities();
        if self.grid.normal_cells().next().is_none() {
            self.policy = PolicyTable::new(self.grid.rows(), self.grid.cols());
            return Ok((true, 0));
        }

        let mut rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        self.policy = self.random_policy(&mut rng);

        let mut iterations = 0;
        loop {
            iterations += 1;
            if let Some(cap) = self.config.max_sweeps {
                if iterations > cap {
                    return Err(SolveError::SweepLimit(cap));
                }
            }

            self.evaluate_policy();
            let changed = self.improve_policy();
            debug!(iteration = iterations, changed, "policy iteration pass");
            if !changed {
                break;
            }
        }

        info!(iterations, "policy iteration reached a stable policy");
        Ok((true, iterations))
    }
}
