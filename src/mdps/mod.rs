pub mod bellman;
pub mod solvers;

use crate::{Action, Utility};
use thiserror::Error;

/// Tunables shared by both solvers, threaded through construction rather than
/// held as ambient globals.
#[derive(Debug, Clone, PartialEq)]
pub struct SolverConfig {
    /// Bellman discount factor, strictly inside (0, 1).
    pub discount: f64,
    /// Stopping tolerance; the sweep loop exits when the largest per-cell
    /// change drops below `threshold * (1 - discount) / discount`.
    pub convergence_threshold: f64,
    /// Bounded evaluation sweeps per policy-iteration pass.
    pub evaluation_depth: usize,
    /// Optional cap on sweeps (outer iterations for policy iteration);
    /// exceeding it aborts the solve instead of looping unboundedly.
    pub max_sweeps: Option<usize>,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            discount: 0.99,
            convergence_threshold: 1e-3,
            evaluation_depth: 4,
            max_sweeps: None,
        }
    }
}

impl SolverConfig {
    pub fn validate(&self) -> Result<(), SolveError> {
        if !(self.discount > 0.0 && self.discount < 1.0) {
            return Err(SolveError::InvalidDiscount(self.discount));
        }
        if self.convergence_threshold <= 0.0 {
            return Err(SolveError::InvalidThreshold(self.convergence_threshold));
        }
        if self.evaluation_depth == 0 {
            return Err(SolveError::InvalidEvaluationDepth);
        }
        Ok(())
    }

    /// Contraction-mapping stopping bound; finite only for discount in (0, 1).
    pub fn stopping_bound(&self) -> f64 {
        self.convergence_threshold * (1.0 - self.discount) / self.discount
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum SolveError {
    #[error("discount must lie strictly within (0, 1), got {0}")]
    InvalidDiscount(f64),
    #[error("convergence threshold must be positive, got {0}")]
    InvalidThreshold(f64),
    #[error("evaluation depth must be at least 1")]
    InvalidEvaluationDepth,
    #[error("no convergence within {0} sweeps")]
    SweepLimit(usize),
}

/// Markov Decision Process solver - Sutton & Barto 2018.
pub trait MdpSolver<T> {
    fn v_star(&self, r: usize, c: usize) -> Utility;

    /// One-step-lookahead action value at `(r, c)`, `None` where no action
    /// applies (obstacles and terminal cells).
    fn q_star(&self, r: usize, c: usize, a: Action) -> Option<Utility>;

    fn pi_star(&self, r: usize, c: usize) -> Option<Action>;

    fn exec(&mut self) -> Result<(T, usize), SolveError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0.0)]
    #[case(1.0)]
    #[case(-0.5)]
    #[case(1.5)]
    fn discount_outside_open_unit_interval_is_rejected(#[case] discount: f64) {
        let cfg = SolverConfig {
            discount,
            ..Default::default()
        };
        assert_eq!(cfg.validate(), Err(SolveError::InvalidDiscount(discount)));
    }

    #[rstest]
    #[case(0.0)]
    #[case(-1e-3)]
    fn non_positive_threshold_is_rejected(#[case] threshold: f64) {
        let cfg = SolverConfig {
            convergence_threshold: threshold,
            ..Default::default()
        };
        assert_eq!(cfg.validate(), Err(SolveError::InvalidThreshold(threshold)));
    }

    #[test]
    fn zero_evaluation_depth_is_rejected() {
        let cfg = SolverConfig {
            evaluation_depth: 0,
            ..Default::default()
        };
        assert_eq!(cfg.validate(), Err(SolveError::InvalidEvaluationDepth));
    }

    #[test]
    fn defaults_validate_and_scale_the_bound() {
        let cfg = SolverConfig::default();
        assert!(cfg.validate().is_ok());
        // 1e-3 * (1 - 0.99) / 0.99
        assert!((cfg.stopping_bound() - 1e-3 * 0.01 / 0.99).abs() < 1e-15);
    }
}
