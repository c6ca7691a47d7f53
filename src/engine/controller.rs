use std::time::Instant;

/// States of the convergence state machine. `Converged` and
/// `BudgetExhausted` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControllerState {
    /// The run should execute another iteration.
    Running,
    /// Maximum centroid displacement reached the tolerance: a fixed point.
    Converged,
    /// The iteration budget (or the wall-clock deadline) ran out first.
    BudgetExhausted,
}

/// Decides, once per iteration barrier, whether the run continues.
///
/// Convergence is checked before the budget, so an iteration that both
/// converges and exhausts the budget reports a true fixed point. The
/// deadline is only ever inspected here, never mid-partition.
#[derive(Debug, Clone)]
pub struct ConvergenceController {
    tolerance: f64,
    max_iterations: usize,
    deadline: Option<Instant>,
    state: ControllerState,
}

impl ConvergenceController {
    pub fn new(tolerance: f64, max_iterations: usize, deadline: Option<Instant>) -> Self {
        Self {
            tolerance,
            max_iterations,
            deadline,
            state: ControllerState::Running,
        }
    }

    pub fn state(&self) -> ControllerState {
        self.state
    }

    /// Feed the controller the outcome of one completed iteration and get
    /// the next state. Terminal states are absorbing.
    pub fn observe(&mut self, completed_iterations: usize, max_displacement: f64) -> ControllerState {
        if self.state != ControllerState::Running {
            return self.state;
        }
        if max_displacement <= self.tolerance {
            self.state = ControllerState::Converged;
        } else if completed_iterations >= self.max_iterations {
            self.state = ControllerState::BudgetExhausted;
        } else if self.deadline.is_some_and(|d| Instant::now() >= d) {
            self.state = ControllerState::BudgetExhausted;
        }
        self.state
    }
}
