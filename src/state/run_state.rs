/// Run state definitions for the crawl loop
///
/// A run starts in `Running` and ends in exactly one terminal state.
use std::fmt;

/// Represents where a crawl run is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RunState {
    /// The loop is still pulling work from the frontier
    #[default]
    Running,

    // ===== Terminal States =====
    /// The enqueued set reached the page budget
    BudgetExhausted,

    /// No pending URLs remain
    FrontierEmpty,

    /// Cancellation arrived during the request delay
    Interrupted,
}

impl RunState {
    /// Returns true once the run can make no further progress
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Running)
    }

    /// Returns true for the two ways a run finishes on its own
    pub fn is_complete(&self) -> bool {
        matches!(self, Self::BudgetExhausted | Self::FrontierEmpty)
    }

    /// Short machine-friendly label
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Running => "running",
            Self::BudgetExhausted => "budget_exhausted",
            Self::FrontierEmpty => "frontier_empty",
            Self::Interrupted => "interrupted",
        }
    }
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
