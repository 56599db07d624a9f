use crate::{Continous, Discrete};
use thiserror::Error;

/// Errors surfaced by MDP construction, simulation and evaluation.
#[derive(Error, Debug, PartialEq)]
pub enum PredictionError {
    #[error("episode count must be at least 1")]
    InvalidEpisodeCount,

    #[error("step size must be in (0, 1], got {0}")]
    InvalidStepSize(Continous),

    #[error("trace decay must be in [0, 1], got {0}")]
    InvalidTraceDecay(Continous),

    #[error("discount factor must be in [0, 1], got {0}")]
    InvalidDiscount(Continous),

    #[error("state {0} is not terminal but has no legal action")]
    DeadEndState(Discrete),

    #[error("transition probabilities for state {s}, action {a} sum to {sum}")]
    MalformedDistribution {
        s: Discrete,
        a: Discrete,
        sum: Continous,
    },

    #[error("transition probability {p} for state {s}, action {a} is negative")]
    NegativeProbability {
        s: Discrete,
        a: Discrete,
        p: Continous,
    },

    #[error("transition key ({s}, {a}) is outside the state/action space")]
    OutOfRangeKey { s: Discrete, a: Discrete },

    #[error("transition for state {s}, action {a} targets state {next_state} outside the state space")]
    OutOfRangeNextState {
        s: Discrete,
        a: Discrete,
        next_state: Discrete,
    },

    #[error("policy chose action {a}, which is not legal in state {s}")]
    IllegalAction { s: Discrete, a: Discrete },

    #[error("policy defines no action for state {0}")]
    UndefinedPolicy(Discrete),
}

pub type Result<T> = std::result::Result<T, PredictionError>;
