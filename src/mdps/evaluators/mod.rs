pub mod mc;
pub mod td;
pub mod td_lambda;

use crate::error::{PredictionError, Result};
use crate::mdps::policy::Policy;
use crate::mdps::value_function::ValueFunction;
use crate::Continous;

/// Default bound on episode length, independent of the MDP's own
/// termination logic.
pub const DEFAULT_STEP_CAP: usize = 10_000;

/// Model-free prediction of V under a fixed policy.
pub trait Evaluator {
    fn evaluate(&mut self, policy: &dyn Policy, n_episodes: usize) -> Result<ValueFunction>;
}

pub(crate) fn check_episode_count(n_episodes: usize) -> Result<()> {
    if n_episodes < 1 {
        return Err(PredictionError::InvalidEpisodeCount);
    }
    Ok(())
}

pub(crate) fn check_step_size(alpha: Continous) -> Result<()> {
    if !(alpha > 0. && alpha <= 1.) {
        return Err(PredictionError::InvalidStepSize(alpha));
    }
    Ok(())
}

pub(crate) fn check_trace_decay(lambda: Continous) -> Result<()> {
    if !(0. ..=1.).contains(&lambda) {
        return Err(PredictionError::InvalidTraceDecay(lambda));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0.)]
    #[case(-0.1)]
    #[case(1.01)]
    fn rejects_step_size(#[case] alpha: Continous) {
        assert_eq!(
            check_step_size(alpha).unwrap_err(),
            PredictionError::InvalidStepSize(alpha)
        );
    }

    #[rstest]
    #[case(-0.1)]
    #[case(1.1)]
    fn rejects_trace_decay(#[case] lambda: Continous) {
        assert_eq!(
            check_trace_decay(lambda).unwrap_err(),
            PredictionError::InvalidTraceDecay(lambda)
        );
    }

    #[test]
    fn rejects_zero_episodes() {
        assert_eq!(
            check_episode_count(0).unwrap_err(),
            PredictionError::InvalidEpisodeCount
        );
        assert!(check_episode_count(1).is_ok());
    }
}
