use super::{check_episode_count, check_step_size, Evaluator, DEFAULT_STEP_CAP};
use crate::error::Result;
use crate::mdps::mdp::Mdp;
use crate::mdps::policy::Policy;
use crate::mdps::simulator::{Episode, EpisodeSimulator};
use crate::mdps::value_function::ValueFunction;
use crate::{Continous, Discrete};
use rand::prelude::*;
use std::rc::Rc;
use tracing::debug;

/// TD(0) prediction - Sutton & Barto 2018, ch. 6.
///
/// One-step bootstrapped updates, applied online, so later episodes see
/// the effect of earlier ones. Episodes that hit the step cap are
/// truncated: the per-transition updates already applied stand.
pub struct TdEvaluator {
    mdp: Rc<dyn Mdp>,
    simulator: EpisodeSimulator,
    alpha: Continous,
    rng: StdRng,
}

impl std::fmt::Debug for TdEvaluator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TdEvaluator")
            .field("alpha", &self.alpha)
            .finish_non_exhaustive()
    }
}

impl TdEvaluator {
    pub fn new(mdp: Rc<dyn Mdp>, alpha: Continous) -> Result<Self> {
        Self::with_options(mdp, alpha, 0, DEFAULT_STEP_CAP, None)
    }

    pub fn with_options(
        mdp: Rc<dyn Mdp>,
        alpha: Continous,
        start_state: Discrete,
        step_cap: usize,
        seed: Option<u64>,
    ) -> Result<Self> {
        check_step_size(alpha)?;

        let simulator = EpisodeSimulator::new(Rc::clone(&mdp), start_state, step_cap);
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Ok(Self {
            mdp,
            simulator,
            alpha,
            rng,
        })
    }

    fn fold(&self, ep: &Episode, v: &mut ValueFunction) {
        let gamma = self.mdp.gamma();
        for step in &ep.steps {
            let bootstrap = if self.mdp.is_terminal(step.next_s) {
                0.
            } else {
                v.get(step.next_s)
            };
            let delta = step.r + gamma * bootstrap - v.get(step.s);
            v.apply(step.s, self.alpha * delta);
        }
    }
}

impl Evaluator for TdEvaluator {
    fn evaluate(&mut self, policy: &dyn Policy, n_episodes: usize) -> Result<ValueFunction> {
        check_episode_count(n_episodes)?;

        let mut v = ValueFunction::new(self.mdp.n_s());
        for _ in 0..n_episodes {
            let ep = self.simulator.episode(policy, &mut self.rng)?;
            self.fold(&ep, &mut v);
        }

        debug!(n_episodes, alpha = self.alpha, "td done");
        Ok(v)
    }
}
