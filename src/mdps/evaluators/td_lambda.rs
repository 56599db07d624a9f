use super::{check_episode_count, check_step_size, check_trace_decay, Evaluator, DEFAULT_STEP_CAP};
use crate::error::Result;
use crate::mdps::mdp::Mdp;
use crate::mdps::policy::Policy;
use crate::mdps::simulator::{Episode, EpisodeSimulator};
use crate::mdps::value_function::ValueFunction;
use crate::{Continous, Discrete};
use rand::prelude::*;
use std::rc::Rc;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TraceRule {
    Accumulating,
    Replacing,
}

/// TD(lambda) prediction with eligibility traces - Sutton & Barto 2018,
/// ch. 12.
///
/// lambda = 0 reproduces TD(0) transition for transition; lambda = 1
/// approximates Monte Carlo. Traces reset at every episode start.
/// Cap-hit episodes truncate, as TD(0).
pub struct TdLambdaEvaluator {
    mdp: Rc<dyn Mdp>,
    simulator: EpisodeSimulator,
    alpha: Continous,
    lambda: Continous,
    trace_rule: TraceRule,
    rng: StdRng,
}

impl std::fmt::Debug for TdLambdaEvaluator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TdLambdaEvaluator")
            .field("alpha", &self.alpha)
            .field("lambda", &self.lambda)
            .field("trace_rule", &self.trace_rule)
            .finish_non_exhaustive()
    }
}

impl TdLambdaEvaluator {
    pub fn new(mdp: Rc<dyn Mdp>, alpha: Continous, lambda: Continous) -> Result<Self> {
        Self::with_options(
            mdp,
            alpha,
            lambda,
            TraceRule::Accumulating,
            0,
            DEFAULT_STEP_CAP,
            None,
        )
    }

    #[allow(clippy::too_many_arguments)]
    pub fn with_options(
        mdp: Rc<dyn Mdp>,
        alpha: Continous,
        lambda: Continous,
        trace_rule: TraceRule,
        start_state: Discrete,
        step_cap: usize,
        seed: Option<u64>,
    ) -> Result<Self> {
        check_step_size(alpha)?;
        check_trace_decay(lambda)?;

        let simulator = EpisodeSimulator::new(Rc::clone(&mdp), start_state, step_cap);
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Ok(Self {
            mdp,
            simulator,
            alpha,
            lambda,
            trace_rule,
            rng,
        })
    }

    fn fold(&self, ep: &Episode, v: &mut ValueFunction) {
        let gamma = self.mdp.gamma();
        let e = &mut vec![0.; self.mdp.n_s()];

        for step in &ep.steps {
            match self.trace_rule {
                TraceRule::Accumulating => e[step.s as usize] += 1.,
                TraceRule::Replacing => e[step.s as usize] = 1.,
            }

            let bootstrap = if self.mdp.is_terminal(step.next_s) {
                0.
            } else {
                v.get(step.next_s)
            };
            let delta = step.r + gamma * bootstrap - v.get(step.s);

            for x in 0..e.len() {
                if e[x] != 0. {
                    v.apply(x as Discrete, self.alpha * delta * e[x]);
                }
                e[x] *= gamma * self.lambda;
            }
        }
    }
}

impl Evaluator for TdLambdaEvaluator {
    fn evaluate(&mut self, policy: &dyn Policy, n_episodes: usize) -> Result<ValueFunction> {
        check_episode_count(n_episodes)?;

        let mut v = ValueFunction::new(self.mdp.n_s());
        for _ in 0..n_episodes {
            let ep = self.simulator.episode(policy, &mut self.rng)?;
            self.fold(&ep, &mut v);
        }

        debug!(
            n_episodes,
            alpha = self.alpha,
            lambda = self.lambda,
            "td lambda done"
        );
        Ok(v)
    }
}
