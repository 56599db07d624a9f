use crate::error::{PredictionError, Result};
use crate::mdps::mdp::{Mdp, Transition};
use crate::mdps::policy::Policy;
use crate::{Continous, Discrete};
use rand::distributions::WeightedIndex;
use rand::prelude::*;
use std::rc::Rc;

#[derive(Debug, Clone)]
pub struct EpisodeStep {
    pub s: Discrete,
    pub a: Discrete,
    pub r: Continous,
    pub next_s: Discrete,
}

/// One sampled trajectory. `terminated` is false when the step cap cut
/// the episode before a terminal state was reached.
#[derive(Debug, Clone)]
pub struct Episode {
    pub steps: Vec<EpisodeStep>,
    pub terminated: bool,
}

/// Steps an MDP under a policy, one full episode per call.
///
/// The step cap bounds every episode independently of the MDP's own
/// termination logic, so simulation always halts even for a looping
/// MDP/policy pair.
pub struct EpisodeSimulator {
    mdp: Rc<dyn Mdp>,
    start_state: Discrete,
    step_cap: usize,
}

impl EpisodeSimulator {
    pub fn new(mdp: Rc<dyn Mdp>, start_state: Discrete, step_cap: usize) -> Self {
        Self {
            mdp,
            start_state,
            step_cap,
        }
    }

    pub fn episode(&self, policy: &dyn Policy, rng: &mut StdRng) -> Result<Episode> {
        let mut steps = Vec::new();
        let mut s = self.start_state;

        while !self.mdp.is_terminal(s) && steps.len() < self.step_cap {
            let a = policy.action(rng, s)?;
            let ts = self.mdp.transition(s, a);
            if ts.is_empty() {
                return Err(PredictionError::IllegalAction { s, a });
            }

            let next = pick_next(rng, ts).ok_or_else(|| PredictionError::MalformedDistribution {
                s,
                a,
                sum: ts.iter().map(|t| t.probability).sum(),
            })?;
            steps.push(EpisodeStep {
                s,
                a,
                r: next.reward,
                next_s: next.next_state,
            });
            s = next.next_state;
        }

        Ok(Episode {
            steps,
            terminated: self.mdp.is_terminal(s),
        })
    }
}

fn pick_next<'a>(rng: &mut StdRng, ts: &'a [Transition]) -> Option<&'a Transition> {
    let dist = WeightedIndex::new(ts.iter().map(|t| t.probability)).ok()?;
    Some(&ts[dist.sample(rng)])
}
