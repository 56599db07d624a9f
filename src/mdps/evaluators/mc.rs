use super::{check_episode_count, Evaluator, DEFAULT_STEP_CAP};
use crate::error::Result;
use crate::mdps::mdp::Mdp;
use crate::mdps::policy::Policy;
use crate::mdps::simulator::{Episode, EpisodeSimulator, EpisodeStep};
use crate::mdps::value_function::ValueFunction;
use crate::Discrete;
use rand::prelude::*;
use std::rc::Rc;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisitRule {
    FirstVisit,
    EveryVisit,
}

/// Monte Carlo prediction - Sutton & Barto 2018, ch. 5.
///
/// Averages full-episode returns per visited state. Episodes that hit
/// the step cap before reaching a terminal state carry no full return
/// and are discarded; the discard is counted on the result.
pub struct McEvaluator {
    mdp: Rc<dyn Mdp>,
    simulator: EpisodeSimulator,
    visit_rule: VisitRule,
    rng: StdRng,
}

impl McEvaluator {
    pub fn new(mdp: Rc<dyn Mdp>, visit_rule: VisitRule) -> Self {
        Self::with_options(mdp, visit_rule, 0, DEFAULT_STEP_CAP, None)
    }

    pub fn with_options(
        mdp: Rc<dyn Mdp>,
        visit_rule: VisitRule,
        start_state: Discrete,
        step_cap: usize,
        seed: Option<u64>,
    ) -> Self {
        let simulator = EpisodeSimulator::new(Rc::clone(&mdp), start_state, step_cap);
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            mdp,
            simulator,
            visit_rule,
            rng,
        }
    }

    fn fold(&self, ep: &Episode, v: &mut ValueFunction) {
        let gamma = self.mdp.gamma();
        let mut g = 0.;
        for t in (0..ep.steps.len()).rev() {
            let step = &ep.steps[t];
            g = gamma * g + step.r;
            if self.visit_rule == VisitRule::EveryVisit || is_first_visit(&ep.steps, t, step.s) {
                v.add_sample(step.s, g);
            }
        }
    }
}

impl Evaluator for McEvaluator {
    fn evaluate(&mut self, policy: &dyn Policy, n_episodes: usize) -> Result<ValueFunction> {
        check_episode_count(n_episodes)?;

        let mut v = ValueFunction::new(self.mdp.n_s());
        for k in 0..n_episodes {
            let ep = self.simulator.episode(policy, &mut self.rng)?;
            if !ep.terminated {
                debug!(episode = k, len = ep.steps.len(), "step cap hit, discarding");
                v.record_discarded();
                continue;
            }
            self.fold(&ep, &mut v);
        }

        debug!(n_episodes, discarded = v.discarded_episodes(), "mc done");
        Ok(v)
    }
}

fn is_first_visit(steps: &[EpisodeStep], t: usize, s: Discrete) -> bool {
    if t == 0 {
        return true;
    }

    !steps.iter().take(t).any(|x| x.s == s)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mdps::mdp::{TabularMdp, Transitions};
    use float_eq::*;

    fn step(s: Discrete, next_s: Discrete, r: f64) -> EpisodeStep {
        EpisodeStep { s, a: 0, r, next_s }
    }

    // States are never stepped through, only gamma and n_s are read.
    fn fold_only_mdp(n_s: usize, gamma: f64) -> Rc<dyn Mdp> {
        let terminal = 0..n_s as Discrete;
        Rc::new(TabularMdp::new(n_s, 1, gamma, Transitions::new(), terminal).unwrap())
    }

    fn toy_episodes() -> Vec<Episode> {
        vec![
            Episode {
                steps: vec![
                    step(1, 4, -2.),
                    step(4, 1, -1.),
                    step(1, 2, -3.),
                    step(2, 1, -1.),
                ],
                terminated: true,
            },
            Episode {
                steps: vec![step(1, 4, -0.)],
                terminated: true,
            },
            Episode {
                steps: vec![step(2, 4, -0.)],
                terminated: true,
            },
        ]
    }

    #[test]
    fn toy_example_with_first_visit() {
        let eval = McEvaluator::new(fold_only_mdp(6, 0.9), VisitRule::FirstVisit);
        let v = &mut ValueFunction::new(6);

        for ep in toy_episodes() {
            eval.fold(&ep, v);
        }

        assert_float_eq!(
            v.values(),
            vec![0., -6.059 / 2.0, -1. / 2.0, 0., -4.51, 0.].as_slice(),
            abs_all <= 1e-5
        );
    }

    #[test]
    fn toy_example_with_every_visit() {
        let eval = McEvaluator::new(fold_only_mdp(6, 0.9), VisitRule::EveryVisit);
        let v = &mut ValueFunction::new(6);

        for ep in toy_episodes() {
            eval.fold(&ep, v);
        }

        assert_float_eq!(
            v.values(),
            vec![0., (-6.059 + -3.9 + 0.) / 3.0, -1. / 2.0, 0., -4.51, 0.].as_slice(),
            abs_all <= 1e-5
        );
    }
}
