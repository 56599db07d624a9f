use crate::error::{PredictionError, Result};
use crate::mdps::mdp::Mdp;
use crate::{Continous, Discrete};
use rand::distributions::WeightedIndex;
use rand::prelude::*;
use std::rc::Rc;

/// A fixed policy: the single capability is picking an action in a state.
/// Deterministic policies ignore the rng.
pub trait Policy {
    fn action(&self, rng: &mut StdRng, s: Discrete) -> Result<Discrete>;
}

/// Deterministic policy backed by a state-indexed table.
pub struct TablePolicy {
    table: Vec<Discrete>,
}

impl TablePolicy {
    pub fn new(table: Vec<Discrete>) -> Self {
        Self { table }
    }
}

impl Policy for TablePolicy {
    fn action(&self, _rng: &mut StdRng, s: Discrete) -> Result<Discrete> {
        self.table
            .get(s as usize)
            .copied()
            .ok_or(PredictionError::UndefinedPolicy(s))
    }
}

/// Stochastic policy: per state, a categorical distribution over actions.
pub struct StochasticTablePolicy {
    choices: Vec<Vec<(Discrete, Continous)>>,
}

impl StochasticTablePolicy {
    pub fn new(choices: Vec<Vec<(Discrete, Continous)>>) -> Self {
        Self { choices }
    }
}

impl Policy for StochasticTablePolicy {
    fn action(&self, rng: &mut StdRng, s: Discrete) -> Result<Discrete> {
        let choices = self
            .choices
            .get(s as usize)
            .filter(|cs| !cs.is_empty())
            .ok_or(PredictionError::UndefinedPolicy(s))?;

        let dist = WeightedIndex::new(choices.iter().map(|&(_, p)| p))
            .map_err(|_| PredictionError::UndefinedPolicy(s))?;
        Ok(choices[dist.sample(rng)].0)
    }
}

/// Uniformly random over the actions legal in the current state.
pub struct RandomPolicy {
    mdp: Rc<dyn Mdp>,
}

impl RandomPolicy {
    pub fn new(mdp: Rc<dyn Mdp>) -> Self {
        Self { mdp }
    }
}

impl Policy for RandomPolicy {
    fn action(&self, rng: &mut StdRng, s: Discrete) -> Result<Discrete> {
        self.mdp
            .actions(s)
            .into_iter()
            .choose(rng)
            .ok_or(PredictionError::UndefinedPolicy(s))
    }
}
