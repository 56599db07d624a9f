use crate::{Continous, Discrete};
use serde::Serialize;

/// Per-state value estimates plus update diagnostics.
///
/// Owned exclusively by the evaluator that builds it; one fresh instance
/// per `evaluate` call. States never updated keep their initial value 0.
#[derive(Debug, Clone, Serialize)]
pub struct ValueFunction {
    v: Vec<Continous>,
    counts: Vec<u64>,
    discarded_episodes: u64,
}

impl ValueFunction {
    pub fn new(n_s: usize) -> Self {
        Self {
            v: vec![0.; n_s],
            counts: vec![0; n_s],
            discarded_episodes: 0,
        }
    }

    pub fn get(&self, s: Discrete) -> Continous {
        self.v[s as usize]
    }

    /// Incremental sample mean: V(s) <- V(s) + (g - V(s)) / count(s).
    pub fn add_sample(&mut self, s: Discrete, g: Continous) {
        let i = s as usize;
        self.counts[i] += 1;
        self.v[i] += (g - self.v[i]) / self.counts[i] as Continous;
    }

    /// Additive update: V(s) <- V(s) + delta.
    pub fn apply(&mut self, s: Discrete, delta: Continous) {
        let i = s as usize;
        self.counts[i] += 1;
        self.v[i] += delta;
    }

    pub fn count(&self, s: Discrete) -> u64 {
        self.counts[s as usize]
    }

    pub fn values(&self) -> &[Continous] {
        &self.v
    }

    pub fn record_discarded(&mut self) {
        self.discarded_episodes += 1;
    }

    pub fn discarded_episodes(&self) -> u64 {
        self.discarded_episodes
    }
}
