use crate::error::{PredictionError, Result};
use crate::{Continous, Discrete};
use itertools::Itertools;
use std::collections::{HashMap, HashSet};

const PROBABILITY_TOLERANCE: Continous = 1e-6;

/// Markov Decision Process - Sutton & Barto 2018.
pub trait Mdp {
    fn n_s(&self) -> usize;

    fn n_a(&self) -> usize;

    fn gamma(&self) -> Continous;

    /// Actions with a transition distribution defined in `s`, ascending.
    fn actions(&self, s: Discrete) -> Vec<Discrete>;

    fn transition(&self, s: Discrete, a: Discrete) -> &[Transition];

    fn is_terminal(&self, s: Discrete) -> bool;
}

#[derive(Debug, Clone)]
pub struct Transition {
    pub next_state: Discrete,
    pub probability: Continous,
    pub reward: Continous,
}

pub type Transitions = HashMap<(Discrete, Discrete), Vec<Transition>>;

/// Explicit-table MDP over states `0..n_s` and actions `0..n_a`.
///
/// Construction validates the whole table up front: gamma in [0, 1],
/// every key and next_state inside the state/action space, every
/// non-terminal state with at least one action, and every distribution
/// non-negative and summing to 1.
#[derive(Debug)]
pub struct TabularMdp {
    n_s: usize,
    n_a: usize,
    gamma: Continous,
    transitions: Transitions,
    terminal: HashSet<Discrete>,
}

impl TabularMdp {
    pub fn new(
        n_s: usize,
        n_a: usize,
        gamma: Continous,
        transitions: Transitions,
        terminal: impl IntoIterator<Item = Discrete>,
    ) -> Result<Self> {
        if !(0. ..=1.).contains(&gamma) {
            return Err(PredictionError::InvalidDiscount(gamma));
        }

        let terminal = terminal.into_iter().collect::<HashSet<_>>();

        for (&(s, a), ts) in transitions.iter().sorted_by_key(|(&k, _)| k) {
            if !(0..n_s as Discrete).contains(&s) || !(0..n_a as Discrete).contains(&a) {
                return Err(PredictionError::OutOfRangeKey { s, a });
            }
            for t in ts {
                if !(0..n_s as Discrete).contains(&t.next_state) {
                    return Err(PredictionError::OutOfRangeNextState {
                        s,
                        a,
                        next_state: t.next_state,
                    });
                }
                if t.probability < 0. {
                    return Err(PredictionError::NegativeProbability {
                        s,
                        a,
                        p: t.probability,
                    });
                }
            }

            let sum = ts.iter().map(|t| t.probability).sum::<Continous>();
            if (sum - 1.).abs() > PROBABILITY_TOLERANCE {
                return Err(PredictionError::MalformedDistribution { s, a, sum });
            }
        }

        for s in 0..n_s as Discrete {
            if terminal.contains(&s) {
                continue;
            }
            if !transitions.keys().any(|&(ks, _)| ks == s) {
                return Err(PredictionError::DeadEndState(s));
            }
        }

        Ok(Self {
            n_s,
            n_a,
            gamma,
            transitions,
            terminal,
        })
    }
}

impl Mdp for TabularMdp {
    fn n_s(&self) -> usize {
        self.n_s
    }

    fn n_a(&self) -> usize {
        self.n_a
    }

    fn gamma(&self) -> Continous {
        self.gamma
    }

    fn actions(&self, s: Discrete) -> Vec<Discrete> {
        self.transitions
            .keys()
            .filter(|&&(ks, _)| ks == s)
            .map(|&(_, a)| a)
            .sorted()
            .collect()
    }

    fn transition(&self, s: Discrete, a: Discrete) -> &[Transition] {
        self.transitions
            .get(&(s, a))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    fn is_terminal(&self, s: Discrete) -> bool {
        self.terminal.contains(&s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chain_transitions() -> Transitions {
        Transitions::from([
            (
                (0, 0),
                vec![Transition {
                    next_state: 1,
                    probability: 1.,
                    reward: 1.,
                }],
            ),
            (
                (1, 0),
                vec![Transition {
                    next_state: 2,
                    probability: 1.,
                    reward: 1.,
                }],
            ),
        ])
    }

    #[test]
    fn valid_chain_constructs() {
        let mdp = TabularMdp::new(3, 1, 1., chain_transitions(), [2]).unwrap();

        assert_eq!(mdp.n_s(), 3);
        assert_eq!(mdp.actions(0), vec![0]);
        assert_eq!(mdp.actions(2), Vec::<Discrete>::new());
        assert!(mdp.is_terminal(2));
        assert!(!mdp.is_terminal(0));
        assert_eq!(mdp.transition(0, 0).len(), 1);
        assert!(mdp.transition(2, 0).is_empty());
    }

    #[test]
    fn rejects_discount_out_of_range() {
        let err = TabularMdp::new(3, 1, 1.5, chain_transitions(), [2]).unwrap_err();

        assert_eq!(err, PredictionError::InvalidDiscount(1.5));
    }

    #[test]
    fn rejects_non_terminal_dead_end() {
        // state 2 not marked terminal and owns no action
        let err = TabularMdp::new(3, 1, 1., chain_transitions(), []).unwrap_err();

        assert_eq!(err, PredictionError::DeadEndState(2));
    }

    #[test]
    fn rejects_next_state_outside_state_space() {
        // Would otherwise only blow up mid-evaluation when the value
        // table is indexed with the phantom state.
        let transitions = Transitions::from([(
            (0, 0),
            vec![Transition {
                next_state: 5,
                probability: 1.,
                reward: 0.,
            }],
        )]);

        let err = TabularMdp::new(2, 1, 1., transitions, [1]).unwrap_err();

        assert_eq!(
            err,
            PredictionError::OutOfRangeNextState {
                s: 0,
                a: 0,
                next_state: 5
            }
        );
    }

    #[test]
    fn rejects_transition_key_outside_state_space() {
        let mut transitions = chain_transitions();
        transitions.insert(
            (5, 0),
            vec![Transition {
                next_state: 1,
                probability: 1.,
                reward: 0.,
            }],
        );

        let err = TabularMdp::new(3, 1, 1., transitions, [2]).unwrap_err();

        assert_eq!(err, PredictionError::OutOfRangeKey { s: 5, a: 0 });
    }

    #[test]
    fn rejects_negative_probability_even_when_sum_is_one() {
        let mut transitions = chain_transitions();
        transitions.insert(
            (1, 0),
            vec![
                Transition {
                    next_state: 2,
                    probability: 1.5,
                    reward: 1.,
                },
                Transition {
                    next_state: 0,
                    probability: -0.5,
                    reward: 1.,
                },
            ],
        );

        let err = TabularMdp::new(3, 1, 1., transitions, [2]).unwrap_err();

        assert_eq!(
            err,
            PredictionError::NegativeProbability {
                s: 1,
                a: 0,
                p: -0.5
            }
        );
    }

    #[test]
    fn rejects_distribution_not_summing_to_one() {
        let mut transitions = chain_transitions();
        transitions.get_mut(&(0, 0)).unwrap()[0].probability = 0.7;

        let err = TabularMdp::new(3, 1, 1., transitions, [2]).unwrap_err();

        assert_eq!(
            err,
            PredictionError::MalformedDistribution {
                s: 0,
                a: 0,
                sum: 0.7
            }
        );
    }
}
