use mdp_predict::mdps::evaluators::{
    mc::{McEvaluator, VisitRule},
    td::TdEvaluator,
    td_lambda::TdLambdaEvaluator,
    Evaluator,
};
use mdp_predict::mdps::mdp::{Mdp, TabularMdp, Transition, Transitions};
use mdp_predict::mdps::policy::{Policy, StochasticTablePolicy, TablePolicy};
use std::rc::Rc;
use tracing_subscriber::EnvFilter;

/// 4-state corridor: states 0..=2 walkable, 3 terminal. Action 0 walks
/// one step ahead with a chance of slipping back; action 1 runs two
/// steps ahead with a chance of falling back to the start.
fn corridor(gamma: f64) -> Result<TabularMdp, Box<dyn std::error::Error>> {
    let walk = |from: i32| {
        vec![
            Transition {
                next_state: from + 1,
                probability: 0.8,
                reward: -1.,
            },
            Transition {
                next_state: from,
                probability: 0.2,
                reward: -1.,
            },
        ]
    };
    let run = |to: i32| {
        vec![
            Transition {
                next_state: to.min(3),
                probability: 0.6,
                reward: -2.,
            },
            Transition {
                next_state: 0,
                probability: 0.4,
                reward: -2.,
            },
        ]
    };

    let transitions = Transitions::from([
        ((0, 0), walk(0)),
        ((1, 0), walk(1)),
        ((2, 0), walk(2)),
        ((0, 1), run(2)),
        ((1, 1), run(3)),
        ((2, 1), run(4)),
    ]);

    Ok(TabularMdp::new(4, 2, gamma, transitions, [3])?)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mdp = Rc::new(corridor(0.9)?) as Rc<dyn Mdp>;

    let walker = TablePolicy::new(vec![0, 0, 0, 0]);
    let runner = StochasticTablePolicy::new(vec![
        vec![(0, 0.5), (1, 0.5)],
        vec![(0, 0.5), (1, 0.5)],
        vec![(0, 0.5), (1, 0.5)],
        vec![],
    ]);
    let policies: [(&str, &dyn Policy); 2] = [("walker", &walker), ("runner", &runner)];

    let n_ep = 1000;
    for (name, policy) in policies {
        let mut mc = McEvaluator::new(Rc::clone(&mdp), VisitRule::FirstVisit);
        let mut td = TdEvaluator::new(Rc::clone(&mdp), 0.1)?;
        let mut tdl = TdLambdaEvaluator::new(Rc::clone(&mdp), 0.1, 0.5)?;

        println!("{name}/mc: {}", serde_json::to_string(&mc.evaluate(policy, n_ep)?)?);
        println!("{name}/td: {}", serde_json::to_string(&td.evaluate(policy, n_ep)?)?);
        println!(
            "{name}/td(0.5): {}",
            serde_json::to_string(&tdl.evaluate(policy, n_ep)?)?
        );
    }

    Ok(())
}
