pub mod evaluators;
pub mod mdp;
pub mod policy;
pub mod simulator;
pub mod value_function;
