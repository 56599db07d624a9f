pub mod error;
pub mod mdps;

pub use error::{PredictionError, Result};

pub type Discrete = i32;
pub type Continous = f64;
