pub mod goal;
pub mod measurement;

pub use goal::Goal;
pub use measurement::WeightSample;
