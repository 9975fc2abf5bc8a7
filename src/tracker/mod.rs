mod gate;
mod state;
mod tracker;

pub use gate::Gate;
pub use state::SatelliteState;
pub use tracker::{Thresholds, Tracker};
