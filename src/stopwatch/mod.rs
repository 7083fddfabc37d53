pub mod controller;
pub mod state;

pub use controller::{StopwatchController, StopwatchSnapshot};
pub use state::{ControlHints, PrimaryLabel, StopwatchState, StopwatchStatus};
