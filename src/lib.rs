pub mod format;
pub mod stopwatch;

pub use format::format_elapsed;
pub use stopwatch::{
    ControlHints, PrimaryLabel, StopwatchController, StopwatchSnapshot, StopwatchState,
    StopwatchStatus,
};
