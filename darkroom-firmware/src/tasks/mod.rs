//! Embassy async tasks
//!
//! Each task runs independently and communicates via channels/signals.

pub mod exposure;
pub mod lamp;
pub mod readout;

pub use exposure::exposure_task;
pub use lamp::{lamp_task, LampFwConfig};
pub use readout::readout_task;
