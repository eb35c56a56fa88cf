//! Infrastructure layer: sandbox paths and the time source.
//!
//! Everything here touches the environment (the `/host` mount, the system
//! clock) so the layers above can stay deterministic.

pub mod clock;
pub mod paths;

pub use clock::{Clock, ManualClock, SystemClock};
pub use paths::{expand_tilde, get_data_dir};
