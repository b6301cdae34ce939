pub mod engine;
pub mod liveness;
pub mod matcher;

pub use engine::{ReconEngine, ReconOptions};
pub use liveness::{discover_live_hosts, filter_live, LiveHost};
