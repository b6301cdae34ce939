pub mod admission;
pub mod events;
pub mod orchestrator;
pub mod session;

pub use admission::{Admission, RejectReason};
pub use events::QueueEvent;
pub use orchestrator::{QueueOptions, QueueSnapshot, ScanQueue};
pub use session::{ScanSession, SessionRegistry};
