//! Per-user enrollment progress and the mutual exclusion around its
//! read-modify-write cycle.

pub mod guard;
pub mod queue;
pub mod service;

pub use guard::{GuardKey, UpdateGuard, UpdatePermit};
pub use queue::{UserWriteQueue, UserWriteTurn};
pub use service::ProgressService;
