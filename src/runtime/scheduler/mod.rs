//! Job scheduling
//!
//! Promise reactions and thenable adoption never run inline. They are pushed
//! onto the realm's [`JobQueue`] and run when the host calls
//! [`Realm::run_jobs`](crate::runtime::realm::Realm::run_jobs).

pub mod job;
pub mod queue;

#[cfg(test)]
mod tests;

pub use job::{HostJob, Job};
pub use queue::{JobQueue, QueueStats};
