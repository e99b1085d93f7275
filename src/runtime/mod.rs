//! Runtime system
//!
//! Values, the realm that owns all promise state, the job queue and the
//! native function registry.

pub mod errors;
pub mod extfunc;
pub mod realm;
pub mod scheduler;
pub mod value;
