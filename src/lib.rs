//! ECMAScript built-in standard library layer
//!
//! The core is the Promise subsystem: settlement cells, reaction queues,
//! thenable adoption, `then`/`catch`/`finally`, the combinators and the
//! construction surface. Handlers never run synchronously; they are delivered
//! through a FIFO job queue that the host drains with [`Realm::run_jobs`].
//!
//! # Example
//!
//! ```rust
//! use es_builtins::{Realm, Value};
//!
//! let mut realm = Realm::new();
//! let p = realm.promise_resolve(Value::from(1)).unwrap();
//! let doubled = Value::function("double", |_realm, _this, args| {
//!     Ok(Value::from(args[0].to_number().unwrap_or(0.0) * 2.0))
//! });
//! let q = realm.then(p, doubled, Value::Undefined).unwrap();
//!
//! realm.run_jobs().unwrap();
//! let settled = realm.promise_result(q).unwrap().unwrap();
//! assert_eq!(settled.value(), &Value::from(2));
//! ```

#![warn(rust_2018_idioms)]

// Public modules
pub mod runtime;
pub mod std;

// Utility modules
pub mod util;

// Re-exports
pub use runtime::errors::{Exception, JsResult, RealmError, RealmResult};
pub use runtime::realm::Realm;
pub use runtime::value::{ObjectRef, PropertyKey, Value};
pub use crate::std::promise::{PromiseId, PromiseState, Settled};
pub use util::config::RealmConfig;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = "es-builtins";
