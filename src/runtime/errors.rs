//! Runtime errors

use thiserror::Error;

use crate::runtime::value::Value;
use crate::std::promise::PromiseId;

/// Script completion result
pub type JsResult<T> = Result<T, Exception>;

/// Host-side result
pub type RealmResult<T> = Result<T, RealmError>;

/// Abrupt completion visible to scripts.
///
/// Once a promise cell exists, an exception is never propagated past the
/// promise operation that caught it; it becomes a rejection reason instead.
#[derive(Debug, Clone, Error)]
pub enum Exception {
    #[error("Uncaught {0}")]
    Throw(Value),

    #[error("TypeError: {0}")]
    TypeError(String),
}

impl Exception {
    /// Raise an arbitrary value
    pub fn throw(value: impl Into<Value>) -> Self {
        Exception::Throw(value.into())
    }

    /// Raise a `TypeError`
    pub fn type_error(message: impl Into<String>) -> Self {
        Exception::TypeError(message.into())
    }

    /// The value a `catch` clause or rejection handler observes.
    pub fn into_value(self) -> Value {
        match self {
            Exception::Throw(value) => value,
            Exception::TypeError(message) => error_object("TypeError", &message),
        }
    }
}

impl From<RealmError> for Exception {
    fn from(err: RealmError) -> Self {
        Exception::TypeError(err.to_string())
    }
}

/// Build a plain error-shaped object `{ name, message }`.
pub fn error_object(
    name: &str,
    message: &str,
) -> Value {
    Value::object([("name", Value::string(name)), ("message", Value::string(message))])
}

/// Host-level faults. These never reach script code as values.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RealmError {
    #[error("Unknown promise handle {0}")]
    UnknownPromise(PromiseId),

    #[error("Promise arena exhausted after {0} cells")]
    ArenaExhausted(usize),

    #[error("{0} is not a registered native function")]
    UnknownNative(String),

    #[error("Job budget of {budget} exhausted with {remaining} job(s) still queued")]
    JobBudgetExhausted {
        /// Configured per-checkpoint budget
        budget: usize,
        /// Jobs left in the queue
        remaining: usize,
    },
}
