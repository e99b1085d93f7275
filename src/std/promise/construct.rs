//! Construction surface: `new Promise(executor)`, `Promise.resolve`,
//! `Promise.reject` and `Promise.withResolvers`.

use tracing::trace;

use super::adoption::ResolvingFunctions;
use super::cell::PromiseId;
use crate::runtime::errors::{Exception, JsResult, RealmResult};
use crate::runtime::realm::Realm;
use crate::runtime::value::{ObjectRef, Value};

/// Result of [`Realm::with_resolvers`].
#[derive(Debug, Clone)]
pub struct Resolvers {
    /// The new pending promise
    pub promise: PromiseId,
    /// Its resolve function
    pub resolve: ObjectRef,
    /// Its reject function
    pub reject: ObjectRef,
}

impl Resolvers {
    /// `{ promise, resolve, reject }` as a plain object
    pub fn into_value(self) -> Value {
        Value::object([
            ("promise", Value::Promise(self.promise)),
            ("resolve", Value::Object(self.resolve)),
            ("reject", Value::Object(self.reject)),
        ])
    }
}

impl Realm {
    /// `new Promise(executor)`.
    ///
    /// The executor runs synchronously with the new cell's resolving
    /// functions. If it throws, the cell rejects with the thrown value, unless
    /// it already resolved. A non-callable executor is a synchronous
    /// `TypeError`: no cell is created.
    pub fn new_promise(
        &mut self,
        executor: &Value,
    ) -> JsResult<PromiseId> {
        let Some(executor) = executor.as_callable() else {
            return Err(Exception::type_error(format!(
                "Promise resolver {} is not a function",
                describe(executor)
            )));
        };

        let id = self.new_pending()?;
        let ResolvingFunctions { resolve, reject } = self.create_resolving_functions(id);
        let args = [Value::Object(resolve), Value::Object(reject.clone())];
        if let Err(exception) = self.call_object(&executor, &Value::Undefined, &args) {
            trace!(promise = %id, "executor threw");
            self.call_object(&reject, &Value::Undefined, &[exception.into_value()])?;
        }
        Ok(id)
    }

    /// `Promise.resolve(value)`.
    ///
    /// A promise of this realm is returned as is; a promise handle of another
    /// realm is `UnknownPromise`. Anything else goes through a new cell's
    /// `resolve`, so thenables are adopted rather than wrapped.
    pub fn promise_resolve(
        &mut self,
        value: Value,
    ) -> RealmResult<PromiseId> {
        if let Value::Promise(id) = value {
            self.promises.get(id)?;
            return Ok(id);
        }
        let id = self.new_pending()?;
        self.resolve_promise(id, value)?;
        Ok(id)
    }

    /// `Promise.reject(reason)`. The reason is stored verbatim.
    pub fn promise_reject(
        &mut self,
        reason: Value,
    ) -> RealmResult<PromiseId> {
        let id = self.new_pending()?;
        self.reject_promise(id, reason)?;
        Ok(id)
    }

    /// `Promise.withResolvers()`.
    pub fn with_resolvers(&mut self) -> RealmResult<Resolvers> {
        let promise = self.new_pending()?;
        let ResolvingFunctions { resolve, reject } = self.create_resolving_functions(promise);
        Ok(Resolvers {
            promise,
            resolve,
            reject,
        })
    }
}

/// Short description of a value for error messages.
pub(crate) fn describe(value: &Value) -> String {
    match value {
        Value::String(s) => format!("\"{}\"", s),
        Value::Object(obj) if !obj.is_callable() => "#<Object>".to_string(),
        Value::Array(_) => "#<Array>".to_string(),
        other => other.to_string(),
    }
}
