//! `then`, `catch` and `finally`
//!
//! Every chaining call allocates a derived cell, registers one reaction
//! against the receiver and returns the derived cell immediately. Handlers
//! only ever run from the job queue.

use tracing::trace;

use super::cell::PromiseId;
use super::reaction::Reaction;
use crate::runtime::errors::{Exception, RealmResult};
use crate::runtime::realm::Realm;
use crate::runtime::value::{ObjectRef, Value};

/// Which side of a `finally` a wrapper function sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FinallySide {
    Fulfilled,
    Rejected,
}

impl Realm {
    /// `promise.then(on_fulfilled, on_rejected)`.
    ///
    /// Non-callable handlers are treated as absent.
    pub fn then(
        &mut self,
        promise: PromiseId,
        on_fulfilled: Value,
        on_rejected: Value,
    ) -> RealmResult<PromiseId> {
        self.promises.get(promise)?;
        let derived = self.new_pending()?;
        self.perform_then(
            promise,
            on_fulfilled.as_callable(),
            on_rejected.as_callable(),
            Some(derived),
        )?;
        Ok(derived)
    }

    /// Register a reaction feeding an already allocated `derived` cell, or
    /// nothing at all when `derived` is `None`.
    pub(crate) fn perform_then(
        &mut self,
        promise: PromiseId,
        on_fulfilled: Option<ObjectRef>,
        on_rejected: Option<ObjectRef>,
        derived: Option<PromiseId>,
    ) -> RealmResult<()> {
        trace!(source = %promise, ?derived, "then");
        self.register_reaction(promise, Reaction::new(on_fulfilled, on_rejected, derived))
    }

    /// `promise.catch(on_rejected)`, i.e. `then(undefined, on_rejected)`.
    pub fn catch(
        &mut self,
        promise: PromiseId,
        on_rejected: Value,
    ) -> RealmResult<PromiseId> {
        self.then(promise, Value::Undefined, on_rejected)
    }

    /// `promise.finally(on_finally)`.
    ///
    /// `on_finally` runs with no arguments on either disposition. The derived
    /// cell then takes the original disposition, unless `on_finally` throws or
    /// returns a thenable that rejects, in which case it rejects with that
    /// reason. A non-callable `on_finally` makes both sides pass-throughs.
    pub fn finally(
        &mut self,
        promise: PromiseId,
        on_finally: Value,
    ) -> RealmResult<PromiseId> {
        let Some(on_finally) = on_finally.as_callable() else {
            return self.then(promise, on_finally.clone(), on_finally);
        };
        let then_finally = finally_wrapper(on_finally.clone(), FinallySide::Fulfilled);
        let catch_finally = finally_wrapper(on_finally, FinallySide::Rejected);
        self.then(promise, then_finally.into(), catch_finally.into())
    }
}

/// Build the function registered on one side of a `finally`.
///
/// It calls `on_finally()`, waits for its result as a promise, then replays the
/// original value (fulfilled side) or re-throws the original reason (rejected
/// side).
fn finally_wrapper(
    on_finally: ObjectRef,
    side: FinallySide,
) -> ObjectRef {
    ObjectRef::function("", move |realm, _this, args| {
        let original = args.first().cloned().unwrap_or_default();
        let result = realm.call_object(&on_finally, &Value::Undefined, &[])?;
        let waited = realm.promise_resolve(result)?;

        let replay = match side {
            FinallySide::Fulfilled => {
                ObjectRef::function("", move |_realm, _this, _args| Ok(original.clone()))
            }
            FinallySide::Rejected => ObjectRef::function("", move |_realm, _this, _args| {
                Err(Exception::Throw(original.clone()))
            }),
        };
        let derived = realm.then(waited, replay.into(), Value::Undefined)?;
        Ok(Value::Promise(derived))
    })
}
