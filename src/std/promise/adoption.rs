//! Thenable adoption
//!
//! Any object exposing a callable `then` is treated as a promise source,
//! whatever its concrete kind. Resolving a cell with such a value locks the
//! cell to it: a `ResolveThenable` job later calls the foreign `then` with a
//! fresh pair of one-shot resolving functions bound to the cell.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tracing::debug;

use super::cell::PromiseId;
use crate::runtime::errors::{Exception, JsResult, RealmResult};
use crate::runtime::realm::Realm;
use crate::runtime::scheduler::Job;
use crate::runtime::value::{ObjectRef, Value};

/// The resolve/reject pair handed to executors and foreign `then` methods.
///
/// Both functions share one `already_resolved` flag: whichever runs first
/// wins, every later call of either is a no-op.
#[derive(Debug, Clone)]
pub struct ResolvingFunctions {
    /// `resolve(value)`: adopts thenables, fulfills otherwise.
    pub resolve: ObjectRef,
    /// `reject(reason)`: rejects verbatim.
    pub reject: ObjectRef,
}

impl Realm {
    /// Capability check: the callable `then` of `value`, if it has one.
    ///
    /// Only object-like values qualify. Reading `then` may itself throw, which
    /// callers turn into a rejection of the adopting cell.
    pub fn get_then(
        &self,
        value: &Value,
    ) -> JsResult<Option<ObjectRef>> {
        match value {
            Value::Object(_) | Value::Promise(_) => Ok(self.get(value, "then")?.as_callable()),
            _ => Ok(None),
        }
    }

    /// Resolve `id` with `resolution`.
    ///
    /// - already settled: no-op
    /// - `resolution` is `id` itself: reject with a `TypeError`
    /// - `resolution` is thenable: enqueue a `ResolveThenable` job
    /// - otherwise: fulfill
    pub(crate) fn resolve_promise(
        &mut self,
        id: PromiseId,
        resolution: Value,
    ) -> RealmResult<()> {
        if !self.promises.get(id)?.is_pending() {
            return Ok(());
        }

        if resolution.as_promise() == Some(id) {
            let reason = Exception::type_error(format!("Chaining cycle detected for promise {}", id));
            return self.reject_promise(id, reason.into_value());
        }

        let then = match self.get_then(&resolution) {
            Ok(Some(then)) => then,
            Ok(None) => return self.fulfill_promise(id, resolution),
            Err(exception) => return self.reject_promise(id, exception.into_value()),
        };

        debug!(promise = %id, "adopting thenable");
        self.jobs.push(Job::ResolveThenable {
            promise: id,
            thenable: resolution,
            then,
        });
        Ok(())
    }

    /// Create the one-shot resolving functions for `id`.
    pub fn create_resolving_functions(
        &mut self,
        id: PromiseId,
    ) -> ResolvingFunctions {
        self.guarded_resolving_functions(id).0
    }

    /// Resolving functions plus their shared `already_resolved` flag.
    fn guarded_resolving_functions(
        &mut self,
        id: PromiseId,
    ) -> (ResolvingFunctions, Arc<AtomicBool>) {
        let already_resolved = Arc::new(AtomicBool::new(false));

        let resolve = {
            let already_resolved = already_resolved.clone();
            ObjectRef::function("resolve", move |realm, _this, args| {
                if already_resolved.swap(true, Ordering::SeqCst) {
                    return Ok(Value::Undefined);
                }
                let resolution = args.first().cloned().unwrap_or_default();
                realm.resolve_promise(id, resolution)?;
                Ok(Value::Undefined)
            })
        };

        let reject = {
            let already_resolved = already_resolved.clone();
            ObjectRef::function("reject", move |realm, _this, args| {
                if already_resolved.swap(true, Ordering::SeqCst) {
                    return Ok(Value::Undefined);
                }
                let reason = args.first().cloned().unwrap_or_default();
                realm.reject_promise(id, reason)?;
                Ok(Value::Undefined)
            })
        };

        (ResolvingFunctions { resolve, reject }, already_resolved)
    }

    /// Body of the `ResolveThenable` job: `then.call(thenable, resolve, reject)`.
    ///
    /// If `then` throws and neither resolving function has run yet, the cell
    /// rejects with the thrown value; otherwise the throw is ignored.
    pub(crate) fn run_resolve_thenable(
        &mut self,
        id: PromiseId,
        thenable: Value,
        then: ObjectRef,
    ) -> RealmResult<()> {
        let (ResolvingFunctions { resolve, reject }, already_resolved) =
            self.guarded_resolving_functions(id);
        let args = [Value::Object(resolve), Value::Object(reject)];
        if let Err(exception) = self.call_object(&then, &thenable, &args) {
            debug!(promise = %id, "thenable `then` threw");
            if !already_resolved.swap(true, Ordering::SeqCst) {
                return self.reject_promise(id, exception.into_value());
            }
        }
        Ok(())
    }
}
