//! Aggregate combinators
//!
//! Each combinator snapshots its input into a list, adopts every element with
//! `Promise.resolve`, and fans the element outcomes back into one aggregate
//! cell through per-element handler functions sharing an aggregate record.

use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, trace};

use super::adoption::ResolvingFunctions;
use super::cell::PromiseId;
use crate::runtime::errors::{error_object, RealmResult};
use crate::runtime::realm::Realm;
use crate::runtime::value::{ObjectRef, Value};

/// Fan-in record shared by the element handlers of one aggregate.
#[derive(Debug)]
struct Aggregate {
    /// One slot per input element, in input order.
    values: Vec<Option<Value>>,
    /// Elements that have not delivered yet.
    remaining: usize,
    /// Set once the aggregate outcome is decided; later deliveries are dropped.
    closed: bool,
}

impl Aggregate {
    fn new(len: usize) -> Arc<Mutex<Self>> {
        Arc::new(Mutex::new(Self {
            values: vec![None; len],
            remaining: len,
            closed: false,
        }))
    }

    /// Store one element outcome. Returns the full list once every slot is
    /// filled, closing the aggregate.
    fn store(
        &mut self,
        index: usize,
        value: Value,
    ) -> Option<Vec<Value>> {
        if self.closed {
            return None;
        }
        if let Some(slot) = self.values.get_mut(index) {
            if slot.is_none() {
                *slot = Some(value);
                self.remaining -= 1;
            }
        }
        if self.remaining > 0 {
            return None;
        }
        self.closed = true;
        Some(
            std::mem::take(&mut self.values)
                .into_iter()
                .map(Option::unwrap_or_default)
                .collect(),
        )
    }
}

/// Which combinator an aggregate belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Combinator {
    All,
    AllSettled,
    Any,
}

impl Realm {
    /// `Promise.all(iterable)`.
    ///
    /// Fulfills with the element values in input order once every element
    /// fulfilled; rejects with the first rejection reason, after which further
    /// element outcomes are ignored. Empty input fulfills with `[]` at once.
    pub fn all(
        &mut self,
        iterable: &Value,
    ) -> RealmResult<PromiseId> {
        self.fan_in(iterable, Combinator::All)
    }

    /// `Promise.allSettled(iterable)`.
    ///
    /// Fulfills with one `{ status, value | reason }` record per element in
    /// input order.
    pub fn all_settled(
        &mut self,
        iterable: &Value,
    ) -> RealmResult<PromiseId> {
        self.fan_in(iterable, Combinator::AllSettled)
    }

    /// `Promise.any(iterable)`.
    ///
    /// Fulfills with the first fulfillment. If every element rejects, rejects
    /// with an `AggregateError` holding the reasons in input order.
    pub fn any(
        &mut self,
        iterable: &Value,
    ) -> RealmResult<PromiseId> {
        self.fan_in(iterable, Combinator::Any)
    }

    /// `Promise.race(iterable)`.
    ///
    /// The first element to settle decides the outcome. Empty input stays
    /// pending forever.
    pub fn race(
        &mut self,
        iterable: &Value,
    ) -> RealmResult<PromiseId> {
        let aggregate = self.new_pending()?;
        let ResolvingFunctions { resolve, reject } = self.create_resolving_functions(aggregate);
        let items = match self.iterate_to_list(iterable) {
            Ok(items) => items,
            Err(exception) => {
                self.reject_promise(aggregate, exception.into_value())?;
                return Ok(aggregate);
            }
        };
        debug!(aggregate = %aggregate, elements = items.len(), "race");

        for item in items {
            let next = self.promise_resolve(item)?;
            self.perform_then(next, Some(resolve.clone()), Some(reject.clone()), None)?;
        }
        Ok(aggregate)
    }

    /// Shared driver for `all`, `allSettled` and `any`.
    fn fan_in(
        &mut self,
        iterable: &Value,
        kind: Combinator,
    ) -> RealmResult<PromiseId> {
        let aggregate = self.new_pending()?;
        let ResolvingFunctions { resolve, reject } = self.create_resolving_functions(aggregate);
        let items = match self.iterate_to_list(iterable) {
            Ok(items) => items,
            Err(exception) => {
                self.reject_promise(aggregate, exception.into_value())?;
                return Ok(aggregate);
            }
        };
        debug!(aggregate = %aggregate, elements = items.len(), ?kind, "fan-in");

        if items.is_empty() {
            match kind {
                Combinator::All | Combinator::AllSettled => {
                    self.fulfill_promise(aggregate, Value::array(Vec::new()))?
                }
                Combinator::Any => self.reject_promise(aggregate, aggregate_error(Vec::new()))?,
            }
            return Ok(aggregate);
        }

        let record = Aggregate::new(items.len());
        for (index, item) in items.into_iter().enumerate() {
            let next = self.promise_resolve(item)?;
            let (on_fulfilled, on_rejected) = match kind {
                Combinator::All => (
                    store_element(record.clone(), index, resolve.clone(), Value::array, identity),
                    close_with(record.clone(), reject.clone()),
                ),
                Combinator::AllSettled => (
                    store_element(record.clone(), index, resolve.clone(), Value::array, fulfilled_record),
                    store_element(record.clone(), index, resolve.clone(), Value::array, rejected_record),
                ),
                Combinator::Any => (
                    close_with(record.clone(), resolve.clone()),
                    store_element(record.clone(), index, reject.clone(), aggregate_error, identity),
                ),
            };
            self.perform_then(next, Some(on_fulfilled), Some(on_rejected), None)?;
        }
        Ok(aggregate)
    }
}

fn identity(value: Value) -> Value {
    value
}

fn fulfilled_record(value: Value) -> Value {
    Value::object([("status", Value::string("fulfilled")), ("value", value)])
}

fn rejected_record(reason: Value) -> Value {
    Value::object([("status", Value::string("rejected")), ("reason", reason)])
}

/// `{ name: "AggregateError", message, errors }`
pub(crate) fn aggregate_error(errors: Vec<Value>) -> Value {
    let error = error_object("AggregateError", "All promises were rejected");
    if let Value::Object(obj) = &error {
        obj.set("errors", Value::array(errors));
    }
    error
}

/// Element handler that stores its input at `index` and, once the last slot
/// fills, calls `finish` with `complete(all slots)`.
fn store_element(
    record: Arc<Mutex<Aggregate>>,
    index: usize,
    finish: ObjectRef,
    complete: fn(Vec<Value>) -> Value,
    wrap: fn(Value) -> Value,
) -> ObjectRef {
    ObjectRef::function("", move |realm, _this, args| {
        let value = wrap(args.first().cloned().unwrap_or_default());
        let done = record.lock().store(index, value);
        if let Some(values) = done {
            trace!(index, "aggregate complete");
            realm.call_object(&finish, &Value::Undefined, &[complete(values)])?;
        }
        Ok(Value::Undefined)
    })
}

/// Element handler that decides the aggregate outright with its input.
fn close_with(
    record: Arc<Mutex<Aggregate>>,
    finish: ObjectRef,
) -> ObjectRef {
    ObjectRef::function("", move |realm, _this, args| {
        {
            let mut record = record.lock();
            if record.closed {
                return Ok(Value::Undefined);
            }
            record.closed = true;
        }
        let value = args.first().cloned().unwrap_or_default();
        realm.call_object(&finish, &Value::Undefined, &[value])?;
        Ok(Value::Undefined)
    })
}
