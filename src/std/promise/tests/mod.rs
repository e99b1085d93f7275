//! Promise 单元测试


use std::sync::Arc;

use parking_lot::Mutex;

use crate::runtime::errors::Exception;
use crate::runtime::realm::Realm;
use crate::runtime::value::Value;
use crate::std::promise::{PromiseId, Settled};

/// Shared event log written by test handlers
pub(super) type Log = Arc<Mutex<Vec<String>>>;

pub(super) fn new_log() -> Log {
    Arc::new(Mutex::new(Vec::new()))
}

pub(super) fn entries(log: &Log) -> Vec<String> {
    log.lock().clone()
}

/// Handler that records `tag:argument` and returns `undefined`.
pub(super) fn recorder(
    log: &Log,
    tag: &'static str,
) -> Value {
    let log = log.clone();
    Value::function(tag, move |_realm, _this, args| {
        let arg = args.first().cloned().unwrap_or_default();
        log.lock().push(format!("{}:{}", tag, arg));
        Ok(Value::Undefined)
    })
}

/// Handler that returns `value`.
pub(super) fn returning(value: Value) -> Value {
    Value::function("returning", move |_realm, _this, _args| Ok(value.clone()))
}

/// Handler that throws `value`.
pub(super) fn throwing(value: Value) -> Value {
    Value::function("throwing", move |_realm, _this, _args| {
        Err(Exception::Throw(value.clone()))
    })
}

pub(super) fn fulfilled_value(
    realm: &Realm,
    id: PromiseId,
) -> Option<Value> {
    match realm.promise_result(id).ok()? {
        Some(Settled::Fulfilled(value)) => Some(value),
        _ => None,
    }
}

pub(super) fn rejected_reason(
    realm: &Realm,
    id: PromiseId,
) -> Option<Value> {
    match realm.promise_result(id).ok()? {
        Some(Settled::Rejected(reason)) => Some(reason),
        _ => None,
    }
}

/// Read a string property of an object value.
pub(super) fn prop(
    value: &Value,
    key: &str,
) -> Value {
    value
        .as_object()
        .and_then(|obj| obj.get(key))
        .unwrap_or_default()
}

pub(super) fn nums(values: &[i32]) -> Value {
    Value::array(values.iter().map(|n| Value::from(*n)).collect())
}
