//! Shared helpers for integration tests

use std::sync::Arc;

use es_builtins::{Exception, PromiseId, Realm, Settled, Value};
use parking_lot::Mutex;

pub type Log = Arc<Mutex<Vec<String>>>;

pub fn new_log() -> Log {
    Arc::new(Mutex::new(Vec::new()))
}

pub fn record(
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

pub fn throws(value: impl Into<Value>) -> Value {
    let value = value.into();
    Value::function("throws", move |_realm, _this, _args| {
        Err(Exception::Throw(value.clone()))
    })
}

pub fn returns(value: impl Into<Value>) -> Value {
    let value = value.into();
    Value::function("returns", move |_realm, _this, _args| Ok(value.clone()))
}

/// `resolvers.resolve(value)` / `resolvers.reject(value)` through the call primitive
pub fn invoke(
    realm: &mut Realm,
    func: &es_builtins::ObjectRef,
    value: impl Into<Value>,
) {
    realm
        .call(&Value::Object(func.clone()), &Value::Undefined, &[value.into()])
        .unwrap();
}

pub fn outcome(
    realm: &Realm,
    id: PromiseId,
) -> Option<Settled> {
    realm.promise_result(id).unwrap()
}

pub fn fulfilled(value: impl Into<Value>) -> Option<Settled> {
    Some(Settled::Fulfilled(value.into()))
}

pub fn rejected(value: impl Into<Value>) -> Option<Settled> {
    Some(Settled::Rejected(value.into()))
}

pub fn get(
    value: &Value,
    key: &str,
) -> Value {
    value.as_object().and_then(|o| o.get(key)).unwrap_or_default()
}
