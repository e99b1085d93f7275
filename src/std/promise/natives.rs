//! Native call-convention wrappers
//!
//! Every function here has the shape `(realm, this, args) -> completion` and
//! is what scripts actually call. Missing arguments read as `undefined`.

use crate::runtime::errors::{Exception, JsResult};
use crate::runtime::realm::Realm;
use crate::runtime::value::Value;
use crate::std::promise::construct::describe;
use crate::std::promise::PromiseId;

fn arg(
    args: &[Value],
    index: usize,
) -> Value {
    args.get(index).cloned().unwrap_or_default()
}

/// Receiver check for `Promise.prototype.*`.
fn this_promise(
    realm: &Realm,
    this: &Value,
    method: &str,
) -> JsResult<PromiseId> {
    match this {
        Value::Promise(id) if realm.owns_promise(*id) => Ok(*id),
        other => Err(Exception::type_error(format!(
            "Method Promise.prototype.{} called on incompatible receiver {}",
            method,
            describe(other)
        ))),
    }
}

/// `Promise(executor)`
pub fn native_promise_constructor(
    realm: &mut Realm,
    _this: &Value,
    args: &[Value],
) -> JsResult<Value> {
    Ok(Value::Promise(realm.new_promise(&arg(args, 0))?))
}

/// `Promise.resolve(value)`
pub fn native_promise_resolve(
    realm: &mut Realm,
    _this: &Value,
    args: &[Value],
) -> JsResult<Value> {
    Ok(Value::Promise(realm.promise_resolve(arg(args, 0))?))
}

/// `Promise.reject(reason)`
pub fn native_promise_reject(
    realm: &mut Realm,
    _this: &Value,
    args: &[Value],
) -> JsResult<Value> {
    Ok(Value::Promise(realm.promise_reject(arg(args, 0))?))
}

/// `Promise.all(iterable)`
pub fn native_promise_all(
    realm: &mut Realm,
    _this: &Value,
    args: &[Value],
) -> JsResult<Value> {
    Ok(Value::Promise(realm.all(&arg(args, 0))?))
}

/// `Promise.race(iterable)`
pub fn native_promise_race(
    realm: &mut Realm,
    _this: &Value,
    args: &[Value],
) -> JsResult<Value> {
    Ok(Value::Promise(realm.race(&arg(args, 0))?))
}

/// `Promise.allSettled(iterable)`
pub fn native_promise_all_settled(
    realm: &mut Realm,
    _this: &Value,
    args: &[Value],
) -> JsResult<Value> {
    Ok(Value::Promise(realm.all_settled(&arg(args, 0))?))
}

/// `Promise.any(iterable)`
pub fn native_promise_any(
    realm: &mut Realm,
    _this: &Value,
    args: &[Value],
) -> JsResult<Value> {
    Ok(Value::Promise(realm.any(&arg(args, 0))?))
}

/// `Promise.withResolvers()`
pub fn native_promise_with_resolvers(
    realm: &mut Realm,
    _this: &Value,
    _args: &[Value],
) -> JsResult<Value> {
    Ok(realm.with_resolvers()?.into_value())
}

/// `Promise.prototype.then(onFulfilled, onRejected)`
pub fn native_promise_then(
    realm: &mut Realm,
    this: &Value,
    args: &[Value],
) -> JsResult<Value> {
    let promise = this_promise(realm, this, "then")?;
    Ok(Value::Promise(realm.then(promise, arg(args, 0), arg(args, 1))?))
}

/// `Promise.prototype.catch(onRejected)`
pub fn native_promise_catch(
    realm: &mut Realm,
    this: &Value,
    args: &[Value],
) -> JsResult<Value> {
    let promise = this_promise(realm, this, "catch")?;
    Ok(Value::Promise(realm.catch(promise, arg(args, 0))?))
}

/// `Promise.prototype.finally(onFinally)`
pub fn native_promise_finally(
    realm: &mut Realm,
    this: &Value,
    args: &[Value],
) -> JsResult<Value> {
    let promise = this_promise(realm, this, "finally")?;
    Ok(Value::Promise(realm.finally(promise, arg(args, 0))?))
}
