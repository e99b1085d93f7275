//! The script-facing surface: `%Promise%`, its statics and the prototype.

use es_builtins::std::get_module_exports;
use es_builtins::{Exception, PromiseState, Realm, Value};

use crate::common::*;

fn static_member(
    realm: &Realm,
    name: &str,
) -> Value {
    realm.get(&realm.global_promise(), name).unwrap()
}

#[test]
fn script_style_chain() {
    // Promise.resolve(1).then(x => x + 1).then(x => { throw x }).catch(r => r * 10)
    let mut realm = Realm::new();
    let resolve = static_member(&realm, "resolve");
    let p = realm.call(&resolve, &Value::Undefined, &[Value::from(1)]).unwrap();

    let inc = Value::function("inc", |_realm, _this, args| {
        Ok(Value::from(args[0].to_number().unwrap_or(0.0) + 1.0))
    });
    let rethrow = Value::function("rethrow", |_realm, _this, args| {
        Err(Exception::Throw(args[0].clone()))
    });
    let times_ten = Value::function("timesTen", |_realm, _this, args| {
        Ok(Value::from(args[0].to_number().unwrap_or(0.0) * 10.0))
    });

    let then = realm.get(&p, "then").unwrap();
    let p = realm.call(&then, &p, &[inc]).unwrap();
    let p = realm.call(&then, &p, &[rethrow]).unwrap();
    let catch = realm.get(&p, "catch").unwrap();
    let p = realm.call(&catch, &p, &[times_ten]).unwrap();

    realm.run_jobs().unwrap();
    assert_eq!(outcome(&realm, p.as_promise().unwrap()), fulfilled(20));
}

#[test]
fn new_promise_through_constructor() {
    let mut realm = Realm::new();
    let ctor = realm.global_promise();
    let executor = Value::function("executor", |realm, _this, args| {
        realm.call(&args[1], &Value::Undefined, &[Value::from("denied")])
    });
    let p = realm.call(&ctor, &Value::Undefined, &[executor]).unwrap();
    assert_eq!(outcome(&realm, p.as_promise().unwrap()), rejected("denied"));
}

#[test]
fn constructor_misuse_raises_synchronously() {
    let mut realm = Realm::new();
    let ctor = realm.global_promise();
    let err = realm
        .call(&ctor, &Value::Undefined, &[Value::from("nope")])
        .unwrap_err();
    assert!(matches!(err, Exception::TypeError(_)));
    assert!(err.to_string().starts_with("TypeError: Promise resolver"));
}

#[test]
fn prototype_methods_reject_foreign_receivers() {
    let mut realm = Realm::new();
    let p = realm.promise_resolve(Value::Undefined).unwrap();
    let then = realm.get(&Value::Promise(p), "then").unwrap();
    let err = realm.call(&then, &Value::from(3), &[]).unwrap_err();
    assert!(matches!(err, Exception::TypeError(_)));
}

#[test]
fn statics_via_global() {
    let mut realm = Realm::new();
    let all_settled = static_member(&realm, "allSettled");
    let reject = static_member(&realm, "reject");
    let bad = realm.call(&reject, &Value::Undefined, &[Value::from("x")]).unwrap();
    let agg = realm
        .call(
            &all_settled,
            &Value::Undefined,
            &[Value::array(vec![bad, Value::from(1)])],
        )
        .unwrap();
    realm.run_jobs().unwrap();

    let records = match outcome(&realm, agg.as_promise().unwrap()) {
        Some(es_builtins::Settled::Fulfilled(v)) => v,
        other => panic!("unexpected {:?}", other),
    };
    let records = records.as_array().unwrap();
    assert_eq!(get(&records[0], "status"), Value::from("rejected"));
    assert_eq!(get(&records[1], "value"), Value::from(1));
}

#[test]
fn any_rejection_is_aggregate_error() {
    let mut realm = Realm::new();
    let any = static_member(&realm, "any");
    let agg = realm
        .call(&any, &Value::Undefined, &[Value::array(vec![])])
        .unwrap();
    let state = realm.promise_state(agg.as_promise().unwrap()).unwrap();
    assert_eq!(state, PromiseState::Rejected);
    let reason = realm.promise_result(agg.as_promise().unwrap()).unwrap().unwrap();
    assert_eq!(reason.value().to_string(), "AggregateError: All promises were rejected");
}

#[test]
fn module_exports_list_every_native() {
    let exports = get_module_exports("std.promise").unwrap();
    let names: Vec<_> = exports.iter().map(|e| e.qualified_name).collect();
    assert_eq!(names.len(), 11);
    assert!(names.contains(&"Promise.prototype.finally"));
    assert!(names.contains(&"Promise.withResolvers"));
}
