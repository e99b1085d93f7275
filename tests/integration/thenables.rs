//! Interop with foreign thenables: objects that are not promises of this
//! realm but expose a callable `then`.

use std::sync::Arc;

use es_builtins::{ObjectRef, PromiseState, Realm, Value};
use parking_lot::Mutex;

use crate::common::*;

/// A hand-written "promise" that stores its callbacks and fires them when the
/// test says so, like a promise from another engine would.
#[derive(Clone, Default)]
struct ForeignPromise {
    callbacks: Arc<Mutex<Vec<(Value, Value)>>>,
}

impl ForeignPromise {
    fn as_value(&self) -> Value {
        let callbacks = self.callbacks.clone();
        let then = Value::function("then", move |_realm, _this, args| {
            let on_ok = args.first().cloned().unwrap_or_default();
            let on_err = args.get(1).cloned().unwrap_or_default();
            callbacks.lock().push((on_ok, on_err));
            Ok(Value::Undefined)
        });
        Value::object([("then", then)])
    }

    fn fire(
        &self,
        realm: &mut Realm,
        ok: bool,
        value: Value,
    ) {
        let callbacks = self.callbacks.lock().clone();
        for (on_ok, on_err) in callbacks {
            let target = if ok { on_ok } else { on_err };
            realm.call(&target, &Value::Undefined, &[value.clone()]).unwrap();
        }
    }
}

#[test]
fn foreign_promise_fulfillment() {
    let foreign = ForeignPromise::default();
    let mut realm = Realm::new();
    let p = realm.promise_resolve(foreign.as_value()).unwrap();
    realm.run_jobs().unwrap();
    assert_eq!(realm.promise_state(p).unwrap(), PromiseState::Pending);

    foreign.fire(&mut realm, true, Value::from("later"));
    assert_eq!(outcome(&realm, p), fulfilled("later"));
}

#[test]
fn foreign_promise_rejection_flows_down_a_chain() {
    let log = new_log();
    let foreign = ForeignPromise::default();
    let mut realm = Realm::new();
    let p = realm.promise_resolve(foreign.as_value()).unwrap();
    let d = realm.then(p, record(&log, "ok"), Value::Undefined).unwrap();
    realm.catch(d, record(&log, "caught")).unwrap();
    realm.run_jobs().unwrap();

    foreign.fire(&mut realm, false, Value::from("remote failure"));
    realm.run_jobs().unwrap();
    assert_eq!(*log.lock(), vec!["caught:remote failure".to_string()]);
}

#[test]
fn foreign_promise_firing_twice_is_harmless() {
    let foreign = ForeignPromise::default();
    let mut realm = Realm::new();
    let p = realm.promise_resolve(foreign.as_value()).unwrap();
    realm.run_jobs().unwrap();
    foreign.fire(&mut realm, true, Value::from(1));
    foreign.fire(&mut realm, false, Value::from(2));
    foreign.fire(&mut realm, true, Value::from(3));
    assert_eq!(outcome(&realm, p), fulfilled(1));
}

#[test]
fn our_promises_are_thenables_too() {
    // A foreign consumer that only knows the `then` protocol.
    let mut realm = Realm::new();
    let p = realm.promise_resolve(Value::from("ours")).unwrap();
    let then = realm.get(&Value::Promise(p), "then").unwrap();
    assert!(then.is_callable());

    let log = new_log();
    realm
        .call(&then, &Value::Promise(p), &[record(&log, "consumer")])
        .unwrap();
    realm.run_jobs().unwrap();
    assert_eq!(*log.lock(), vec!["consumer:ours".to_string()]);
}

#[test]
fn thenable_then_throwing_before_settling() {
    let mut realm = Realm::new();
    let then = throws("then exploded");
    let p = realm.promise_resolve(Value::object([("then", then)])).unwrap();
    realm.run_jobs().unwrap();
    assert_eq!(outcome(&realm, p), rejected("then exploded"));
}

#[test]
fn combinators_mix_foreign_and_native() {
    let foreign = ForeignPromise::default();
    let mut realm = Realm::new();
    let native = realm.promise_resolve(Value::from("native")).unwrap();
    let agg = realm
        .all(&Value::array(vec![foreign.as_value(), Value::Promise(native)]))
        .unwrap();
    realm.run_jobs().unwrap();
    assert_eq!(realm.promise_state(agg).unwrap(), PromiseState::Pending);

    foreign.fire(&mut realm, true, Value::from("foreign"));
    realm.run_jobs().unwrap();
    assert_eq!(
        outcome(&realm, agg),
        fulfilled(vec![Value::from("foreign"), Value::from("native")])
    );
}

#[test]
fn resolving_functions_can_be_handed_out() {
    let mut realm = Realm::new();
    let resolvers = realm.with_resolvers().unwrap();
    let stash: Arc<Mutex<Option<ObjectRef>>> = Arc::new(Mutex::new(None));
    *stash.lock() = Some(resolvers.resolve.clone());

    let resolve = stash.lock().clone().unwrap();
    invoke(&mut realm, &resolve, "from elsewhere");
    assert_eq!(outcome(&realm, resolvers.promise), fulfilled("from elsewhere"));
}
