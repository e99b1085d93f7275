//! Promise subsystem
//!
//! Settlement cells live in the realm's [`PromiseArena`] and are addressed by
//! [`PromiseId`]. Settling a cell never runs user code: it only queues one
//! job per registered reaction, and handlers run when the host drains the
//! job queue with [`Realm::run_jobs`](crate::runtime::realm::Realm::run_jobs).

pub mod adoption;
pub mod cell;
pub mod chain;
pub mod combinators;
pub mod construct;
pub mod natives;
pub mod reaction;
pub mod tracker;

#[cfg(test)]
mod tests;

use std::collections::HashMap;

pub use adoption::ResolvingFunctions;
pub use cell::{PromiseArena, PromiseId, PromiseState, Settled, SettlementCell};
pub use construct::Resolvers;
pub use reaction::Reaction;
pub use tracker::RejectionTracker;

use crate::runtime::extfunc::NativeFunction;

/// A native exported under `std.promise`.
#[derive(Debug, Clone)]
pub struct NativeDeclaration {
    /// Script-visible name, e.g. `then`
    pub name: &'static str,
    /// Registry key, e.g. `Promise.prototype.then`
    pub native_name: &'static str,
    pub signature: &'static str,
    pub doc: &'static str,
    pub implemented: bool,
    pub func: NativeFunction,
}

pub fn native_declarations() -> Vec<NativeDeclaration> {
    vec![
        NativeDeclaration {
            name: "Promise",
            native_name: "Promise",
            signature: "(executor: Function) -> Promise",
            doc: "Create a promise and run the executor with its resolving functions.",
            implemented: true,
            func: natives::native_promise_constructor,
        },
        NativeDeclaration {
            name: "resolve",
            native_name: "Promise.resolve",
            signature: "(value: Any) -> Promise",
            doc: "Return a promise resolved with value, adopting thenables.",
            implemented: true,
            func: natives::native_promise_resolve,
        },
        NativeDeclaration {
            name: "reject",
            native_name: "Promise.reject",
            signature: "(reason: Any) -> Promise",
            doc: "Return a promise rejected with reason.",
            implemented: true,
            func: natives::native_promise_reject,
        },
        NativeDeclaration {
            name: "all",
            native_name: "Promise.all",
            signature: "(iterable: Iterable) -> Promise",
            doc: "Fulfill with every value in input order, or reject with the first reason.",
            implemented: true,
            func: natives::native_promise_all,
        },
        NativeDeclaration {
            name: "race",
            native_name: "Promise.race",
            signature: "(iterable: Iterable) -> Promise",
            doc: "Settle like the first element to settle.",
            implemented: true,
            func: natives::native_promise_race,
        },
        NativeDeclaration {
            name: "allSettled",
            native_name: "Promise.allSettled",
            signature: "(iterable: Iterable) -> Promise",
            doc: "Fulfill with one status record per element.",
            implemented: true,
            func: natives::native_promise_all_settled,
        },
        NativeDeclaration {
            name: "any",
            native_name: "Promise.any",
            signature: "(iterable: Iterable) -> Promise",
            doc: "Fulfill with the first fulfillment, or reject with an AggregateError.",
            implemented: true,
            func: natives::native_promise_any,
        },
        NativeDeclaration {
            name: "withResolvers",
            native_name: "Promise.withResolvers",
            signature: "() -> { promise, resolve, reject }",
            doc: "Create a pending promise together with its resolving functions.",
            implemented: true,
            func: natives::native_promise_with_resolvers,
        },
        NativeDeclaration {
            name: "then",
            native_name: "Promise.prototype.then",
            signature: "(onFulfilled?: Function, onRejected?: Function) -> Promise",
            doc: "Register handlers and return the derived promise.",
            implemented: true,
            func: natives::native_promise_then,
        },
        NativeDeclaration {
            name: "catch",
            native_name: "Promise.prototype.catch",
            signature: "(onRejected?: Function) -> Promise",
            doc: "Shorthand for then(undefined, onRejected).",
            implemented: true,
            func: natives::native_promise_catch,
        },
        NativeDeclaration {
            name: "finally",
            native_name: "Promise.prototype.finally",
            signature: "(onFinally?: Function) -> Promise",
            doc: "Run onFinally on either outcome and pass the original outcome through.",
            implemented: true,
            func: natives::native_promise_finally,
        },
    ]
}

pub fn native_name_map() -> HashMap<String, String> {
    native_declarations()
        .into_iter()
        .filter(|d| d.implemented)
        .map(|d| (d.name.to_string(), d.native_name.to_string()))
        .collect()
}
