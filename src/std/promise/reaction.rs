//! Reaction records
//!
//! A reaction pairs the optional handlers passed to `then` with the derived
//! cell `then` returned. It is consumed exactly once, by the job that delivers
//! its source cell's disposition. Internal subscribers such as the combinator
//! element handlers register without a derived cell.

use std::fmt;

use tracing::{trace, warn};

use super::cell::{PromiseId, Settled};
use crate::runtime::errors::RealmResult;
use crate::runtime::realm::Realm;
use crate::runtime::value::{ObjectRef, Value};

/// A registered `(on_fulfilled, on_rejected, derived)` triple.
#[derive(Clone)]
pub struct Reaction {
    /// Fulfillment handler; `None` forwards the value.
    pub(crate) on_fulfilled: Option<ObjectRef>,
    /// Rejection handler; `None` forwards the reason.
    pub(crate) on_rejected: Option<ObjectRef>,
    /// Cell fed by the handler's outcome, if anyone observes it.
    pub(crate) derived: Option<PromiseId>,
}

impl Reaction {
    /// Create a reaction feeding `derived`.
    pub(crate) fn new(
        on_fulfilled: Option<ObjectRef>,
        on_rejected: Option<ObjectRef>,
        derived: Option<PromiseId>,
    ) -> Self {
        Self {
            on_fulfilled,
            on_rejected,
            derived,
        }
    }

    /// The cell this reaction settles
    #[inline]
    pub fn derived(&self) -> Option<PromiseId> {
        self.derived
    }

    fn handler_for(
        &self,
        settled: &Settled,
    ) -> Option<&ObjectRef> {
        match settled {
            Settled::Fulfilled(_) => self.on_fulfilled.as_ref(),
            Settled::Rejected(_) => self.on_rejected.as_ref(),
        }
    }
}

impl fmt::Debug for Reaction {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.debug_struct("Reaction")
            .field("on_fulfilled", &self.on_fulfilled.is_some())
            .field("on_rejected", &self.on_rejected.is_some())
            .field("derived", &self.derived)
            .finish()
    }
}

impl Realm {
    /// Deliver `argument` to one reaction. Runs from the job queue only.
    ///
    /// A missing handler passes the disposition through unchanged. A handler's
    /// return value resolves the derived cell (adopting thenables); a handler
    /// that throws rejects it. Without a derived cell the outcome is dropped.
    pub(crate) fn run_reaction(
        &mut self,
        reaction: Reaction,
        argument: Settled,
    ) -> RealmResult<()> {
        let handler = reaction.handler_for(&argument).cloned();
        let Some(derived) = reaction.derived else {
            if let Some(handler) = handler {
                let input = argument.value().clone();
                if let Err(exception) = self.call_object(&handler, &Value::Undefined, &[input]) {
                    warn!(error = %exception, "unobserved reaction threw");
                }
            }
            return Ok(());
        };

        let Some(handler) = handler else {
            trace!(derived = %derived, "pass-through reaction");
            return match argument {
                Settled::Fulfilled(value) => self.resolve_promise(derived, value),
                Settled::Rejected(reason) => self.reject_promise(derived, reason),
            };
        };

        let input = argument.value().clone();
        match self.call_object(&handler, &Value::Undefined, &[input]) {
            Ok(result) => self.resolve_promise(derived, result),
            Err(exception) => self.reject_promise(derived, exception.into_value()),
        }
    }
}
