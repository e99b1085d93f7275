//! Queued units of work

use std::fmt;

use crate::runtime::errors::JsResult;
use crate::runtime::realm::Realm;
use crate::runtime::value::{ObjectRef, Value};
use crate::std::promise::{PromiseId, Reaction, Settled};

/// Host-supplied job body.
pub type HostJob = Box<dyn FnOnce(&mut Realm) -> JsResult<()> + Send>;

/// One pending job.
pub enum Job {
    /// Deliver a settled value to one reaction.
    Reaction { reaction: Reaction, argument: Settled },
    /// Call `then` on a thenable with fresh resolving functions for `promise`.
    ResolveThenable {
        promise: PromiseId,
        thenable: Value,
        then: ObjectRef,
    },
    /// Arbitrary work queued by the embedder.
    Host(HostJob),
}

impl Job {
    /// Short kind label for logging
    pub fn kind(&self) -> &'static str {
        match self {
            Job::Reaction { .. } => "reaction",
            Job::ResolveThenable { .. } => "resolve-thenable",
            Job::Host(_) => "host",
        }
    }
}

impl fmt::Debug for Job {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        match self {
            Job::Reaction { reaction, argument } => f
                .debug_struct("Reaction")
                .field("reaction", reaction)
                .field("argument", argument)
                .finish(),
            Job::ResolveThenable {
                promise, thenable, ..
            } => f
                .debug_struct("ResolveThenable")
                .field("promise", promise)
                .field("thenable", thenable)
                .finish_non_exhaustive(),
            Job::Host(_) => f.write_str("Host(..)"),
        }
    }
}
