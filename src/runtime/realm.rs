//! Realm: the single owner of all promise state
//!
//! A realm holds the settlement-cell arena, the FIFO job queue, the
//! unhandled-rejection tracker and the `%Promise%` intrinsics. Every
//! operation takes `&mut Realm`, so cell transitions and job dispatch are
//! serialized by construction.

use tracing::{debug, trace, warn};

use crate::runtime::errors::{Exception, JsResult, RealmError, RealmResult};
use crate::runtime::extfunc::EXTERNAL_FUNCTIONS;
use crate::runtime::scheduler::{Job, JobQueue, QueueStats};
use crate::runtime::value::{ObjectRef, Value};
use crate::std::promise::construct::describe;
use crate::std::promise::{native_declarations, PromiseArena, PromiseId, RejectionTracker};
use crate::util::config::RealmConfig;

/// `%Promise%` and `%Promise.prototype%`
#[derive(Debug, Clone)]
struct Intrinsics {
    promise_constructor: ObjectRef,
    promise_prototype: ObjectRef,
}

impl Intrinsics {
    /// Build both objects from the native registry, in declaration order.
    fn install() -> Self {
        let prototype = ObjectRef::plain();
        let mut constructor = None;
        let mut statics = Vec::new();

        for decl in native_declarations() {
            let name = decl.native_name;
            let Some(native) = EXTERNAL_FUNCTIONS.get(name) else {
                continue;
            };
            if let Some(member) = name.strip_prefix("Promise.prototype.") {
                prototype.set(member, Value::Object(native.to_object()));
            } else if let Some(member) = name.strip_prefix("Promise.") {
                statics.push((member, native.to_object()));
            } else if name == "Promise" {
                constructor = Some(native.func);
            }
        }

        let promise_constructor = match constructor {
            Some(func) => ObjectRef::function("Promise", func),
            None => ObjectRef::plain(),
        };
        for (member, func) in statics {
            promise_constructor.set(member, Value::Object(func));
        }
        promise_constructor.set("prototype", Value::Object(prototype.clone()));

        Self {
            promise_constructor,
            promise_prototype: prototype,
        }
    }
}

/// An isolated promise world.
#[derive(Debug)]
pub struct Realm {
    pub(crate) promises: PromiseArena,
    pub(crate) jobs: JobQueue,
    pub(crate) tracker: RejectionTracker,
    config: RealmConfig,
    intrinsics: Intrinsics,
}

impl Default for Realm {
    fn default() -> Self {
        Self::new()
    }
}

impl Realm {
    /// Create a realm with the default configuration
    pub fn new() -> Self {
        Self::with_config(RealmConfig::default())
    }

    /// Create a realm with `config`
    pub fn with_config(config: RealmConfig) -> Self {
        debug!(
            budget = ?config.max_jobs_per_checkpoint,
            track_rejections = config.track_unhandled_rejections,
            "realm created"
        );
        Self {
            promises: PromiseArena::new(),
            jobs: JobQueue::new(),
            tracker: RejectionTracker::new(config.track_unhandled_rejections),
            config,
            intrinsics: Intrinsics::install(),
        }
    }

    pub fn config(&self) -> &RealmConfig {
        &self.config
    }

    /// `%Promise%`
    pub fn global_promise(&self) -> Value {
        Value::Object(self.intrinsics.promise_constructor.clone())
    }

    /// `%Promise.prototype%`
    pub fn promise_prototype(&self) -> &ObjectRef {
        &self.intrinsics.promise_prototype
    }

    /// Whether `id` names a cell of this realm
    #[inline]
    pub fn owns_promise(
        &self,
        id: PromiseId,
    ) -> bool {
        self.promises.contains(id)
    }

    /// Number of cells ever allocated
    pub fn promise_count(&self) -> usize {
        self.promises.len()
    }

    // ------------------------------------------------------------------
    // Object model
    // ------------------------------------------------------------------

    /// Property read `value[key]`.
    pub fn get(
        &self,
        value: &Value,
        key: &str,
    ) -> JsResult<Value> {
        match value {
            Value::Undefined | Value::Null => Err(Exception::type_error(format!(
                "Cannot read properties of {} (reading '{}')",
                value, key
            ))),
            Value::Object(obj) => Ok(obj.get(key).unwrap_or_default()),
            Value::Promise(_) => Ok(self.intrinsics.promise_prototype.get(key).unwrap_or_default()),
            Value::Array(items) if key == "length" => Ok(Value::Number(items.len() as f64)),
            Value::String(s) if key == "length" => Ok(Value::Number(s.chars().count() as f64)),
            _ => Ok(Value::Undefined),
        }
    }

    /// `callee.call(this, ...args)`
    pub fn call(
        &mut self,
        callee: &Value,
        this: &Value,
        args: &[Value],
    ) -> JsResult<Value> {
        match callee.as_callable() {
            Some(func) => self.call_object(&func, this, args),
            None => Err(Exception::type_error(format!(
                "{} is not a function",
                describe(callee)
            ))),
        }
    }

    /// Invoke an object's call slot.
    pub(crate) fn call_object(
        &mut self,
        func: &ObjectRef,
        this: &Value,
        args: &[Value],
    ) -> JsResult<Value> {
        let Some(call) = func.call_slot() else {
            return Err(Exception::type_error(format!("{} is not a function", func)));
        };
        call(self, this, args)
    }

    /// Snapshot an iterable into a list.
    ///
    /// Arrays yield their elements and strings one string per character.
    pub fn iterate_to_list(
        &self,
        value: &Value,
    ) -> JsResult<Vec<Value>> {
        match value {
            Value::Array(items) => Ok(items.to_vec()),
            Value::String(s) => Ok(s.chars().map(|c| Value::string(c.to_string())).collect()),
            other => Err(Exception::type_error(format!(
                "{} is not iterable",
                describe(other)
            ))),
        }
    }

    // ------------------------------------------------------------------
    // Jobs
    // ------------------------------------------------------------------

    /// Queue host work behind the jobs already pending.
    pub fn enqueue_job<F>(
        &mut self,
        job: F,
    ) where
        F: FnOnce(&mut Realm) -> JsResult<()> + Send + 'static,
    {
        self.jobs.push(Job::Host(Box::new(job)));
    }

    /// Jobs waiting to run
    pub fn pending_jobs(&self) -> usize {
        self.jobs.len()
    }

    /// Queue counters
    pub fn job_stats(&self) -> QueueStats {
        self.jobs.stats()
    }

    /// Checkpoint: run queued jobs in FIFO order until the queue is empty,
    /// including jobs queued while draining.
    ///
    /// Returns the number of jobs run. A job fault does not stop the drain;
    /// the first one is reported once the checkpoint ends. With a configured
    /// budget the checkpoint stops early and leaves the rest queued; a fault
    /// seen before that takes precedence over `JobBudgetExhausted`.
    pub fn run_jobs(&mut self) -> RealmResult<usize> {
        let budget = self.config.max_jobs_per_checkpoint;
        debug!(queued = self.jobs.len(), "checkpoint start");

        let mut ran = 0usize;
        let mut first_error = None;
        loop {
            if let Some(budget) = budget {
                if ran >= budget && !self.jobs.is_empty() {
                    let remaining = self.jobs.len();
                    warn!(budget, remaining, "job budget exhausted");
                    return Err(first_error
                        .unwrap_or(RealmError::JobBudgetExhausted { budget, remaining }));
                }
            }
            let Some(job) = self.jobs.pop() else {
                break;
            };
            ran += 1;
            if let Err(err) = self.run_job(job) {
                first_error.get_or_insert(err);
            }
        }

        debug!(ran, "checkpoint end");
        match first_error {
            Some(err) => Err(err),
            None => Ok(ran),
        }
    }

    fn run_job(
        &mut self,
        job: Job,
    ) -> RealmResult<()> {
        trace!(kind = job.kind(), "dispatch");
        match job {
            Job::Reaction { reaction, argument } => self.run_reaction(reaction, argument),
            Job::ResolveThenable {
                promise,
                thenable,
                then,
            } => self.run_resolve_thenable(promise, thenable, then),
            Job::Host(body) => {
                if let Err(exception) = body(self) {
                    warn!(error = %exception, "host job threw");
                }
                Ok(())
            }
        }
    }
}
