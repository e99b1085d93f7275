//! Scheduler 单元测试
//!
//! JobQueue ordering and counters, and checkpoint behavior of the realm.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::runtime::errors::{Exception, RealmError};
use crate::runtime::realm::Realm;
use crate::runtime::scheduler::{Job, JobQueue, QueueStats};
use crate::runtime::value::Value;
use crate::std::promise::{Reaction, Settled};
use crate::util::config::RealmConfig;

fn host_job(
    log: &Arc<Mutex<Vec<u32>>>,
    n: u32,
) -> Job {
    let log = log.clone();
    Job::Host(Box::new(move |_realm: &mut Realm| {
        log.lock().push(n);
        Ok(())
    }))
}

#[test]
fn test_job_queue_basic() {
    let queue = JobQueue::new();
    assert!(queue.is_empty());
    assert_eq!(queue.len(), 0);
    assert_eq!(queue.stats(), QueueStats::default());
}

#[test]
fn test_job_queue_is_fifo() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let mut queue = JobQueue::new();
    queue.push(host_job(&log, 1));
    queue.push(host_job(&log, 2));
    queue.push(host_job(&log, 3));
    assert_eq!(queue.len(), 3);

    let mut realm = Realm::new();
    while let Some(job) = queue.pop() {
        if let Job::Host(body) = job {
            body(&mut realm).unwrap();
        }
    }
    assert_eq!(*log.lock(), vec![1, 2, 3]);
}

#[test]
fn test_job_queue_stats() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let mut queue = JobQueue::new();
    queue.push(host_job(&log, 1));
    queue.push(host_job(&log, 2));
    queue.pop();
    queue.push(host_job(&log, 3));
    assert_eq!(
        queue.stats(),
        QueueStats {
            enqueued: 3,
            completed: 1,
            peak_len: 2,
        }
    );
}

#[test]
fn test_job_kind_and_debug() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let job = host_job(&log, 1);
    assert_eq!(job.kind(), "host");
    assert_eq!(format!("{:?}", job), "Host(..)");
}

#[test]
fn test_checkpoint_runs_jobs_queued_while_draining() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let mut realm = Realm::new();
    let outer = log.clone();
    realm.enqueue_job(move |realm| {
        outer.lock().push(1);
        let inner = outer.clone();
        realm.enqueue_job(move |_realm| {
            inner.lock().push(3);
            Ok(())
        });
        Ok(())
    });
    let second = log.clone();
    realm.enqueue_job(move |_realm| {
        second.lock().push(2);
        Ok(())
    });

    assert_eq!(realm.pending_jobs(), 2);
    assert_eq!(realm.run_jobs().unwrap(), 3);
    assert_eq!(*log.lock(), vec![1, 2, 3]);
    assert_eq!(realm.pending_jobs(), 0);
}

#[test]
fn test_empty_checkpoint() {
    let mut realm = Realm::new();
    assert_eq!(realm.run_jobs().unwrap(), 0);
}

#[test]
fn test_throwing_host_job_does_not_stop_drain() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let mut realm = Realm::new();
    realm.enqueue_job(|_realm| Err(Exception::throw("boom")));
    let after = log.clone();
    realm.enqueue_job(move |_realm| {
        after.lock().push(1);
        Ok(())
    });
    assert_eq!(realm.run_jobs().unwrap(), 2);
    assert_eq!(*log.lock(), vec![1]);
}

#[test]
fn test_budget_leaves_rest_queued() {
    let config = RealmConfig {
        max_jobs_per_checkpoint: Some(2),
        ..RealmConfig::default()
    };
    let mut realm = Realm::with_config(config);
    for _ in 0..5 {
        realm.enqueue_job(|_realm| Ok(()));
    }

    let err = realm.run_jobs().unwrap_err();
    assert_eq!(
        err,
        RealmError::JobBudgetExhausted {
            budget: 2,
            remaining: 3,
        }
    );
    assert_eq!(realm.pending_jobs(), 3);

    assert!(realm.run_jobs().is_err());
    assert_eq!(realm.pending_jobs(), 1);
    assert_eq!(realm.run_jobs().unwrap(), 1);
}

#[test]
fn test_fault_outranks_budget_exhaustion() {
    let config = RealmConfig {
        max_jobs_per_checkpoint: Some(2),
        ..RealmConfig::default()
    };
    let mut realm = Realm::with_config(config);
    let stray = Realm::new().with_resolvers().unwrap().promise;
    realm.jobs.push(Job::Reaction {
        reaction: Reaction::new(None, None, Some(stray)),
        argument: Settled::Fulfilled(Value::from(1)),
    });
    for _ in 0..3 {
        realm.enqueue_job(|_realm| Ok(()));
    }

    assert_eq!(realm.run_jobs(), Err(RealmError::UnknownPromise(stray)));
    assert_eq!(realm.pending_jobs(), 2);
    assert_eq!(realm.run_jobs(), Ok(2));
}

#[test]
fn test_budget_not_hit_when_queue_fits() {
    let config = RealmConfig {
        max_jobs_per_checkpoint: Some(2),
        ..RealmConfig::default()
    };
    let mut realm = Realm::with_config(config);
    realm.enqueue_job(|_realm| Ok(()));
    realm.enqueue_job(|_realm| Ok(()));
    assert_eq!(realm.run_jobs().unwrap(), 2);
}

#[test]
fn test_reaction_jobs_are_counted() {
    let mut realm = Realm::new();
    let p = realm.promise_resolve(Value::from(1)).unwrap();
    realm.then(p, Value::Undefined, Value::Undefined).unwrap();
    assert_eq!(realm.pending_jobs(), 1);
    assert_eq!(realm.run_jobs().unwrap(), 1);
    assert_eq!(realm.job_stats().enqueued, 1);
    assert_eq!(realm.job_stats().completed, 1);
}
