//! FIFO job queue
//!
//! Single-consumer queue owned by the realm. Jobs run strictly in the order
//! they were pushed.

use std::collections::VecDeque;

use super::job::Job;

/// Counters kept by a [`JobQueue`].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct QueueStats {
    /// Jobs ever pushed
    pub enqueued: usize,
    /// Jobs ever taken off the queue
    pub completed: usize,
    /// Largest length observed
    pub peak_len: usize,
}

/// First-in first-out queue of pending jobs.
#[derive(Debug, Default)]
pub struct JobQueue {
    inner: VecDeque<Job>,
    stats: QueueStats,
}

impl JobQueue {
    /// Create a new empty queue.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Push a job to the back of the queue.
    #[inline]
    pub fn push(
        &mut self,
        job: Job,
    ) {
        self.inner.push_back(job);
        self.stats.enqueued += 1;
        self.stats.peak_len = self.stats.peak_len.max(self.inner.len());
    }

    /// Pop the oldest job.
    #[inline]
    pub fn pop(&mut self) -> Option<Job> {
        let job = self.inner.pop_front();
        if job.is_some() {
            self.stats.completed += 1;
        }
        job
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub fn stats(&self) -> QueueStats {
        self.stats
    }
}
