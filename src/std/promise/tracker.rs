//! Unhandled-rejection bookkeeping
//!
//! A promise that rejects before any reaction was registered on it is
//! recorded here; registering a reaction later removes it again. What counts
//! as "unhandled" in the end is the host's call: it drains the record with
//! [`Realm::take_unhandled_rejections`] whenever it wants to report.

use indexmap::IndexMap;
use tracing::warn;

use super::cell::PromiseId;
use crate::runtime::realm::Realm;
use crate::runtime::value::Value;

/// Rejected promises that currently have no reaction, in rejection order.
#[derive(Debug, Default)]
pub struct RejectionTracker {
    enabled: bool,
    pending: IndexMap<PromiseId, Value>,
}

impl RejectionTracker {
    /// Create a tracker
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            pending: IndexMap::new(),
        }
    }

    /// Whether rejections are being recorded
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// A promise rejected while unhandled.
    pub fn on_reject(
        &mut self,
        id: PromiseId,
        reason: Value,
    ) {
        if self.enabled {
            self.pending.insert(id, reason);
        }
    }

    /// A reaction was registered on a rejected, previously unhandled promise.
    pub fn on_handle(
        &mut self,
        id: PromiseId,
    ) {
        self.pending.shift_remove(&id);
    }

    /// Number of outstanding unhandled rejections
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// Whether nothing is outstanding
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Drain the outstanding rejections.
    pub fn take(&mut self) -> Vec<(PromiseId, Value)> {
        self.pending.drain(..).collect()
    }
}

impl Realm {
    /// Report and clear the promises that rejected without any reaction.
    pub fn take_unhandled_rejections(&mut self) -> Vec<(PromiseId, Value)> {
        let rejections = self.tracker.take();
        for (id, reason) in &rejections {
            warn!(promise = %id, reason = %reason, "unhandled promise rejection");
        }
        rejections
    }
}
