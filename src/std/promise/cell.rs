//! Settlement cells
//!
//! A cell is the mutable state behind one promise: its state tag, its result
//! and the reactions waiting for it. Cells live in an arena owned by the realm
//! and are addressed by [`PromiseId`]; every closure that needs to settle or
//! observe a cell captures the id, never the cell itself.

use std::fmt;
use std::sync::atomic::{AtomicU32, Ordering};

use smallvec::SmallVec;
use tracing::trace;

use super::reaction::Reaction;
use crate::runtime::errors::{RealmError, RealmResult};
use crate::runtime::realm::Realm;
use crate::runtime::scheduler::Job;
use crate::runtime::value::Value;

/// Arena tags handed out so far; every arena takes the next one.
static NEXT_ARENA: AtomicU32 = AtomicU32::new(0);

/// Handle to a settlement cell.
///
/// Carries the tag of the arena that allocated it, so a handle never
/// resolves against another realm's cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PromiseId {
    pub(crate) arena: u32,
    pub(crate) index: u32,
}

impl PromiseId {
    pub(crate) fn new(
        arena: u32,
        index: u32,
    ) -> Self {
        Self { arena, index }
    }

    /// Slot index within the owning arena.
    #[inline]
    pub fn inner(&self) -> u32 {
        self.index
    }

    /// Tag of the owning arena
    #[inline]
    pub fn arena(&self) -> u32 {
        self.arena
    }
}

impl fmt::Display for PromiseId {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        write!(f, "Promise({})", self.index)
    }
}

/// Promise state tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PromiseState {
    /// Not settled yet (possibly locked in to a thenable).
    Pending,
    /// Settled with a value.
    Fulfilled,
    /// Settled with a reason.
    Rejected,
}

/// A final disposition and its payload.
#[derive(Debug, Clone, PartialEq)]
pub enum Settled {
    /// Fulfillment value
    Fulfilled(Value),
    /// Rejection reason
    Rejected(Value),
}

impl Settled {
    /// State tag for this disposition
    pub fn state(&self) -> PromiseState {
        match self {
            Settled::Fulfilled(_) => PromiseState::Fulfilled,
            Settled::Rejected(_) => PromiseState::Rejected,
        }
    }

    /// The stored value or reason
    pub fn value(&self) -> &Value {
        match self {
            Settled::Fulfilled(v) | Settled::Rejected(v) => v,
        }
    }
}

/// Outcome of registering a reaction against a cell.
pub(crate) enum Registration {
    /// The cell is pending; the reaction waits in the queue.
    Queued,
    /// The cell already settled; the reaction must be delivered right away.
    Deliver(Reaction, Settled),
}

/// The state of one deferred value.
#[derive(Debug, Default)]
pub struct SettlementCell {
    /// `None` while pending. Written once.
    result: Option<Settled>,
    /// Reactions in registration order. Always empty once settled.
    reactions: SmallVec<[Reaction; 2]>,
    /// Whether any reaction was ever registered (rejection tracking).
    is_handled: bool,
}

impl SettlementCell {
    /// Current state tag
    pub fn state(&self) -> PromiseState {
        self.result
            .as_ref()
            .map(Settled::state)
            .unwrap_or(PromiseState::Pending)
    }

    /// Whether the cell is still pending
    #[inline]
    pub fn is_pending(&self) -> bool {
        self.result.is_none()
    }

    /// Stored disposition, absent while pending
    pub fn result(&self) -> Option<&Settled> {
        self.result.as_ref()
    }

    /// Whether a reaction was ever registered
    #[inline]
    pub fn is_handled(&self) -> bool {
        self.is_handled
    }

    /// Number of reactions waiting for settlement
    pub fn pending_reactions(&self) -> usize {
        self.reactions.len()
    }

    /// Transition out of `Pending`. Returns the drained reaction queue, or
    /// `None` if the cell had already settled (the call is then a no-op).
    pub(crate) fn settle(
        &mut self,
        settled: Settled,
    ) -> Option<SmallVec<[Reaction; 2]>> {
        if self.result.is_some() {
            return None;
        }
        self.result = Some(settled);
        Some(std::mem::take(&mut self.reactions))
    }

    /// Queue a reaction, or hand it back for immediate delivery when settled.
    pub(crate) fn register(
        &mut self,
        reaction: Reaction,
    ) -> Registration {
        self.is_handled = true;
        match &self.result {
            None => {
                self.reactions.push(reaction);
                Registration::Queued
            }
            Some(settled) => Registration::Deliver(reaction, settled.clone()),
        }
    }
}

/// Arena of settlement cells.
#[derive(Debug)]
pub struct PromiseArena {
    tag: u32,
    cells: Vec<SettlementCell>,
}

impl Default for PromiseArena {
    fn default() -> Self {
        Self::new()
    }
}

impl PromiseArena {
    /// Create an empty arena with a fresh tag
    pub fn new() -> Self {
        Self {
            tag: NEXT_ARENA.fetch_add(1, Ordering::Relaxed),
            cells: Vec::new(),
        }
    }

    /// Tag stamped on every handle this arena allocates
    #[inline]
    pub fn tag(&self) -> u32 {
        self.tag
    }

    /// Allocate a fresh pending cell
    pub fn alloc(&mut self) -> RealmResult<PromiseId> {
        let index = next_index(self.cells.len())?;
        self.cells.push(SettlementCell::default());
        Ok(PromiseId::new(self.tag, index))
    }

    /// Whether `id` was allocated by this arena
    #[inline]
    pub fn contains(
        &self,
        id: PromiseId,
    ) -> bool {
        id.arena == self.tag && (id.index as usize) < self.cells.len()
    }

    /// Look up a cell
    pub fn get(
        &self,
        id: PromiseId,
    ) -> RealmResult<&SettlementCell> {
        if id.arena != self.tag {
            return Err(RealmError::UnknownPromise(id));
        }
        self.cells
            .get(id.index as usize)
            .ok_or(RealmError::UnknownPromise(id))
    }

    /// Look up a cell for mutation
    pub fn get_mut(
        &mut self,
        id: PromiseId,
    ) -> RealmResult<&mut SettlementCell> {
        if id.arena != self.tag {
            return Err(RealmError::UnknownPromise(id));
        }
        self.cells
            .get_mut(id.index as usize)
            .ok_or(RealmError::UnknownPromise(id))
    }

    /// Number of cells ever allocated
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Whether no cell was allocated yet
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

/// Index for the cell after `len` existing ones.
pub(crate) fn next_index(len: usize) -> RealmResult<u32> {
    u32::try_from(len).map_err(|_| RealmError::ArenaExhausted(len))
}

// ============================================================================
// State transitions
// ============================================================================

impl Realm {
    /// Allocate a pending cell.
    pub(crate) fn new_pending(&mut self) -> RealmResult<PromiseId> {
        let id = self.promises.alloc()?;
        trace!(promise = %id, "allocated");
        Ok(id)
    }

    /// Settle `id` with `value`. No-op if already settled.
    pub(crate) fn fulfill_promise(
        &mut self,
        id: PromiseId,
        value: Value,
    ) -> RealmResult<()> {
        self.settle_promise(id, Settled::Fulfilled(value))
    }

    /// Reject `id` with `reason`. No-op if already settled.
    pub(crate) fn reject_promise(
        &mut self,
        id: PromiseId,
        reason: Value,
    ) -> RealmResult<()> {
        self.settle_promise(id, Settled::Rejected(reason))
    }

    /// The single place where a cell leaves `Pending`. The drained reactions
    /// are enqueued as jobs in registration order; none runs here.
    fn settle_promise(
        &mut self,
        id: PromiseId,
        settled: Settled,
    ) -> RealmResult<()> {
        let cell = self.promises.get_mut(id)?;
        let Some(reactions) = cell.settle(settled.clone()) else {
            trace!(promise = %id, "already settled, ignoring");
            return Ok(());
        };
        let is_handled = cell.is_handled();
        trace!(promise = %id, state = ?settled.state(), reactions = reactions.len(), "settled");

        if let Settled::Rejected(reason) = &settled {
            if !is_handled {
                self.tracker.on_reject(id, reason.clone());
            }
        }

        for reaction in reactions {
            self.jobs.push(Job::Reaction {
                reaction,
                argument: settled.clone(),
            });
        }
        Ok(())
    }

    /// Register `reaction` against `id`, delivering it as a job if `id` has
    /// already settled.
    pub(crate) fn register_reaction(
        &mut self,
        id: PromiseId,
        reaction: Reaction,
    ) -> RealmResult<()> {
        let cell = self.promises.get_mut(id)?;
        let was_handled = cell.is_handled();
        match cell.register(reaction) {
            Registration::Queued => {}
            Registration::Deliver(reaction, argument) => {
                if !was_handled && argument.state() == PromiseState::Rejected {
                    self.tracker.on_handle(id);
                }
                self.jobs.push(Job::Reaction { reaction, argument });
            }
        }
        Ok(())
    }

    /// Current state of a promise
    pub fn promise_state(
        &self,
        id: PromiseId,
    ) -> RealmResult<PromiseState> {
        Ok(self.promises.get(id)?.state())
    }

    /// Settled disposition of a promise, `None` while pending
    pub fn promise_result(
        &self,
        id: PromiseId,
    ) -> RealmResult<Option<Settled>> {
        Ok(self.promises.get(id)?.result().cloned())
    }
}
