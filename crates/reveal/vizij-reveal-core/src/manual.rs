//! Deterministic facilities for native hosts and tests.
//!
//! `ManualClock` keeps virtual time that only moves when told to;
//! `ManualIntersections` records subscriptions and lets the caller decide
//! which reports to deliver.

use crate::config::ObserverConfig;
use crate::error::RevealError;
use crate::ids::{IdAllocator, SubscriptionId, TimerId};
use crate::platform::{DeferredFacility, IntersectionFacility};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct PendingTimer {
    id: TimerId,
    due_ms: u64,
}

/// Virtual-time implementation of [`DeferredFacility`].
#[derive(Debug, Default)]
pub struct ManualClock {
    ids: IdAllocator,
    now_ms: u64,
    pending: Vec<PendingTimer>,
    cancelled: usize,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    /// Number of firings scheduled but neither fired nor cancelled.
    #[inline]
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Total number of cancellations that removed a pending firing.
    #[inline]
    pub fn cancelled_count(&self) -> usize {
        self.cancelled
    }

    /// Remove and return the earliest firing due at or before `until_ms`,
    /// moving virtual time to its due time. Ties fire in scheduling order.
    pub fn pop_due(&mut self, until_ms: u64) -> Option<TimerId> {
        let (idx, timer) = self
            .pending
            .iter()
            .copied()
            .enumerate()
            .filter(|(_, t)| t.due_ms <= until_ms)
            .min_by_key(|(_, t)| t.due_ms)?;
        self.pending.remove(idx);
        self.now_ms = self.now_ms.max(timer.due_ms);
        Some(timer.id)
    }

    /// Move virtual time forward, returning every firing that became due.
    /// Firings scheduled by the caller while handling these are not included.
    pub fn advance(&mut self, ms: u64) -> Vec<TimerId> {
        let until = self.now_ms + ms;
        let mut due = Vec::new();
        while let Some(id) = self.pop_due(until) {
            due.push(id);
        }
        self.now_ms = until;
        due
    }

    pub(crate) fn set_now(&mut self, now_ms: u64) {
        self.now_ms = self.now_ms.max(now_ms);
    }
}

impl DeferredFacility for ManualClock {
    fn defer(&mut self, after_ms: u32) -> Result<TimerId, RevealError> {
        let id = self.ids.alloc_timer();
        self.pending.push(PendingTimer {
            id,
            due_ms: self.now_ms + u64::from(after_ms),
        });
        Ok(id)
    }

    fn cancel(&mut self, timer: TimerId) {
        let before = self.pending.len();
        self.pending.retain(|t| t.id != timer);
        if self.pending.len() != before {
            self.cancelled += 1;
        }
    }
}

/// One live subscription recorded by [`ManualIntersections`].
#[derive(Clone, Debug)]
pub struct ManualSubscription<T> {
    pub id: SubscriptionId,
    pub target: T,
    pub options: ObserverConfig,
}

/// Recording implementation of [`IntersectionFacility`] for any cloneable target.
#[derive(Debug)]
pub struct ManualIntersections<T> {
    ids: IdAllocator,
    active: Vec<ManualSubscription<T>>,
    acquired: usize,
    released: Vec<SubscriptionId>,
}

impl<T> Default for ManualIntersections<T> {
    fn default() -> Self {
        Self {
            ids: IdAllocator::new(),
            active: Vec::new(),
            acquired: 0,
            released: Vec::new(),
        }
    }
}

impl<T> ManualIntersections<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active(&self) -> &[ManualSubscription<T>] {
        &self.active
    }

    /// Total subscriptions ever acquired.
    #[inline]
    pub fn acquired(&self) -> usize {
        self.acquired
    }

    /// Subscriptions released so far, in release order.
    pub fn released(&self) -> &[SubscriptionId] {
        &self.released
    }
}

impl<T: Clone> IntersectionFacility for ManualIntersections<T> {
    type Target = T;

    fn observe(
        &mut self,
        target: &T,
        options: &ObserverConfig,
    ) -> Result<SubscriptionId, RevealError> {
        let id = self.ids.alloc_subscription();
        self.active.push(ManualSubscription {
            id,
            target: target.clone(),
            options: options.clone(),
        });
        self.acquired += 1;
        Ok(id)
    }

    fn release(&mut self, subscription: SubscriptionId) {
        let before = self.active.len();
        self.active.retain(|s| s.id != subscription);
        if self.active.len() != before {
            self.released.push(subscription);
        }
    }
}
