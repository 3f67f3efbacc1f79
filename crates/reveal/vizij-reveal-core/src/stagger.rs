//! StaggerScheduler: debounced reveal of a list's indices.
//!
//! Every change of list identity, length or delay cancels the pending firing
//! and empties the visible set. A non-empty list then arms one firing after
//! the settle interval; an empty or absent list stays empty with nothing armed.
//!
//! In [`RevealMode::Simultaneous`] (the default) the firing reveals every
//! index at once. [`RevealMode::Staggered`] reveals one index per firing and
//! re-arms with the delay hint until the list is exhausted, so at most one
//! firing is ever pending in either mode.

use log::{debug, trace, warn};

use crate::config::{RevealMode, StaggerConfig};
use crate::error::RevealError;
use crate::ids::TimerId;
use crate::inputs::{ItemList, RevealDelay};
use crate::manual::ManualClock;
use crate::outputs::{RevealEvent, VisibleIndexSet};
use crate::platform::DeferredFacility;

pub struct StaggerScheduler<D: DeferredFacility> {
    facility: D,
    config: StaggerConfig,
    /// `None` until the first update; then the last list seen (which may be absent).
    last_input: Option<(Option<ItemList>, RevealDelay)>,
    pending: Option<TimerId>,
    visible: VisibleIndexSet,
}

impl<D: DeferredFacility> StaggerScheduler<D> {
    pub fn new(facility: D, config: StaggerConfig) -> Self {
        Self {
            facility,
            config,
            last_input: None,
            pending: None,
            visible: VisibleIndexSet::new(),
        }
    }

    #[inline]
    pub fn visible(&self) -> &VisibleIndexSet {
        &self.visible
    }

    #[inline]
    pub fn is_active(&self, index: usize) -> bool {
        self.visible.contains(index)
    }

    #[inline]
    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    #[inline]
    pub fn pending_timer(&self) -> Option<TimerId> {
        self.pending
    }

    pub fn facility(&self) -> &D {
        &self.facility
    }

    /// Apply the caller's current list and delay. Does nothing unless the
    /// list identity, its length or the delay differ from the last call.
    pub fn update(
        &mut self,
        items: Option<ItemList>,
        delay: RevealDelay,
    ) -> Result<Option<RevealEvent>, RevealError> {
        if self.last_input == Some((items, delay)) {
            return Ok(None);
        }
        self.schedule(items, delay)
    }

    /// Restart the reveal for `items` unconditionally.
    ///
    /// Returns `Cleared` when previously visible indices were hidden.
    pub fn schedule(
        &mut self,
        items: Option<ItemList>,
        delay: RevealDelay,
    ) -> Result<Option<RevealEvent>, RevealError> {
        self.last_input = Some((items, delay));
        self.cancel_pending();

        let event = if self.visible.is_empty() {
            None
        } else {
            self.visible.clear();
            Some(RevealEvent::Cleared)
        };

        match items {
            Some(list) if !list.is_empty() => {
                self.arm(self.config.settle_ms)?;
            }
            _ => trace!("empty list; nothing to reveal"),
        }
        Ok(event)
    }

    /// Feed a firing delivered by the host. Stale ids are ignored.
    pub fn on_timer(&mut self, timer: TimerId) -> Option<RevealEvent> {
        if self.pending != Some(timer) {
            trace!("ignoring stale timer {:?}", timer);
            return None;
        }
        self.pending = None;
        self.facility.complete(timer);

        let (Some(list), delay) = self.last_input? else {
            return None;
        };
        let target_len = match self.config.mode {
            RevealMode::Simultaneous => list.len,
            RevealMode::Staggered => self.visible.len().saturating_add(1).min(list.len),
        };
        let revealed = self.visible.extend_to(target_len);
        debug!("revealed {:?} of {}", revealed, list.len);

        if self.visible.len() < list.len {
            if let Err(err) = self.arm(delay.as_millis()) {
                warn!("stopping staggered reveal at {}: {err}", self.visible.len());
            }
        }

        if revealed.is_empty() {
            None
        } else {
            Some(RevealEvent::Revealed {
                start: revealed.start,
                end: revealed.end,
            })
        }
    }

    /// Cancel the pending firing, if any, and forget the last input so the
    /// next [`update`](Self::update) re-arms even for the same list.
    /// Visible indices are kept.
    pub fn cancel(&mut self) {
        self.last_input = None;
        self.cancel_pending();
    }

    fn cancel_pending(&mut self) {
        if let Some(id) = self.pending.take() {
            debug!("cancelled timer {:?}", id);
            self.facility.cancel(id);
        }
    }

    fn arm(&mut self, after_ms: u32) -> Result<(), RevealError> {
        debug_assert!(self.pending.is_none());
        let id = self.facility.defer(after_ms)?;
        debug!("armed timer {:?} for {}ms", id, after_ms);
        self.pending = Some(id);
        Ok(())
    }
}

impl StaggerScheduler<ManualClock> {
    /// Move virtual time forward by `ms`, delivering every firing that falls
    /// due, including ones armed while handling earlier firings.
    pub fn advance(&mut self, ms: u64) -> Vec<RevealEvent> {
        let until = self.facility.now_ms() + ms;
        let mut events = Vec::new();
        while let Some(timer) = self.facility.pop_due(until) {
            if let Some(event) = self.on_timer(timer) {
                events.push(event);
            }
        }
        self.facility.set_now(until);
        events
    }
}

impl<D: DeferredFacility> Drop for StaggerScheduler<D> {
    fn drop(&mut self) {
        self.cancel_pending();
    }
}

impl<D> std::fmt::Debug for StaggerScheduler<D>
where
    D: DeferredFacility + std::fmt::Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StaggerScheduler")
            .field("facility", &self.facility)
            .field("config", &self.config)
            .field("last_input", &self.last_input)
            .field("pending", &self.pending)
            .field("visible", &self.visible)
            .finish()
    }
}
