//! VisibilityObserver: "has this element ever been seen" for one target.
//!
//! The observer owns its facility and holds at most one subscription, keyed to
//! the bound target and the current threshold. Rebinding or changing the
//! threshold releases the old subscription before acquiring a new one, and
//! dropping the observer releases whatever is still held.

use log::{debug, trace};
use serde::{Deserialize, Serialize};

use crate::config::{ObserverConfig, Threshold};
use crate::error::RevealError;
use crate::ids::SubscriptionId;
use crate::inputs::IntersectionReport;
use crate::outputs::VisibilityEvent;
use crate::platform::IntersectionFacility;

/// Single-writer latch. The only transition is `Hidden -> Seen`.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum VisibilityLatch {
    #[default]
    Hidden,
    Seen,
}

impl VisibilityLatch {
    #[inline]
    pub fn is_seen(self) -> bool {
        matches!(self, VisibilityLatch::Seen)
    }

    /// Close the latch. Returns true only on the transition.
    fn close(&mut self) -> bool {
        match self {
            VisibilityLatch::Hidden => {
                *self = VisibilityLatch::Seen;
                true
            }
            VisibilityLatch::Seen => false,
        }
    }
}

pub struct VisibilityObserver<F: IntersectionFacility> {
    facility: F,
    options: ObserverConfig,
    target: Option<F::Target>,
    subscription: Option<SubscriptionId>,
    latch: VisibilityLatch,
}

impl<F: IntersectionFacility> VisibilityObserver<F> {
    pub fn new(facility: F, options: ObserverConfig) -> Self {
        Self {
            facility,
            options,
            target: None,
            subscription: None,
            latch: VisibilityLatch::Hidden,
        }
    }

    #[inline]
    pub fn is_visible(&self) -> bool {
        self.latch.is_seen()
    }

    #[inline]
    pub fn threshold(&self) -> Threshold {
        self.options.threshold
    }

    #[inline]
    pub fn is_bound(&self) -> bool {
        self.target.is_some()
    }

    #[inline]
    pub fn active_subscription(&self) -> Option<SubscriptionId> {
        self.subscription
    }

    pub fn facility(&self) -> &F {
        &self.facility
    }

    /// Attach the observer to `target`, replacing any previous target.
    pub fn bind(&mut self, target: F::Target) -> Result<(), RevealError> {
        self.release_subscription();
        self.target = Some(target);
        self.acquire_subscription()
    }

    /// Detach from the current target. The latch is kept.
    pub fn unbind(&mut self) {
        self.release_subscription();
        self.target = None;
    }

    /// Change the threshold. Resubscribes only if a target is bound and the
    /// value actually changed.
    pub fn set_threshold(&mut self, threshold: Threshold) -> Result<(), RevealError> {
        if threshold == self.options.threshold {
            return Ok(());
        }
        self.options.threshold = threshold;
        if self.target.is_some() {
            self.release_subscription();
            self.acquire_subscription()?;
        }
        Ok(())
    }

    /// Feed one intersection report. Reports from released subscriptions and
    /// reports after the latch closed are ignored.
    pub fn on_intersection(&mut self, report: &IntersectionReport) -> Option<VisibilityEvent> {
        if self.subscription != Some(report.subscription) {
            trace!(
                "ignoring report for stale subscription {:?}",
                report.subscription
            );
            return None;
        }
        if self.latch.is_seen() {
            return None;
        }
        if !report.is_intersecting || report.ratio < self.options.threshold.get() {
            return None;
        }
        if self.latch.close() {
            debug!(
                "subscription {:?} became visible at ratio {:.3}",
                report.subscription, report.ratio
            );
            Some(VisibilityEvent::BecameVisible)
        } else {
            None
        }
    }

    fn acquire_subscription(&mut self) -> Result<(), RevealError> {
        debug_assert!(self.subscription.is_none());
        if let Some(target) = self.target.as_ref() {
            let id = self.facility.observe(target, &self.options)?;
            debug!(
                "acquired subscription {:?} at threshold {}",
                id,
                self.options.threshold.get()
            );
            self.subscription = Some(id);
        }
        Ok(())
    }

    fn release_subscription(&mut self) {
        if let Some(id) = self.subscription.take() {
            debug!("released subscription {:?}", id);
            self.facility.release(id);
        }
    }
}

impl<F: IntersectionFacility> Drop for VisibilityObserver<F> {
    fn drop(&mut self) {
        self.release_subscription();
    }
}

impl<F> std::fmt::Debug for VisibilityObserver<F>
where
    F: IntersectionFacility + std::fmt::Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VisibilityObserver")
            .field("facility", &self.facility)
            .field("options", &self.options)
            .field("bound", &self.target.is_some())
            .field("subscription", &self.subscription)
            .field("latch", &self.latch)
            .finish()
    }
}
