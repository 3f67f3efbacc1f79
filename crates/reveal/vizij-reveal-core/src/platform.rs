//! Host facilities consumed by the core.
//!
//! Adapters (wasm, native test hosts) implement these. The core never computes
//! intersection geometry or keeps time itself; it only acquires and releases
//! handles and reacts to the reports hosts deliver back.

use crate::config::ObserverConfig;
use crate::error::RevealError;
use crate::ids::{SubscriptionId, TimerId};

/// Intersection detection for a single element per subscription.
pub trait IntersectionFacility {
    /// Opaque handle to a renderable element, owned by the host.
    type Target;

    /// Start observing `target`. Reports for the returned id are delivered to
    /// the owner until [`release`](Self::release) is called.
    fn observe(
        &mut self,
        target: &Self::Target,
        options: &ObserverConfig,
    ) -> Result<SubscriptionId, RevealError>;

    /// Stop observing. No reports for `subscription` may be delivered after this.
    fn release(&mut self, subscription: SubscriptionId);
}

/// One-shot deferred execution.
pub trait DeferredFacility {
    /// Schedule a firing after `after_ms` milliseconds.
    fn defer(&mut self, after_ms: u32) -> Result<TimerId, RevealError>;

    /// Cancel a pending firing. Unknown or already-fired ids are ignored.
    fn cancel(&mut self, timer: TimerId);

    /// Called by the owner once a firing has been consumed.
    fn complete(&mut self, _timer: TimerId) {}
}
