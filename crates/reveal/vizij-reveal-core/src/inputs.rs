//! Input contracts delivered by hosts.
//!
//! Hosts translate platform callbacks into these values and hand them to the
//! observer or scheduler that owns the matching subscription or timer.

use serde::{Deserialize, Serialize};

use crate::error::RevealError;
use crate::ids::{ListKey, SubscriptionId};

/// One intersection change reported by the host for a subscription.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct IntersectionReport {
    pub subscription: SubscriptionId,
    /// Visible fraction of the target, in `[0, 1]`.
    pub ratio: f64,
    pub is_intersecting: bool,
}

impl IntersectionReport {
    /// Report for a target that is intersecting whenever `ratio > 0`.
    pub fn with_ratio(subscription: SubscriptionId, ratio: f64) -> Self {
        Self {
            subscription,
            ratio,
            is_intersecting: ratio > 0.0,
        }
    }
}

/// Shape of the caller's item list: its identity and its length.
/// The items themselves never reach the core.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct ItemList {
    pub key: ListKey,
    pub len: usize,
}

impl ItemList {
    pub fn new(key: ListKey, len: usize) -> Self {
        Self { key, len }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

/// Per-item delay hint in seconds.
#[derive(Copy, Clone, Debug, Default, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct RevealDelay(f64);

impl RevealDelay {
    pub const ZERO: RevealDelay = RevealDelay(0.0);

    pub fn from_secs(secs: f64) -> Result<Self, RevealError> {
        if secs.is_finite() && secs >= 0.0 {
            Ok(RevealDelay(secs))
        } else {
            Err(RevealError::InvalidDelay(secs))
        }
    }

    #[inline]
    pub fn as_secs(self) -> f64 {
        self.0
    }

    /// Delay rounded to whole milliseconds, saturating at `u32::MAX`.
    pub fn as_millis(self) -> u32 {
        let ms = (self.0 * 1000.0).round();
        if ms >= u32::MAX as f64 {
            u32::MAX
        } else {
            ms as u32
        }
    }
}

impl TryFrom<f64> for RevealDelay {
    type Error = RevealError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        RevealDelay::from_secs(value)
    }
}

impl From<RevealDelay> for f64 {
    fn from(d: RevealDelay) -> Self {
        d.0
    }
}
