//! Configuration for visibility observers and reveal schedulers.
//!
//! Every field has a default so hosts may pass partial JSON (or nothing).

use serde::{Deserialize, Serialize};

use crate::error::RevealError;

/// Minimum intersection ratio, in `[0, 1]`, that counts as "seen".
#[derive(Copy, Clone, Debug, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Threshold(f64);

impl Threshold {
    pub const DEFAULT: Threshold = Threshold(0.1);

    pub fn new(value: f64) -> Result<Self, RevealError> {
        if value.is_finite() && (0.0..=1.0).contains(&value) {
            Ok(Threshold(value))
        } else {
            Err(RevealError::InvalidThreshold(value))
        }
    }

    #[inline]
    pub fn get(self) -> f64 {
        self.0
    }
}

impl Default for Threshold {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl TryFrom<f64> for Threshold {
    type Error = RevealError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Threshold::new(value)
    }
}

impl From<Threshold> for f64 {
    fn from(t: Threshold) -> Self {
        t.0
    }
}

/// Options forwarded to the host's intersection facility.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ObserverConfig {
    pub threshold: Threshold,
    /// CSS-style margin grown around the viewport before intersecting,
    /// e.g. `"0px 0px -10% 0px"`. `None` leaves the host default.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub root_margin: Option<String>,
}

impl Default for ObserverConfig {
    fn default() -> Self {
        Self {
            threshold: Threshold::DEFAULT,
            root_margin: None,
        }
    }
}

/// How a non-empty list is revealed once the settle interval elapses.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RevealMode {
    /// Every index becomes visible at once after the settle interval.
    #[default]
    Simultaneous,
    /// One index per firing: the first after the settle interval, each
    /// following one after the per-item delay hint.
    Staggered,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StaggerConfig {
    /// Fixed interval before anything is revealed, in milliseconds.
    pub settle_ms: u32,
    pub mode: RevealMode,
}

impl StaggerConfig {
    pub const DEFAULT_SETTLE_MS: u32 = 200;
}

impl Default for StaggerConfig {
    fn default() -> Self {
        Self {
            settle_ms: Self::DEFAULT_SETTLE_MS,
            mode: RevealMode::Simultaneous,
        }
    }
}

/// Top-level configuration accepted by hosts.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub observer: ObserverConfig,
    pub stagger: StaggerConfig,
}

impl Config {
    pub fn from_json(text: &str) -> Result<Self, RevealError> {
        Ok(serde_json::from_str(text)?)
    }
}
