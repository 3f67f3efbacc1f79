//! Vizij Reveal Core (engine-agnostic)
//!
//! Scroll-triggered reveal for page sections: a [`VisibilityObserver`] that
//! latches once its target crosses a viewport threshold, and a
//! [`StaggerScheduler`] that reveals a list's indices after a debounced settle
//! interval. Hosts supply intersection detection and deferred execution through
//! the traits in [`platform`]; the wasm adapter backs them with browser APIs.

pub mod config;
pub mod error;
pub mod ids;
pub mod inputs;
pub mod manual;
pub mod outputs;
pub mod platform;
pub mod stagger;
pub mod visibility;

// Re-exports for consumers (adapters)
pub use config::{Config, ObserverConfig, RevealMode, StaggerConfig, Threshold};
pub use error::RevealError;
pub use ids::{IdAllocator, ListKey, SubscriptionId, TimerId};
pub use inputs::{IntersectionReport, ItemList, RevealDelay};
pub use manual::{ManualClock, ManualIntersections, ManualSubscription};
pub use outputs::{RevealEvent, VisibilityEvent, VisibleIndexSet};
pub use platform::{DeferredFacility, IntersectionFacility};
pub use stagger::StaggerScheduler;
pub use visibility::{VisibilityLatch, VisibilityObserver};
