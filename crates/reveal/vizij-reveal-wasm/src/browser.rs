//! Browser-backed facilities: `IntersectionObserver` and `setTimeout`.
//!
//! Each facility owns exactly one JS closure, alive as long as the facility.
//! Releasing a subscription or cancelling a timer only touches JS handles.

use hashbrown::HashMap;
use js_sys::{Array, Object};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Element, IntersectionObserver, IntersectionObserverInit, Window};

use vizij_reveal_core::{
    DeferredFacility, IdAllocator, IntersectionFacility, ObserverConfig, RevealError,
    SubscriptionId, TimerId,
};

pub(crate) type EntriesCallback = Closure<dyn FnMut(Array, IntersectionObserver)>;
pub(crate) type TimerCallback = Closure<dyn FnMut(JsValue)>;

pub(crate) struct BrowserIntersections {
    ids: IdAllocator,
    callback: EntriesCallback,
    live: HashMap<SubscriptionId, IntersectionObserver>,
}

impl BrowserIntersections {
    pub(crate) fn new(callback: EntriesCallback) -> Self {
        Self {
            ids: IdAllocator::new(),
            callback,
            live: HashMap::new(),
        }
    }

    /// Map the observer passed to a callback back to its subscription.
    pub(crate) fn subscription_for(&self, observer: &IntersectionObserver) -> Option<SubscriptionId> {
        self.live
            .iter()
            .find(|(_, live)| Object::is(live, observer))
            .map(|(id, _)| *id)
    }
}

impl IntersectionFacility for BrowserIntersections {
    type Target = Element;

    fn observe(
        &mut self,
        target: &Element,
        options: &ObserverConfig,
    ) -> Result<SubscriptionId, RevealError> {
        let init = IntersectionObserverInit::new();
        init.set_threshold(&JsValue::from_f64(options.threshold.get()));
        if let Some(margin) = options.root_margin.as_deref() {
            init.set_root_margin(margin);
        }
        let observer =
            IntersectionObserver::new_with_options(self.callback.as_ref().unchecked_ref(), &init)
                .map_err(|e| RevealError::Platform(format!("IntersectionObserver: {e:?}")))?;
        observer.observe(target);

        let id = self.ids.alloc_subscription();
        self.live.insert(id, observer);
        Ok(id)
    }

    fn release(&mut self, subscription: SubscriptionId) {
        if let Some(observer) = self.live.remove(&subscription) {
            observer.disconnect();
        }
    }
}

impl Drop for BrowserIntersections {
    fn drop(&mut self) {
        for (_, observer) in self.live.drain() {
            observer.disconnect();
        }
    }
}

pub(crate) struct BrowserClock {
    window: Window,
    ids: IdAllocator,
    callback: TimerCallback,
    handles: HashMap<TimerId, i32>,
}

impl BrowserClock {
    /// The callback receives the fired `TimerId` as its single argument;
    /// decode it with [`BrowserClock::timer_from_js`].
    pub(crate) fn new(window: Window, callback: TimerCallback) -> Self {
        Self {
            window,
            ids: IdAllocator::new(),
            callback,
            handles: HashMap::new(),
        }
    }

    pub(crate) fn timer_from_js(value: &JsValue) -> Option<TimerId> {
        value.as_f64().map(|v| TimerId(v as u32))
    }
}

impl DeferredFacility for BrowserClock {
    fn defer(&mut self, after_ms: u32) -> Result<TimerId, RevealError> {
        let id = self.ids.alloc_timer();
        let timeout = i32::try_from(after_ms).unwrap_or(i32::MAX);
        let handle = self
            .window
            .set_timeout_with_callback_and_timeout_and_arguments_1(
                self.callback.as_ref().unchecked_ref(),
                timeout,
                &JsValue::from(id.0),
            )
            .map_err(|e| RevealError::Platform(format!("setTimeout: {e:?}")))?;
        self.handles.insert(id, handle);
        Ok(id)
    }

    fn cancel(&mut self, timer: TimerId) {
        if let Some(handle) = self.handles.remove(&timer) {
            self.window.clear_timeout_with_handle(handle);
        }
    }

    fn complete(&mut self, timer: TimerId) {
        self.handles.remove(&timer);
    }
}

impl Drop for BrowserClock {
    fn drop(&mut self) {
        for (_, handle) in self.handles.drain() {
            self.window.clear_timeout_with_handle(handle);
        }
    }
}
