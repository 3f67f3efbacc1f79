use std::cell::RefCell;
use std::rc::{Rc, Weak};

use js_sys::{Array, Function};
use log::warn;
use serde_wasm_bindgen as swb;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Element, IntersectionObserver, IntersectionObserverEntry};

use vizij_reveal_core::{IntersectionReport, ObserverConfig, Threshold, VisibilityObserver};

use crate::browser::{BrowserIntersections, EntriesCallback};
use crate::{jsvalue_is_undefined_or_null, notify};

struct VisibilityState {
    observer: VisibilityObserver<BrowserIntersections>,
    listener: Option<Function>,
}

/// Scroll-in latch for one element.
///
/// ```javascript
/// const seen = new VizijVisibility(0.1);
/// seen.on_change(() => section.classList.add("animate-in"));
/// seen.bind(section);
/// ```
#[wasm_bindgen]
pub struct VizijVisibility {
    state: Rc<RefCell<VisibilityState>>,
}

fn observer_config(config: JsValue) -> Result<ObserverConfig, JsError> {
    if jsvalue_is_undefined_or_null(&config) {
        return Ok(ObserverConfig::default());
    }
    if let Some(threshold) = config.as_f64() {
        return Ok(ObserverConfig {
            threshold: Threshold::new(threshold)?,
            ..ObserverConfig::default()
        });
    }
    swb::from_value(config).map_err(|e| JsError::new(&format!("observer config error: {e}")))
}

fn deliver_entries(
    weak: &Weak<RefCell<VisibilityState>>,
    entries: Array,
    io: &IntersectionObserver,
) {
    let Some(state) = weak.upgrade() else {
        return;
    };
    let (fired, listener) = {
        let Ok(mut s) = state.try_borrow_mut() else {
            warn!("intersection callback re-entered; dropping entries");
            return;
        };
        let Some(subscription) = s.observer.facility().subscription_for(io) else {
            return;
        };
        let mut fired = false;
        for entry in entries.iter() {
            let entry: IntersectionObserverEntry = entry.unchecked_into();
            let report = IntersectionReport {
                subscription,
                ratio: entry.intersection_ratio(),
                is_intersecting: entry.is_intersecting(),
            };
            fired |= s.observer.on_intersection(&report).is_some();
        }
        (fired, s.listener.clone())
    };
    if fired {
        notify(listener.as_ref(), &JsValue::TRUE);
    }
}

#[wasm_bindgen]
impl VizijVisibility {
    /// Create an unbound observer. Pass a threshold number, an
    /// `{ threshold, root_margin }` object, or undefined/null for defaults.
    #[wasm_bindgen(constructor)]
    pub fn new(config: JsValue) -> Result<VizijVisibility, JsError> {
        console_error_panic_hook::set_once();
        let cfg = observer_config(config)?;

        let state = Rc::new_cyclic(|weak: &Weak<RefCell<VisibilityState>>| {
            let weak = weak.clone();
            let callback: EntriesCallback = Closure::wrap(Box::new(
                move |entries: Array, io: IntersectionObserver| {
                    deliver_entries(&weak, entries, &io);
                },
            )
                as Box<dyn FnMut(Array, IntersectionObserver)>);
            RefCell::new(VisibilityState {
                observer: VisibilityObserver::new(BrowserIntersections::new(callback), cfg),
                listener: None,
            })
        });

        Ok(VizijVisibility { state })
    }

    /// Observe `element`, replacing any previously bound element.
    pub fn bind(&self, element: Element) -> Result<(), JsError> {
        self.state.borrow_mut().observer.bind(element)?;
        Ok(())
    }

    pub fn unbind(&self) {
        self.state.borrow_mut().observer.unbind();
    }

    /// Change the threshold; an existing subscription is replaced.
    #[wasm_bindgen(js_name = set_threshold)]
    pub fn set_threshold(&self, threshold: f64) -> Result<(), JsError> {
        let threshold = Threshold::new(threshold)?;
        self.state.borrow_mut().observer.set_threshold(threshold)?;
        Ok(())
    }

    #[wasm_bindgen(js_name = is_visible)]
    pub fn is_visible(&self) -> bool {
        self.state.borrow().observer.is_visible()
    }

    pub fn threshold(&self) -> f64 {
        self.state.borrow().observer.threshold().get()
    }

    #[wasm_bindgen(js_name = is_bound)]
    pub fn is_bound(&self) -> bool {
        self.state.borrow().observer.is_bound()
    }

    /// Register `listener()` to run once the element is first seen.
    /// Pass undefined to remove it.
    #[wasm_bindgen(js_name = on_change)]
    pub fn on_change(&self, listener: Option<Function>) {
        self.state.borrow_mut().listener = listener;
    }

    /// Release the subscription and listener. The instance stays usable.
    pub fn dispose(&self) {
        let mut s = self.state.borrow_mut();
        s.observer.unbind();
        s.listener = None;
    }
}
