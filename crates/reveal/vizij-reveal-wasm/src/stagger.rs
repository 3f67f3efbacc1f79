use std::cell::RefCell;
use std::rc::{Rc, Weak};

use js_sys::{Function, Object, Reflect};
use log::warn;
use serde_wasm_bindgen as swb;
use wasm_bindgen::prelude::*;

use vizij_reveal_core::{
    IdAllocator, ItemList, ListKey, RevealDelay, StaggerConfig, StaggerScheduler,
};

use crate::browser::{BrowserClock, TimerCallback};
use crate::{jsvalue_is_undefined_or_null, notify};

/// `2^32 - 1`, the largest length a JS array can have.
const MAX_ARRAY_LENGTH: f64 = 4_294_967_295.0;

struct StaggerState {
    scheduler: StaggerScheduler<BrowserClock>,
    keys: IdAllocator,
    /// Last list seen, compared with `Object.is` to detect a new reference.
    last_items: JsValue,
    last_key: Option<ListKey>,
    listener: Option<Function>,
}

impl StaggerState {
    fn list_for(&mut self, items: &JsValue) -> Option<ItemList> {
        if jsvalue_is_undefined_or_null(items) {
            self.last_items = JsValue::UNDEFINED;
            self.last_key = None;
            return None;
        }
        // Anything without a numeric length is treated as empty; lengths are
        // capped at the largest valid JS array length.
        let len = Reflect::get(items, &JsValue::from_str("length"))
            .ok()
            .and_then(|v| v.as_f64())
            .filter(|n| n.is_finite() && *n > 0.0)
            .map(|n| n.min(MAX_ARRAY_LENGTH) as usize)
            .unwrap_or(0);

        let key = match self.last_key {
            Some(key) if Object::is(&self.last_items, items) => key,
            _ => {
                let key = self.keys.alloc_list();
                self.last_items = items.clone();
                self.last_key = Some(key);
                key
            }
        };
        Some(ItemList::new(key, len))
    }

    fn visible_count(&self) -> JsValue {
        JsValue::from_f64(self.scheduler.visible().len() as f64)
    }
}

/// Debounced reveal of list indices.
///
/// ```javascript
/// const reveal = new VizijStagger();
/// reveal.on_change((count) => render(items.slice(0, count)));
/// reveal.update(features, 0.1);
/// ```
#[wasm_bindgen]
pub struct VizijStagger {
    state: Rc<RefCell<StaggerState>>,
}

fn stagger_config(config: JsValue) -> Result<StaggerConfig, JsError> {
    if jsvalue_is_undefined_or_null(&config) {
        return Ok(StaggerConfig::default());
    }
    swb::from_value(config).map_err(|e| JsError::new(&format!("stagger config error: {e}")))
}

fn deliver_timer(weak: &Weak<RefCell<StaggerState>>, arg: JsValue) {
    let Some(timer) = BrowserClock::timer_from_js(&arg) else {
        return;
    };
    let Some(state) = weak.upgrade() else {
        return;
    };
    let (payload, listener) = {
        let Ok(mut s) = state.try_borrow_mut() else {
            warn!("timer callback re-entered; dropping {:?}", timer);
            return;
        };
        if s.scheduler.on_timer(timer).is_none() {
            return;
        }
        (s.visible_count(), s.listener.clone())
    };
    notify(listener.as_ref(), &payload);
}

#[wasm_bindgen]
impl VizijStagger {
    /// Create a scheduler. Pass `{ settle_ms, mode: "simultaneous" | "staggered" }`
    /// or undefined/null for defaults (200ms, simultaneous).
    #[wasm_bindgen(constructor)]
    pub fn new(config: JsValue) -> Result<VizijStagger, JsError> {
        console_error_panic_hook::set_once();
        let cfg = stagger_config(config)?;
        let window = web_sys::window().ok_or_else(|| JsError::new("no global window"))?;

        let state = Rc::new_cyclic(|weak: &Weak<RefCell<StaggerState>>| {
            let weak = weak.clone();
            let callback: TimerCallback = Closure::wrap(Box::new(move |arg: JsValue| {
                deliver_timer(&weak, arg);
            }) as Box<dyn FnMut(JsValue)>);
            RefCell::new(StaggerState {
                scheduler: StaggerScheduler::new(BrowserClock::new(window, callback), cfg),
                keys: IdAllocator::new(),
                last_items: JsValue::UNDEFINED,
                last_key: None,
                listener: None,
            })
        });

        Ok(VizijStagger { state })
    }

    /// Apply the current item list and per-item delay hint (seconds).
    /// A new array reference, a new length or a new delay restarts the reveal.
    ///
    /// The listener runs after the internal state is released, so it may call
    /// back into this object.
    pub fn update(&self, items: JsValue, delay: f64) -> Result<(), JsError> {
        let delay = RevealDelay::from_secs(delay)?;
        let (payload, listener) = {
            let mut s = self.state.borrow_mut();
            let list = s.list_for(&items);
            if s.scheduler.update(list, delay)?.is_none() {
                return Ok(());
            }
            (s.visible_count(), s.listener.clone())
        };
        notify(listener.as_ref(), &payload);
        Ok(())
    }

    #[wasm_bindgen(js_name = visible_count)]
    pub fn visible_count(&self) -> u32 {
        self.state.borrow().scheduler.visible().len() as u32
    }

    /// Materializes `[0, visible_count)`; prefer `visible_count` or
    /// `is_active` for long lists.
    #[wasm_bindgen(js_name = visible_indices)]
    pub fn visible_indices(&self) -> Vec<u32> {
        self.state
            .borrow()
            .scheduler
            .visible()
            .iter()
            .map(|i| i as u32)
            .collect()
    }

    #[wasm_bindgen(js_name = is_active)]
    pub fn is_active(&self, index: u32) -> bool {
        self.state.borrow().scheduler.is_active(index as usize)
    }

    #[wasm_bindgen(js_name = has_pending)]
    pub fn has_pending(&self) -> bool {
        self.state.borrow().scheduler.has_pending()
    }

    /// Register `listener(visibleCount)` for every change of the visible set.
    /// Pass undefined to remove it.
    #[wasm_bindgen(js_name = on_change)]
    pub fn on_change(&self, listener: Option<Function>) {
        self.state.borrow_mut().listener = listener;
    }

    /// Cancel any pending reveal and drop the listener. Revealed indices are kept.
    pub fn dispose(&self) {
        let mut s = self.state.borrow_mut();
        s.scheduler.cancel();
        s.listener = None;
    }
}
