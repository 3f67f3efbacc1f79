//! wasm-bindgen interface for Vizij scroll reveal.
//!
//! `VizijVisibility` latches once an element scrolls into view;
//! `VizijStagger` reveals list indices after a debounced settle interval.
//! Both release their browser resources on `dispose()` or when freed.

use std::str::FromStr;
use std::sync::Once;

use js_sys::Function;
use log::warn;
use wasm_bindgen::prelude::*;

mod browser;
mod stagger;
mod visibility;

pub use stagger::VizijStagger;
pub use visibility::VizijVisibility;

static LOGGER: Once = Once::new();

pub(crate) fn jsvalue_is_undefined_or_null(v: &JsValue) -> bool {
    v.is_undefined() || v.is_null()
}

/// Call a presentation-layer listener, logging instead of propagating JS errors.
pub(crate) fn notify(listener: Option<&Function>, payload: &JsValue) {
    if let Some(f) = listener {
        if let Err(err) = f.call1(&JsValue::NULL, payload) {
            warn!("reveal listener threw: {:?}", err);
        }
    }
}

/// Route `log` output to the browser console. `level` is one of
/// "error" | "warn" | "info" | "debug" | "trace" (default "info").
/// Later calls are ignored.
#[wasm_bindgen(js_name = init_logging)]
pub fn init_logging(level: Option<String>) -> Result<(), JsError> {
    let level = match level.as_deref() {
        None => log::Level::Info,
        Some(s) => log::Level::from_str(s)
            .map_err(|_| JsError::new(&format!("unknown log level '{s}'")))?,
    };
    LOGGER.call_once(|| wasm_logger::init(wasm_logger::Config::new(level)));
    Ok(())
}

/// Numeric ABI version for compatibility checks at init.
#[wasm_bindgen]
pub fn abi_version() -> u32 {
    1
}
