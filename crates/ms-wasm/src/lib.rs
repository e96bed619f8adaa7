//! WebAssembly bindings for MileSort
//!
//! The content script calls `needs_loading` and `sort_offers` inside the
//! offers page; the popup drives a `Popup` instance and renders its `view()`.

mod dom;

use std::sync::OnceLock;

use ms_core::{
    is_multiplier, needs_loading as page_needs_loading, parse_mileage, MultiplierRule,
    OfferSorter, PopupEvent, PopupState, PopupView, SortMetrics, SortOptions, SortOutcome,
    SortProfile, SorterConfig,
};
use wasm_bindgen::prelude::*;

pub use dom::DomPage;

static CONFIG: OnceLock<SorterConfig> = OnceLock::new();

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    wasm_logger::init(wasm_logger::Config::default());
}

/// Override the built-in selector table and timings.
#[wasm_bindgen]
pub fn configure(config_json: &str) -> Result<(), JsValue> {
    if CONFIG.get().is_some() {
        return Err(JsValue::from_str("Already configured. Reload the page to reconfigure."));
    }

    let config = SorterConfig::from_json(config_json)
        .map_err(|e| JsValue::from_str(&format!("Failed to load config: {}", e)))?;

    CONFIG
        .set(config)
        .map_err(|_| JsValue::from_str("Failed to set config"))?;

    Ok(())
}

#[wasm_bindgen]
pub fn is_configured() -> bool {
    CONFIG.get().is_some()
}

fn active_config(instrumented: bool) -> SorterConfig {
    match CONFIG.get() {
        Some(config) => config.clone(),
        None if instrumented => SorterConfig::for_profile(SortProfile::Instrumented),
        None => SorterConfig::for_profile(SortProfile::Simple),
    }
}

/// Whether the page still shows "View More Offers".
#[wasm_bindgen]
pub fn needs_loading() -> bool {
    match DomPage::new() {
        Ok(page) => page_needs_loading(&page, &active_config(false)),
        Err(_) => false,
    }
}

/// Sort the offers on the current page.
///
/// Resolves to `{ count, metrics? }`. Missing container or tiles are
/// reported with an alert and resolve to a zero count.
#[wasm_bindgen]
pub async fn sort_offers(filter_multipliers: bool, instrumented: bool) -> Result<JsValue, JsValue> {
    let page = DomPage::new()?;
    let config = active_config(instrumented);
    let outcome = OfferSorter::new(&config)
        .sort_or_alert(&page, SortOptions { filter_multipliers })
        .await;
    Ok(outcome_to_js(&outcome))
}

#[wasm_bindgen]
pub fn parse_mileage_js(text: &str) -> f64 {
    parse_mileage(text) as f64
}

#[wasm_bindgen]
pub fn is_multiplier_js(text: &str, strict: bool) -> bool {
    let rule = if strict { MultiplierRule::Strict } else { MultiplierRule::Loose };
    is_multiplier(text, rule)
}

#[wasm_bindgen]
pub fn is_target_url(url: &str) -> bool {
    active_config(false).is_target_url(url)
}

#[wasm_bindgen]
pub fn target_url() -> String {
    active_config(false).target_url
}

// =============================================================================
// Popup Controller
// =============================================================================

/// Popup state holder; lives as long as the popup document.
#[wasm_bindgen]
pub struct Popup {
    state: PopupState,
    config: SorterConfig,
}

impl Default for Popup {
    fn default() -> Self {
        Self::new()
    }
}

#[wasm_bindgen]
impl Popup {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Popup {
        Popup {
            state: PopupState::new(),
            config: active_config(false),
        }
    }

    pub fn tab_resolved(&mut self, url: String) {
        self.dispatch(PopupEvent::TabResolved(url));
    }

    pub fn set_filter(&mut self, enabled: bool) {
        self.dispatch(PopupEvent::FilterToggled(enabled));
    }

    pub fn sort_started(&mut self, needs_loading: bool) {
        self.dispatch(PopupEvent::SortStarted { needs_loading });
    }

    /// Accepts either a bare count or the object resolved by `sort_offers`.
    pub fn sort_finished(&mut self, result: JsValue) {
        self.dispatch(PopupEvent::SortFinished(outcome_from_js(&result)));
    }

    pub fn sort_failed(&mut self, reason: String) {
        self.dispatch(PopupEvent::SortFailed(reason));
    }

    pub fn filter_multipliers(&self) -> bool {
        self.state.filter_multipliers
    }

    pub fn is_loading(&self) -> bool {
        self.state.is_loading
    }

    pub fn offer_count(&self) -> u32 {
        js_count(self.state.offer_count)
    }

    pub fn view(&self) -> JsValue {
        view_to_js(&self.state.view(&self.config))
    }

    fn dispatch(&mut self, event: PopupEvent) {
        self.state = self.state.apply(event);
    }
}

// =============================================================================
// JS conversions
// =============================================================================

/// Counts cross the boundary as `u32`, saturating.
fn js_count(count: usize) -> u32 {
    u32::try_from(count).unwrap_or(u32::MAX)
}

fn set(target: &js_sys::Object, key: &str, value: &JsValue) {
    let _ = js_sys::Reflect::set(target, &JsValue::from_str(key), value);
}

fn get_f64(source: &JsValue, key: &str) -> f64 {
    js_sys::Reflect::get(source, &JsValue::from_str(key))
        .ok()
        .and_then(|value| value.as_f64())
        .unwrap_or(0.0)
}

fn outcome_to_js(outcome: &SortOutcome) -> JsValue {
    let result = js_sys::Object::new();
    set(&result, "count", &JsValue::from(js_count(outcome.count)));

    if let Some(metrics) = &outcome.metrics {
        let obj = js_sys::Object::new();
        set(&obj, "loadMs", &JsValue::from(metrics.load_ms));
        set(&obj, "parseMs", &JsValue::from(metrics.parse_ms));
        set(&obj, "reorderMs", &JsValue::from(metrics.reorder_ms));
        set(&obj, "totalMs", &JsValue::from(metrics.total_ms));
        set(&obj, "totalTiles", &JsValue::from(js_count(metrics.total_tiles)));
        set(&obj, "filteredOut", &JsValue::from(js_count(metrics.filtered_out)));
        set(&obj, "loadAttempts", &JsValue::from(js_count(metrics.load_attempts)));
        set(&result, "metrics", &obj);
    }

    result.into()
}

fn outcome_from_js(value: &JsValue) -> SortOutcome {
    if let Some(count) = value.as_f64() {
        return SortOutcome {
            count: count.max(0.0) as usize,
            metrics: None,
        };
    }
    if !value.is_object() {
        return SortOutcome::empty();
    }

    let metrics = js_sys::Reflect::get(value, &JsValue::from_str("metrics"))
        .ok()
        .filter(|m| m.is_object())
        .map(|m| SortMetrics {
            load_ms: get_f64(&m, "loadMs"),
            parse_ms: get_f64(&m, "parseMs"),
            reorder_ms: get_f64(&m, "reorderMs"),
            total_ms: get_f64(&m, "totalMs"),
            total_tiles: get_f64(&m, "totalTiles") as usize,
            filtered_out: get_f64(&m, "filteredOut") as usize,
            load_attempts: get_f64(&m, "loadAttempts") as usize,
        });

    SortOutcome {
        count: get_f64(value, "count").max(0.0) as usize,
        metrics,
    }
}

fn view_to_js(view: &PopupView) -> JsValue {
    let result = js_sys::Object::new();
    match view {
        PopupView::Sorter {
            button_label,
            button_enabled,
            filter_label,
            filter_checked,
            result: readout,
            metrics_lines,
        } => {
            set(&result, "kind", &JsValue::from_str("sorter"));
            set(&result, "buttonLabel", &JsValue::from_str(button_label));
            set(&result, "buttonEnabled", &JsValue::from(*button_enabled));
            set(&result, "filterLabel", &JsValue::from_str(filter_label));
            set(&result, "filterChecked", &JsValue::from(*filter_checked));
            if let Some(readout) = readout {
                set(&result, "result", &JsValue::from_str(readout));
            }
            let lines = js_sys::Array::new();
            for line in metrics_lines {
                lines.push(&JsValue::from_str(line));
            }
            set(&result, "metrics", &lines);
        }
        PopupView::Redirect {
            message,
            action_label,
            target_url,
        } => {
            set(&result, "kind", &JsValue::from_str("redirect"));
            set(&result, "message", &JsValue::from_str(message));
            set(&result, "actionLabel", &JsValue::from_str(action_label));
            set(&result, "targetUrl", &JsValue::from_str(target_url));
        }
    }
    result.into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_js_count_saturates() {
        assert_eq!(js_count(0), 0);
        assert_eq!(js_count(42), 42);
        assert_eq!(js_count(u32::MAX as usize), u32::MAX);
        #[cfg(target_pointer_width = "64")]
        assert_eq!(js_count(u32::MAX as usize + 1), u32::MAX);
    }
}
