//! `OfferPage` over the live DOM via `web-sys`.

use std::time::Duration;

use ms_core::{OfferPage, StyleProperty};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, Element, HtmlElement, NodeList, Window};

/// The document of the page the module is running in.
pub struct DomPage {
    window: Window,
    document: Document,
}

impl DomPage {
    pub fn new() -> Result<Self, JsValue> {
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("No window available"))?;
        let document = window
            .document()
            .ok_or_else(|| JsValue::from_str("No document available"))?;
        Ok(Self { window, document })
    }
}

fn elements(list: NodeList) -> Vec<Element> {
    (0..list.length())
        .filter_map(|i| list.item(i))
        .filter_map(|node| node.dyn_into::<Element>().ok())
        .collect()
}

fn first_or_warn(result: Result<Option<Element>, JsValue>, selector: &str) -> Option<Element> {
    match result {
        Ok(found) => found,
        Err(_) => {
            log::warn!("Invalid selector: {}", selector);
            None
        }
    }
}

impl OfferPage for DomPage {
    type Element = Element;

    fn query(&self, selector: &str) -> Option<Element> {
        first_or_warn(self.document.query_selector(selector), selector)
    }

    fn query_within(&self, scope: &Element, selector: &str) -> Option<Element> {
        first_or_warn(scope.query_selector(selector), selector)
    }

    fn query_all_within(&self, scope: &Element, selector: &str) -> Vec<Element> {
        match scope.query_selector_all(selector) {
            Ok(list) => elements(list),
            Err(_) => {
                log::warn!("Invalid selector: {}", selector);
                Vec::new()
            }
        }
    }

    fn parent(&self, element: &Element) -> Option<Element> {
        element.parent_element()
    }

    fn text_content(&self, element: &Element) -> String {
        element.text_content().unwrap_or_default()
    }

    fn find_button(&self, label: &str) -> Option<Element> {
        let buttons = self.document.query_selector_all("button").ok()?;
        elements(buttons)
            .into_iter()
            .find(|button| button.text_content().as_deref() == Some(label))
    }

    fn activate(&self, element: &Element) {
        if let Some(html) = element.dyn_ref::<HtmlElement>() {
            html.click();
        }
    }

    fn set_style(&self, element: &Element, property: StyleProperty, value: &str) {
        let Some(html) = element.dyn_ref::<HtmlElement>() else {
            return;
        };
        let style = html.style();
        let result = if value.is_empty() {
            style.remove_property(property.as_css()).map(|_| ())
        } else {
            style.set_property(property.as_css(), value)
        };
        if result.is_err() {
            log::warn!("Failed to set {} = {:?}", property.as_css(), value);
        }
    }

    fn alert(&self, message: &str) {
        let _ = self.window.alert_with_message(message);
    }

    fn now_ms(&self) -> f64 {
        self.window
            .performance()
            .map(|performance| performance.now())
            .unwrap_or(0.0)
    }

    async fn sleep(&self, delay: Duration) {
        let ms = i32::try_from(delay.as_millis()).unwrap_or(i32::MAX);
        let window = self.window.clone();
        let promise = js_sys::Promise::new(&mut |resolve, _reject| {
            if window
                .set_timeout_with_callback_and_timeout_and_arguments_0(&resolve, ms)
                .is_err()
            {
                let _ = resolve.call0(&JsValue::UNDEFINED);
            }
        });
        let _ = wasm_bindgen_futures::JsFuture::from(promise).await;
    }
}
