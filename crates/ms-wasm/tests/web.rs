//! Browser tests for the DOM-backed page. Run with `wasm-pack test --headless --chrome`.
#![cfg(target_arch = "wasm32")]

use ms_core::{needs_loading, OfferSorter, SortOptions, SorterConfig};
use ms_wasm::DomPage;
use wasm_bindgen::JsCast;
use wasm_bindgen_test::*;
use web_sys::{Document, Element, HtmlElement};

wasm_bindgen_test_configure!(run_in_browser);

fn document() -> Document {
    web_sys::window().unwrap().document().unwrap()
}

fn div(doc: &Document, parent: &Element, attrs: &[(&str, &str)], text: Option<&str>) -> Element {
    let el = doc.create_element("div").unwrap();
    for (name, value) in attrs {
        el.set_attribute(name, value).unwrap();
    }
    if let Some(text) = text {
        el.set_text_content(Some(text));
    }
    parent.append_child(&el).unwrap();
    el
}

/// Builds `.grid.gap-4 > div > .standard-tile > div[style*=color]` per label.
fn build_offers(labels: &[&str]) -> (Element, Vec<Element>) {
    let doc = document();
    let body: Element = doc.body().unwrap().into();
    let container = div(&doc, &body, &[("class", "grid gap-4")], None);
    let hosts = labels
        .iter()
        .map(|label| {
            let host = div(&doc, &container, &[], None);
            let tile = div(&doc, &host, &[("class", "standard-tile")], None);
            div(&doc, &tile, &[("style", "color: rgb(0, 0, 0)")], Some(label));
            host
        })
        .collect();
    (container, hosts)
}

fn style_of(el: &Element, property: &str) -> String {
    el.dyn_ref::<HtmlElement>()
        .unwrap()
        .style()
        .get_property_value(property)
        .unwrap()
}

#[wasm_bindgen_test]
async fn sorts_live_dom() {
    let (container, hosts) = build_offers(&["1,000 miles", "2X miles", "Up to 5,000 miles"]);
    let page = DomPage::new().unwrap();
    let config = SorterConfig::default();
    let sorter = OfferSorter::new(&config);

    let outcome = sorter
        .sort(&page, SortOptions { filter_multipliers: true })
        .await
        .unwrap();
    assert_eq!(outcome.count, 2);
    assert_eq!(style_of(&hosts[0], "order"), "1");
    assert_eq!(style_of(&hosts[1], "display"), "none");
    assert_eq!(style_of(&hosts[2], "order"), "0");
    assert_eq!(style_of(&container, "display"), "grid");

    let outcome = sorter
        .sort(&page, SortOptions { filter_multipliers: false })
        .await
        .unwrap();
    assert_eq!(outcome.count, 3);
    assert_eq!(style_of(&hosts[1], "display"), "");
    assert_eq!(style_of(&hosts[1], "order"), "1");

    container.remove();
}

#[wasm_bindgen_test]
fn detects_load_more_button() {
    let doc = document();
    let page = DomPage::new().unwrap();
    let config = SorterConfig::default();
    assert!(!needs_loading(&page, &config));

    let button = doc.create_element("button").unwrap();
    button.set_text_content(Some("View More Offers"));
    doc.body().unwrap().append_child(&button).unwrap();
    assert!(needs_loading(&page, &config));

    button.remove();
}

#[wasm_bindgen_test]
fn parses_labels() {
    assert_eq!(ms_wasm::parse_mileage_js("Up to 12,500 miles"), 12_500.0);
    assert!(ms_wasm::is_multiplier_js("3X miles", true));
    assert!(ms_wasm::is_target_url("https://capitaloneoffers.com/c1-offers"));
}

#[wasm_bindgen_test]
fn popup_reports_finished_count() {
    let mut popup = ms_wasm::Popup::new();
    popup.tab_resolved("https://capitaloneoffers.com/c1-offers".to_string());
    popup.sort_started(true);
    assert!(popup.is_loading());

    popup.sort_finished(wasm_bindgen::JsValue::from(7));
    assert!(!popup.is_loading());
    assert_eq!(popup.offer_count(), 7);
}
