//! Offline offers page backed by a saved HTML snapshot.
//!
//! Style writes are recorded instead of applied, so the resulting ranking can
//! be printed. A snapshot already contains every tile it will ever have, so
//! activating "View More Offers" simply consumes the button.

use std::cell::RefCell;
use std::fs;
use std::path::Path;
use std::time::{Duration, Instant};

use ms_core::{OfferPage, StyleProperty};
use scraper::{ElementRef, Html, Selector};

pub fn read_html(path: &Path) -> Result<Html, String> {
    let content = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read '{}': {}", path.display(), e))?;
    Ok(Html::parse_document(&content))
}

/// One reordered tile host, as reported after a sort.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankedTile {
    pub order: usize,
    pub text: String,
}

type StyleEntry<'a> = (ElementRef<'a>, StyleProperty, String);

pub struct SnapshotPage<'a> {
    html: &'a Html,
    styles: RefCell<Vec<StyleEntry<'a>>>,
    clicked: RefCell<Vec<ElementRef<'a>>>,
    alerts: RefCell<Vec<String>>,
    started: Instant,
}

impl<'a> SnapshotPage<'a> {
    pub fn new(html: &'a Html) -> Self {
        Self {
            html,
            styles: RefCell::new(Vec::new()),
            clicked: RefCell::new(Vec::new()),
            alerts: RefCell::new(Vec::new()),
            started: Instant::now(),
        }
    }

    pub fn style(&self, element: &ElementRef<'a>, property: StyleProperty) -> Option<String> {
        self.styles
            .borrow()
            .iter()
            .find(|(el, prop, _)| el == element && *prop == property)
            .map(|(_, _, value)| value.clone())
    }

    /// Hosts with an explicit `order`, lowest first.
    pub fn ranking(&self) -> Vec<RankedTile> {
        let mut ranked: Vec<RankedTile> = self
            .styles
            .borrow()
            .iter()
            .filter(|(_, prop, _)| *prop == StyleProperty::Order)
            .filter_map(|(el, _, value)| {
                value.parse().ok().map(|order| RankedTile {
                    order,
                    text: snippet(el),
                })
            })
            .collect();
        ranked.sort_by_key(|tile| tile.order);
        ranked
    }

    /// Text of elements hidden with `display: none`, excluding `except`.
    pub fn hidden(&self, except: Option<&ElementRef<'a>>) -> Vec<String> {
        self.styles
            .borrow()
            .iter()
            .filter(|(el, prop, value)| {
                *prop == StyleProperty::Display && value == "none" && Some(el) != except
            })
            .map(|(el, _, _)| snippet(el))
            .collect()
    }

    pub fn alerts(&self) -> Vec<String> {
        self.alerts.borrow().clone()
    }
}

fn parse_selector(selector: &str) -> Option<Selector> {
    match Selector::parse(selector) {
        Ok(parsed) => Some(parsed),
        Err(_) => {
            log::warn!("Invalid selector: {}", selector);
            None
        }
    }
}

/// Whitespace-collapsed text, cut to a readable length.
fn snippet(element: &ElementRef<'_>) -> String {
    let text = element.text().collect::<Vec<_>>().join(" ");
    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.chars().count() > 60 {
        let cut: String = collapsed.chars().take(57).collect();
        format!("{}...", cut)
    } else {
        collapsed
    }
}

impl<'a> OfferPage for SnapshotPage<'a> {
    type Element = ElementRef<'a>;

    fn query(&self, selector: &str) -> Option<ElementRef<'a>> {
        let selector = parse_selector(selector)?;
        let found = self.html.select(&selector).next();
        found
    }

    fn query_within(&self, scope: &ElementRef<'a>, selector: &str) -> Option<ElementRef<'a>> {
        let selector = parse_selector(selector)?;
        let found = scope.select(&selector).find(|el| el != scope);
        found
    }

    fn query_all_within(&self, scope: &ElementRef<'a>, selector: &str) -> Vec<ElementRef<'a>> {
        let Some(selector) = parse_selector(selector) else {
            return Vec::new();
        };
        let found: Vec<_> = scope.select(&selector).filter(|el| el != scope).collect();
        found
    }

    fn parent(&self, element: &ElementRef<'a>) -> Option<ElementRef<'a>> {
        element.parent().and_then(ElementRef::wrap)
    }

    fn text_content(&self, element: &ElementRef<'a>) -> String {
        element.text().collect()
    }

    fn find_button(&self, label: &str) -> Option<ElementRef<'a>> {
        let selector = parse_selector("button")?;
        let clicked = self.clicked.borrow();
        let found = self
            .html
            .select(&selector)
            .find(|button| !clicked.contains(button) && button.text().collect::<String>() == label);
        found
    }

    fn activate(&self, element: &ElementRef<'a>) {
        log::info!("snapshot has no further pages, consuming load-more control");
        self.clicked.borrow_mut().push(*element);
    }

    fn set_style(&self, element: &ElementRef<'a>, property: StyleProperty, value: &str) {
        let mut styles = self.styles.borrow_mut();
        styles.retain(|(el, prop, _)| !(el == element && *prop == property));
        if !value.is_empty() {
            styles.push((*element, property, value.to_string()));
        }
    }

    fn alert(&self, message: &str) {
        log::warn!("alert: {}", message);
        self.alerts.borrow_mut().push(message.to_string());
    }

    fn now_ms(&self) -> f64 {
        self.started.elapsed().as_secs_f64() * 1000.0
    }

    async fn sleep(&self, delay: Duration) {
        tokio::time::sleep(delay).await;
    }
}
