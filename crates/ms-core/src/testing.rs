//! In-memory `OfferPage` used by the unit tests.
//!
//! Selector matching is not implemented; tests register which nodes a given
//! selector returns, either document-wide or within a scope.

use std::cell::{Cell, RefCell};
use std::collections::{HashMap, VecDeque};
use std::time::Duration;

use crate::config::SelectorTable;
use crate::page::OfferPage;
use crate::types::StyleProperty;

pub(crate) type NodeId = usize;

/// Behaviour of the "View More Offers" button.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LoadMore {
    Absent,
    /// Button disappears after this many activations
    After(usize),
    /// Button never disappears
    Never,
}

struct FakeNode {
    parent: Option<NodeId>,
    text: String,
}

type Reveal = (NodeId, String, NodeId);

pub(crate) struct FakePage {
    nodes: Vec<FakeNode>,
    document_matches: HashMap<String, Vec<NodeId>>,
    scoped_matches: RefCell<HashMap<(NodeId, String), Vec<NodeId>>>,
    styles: RefCell<HashMap<(NodeId, StyleProperty), String>>,
    load_more: LoadMore,
    load_more_label: String,
    button: NodeId,
    pending: RefCell<VecDeque<Vec<Reveal>>>,
    activations: Cell<usize>,
    sleeps: RefCell<Vec<Duration>>,
    alerts: RefCell<Vec<String>>,
    clock: Cell<f64>,
}

impl FakePage {
    pub fn new() -> Self {
        let mut page = Self {
            nodes: Vec::new(),
            document_matches: HashMap::new(),
            scoped_matches: RefCell::new(HashMap::new()),
            styles: RefCell::new(HashMap::new()),
            load_more: LoadMore::Absent,
            load_more_label: SelectorTable::default().load_more_label,
            button: 0,
            pending: RefCell::new(VecDeque::new()),
            activations: Cell::new(0),
            sleeps: RefCell::new(Vec::new()),
            alerts: RefCell::new(Vec::new()),
            clock: Cell::new(0.0),
        };
        page.button = page.add_node(None, "");
        page
    }

    /// Container registered under the first default candidate, with one
    /// `.standard-tile` per label.
    pub fn with_offers(labels: &[&str]) -> (Self, NodeId, Vec<NodeId>) {
        let selectors = SelectorTable::default();
        let mut page = Self::new();
        let container = page.add_node(None, "");
        page.register(&selectors.container_candidates[0], container);
        let hosts = labels
            .iter()
            .map(|&label| page.add_offer(container, &selectors.tile_selectors[0], Some(label)))
            .collect();
        (page, container, hosts)
    }

    pub fn add_node(&mut self, parent: Option<NodeId>, text: &str) -> NodeId {
        self.nodes.push(FakeNode {
            parent,
            text: text.to_string(),
        });
        self.nodes.len() - 1
    }

    pub fn register(&mut self, selector: &str, node: NodeId) {
        self.document_matches
            .entry(selector.to_string())
            .or_default()
            .push(node);
    }

    pub fn register_within(&mut self, scope: NodeId, selector: &str, node: NodeId) {
        self.scoped_matches
            .get_mut()
            .entry((scope, selector.to_string()))
            .or_default()
            .push(node);
    }

    /// Adds host > tile > label and returns the host.
    pub fn add_offer(&mut self, container: NodeId, tile_selector: &str, label: Option<&str>) -> NodeId {
        let (host, tile) = self.build_offer(container, label);
        self.register_within(container, tile_selector, tile);
        host
    }

    /// Like `add_offer`, but the tile only becomes visible to queries after
    /// the next "load more" activation that reveals batch `batch`.
    pub fn add_deferred_offer(&mut self, container: NodeId, batch: usize, label: &str) -> NodeId {
        let (host, tile) = self.build_offer(container, Some(label));
        let selector = SelectorTable::default().tile_selectors[0].clone();
        let pending = self.pending.get_mut();
        while pending.len() <= batch {
            pending.push_back(Vec::new());
        }
        pending[batch].push((container, selector, tile));
        host
    }

    fn build_offer(&mut self, container: NodeId, label: Option<&str>) -> (NodeId, NodeId) {
        let host = self.add_node(Some(container), "");
        let tile = self.add_node(Some(host), label.unwrap_or(""));
        if let Some(label) = label {
            let label_node = self.add_node(Some(tile), label);
            let selector = SelectorTable::default().label_selectors[0].clone();
            self.register_within(tile, &selector, label_node);
        }
        (host, tile)
    }

    pub fn set_load_more(&mut self, load_more: LoadMore) {
        self.load_more = load_more;
    }

    pub fn style(&self, node: NodeId, property: StyleProperty) -> Option<String> {
        self.styles.borrow().get(&(node, property)).cloned()
    }

    pub fn order_of(&self, node: NodeId) -> Option<usize> {
        self.style(node, StyleProperty::Order)
            .and_then(|value| value.parse().ok())
    }

    pub fn is_hidden(&self, node: NodeId) -> bool {
        self.style(node, StyleProperty::Display).as_deref() == Some("none")
    }

    pub fn activations(&self) -> usize {
        self.activations.get()
    }

    pub fn sleeps(&self) -> Vec<Duration> {
        self.sleeps.borrow().clone()
    }

    pub fn alerts(&self) -> Vec<String> {
        self.alerts.borrow().clone()
    }

    fn button_present(&self) -> bool {
        match self.load_more {
            LoadMore::Absent => false,
            LoadMore::After(limit) => self.activations.get() < limit,
            LoadMore::Never => true,
        }
    }
}

impl OfferPage for FakePage {
    type Element = NodeId;

    fn query(&self, selector: &str) -> Option<NodeId> {
        self.document_matches
            .get(selector)
            .and_then(|nodes| nodes.first().copied())
    }

    fn query_within(&self, scope: &NodeId, selector: &str) -> Option<NodeId> {
        self.query_all_within(scope, selector).first().copied()
    }

    fn query_all_within(&self, scope: &NodeId, selector: &str) -> Vec<NodeId> {
        self.scoped_matches
            .borrow()
            .get(&(*scope, selector.to_string()))
            .cloned()
            .unwrap_or_default()
    }

    fn parent(&self, element: &NodeId) -> Option<NodeId> {
        self.nodes.get(*element).and_then(|node| node.parent)
    }

    fn text_content(&self, element: &NodeId) -> String {
        self.nodes
            .get(*element)
            .map(|node| node.text.clone())
            .unwrap_or_default()
    }

    fn find_button(&self, label: &str) -> Option<NodeId> {
        if label == self.load_more_label && self.button_present() {
            Some(self.button)
        } else {
            None
        }
    }

    fn activate(&self, element: &NodeId) {
        if *element != self.button {
            return;
        }
        self.activations.set(self.activations.get() + 1);
        if let Some(batch) = self.pending.borrow_mut().pop_front() {
            let mut scoped = self.scoped_matches.borrow_mut();
            for (scope, selector, node) in batch {
                scoped.entry((scope, selector)).or_default().push(node);
            }
        }
    }

    fn set_style(&self, element: &NodeId, property: StyleProperty, value: &str) {
        let mut styles = self.styles.borrow_mut();
        if value.is_empty() {
            styles.remove(&(*element, property));
        } else {
            styles.insert((*element, property), value.to_string());
        }
    }

    fn alert(&self, message: &str) {
        self.alerts.borrow_mut().push(message.to_string());
    }

    fn now_ms(&self) -> f64 {
        self.clock.get()
    }

    async fn sleep(&self, delay: Duration) {
        self.sleeps.borrow_mut().push(delay);
        self.clock.set(self.clock.get() + delay.as_secs_f64() * 1000.0);
    }
}
