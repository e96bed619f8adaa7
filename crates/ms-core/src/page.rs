//! Offers page capability
//!
//! The sorter reaches the page exclusively through [`OfferPage`]. In the
//! extension this is the live DOM (see `ms-wasm`); the CLI drives the same
//! routine over a parsed HTML snapshot.

use std::time::Duration;

use crate::types::StyleProperty;

/// DOM operations needed by the expander and the sorter.
///
/// Selector arguments are CSS selectors. Implementations treat a selector
/// they cannot parse as matching nothing.
#[allow(async_fn_in_trait)]
pub trait OfferPage {
    /// Element handle. Equality must be element identity.
    type Element: Clone + PartialEq;

    /// First element in the document matching `selector`.
    fn query(&self, selector: &str) -> Option<Self::Element>;

    /// First descendant of `scope` matching `selector`.
    fn query_within(&self, scope: &Self::Element, selector: &str) -> Option<Self::Element>;

    /// All descendants of `scope` matching `selector`, in document order.
    fn query_all_within(&self, scope: &Self::Element, selector: &str) -> Vec<Self::Element>;

    fn parent(&self, element: &Self::Element) -> Option<Self::Element>;

    /// Concatenated text of the element and its descendants.
    fn text_content(&self, element: &Self::Element) -> String;

    /// A `<button>` whose text content is exactly `label`.
    fn find_button(&self, label: &str) -> Option<Self::Element>;

    /// Simulate a user click.
    fn activate(&self, element: &Self::Element);

    /// Write an inline style; an empty `value` clears the property.
    fn set_style(&self, element: &Self::Element, property: StyleProperty, value: &str);

    /// Blocking user-facing message.
    fn alert(&self, message: &str);

    /// Monotonic clock in milliseconds.
    fn now_ms(&self) -> f64;

    async fn sleep(&self, delay: Duration);
}
