//! Core type definitions for MileSort
//!
//! These types flow between the page routine and the popup controller.

use serde::{Deserialize, Serialize};

// =============================================================================
// Style Properties
// =============================================================================

/// CSS properties the sorter is allowed to write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StyleProperty {
    /// Flex/grid item `order`
    Order,
    /// `display`, used to hide filtered tiles
    Display,
}

impl StyleProperty {
    /// CSS property name as used by `CSSStyleDeclaration`.
    pub fn as_css(self) -> &'static str {
        match self {
            Self::Order => "order",
            Self::Display => "display",
        }
    }
}

// =============================================================================
// Tile Record
// =============================================================================

/// One collected offer tile.
#[derive(Debug, Clone, PartialEq)]
pub struct TileRecord<E> {
    /// Element whose style is mutated (the tile's parent)
    pub host: Option<E>,
    /// Parsed mileage, 0 if the label could not be parsed
    pub mileage: u64,
    /// Label reads like "2X miles"
    pub is_multiplier: bool,
}

// =============================================================================
// Sort Options / Outcome
// =============================================================================

/// Per-invocation options coming from the popup.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SortOptions {
    /// Hide multiplier offers and exclude them from ranking
    pub filter_multipliers: bool,
}

/// Phase timings and counters for an instrumented run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SortMetrics {
    /// Time spent expanding pagination
    pub load_ms: f64,
    /// Time spent collecting tiles and parsing labels
    pub parse_ms: f64,
    /// Time spent writing styles
    pub reorder_ms: f64,
    /// Wall time of the whole invocation
    pub total_ms: f64,
    /// Tiles collected before filtering
    pub total_tiles: usize,
    /// Tiles hidden by the multiplier filter
    pub filtered_out: usize,
    /// "View More Offers" activations
    pub load_attempts: usize,
}

/// Result of one sort invocation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SortOutcome {
    /// Tiles left in the ordered set after filtering
    pub count: usize,
    /// Present when the active profile collects metrics
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub metrics: Option<SortMetrics>,
}

impl SortOutcome {
    /// Outcome reported when the routine aborts.
    pub fn empty() -> Self {
        Self::default()
    }
}
