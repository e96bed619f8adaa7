//! MileSort Core Library
//!
//! This crate provides the offer sorting engine for the MileSort extension.
//! It never touches a browser API directly: everything it needs from the
//! offers page goes through the [`OfferPage`] trait, which the wasm bindings
//! implement on top of `web-sys` and the CLI implements over a saved HTML
//! snapshot.
//!
//! # Architecture
//!
//! A sort invocation is a single linear pass: locate the offers container,
//! expand pagination, collect tiles, parse their mileage labels, rank them and
//! write CSS `order`/`display` back. The only suspension points are the
//! delays between "View More Offers" activations.
//!
//! # Modules
//!
//! - `mileage`: Mileage label parsing and multiplier detection
//! - `config`: Selector table, pagination schedule and profile presets
//! - `page`: The `OfferPage` capability trait
//! - `expander`: Pagination expansion ("View More Offers")
//! - `sorter`: Tile collection, ranking and reordering
//! - `popup`: Popup controller state model
//! - `error`: Error types
//! - `types`: Shared type definitions

pub mod config;
pub mod error;
pub mod expander;
pub mod mileage;
pub mod page;
pub mod popup;
pub mod sorter;
pub mod types;

#[cfg(test)]
pub(crate) mod testing;

// Re-export commonly used types
pub use config::{DelaySchedule, SelectorTable, SortProfile, SorterConfig};
pub use error::{ConfigError, SortError};
pub use expander::{expand_all, needs_loading, ExpandReport};
pub use mileage::{is_multiplier, parse_mileage, MultiplierRule};
pub use page::OfferPage;
pub use popup::{PopupEvent, PopupState, PopupView};
pub use sorter::{rank_by_mileage, OfferSorter};
pub use types::{SortMetrics, SortOptions, SortOutcome, StyleProperty, TileRecord};
