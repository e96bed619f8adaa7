//! Tile sorting and reordering
//!
//! The sorter never moves elements. It ranks tiles by parsed mileage and
//! writes the rank into each tile host's CSS `order`; filtered tiles get
//! `display: none`. Every collected host is reset first so that repeated
//! invocations (for example with the multiplier filter toggled) start from a
//! clean slate.

use crate::config::SorterConfig;
use crate::error::SortError;
use crate::expander::expand_all;
use crate::mileage::{is_multiplier, parse_mileage};
use crate::page::OfferPage;
use crate::types::{SortMetrics, SortOptions, SortOutcome, StyleProperty, TileRecord};

/// Rank tiles by descending mileage.
///
/// Returns indices into `tiles` in rank order. Ties keep their original
/// relative order.
pub fn rank_by_mileage<E>(tiles: &[TileRecord<E>]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..tiles.len()).collect();
    order.sort_by(|&a, &b| tiles[b].mileage.cmp(&tiles[a].mileage));
    order
}

/// Runs the sort routine against an [`OfferPage`].
pub struct OfferSorter<'c> {
    config: &'c SorterConfig,
}

impl<'c> OfferSorter<'c> {
    pub fn new(config: &'c SorterConfig) -> Self {
        Self { config }
    }

    /// Sort the page, reporting failures through `OfferPage::alert`.
    ///
    /// This is the entry point used from the page context: a missing
    /// container or an empty grid shows a blocking alert and yields a zero
    /// outcome.
    pub async fn sort_or_alert<P: OfferPage>(&self, page: &P, options: SortOptions) -> SortOutcome {
        match self.sort(page, options).await {
            Ok(outcome) => outcome,
            Err(err) => {
                log::warn!("sort aborted: {}", err);
                page.alert(&err.to_string());
                SortOutcome::empty()
            }
        }
    }

    /// Expand, collect, rank and reorder the offer tiles.
    pub async fn sort<P: OfferPage>(&self, page: &P, options: SortOptions) -> Result<SortOutcome, SortError> {
        let started = page.now_ms();
        let selectors = &self.config.selectors;

        let container = self.find_container(page).ok_or(SortError::ContainerNotFound)?;

        if let Some(carousel) = selectors.carousel.as_deref().and_then(|s| page.query(s)) {
            page.set_style(&carousel, StyleProperty::Display, "none");
        }

        let load_started = page.now_ms();
        let expansion = expand_all(page, self.config).await;
        let load_ms = page.now_ms() - load_started;
        page.set_style(&container, StyleProperty::Display, "grid");

        // Parse phase
        let parse_started = page.now_ms();
        let tiles = self.collect_tiles(page, &container);
        if tiles.is_empty() {
            return Err(SortError::NoTiles);
        }
        let records: Vec<TileRecord<P::Element>> =
            tiles.iter().map(|tile| self.read_tile(page, tile)).collect();
        let total_tiles = records.len();
        let parse_ms = page.now_ms() - parse_started;

        // Reorder phase
        let reorder_started = page.now_ms();
        for host in records.iter().filter_map(|r| r.host.as_ref()) {
            page.set_style(host, StyleProperty::Order, "");
            page.set_style(host, StyleProperty::Display, "");
        }

        let (hidden, visible): (Vec<_>, Vec<_>) = records
            .into_iter()
            .partition(|r| options.filter_multipliers && r.is_multiplier);

        for host in hidden.iter().filter_map(|r| r.host.as_ref()) {
            page.set_style(host, StyleProperty::Display, "none");
        }

        for (rank, idx) in rank_by_mileage(&visible).into_iter().enumerate() {
            if let Some(host) = &visible[idx].host {
                page.set_style(host, StyleProperty::Order, &rank.to_string());
            }
        }
        let reorder_ms = page.now_ms() - reorder_started;

        log::info!(
            "sorted {} offer(s), {} hidden, {} load attempt(s)",
            visible.len(),
            hidden.len(),
            expansion.attempts
        );

        let metrics = self.config.collect_metrics.then(|| SortMetrics {
            load_ms,
            parse_ms,
            reorder_ms,
            total_ms: page.now_ms() - started,
            total_tiles,
            filtered_out: hidden.len(),
            load_attempts: expansion.attempts,
        });

        Ok(SortOutcome {
            count: visible.len(),
            metrics,
        })
    }

    fn find_container<P: OfferPage>(&self, page: &P) -> Option<P::Element> {
        self.config
            .selectors
            .container_candidates
            .iter()
            .find_map(|selector| {
                let found = page.query(selector);
                if found.is_some() {
                    log::debug!("offers container matched {}", selector);
                }
                found
            })
    }

    /// Union of all tile selectors, first occurrence wins.
    fn collect_tiles<P: OfferPage>(&self, page: &P, container: &P::Element) -> Vec<P::Element> {
        let mut tiles: Vec<P::Element> = Vec::new();
        for selector in &self.config.selectors.tile_selectors {
            for tile in page.query_all_within(container, selector) {
                if !tiles.contains(&tile) {
                    tiles.push(tile);
                }
            }
        }
        log::debug!("collected {} tile(s)", tiles.len());
        tiles
    }

    fn read_tile<P: OfferPage>(&self, page: &P, tile: &P::Element) -> TileRecord<P::Element> {
        let selectors = &self.config.selectors;
        let text = selectors
            .label_selectors
            .iter()
            .find_map(|selector| page.query_within(tile, selector))
            .map(|label| page.text_content(&label))
            .filter(|text| !text.is_empty())
            .unwrap_or_else(|| selectors.fallback_label.clone());

        TileRecord {
            host: page.parent(tile),
            mileage: parse_mileage(&text),
            is_multiplier: is_multiplier(&text, self.config.multiplier_rule),
        }
    }
}
