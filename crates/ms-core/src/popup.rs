//! Popup controller state
//!
//! The popup lives only while it is open. Its state is an immutable snapshot;
//! each user or host event produces the next snapshot through
//! [`PopupState::apply`], and [`PopupState::view`] derives what to render.

use crate::config::SorterConfig;
use crate::types::{SortMetrics, SortOutcome};

pub const SORT_LABEL: &str = "Sort Capital One Offers";
pub const SORTING_LABEL: &str = "Sorting...";
pub const FILTER_LABEL: &str = "Filter out multiplier deals (e.g., \"2X miles\")";
pub const WRONG_PAGE_MESSAGE: &str = "This extension only works on the Capital One offers page";
pub const OPEN_PAGE_LABEL: &str = "Go to Offers Page";

/// Something that happened to the popup.
#[derive(Debug, Clone, PartialEq)]
pub enum PopupEvent {
    /// The active tab's URL became known
    TabResolved(String),
    /// The multiplier checkbox changed
    FilterToggled(bool),
    /// The sort button was pressed; `needs_loading` is the pre-check result
    SortStarted { needs_loading: bool },
    /// The page routine returned
    SortFinished(SortOutcome),
    /// Injecting or running the page routine failed
    SortFailed(String),
}

/// Snapshot of everything the popup shows.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PopupState {
    pub current_url: Option<String>,
    pub is_loading: bool,
    pub filter_multipliers: bool,
    pub offer_count: usize,
    pub metrics: Option<SortMetrics>,
}

impl PopupState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Next state after `event`.
    #[must_use]
    pub fn apply(&self, event: PopupEvent) -> Self {
        let mut next = self.clone();
        match event {
            PopupEvent::TabResolved(url) => {
                next.current_url = Some(url);
            }
            PopupEvent::FilterToggled(enabled) => {
                next.filter_multipliers = enabled;
            }
            PopupEvent::SortStarted { needs_loading } => {
                // Loading tracks the pagination pre-check only.
                next.is_loading = needs_loading;
            }
            PopupEvent::SortFinished(outcome) => {
                next.is_loading = false;
                // A zero count means the page routine already alerted; keep
                // the previous readout.
                if outcome.count > 0 {
                    next.offer_count = outcome.count;
                    next.metrics = outcome.metrics;
                }
            }
            PopupEvent::SortFailed(reason) => {
                log::error!("Error executing script: {}", reason);
                next.is_loading = false;
            }
        }
        next
    }

    /// Options for the next sort invocation.
    pub fn sort_options(&self) -> crate::types::SortOptions {
        crate::types::SortOptions {
            filter_multipliers: self.filter_multipliers,
        }
    }

    /// Whether the sort controls should be offered at all.
    pub fn on_target_page(&self, config: &SorterConfig) -> bool {
        self.current_url
            .as_deref()
            .is_some_and(|url| config.is_target_url(url))
    }

    pub fn view(&self, config: &SorterConfig) -> PopupView {
        if !self.on_target_page(config) {
            return PopupView::Redirect {
                message: WRONG_PAGE_MESSAGE.to_string(),
                action_label: OPEN_PAGE_LABEL.to_string(),
                target_url: config.target_url.clone(),
            };
        }

        let button_label = if self.is_loading { SORTING_LABEL } else { SORT_LABEL };
        let result = (self.offer_count > 0).then(|| format!("✓ Sorted {} offers!", self.offer_count));
        let metrics_lines = self.metrics.as_ref().map(metrics_lines).unwrap_or_default();

        PopupView::Sorter {
            button_label: button_label.to_string(),
            button_enabled: !self.is_loading,
            filter_label: FILTER_LABEL.to_string(),
            filter_checked: self.filter_multipliers,
            result,
            metrics_lines,
        }
    }
}

/// What the popup renders.
#[derive(Debug, Clone, PartialEq)]
pub enum PopupView {
    /// Active tab is the offers page
    Sorter {
        button_label: String,
        button_enabled: bool,
        filter_label: String,
        filter_checked: bool,
        result: Option<String>,
        metrics_lines: Vec<String>,
    },
    /// Any other page: offer to open the offers page
    Redirect {
        message: String,
        action_label: String,
        target_url: String,
    },
}

fn metrics_lines(metrics: &SortMetrics) -> Vec<String> {
    vec![
        format!("Load: {:.0}ms ({} attempts)", metrics.load_ms, metrics.load_attempts),
        format!("Parse: {:.0}ms", metrics.parse_ms),
        format!("Reorder: {:.0}ms", metrics.reorder_ms),
        format!("Total: {:.0}ms", metrics.total_ms),
        format!(
            "Tiles: {} processed, {} filtered",
            metrics.total_tiles, metrics.filtered_out
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TARGET_URL;

    fn on_offers_page() -> PopupState {
        PopupState::new().apply(PopupEvent::TabResolved(format!("{}?tab=all", TARGET_URL)))
    }

    #[test]
    fn test_redirect_view_off_target() {
        let config = SorterConfig::default();
        let state = PopupState::new();
        assert!(matches!(state.view(&config), PopupView::Redirect { .. }));

        let state = state.apply(PopupEvent::TabResolved("https://example.com/".to_string()));
        match state.view(&config) {
            PopupView::Redirect { target_url, action_label, .. } => {
                assert_eq!(target_url, TARGET_URL);
                assert_eq!(action_label, OPEN_PAGE_LABEL);
            }
            other => panic!("unexpected view: {:?}", other),
        }
    }

    #[test]
    fn test_sorter_view_initial() {
        let config = SorterConfig::default();
        match on_offers_page().view(&config) {
            PopupView::Sorter {
                button_label,
                button_enabled,
                filter_checked,
                result,
                metrics_lines,
                ..
            } => {
                assert_eq!(button_label, SORT_LABEL);
                assert!(button_enabled);
                assert!(!filter_checked);
                assert_eq!(result, None);
                assert!(metrics_lines.is_empty());
            }
            other => panic!("unexpected view: {:?}", other),
        }
    }

    #[test]
    fn test_loading_only_when_paginating() {
        let state = on_offers_page();
        assert!(!state.apply(PopupEvent::SortStarted { needs_loading: false }).is_loading);

        let loading = state.apply(PopupEvent::SortStarted { needs_loading: true });
        assert!(loading.is_loading);
        match loading.view(&SorterConfig::default()) {
            PopupView::Sorter { button_label, button_enabled, .. } => {
                assert_eq!(button_label, SORTING_LABEL);
                assert!(!button_enabled);
            }
            other => panic!("unexpected view: {:?}", other),
        }
    }

    #[test]
    fn test_sort_finished_updates_readout() {
        let metrics = SortMetrics {
            load_ms: 310.4,
            total_tiles: 12,
            filtered_out: 2,
            load_attempts: 2,
            ..SortMetrics::default()
        };
        let state = on_offers_page()
            .apply(PopupEvent::FilterToggled(true))
            .apply(PopupEvent::SortStarted { needs_loading: true })
            .apply(PopupEvent::SortFinished(SortOutcome {
                count: 10,
                metrics: Some(metrics),
            }));

        assert!(!state.is_loading);
        assert_eq!(state.offer_count, 10);
        assert!(state.sort_options().filter_multipliers);

        match state.view(&SorterConfig::default()) {
            PopupView::Sorter { result, metrics_lines, filter_checked, .. } => {
                assert_eq!(result.as_deref(), Some("✓ Sorted 10 offers!"));
                assert!(filter_checked);
                assert_eq!(metrics_lines[0], "Load: 310ms (2 attempts)");
                assert_eq!(metrics_lines[4], "Tiles: 12 processed, 2 filtered");
            }
            other => panic!("unexpected view: {:?}", other),
        }
    }

    #[test]
    fn test_zero_count_keeps_previous_readout() {
        let state = on_offers_page()
            .apply(PopupEvent::SortFinished(SortOutcome { count: 7, metrics: None }))
            .apply(PopupEvent::SortStarted { needs_loading: true })
            .apply(PopupEvent::SortFinished(SortOutcome::empty()));
        assert_eq!(state.offer_count, 7);
        assert!(!state.is_loading);
    }

    #[test]
    fn test_failure_clears_loading() {
        let before = on_offers_page().apply(PopupEvent::SortFinished(SortOutcome { count: 3, metrics: None }));
        let state = before
            .apply(PopupEvent::SortStarted { needs_loading: true })
            .apply(PopupEvent::SortFailed("Cannot access contents of the page".to_string()));
        assert!(!state.is_loading);
        assert_eq!(state, before);
    }

    #[test]
    fn test_apply_does_not_mutate_snapshot() {
        let state = on_offers_page();
        let _ = state.apply(PopupEvent::FilterToggled(true));
        assert!(!state.filter_multipliers);
    }
}
