//! Sorter configuration
//!
//! Everything that couples the sorter to the offers page's current markup
//! lives in [`SelectorTable`]. When the site changes its class names, update
//! the table (or ship a JSON override) rather than the sorting logic.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::mileage::MultiplierRule;

/// The only page the extension operates on.
pub const TARGET_URL: &str = "https://capitaloneoffers.com/c1-offers";

/// Visible label of the pagination control.
pub const LOAD_MORE_LABEL: &str = "View More Offers";

/// Safety bound on pagination activations.
pub const DEFAULT_MAX_ATTEMPTS: usize = 20;

// =============================================================================
// Selector Table
// =============================================================================

/// CSS selectors describing the offers page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SelectorTable {
    /// Offers grid, tried in order; first match wins
    pub container_candidates: Vec<String>,
    /// Featured-offer carousel hidden before sorting
    pub carousel: Option<String>,
    /// Tile selectors evaluated inside the container; results are unioned
    pub tile_selectors: Vec<String>,
    /// Mileage label inside a tile, tried in order
    pub label_selectors: Vec<String>,
    /// Exact text content of the "load more" button
    pub load_more_label: String,
    /// Label text used when a tile has no mileage label
    pub fallback_label: String,
}

impl Default for SelectorTable {
    fn default() -> Self {
        Self {
            container_candidates: vec![
                ".grid.justify-between.content-stretch.items-stretch.h-full.w-full.gap-4".to_string(),
                ".grid.justify-center.gap-4.h-full.w-full".to_string(),
                ".grid.gap-4".to_string(),
            ],
            carousel: Some(r#".app-page[style*="grid-column"]"#.to_string()),
            tile_selectors: vec![
                ".standard-tile".to_string(),
                r#"div.flex > div[style*="border-radius"][style*="background-color"]"#.to_string(),
            ],
            label_selectors: vec![
                r#"div[style*="color"]"#.to_string(),
                r#"div[style*="background-color: rgb(37, 129, 14)"]"#.to_string(),
            ],
            load_more_label: LOAD_MORE_LABEL.to_string(),
            fallback_label: "0 miles".to_string(),
        }
    }
}

// =============================================================================
// Pagination
// =============================================================================

/// Wait between "load more" activations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum DelaySchedule {
    /// Same delay after every activation
    #[serde(rename_all = "camelCase")]
    Fixed { ms: u64 },
    /// Shorter delay for the first few activations, then a steady one
    #[serde(rename_all = "camelCase")]
    Adaptive {
        initial_ms: u64,
        initial_attempts: usize,
        steady_ms: u64,
    },
}

impl DelaySchedule {
    /// Delay after the activation with zero-based index `attempt`.
    pub fn delay_for(&self, attempt: usize) -> Duration {
        match *self {
            Self::Fixed { ms } => Duration::from_millis(ms),
            Self::Adaptive {
                initial_ms,
                initial_attempts,
                steady_ms,
            } => {
                if attempt < initial_attempts {
                    Duration::from_millis(initial_ms)
                } else {
                    Duration::from_millis(steady_ms)
                }
            }
        }
    }
}

impl Default for DelaySchedule {
    fn default() -> Self {
        Self::Fixed { ms: 500 }
    }
}

/// Pagination expansion settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ExpansionConfig {
    pub max_attempts: usize,
    pub delay: DelaySchedule,
}

impl Default for ExpansionConfig {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            delay: DelaySchedule::default(),
        }
    }
}

// =============================================================================
// Profiles
// =============================================================================

/// Build flavours of the page routine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortProfile {
    /// Fixed 500ms pagination delay, loose multiplier rule, no metrics
    #[default]
    Simple,
    /// Adaptive 150/200ms delay, strict multiplier rule, phase metrics
    Instrumented,
}

// =============================================================================
// Sorter Config
// =============================================================================

/// Complete configuration for one sorter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SorterConfig {
    pub target_url: String,
    pub selectors: SelectorTable,
    pub expansion: ExpansionConfig,
    pub multiplier_rule: MultiplierRule,
    pub collect_metrics: bool,
}

impl Default for SorterConfig {
    fn default() -> Self {
        Self::for_profile(SortProfile::Simple)
    }
}

impl SorterConfig {
    /// Preset matching one of the build flavours.
    pub fn for_profile(profile: SortProfile) -> Self {
        match profile {
            SortProfile::Simple => Self {
                target_url: TARGET_URL.to_string(),
                selectors: SelectorTable::default(),
                expansion: ExpansionConfig::default(),
                multiplier_rule: MultiplierRule::Loose,
                collect_metrics: false,
            },
            SortProfile::Instrumented => Self {
                target_url: TARGET_URL.to_string(),
                selectors: SelectorTable::default(),
                expansion: ExpansionConfig {
                    max_attempts: DEFAULT_MAX_ATTEMPTS,
                    delay: DelaySchedule::Adaptive {
                        initial_ms: 150,
                        initial_attempts: 5,
                        steady_ms: 200,
                    },
                },
                multiplier_rule: MultiplierRule::Strict,
                collect_metrics: true,
            },
        }
    }

    /// Parse a JSON override; missing fields take the simple defaults.
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json_pretty(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject configurations the sorter cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.selectors.container_candidates.is_empty() {
            return Err(ConfigError::Invalid("no container selectors".to_string()));
        }
        if self.selectors.tile_selectors.is_empty() {
            return Err(ConfigError::Invalid("no tile selectors".to_string()));
        }
        if self.selectors.label_selectors.is_empty() {
            return Err(ConfigError::Invalid("no label selectors".to_string()));
        }
        if self.selectors.load_more_label.is_empty() {
            return Err(ConfigError::Invalid("empty load-more label".to_string()));
        }
        if self.expansion.max_attempts == 0 {
            return Err(ConfigError::Invalid("maxAttempts must be at least 1".to_string()));
        }
        Ok(())
    }

    /// Whether the popup should offer sorting for this tab URL.
    pub fn is_target_url(&self, url: &str) -> bool {
        url.starts_with(&self.target_url)
    }
}
