//! Pagination expansion
//!
//! The offers page only renders a first batch of tiles and a "View More
//! Offers" button. Expansion keeps activating the button until it goes away,
//! bounded by `ExpansionConfig::max_attempts` in case the button never
//! disappears (for example after a markup change).

use crate::config::SorterConfig;
use crate::page::OfferPage;

/// Summary of one expansion pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExpandReport {
    /// Number of activations performed
    pub attempts: usize,
    /// The button disappeared (as opposed to hitting the attempt cap)
    pub exhausted: bool,
}

/// Whether the page still shows a load-more control.
pub fn needs_loading<P: OfferPage>(page: &P, config: &SorterConfig) -> bool {
    page.find_button(&config.selectors.load_more_label).is_some()
}

/// Activate the load-more control until it disappears or the cap is hit.
pub async fn expand_all<P: OfferPage>(page: &P, config: &SorterConfig) -> ExpandReport {
    let label = config.selectors.load_more_label.as_str();
    let max_attempts = config.expansion.max_attempts;
    let mut attempts = 0usize;

    loop {
        let Some(button) = page.find_button(label) else {
            log::debug!("load-more control gone after {} attempt(s)", attempts);
            return ExpandReport {
                attempts,
                exhausted: true,
            };
        };

        page.activate(&button);
        page.sleep(config.expansion.delay.delay_for(attempts)).await;
        attempts += 1;

        if attempts >= max_attempts {
            log::warn!("load-more control still present after {} attempts, giving up", attempts);
            return ExpandReport {
                attempts,
                exhausted: false,
            };
        }
    }
}
