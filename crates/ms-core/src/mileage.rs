//! Mileage label parsing
//!
//! Offer labels come in two shapes: an absolute figure ("Up to 12,500 miles")
//! or a multiplier ("2X miles"). Multipliers are scored as `N * 1000` so they
//! interleave with absolute offers instead of sinking to the bottom.

use std::num::IntErrorKind;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Value assigned per unit of a multiplier offer.
pub const MULTIPLIER_UNIT: u64 = 1000;

static MULTIPLIER_VALUE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)([0-9]+)X miles").expect("valid regex"));

static ABSOLUTE_VALUE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(?:Up to )?([0-9,]+) miles").expect("valid regex"));

static MULTIPLIER_LOOSE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)[0-9]+X").expect("valid regex"));

static MULTIPLIER_STRICT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)[0-9]+X miles").expect("valid regex"));

/// How a raw label is classified as a multiplier offer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MultiplierRule {
    /// Any `<digits>X`, e.g. "2X" anywhere in the label
    #[default]
    Loose,
    /// Only `<digits>X miles`
    Strict,
}

/// Parse a mileage label into a sortable value.
///
/// Asterisks and surrounding whitespace are ignored. Returns 0 for labels
/// that match neither the multiplier nor the absolute form. Figures too large
/// for `u64` saturate so they still rank first.
pub fn parse_mileage(text: &str) -> u64 {
    let cleaned = text.replace('*', "");
    let cleaned = cleaned.trim();

    if let Some(caps) = MULTIPLIER_VALUE.captures(cleaned) {
        return parse_figure(&caps[1]).saturating_mul(MULTIPLIER_UNIT);
    }

    if let Some(caps) = ABSOLUTE_VALUE.captures(cleaned) {
        let digits: String = caps[1].chars().filter(|&c| c != ',').collect();
        return parse_figure(&digits);
    }

    0
}

fn parse_figure(digits: &str) -> u64 {
    match digits.parse::<u64>() {
        Ok(n) => n,
        Err(e) if *e.kind() == IntErrorKind::PosOverflow => u64::MAX,
        Err(_) => 0,
    }
}

/// Whether the raw label text describes a multiplier offer.
pub fn is_multiplier(text: &str, rule: MultiplierRule) -> bool {
    match rule {
        MultiplierRule::Loose => MULTIPLIER_LOOSE.is_match(text),
        MultiplierRule::Strict => MULTIPLIER_STRICT.is_match(text),
    }
}
