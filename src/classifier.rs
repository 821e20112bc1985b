//! Keyword heuristic for turning free-text aid requests into structured attributes.
//!
//! - Resource type: category with the most keyword hits, ties to the earliest
//!   category in `CATEGORY_KEYWORDS`; no hits at all gives `General`.
//! - Confidence: winning hits / (total hits + 1), so it is always < 1 and
//!   exactly 0 for `General`.
//! - Urgency: first level in `URGENCY_KEYWORDS` with any hit, else `medium`.
//! - Quantity: first run of decimal digits (any script), read as base 10.

use regex::Regex;
use std::sync::OnceLock;
use tracing::debug;

use crate::config::defaults::{CATEGORY_KEYWORDS, URGENCY_KEYWORDS};
use crate::types::{Classification, ResourceType, Urgency};

// The pattern is a literal, so construction cannot fail.
#[allow(clippy::expect_used)]
fn digit_run() -> &'static Regex {
    static DIGITS: OnceLock<Regex> = OnceLock::new();
    DIGITS.get_or_init(|| Regex::new(r"\d+").expect("literal digit pattern compiles"))
}

/// Stateless request classifier.
#[derive(Debug, Clone, Copy, Default)]
pub struct RequestClassifier;

impl RequestClassifier {
    pub fn new() -> Self {
        Self
    }

    /// Classify a request text.
    pub fn classify(&self, text: &str) -> Classification {
        let lowered = text.to_lowercase();

        let hits = Self::category_hits(&lowered);
        let total: usize = hits.iter().map(|(_, n)| n).sum();

        // Strict `>` keeps the earliest category on ties.
        let mut best: Option<(ResourceType, usize)> = None;
        for &(category, count) in &hits {
            if count > 0 && best.map_or(true, |(_, b)| count > b) {
                best = Some((category, count));
            }
        }

        let (resource_type, winning) = best.unwrap_or((ResourceType::General, 0));
        let confidence = winning as f64 / (total as f64 + 1.0);

        let classification = Classification {
            resource_type,
            urgency: Self::urgency(&lowered),
            quantity: Self::quantity(&lowered),
            confidence,
        };
        debug!(
            resource_type = %classification.resource_type,
            urgency = %classification.urgency,
            confidence = classification.confidence,
            "Classified request"
        );
        classification
    }

    /// Keyword hit count per category, in priority order.
    fn category_hits(lowered: &str) -> [(ResourceType, usize); 6] {
        CATEGORY_KEYWORDS.map(|(category, keywords)| {
            let count = keywords.iter().filter(|kw| lowered.contains(*kw)).count();
            (category, count)
        })
    }

    fn urgency(lowered: &str) -> Urgency {
        URGENCY_KEYWORDS
            .iter()
            .find(|(_, keywords)| keywords.iter().any(|kw| lowered.contains(kw)))
            .map_or_else(Urgency::default, |(level, _)| *level)
    }

    /// First digit run as an integer. A run too long for u64 yields `None`.
    fn quantity(lowered: &str) -> Option<u64> {
        let run = digit_run().find(lowered)?;
        let value = run.as_str().chars().try_fold(0u64, |acc, c| {
            acc.checked_mul(10)?.checked_add(u64::from(decimal_value(c)?))
        });
        if value.is_none() {
            debug!(digits = run.as_str(), "Quantity out of range, ignoring");
        }
        value
    }
}

fn is_decimal(c: char) -> bool {
    let mut buf = [0u8; 4];
    digit_run().is_match(c.encode_utf8(&mut buf))
}

/// Value of a decimal digit in any script.
///
/// Decimal digits are encoded as contiguous ascending 0..9 blocks, so the
/// value is the offset from the start of the surrounding run, mod 10.
fn decimal_value(c: char) -> Option<u32> {
    if let Some(d) = c.to_digit(10) {
        return Some(d);
    }
    if !is_decimal(c) {
        return None;
    }
    let mut start = u32::from(c);
    while let Some(prev) = start.checked_sub(1).and_then(char::from_u32) {
        if !is_decimal(prev) {
            break;
        }
        start -= 1;
    }
    Some((u32::from(c) - start) % 10)
}
