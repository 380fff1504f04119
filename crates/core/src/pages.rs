//! Page selection - resolves a page mode plus a raw range string into
//! concrete zero-based page indices.
//!
//! Page numbers are 1-based on input (what users type) and 0-based on
//! output (what the assembler consumes). Malformed range tokens are
//! dropped silently rather than rejected; the selection UI offers no
//! feedback channel for per-token errors.

use std::collections::BTreeSet;

/// Which pages of the document receive the signature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PageMode {
    /// Every page.
    All,
    /// Only the final page (default).
    #[default]
    Last,
    /// Pages named by a range string such as `"1,3,5-7"`.
    Custom,
}

impl PageMode {
    /// Parse a mode name. Unrecognized values fall back to `Last`;
    /// a bad mode is never an error.
    pub fn parse(value: &str) -> Self {
        match value {
            "all" => Self::All,
            "custom" => Self::Custom,
            _ => Self::Last,
        }
    }
}

/// Resolve a page mode and range string against a page count.
///
/// Returns ascending, deduplicated zero-based indices, each in
/// `[0, total_pages)`. A document with zero pages selects nothing
/// regardless of mode, and an empty custom string selects nothing
/// (it does not fall back to the last page).
pub fn select_pages(mode: PageMode, custom_ranges: &str, total_pages: usize) -> Vec<usize> {
    if total_pages == 0 {
        return Vec::new();
    }

    match mode {
        PageMode::All => (0..total_pages).collect(),
        PageMode::Last => vec![total_pages - 1],
        PageMode::Custom => {
            let mut selected = BTreeSet::new();
            for token in custom_ranges.split(',') {
                collect_token(token.trim(), &mut selected);
            }
            selected
                .into_iter()
                .filter(|&page| page >= 1 && page as usize <= total_pages)
                .map(|page| page as usize - 1)
                .collect()
        }
    }
}

/// Add the 1-based page numbers named by one range token to `out`.
///
/// A `-` at byte position zero is not a range separator, so plain
/// negative numbers parse as single (then out-of-bounds) entries.
/// An inverted range like `9-3` yields nothing.
fn collect_token(token: &str, out: &mut BTreeSet<i64>) {
    if let Some(dash) = token.find('-').filter(|&idx| idx > 0) {
        let start = token[..dash].trim().parse::<i64>();
        let end = token[dash + 1..].trim().parse::<i64>();
        if let (Ok(start), Ok(end)) = (start, end) {
            for page in start..=end {
                out.insert(page);
            }
        }
    } else if let Ok(page) = token.parse::<i64>() {
        if page > 0 {
            out.insert(page);
        }
    }
}
