use regex::Regex;
use std::sync::LazyLock;

// `<number><whitespace><word>`, ASCII digits and word characters only
static POSTED_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([0-9]+)\s([A-Za-z0-9_]+)").expect("posted-time pattern"));

static UNITS: &[(&str, u64)] = &[("minute", 1), ("hour", 60), ("day", 1440)];

/// Parse a relative posted time such as `"10 minutes ago"` into minutes.
///
/// Only the first `<number> <word>` occurrence is considered. A word that is
/// not a known unit leaves the number as-is (already minutes). Returns `None`
/// when the text holds no such pattern; callers pick their own default.
pub fn parse_minutes(text: &str) -> Option<u64> {
    let caps = POSTED_RE.captures(text)?;
    // digits-only capture, so the only failure is overflow
    let value = caps[1].parse::<u64>().unwrap_or(u64::MAX);
    Some(value.saturating_mul(unit_multiplier(&caps[2])))
}

/// Multiplier to minutes for a unit word. Singular and plain plural forms
/// (`hour`, `hours`) are recognized; anything else counts as minutes.
fn unit_multiplier(word: &str) -> u64 {
    let singular = word.strip_suffix('s').unwrap_or(word);
    UNITS
        .iter()
        .find(|(unit, _)| *unit == word || *unit == singular)
        .map(|(_, mult)| *mult)
        .unwrap_or(1)
}
