use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;

static BREAKDOWN_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^Breakdown:(.*)$").expect("breakdown line pattern"));
static SHARE_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\w+) ?(\d+)%").expect("share token pattern"));

/// Parse percentage allocations out of an epic description.
///
/// Shares live on a line starting `Breakdown:` as `<name> <integer>%`
/// tokens, optionally separated by `;`. Only that line is scanned, so
/// percentages elsewhere in the description never contribute. A missing
/// line yields an empty map. Fractions need not sum to 1.
pub fn parse(description: &str) -> BTreeMap<String, f64> {
    let Some(capture) = BREAKDOWN_LINE.captures(description) else {
        return BTreeMap::new();
    };
    let line = &capture[1];
    SHARE_TOKEN
        .captures_iter(line)
        .map(|token| {
            let percent = token[2].parse::<f64>().unwrap_or(0.0);
            (token[1].to_string(), percent / 100.0)
        })
        .collect()
}
