//! Text cleanup applied while flattening rows.

use std::sync::LazyLock;

use regex::Regex;
use scraper::Html;

use crate::config::{INGREDIENTS_MAX_CHARS, INGREDIENTS_MIN_CHARS};

/// Strips markup, decodes entities and collapses whitespace.
pub fn clean_html(text: &str) -> String {
    if text.trim().is_empty() {
        return String::new();
    }
    if !text.contains('<') && !text.contains('&') {
        return collapse_whitespace(text);
    }
    let fragment = Html::parse_fragment(text);
    let plain: String = fragment.root_element().text().collect();
    collapse_whitespace(&plain)
}

pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Capacity patterns in the order they are tried; all are static literals that
/// compile.
static CAPACITY_PATTERNS: LazyLock<Vec<(Regex, &'static str)>> = LazyLock::new(|| {
    [
        (r"(\d+(?:\.\d+)?)\s*ml", "ml"),
        (r"(\d+(?:\.\d+)?)\s*l(?:\s|$|\.)", "L"),
        (r"(\d+(?:\.\d+)?)\s*cl", "cl"),
        (r"(\d+(?:\.\d+)?)\s*litre", "L"),
    ]
    .into_iter()
    .filter_map(|(pattern, unit)| Regex::new(pattern).ok().map(|re| (re, unit)))
    .collect()
});

/// Finds a capacity such as `50 ml`, `1.5 L` or `75 cl` in free text.
///
/// Units are tried in a fixed order (ml, L, cl, litre); the first match of the
/// first unit found wins.
pub fn extract_capacity(text: &str) -> Option<String> {
    if text.trim().is_empty() {
        return None;
    }
    let lower = text.to_lowercase();
    CAPACITY_PATTERNS.iter().find_map(|(pattern, unit)| {
        pattern
            .captures(&lower)
            .and_then(|c| c.get(1))
            .map(|amount| format!("{} {unit}", amount.as_str()))
    })
}

/// Normalizes an ingredient list: line breaks and runs of whitespace become
/// single spaces, long texts are cut. Texts that are too short to be a real
/// ingredient list are rejected.
pub fn normalize_ingredients(text: &str) -> Option<String> {
    let collapsed = collapse_whitespace(text);
    let length = collapsed.chars().count();
    if length <= INGREDIENTS_MIN_CHARS {
        return None;
    }
    if length > INGREDIENTS_MAX_CHARS {
        let cut: String = collapsed.chars().take(INGREDIENTS_MAX_CHARS).collect();
        return Some(format!("{cut}..."));
    }
    Some(collapsed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_capacity_pattern_compiles() {
        assert_eq!(CAPACITY_PATTERNS.len(), 4);
        let units: Vec<&str> = CAPACITY_PATTERNS.iter().map(|(_, unit)| *unit).collect();
        assert_eq!(units, vec!["ml", "L", "cl", "L"]);
    }

    #[test]
    fn test_clean_html() {
        assert_eq!(
            clean_html("<p>Crème <b>hydratante</b>&nbsp;&amp; douce</p>\n<br/>  50 ml"),
            "Crème hydratante & douce 50 ml"
        );
        assert_eq!(clean_html("   "), "");
        assert_eq!(clean_html("plain\n text"), "plain text");
    }

    #[test]
    fn test_extract_capacity_units() {
        assert_eq!(extract_capacity("Eau de parfum 50ml").as_deref(), Some("50 ml"));
        assert_eq!(extract_capacity("Huile 1.5 L").as_deref(), Some("1.5 L"));
        assert_eq!(extract_capacity("Bouteille 75 cl").as_deref(), Some("75 cl"));
        assert_eq!(extract_capacity("Bidon 2 litres").as_deref(), Some("2 L"));
        assert_eq!(extract_capacity("Sac en cuir"), None);
    }

    #[test]
    fn test_ingredients_bounds() {
        assert_eq!(normalize_ingredients("Aqua, Glycerin"), None);
        // 20 characters exactly is still too short
        assert_eq!(normalize_ingredients("abcdefghijklmnopqrst"), None);
        assert_eq!(
            normalize_ingredients("Aqua,\r\nGlycerin,  Parfum, Alcohol").as_deref(),
            Some("Aqua, Glycerin, Parfum, Alcohol")
        );

        let long = "a".repeat(900);
        let normalized = normalize_ingredients(&long).unwrap();
        assert_eq!(normalized.chars().count(), 803);
        assert!(normalized.ends_with("..."));
    }
}
