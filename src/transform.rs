//! Pure sequence and string operations behind the cleaning pipeline.

use std::sync::LazyLock;

use regex::Regex;
use serde::Deserialize;

use crate::error::{CleanerError, Result};

static WHITESPACE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// Trim each string, then cut it at the first occurrence of `sep`.
/// Strings without the separator come back as a single-element entry.
pub fn split_each(strings: &[String], sep: &str) -> Vec<Vec<String>> {
    strings
        .iter()
        .map(|s| {
            let s = s.trim();
            match s.split_once(sep) {
                Some((head, tail)) => vec![head.to_string(), tail.to_string()],
                None => vec![s.to_string()],
            }
        })
        .collect()
}

/// Turn a list of pairs into two parallel lists.
pub fn transpose_pairs(pairs: &[Vec<String>]) -> Result<(Vec<String>, Vec<String>)> {
    let offending: Vec<Vec<String>> = pairs.iter().filter(|p| p.len() != 2).cloned().collect();
    if !offending.is_empty() {
        return Err(CleanerError::Validation { offending });
    }

    Ok(pairs
        .iter()
        .map(|p| (p[0].clone(), p[1].clone()))
        .unzip())
}

/// `[a1, b1, a2, b2, ...]` -> `([a1, a2, ...], [b1, b2, ...])`.
/// An odd trailing element lands in the first list only.
pub fn deinterleave(strings: &[String]) -> (Vec<String>, Vec<String>) {
    let evens = strings.iter().step_by(2).cloned().collect();
    let odds = strings.iter().skip(1).step_by(2).cloned().collect();
    (evens, odds)
}

/// Text between the last `open` and the last `close`, trimmed.
/// Without an `open` the slice starts at the beginning of `s`. `None` when
/// `close` is missing or comes before the last `open`.
pub fn between_last(s: &str, open: char, close: char) -> Option<String> {
    let start = s.rfind(open).map_or(0, |i| i + open.len_utf8());
    let end = s.rfind(close)?;
    if end < start {
        return None;
    }
    Some(s[start..end].trim().to_string())
}

/// Split a two-character delimiter spec like `"()"` into its open/close chars.
pub fn delimiter_pair(delim: &str) -> Result<(char, char)> {
    let mut chars = delim.chars();
    match (chars.next(), chars.next(), chars.next()) {
        (Some(open), Some(close), None) => Ok((open, close)),
        _ => Err(CleanerError::Delimiter(delim.to_string())),
    }
}

/// Strip any of `chars` (whitespace when `None`) from the requested sides.
pub fn trim_chars(s: &str, chars: Option<&str>, left: bool, right: bool) -> String {
    let strip = |c: char| match chars {
        Some(set) => set.contains(c),
        None => c.is_whitespace(),
    };
    let mut out = s;
    if left {
        out = out.trim_start_matches(strip);
    }
    if right {
        out = out.trim_end_matches(strip);
    }
    out.to_string()
}

/// Named element-wise transforms usable from a recipe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Transform {
    Identity,
    Strip,
    Lowercase,
    Uppercase,
    CollapseWhitespace,
    StripQuotes,
}

impl Transform {
    pub fn apply(&self, s: &str) -> String {
        match self {
            Transform::Identity => s.to_string(),
            Transform::Strip => s.trim().to_string(),
            Transform::Lowercase => s.to_lowercase(),
            Transform::Uppercase => s.to_uppercase(),
            Transform::CollapseWhitespace => WHITESPACE_RE.replace_all(s.trim(), " ").into_owned(),
            Transform::StripQuotes => s
                .trim()
                .trim_matches(|c| matches!(c, '"' | '\'' | '“' | '”' | '‘' | '’'))
                .to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn split_cuts_at_first_separator_only() {
        let pairs = split_each(&strings(&["  Slint: Spiderland \n", "Can: Tago: Mago"]), ": ");
        assert_eq!(pairs[0], strings(&["Slint", "Spiderland"]));
        assert_eq!(pairs[1], strings(&["Can", "Tago: Mago"]));
    }

    #[test]
    fn split_then_transpose_rejoins_to_original() {
        let original = strings(&["Pavement - Slanted and Enchanted", "Low - Things We Lost", "Talk Talk - Laughing Stock"]);
        let (left, right) = transpose_pairs(&split_each(&original, " - ")).unwrap();
        let rejoined: Vec<String> = left
            .iter()
            .zip(&right)
            .map(|(a, b)| format!("{} - {}", a, b))
            .collect();
        assert_eq!(rejoined, original);
    }

    #[test]
    fn transpose_lists_malformed_entries() {
        let pairs = vec![
            strings(&["Björk", "Homogenic"]),
            strings(&["no separator here"]),
            strings(&["Portishead", "Dummy"]),
        ];
        let err = transpose_pairs(&pairs).unwrap_err();
        match &err {
            CleanerError::Validation { offending } => {
                assert_eq!(offending, &vec![strings(&["no separator here"])]);
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(err.to_string().contains("no separator here"));
    }

    #[test]
    fn deinterleave_splits_even_and_odd() {
        let (a, b) = deinterleave(&strings(&["a1", "b1", "a2", "b2"]));
        assert_eq!(a, strings(&["a1", "a2"]));
        assert_eq!(b, strings(&["b1", "b2"]));

        let (a, b) = deinterleave(&strings(&["a1", "b1", "a2"]));
        assert_eq!(a.len(), 2);
        assert_eq!(b.len(), 1);
    }

    #[test]
    fn year_between_last_parens() {
        assert_eq!(between_last("Album Title (1994)", '(', ')').as_deref(), Some("1994"));
        assert_eq!(between_last("Live (Deluxe) ( 2003 )", '(', ')').as_deref(), Some("2003"));
        assert_eq!(between_last("[1971] Who's Next [", '[', ']'), None);
        assert_eq!(between_last("No Year Here", '(', ')'), None);
        assert_eq!(between_last("Missing close (1994", '(', ')'), None);
    }

    #[test]
    fn year_without_open_starts_at_beginning() {
        assert_eq!(between_last("Kid A 2000)", '(', ')').as_deref(), Some("Kid A 2000"));
        assert_eq!(between_last(") Kid A (", '(', ')'), None);
    }

    #[test]
    fn delimiter_must_be_two_chars() {
        assert_eq!(delimiter_pair("()").unwrap(), ('(', ')'));
        assert!(matches!(delimiter_pair("("), Err(CleanerError::Delimiter(_))));
        assert!(matches!(delimiter_pair("(())"), Err(CleanerError::Delimiter(_))));
    }

    #[test]
    fn trim_respects_sides() {
        assert_eq!(trim_chars("\"Kid A\"", Some("\""), true, false), "Kid A\"");
        assert_eq!(trim_chars("\"Kid A\"", Some("\""), false, true), "\"Kid A");
        assert_eq!(trim_chars("\"Kid A\"", Some("\""), true, true), "Kid A");
        assert_eq!(trim_chars("  x  ", None, true, true), "x");
        assert_eq!(trim_chars("  x  ", None, false, false), "  x  ");
        assert_eq!(trim_chars("1. Radiohead", Some("0123456789. "), true, false), "Radiohead");
    }

    #[test]
    fn named_transforms() {
        assert_eq!(Transform::CollapseWhitespace.apply("  Sonic \n  Youth "), "Sonic Youth");
        assert_eq!(Transform::StripQuotes.apply(" “Daydream Nation” "), "Daydream Nation");
        assert_eq!(Transform::Lowercase.apply("ABBA"), "abba");
        assert_eq!(Transform::Identity.apply(" x "), " x ");
    }
}
