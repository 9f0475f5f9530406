//! Provider detection.
//!
//! Every pattern is run over the whole page and every capture becomes a
//! candidate. The most frequent candidate wins; ties go to the candidate seen
//! first (pattern order, then position in the text).

use std::sync::LazyLock;

use regex::{Regex, RegexBuilder};

/// Upper bound on the words of a plausible provider name.
const MAX_NAME_WORDS: usize = 4;

const FACILITY_MARKER: &str = "ABC FACILITY";
const FACILITY_SUFFIX: &str = " - ABC Facility Name";

const NAME: &str = r"[A-Z][a-z]+(?:\s+[A-Z][a-z]+)*";
const DR_NAME: &str = r"[Dd][Rr]\.?\s*[A-Z][a-z]+(?:\s+[A-Z][a-z]+)*";

struct ProviderPattern {
    regex: Regex,
    /// The capture must be preceded and followed by whitespace or a text
    /// boundary (a bare "Dr. X" mention).
    standalone: bool,
}

static PROVIDER_PATTERNS: LazyLock<Vec<ProviderPattern>> = LazyLock::new(|| {
    let role = "(?:CONSULTANT|PROVIDER|PHYSICIAN|DOCTOR|DR)";
    let specs: Vec<(String, bool)> = vec![
        (format!(r"^{role}[:\s]*({DR_NAME})"), false),
        (format!(r"^{role}[:\s]*({NAME})"), false),
        (format!(r"Referral By\s*({DR_NAME})"), false),
        (format!(r"Ref\. By\s*({DR_NAME})"), false),
        (format!(r"Ordered By\s*({DR_NAME})"), false),
        (format!(r"(?:^|\s)(?:Dr\.?|DR\.?)\s*({NAME})"), true),
        (format!(r"Electronically signed by:\s*({NAME})"), false),
        (format!(r"Electronically signed by\s*({NAME})"), false),
        (format!(r"Ordering user:\s*({NAME})"), false),
        (format!(r"Authorized by:\s*({NAME})"), false),
        (format!(r"Acknowledged by:\s*({NAME})"), false),
        (format!(r"Provider\s*({NAME})"), false),
        (format!(r"ABC\s+({NAME})"), false),
        (format!(r"Filed by:\s*({NAME})"), false),
        (format!(r"Resulting lab:\s*({NAME})"), false),
        (format!(r"Edited by\s*({NAME})"), false),
    ];
    specs
        .into_iter()
        .map(|(pattern, standalone)| ProviderPattern {
            regex: RegexBuilder::new(&pattern)
                .case_insensitive(true)
                .multi_line(true)
                .build()
                .expect("Invalid provider regex"),
            standalone,
        })
        .collect()
});

static DR_TOKEN_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bdr\b\.?").expect("Invalid dr token regex"));

/// Resolves the provider named on a page, if any.
pub(crate) fn detect_provider(text: &str) -> Option<String> {
    let candidates = collect_candidates(text);
    let mut provider = most_frequent(&candidates)?.to_string();
    if text.contains(FACILITY_MARKER) {
        provider.push_str(FACILITY_SUFFIX);
    }
    Some(provider)
}

/// Every accepted capture, in scan order.
fn collect_candidates(text: &str) -> Vec<String> {
    let mut candidates = Vec::new();
    for pattern in PROVIDER_PATTERNS.iter() {
        let captures = if pattern.standalone {
            standalone_captures(&pattern.regex, text)
        } else {
            pattern
                .regex
                .captures_iter(text)
                .filter_map(|caps| caps.get(1))
                .map(|m| m.as_str())
                .collect()
        };
        for capture in captures {
            if let Some(name) = normalize_name(capture) {
                candidates.push(name);
            }
        }
    }
    candidates
}

fn normalize_name(raw: &str) -> Option<String> {
    let name = raw.trim();
    if name.is_empty() || name.split_whitespace().count() > MAX_NAME_WORDS {
        return None;
    }
    if name.starts_with("Dr.") || name.starts_with("Dr ") {
        return Some(name.to_string());
    }
    Some(DR_TOKEN_REGEX.replace_all(name, "Dr.").into_owned())
}

/// Highest count wins; on a tie the earliest candidate is kept.
fn most_frequent(candidates: &[String]) -> Option<&str> {
    let mut counts: Vec<(&str, usize)> = Vec::new();
    for candidate in candidates {
        match counts.iter_mut().find(|(name, _)| *name == candidate.as_str()) {
            Some((_, count)) => *count += 1,
            None => counts.push((candidate.as_str(), 1)),
        }
    }
    let mut best: Option<(&str, usize)> = None;
    for (name, count) in counts {
        if best.is_none_or(|(_, top)| count > top) {
            best = Some((name, count));
        }
    }
    best.map(|(name, _)| name)
}

/// Captures of a standalone pattern. A capture running into
/// non-whitespace is cut back to its last word that is followed by
/// whitespace, or dropped when no such word exists.
fn standalone_captures<'t>(regex: &Regex, text: &'t str) -> Vec<&'t str> {
    let mut found = Vec::new();
    let mut start = 0;
    while start <= text.len() {
        let Some(captures) = regex.captures_at(text, start) else {
            break;
        };
        let (Some(whole), Some(name)) = (captures.get(0), captures.get(1)) else {
            break;
        };
        match standalone_end(text, name.start(), name.end()) {
            Some(end) => {
                found.push(&text[name.start()..end]);
                start = end.max(whole.start() + 1);
            }
            None => {
                let step = text[whole.start()..]
                    .chars()
                    .next()
                    .map_or(1, char::len_utf8);
                start = whole.start() + step;
            }
        }
    }
    found
}

fn standalone_end(text: &str, start: usize, end: usize) -> Option<usize> {
    if followed_by_boundary(text, end) {
        return Some(end);
    }
    let name = &text[start..end];
    let mut last_word_end = None;
    let mut previous_was_space = true;
    for (offset, ch) in name.char_indices() {
        let is_space = ch.is_whitespace();
        if is_space && !previous_was_space {
            last_word_end = Some(start + offset);
        }
        previous_was_space = is_space;
    }
    last_word_end
}

fn followed_by_boundary(text: &str, position: usize) -> bool {
    text[position..].chars().next().is_none_or(char::is_whitespace)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_doctor_mention() {
        assert_eq!(
            detect_provider("Seen today by Dr. Smith for follow up").as_deref(),
            Some("Smith for follow up")
        );
    }

    #[test]
    fn bare_doctor_at_line_end() {
        assert_eq!(detect_provider("Attending: Dr. Jones\n").as_deref(), Some("Jones"));
    }

    #[test]
    fn punctuation_cuts_name_back_to_previous_word() {
        let text = "Note by Dr. Alan Smith, MD";
        let candidates = collect_candidates(text);
        assert!(candidates.contains(&"Alan".to_string()));
        assert!(!candidates.iter().any(|c| c.contains("Smith")));
    }

    #[test]
    fn role_line_keeps_doctor_prefix() {
        let text = "CONSULTANT: Dr. Rao";
        let candidates = collect_candidates(text);
        assert_eq!(candidates.first().map(String::as_str), Some("Dr. Rao"));
    }

    #[test]
    fn lowercase_dr_is_normalized() {
        assert_eq!(normalize_name("dr Rao").as_deref(), Some("Dr. Rao"));
        assert_eq!(normalize_name("DR. Rao").as_deref(), Some("Dr. Rao"));
        assert_eq!(normalize_name("Dr. Rao").as_deref(), Some("Dr. Rao"));
    }

    #[test]
    fn long_captures_are_rejected() {
        assert_eq!(normalize_name("One Two Three Four Five"), None);
        assert_eq!(
            normalize_name("One Two Three Four").as_deref(),
            Some("One Two Three Four")
        );
    }

    #[test]
    fn frequency_vote_with_first_seen_tie_break() {
        let names = |items: &[&str]| items.iter().map(|s| s.to_string()).collect::<Vec<_>>();
        assert_eq!(most_frequent(&names(&["A", "B", "B"])), Some("B"));
        assert_eq!(most_frequent(&names(&["A", "B", "A", "B"])), Some("A"));
        assert_eq!(most_frequent(&names(&["B", "A"])), Some("B"));
        assert_eq!(most_frequent(&[]), None);
    }

    #[test]
    fn facility_marker_appends_suffix() {
        let provider = detect_provider("Electronically signed by: Kumar, 01/02/2024\nABC FACILITY");
        assert_eq!(provider.as_deref(), Some("Kumar - ABC Facility Name"));
    }

    #[test]
    fn no_provider_found() {
        assert_eq!(detect_provider("12/01/2024 123 456"), None);
    }
}
