//! Text scanning helpers shared by the strategies
//!
//! All scanners are string-aware: braces, brackets and commas inside JSON
//! string literals (including escaped quotes) are ignored.

/// Phrases models commonly put before the JSON, matched case-insensitively
pub const PREAMBLES: &[&str] = &[
    "here is the modified json structure:",
    "here is the modified json:",
    "here's the modified json:",
    "here is the updated json:",
    "here's the updated json:",
    "here is the json:",
    "here's the json:",
    "modified json:",
    "updated json:",
    "json:",
    "certainly!",
    "sure!",
    "sure,",
];

const FENCE: &str = "```";

/// Tracks whether the scanner is inside a string literal
#[derive(Debug, Default)]
struct StringState {
    in_string: bool,
    escaped: bool,
}

impl StringState {
    /// Feed one char; returns true if it is structural (outside a string)
    fn structural(&mut self, c: char) -> bool {
        if self.in_string {
            if self.escaped {
                self.escaped = false;
            } else if c == '\\' {
                self.escaped = true;
            } else if c == '"' {
                self.in_string = false;
            }
            false
        } else if c == '"' {
            self.in_string = true;
            false
        } else {
            true
        }
    }
}

/// First balanced `{...}` span, starting at the first `{`
///
/// Returns `None` if there is no `{` or it is never closed.
#[must_use]
pub fn balanced_object_span(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let mut state = StringState::default();
    let mut depth = 0usize;

    for (offset, c) in text[start..].char_indices() {
        if !state.structural(c) {
            continue;
        }
        match c {
            '{' => depth += 1,
            '}' => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return Some(&text[start..=start + offset]);
                }
            }
            _ => {}
        }
    }
    None
}

/// Everything from the first `{` to the last `}`
#[must_use]
pub fn greedy_object_span(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (end > start).then(|| &text[start..=end])
}

/// Remove a leading ```` ```lang ```` marker and a trailing ```` ``` ````
#[must_use]
pub fn strip_fences(text: &str) -> &str {
    let mut text = text.trim();
    if let Some(rest) = text.strip_prefix(FENCE) {
        let tag_len = rest
            .find(|c: char| !(c.is_ascii_alphanumeric() || c == '-' || c == '_'))
            .unwrap_or(rest.len());
        text = rest[tag_len..].trim_start();
    }
    if let Some(rest) = text.strip_suffix(FENCE) {
        text = rest.trim_end();
    }
    text
}

/// Remove known preamble phrases from the start, repeatedly
#[must_use]
pub fn strip_preamble(text: &str) -> &str {
    let mut text = text.trim_start();
    'outer: loop {
        for phrase in PREAMBLES {
            let matched = text
                .get(..phrase.len())
                .is_some_and(|head| head.eq_ignore_ascii_case(phrase));
            if matched {
                text = text[phrase.len()..].trim_start();
                continue 'outer;
            }
        }
        return text;
    }
}

/// Strip preambles and fence markers until neither applies
#[must_use]
pub fn strip_wrapping(text: &str) -> &str {
    let mut current = text.trim();
    loop {
        let next = strip_fences(strip_preamble(current));
        if next.len() == current.len() {
            return next;
        }
        current = next;
    }
}

/// Drop commas that directly precede a closing `}` or `]`
#[must_use]
pub fn remove_trailing_commas(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut state = StringState::default();

    for (i, c) in text.char_indices() {
        if state.structural(c) && c == ',' {
            let next = text[i + 1..].trim_start().chars().next();
            if matches!(next, Some('}' | ']')) {
                continue;
            }
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn balanced_span_ignores_braces_in_strings() {
        let text = r#"note {"a": "x}y", "b": {"c": "\"}"}} trailing }"#;
        assert_eq!(
            balanced_object_span(text),
            Some(r#"{"a": "x}y", "b": {"c": "\"}"}}"#)
        );
    }

    #[test]
    fn unclosed_span_is_none() {
        assert_eq!(balanced_object_span(r#"{"a": {"b": 1}"#), None);
        assert_eq!(balanced_object_span("no braces"), None);
    }

    #[test]
    fn greedy_span() {
        assert_eq!(greedy_object_span("x {a} y {b} z"), Some("{a} y {b}"));
        assert_eq!(greedy_object_span("} before {"), None);
    }

    #[test]
    fn fences_and_preambles() {
        assert_eq!(strip_fences("```json\n{\"a\": 1}\n```"), "{\"a\": 1}");
        assert_eq!(strip_fences("```\n{}\n```"), "{}");
        assert_eq!(
            strip_preamble("Sure! Here is the modified JSON:\n{}"),
            "{}"
        );
        assert_eq!(
            strip_wrapping("Here is the modified JSON:\n```json\n{\"a\": 1}\n```"),
            "{\"a\": 1}"
        );
    }

    #[test]
    fn trailing_commas_outside_strings() {
        assert_eq!(
            remove_trailing_commas(r#"{"a": [1, 2,], "b": "x,}",}"#),
            r#"{"a": [1, 2], "b": "x,}"}"#
        );
        assert_eq!(remove_trailing_commas("{\"a\": 1,\n  }"), "{\"a\": 1\n  }");
    }

    proptest! {
        #[test]
        fn scanners_never_panic(text in ".{0,200}") {
            let _ = balanced_object_span(&text);
            let _ = greedy_object_span(&text);
            let _ = strip_wrapping(&text);
            let _ = remove_trailing_commas(&text);
        }

        #[test]
        fn balanced_span_is_balanced(text in "[{}\"a,]{0,60}") {
            if let Some(span) = balanced_object_span(&text) {
                prop_assert!(span.starts_with('{'), "span must start with an opening brace");
                prop_assert!(span.ends_with('}'), "span must end with a closing brace");
            }
        }
    }
}
