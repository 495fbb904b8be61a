// SPDX-License-Identifier: MPL-2.0

//! Marks the parts of a label that match the search query.

use regex::RegexBuilder;

/// A run of text, either matching the query or not.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub text: String,
    pub matched: bool,
}

impl Segment {
    fn plain(text: &str) -> Self {
        Self {
            text: text.to_string(),
            matched: false,
        }
    }

    fn hit(text: &str) -> Self {
        Self {
            text: text.to_string(),
            matched: true,
        }
    }
}

/// Splits `text` into segments, marking every case-insensitive literal
/// occurrence of `query`.
pub fn highlight(text: &str, query: &str) -> Vec<Segment> {
    let query = query.trim();
    if query.is_empty() || text.is_empty() {
        return vec![Segment::plain(text)];
    }

    let pattern = match RegexBuilder::new(&regex::escape(query))
        .case_insensitive(true)
        .build()
    {
        Ok(pattern) => pattern,
        Err(e) => {
            tracing::debug!("cannot highlight {:?}: {}", query, e);
            return vec![Segment::plain(text)];
        }
    };

    let mut segments = Vec::new();
    let mut last = 0;
    for found in pattern.find_iter(text) {
        if found.start() > last {
            segments.push(Segment::plain(&text[last..found.start()]));
        }
        segments.push(Segment::hit(found.as_str()));
        last = found.end();
    }
    if last < text.len() || segments.is_empty() {
        segments.push(Segment::plain(&text[last..]));
    }

    segments
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_marks_case_insensitive_prefix() {
        assert_eq!(
            highlight("Machine Learning", "mac"),
            vec![Segment::hit("Mac"), Segment::plain("hine Learning")]
        );
    }

    #[test]
    fn test_regex_metacharacters_match_literally() {
        assert_eq!(
            highlight("Programming in C++ and C", "C++"),
            vec![
                Segment::plain("Programming in "),
                Segment::hit("C++"),
                Segment::plain(" and C"),
            ]
        );
        assert_eq!(highlight("a.b", "(.*"), vec![Segment::plain("a.b")]);
    }

    #[test]
    fn test_multiple_occurrences() {
        let segments = highlight("data about data", "DATA");
        let marked: Vec<&str> = segments
            .iter()
            .filter(|s| s.matched)
            .map(|s| s.text.as_str())
            .collect();
        assert_eq!(marked, vec!["data", "data"]);
        assert_eq!(
            segments.iter().map(|s| s.text.as_str()).collect::<String>(),
            "data about data"
        );
    }

    #[test]
    fn test_empty_query_leaves_text_unmarked() {
        assert_eq!(highlight("Optics", "  "), vec![Segment::plain("Optics")]);
    }
}
