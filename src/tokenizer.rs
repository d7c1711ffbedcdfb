//! Small, fast word tokenizer for link-target matching.
//!
//! It has different characteristics from a language tokenizer: a "word" is
//! any maximal run of characters not in the breaker set, so `Flight` is a
//! word on its own while `Flight();` tokenizes as `Flight` and `;`.

/// Characters that delimit words. `]` is deliberately absent — trailing
/// array brackets stay attached to the word, as the original matching
/// behavior expects.
const BREAKERS: [char; 6] = ['(', ')', '[', ' ', '{', '}'];

/// A word token and the byte offset where it starts in the line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordSpan {
    /// Byte offset of the first character of the word.
    pub start: usize,
    /// The word text.
    pub text: String,
}

/// Break a line into words with their starting offsets, in line order.
pub fn tokenize(line: &str) -> Vec<WordSpan> {
    let mut spans = Vec::new();
    let mut current_start: Option<usize> = None;

    for (offset, ch) in line.char_indices() {
        if BREAKERS.contains(&ch) {
            if let Some(start) = current_start.take() {
                spans.push(WordSpan {
                    start,
                    text: line[start..offset].to_owned(),
                });
            }
        } else if current_start.is_none() {
            current_start = Some(offset);
        }
    }

    if let Some(start) = current_start {
        spans.push(WordSpan {
            start,
            text: line[start..].to_owned(),
        });
    }

    spans
}

/// Tokenize a line but keep only words textually equal to `find`.
///
/// Offsets come back in ascending order. Callers doing in-place replacement
/// must walk the result in reverse: replacing the last occurrence first
/// keeps the earlier offsets valid while the line length changes.
pub fn tokenize_matching(line: &str, find: &str) -> Vec<WordSpan> {
    tokenize(line)
        .into_iter()
        .filter(|span| span.text == find)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_on_breakers() {
        let words: Vec<String> = tokenize("new Test();")
            .into_iter()
            .map(|s| s.text)
            .collect();
        assert_eq!(words, vec!["new", "Test", ";"]);
    }

    #[test]
    fn offsets_point_into_the_line() {
        let line = "Test t = new Test();";
        let spans = tokenize_matching(line, "Test");
        assert_eq!(spans.len(), 2);
        assert_eq!(spans[0].start, 0);
        assert_eq!(spans[1].start, 13);
        for span in &spans {
            assert_eq!(&line[span.start..span.start + 4], "Test");
        }
    }

    #[test]
    fn all_breakers_yields_nothing() {
        assert!(tokenize("(){} {}").is_empty());
    }

    #[test]
    fn dotted_names_stay_whole() {
        let spans = tokenize("foo.bar.Baz value");
        assert_eq!(spans[0].text, "foo.bar.Baz");
        assert_eq!(spans[1].text, "value");
    }

    #[test]
    fn matching_filters_exactly() {
        let spans = tokenize_matching("Test Tester Test", "Test");
        assert_eq!(spans.len(), 2);
        assert_eq!(spans[1].start, 12);
    }
}
