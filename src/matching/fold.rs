use std::ops::Range;

/// Lowercases text one character at a time.
///
/// Per-character folding keeps query and field folding identical, so a
/// folded needle found in a folded haystack always lines up on character
/// boundaries of both.
#[must_use]
pub fn fold_case(text: &str) -> String {
    text.chars().flat_map(char::to_lowercase).collect()
}

/// A case-folded view of a string that can map folded offsets back to the
/// source text.
pub struct FoldedText<'a> {
    source: &'a str,
    folded: String,
    origin: Vec<usize>,
}

impl<'a> FoldedText<'a> {
    #[must_use]
    pub fn new(source: &'a str) -> Self {
        let mut folded = String::with_capacity(source.len());
        let mut origin = Vec::with_capacity(source.len());

        for (offset, ch) in source.char_indices() {
            for lower in ch.to_lowercase() {
                folded.push(lower);
                origin.extend(std::iter::repeat_n(offset, lower.len_utf8()));
            }
        }

        Self {
            source,
            folded,
            origin,
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.folded
    }

    /// Maps a byte range of the folded text onto the source text.
    ///
    /// The result always covers whole source characters.
    #[must_use]
    pub fn source_range(&self, range: Range<usize>) -> Range<usize> {
        if range.start >= range.end || range.start >= self.origin.len() {
            return self.source.len()..self.source.len();
        }

        let start = self.origin[range.start];
        let last = self.origin[(range.end - 1).min(self.origin.len() - 1)];
        let end = last
            + self.source[last..]
                .chars()
                .next()
                .map_or(0, char::len_utf8);

        start..end
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fold_case() {
        assert_eq!(fold_case("Hello WORLD"), "hello world");
        assert_eq!(fold_case("ÉCOLE"), "école");
    }

    #[test]
    fn test_source_range_ascii() {
        let text = FoldedText::new("Say Hello");
        assert_eq!(text.as_str(), "say hello");
        assert_eq!(text.source_range(4..9), 4..9);
    }

    #[test]
    fn test_source_range_expanding_char() {
        // 'İ' folds to two characters ("i" + combining dot above).
        let source = "İx";
        let text = FoldedText::new(source);
        let pos = text.as_str().find('x').unwrap();
        let range = text.source_range(pos..pos + 1);
        assert_eq!(&source[range], "x");

        let range = text.source_range(0..1);
        assert_eq!(&source[range], "İ");
    }
}
