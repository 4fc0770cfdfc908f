//! Adjacent repeated-chunk collapsing
//!
//! Articles are stitched together from URL nouns, names, titles and bodies that
//! frequently repeat each other back to back ("Home Home", "About us About us").
//! This pass folds every run of identical adjacent chunks into one occurrence.

use ahash::AHashMap;

/// Collapse runs of two or more exactly adjacent, case-insensitively equal
/// whitespace-delimited chunks into their first occurrence.
///
/// Chunks of any length are collapsed. Words are re-joined with single spaces.
///
/// ```
/// use content_search::search::collapse_repeats;
///
/// assert_eq!(collapse_repeats("Home Home About"), "Home About");
/// assert_eq!(collapse_repeats("the cat the cat sat"), "the cat sat");
/// ```
#[must_use]
pub fn collapse_repeats(text: &str) -> String {
    let mut words: Vec<&str> = Vec::new();
    let mut keys: Vec<String> = Vec::new();
    // Ascending positions of each key within the kept prefix
    let mut positions: AHashMap<String, Vec<usize>> = AHashMap::new();

    for word in text.split_whitespace() {
        let key = word.to_lowercase();
        positions.entry(key.clone()).or_default().push(keys.len());
        words.push(word);
        keys.push(key);

        // The kept prefix never contains an adjacent repeat, so a new word can
        // complete at most one repeat, and it must end at the tail. A repeated
        // chunk of `len` words puts an earlier copy of the last word `len` back.
        let tail = keys.len();
        let repeat = positions[&keys[tail - 1]]
            .iter()
            .rev()
            .skip(1)
            .map(|&earlier| tail - 1 - earlier)
            .take_while(|&len| 2 * len <= tail)
            .find(|&len| keys[tail - len..] == keys[tail - 2 * len..tail - len]);

        if let Some(len) = repeat {
            for key in keys.drain(tail - len..) {
                if let Some(at) = positions.get_mut(&key) {
                    at.pop();
                }
            }
            words.truncate(tail - len);
        }
    }

    words.join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collapses_single_word_runs() {
        assert_eq!(collapse_repeats("Home Home About"), "Home About");
        assert_eq!(collapse_repeats("a a a a b"), "a b");
    }

    #[test]
    fn collapses_multi_word_chunks() {
        assert_eq!(collapse_repeats("the cat the cat sat"), "the cat sat");
        assert_eq!(
            collapse_repeats("about us about us about us contact"),
            "about us contact"
        );
    }

    #[test]
    fn keeps_first_casing() {
        assert_eq!(collapse_repeats("Home home HOME page"), "Home page");
    }

    #[test]
    fn leaves_non_adjacent_repeats() {
        assert_eq!(collapse_repeats("home about home"), "home about home");
        assert_eq!(collapse_repeats("homework home"), "homework home");
    }

    #[test]
    fn collapses_long_chunks() {
        let paragraph: Vec<String> = (0..40).map(|i| format!("w{i}")).collect();
        let paragraph = paragraph.join(" ");
        let text = format!("{paragraph} {paragraph} tail");

        assert_eq!(collapse_repeats(&text), format!("{paragraph} tail"));
    }

    #[test]
    fn collapses_repeated_body_with_inner_words_reused() {
        let body = "the cat sat on the mat and the dog sat on the rug";
        let text = format!("intro {body} {body} {body} end");

        assert_eq!(collapse_repeats(&text), format!("intro {body} end"));
    }

    #[test]
    fn normalizes_whitespace() {
        assert_eq!(collapse_repeats("  one\n\ttwo   three "), "one two three");
        assert_eq!(collapse_repeats(""), "");
        assert_eq!(collapse_repeats("   "), "");
    }
}
