//! Greedy word wrapping for labels and free text

use std::mem;

/// Breaks `text` into lines of at most `width` characters.
///
/// Runs of whitespace collapse to single spaces; a word longer than `width`
/// is split. Text without any words yields no lines.
///
/// ```
/// # use ersmeta_chart::wrap::wrap;
/// assert_eq!(wrap("the quick brown fox", 10), vec!["the quick", "brown fox"]);
/// assert_eq!(wrap("abcdefgh", 3), vec!["abc", "def", "gh"]);
/// assert!(wrap("   ", 5).is_empty());
/// ```
#[must_use]
pub fn wrap(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut lines = vec![];
    let mut current = String::new();
    let mut current_len = 0;

    for word in text.split_whitespace() {
        let mut word = word;
        loop {
            let word_len = word.chars().count();
            let needed = if current_len == 0 {
                word_len
            } else {
                current_len + 1 + word_len
            };
            if needed <= width {
                if current_len > 0 {
                    current.push(' ');
                    current_len += 1;
                }
                current.push_str(word);
                current_len += word_len;
                break;
            }
            if current_len > 0 {
                lines.push(mem::take(&mut current));
                current_len = 0;
                continue;
            }
            let split = word.char_indices().nth(width).map_or(word.len(), |(i, _)| i);
            lines.push(word[..split].to_owned());
            word = &word[split..];
            if word.is_empty() {
                break;
            }
        }
    }
    if current_len > 0 {
        lines.push(current);
    }
    lines
}

/// Like [`wrap`], but keeps at most `max_lines`, marking a cut with `...`.
#[must_use]
pub fn wrap_limited(text: &str, width: usize, max_lines: usize) -> Vec<String> {
    let mut lines = wrap(text, width);
    if lines.len() > max_lines {
        lines.truncate(max_lines);
        if let Some(last) = lines.last_mut() {
            last.push_str("...");
        }
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_fit() {
        assert_eq!(wrap("abc def", 7), vec!["abc def"]);
        assert_eq!(wrap("abc def", 6), vec!["abc", "def"]);
    }

    #[test]
    fn test_collapses_whitespace() {
        assert_eq!(wrap("a \n\t b", 10), vec!["a b"]);
    }

    #[test]
    fn test_long_word_after_short() {
        assert_eq!(wrap("ab cdefgh", 4), vec!["ab", "cdef", "gh"]);
    }

    #[test]
    fn test_multibyte_characters() {
        assert_eq!(wrap("äöüß", 2), vec!["äö", "üß"]);
    }

    #[test]
    fn test_limited_appends_ellipsis() {
        let lines = wrap_limited("one two three four", 5, 2);
        assert_eq!(lines, vec!["one", "two..."]);
        assert_eq!(wrap_limited("one", 5, 2), vec!["one"]);
    }
}
