//! Width measurement and word wrapping for styled lines.

use unicode_width::UnicodeWidthChar;

use crate::ansi::{extract_ansi_code, next_ansi_or_end};

const TAB_WIDTH: usize = 3;

/// Display columns occupied by `input`, ignoring escape sequences.
#[must_use]
pub fn visible_width(input: &str) -> usize {
    let mut width = 0;
    let mut idx = 0;
    while idx < input.len() {
        if let Some(ansi) = extract_ansi_code(input, idx) {
            idx += ansi.length;
            continue;
        }
        let text_end = next_ansi_or_end(input, idx);
        for ch in input[idx..text_end].chars() {
            width += char_width(ch);
        }
        idx = text_end;
    }
    width
}

fn char_width(ch: char) -> usize {
    if ch == '\t' {
        TAB_WIDTH
    } else {
        UnicodeWidthChar::width(ch).unwrap_or(0)
    }
}

/// Greedy word wrap that keeps escape sequences attached to the word they
/// style. Words wider than `width` are hard-broken at column boundaries.
#[must_use]
pub fn wrap_styled(text: &str, width: usize) -> Vec<String> {
    if width == 0 {
        return vec![String::new()];
    }

    let mut result = Vec::new();
    for input_line in text.split('\n') {
        result.extend(wrap_single_line(input_line, width));
    }

    if result.is_empty() {
        vec![String::new()]
    } else {
        result
            .into_iter()
            .map(|line| line.trim_end().to_string())
            .collect()
    }
}

fn wrap_single_line(line: &str, width: usize) -> Vec<String> {
    if visible_width(line) <= width {
        return vec![line.to_string()];
    }

    let mut wrapped = Vec::new();
    let mut current_line = String::new();
    let mut current_width = 0;

    for token in split_into_tokens(line) {
        let token_width = visible_width(&token);
        let is_whitespace = token.trim().is_empty();

        if token_width > width && !is_whitespace {
            if !current_line.is_empty() {
                wrapped.push(current_line.trim_end().to_string());
                current_line = String::new();
                current_width = 0;
            }
            let broken = break_long_word(&token, width);
            if let Some((last, rest)) = broken.split_last() {
                wrapped.extend_from_slice(rest);
                current_line = last.clone();
                current_width = visible_width(&current_line);
            }
            continue;
        }

        if current_width + token_width > width && current_width > 0 {
            wrapped.push(current_line.trim_end().to_string());
            current_line = String::new();
            current_width = 0;
            if !is_whitespace {
                current_line.push_str(&token);
                current_width = token_width;
            }
        } else {
            current_line.push_str(&token);
            current_width += token_width;
        }
    }

    if !current_line.is_empty() {
        wrapped.push(current_line);
    }

    if wrapped.is_empty() {
        vec![String::new()]
    } else {
        wrapped
    }
}

/// Splits on the space/non-space boundary; escape sequences attach to the
/// token that follows them.
fn split_into_tokens(text: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut pending_ansi = String::new();
    let mut in_whitespace = false;
    let mut idx = 0;

    while idx < text.len() {
        if let Some(ansi) = extract_ansi_code(text, idx) {
            pending_ansi.push_str(&ansi.code);
            idx += ansi.length;
            continue;
        }

        let Some(ch) = text[idx..].chars().next() else {
            break;
        };
        let is_space = ch == ' ';

        if is_space != in_whitespace && !current.is_empty() {
            tokens.push(current);
            current = String::new();
        }

        if !pending_ansi.is_empty() {
            current.push_str(&pending_ansi);
            pending_ansi.clear();
        }

        in_whitespace = is_space;
        current.push(ch);
        idx += ch.len_utf8();
    }

    if !pending_ansi.is_empty() {
        current.push_str(&pending_ansi);
    }
    if !current.is_empty() {
        tokens.push(current);
    }

    tokens
}

fn break_long_word(word: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current_line = String::new();
    let mut current_width = 0;
    let mut idx = 0;

    while idx < word.len() {
        if let Some(ansi) = extract_ansi_code(word, idx) {
            current_line.push_str(&ansi.code);
            idx += ansi.length;
            continue;
        }

        let text_end = next_ansi_or_end(word, idx);
        for ch in word[idx..text_end].chars() {
            let ch_width = char_width(ch);
            if current_width + ch_width > width {
                lines.push(current_line);
                current_line = String::new();
                current_width = 0;
            }
            current_line.push(ch);
            current_width += ch_width;
        }
        idx = text_end;
    }

    if !current_line.is_empty() {
        lines.push(current_line);
    }

    if lines.is_empty() {
        vec![String::new()]
    } else {
        lines
    }
}

#[cfg(test)]
mod tests {
    use super::{visible_width, wrap_styled};

    #[test]
    fn ansi_ignored_in_width() {
        assert_eq!(visible_width("hi\x1b[31m!!\x1b[0m"), 4);
    }

    #[test]
    fn osc_hyperlink_ignored_in_width() {
        let input = "\x1b]8;;https://example.com\x07link\x1b]8;;\x07";
        assert_eq!(visible_width(input), 4);
    }

    #[test]
    fn tabs_count_as_three_columns() {
        assert_eq!(visible_width("a\tb"), 5);
    }

    #[test]
    fn word_wrap_splits_on_spaces() {
        assert_eq!(wrap_styled("word word", 4), vec!["word", "word"]);
    }

    #[test]
    fn short_line_passes_through() {
        assert_eq!(wrap_styled("hello", 80), vec!["hello"]);
    }

    #[test]
    fn overlong_word_is_hard_broken() {
        assert_eq!(wrap_styled("abcdefgh", 3), vec!["abc", "def", "gh"]);
    }

    #[test]
    fn styles_stay_attached_to_their_word() {
        let wrapped = wrap_styled("\x1b[31mword next", 4);
        assert_eq!(wrapped.len(), 2);
        assert!(wrapped[0].starts_with("\x1b[31m"));
        assert_eq!(wrapped[1], "next");
    }

    #[test]
    fn no_leading_whitespace_after_wrap() {
        let wrapped = wrap_styled("word  word", 4);
        assert_eq!(wrapped.len(), 2);
        assert!(!wrapped[1].starts_with(' '));
    }

    #[test]
    fn empty_input_yields_single_empty_line() {
        assert_eq!(wrap_styled("", 10), vec![""]);
    }
}
