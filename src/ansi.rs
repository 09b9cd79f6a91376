//! ANSI escape sequence scanning.
//!
//! Styled lines coming out of the markdown renderer interleave text with CSI
//! color codes and OSC hyperlinks. Width measurement and wrapping must skip
//! those sequences without disturbing them.

/// A recognized escape sequence starting at a byte position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnsiCode {
    pub code: String,
    pub length: usize,
}

/// Extracts the escape sequence starting at `pos`, if one begins there.
///
/// Recognizes CSI (`ESC [ ... final`) and OSC (`ESC ] ... BEL` or `ESC ] ...
/// ST`) sequences. Anything else after ESC is left for the caller to treat
/// as ordinary text.
pub fn extract_ansi_code(input: &str, pos: usize) -> Option<AnsiCode> {
    let bytes = input.as_bytes();
    if pos >= bytes.len() || bytes[pos] != 0x1b || pos + 1 >= bytes.len() {
        return None;
    }

    match bytes[pos + 1] {
        b'[' => extract_csi(input, pos),
        b']' => extract_osc(input, pos),
        _ => None,
    }
}

fn extract_csi(input: &str, pos: usize) -> Option<AnsiCode> {
    let bytes = input.as_bytes();
    let mut idx = pos + 2;
    while idx < bytes.len() {
        let b = bytes[idx];
        if (0x40..=0x7e).contains(&b) {
            let end = idx + 1;
            return Some(AnsiCode {
                code: input[pos..end].to_string(),
                length: end - pos,
            });
        }
        idx += 1;
    }
    None
}

fn extract_osc(input: &str, pos: usize) -> Option<AnsiCode> {
    let bytes = input.as_bytes();
    let mut idx = pos + 2;
    while idx < bytes.len() {
        if bytes[idx] == 0x07 {
            let end = idx + 1;
            return Some(AnsiCode {
                code: input[pos..end].to_string(),
                length: end - pos,
            });
        }
        if bytes[idx] == 0x1b && idx + 1 < bytes.len() && bytes[idx + 1] == b'\\' {
            let end = idx + 2;
            return Some(AnsiCode {
                code: input[pos..end].to_string(),
                length: end - pos,
            });
        }
        idx += 1;
    }
    None
}

/// Advances from `idx` to the start of the next escape sequence, or to the
/// end of `line` if none follows.
pub fn next_ansi_or_end(line: &str, mut idx: usize) -> usize {
    while idx < line.len() {
        if extract_ansi_code(line, idx).is_some() {
            break;
        }
        match line[idx..].chars().next() {
            Some(ch) => idx += ch.len_utf8(),
            None => break,
        }
    }
    idx
}

#[cfg(test)]
mod tests {
    use super::extract_ansi_code;

    #[test]
    fn csi_sequence_is_extracted() {
        let code = extract_ansi_code("\x1b[31mred", 0).unwrap();
        assert_eq!(code.code, "\x1b[31m");
        assert_eq!(code.length, 5);
    }

    #[test]
    fn osc_sequence_terminated_by_bel() {
        let input = "\x1b]8;;https://example.com\x07link";
        let code = extract_ansi_code(input, 0).unwrap();
        assert_eq!(code.length, input.len() - 4);
    }

    #[test]
    fn osc_sequence_terminated_by_st() {
        let input = "\x1b]8;;\x1b\\after";
        let code = extract_ansi_code(input, 0).unwrap();
        assert_eq!(code.code, "\x1b]8;;\x1b\\");
    }

    #[test]
    fn plain_text_yields_none() {
        assert!(extract_ansi_code("plain", 0).is_none());
        assert!(extract_ansi_code("a\x1b[1mb", 0).is_none());
    }

    #[test]
    fn unterminated_csi_yields_none() {
        assert!(extract_ansi_code("\x1b[31", 0).is_none());
    }
}
