/// Opening and closing character of every literal.
pub const QUOTE: char = '"';

/// Prefix turning `"..."` into a verbatim literal.
pub const VERBATIM_PREFIX: char = '@';

const ESCAPE: char = '\\';

/// Quoting style of a single literal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LiteralKind {
    /// `"..."` with backslash escapes.
    Regular,
    /// `@"..."` where only a doubled quote is special.
    Verbatim,
}

/// Decode one logical character of a literal body starting at `cursor`.
///
/// On success the decoded character is returned and `cursor` is moved past
/// every raw character consumed (more than one for escape sequences).
/// Returns `None` without moving `cursor` at the end of `text` or when the
/// next raw character is the literal's terminating quote; the terminator is
/// left for the caller to consume.
///
/// Unrecognized escapes in regular literals are not an error: the backslash
/// is returned on its own and the following character is decoded by the next
/// call, so both pass through unchanged.
pub fn decode_char(text: &[char], cursor: &mut usize, kind: LiteralKind) -> Option<char> {
    let c = *text.get(*cursor)?;

    match kind {
        LiteralKind::Verbatim => {
            if c != QUOTE {
                *cursor += 1;
                return Some(c);
            }
            if text.get(*cursor + 1) == Some(&QUOTE) {
                *cursor += 2;
                return Some(QUOTE);
            }
            None
        }
        LiteralKind::Regular => {
            if c == QUOTE {
                return None;
            }
            if c != ESCAPE {
                *cursor += 1;
                return Some(c);
            }
            match decode_escape(text, *cursor + 1) {
                Some((decoded, consumed)) => {
                    *cursor += 1 + consumed;
                    Some(decoded)
                }
                None => {
                    *cursor += 1;
                    Some(ESCAPE)
                }
            }
        }
    }
}

/// Decode the escape whose selector character is at `at` (just after the
/// backslash). Returns the character and the number of raw characters
/// consumed after the backslash.
fn decode_escape(text: &[char], at: usize) -> Option<(char, usize)> {
    let selector = *text.get(at)?;

    let simple = match selector {
        '\'' => Some('\''),
        '"' => Some('"'),
        '\\' => Some('\\'),
        '0' => Some('\0'),
        'a' => Some('\u{07}'),
        'b' => Some('\u{08}'),
        'f' => Some('\u{0C}'),
        'n' => Some('\n'),
        'r' => Some('\r'),
        't' => Some('\t'),
        'v' => Some('\u{0B}'),
        _ => None,
    };
    if let Some(decoded) = simple {
        return Some((decoded, 1));
    }

    let (min_digits, max_digits) = match selector {
        'x' => (1, 4),
        'u' => (4, 4),
        'U' => (8, 8),
        _ => return None,
    };
    decode_hex(text, at + 1, min_digits, max_digits).map(|(decoded, digits)| (decoded, digits + 1))
}

fn decode_hex(text: &[char], at: usize, min_digits: usize, max_digits: usize) -> Option<(char, usize)> {
    let digits = text
        .get(at..)
        .unwrap_or_default()
        .iter()
        .take(max_digits)
        .take_while(|c| c.is_ascii_hexdigit())
        .count();
    if digits < min_digits {
        return None;
    }

    let value = text[at..at + digits]
        .iter()
        .filter_map(|c| c.to_digit(16))
        .fold(0u32, |acc, digit| acc * 16 + digit);

    // Surrogates and out-of-range code points have no `char`; they fall back
    // to the unrecognized-escape path.
    char::from_u32(value).map(|decoded| (decoded, digits))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn chars(s: &str) -> Vec<char> {
        s.chars().collect()
    }

    /// Decode a whole body (no surrounding quotes) until the decoder stops.
    fn decode_body(body: &str, kind: LiteralKind) -> (String, usize) {
        let text = chars(body);
        let mut cursor = 0;
        let mut out = String::new();
        while let Some(c) = decode_char(&text, &mut cursor, kind) {
            out.push(c);
        }
        (out, cursor)
    }

    #[test]
    fn test_plain_character_advances_by_one() {
        let text = chars("ab");
        let mut cursor = 0;
        assert_eq!(decode_char(&text, &mut cursor, LiteralKind::Regular), Some('a'));
        assert_eq!(cursor, 1);
    }

    #[test]
    fn test_stops_at_terminator_without_consuming() {
        let text = chars("\"rest");
        let mut cursor = 0;
        assert_eq!(decode_char(&text, &mut cursor, LiteralKind::Regular), None);
        assert_eq!(cursor, 0);

        let mut cursor = 0;
        assert_eq!(decode_char(&text, &mut cursor, LiteralKind::Verbatim), None);
        assert_eq!(cursor, 0);
    }

    #[test]
    fn test_stops_at_end_of_buffer() {
        let text = chars("a");
        let mut cursor = 1;
        assert_eq!(decode_char(&text, &mut cursor, LiteralKind::Regular), None);
        assert_eq!(cursor, 1);
    }

    #[test]
    fn test_single_letter_escapes() {
        let (value, _) = decode_body(r#"\'\"\\\0\a\b\f\n\r\t\v"#, LiteralKind::Regular);
        assert_eq!(value, "'\"\\\0\u{07}\u{08}\u{0C}\n\r\t\u{0B}");
    }

    #[test]
    fn test_hex_and_code_point_escapes() {
        let (value, _) = decode_body(r"\xf\x2a\x02a\u002a\U0000002a", LiteralKind::Regular);
        assert_eq!(value, "\u{f}\u{2a}\u{2a}\u{2a}\u{2a}");
    }

    #[test]
    fn test_variable_length_hex_takes_at_most_four_digits() {
        let (value, _) = decode_body(r"\x002a9", LiteralKind::Regular);
        assert_eq!(value, "\u{2a}9");
    }

    #[test]
    fn test_null_escape_followed_by_text() {
        let (value, _) = decode_body(r"\0x002a9", LiteralKind::Regular);
        assert_eq!(value, "\0x002a9");
    }

    #[test]
    fn test_unrecognized_escape_passes_through() {
        let (value, _) = decode_body(r"\q\u12", LiteralKind::Regular);
        assert_eq!(value, r"\q\u12");
    }

    #[test]
    fn test_surrogate_code_point_passes_through() {
        let (value, _) = decode_body(r"\ud800", LiteralKind::Regular);
        assert_eq!(value, r"\ud800");
    }

    #[test]
    fn test_escape_consumes_all_raw_characters() {
        let text = chars(r"\U0001F600x");
        let mut cursor = 0;
        assert_eq!(
            decode_char(&text, &mut cursor, LiteralKind::Regular),
            Some('\u{1F600}')
        );
        assert_eq!(cursor, 10);
    }

    #[test]
    fn test_verbatim_only_doubled_quote_is_special() {
        let (value, cursor) = decode_body("a\"\"b\\n\\t\"tail", LiteralKind::Verbatim);
        assert_eq!(value, "a\"b\\n\\t");
        assert_eq!(cursor, 8);
    }

    /// Render `value` as a literal of the given kind, quotes included.
    ///
    /// Decoding the result with [`decode_char`] yields `value` again.
    fn encode_literal(value: &str, kind: LiteralKind) -> String {
        let mut out = String::with_capacity(value.len() + 3);

        match kind {
            LiteralKind::Verbatim => {
                out.push(VERBATIM_PREFIX);
                out.push(QUOTE);
                for c in value.chars() {
                    if c == QUOTE {
                        out.push(QUOTE);
                    }
                    out.push(c);
                }
            }
            LiteralKind::Regular => {
                out.push(QUOTE);
                for c in value.chars() {
                    match c {
                        '"' => out.push_str("\\\""),
                        '\\' => out.push_str("\\\\"),
                        '\0' => out.push_str("\\0"),
                        '\u{07}' => out.push_str("\\a"),
                        '\u{08}' => out.push_str("\\b"),
                        '\u{0C}' => out.push_str("\\f"),
                        '\n' => out.push_str("\\n"),
                        '\r' => out.push_str("\\r"),
                        '\t' => out.push_str("\\t"),
                        '\u{0B}' => out.push_str("\\v"),
                        c if c.is_control() => out.push_str(&format!("\\u{:04x}", c as u32)),
                        c => out.push(c),
                    }
                }
            }
        }

        out.push(QUOTE);
        out
    }

    #[test]
    fn test_encode_then_decode_reproduces_value() {
        let samples = [
            "plain",
            "quote \" and backslash \\",
            "controls \0\u{07}\u{08}\u{0C}\n\r\t\u{0B}\u{1b}",
            "unicode © 你好 \u{1F600}",
            "",
        ];
        for kind in [LiteralKind::Regular, LiteralKind::Verbatim] {
            for sample in samples {
                let encoded = encode_literal(sample, kind);
                let start = if kind == LiteralKind::Verbatim { 2 } else { 1 };
                let body: String = encoded.chars().skip(start).collect();
                let (decoded, _) = decode_body(&body, kind);
                assert_eq!(decoded, sample, "{:?} via {}", kind, encoded);
            }
        }
    }
}
