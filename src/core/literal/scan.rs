use super::decode::{LiteralKind, QUOTE, VERBATIM_PREFIX, decode_char};

/// Operator joining adjacent literals into one value.
pub const CONCAT: char = '+';

const ESCAPE: char = '\\';

/// A logical literal: one or more `+`-joined literals and their decoded value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedLiteral {
    pub value: String,
    /// Index of the first character (`"` or `@`) of the first literal.
    pub start: usize,
    /// Index just past the closing quote of the last literal.
    pub end: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanError {
    /// No literal begins (or ends) at the requested position.
    NoLiteral,
    /// A literal was opened but never properly closed.
    Unterminated { start: usize },
}

pub type ScanResult = Result<ParsedLiteral, ScanError>;

/// Index of the first non-whitespace character at or after `from`.
pub fn skip_whitespace(text: &[char], from: usize) -> usize {
    let mut index = from;
    while text.get(index).is_some_and(|c| c.is_whitespace()) {
        index += 1;
    }
    index
}

/// Index of the last non-whitespace character strictly before `before`.
pub fn skip_whitespace_back(text: &[char], before: usize) -> Option<usize> {
    let end = before.min(text.len());
    text[..end].iter().rposition(|c| !c.is_whitespace())
}

/// Parse a logical literal starting at `start`, skipping leading whitespace.
///
/// Follows `+` operators to further literals (regular or verbatim) and
/// appends their values. A `+` that is not followed by a literal ends the
/// logical literal before the operator.
pub fn parse_forward(text: &[char], start: usize) -> ScanResult {
    let mut literal = parse_single(text, skip_whitespace(text, start))?;

    loop {
        let operator = skip_whitespace(text, literal.end);
        if text.get(operator) != Some(&CONCAT) {
            break;
        }
        match parse_single(text, skip_whitespace(text, operator + 1)) {
            Ok(next) => {
                literal.value.push_str(&next.value);
                literal.end = next.end;
            }
            Err(ScanError::NoLiteral) => break,
            Err(err) => return Err(err),
        }
    }

    Ok(literal)
}

/// Parse a logical literal whose last closing quote is at `end_index`.
///
/// Used for extension calls where the literal precedes the call site.
/// Literals joined by `+` to the left of it are prepended; scanning stops at
/// the first `+` operand that is not a literal.
pub fn parse_backward(text: &[char], end_index: usize) -> ScanResult {
    if text.get(end_index) != Some(&QUOTE) {
        return Err(ScanError::NoLiteral);
    }

    let mut literal = parse_single_backward(text, end_index)?;

    while let Some(operator) = skip_whitespace_back(text, literal.start) {
        if text[operator] != CONCAT {
            break;
        }
        let Some(previous_end) = skip_whitespace_back(text, operator) else {
            break;
        };
        if text[previous_end] != QUOTE {
            break;
        }
        let Ok(previous) = parse_single_backward(text, previous_end) else {
            break;
        };
        literal.value.insert_str(0, &previous.value);
        literal.start = previous.start;
    }

    Ok(literal)
}

/// Parse exactly one literal whose opening quote (or verbatim prefix) is at `at`.
fn parse_single(text: &[char], at: usize) -> ScanResult {
    let (kind, body) = match (text.get(at), text.get(at + 1)) {
        (Some(&VERBATIM_PREFIX), Some(&QUOTE)) => (LiteralKind::Verbatim, at + 2),
        (Some(&QUOTE), _) => (LiteralKind::Regular, at + 1),
        _ => return Err(ScanError::NoLiteral),
    };

    let mut cursor = body;
    let mut value = String::new();
    while let Some(c) = decode_char(text, &mut cursor, kind) {
        value.push(c);
    }

    if text.get(cursor) != Some(&QUOTE) {
        return Err(ScanError::Unterminated { start: at });
    }

    Ok(ParsedLiteral {
        value,
        start: at,
        end: cursor + 1,
    })
}

/// Parse exactly one literal whose closing quote is at `end_index`.
///
/// The opening quote is located first; the body is then decoded forwards from
/// it, which yields the same value the forward scanner produces. The literal
/// must close exactly at `end_index`.
fn parse_single_backward(text: &[char], end_index: usize) -> ScanResult {
    let open = find_opening_quote(text, end_index).ok_or(ScanError::Unterminated {
        start: end_index,
    })?;
    let start = if open > 0 && text[open - 1] == VERBATIM_PREFIX {
        open - 1
    } else {
        open
    };

    let literal = parse_single(text, start)?;
    if literal.end != end_index + 1 {
        return Err(ScanError::Unterminated { start });
    }
    Ok(literal)
}

/// Walk left from the closing quote at `end_index` to its opening quote.
///
/// A quote preceded by an odd run of backslashes is an escaped quote of a
/// regular literal; a quote preceded by another quote is half of a `""` pair
/// inside a verbatim literal. Both are skipped.
fn find_opening_quote(text: &[char], end_index: usize) -> Option<usize> {
    let mut index = end_index;
    while index > 0 {
        index -= 1;
        if text[index] != QUOTE {
            continue;
        }
        if preceding_escapes(text, index) % 2 == 1 {
            continue;
        }
        if index > 0 && text[index - 1] == QUOTE {
            index -= 1;
            continue;
        }
        return Some(index);
    }
    None
}

fn preceding_escapes(text: &[char], index: usize) -> usize {
    text[..index]
        .iter()
        .rev()
        .take_while(|&&c| c == ESCAPE)
        .count()
}
