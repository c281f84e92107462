//! Marker call-site detection.
//!
//! A call site is a whole-word occurrence of a marker name followed by a
//! parenthesized argument list. The literal subject of an extension call
//! counts as the first argument:
//!
//! ```text
//! Localize("text")                  plain call: [text]
//! Localize("text", "context")       plain call: [text, context]
//! "text".Localize()                 extension call: [text]
//! "text".Localize("context")        extension call: [text, context]
//! ```
//!
//! Which argument counts are accepted, and which positions hold the text and
//! the context, is described per marker by [`CallShape`]s. Calls with no
//! matching shape, or with a non-literal where a shape expects text or
//! context, are simply not call sites; only a literal that opens and never
//! closes is reported.

use serde::{Deserialize, Serialize};

use crate::core::{
    data::LocalizableString,
    literal::{
        QUOTE, ScanError, VERBATIM_PREFIX, parse_backward, parse_forward, skip_whitespace,
        skip_whitespace_back,
    },
};
use crate::utils::is_identifier_char;

const MEMBER_ACCESS: char = '.';
const OPEN_PAREN: char = '(';
const CLOSE_PAREN: char = ')';
const ARGUMENT_SEPARATOR: char = ',';
const LINE_COMMENT: [char; 2] = ['/', '/'];

const CHAR_QUOTE: char = '\'';
const ESCAPE: char = '\\';

/// Characters that cannot appear inside a call argument.
const STATEMENT_CHARS: [char; 3] = [';', '{', '}'];

/// One accepted argument list of a marker.
///
/// `texts` are the positions extracted as separate records, `context` the
/// optional position of a context shared by them. Every other position may
/// hold any expression.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallShape {
    pub arguments: usize,
    pub texts: Vec<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<usize>,
}

impl CallShape {
    pub fn new(arguments: usize, texts: Vec<usize>, context: Option<usize>) -> Self {
        Self {
            arguments,
            texts,
            context,
        }
    }

    /// `Marker(text)` and `Marker(text, context)`, including extension forms.
    pub fn text_and_context() -> Vec<CallShape> {
        vec![
            CallShape::new(1, vec![0], None),
            CallShape::new(2, vec![0], Some(1)),
        ]
    }

    /// Positions that must be literals.
    fn literal_positions(&self) -> impl Iterator<Item = usize> + '_ {
        self.texts.iter().copied().chain(self.context)
    }

    /// Records for resolved `arguments`; empty texts are dropped.
    pub fn records(&self, arguments: &[String]) -> Vec<LocalizableString> {
        let context = self
            .context
            .and_then(|position| arguments.get(position))
            .cloned()
            .unwrap_or_default();
        self.texts
            .iter()
            .filter_map(|&position| arguments.get(position))
            .filter_map(|text| LocalizableString::new(text.clone(), context.clone()))
            .collect()
    }
}

/// Outcome of resolving one marker occurrence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallMatch {
    /// The call fits `shape`. `arguments` holds every argument in order, with
    /// positions the shape ignores left empty when they are not literals.
    /// `end` is the index just past `)`.
    Matched {
        arguments: Vec<String>,
        shape: CallShape,
        end: usize,
    },
    /// Not a call on literals (wrong word, no parentheses, non-literal argument).
    Rejected,
    /// A literal starting at `at` is never closed.
    Malformed { at: usize },
}

impl CallMatch {
    /// Records of a successful match.
    pub fn records(&self) -> Vec<LocalizableString> {
        match self {
            CallMatch::Matched {
                arguments, shape, ..
            } => shape.records(arguments),
            _ => Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CallStyle {
    Plain,
    /// `subject.Marker(...)`; `dot` is the index of the member-access operator.
    Extension { dot: usize },
}

/// One argument as written at the call site.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Argument {
    Literal(String),
    Expression,
}

enum ArgumentError {
    NotLiteral,
    Malformed(usize),
}

/// Matches call sites of one marker name.
#[derive(Debug, Clone)]
pub struct CallSiteMatcher {
    name: String,
    chars: Vec<char>,
    /// Receivers whose member calls are plain calls (`Localizer.Localize("x")`).
    static_receivers: Vec<Vec<char>>,
    shapes: Vec<CallShape>,
}

impl CallSiteMatcher {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            chars: name.chars().collect(),
            static_receivers: Vec::new(),
            shapes: CallShape::text_and_context(),
        }
    }

    pub fn with_static_receivers<I, S>(mut self, receivers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.static_receivers = receivers
            .into_iter()
            .map(|r| r.as_ref().chars().collect())
            .collect();
        self
    }

    pub fn with_shapes(mut self, shapes: Vec<CallShape>) -> Self {
        self.shapes = shapes;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn name_len(&self) -> usize {
        self.chars.len()
    }

    /// Index of the next whole-word occurrence of the marker at or after `from`.
    pub fn find_from(&self, text: &[char], from: usize) -> Option<usize> {
        let len = self.chars.len();
        if len == 0 || from >= text.len() {
            return None;
        }

        let mut index = from;
        while index + len <= text.len() {
            if self.is_whole_word_at(text, index) {
                return Some(index);
            }
            index += 1;
        }
        None
    }

    /// True if the marker occupies `index..` and is not part of a longer identifier.
    pub fn is_whole_word_at(&self, text: &[char], index: usize) -> bool {
        let end = index + self.chars.len();
        if self.chars.is_empty() || text.get(index..end) != Some(self.chars.as_slice()) {
            return false;
        }
        let before_ok = index == 0 || !is_identifier_char(text[index - 1]);
        let after_ok = text.get(end).is_none_or(|&c| !is_identifier_char(c));
        before_ok && after_ok
    }

    /// Resolve the call whose marker name starts at `index`.
    pub fn match_at(&self, text: &[char], index: usize) -> CallMatch {
        if !self.is_whole_word_at(text, index) || is_commented_out(text, index) {
            return CallMatch::Rejected;
        }

        let open = skip_whitespace(text, index + self.chars.len());
        if text.get(open) != Some(&OPEN_PAREN) {
            return CallMatch::Rejected;
        }

        let mut arguments = Vec::new();
        if let CallStyle::Extension { dot } = self.call_style(text, index) {
            let Some(subject_end) = skip_whitespace_back(text, dot) else {
                return CallMatch::Rejected;
            };
            match parse_backward(text, subject_end) {
                Ok(subject) => arguments.push(Argument::Literal(subject.value)),
                Err(ScanError::NoLiteral) => return CallMatch::Rejected,
                Err(ScanError::Unterminated { start }) => {
                    return CallMatch::Malformed { at: start };
                }
            }
        }

        let end = match parse_arguments(text, open + 1) {
            Ok((explicit, end)) => {
                arguments.extend(explicit);
                end
            }
            Err(ArgumentError::NotLiteral) => return CallMatch::Rejected,
            Err(ArgumentError::Malformed(at)) => return CallMatch::Malformed { at },
        };

        let Some(shape) = self.shape_for(&arguments) else {
            return CallMatch::Rejected;
        };
        let arguments = arguments
            .into_iter()
            .map(|argument| match argument {
                Argument::Literal(value) => value,
                Argument::Expression => String::new(),
            })
            .collect();
        CallMatch::Matched {
            arguments,
            shape: shape.clone(),
            end,
        }
    }

    /// First shape with the right arity whose text and context positions are literals.
    fn shape_for(&self, arguments: &[Argument]) -> Option<&CallShape> {
        self.shapes.iter().find(|shape| {
            shape.arguments == arguments.len()
                && shape
                    .literal_positions()
                    .all(|position| matches!(arguments.get(position), Some(Argument::Literal(_))))
        })
    }

    fn call_style(&self, text: &[char], index: usize) -> CallStyle {
        match skip_whitespace_back(text, index) {
            Some(dot) if text[dot] == MEMBER_ACCESS && !self.is_static_receiver(text, dot) => {
                CallStyle::Extension { dot }
            }
            _ => CallStyle::Plain,
        }
    }

    fn is_static_receiver(&self, text: &[char], dot: usize) -> bool {
        let Some(end) = skip_whitespace_back(text, dot) else {
            return false;
        };
        let mut start = end + 1;
        while start > 0 && is_identifier_char(text[start - 1]) {
            start -= 1;
        }
        let receiver = &text[start..=end];
        self.static_receivers
            .iter()
            .any(|r| r.as_slice() == receiver)
    }
}

/// Parse `arg, arg)` starting just after `(`; returns the arguments and the
/// index past `)`. An argument is a literal when a (possibly concatenated)
/// literal makes up all of it.
fn parse_arguments(text: &[char], from: usize) -> Result<(Vec<Argument>, usize), ArgumentError> {
    let mut arguments = Vec::new();
    let mut cursor = skip_whitespace(text, from);
    if text.get(cursor) == Some(&CLOSE_PAREN) {
        return Ok((arguments, cursor + 1));
    }

    loop {
        let start = skip_whitespace(text, cursor);
        let (argument, after) = match parse_forward(text, start) {
            Ok(literal) if is_argument_end(text, skip_whitespace(text, literal.end)) => {
                (Argument::Literal(literal.value), literal.end)
            }
            Ok(_) | Err(ScanError::NoLiteral) => (Argument::Expression, skip_expression(text, start)?),
            Err(ScanError::Unterminated { start }) => return Err(ArgumentError::Malformed(start)),
        };
        arguments.push(argument);

        let next = skip_whitespace(text, after);
        match text.get(next) {
            Some(&ARGUMENT_SEPARATOR) => cursor = next + 1,
            Some(&CLOSE_PAREN) => return Ok((arguments, next + 1)),
            _ => return Err(ArgumentError::NotLiteral),
        }
    }
}

fn is_argument_end(text: &[char], index: usize) -> bool {
    matches!(text.get(index), Some(&ARGUMENT_SEPARATOR) | Some(&CLOSE_PAREN))
}

/// Index of the `,` or `)` ending the non-literal argument that starts at `from`.
///
/// Nested parentheses and literals inside the expression are skipped whole.
fn skip_expression(text: &[char], from: usize) -> Result<usize, ArgumentError> {
    let mut depth = 0usize;
    let mut cursor = from;
    while let Some(&c) = text.get(cursor) {
        if c == CHAR_QUOTE {
            cursor = skip_char_literal(text, cursor);
            continue;
        }
        if c == QUOTE || (c == VERBATIM_PREFIX && text.get(cursor + 1) == Some(&QUOTE)) {
            match parse_forward(text, cursor) {
                Ok(literal) => {
                    cursor = literal.end;
                    continue;
                }
                Err(ScanError::Unterminated { start }) => return Err(ArgumentError::Malformed(start)),
                Err(ScanError::NoLiteral) => {}
            }
        }
        match c {
            OPEN_PAREN => depth += 1,
            CLOSE_PAREN | ARGUMENT_SEPARATOR if depth == 0 => {
                return if cursor == from {
                    Err(ArgumentError::NotLiteral)
                } else {
                    Ok(cursor)
                };
            }
            CLOSE_PAREN => depth -= 1,
            c if STATEMENT_CHARS.contains(&c) => return Err(ArgumentError::NotLiteral),
            _ => {}
        }
        cursor += 1;
    }
    Err(ArgumentError::NotLiteral)
}

/// Index past the character literal opening at `at`, or just past the quote
/// if it does not close.
fn skip_char_literal(text: &[char], at: usize) -> usize {
    let body = if text.get(at + 1) == Some(&ESCAPE) { at + 3 } else { at + 2 };
    if text.get(body) == Some(&CHAR_QUOTE) {
        body + 1
    } else {
        at + 1
    }
}

/// True if the line holding `index` starts with `//`.
fn is_commented_out(text: &[char], index: usize) -> bool {
    let line_start = text[..index]
        .iter()
        .rposition(|&c| c == '\n')
        .map_or(0, |newline| newline + 1);
    let first = skip_whitespace(text, line_start);
    text.get(first..first + LINE_COMMENT.len()) == Some(LINE_COMMENT.as_slice())
}
