//! Extraction from intermediate-language disassembly.
//!
//! A marker call compiles to a `call` whose string arguments were pushed by
//! earlier `ldstr` instructions. Long literals are wrapped by the disassembler:
//!
//! ```text
//! IL_0000:  ldstr      "Check out the file\r\n\r\n{0}\r\n\r\nto be "
//! + "able to save the changes\?"
//! IL_0005:  call       string [Atf.Gui]Sce.Atf.Localizer::Localize(string)
//! ```
//!
//! The operand is rebuilt by walking back to the `ldstr` line and joining the
//! quoted part of every line up to the call.

use std::fmt;

use crate::core::{data::LocalizableString, diagnostics::Diagnostics};

const LOAD_STRING: &str = "ldstr";
const CALL_OPCODES: [&str; 2] = ["call", "callvirt"];
const LABEL_PREFIX: &str = "IL_";
const QUOTE: char = '"';

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IlError {
    /// No `ldstr` line precedes the call.
    NoStringLoad,
    /// The rebuilt operand is empty (includes `ldstr bytearray (...)`).
    EmptyValue,
}

impl fmt::Display for IlError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IlError::NoStringLoad => write!(f, "no string constant is loaded before the call"),
            IlError::EmptyValue => write!(f, "the loaded string constant is empty"),
        }
    }
}

impl std::error::Error for IlError {}

/// Which marker overload a call line targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MarkerCall {
    TextOnly,
    TextAndContext,
}

#[derive(Debug, Clone)]
pub struct IlExtractor {
    one_arg: String,
    two_arg: String,
}

impl IlExtractor {
    /// `one_arg` and `two_arg` are the method signatures as the disassembler
    /// prints them, e.g. `Localize(string)`. Whitespace is not significant.
    pub fn new(one_arg: &str, two_arg: &str) -> Self {
        Self {
            one_arg: compact(one_arg),
            two_arg: compact(two_arg),
        }
    }

    pub fn extract<S: AsRef<str>>(
        &self,
        lines: &[S],
        diagnostics: &mut Diagnostics,
    ) -> Vec<LocalizableString> {
        let mut records = Vec::new();

        for (index, line) in lines.iter().enumerate() {
            let Some(call) = self.marker_call(line.as_ref()) else {
                continue;
            };
            let resolved = match call {
                MarkerCall::TextOnly => {
                    reconstruct(lines, index).map(|(text, _)| (text, String::new()))
                }
                // Arguments are pushed left to right: context is the nearest load.
                MarkerCall::TextAndContext => {
                    reconstruct(lines, index).and_then(|(context, load)| {
                        reconstruct(lines, load).map(|(text, _)| (text, context))
                    })
                }
            };

            match resolved.and_then(|(text, context)| {
                LocalizableString::new(text, context).ok_or(IlError::EmptyValue)
            }) {
                Ok(record) => records.push(record),
                Err(err) => diagnostics.warning(format!("line {}: {}", index + 1, err)),
            }
        }

        records
    }

    fn marker_call(&self, line: &str) -> Option<MarkerCall> {
        if !opcode(line).is_some_and(|op| CALL_OPCODES.contains(&op)) {
            return None;
        }
        let line = compact(line);
        if line.contains(&self.two_arg) {
            Some(MarkerCall::TextAndContext)
        } else if line.contains(&self.one_arg) {
            Some(MarkerCall::TextOnly)
        } else {
            None
        }
    }
}

/// Rebuild the string pushed by the nearest `ldstr` before line `before`.
///
/// Returns the decoded value and the index of the `ldstr` line, so a second
/// call can continue from there for the argument pushed before it.
pub fn reconstruct<S: AsRef<str>>(lines: &[S], before: usize) -> Result<(String, usize), IlError> {
    let before = before.min(lines.len());
    let load = lines[..before]
        .iter()
        .rposition(|line| opcode(line.as_ref()) == Some(LOAD_STRING))
        .ok_or(IlError::NoStringLoad)?;

    let value = lines[load..before]
        .iter()
        .map(|line| decode_il_escapes(quoted_payload(line.as_ref())))
        .collect();
    Ok((value, load))
}

/// The instruction mnemonic of a disassembly line, skipping an `IL_xxxx:` label.
fn opcode(line: &str) -> Option<&str> {
    let mut tokens = line.split_whitespace();
    let first = tokens.next()?;
    if first.starts_with(LABEL_PREFIX) && first.ends_with(':') {
        tokens.next()
    } else {
        Some(first)
    }
}

/// Text between the first and last quote of a line; empty when there is no pair.
fn quoted_payload(line: &str) -> &str {
    match (line.find(QUOTE), line.rfind(QUOTE)) {
        (Some(first), Some(last)) if last > first => &line[first + 1..last],
        _ => "",
    }
}

/// Decode the escapes the disassembler emits for string operands.
///
/// Only `\"`, `\?`, `\t`, `\n` and `\r` are recognized; any other escape pair
/// is kept as written (octal escapes are not decoded).
pub fn decode_il_escapes(raw: &str) -> String {
    let mut decoded = String::with_capacity(raw.len());
    let mut chars = raw.chars();

    while let Some(c) = chars.next() {
        if c != '\\' {
            decoded.push(c);
            continue;
        }
        match chars.next() {
            Some('"') => decoded.push('"'),
            Some('?') => decoded.push('?'),
            Some('t') => decoded.push('\t'),
            Some('n') => decoded.push('\n'),
            Some('r') => decoded.push('\r'),
            Some(other) => {
                decoded.push('\\');
                decoded.push(other);
            }
            None => decoded.push('\\'),
        }
    }

    decoded
}

fn compact(text: &str) -> String {
    text.chars().filter(|c| !c.is_whitespace()).collect()
}
