//! Markup extraction.
//!
//! Markup has no call syntax, so translatable values are recognized by a
//! markup-extension convention instead: an attribute whose whole value is
//! `{prefix:Loc VALUE}` marks `VALUE` as user-facing text.
//!
//! ```text
//! <Button Content="{l:Loc Add All}" />            -> "Add All"
//! <Label Content="{l:Loc Size\, in pixels}" />    -> "Size, in pixels"
//! <Label Content="{l:Loc 'Tom &amp; Jerry'}" />   -> "Tom & Jerry"
//! ```

use regex::Regex;

use crate::core::{data::LocalizableString, diagnostics::Diagnostics};

const EXTENSION_ESCAPE: char = '\\';
const EXTENSION_ESCAPABLE: [char; 5] = ['\\', '{', '}', ',', '='];
const QUOTED_VALUE: char = '\'';

#[derive(Debug, Clone)]
pub struct MarkupExtractor {
    pattern: Regex,
}

impl MarkupExtractor {
    /// Extractor for attribute values using the markup extension named `extension`.
    pub fn new(extension: &str) -> Result<Self, regex::Error> {
        let pattern = [
            r#"=\s*"\{\w+:"#,
            &regex::escape(extension),
            r#"\s+((?:\\.|[^\\}"])+)\}""#,
        ]
        .concat();
        Ok(Self {
            pattern: Regex::new(&pattern)?,
        })
    }

    pub fn extract(&self, text: &str, diagnostics: &mut Diagnostics) -> Vec<LocalizableString> {
        let mut records = Vec::new();
        for captures in self.pattern.captures_iter(text) {
            let Some(raw) = captures.get(1) else {
                continue;
            };
            let value = decode_markup_value(raw.as_str());
            match LocalizableString::without_context(value) {
                Some(record) => records.push(record),
                None => diagnostics.info(format!(
                    "line {}: empty markup value skipped",
                    line_number(text, raw.start())
                )),
            }
        }
        records
    }
}

/// Decode a raw markup-extension argument into the text it denotes.
pub fn decode_markup_value(raw: &str) -> String {
    let trimmed = raw.trim();
    let unquoted = trimmed
        .strip_prefix(QUOTED_VALUE)
        .and_then(|rest| rest.strip_suffix(QUOTED_VALUE))
        .unwrap_or(trimmed);
    decode_extension_escapes(&decode_entities(unquoted))
}

/// Replace XML character and entity references. Unknown references are kept.
fn decode_entities(raw: &str) -> String {
    let mut decoded = String::with_capacity(raw.len());
    let mut rest = raw;

    while let Some(amp) = rest.find('&') {
        decoded.push_str(&rest[..amp]);
        let after = &rest[amp + 1..];
        let reference = after
            .find(';')
            .and_then(|semi| entity_char(&after[..semi]).map(|c| (c, semi)));
        match reference {
            Some((c, semi)) => {
                decoded.push(c);
                rest = &after[semi + 1..];
            }
            None => {
                decoded.push('&');
                rest = after;
            }
        }
    }

    decoded.push_str(rest);
    decoded
}

fn entity_char(name: &str) -> Option<char> {
    match name {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        _ => {
            let number = name.strip_prefix('#')?;
            let code = match number.strip_prefix(['x', 'X']) {
                Some(hex) => u32::from_str_radix(hex, 16).ok()?,
                None => number.parse().ok()?,
            };
            char::from_u32(code)
        }
    }
}

fn decode_extension_escapes(raw: &str) -> String {
    let mut decoded = String::with_capacity(raw.len());
    let mut chars = raw.chars().peekable();

    while let Some(c) = chars.next() {
        if c == EXTENSION_ESCAPE
            && let Some(&next) = chars.peek()
            && EXTENSION_ESCAPABLE.contains(&next)
        {
            decoded.push(next);
            chars.next();
            continue;
        }
        decoded.push(c);
    }

    decoded
}

fn line_number(text: &str, byte_offset: usize) -> usize {
    text[..byte_offset].matches('\n').count() + 1
}
