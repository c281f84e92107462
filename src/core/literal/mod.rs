//! String-literal syntax: single-character decoding and whole-literal scanning.
//!
//! Two quoting styles are understood:
//!
//! - **Regular** `"..."`: backslash escapes (`\n`, `\x2a`, `\u002a`, ...)
//! - **Verbatim** `@"..."`: no backslash escapes, `""` stands for one quote
//!
//! Literals joined with `+` are scanned as one logical value, either
//! left-to-right from an opening quote (`parse_forward`) or right-to-left from
//! a closing quote (`parse_backward`).

mod decode;
mod scan;

pub use decode::{LiteralKind, QUOTE, VERBATIM_PREFIX, decode_char};
pub use scan::{
    CONCAT, ParsedLiteral, ScanError, ScanResult, parse_backward, parse_forward, skip_whitespace,
    skip_whitespace_back,
};
