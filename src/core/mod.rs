//! Extraction engine.
//!
//! Layers, bottom-up:
//!
//! - `literal`: decoding and scanning string literals forwards and backwards
//! - `call_site`: recognizing marker calls and resolving their arguments
//! - `extract`: per-input front ends (source, markup, disassembly)
//! - `normalize`: context de-duplication for placeholder strings
//!
//! The host side (`file_scanner`, `disassembler`, `catalog`, `context`) finds
//! inputs, runs the front ends over them and maintains catalog files.

pub mod call_site;
pub mod catalog;
pub mod context;
pub mod data;
pub mod diagnostics;
pub mod disassembler;
pub mod extract;
pub mod file_scanner;
pub mod literal;
pub mod normalize;

pub use call_site::{CallMatch, CallSiteMatcher};
pub use catalog::CatalogEntry;
pub use context::{ExtractContext, TargetOutcome};
pub use data::{LocalizableString, SourceText};
pub use diagnostics::{Diagnostic, Diagnostics, Severity};
pub use file_scanner::FileKind;
