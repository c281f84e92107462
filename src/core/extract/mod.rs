//! Front ends that turn one input artifact into an ordered list of records.
//!
//! - `source`: marker call sites in program text
//! - `markup`: markup-extension attribute values
//! - `il`: `ldstr`/`call` pairs in disassembly listings

pub mod il;
pub mod markup;
pub mod source;

pub use il::{IlError, IlExtractor};
pub use markup::MarkupExtractor;
pub use source::SourceExtractor;
