//! Core data types shared by every extractor.
//!
//! ## Module Structure
//!
//! - `localizable`: The extracted record (`LocalizableString`)
//! - `source`: Character-indexed view over source text (`SourceText`)

pub mod localizable;
pub mod source;

pub use localizable::LocalizableString;
pub use source::SourceText;
