//! locx - localizable string extractor
//!
//! locx finds the user-facing strings of an application by locating calls to a
//! marker method (`"Save".Localize()`, `Localize("Save", "menu")`) in source
//! code, markup-extension values in markup, and `ldstr`/`call` pairs in the
//! disassembly of compiled binaries. The strings are collected into JSON
//! catalogs for translation, preserving existing translations.
//!
//! ## Module Structure
//!
//! - `cli`: Command-line interface layer (commands and reporting)
//! - `config`: Configuration file loading and parsing
//! - `core`: Extraction engine and catalog handling
//! - `utils`: Shared utility functions

pub mod cli;
pub mod config;
pub mod core;
pub mod utils;
