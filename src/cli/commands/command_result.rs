use std::path::PathBuf;

use crate::core::{CatalogEntry, Diagnostics, LocalizableString, Severity};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandKind {
    Extract,
    Scan,
    Init,
}

#[derive(Debug)]
pub enum CommandSummary {
    Extract(ExtractSummary),
    Scan(ScanSummary),
    Init(InitSummary),
}

#[derive(Debug)]
pub struct ExtractSummary {
    pub targets: Vec<TargetSummary>,
    pub is_dry_run: bool,
    pub log_file: Option<PathBuf>,
}

#[derive(Debug)]
pub struct TargetSummary {
    pub output: PathBuf,
    pub file_count: usize,
    pub catalog: Vec<CatalogEntry>,
    pub written: bool,
}

#[derive(Debug)]
pub struct ScanSummary {
    pub file: PathBuf,
    pub records: Vec<LocalizableString>,
    pub as_json: bool,
}

#[derive(Debug)]
pub struct InitSummary {
    pub created: bool,
}

/// Result of running locx commands
#[derive(Debug)]
pub struct CommandResult {
    pub kind: CommandKind,
    pub summary: CommandSummary,
    /// Everything recorded during the run, in order.
    pub diagnostics: Diagnostics,
    pub error_count: usize,
    pub warning_count: usize,
    /// If true, exit code 1 should be returned when error_count > 0.
    pub exit_on_errors: bool,
}

impl CommandResult {
    pub fn new(kind: CommandKind, summary: CommandSummary, diagnostics: Diagnostics) -> Self {
        Self {
            kind,
            summary,
            error_count: diagnostics.count(Severity::Error),
            warning_count: diagnostics.count(Severity::Warning),
            diagnostics,
            exit_on_errors: true,
        }
    }
}
