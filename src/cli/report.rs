//! Report formatting and printing utilities.
//!
//! Diagnostics go to stderr in cargo style; command output (catalog listings,
//! scan results) goes to stdout so `locx scan --json` stays machine-readable.
//! Separate from core logic to allow locx to be used as a library.

use std::io::{self, Write};

use colored::Colorize;
use unicode_width::UnicodeWidthStr;

use super::commands::{
    CommandResult, CommandSummary, ExtractSummary, InitSummary, ScanSummary, TargetSummary,
};
use crate::config::CONFIG_FILE_NAME;
use crate::core::{Diagnostic, Diagnostics, Severity};

/// Success mark for consistent output formatting.
pub const SUCCESS_MARK: &str = "\u{2713}"; // ✓

/// Failure mark for consistent output formatting.
pub const FAILURE_MARK: &str = "\u{2718}"; // ✘

/// Gap between the text and context columns of a listing.
const COLUMN_GAP: usize = 2;

pub fn print(result: &CommandResult, verbose: bool) {
    print_command_output(result, &mut io::stdout().lock());
    report_to(&result.diagnostics, verbose, &mut io::stderr().lock());
}

/// Print diagnostics to a custom writer.
///
/// Warnings and errors are always shown; info entries only with `verbose`.
pub fn report_to<W: Write>(diagnostics: &Diagnostics, verbose: bool, writer: &mut W) {
    for diagnostic in diagnostics.entries() {
        if diagnostic.severity == Severity::Info && !verbose {
            continue;
        }
        print_diagnostic(diagnostic, writer);
    }
    print_summary(diagnostics, writer);
}

pub fn print_command_output<W: Write>(result: &CommandResult, writer: &mut W) {
    match &result.summary {
        CommandSummary::Extract(summary) => print_extract(summary, writer),
        CommandSummary::Scan(summary) => print_scan(summary, writer),
        CommandSummary::Init(summary) => print_init(summary, writer),
    }
}

// ============================================================
// Internal Functions
// ============================================================

fn print_diagnostic<W: Write>(diagnostic: &Diagnostic, writer: &mut W) {
    let severity = match diagnostic.severity {
        Severity::Error => "error:".bold().red(),
        Severity::Warning => "warning:".bold().yellow(),
        Severity::Info => "info:".bold().cyan(),
    };
    let _ = writeln!(writer, "{} {}", severity, diagnostic.message);
    if let Some(file) = &diagnostic.file {
        let _ = writeln!(writer, "  {} {}", "-->".blue(), file.display());
    }
}

fn print_summary<W: Write>(diagnostics: &Diagnostics, writer: &mut W) {
    let total_errors = diagnostics.count(Severity::Error);
    let total_warnings = diagnostics.count(Severity::Warning);
    let total_problems = total_errors + total_warnings;

    if total_problems > 0 {
        let _ = writeln!(
            writer,
            "\n{} {} problems ({} {}, {} {})",
            FAILURE_MARK.red(),
            total_problems,
            total_errors,
            if total_errors == 1 { "error" } else { "errors" }.red(),
            total_warnings,
            if total_warnings == 1 {
                "warning"
            } else {
                "warnings"
            }
            .yellow()
        );
    }
}

fn print_extract<W: Write>(summary: &ExtractSummary, writer: &mut W) {
    for target in &summary.targets {
        if summary.is_dry_run {
            print_dry_run_target(target, writer);
        } else {
            let _ = writeln!(
                writer,
                "{} {}",
                SUCCESS_MARK.green(),
                format!(
                    "Wrote {} to {} ({})",
                    plural(target.catalog.len(), "string", "strings"),
                    target.output.display(),
                    plural(target.file_count, "file scanned", "files scanned"),
                )
                .green()
            );
        }
    }

    if let Some(log) = &summary.log_file {
        let _ = writeln!(writer, "Log written to {}", log.display());
    }
}

fn print_dry_run_target<W: Write>(target: &TargetSummary, writer: &mut W) {
    let _ = writeln!(
        writer,
        "{} ({} from {}, not written)",
        target.output.display().to_string().bold(),
        plural(target.catalog.len(), "string", "strings"),
        plural(target.file_count, "file", "files"),
    );
    let rows: Vec<(&str, &str)> = target
        .catalog
        .iter()
        .map(|e| (e.text.as_str(), e.context.as_str()))
        .collect();
    for line in format_rows(&rows) {
        let _ = writeln!(writer, "  {}", line);
    }
}

fn print_scan<W: Write>(summary: &ScanSummary, writer: &mut W) {
    if summary.as_json {
        match serde_json::to_string_pretty(&summary.records) {
            Ok(json) => {
                let _ = writeln!(writer, "{}", json);
            }
            Err(err) => {
                let _ = writeln!(writer, "{} {}", "error:".bold().red(), err);
            }
        }
        return;
    }

    let rows: Vec<(&str, &str)> = summary
        .records
        .iter()
        .map(|r| (r.text.as_str(), r.context.as_str()))
        .collect();
    for line in format_rows(&rows) {
        let _ = writeln!(writer, "{}", line);
    }
    let _ = writeln!(
        writer,
        "{} {}",
        SUCCESS_MARK.green(),
        format!(
            "Found {} in {}",
            plural(summary.records.len(), "string", "strings"),
            summary.file.display()
        )
        .green()
    );
}

fn print_init<W: Write>(summary: &InitSummary, writer: &mut W) {
    if summary.created {
        let _ = writeln!(
            writer,
            "{} {}",
            SUCCESS_MARK.green(),
            format!("Created {}", CONFIG_FILE_NAME).green()
        );
    }
}

/// Quote each text and align the contexts in a second column.
///
/// Alignment uses display width, so wide characters line up in a terminal.
fn format_rows(rows: &[(&str, &str)]) -> Vec<String> {
    let quoted: Vec<String> = rows.iter().map(|(text, _)| format!("{:?}", text)).collect();
    let width = quoted
        .iter()
        .zip(rows)
        .filter(|(_, (_, context))| !context.is_empty())
        .map(|(q, _)| UnicodeWidthStr::width(q.as_str()))
        .max()
        .unwrap_or(0);

    quoted
        .into_iter()
        .zip(rows)
        .map(|(text, (_, context))| {
            if context.is_empty() {
                return text;
            }
            let padding = width - UnicodeWidthStr::width(text.as_str()) + COLUMN_GAP;
            format!("{}{:padding$}{:?}", text, "", context, padding = padding)
        })
        .collect()
}

fn plural(count: usize, one: &str, many: &str) -> String {
    format!("{} {}", count, if count == 1 { one } else { many })
}

// ============================================================
// Tests
// ============================================================
