use std::path::Path;

use anyhow::{Result, bail};

use super::{CommandKind, CommandResult, CommandSummary, ScanSummary};
use crate::{
    cli::args::{ScanCommand, ScanKind},
    core::{Diagnostics, ExtractContext, FileKind},
};

const LISTING_EXTENSION: &str = "il";

pub fn scan(cmd: ScanCommand) -> Result<CommandResult> {
    let ctx = ExtractContext::new(&cmd.common)?;
    let kind = match cmd.kind {
        Some(kind) => kind,
        None => infer_kind(&ctx, &cmd.file)?,
    };

    let mut diagnostics = Diagnostics::for_file(cmd.file.clone());
    let records = match kind {
        ScanKind::Source => ctx.extract_file(&cmd.file, FileKind::Source, &mut diagnostics)?,
        ScanKind::Markup => ctx.extract_file(&cmd.file, FileKind::Markup, &mut diagnostics)?,
        ScanKind::Binary => ctx.extract_file(&cmd.file, FileKind::Binary, &mut diagnostics)?,
        ScanKind::Il => ctx.extract_listing(&cmd.file, &mut diagnostics)?,
    };

    Ok(CommandResult::new(
        CommandKind::Scan,
        CommandSummary::Scan(ScanSummary {
            file: cmd.file,
            records,
            as_json: cmd.json,
        }),
        diagnostics,
    ))
}

fn infer_kind(ctx: &ExtractContext, path: &Path) -> Result<ScanKind> {
    if path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case(LISTING_EXTENSION))
    {
        return Ok(ScanKind::Il);
    }
    match ctx.classify(path) {
        Some(FileKind::Source) => Ok(ScanKind::Source),
        Some(FileKind::Markup) => Ok(ScanKind::Markup),
        Some(FileKind::Binary) => Ok(ScanKind::Binary),
        None => bail!(
            "Cannot tell how to scan {}; pass --kind",
            path.display()
        ),
    }
}
