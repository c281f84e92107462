use std::fs;

use anyhow::{Context, Result, bail};

use super::{CommandKind, CommandResult, CommandSummary, ExtractSummary, TargetSummary};
use crate::{
    cli::args::ExtractCommand,
    config::{CONFIG_FILE_NAME, TargetConfig},
    core::{Diagnostics, ExtractContext, catalog::write_catalog},
};

pub fn extract(cmd: ExtractCommand) -> Result<CommandResult> {
    let ctx = ExtractContext::new(&cmd.common)?;
    let targets = select_targets(&ctx.config.targets, &cmd.target)?;

    let mut diagnostics = Diagnostics::new();
    if !ctx.from_file {
        diagnostics.info(format!("No {} found, using defaults", CONFIG_FILE_NAME));
    }

    let mut summaries = Vec::new();
    for target in targets {
        let outcome = ctx.run_target(target)?;
        let file_count = outcome.file_count();
        diagnostics.append(outcome.diagnostics);

        if !cmd.dry_run {
            write_catalog(&outcome.output, &outcome.catalog)?;
            diagnostics.info(format!(
                "Wrote {} string(s) to {}",
                outcome.catalog.len(),
                outcome.output.display()
            ));
        }

        summaries.push(TargetSummary {
            output: ctx.display_path(&outcome.output),
            file_count,
            catalog: outcome.catalog,
            written: !cmd.dry_run,
        });
    }

    if let Some(log) = &cmd.log {
        fs::write(log, diagnostics.render())
            .with_context(|| format!("Failed to write log file: {}", log.display()))?;
    }

    Ok(CommandResult::new(
        CommandKind::Extract,
        CommandSummary::Extract(ExtractSummary {
            targets: summaries,
            is_dry_run: cmd.dry_run,
            log_file: cmd.log,
        }),
        diagnostics,
    ))
}

/// Targets whose output is in `requested`, or all of them when nothing was requested.
fn select_targets<'a>(
    targets: &'a [TargetConfig],
    requested: &[String],
) -> Result<Vec<&'a TargetConfig>> {
    if requested.is_empty() {
        return Ok(targets.iter().collect());
    }
    for output in requested {
        if !targets.iter().any(|t| &t.output == output) {
            bail!("No target with output '{}' in {}", output, CONFIG_FILE_NAME);
        }
    }
    Ok(targets
        .iter()
        .filter(|t| requested.contains(&t.output))
        .collect())
}
