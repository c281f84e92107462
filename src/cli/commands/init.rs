use std::{fs, path::Path};

use anyhow::{Context, Result};

use super::{CommandKind, CommandResult, CommandSummary, InitSummary};
use crate::{
    config::{CONFIG_FILE_NAME, default_config_json},
    core::Diagnostics,
};

pub fn init() -> Result<CommandResult> {
    let config_path = Path::new(CONFIG_FILE_NAME);
    let mut diagnostics = Diagnostics::new();

    let created = if config_path.exists() {
        diagnostics.error(format!("{} already exists", CONFIG_FILE_NAME));
        false
    } else {
        fs::write(config_path, default_config_json()?)
            .with_context(|| format!("Failed to write {}", CONFIG_FILE_NAME))?;
        true
    };

    Ok(CommandResult::new(
        CommandKind::Init,
        CommandSummary::Init(InitSummary { created }),
        diagnostics,
    ))
}
