//! Turning a compiled binary into disassembly lines.
//!
//! The engine only consumes lines; how they are produced is a host capability
//! behind the [`Disassembler`] trait. [`CommandDisassembler`] runs an external
//! tool configured in `.locxrc.json`, for example:
//!
//! ```json
//! "disassembler": { "program": "ildasm", "args": ["{input}", "/out={output}", "/utf8"] }
//! ```

use std::{fs, path::Path, process::Command};

use anyhow::{Context, Result, bail};

use crate::config::DisassemblerConfig;

pub const INPUT_PLACEHOLDER: &str = "{input}";
pub const OUTPUT_PLACEHOLDER: &str = "{output}";

const OUTPUT_FILE_NAME: &str = "disassembly.il";

pub trait Disassembler: Send + Sync {
    fn disassemble(&self, binary: &Path) -> Result<Vec<String>>;
}

/// Runs an external disassembler process.
///
/// `{input}` in the arguments is replaced by the binary path (appended when no
/// argument mentions it). With an `{output}` argument the listing is read back
/// from a file in a scratch directory that is removed afterwards; otherwise it
/// is read from the process's standard output.
#[derive(Debug, Clone)]
pub struct CommandDisassembler {
    program: String,
    args: Vec<String>,
}

impl CommandDisassembler {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    pub fn from_config(config: &DisassemblerConfig) -> Self {
        Self::new(config.program.clone(), config.args.clone())
    }

    fn command_args(&self, input: &Path, output: &Path) -> Vec<String> {
        let input = input.to_string_lossy();
        let output = output.to_string_lossy();
        let mut args: Vec<String> = self
            .args
            .iter()
            .map(|arg| {
                arg.replace(INPUT_PLACEHOLDER, &input)
                    .replace(OUTPUT_PLACEHOLDER, &output)
            })
            .collect();
        if !self.args.iter().any(|arg| arg.contains(INPUT_PLACEHOLDER)) {
            args.push(input.into_owned());
        }
        args
    }
}

impl Disassembler for CommandDisassembler {
    fn disassemble(&self, binary: &Path) -> Result<Vec<String>> {
        let scratch = tempfile::tempdir().context("Failed to create scratch directory")?;
        let output_path = scratch.path().join(OUTPUT_FILE_NAME);

        let output = Command::new(&self.program)
            .args(self.command_args(binary, &output_path))
            .output()
            .with_context(|| format!("Failed to run disassembler '{}'", self.program))?;

        if !output.status.success() {
            bail!(
                "Disassembler '{}' failed on {} ({}): {}",
                self.program,
                binary.display(),
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            );
        }

        let listing = if self.args.iter().any(|arg| arg.contains(OUTPUT_PLACEHOLDER)) {
            fs::read_to_string(&output_path).with_context(|| {
                format!("Disassembler '{}' produced no listing", self.program)
            })?
        } else {
            String::from_utf8_lossy(&output.stdout).into_owned()
        };

        Ok(listing.lines().map(String::from).collect())
    }
}
