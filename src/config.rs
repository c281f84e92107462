use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Ok, Result, bail};
use glob::Pattern;
use serde::{Deserialize, Serialize};

use crate::{core::call_site::CallShape, utils::is_identifier};

pub const CONFIG_FILE_NAME: &str = ".locxrc.json";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    #[serde(default)]
    pub markers: MarkerConfig,
    #[serde(default = "default_targets")]
    pub targets: Vec<TargetConfig>,
    #[serde(default = "default_ignores")]
    pub ignores: Vec<String>,
    #[serde(default = "default_source_extensions")]
    pub source_extensions: Vec<String>,
    #[serde(default = "default_markup_extensions")]
    pub markup_extensions: Vec<String>,
    #[serde(default = "default_binary_extensions")]
    pub binary_extensions: Vec<String>,
    /// Binaries are only scanned when a disassembler is configured.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disassembler: Option<DisassemblerConfig>,
}

/// Names that mark text as translatable in each kind of input.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkerConfig {
    #[serde(default = "default_methods")]
    pub methods: Vec<String>,
    /// Argument lists accepted per method; unlisted methods take
    /// `(text)` and `(text, context)`.
    #[serde(default = "default_call_shapes")]
    pub call_shapes: BTreeMap<String, Vec<CallShape>>,
    #[serde(default = "default_static_receivers")]
    pub static_receivers: Vec<String>,
    #[serde(default = "default_il_one_arg")]
    pub il_one_arg: String,
    #[serde(default = "default_il_two_arg")]
    pub il_two_arg: String,
    #[serde(default = "default_markup_extension")]
    pub markup_extension: String,
}

/// One catalog: every file found under `sources` ends up in `output`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetConfig {
    pub sources: Vec<String>,
    pub output: String,
    #[serde(default)]
    pub ignores: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DisassemblerConfig {
    pub program: String,
    #[serde(default)]
    pub args: Vec<String>,
}

fn default_methods() -> Vec<String> {
    ["Localize", "LocalizedDescription", "LocalizedName", "Property"]
        .map(String::from)
        .to_vec()
}

fn default_call_shapes() -> BTreeMap<String, Vec<CallShape>> {
    let text_only = || vec![CallShape::new(1, vec![0], None)];
    BTreeMap::from([
        ("LocalizedDescription".to_string(), text_only()),
        ("LocalizedName".to_string(), text_only()),
        (
            "Property".to_string(),
            vec![
                CallShape::new(1, vec![0], None),
                CallShape::new(4, vec![1, 3], None),
            ],
        ),
    ])
}

fn default_static_receivers() -> Vec<String> {
    vec!["Localizer".to_string()]
}

fn default_il_one_arg() -> String {
    "Localize(string)".to_string()
}

fn default_il_two_arg() -> String {
    "Localize(string,string)".to_string()
}

fn default_markup_extension() -> String {
    "Loc".to_string()
}

fn default_targets() -> Vec<TargetConfig> {
    vec![TargetConfig {
        sources: vec![".".to_string()],
        output: "Localization.json".to_string(),
        ignores: Vec::new(),
    }]
}

fn default_ignores() -> Vec<String> {
    ["**/obj/**", "**/.git/**"].map(String::from).to_vec()
}

fn default_source_extensions() -> Vec<String> {
    vec!["cs".to_string()]
}

fn default_markup_extensions() -> Vec<String> {
    vec!["xaml".to_string()]
}

fn default_binary_extensions() -> Vec<String> {
    ["dll", "exe"].map(String::from).to_vec()
}

impl Default for MarkerConfig {
    fn default() -> Self {
        Self {
            methods: default_methods(),
            call_shapes: default_call_shapes(),
            static_receivers: default_static_receivers(),
            il_one_arg: default_il_one_arg(),
            il_two_arg: default_il_two_arg(),
            markup_extension: default_markup_extension(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            markers: MarkerConfig::default(),
            targets: default_targets(),
            ignores: default_ignores(),
            source_extensions: default_source_extensions(),
            markup_extensions: default_markup_extensions(),
            binary_extensions: default_binary_extensions(),
            disassembler: None,
        }
    }
}

impl MarkerConfig {
    /// Argument lists accepted for the marker method `name`.
    pub fn shapes_for(&self, name: &str) -> Vec<CallShape> {
        self.call_shapes
            .get(name)
            .cloned()
            .unwrap_or_else(CallShape::text_and_context)
    }
}

impl Config {
    /// Validate configuration values.
    ///
    /// Rejects invalid glob patterns, marker names that are not identifiers,
    /// and targets without sources or output.
    pub fn validate(&self) -> Result<()> {
        for pattern in &self.ignores {
            Pattern::new(pattern)
                .with_context(|| format!("Invalid glob pattern in 'ignores': \"{}\"", pattern))?;
        }

        if self.markers.methods.is_empty() {
            bail!("'markers.methods' must name at least one marker method");
        }
        for name in self
            .markers
            .methods
            .iter()
            .chain(&self.markers.static_receivers)
            .chain([&self.markers.markup_extension])
        {
            if !is_identifier(name) {
                bail!("Invalid identifier in 'markers': \"{}\"", name);
            }
        }
        for (name, shapes) in &self.markers.call_shapes {
            for shape in shapes {
                validate_shape(name, shape)?;
            }
        }
        if self.markers.il_one_arg.trim().is_empty() || self.markers.il_two_arg.trim().is_empty() {
            bail!("'markers.ilOneArg' and 'markers.ilTwoArg' must not be empty");
        }

        for (index, target) in self.targets.iter().enumerate() {
            if target.output.trim().is_empty() {
                bail!("Target {} in 'targets' has an empty 'output'", index + 1);
            }
            if target.sources.is_empty() {
                bail!("Target '{}' in 'targets' has no 'sources'", target.output);
            }
            for pattern in &target.ignores {
                Pattern::new(pattern).with_context(|| {
                    format!(
                        "Invalid glob pattern in 'ignores' of target '{}': \"{}\"",
                        target.output, pattern
                    )
                })?;
            }
        }

        if let Some(disassembler) = &self.disassembler
            && disassembler.program.trim().is_empty()
        {
            bail!("'disassembler.program' must not be empty");
        }

        Ok(())
    }
}

fn validate_shape(name: &str, shape: &CallShape) -> Result<()> {
    if shape.texts.is_empty() {
        bail!("Call shape of \"{}\" must list at least one text position", name);
    }
    for &position in shape.texts.iter().chain(&shape.context) {
        if position >= shape.arguments {
            bail!(
                "Call shape of \"{}\" uses position {} but takes only {} argument(s)",
                name,
                position,
                shape.arguments
            );
        }
    }
    if shape.context.is_some_and(|context| shape.texts.contains(&context)) {
        bail!("Call shape of \"{}\" uses its context position as text", name);
    }
    Ok(())
}

pub fn default_config_json() -> Result<String> {
    let config = Config::default();
    serde_json::to_string_pretty(&config).context("Failed to generate default config.")
}

pub fn find_config_file(start_dir: &Path) -> Option<PathBuf> {
    let mut current = start_dir.to_path_buf();

    loop {
        let config_path = current.join(CONFIG_FILE_NAME);
        if config_path.exists() {
            return Some(config_path);
        }
        if current.join(".git").exists() {
            return None;
        }
        if !current.pop() {
            return None;
        }
    }
}

/// Result of loading configuration.
pub struct ConfigLoadResult {
    pub config: Config,
    /// True if config was loaded from a file, false if using defaults.
    pub from_file: bool,
    /// Directory that relative paths in the config are resolved against.
    pub base_dir: PathBuf,
}

pub fn load_config(start_dir: &Path) -> Result<ConfigLoadResult> {
    match find_config_file(start_dir) {
        Some(path) => {
            let content = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read config file: {:?}", path))?;
            let config: Config = serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse config file: {:?}", path))?;
            config.validate()?;
            let base_dir = path
                .parent()
                .map_or_else(|| start_dir.to_path_buf(), Path::to_path_buf);
            Ok(ConfigLoadResult {
                config,
                from_file: true,
                base_dir,
            })
        }
        None => Ok(ConfigLoadResult {
            config: Config::default(),
            from_file: false,
            base_dir: start_dir.to_path_buf(),
        }),
    }
}
